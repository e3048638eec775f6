//! API routes

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::extractors::AppState;
use crate::handlers::{
    analytics, auth, dashboard, discussions, files, milestones, notifications, projects, tasks,
    timesheets, users,
};

/// Create the complete API router
pub fn router() -> Router<AppState> {
    Router::new().nest("/api", api_router())
}

fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_router())
        .nest("/users", users_router())
        .nest("/projects", projects_router())
        .nest("/tasks", tasks_router())
        .nest("/milestones", milestones_router())
        .nest("/timesheets", timesheets_router())
        .nest("/files", files_router())
        .nest("/discussions", discussions_router())
        .nest("/notifications", notifications_router())
        .nest("/dashboard", dashboard_router())
        .nest("/analytics", analytics_router())
}

fn auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/me", get(auth::me))
}

fn users_router() -> Router<AppState> {
    Router::new().route("/", get(users::list_users))
}

fn projects_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(projects::list_projects).post(projects::create_project),
        )
        .route(
            "/:id",
            get(projects::get_project)
                .put(projects::update_project)
                .delete(projects::delete_project),
        )
        .route(
            "/:id/milestones",
            get(milestones::list_milestones).post(milestones::create_milestone),
        )
        .route("/:id/tasks", get(projects::list_project_tasks))
}

fn tasks_router() -> Router<AppState> {
    Router::new()
        .route("/", get(tasks::list_tasks).post(tasks::create_task))
        .route(
            "/:id",
            get(tasks::get_task)
                .put(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .route("/:id/comments", post(tasks::add_comment))
}

fn milestones_router() -> Router<AppState> {
    Router::new().route(
        "/:id",
        get(milestones::get_milestone)
            .put(milestones::update_milestone)
            .delete(milestones::delete_milestone),
    )
}

fn timesheets_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(timesheets::list_timesheets).post(timesheets::create_timesheet),
        )
        .route("/export", get(timesheets::export_timesheets))
}

fn files_router() -> Router<AppState> {
    Router::new()
        .route("/", get(files::list_files).post(files::create_file))
        .route("/upload", post(files::upload_file))
        .route("/:id", axum::routing::delete(files::delete_file))
}

fn discussions_router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(discussions::list_discussions).post(discussions::send_message),
    )
}

fn notifications_router() -> Router<AppState> {
    Router::new()
        .route("/", get(notifications::list_notifications))
        .route("/unread-count", get(notifications::unread_count))
        .route("/mark-all-read", put(notifications::mark_all_read))
        .route("/:id/read", put(notifications::mark_read))
}

fn dashboard_router() -> Router<AppState> {
    Router::new()
        .route("/admin", get(dashboard::admin))
        .route("/pm", get(dashboard::pm))
        .route("/member", get(dashboard::member))
}

fn analytics_router() -> Router<AppState> {
    Router::new()
        .route("/projects", get(analytics::projects))
        .route("/tasks", get(analytics::tasks))
        .route("/time", get(analytics::time))
        .route("/overdue", get(analytics::overdue))
}
