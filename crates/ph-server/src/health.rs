//! Health checks
//!
//! `/health` reports every component, `/health/live` only answers, and
//! `/health/ready` fails while the store is unreachable.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use ph_db::Database;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

impl HealthStatus {
    /// The worse of two statuses
    fn combine(self, other: HealthStatus) -> HealthStatus {
        use HealthStatus::*;
        match (self, other) {
            (Unhealthy, _) | (_, Unhealthy) => Unhealthy,
            (Degraded, _) | (_, Degraded) => Degraded,
            _ => Healthy,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub response_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthStatus,
    pub version: String,
    pub uptime_seconds: u64,
    pub components: Vec<ComponentHealth>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl HealthReport {
    pub fn http_status(&self) -> StatusCode {
        match self.status {
            HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
            HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HealthConfig {
    /// Timeout for a single component check
    pub check_timeout: Duration,
    /// How long `/health` reuses a report
    pub cache_duration: Duration,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            check_timeout: Duration::from_secs(5),
            cache_duration: Duration::from_secs(10),
        }
    }
}

struct CachedHealth {
    report: HealthReport,
    cached_at: Instant,
}

pub struct HealthChecker {
    config: HealthConfig,
    db: Database,
    uploads_path: PathBuf,
    start_time: Instant,
    cache: RwLock<Option<CachedHealth>>,
}

impl HealthChecker {
    pub fn new(config: HealthConfig, db: Database, uploads_path: impl Into<PathBuf>) -> Self {
        Self {
            config,
            db,
            uploads_path: uploads_path.into(),
            start_time: Instant::now(),
            cache: RwLock::new(None),
        }
    }

    /// Cached report, refreshed once it is older than the cache duration
    pub async fn check(&self) -> HealthReport {
        {
            let cache = self.cache.read().await;
            if let Some(ref cached) = *cache {
                if cached.cached_at.elapsed() < self.config.cache_duration {
                    debug!("returning cached health report");
                    return cached.report.clone();
                }
            }
        }

        let report = self.perform_checks().await;
        *self.cache.write().await = Some(CachedHealth {
            report: report.clone(),
            cached_at: Instant::now(),
        });
        report
    }

    async fn perform_checks(&self) -> HealthReport {
        let components = vec![self.check_database().await, self.check_uploads().await];
        let status = components
            .iter()
            .fold(HealthStatus::Healthy, |acc, c| acc.combine(c.status));

        HealthReport {
            status,
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            components,
            timestamp: chrono::Utc::now(),
        }
    }

    pub async fn check_database(&self) -> ComponentHealth {
        let start = Instant::now();
        let (status, message) = match tokio::time::timeout(self.config.check_timeout, self.db.ping()).await {
            Ok(Ok(())) => (HealthStatus::Healthy, "Connected".to_string()),
            Ok(Err(e)) => {
                warn!(error = %e, "database ping failed");
                (HealthStatus::Unhealthy, e.to_string())
            }
            Err(_) => (HealthStatus::Unhealthy, "Ping timed out".to_string()),
        };

        ComponentHealth {
            name: "database".to_string(),
            status,
            message: Some(message),
            response_time_ms: start.elapsed().as_millis() as u64,
            details: Some(serde_json::json!({ "backend": self.db.backend() })),
        }
    }

    /// The uploads directory is created on the first upload, so a missing
    /// one only degrades the report
    async fn check_uploads(&self) -> ComponentHealth {
        let start = Instant::now();
        let (status, message) = match tokio::fs::metadata(&self.uploads_path).await {
            Ok(meta) if meta.is_dir() => (HealthStatus::Healthy, "Directory present"),
            Ok(_) => (HealthStatus::Unhealthy, "Uploads path is not a directory"),
            Err(_) => (HealthStatus::Degraded, "Uploads directory not created yet"),
        };

        ComponentHealth {
            name: "uploads".to_string(),
            status,
            message: Some(message.to_string()),
            response_time_ms: start.elapsed().as_millis() as u64,
            details: Some(serde_json::json!({ "path": self.uploads_path.display().to_string() })),
        }
    }
}

/// GET /health/live
pub async fn liveness() -> &'static str {
    "OK"
}

/// GET /health/ready
pub async fn readiness(State(health): State<Arc<HealthChecker>>) -> (StatusCode, Json<ComponentHealth>) {
    let database = health.check_database().await;
    let status = if database.status == HealthStatus::Unhealthy {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };
    (status, Json(database))
}

/// GET /health
pub async fn health(State(health): State<Arc<HealthChecker>>) -> (StatusCode, Json<HealthReport>) {
    let report = health.check().await;
    (report.http_status(), Json(report))
}
