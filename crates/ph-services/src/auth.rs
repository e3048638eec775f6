//! Registration, login and token authentication

use chrono::{DateTime, Utc};
use ph_auth::{hash_password, verify_password, AuthError, CurrentUser, JwtService};
use ph_contracts::validate_input;
use ph_core::{traits::Id, PhError, PhResult};
use ph_models::{LoginUser, Organization, RegisterUser, Role, User};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::context::ServiceContext;

/// The user fields returned alongside a token
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Id,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub organization: Option<Id>,
    pub avatar: Option<String>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            organization: user.organization,
            avatar: user.avatar.clone(),
        }
    }
}

/// A freshly issued token and the user it belongs to
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub token: String,
    pub user: UserProfile,
}

/// The current user with their organization embedded
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeView {
    pub id: Id,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub organization: Option<Organization>,
    pub created_at: DateTime<Utc>,
}

const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
    jwt: &'a JwtService,
}

impl<'a> AuthService<'a> {
    pub fn new(ctx: &'a ServiceContext, jwt: &'a JwtService) -> Self {
        Self { ctx, jwt }
    }

    /// Create an account. Naming an organization creates it with the new
    /// user as its owner and admin; everybody else starts as a member.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterUser) -> PhResult<AuthSession> {
        validate_input(&input)?;

        let users = self.ctx.db.users();
        if users.find_by_email(&input.email).await?.is_some() {
            return Err(PhError::bad_request("User already exists"));
        }

        let organization_name = input
            .organization_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty());
        if let Some(name) = organization_name {
            if self.ctx.db.organizations().find_by_name(name).await?.is_some() {
                return Err(PhError::bad_request("Organization already exists"));
            }
        }

        let password_hash = hash_password(&input.password)?;
        let role = if organization_name.is_some() {
            Role::Admin
        } else {
            Role::Member
        };
        let mut user = User::new(input.name.trim(), &input.email, password_hash, role);

        if let Some(name) = organization_name {
            let organization = Organization::new(name, user.id);
            self.ctx.db.organizations().insert(&organization).await?;
            user.organization = Some(organization.id);
            info!(organization = %organization.id, "organization created");
        }

        users.insert(&user).await?;
        info!(user = %user.id, role = %user.role, "user registered");

        self.session(&user)
    }

    /// Exchange e-mail and password for a token
    #[instrument(skip(self, input))]
    pub async fn login(&self, input: LoginUser) -> PhResult<AuthSession> {
        let email = input.email.as_deref().map(str::trim).unwrap_or_default();
        let password = input.password.as_deref().unwrap_or_default();
        if email.is_empty() || password.is_empty() {
            return Err(PhError::bad_request("Please provide an email and password"));
        }

        let Some(user) = self.ctx.db.users().find_by_email(email).await? else {
            return Err(PhError::unauthorized(INVALID_CREDENTIALS));
        };
        if !verify_password(password, &user.password_hash) {
            warn!(user = %user.id, "password mismatch");
            return Err(PhError::unauthorized(INVALID_CREDENTIALS));
        }

        info!(user = %user.id, "user logged in");
        self.session(&user)
    }

    /// Resolve a bearer token to the user it was issued for
    pub async fn authenticate(&self, token: &str) -> Result<CurrentUser, AuthError> {
        let user_id = self.jwt.get_user_id(token)?;
        match self.ctx.db.users().find_by_id(user_id).await {
            Ok(Some(user)) => Ok(CurrentUser::from(&user)),
            Ok(None) => Err(AuthError::UnknownUser),
            Err(e) => {
                warn!(error = %e, "user lookup failed during authentication");
                Err(AuthError::InvalidToken)
            }
        }
    }

    /// The caller's account with their organization
    pub async fn me(&self, user: &CurrentUser) -> PhResult<MeView> {
        let account = self.ctx.db.users().get(user.id).await?;
        let organization = match account.organization {
            Some(id) => self.ctx.db.organizations().find_by_id(id).await?,
            None => None,
        };

        Ok(MeView {
            id: account.id,
            name: account.name,
            email: account.email,
            role: account.role,
            avatar: account.avatar,
            organization,
            created_at: account.created_at,
        })
    }

    fn session(&self, user: &User) -> PhResult<AuthSession> {
        let token = self
            .jwt
            .create_token(user.id)
            .map_err(|e| PhError::Internal(e.to_string()))?;
        Ok(AuthSession {
            token,
            user: UserProfile::from(user),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt() -> JwtService {
        JwtService::new(b"test-secret", 3600)
    }

    fn register_input(email: &str, organization: Option<&str>) -> RegisterUser {
        RegisterUser {
            name: "Ada Lovelace".into(),
            email: email.into(),
            password: "secret123".into(),
            organization_name: organization.map(Into::into),
        }
    }

    #[tokio::test]
    async fn test_register_with_organization_makes_owner_admin() {
        let ctx = ServiceContext::in_memory();
        let jwt = jwt();
        let service = AuthService::new(&ctx, &jwt);

        let session = service
            .register(register_input("ada@example.com", Some("Analytical Engines")))
            .await
            .unwrap();

        assert_eq!(session.user.role, Role::Admin);
        let org_id = session.user.organization.unwrap();
        let org = ctx.db.organizations().get(org_id).await.unwrap();
        assert_eq!(org.owner, session.user.id);
        assert_eq!(jwt.get_user_id(&session.token).unwrap(), session.user.id);
    }

    #[tokio::test]
    async fn test_register_without_organization_is_member() {
        let ctx = ServiceContext::in_memory();
        let jwt = jwt();
        let session = AuthService::new(&ctx, &jwt)
            .register(register_input("ada@example.com", Some("   ")))
            .await
            .unwrap();
        assert_eq!(session.user.role, Role::Member);
        assert!(session.user.organization.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let ctx = ServiceContext::in_memory();
        let jwt = jwt();
        let service = AuthService::new(&ctx, &jwt);
        service
            .register(register_input("ada@example.com", None))
            .await
            .unwrap();

        let err = service
            .register(register_input("ADA@example.com", None))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_string(), "User already exists");
    }

    #[tokio::test]
    async fn test_login() {
        let ctx = ServiceContext::in_memory();
        let jwt = jwt();
        let service = AuthService::new(&ctx, &jwt);
        let registered = service
            .register(register_input("ada@example.com", None))
            .await
            .unwrap();

        let session = service
            .login(LoginUser {
                email: Some("ada@example.com".into()),
                password: Some("secret123".into()),
            })
            .await
            .unwrap();
        assert_eq!(session.user.id, registered.user.id);

        let err = service
            .login(LoginUser {
                email: Some("ada@example.com".into()),
                password: Some("wrong".into()),
            })
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 401);
        assert_eq!(err.to_string(), "Invalid credentials");

        let err = service
            .login(LoginUser {
                email: Some("ada@example.com".into()),
                password: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_authenticate_and_me() {
        let ctx = ServiceContext::in_memory();
        let jwt = jwt();
        let service = AuthService::new(&ctx, &jwt);
        let session = service
            .register(register_input("ada@example.com", Some("Engines")))
            .await
            .unwrap();

        let current = service.authenticate(&session.token).await.unwrap();
        assert_eq!(current.id, session.user.id);

        let me = service.me(&current).await.unwrap();
        assert_eq!(me.organization.map(|o| o.name), Some("Engines".to_string()));

        let stranger = jwt.create_token(ph_core::traits::new_id()).unwrap();
        assert!(matches!(
            service.authenticate(&stranger).await,
            Err(AuthError::UnknownUser)
        ));
        assert!(matches!(
            service.authenticate("garbage").await,
            Err(AuthError::InvalidToken)
        ));
    }
}
