// ============================================================================
// Rent Core - Authentication Service
// File: crates/rent-core/src/services/auth_service.rs
// ============================================================================
//! Admin and tenant-user login, bearer token authentication and revocation

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info, warn};
use uuid::Uuid;
use validator::Validate;

use rent_security::{AccessTokenService, PasswordService};
use rent_shared::constants::{ADMIN_TOKEN_NAME, TENANT_USER_TOKEN_NAME};
use rent_shared::utils::mask_email;

use crate::domain::{AccessToken, Admin, Credentials, Identity, TenantUser, TenantUserDetail};
use crate::error::DomainError;
use crate::repositories::{AdminRepository, TokenRepository};
use crate::tenancy::ActiveTenant;

/// Login response: the principal, its plaintext token and the identity kind.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult<U> {
    pub user: U,
    pub token: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
}

/// An authenticated bearer token.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSession {
    pub identity: Identity,
    pub token_hash: String,
}

impl AuthSession {
    pub fn require_admin(&self) -> Result<Uuid, DomainError> {
        match &self.identity {
            Identity::Admin { admin_id } => Ok(*admin_id),
            other => Err(DomainError::Forbidden(format!(
                "{} tokens cannot access admin routes",
                other.kind()
            ))),
        }
    }

    /// Tenant-user tokens are only valid on the tenant that issued them.
    pub fn require_tenant_user(&self, tenant_id: &str) -> Result<i64, DomainError> {
        match &self.identity {
            Identity::TenantUser { tenant_id: owner, user_id } if owner == tenant_id => Ok(*user_id),
            Identity::TenantUser { .. } => Err(DomainError::Unauthorized),
            other => Err(DomainError::Forbidden(format!(
                "{} tokens cannot access tenant routes",
                other.kind()
            ))),
        }
    }
}

pub struct AuthService {
    admins: Arc<dyn AdminRepository>,
    tokens: Arc<dyn TokenRepository>,
}

impl AuthService {
    pub fn new(admins: Arc<dyn AdminRepository>, tokens: Arc<dyn TokenRepository>) -> Self {
        Self { admins, tokens }
    }

    /// Login against the central admin table
    pub async fn admin_login(&self, credentials: Credentials) -> Result<LoginResult<Admin>, DomainError> {
        credentials.validate()?;
        let email = credentials.email.trim().to_lowercase();
        info!("Admin login attempt for: {}", mask_email(&email));

        // 1. Find admin by email
        let admin = self.admins.find_by_email(&email).await?.ok_or_else(|| {
            warn!("Admin login failed: unknown email {}", mask_email(&email));
            DomainError::invalid_credentials()
        })?;

        // 2. Verify password
        if !PasswordService::verify(&credentials.password, &admin.password_hash)? {
            warn!("Admin login failed: invalid password for {}", mask_email(&email));
            return Err(DomainError::invalid_credentials());
        }

        // 3. Check the account is still enabled
        if !admin.can_login() {
            warn!("Admin login failed: account deactivated for {}", mask_email(&email));
            return Err(DomainError::invalid("email", "Your account has been deactivated."));
        }

        // 4. Issue token
        let token = self
            .issue(Identity::Admin { admin_id: admin.id }, ADMIN_TOKEN_NAME)
            .await?;

        info!(admin_id = %admin.id, "Admin login successful");
        Ok(LoginResult { user: admin, token, kind: "admin" })
    }

    /// Login against the active tenant's resident table
    pub async fn tenant_user_login(
        &self,
        active: &ActiveTenant,
        credentials: Credentials,
    ) -> Result<LoginResult<TenantUserDetail>, DomainError> {
        credentials.validate()?;
        let email = credentials.email.trim().to_lowercase();
        let tenant_id = active.tenant_id();
        info!(tenant_id, "Tenant user login attempt for: {}", mask_email(&email));

        let store = active.store();
        let user: TenantUser = store.users.find_by_email(&email).await?.ok_or_else(|| {
            warn!(tenant_id, "Tenant user login failed: unknown email");
            DomainError::invalid_credentials()
        })?;

        if !PasswordService::verify(&credentials.password, &user.password_hash)? {
            warn!(tenant_id, user_id = user.id, "Tenant user login failed: invalid password");
            return Err(DomainError::invalid_credentials());
        }

        if !user.can_login() {
            warn!(tenant_id, user_id = user.id, "Tenant user login failed: account deactivated");
            return Err(DomainError::invalid("email", "Your account has been deactivated."));
        }

        let identity = Identity::TenantUser { tenant_id: tenant_id.to_string(), user_id: user.id };
        let token = self.issue(identity, TENANT_USER_TOKEN_NAME).await?;

        let flat = match user.flat_id {
            Some(flat_id) => store.flats.find(flat_id).await?,
            None => None,
        };

        info!(tenant_id, user_id = user.id, "Tenant user login successful");
        Ok(LoginResult {
            user: TenantUserDetail { user, flat },
            token,
            kind: "tenant_user",
        })
    }

    /// Resolves a plaintext bearer token to its session.
    pub async fn authenticate(&self, plain_token: &str) -> Result<AuthSession, DomainError> {
        let token_hash = AccessTokenService::hash(plain_token);
        let record = self
            .tokens
            .find(&token_hash)
            .await?
            .ok_or(DomainError::Unauthorized)?;

        if let Err(e) = self.tokens.touch(&token_hash).await {
            error!("Failed to record token use: {}", e);
            // Don't fail authentication for this
        }

        Ok(AuthSession { identity: record.identity, token_hash })
    }

    pub async fn logout(&self, session: &AuthSession) -> Result<(), DomainError> {
        self.tokens.delete(&session.token_hash).await?;
        info!(kind = session.identity.kind(), "Token revoked");
        Ok(())
    }

    pub async fn find_admin(&self, id: &Uuid) -> Result<Admin, DomainError> {
        self.admins
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Admin", id))
    }

    /// Revokes every tenant-user token of a tenant.
    pub async fn revoke_tenant_tokens(&self, tenant_id: &str) -> Result<u64, DomainError> {
        let revoked = self.tokens.delete_for_tenant(tenant_id).await?;
        info!(tenant_id, revoked, "Tenant tokens revoked");
        Ok(revoked)
    }

    /// Seeds the first admin. Returns `None` when the email already exists.
    pub async fn bootstrap_admin(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Option<Admin>, DomainError> {
        let email = email.trim().to_lowercase();
        if self.admins.find_by_email(&email).await?.is_some() {
            return Ok(None);
        }

        let password_hash = PasswordService::hash(password)?;
        let admin = self.admins.create(&Admin::new(name, &email, password_hash)).await?;
        info!("Bootstrap admin created: {}", mask_email(&email));
        Ok(Some(admin))
    }

    async fn issue(&self, identity: Identity, name: &str) -> Result<String, DomainError> {
        let issued = AccessTokenService::generate();
        self.tokens
            .store(&AccessToken::new(issued.hash, identity, name))
            .await?;
        Ok(issued.plain_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{MockAdminRepository, MockTokenRepository};

    fn admin(active: bool) -> Admin {
        let mut admin = Admin::new("Root", "root@houserent.test", PasswordService::hash("password123").unwrap());
        admin.is_active = active;
        admin
    }

    fn credentials(password: &str) -> Credentials {
        Credentials { email: "Root@HouseRent.test".into(), password: password.into() }
    }

    #[tokio::test]
    async fn test_admin_login_issues_hashed_token() {
        let mut admins = MockAdminRepository::new();
        admins.expect_find_by_email().returning(|_| Ok(Some(admin(true))));
        let mut tokens = MockTokenRepository::new();
        tokens
            .expect_store()
            .withf(|t| t.name == ADMIN_TOKEN_NAME && t.identity.kind() == "admin")
            .times(1)
            .returning(|_| Ok(()));

        let service = AuthService::new(Arc::new(admins), Arc::new(tokens));
        let result = service.admin_login(credentials("password123")).await.unwrap();
        assert_eq!(result.kind, "admin");
        assert_eq!(result.token.len(), 80);
    }

    #[tokio::test]
    async fn test_wrong_password_is_a_validation_error_on_email() {
        let mut admins = MockAdminRepository::new();
        admins.expect_find_by_email().returning(|_| Ok(Some(admin(true))));
        let mut tokens = MockTokenRepository::new();
        tokens.expect_store().never();

        let service = AuthService::new(Arc::new(admins), Arc::new(tokens));
        let err = service.admin_login(credentials("wrong-password")).await.unwrap_err();
        assert!(err.field_errors().unwrap().contains_key("email"));
    }

    #[tokio::test]
    async fn test_deactivated_admin_cannot_login() {
        let mut admins = MockAdminRepository::new();
        admins.expect_find_by_email().returning(|_| Ok(Some(admin(false))));
        let service = AuthService::new(Arc::new(admins), Arc::new(MockTokenRepository::new()));

        let err = service.admin_login(credentials("password123")).await.unwrap_err();
        assert!(matches!(err, DomainError::ValidationFailed(_)));
    }

    #[tokio::test]
    async fn test_unknown_token_is_unauthorized() {
        let mut tokens = MockTokenRepository::new();
        tokens.expect_find().returning(|_| Ok(None));
        let service = AuthService::new(Arc::new(MockAdminRepository::new()), Arc::new(tokens));

        assert!(matches!(service.authenticate("nope").await, Err(DomainError::Unauthorized)));
    }

    #[test]
    fn test_tenant_user_session_is_bound_to_its_tenant() {
        let session = AuthSession {
            identity: Identity::TenantUser { tenant_id: "acme".into(), user_id: 4 },
            token_hash: "h".into(),
        };
        assert_eq!(session.require_tenant_user("acme").unwrap(), 4);
        assert!(matches!(session.require_tenant_user("beta"), Err(DomainError::Unauthorized)));
        assert!(matches!(session.require_admin(), Err(DomainError::Forbidden(_))));
    }
}
