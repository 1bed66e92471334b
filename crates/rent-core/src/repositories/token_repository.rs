//! Access token repository trait (port)

use async_trait::async_trait;

use crate::domain::AccessToken;
use crate::error::DomainError;

/// Central token store. Lookups are by sha256 digest only.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRepository: Send + Sync {
    async fn store(&self, token: &AccessToken) -> Result<(), DomainError>;
    async fn find(&self, token_hash: &str) -> Result<Option<AccessToken>, DomainError>;
    async fn touch(&self, token_hash: &str) -> Result<(), DomainError>;
    async fn delete(&self, token_hash: &str) -> Result<bool, DomainError>;
    /// Revokes every tenant-user token issued for `tenant_id`.
    async fn delete_for_tenant(&self, tenant_id: &str) -> Result<u64, DomainError>;
}
