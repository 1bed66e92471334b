// ============================================================================
// Rent Infrastructure - PostgreSQL Access Token Repository
// File: crates/rent-infrastructure/src/database/postgres/token_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use rent_core::domain::{AccessToken, Identity};
use rent_core::error::DomainError;
use rent_core::repositories::TokenRepository;

use crate::database::errors::db_error;

pub struct PgTokenRepository {
    pool: PgPool,
}

impl PgTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Identity is flattened into (kind, subject, tenant_id)
#[derive(Debug, FromRow)]
struct TokenRow {
    pub token_hash: String,
    pub kind: String,
    pub subject: String,
    pub tenant_id: Option<String>,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
}

impl TryFrom<TokenRow> for AccessToken {
    type Error = DomainError;

    fn try_from(row: TokenRow) -> Result<Self, Self::Error> {
        let corrupt = || DomainError::InternalError(format!("malformed token row of kind {}", row.kind));
        let identity = match (row.kind.as_str(), row.tenant_id) {
            ("admin", _) => Identity::Admin {
                admin_id: Uuid::parse_str(&row.subject).map_err(|_| corrupt())?,
            },
            ("tenant_user", Some(tenant_id)) => Identity::TenantUser {
                tenant_id,
                user_id: row.subject.parse().map_err(|_| corrupt())?,
            },
            _ => return Err(corrupt()),
        };
        Ok(AccessToken {
            token_hash: row.token_hash,
            identity,
            name: row.name,
            created_at: row.created_at,
            last_used_at: row.last_used_at,
        })
    }
}

fn identity_columns(identity: &Identity) -> (&'static str, String, Option<&str>) {
    match identity {
        Identity::Admin { admin_id } => ("admin", admin_id.to_string(), None),
        Identity::TenantUser { tenant_id, user_id } => ("tenant_user", user_id.to_string(), Some(tenant_id.as_str())),
    }
}

#[async_trait]
impl TokenRepository for PgTokenRepository {
    async fn store(&self, token: &AccessToken) -> Result<(), DomainError> {
        let (kind, subject, tenant_id) = identity_columns(&token.identity);
        sqlx::query(
            r#"
            INSERT INTO access_tokens (token_hash, kind, subject, tenant_id, name, created_at, last_used_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(&token.token_hash)
        .bind(kind)
        .bind(subject)
        .bind(tenant_id)
        .bind(&token.name)
        .bind(token.created_at)
        .bind(token.last_used_at)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("storing access token", e))?;
        Ok(())
    }

    async fn find(&self, token_hash: &str) -> Result<Option<AccessToken>, DomainError> {
        let row: Option<TokenRow> = sqlx::query_as(
            r#"
            SELECT token_hash, kind, subject, tenant_id, name, created_at, last_used_at
            FROM access_tokens
            WHERE token_hash = $1
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("finding access token", e))?;

        row.map(AccessToken::try_from).transpose()
    }

    async fn touch(&self, token_hash: &str) -> Result<(), DomainError> {
        sqlx::query("UPDATE access_tokens SET last_used_at = NOW() WHERE token_hash = $1")
            .bind(token_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("touching access token", e))?;
        Ok(())
    }

    async fn delete(&self, token_hash: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM access_tokens WHERE token_hash = $1")
            .bind(token_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("deleting access token", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_for_tenant(&self, tenant_id: &str) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM access_tokens WHERE tenant_id = $1")
            .bind(tenant_id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("revoking tenant tokens", e))?;
        Ok(result.rows_affected())
    }
}
