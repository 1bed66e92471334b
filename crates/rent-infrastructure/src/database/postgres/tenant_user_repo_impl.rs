// ============================================================================
// Rent Infrastructure - PostgreSQL Tenant User Repository
// File: crates/rent-infrastructure/src/database/postgres/tenant_user_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use sqlx::{FromRow, PgPool};
use tracing::info;

use rent_core::domain::{TenantUser, TenantUserFilter, TenantUserStatus};
use rent_core::error::DomainError;
use rent_core::repositories::TenantUserRepository;
use rent_shared::{Page, Pagination};

use crate::database::errors::{db_error, like_pattern, write_error};

pub struct PgTenantUserRepository {
    pool: PgPool,
}

impl PgTenantUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TenantUserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub flat_id: Option<i64>,
    pub lease_start: Option<NaiveDate>,
    pub lease_end: Option<NaiveDate>,
    pub monthly_rent: Option<f64>,
    pub security_deposit_paid: Option<f64>,
    pub emergency_contact: Option<Value>,
    pub documents: Option<Value>,
    pub status: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TenantUserRow> for TenantUser {
    fn from(row: TenantUserRow) -> Self {
        TenantUser {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            phone: row.phone,
            flat_id: row.flat_id,
            lease_start: row.lease_start,
            lease_end: row.lease_end,
            monthly_rent: row.monthly_rent,
            security_deposit_paid: row.security_deposit_paid,
            emergency_contact: row.emergency_contact,
            documents: row.documents,
            status: TenantUserStatus::from_str(&row.status).unwrap_or_default(),
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const USER_COLUMNS: &str = "u.id, u.name, u.email, u.password_hash, u.phone, u.flat_id, u.lease_start, \
     u.lease_end, u.monthly_rent, u.security_deposit_paid, u.emergency_contact, u.documents, \
     u.status, u.is_active, u.created_at, u.updated_at";

#[async_trait]
impl TenantUserRepository for PgTenantUserRepository {
    async fn create(&self, user: &TenantUser) -> Result<TenantUser, DomainError> {
        let row: TenantUserRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO tenant_users AS u (name, email, password_hash, phone, flat_id, lease_start,
                                           lease_end, monthly_rent, security_deposit_paid,
                                           emergency_contact, documents, status, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.phone)
        .bind(user.flat_id)
        .bind(user.lease_start)
        .bind(user.lease_end)
        .bind(user.monthly_rent)
        .bind(user.security_deposit_paid)
        .bind(&user.emergency_contact)
        .bind(&user.documents)
        .bind(user.status.as_str())
        .bind(user.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error("creating tenant user", e, &[("tenant_users_email_key", "email", user.email.as_str())]))?;

        info!("Tenant user created: {}", row.id);
        Ok(row.into())
    }

    async fn find(&self, id: i64) -> Result<Option<TenantUser>, DomainError> {
        let row: Option<TenantUserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM tenant_users u WHERE u.id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("finding tenant user", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<TenantUser>, DomainError> {
        let row: Option<TenantUserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM tenant_users u WHERE u.email = LOWER($1)"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| db_error("finding tenant user by email", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn list(&self, filter: &TenantUserFilter, pagination: Pagination) -> Result<Page<TenantUser>, DomainError> {
        let status = filter.status.map(|s| s.as_str());
        let search = like_pattern(filter.search.as_deref());
        const WHERE: &str = r#"
            WHERE ($1::bigint IS NULL OR u.flat_id = $1)
              AND ($2::varchar IS NULL OR u.status = $2)
              AND ($3::boolean IS NULL OR u.is_active = $3)
              AND ($4::varchar IS NULL OR u.name ILIKE $4 OR u.email ILIKE $4 OR u.phone ILIKE $4)
        "#;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM tenant_users u {WHERE}"))
            .bind(filter.flat_id)
            .bind(status)
            .bind(filter.is_active)
            .bind(&search)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("counting tenant users", e))?;

        let rows: Vec<TenantUserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM tenant_users u {WHERE} ORDER BY u.id LIMIT $5 OFFSET $6"
        ))
        .bind(filter.flat_id)
        .bind(status)
        .bind(filter.is_active)
        .bind(&search)
        .bind(pagination.limit() as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing tenant users", e))?;

        let data = rows.into_iter().map(TenantUser::from).collect();
        Ok(Page::new(data, pagination, total as u64))
    }

    async fn list_by_flat(&self, flat_id: i64) -> Result<Vec<TenantUser>, DomainError> {
        let rows: Vec<TenantUserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM tenant_users u WHERE u.flat_id = $1 ORDER BY u.id"))
                .bind(flat_id)
                .fetch_all(&self.pool)
                .await
                .map_err(|e| db_error("listing flat residents", e))?;

        Ok(rows.into_iter().map(TenantUser::from).collect())
    }

    async fn update(&self, user: &TenantUser) -> Result<TenantUser, DomainError> {
        let row: Option<TenantUserRow> = sqlx::query_as(&format!(
            r#"
            UPDATE tenant_users AS u
            SET name = $2, email = $3, password_hash = $4, phone = $5, flat_id = $6,
                lease_start = $7, lease_end = $8, monthly_rent = $9, security_deposit_paid = $10,
                emergency_contact = $11, documents = $12, status = $13, is_active = $14,
                updated_at = NOW()
            WHERE u.id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.phone)
        .bind(user.flat_id)
        .bind(user.lease_start)
        .bind(user.lease_end)
        .bind(user.monthly_rent)
        .bind(user.security_deposit_paid)
        .bind(&user.emergency_contact)
        .bind(&user.documents)
        .bind(user.status.as_str())
        .bind(user.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error("updating tenant user", e, &[("tenant_users_email_key", "email", user.email.as_str())]))?;

        row.map(TenantUser::from)
            .ok_or_else(|| DomainError::not_found("TenantUser", user.id))
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM tenant_users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("deleting tenant user", e))?;
        Ok(result.rows_affected() > 0)
    }
}
