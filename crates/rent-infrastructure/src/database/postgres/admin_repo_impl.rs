// ============================================================================
// Rent Infrastructure - PostgreSQL Admin Repository
// File: crates/rent-infrastructure/src/database/postgres/admin_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use rent_core::domain::Admin;
use rent_core::error::DomainError;
use rent_core::repositories::AdminRepository;

use crate::database::errors::{db_error, write_error};

pub struct PgAdminRepository {
    pool: PgPool,
}

impl PgAdminRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct AdminRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AdminRow> for Admin {
    fn from(row: AdminRow) -> Self {
        Admin {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            role: row.role,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl AdminRepository for PgAdminRepository {
    async fn find_by_id(&self, id: &Uuid) -> Result<Option<Admin>, DomainError> {
        let row: Option<AdminRow> = sqlx::query_as(
            r#"
            SELECT id, name, email, password_hash, role, is_active, created_at, updated_at
            FROM admins
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("finding admin by id", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, DomainError> {
        let row: Option<AdminRow> = sqlx::query_as(
            r#"
            SELECT id, name, email, password_hash, role, is_active, created_at, updated_at
            FROM admins
            WHERE email = LOWER($1)
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("finding admin by email", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn create(&self, admin: &Admin) -> Result<Admin, DomainError> {
        let row: AdminRow = sqlx::query_as(
            r#"
            INSERT INTO admins (id, name, email, password_hash, role, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, name, email, password_hash, role, is_active, created_at, updated_at
            "#,
        )
        .bind(admin.id)
        .bind(&admin.name)
        .bind(&admin.email)
        .bind(&admin.password_hash)
        .bind(&admin.role)
        .bind(admin.is_active)
        .bind(admin.created_at)
        .bind(admin.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error("creating admin", e, &[("admins_email_key", "email", admin.email.as_str())]))?;

        info!("Admin created: {}", row.id);
        Ok(row.into())
    }
}
