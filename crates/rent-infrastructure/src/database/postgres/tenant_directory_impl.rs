// ============================================================================
// Rent Infrastructure - PostgreSQL Tenant Directory
// File: crates/rent-infrastructure/src/database/postgres/tenant_directory_impl.rs
// ============================================================================

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{info, warn};
use uuid::Uuid;

use rent_core::domain::{Tenant, TenantDomain, TenantFilter, TenantStatus};
use rent_core::error::DomainError;
use rent_core::repositories::TenantDirectory;
use rent_shared::{Page, Pagination};

use crate::database::errors::{db_error, like_pattern, write_error};

const TENANT_COLUMNS: &str =
    "t.id, t.name, t.email, t.phone, t.address, t.owner_name, t.status, t.created_at, t.updated_at";

pub struct PgTenantDirectory {
    pool: PgPool,
}

impl PgTenantDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Loads domain rows for the given tenants in one query.
    async fn with_domains(&self, rows: Vec<TenantRow>) -> Result<Vec<Tenant>, DomainError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
        let domain_rows: Vec<DomainRow> = sqlx::query_as(
            r#"
            SELECT id, domain, tenant_id, created_at
            FROM domains
            WHERE tenant_id = ANY($1)
            ORDER BY created_at, domain
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("loading tenant domains", e))?;

        let mut by_tenant: HashMap<String, Vec<TenantDomain>> = HashMap::new();
        for row in domain_rows {
            by_tenant.entry(row.tenant_id.clone()).or_default().push(row.into());
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let domains = by_tenant.remove(&row.id).unwrap_or_default();
                let mut tenant: Tenant = row.into();
                tenant.domains = domains;
                tenant
            })
            .collect())
    }

    async fn with_domains_one(&self, row: Option<TenantRow>) -> Result<Option<Tenant>, DomainError> {
        match row {
            Some(row) => Ok(self.with_domains(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }
}

// Internal row types for SQLx mapping
#[derive(Debug, FromRow)]
struct TenantRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub owner_name: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Unrecognised stored statuses are treated as inactive so the host is refused.
fn parse_status(tenant_id: &str, raw: &str) -> TenantStatus {
    TenantStatus::from_str(raw).unwrap_or_else(|| {
        warn!(tenant_id, status = raw, "Unknown tenant status, treating tenant as inactive");
        TenantStatus::Inactive
    })
}

impl From<TenantRow> for Tenant {
    fn from(row: TenantRow) -> Self {
        let status = parse_status(&row.id, &row.status);
        Tenant {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            address: row.address,
            owner_name: row.owner_name,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
            domains: Vec::new(),
        }
    }
}

#[derive(Debug, FromRow)]
struct DomainRow {
    pub id: Uuid,
    pub domain: String,
    pub tenant_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<DomainRow> for TenantDomain {
    fn from(row: DomainRow) -> Self {
        TenantDomain {
            id: row.id,
            domain: row.domain,
            tenant_id: row.tenant_id,
            created_at: row.created_at,
        }
    }
}

fn tenant_conflicts(tenant: &Tenant) -> [(&'static str, &'static str, &str); 2] {
    [
        ("tenants_pkey", "subdomain", tenant.id.as_str()),
        ("tenants_email_key", "email", tenant.email.as_str()),
    ]
}

#[async_trait]
impl TenantDirectory for PgTenantDirectory {
    async fn create(&self, tenant: &Tenant) -> Result<Tenant, DomainError> {
        let row: TenantRow = sqlx::query_as(
            r#"
            INSERT INTO tenants AS t (id, name, email, phone, address, owner_name, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING t.id, t.name, t.email, t.phone, t.address, t.owner_name, t.status, t.created_at, t.updated_at
            "#,
        )
        .bind(&tenant.id)
        .bind(&tenant.name)
        .bind(&tenant.email)
        .bind(&tenant.phone)
        .bind(&tenant.address)
        .bind(&tenant.owner_name)
        .bind(tenant.status.as_str())
        .bind(tenant.created_at)
        .bind(tenant.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error("creating tenant", e, &tenant_conflicts(tenant)))?;

        info!("Tenant created: {}", row.id);
        Ok(row.into())
    }

    async fn create_with_domain(&self, tenant: &Tenant, domain: &TenantDomain) -> Result<Tenant, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("starting registration transaction", e))?;

        let row: TenantRow = sqlx::query_as(
            r#"
            INSERT INTO tenants AS t (id, name, email, phone, address, owner_name, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING t.id, t.name, t.email, t.phone, t.address, t.owner_name, t.status, t.created_at, t.updated_at
            "#,
        )
        .bind(&tenant.id)
        .bind(&tenant.name)
        .bind(&tenant.email)
        .bind(&tenant.phone)
        .bind(&tenant.address)
        .bind(&tenant.owner_name)
        .bind(tenant.status.as_str())
        .bind(tenant.created_at)
        .bind(tenant.updated_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| write_error("creating tenant", e, &tenant_conflicts(tenant)))?;

        let domain_row: DomainRow = sqlx::query_as(
            r#"
            INSERT INTO domains (id, domain, tenant_id, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, domain, tenant_id, created_at
            "#,
        )
        .bind(domain.id)
        .bind(&domain.domain)
        .bind(&domain.tenant_id)
        .bind(domain.created_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            write_error(
                "binding tenant domain",
                e,
                &[("domains_domain_key", "subdomain", tenant.id.as_str())],
            )
        })?;

        // Dropping `tx` on any early return above rolls back both inserts.
        tx.commit()
            .await
            .map_err(|e| db_error("committing registration", e))?;

        info!("Tenant {} registered with domain {}", row.id, domain_row.domain);
        let mut tenant: Tenant = row.into();
        tenant.domains.push(domain_row.into());
        Ok(tenant)
    }

    async fn find(&self, id: &str) -> Result<Option<Tenant>, DomainError> {
        let row: Option<TenantRow> = sqlx::query_as(&format!(
            "SELECT {TENANT_COLUMNS} FROM tenants t WHERE t.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("finding tenant by id", e))?;

        self.with_domains_one(row).await
    }

    async fn find_by_domain(&self, domain: &str) -> Result<Option<Tenant>, DomainError> {
        let row: Option<TenantRow> = sqlx::query_as(&format!(
            "SELECT {TENANT_COLUMNS} FROM tenants t JOIN domains d ON d.tenant_id = t.id WHERE d.domain = $1"
        ))
        .bind(domain)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("finding tenant by domain", e))?;

        self.with_domains_one(row).await
    }

    async fn domain_exists(&self, domain: &str) -> Result<bool, DomainError> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM domains WHERE domain = $1)")
            .bind(domain)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("checking domain", e))
    }

    async fn email_taken(&self, email: &str, except: Option<String>) -> Result<bool, DomainError> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM tenants WHERE email = $1 AND ($2::varchar IS NULL OR id <> $2))",
        )
        .bind(email)
        .bind(except)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("checking tenant email", e))
    }

    async fn list(&self, filter: &TenantFilter, pagination: Pagination) -> Result<Page<Tenant>, DomainError> {
        let status = filter.status.map(|s| s.as_str());
        let search = like_pattern(filter.search.as_deref());
        const WHERE: &str = r#"
            WHERE ($1::varchar IS NULL OR t.status = $1)
              AND ($2::varchar IS NULL OR t.id ILIKE $2 OR t.name ILIKE $2 OR t.email ILIKE $2)
        "#;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM tenants t {WHERE}"))
            .bind(status)
            .bind(&search)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("counting tenants", e))?;

        let rows: Vec<TenantRow> = sqlx::query_as(&format!(
            "SELECT {TENANT_COLUMNS} FROM tenants t {WHERE} ORDER BY t.created_at, t.id LIMIT $3 OFFSET $4"
        ))
        .bind(status)
        .bind(&search)
        .bind(pagination.limit() as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing tenants", e))?;

        let tenants = self.with_domains(rows).await?;
        Ok(Page::new(tenants, pagination, total as u64))
    }

    async fn update(&self, tenant: &Tenant) -> Result<Tenant, DomainError> {
        let row: Option<TenantRow> = sqlx::query_as(
            r#"
            UPDATE tenants AS t
            SET name = $2, email = $3, phone = $4, address = $5, owner_name = $6,
                status = $7, updated_at = NOW()
            WHERE t.id = $1
            RETURNING t.id, t.name, t.email, t.phone, t.address, t.owner_name, t.status, t.created_at, t.updated_at
            "#,
        )
        .bind(&tenant.id)
        .bind(&tenant.name)
        .bind(&tenant.email)
        .bind(&tenant.phone)
        .bind(&tenant.address)
        .bind(&tenant.owner_name)
        .bind(tenant.status.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error("updating tenant", e, &tenant_conflicts(tenant)))?;

        match row {
            Some(row) => Ok(self.with_domains_one(Some(row)).await?.unwrap_or_else(|| tenant.clone())),
            None => Err(DomainError::not_found("Tenant", &tenant.id)),
        }
    }

    async fn update_status(&self, id: &str, status: TenantStatus) -> Result<Tenant, DomainError> {
        let row: Option<TenantRow> = sqlx::query_as(
            r#"
            UPDATE tenants AS t
            SET status = $2, updated_at = NOW()
            WHERE t.id = $1
            RETURNING t.id, t.name, t.email, t.phone, t.address, t.owner_name, t.status, t.created_at, t.updated_at
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("updating tenant status", e))?;

        self.with_domains_one(row)
            .await?
            .ok_or_else(|| DomainError::not_found("Tenant", id))
    }

    async fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("starting tenant deletion", e))?;

        sqlx::query("DELETE FROM domains WHERE tenant_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("deleting tenant domains", e))?;

        let deleted = sqlx::query("DELETE FROM tenants WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("deleting tenant", e))?
            .rows_affected();

        tx.commit()
            .await
            .map_err(|e| db_error("committing tenant deletion", e))?;

        if deleted > 0 {
            info!("Tenant deleted: {}", id);
        }
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: &str) -> TenantRow {
        TenantRow {
            id: "acme".into(),
            name: "Acme".into(),
            email: "a@acme.test".into(),
            phone: None,
            address: None,
            owner_name: "Owner".into(),
            status: status.into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_known_statuses_map_through() {
        assert_eq!(Tenant::from(row("active")).status, TenantStatus::Active);
        assert_eq!(Tenant::from(row("suspended")).status, TenantStatus::Suspended);
    }

    #[test]
    fn test_unknown_status_fails_closed() {
        let tenant = Tenant::from(row("archived"));
        assert_eq!(tenant.status, TenantStatus::Inactive);
        assert!(!tenant.is_active());
    }
}
