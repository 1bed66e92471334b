// ============================================================================
// Rent Infrastructure - PostgreSQL Tenant Store Factory
// File: crates/rent-infrastructure/src/database/postgres/store_factory_impl.rs
// Description: One Postgres schema per tenant, opened through a lazy pool
// ============================================================================

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{Executor, PgConnection, PgPool};
use tracing::{error, info, warn};

use rent_core::error::DomainError;
use rent_core::repositories::{TenantStore, TenantStoreFactory};
use rent_shared::config::DatabaseSettings;

use crate::database::connection::tenant_pool;
use crate::database::errors::db_error;
use crate::database::schema::{create_schema_sql, drop_schema_sql, schema_name, tenant_tables_sql};

use super::{PgFlatRepository, PgFloorRepository, PgHouseRepository, PgTenantUserRepository};

pub struct PgTenantStoreFactory {
    central: PgPool,
    settings: DatabaseSettings,
    schema_prefix: String,
}

impl PgTenantStoreFactory {
    pub fn new(central: PgPool, settings: DatabaseSettings, schema_prefix: impl Into<String>) -> Self {
        Self {
            central,
            settings,
            schema_prefix: schema_prefix.into(),
        }
    }

    fn schema(&self, tenant_id: &str) -> Result<String, DomainError> {
        schema_name(&self.schema_prefix, tenant_id)
    }
}

#[async_trait]
impl TenantStoreFactory for PgTenantStoreFactory {
    async fn provision(&self, tenant_id: &str) -> Result<(), DomainError> {
        let schema = self.schema(tenant_id)?;

        // Schema and tables commit together so a half-built store never exists
        let mut tx = self
            .central
            .begin()
            .await
            .map_err(|e| db_error("starting provisioning transaction", e))?;

        let create_schema = create_schema_sql(&schema);
        let create_tables = tenant_tables_sql(&schema);
        let conn: &mut PgConnection = &mut tx;

        conn.execute(sqlx::raw_sql(&create_schema))
            .await
            .map_err(|e| db_error("creating tenant schema", e))?;

        conn.execute(sqlx::raw_sql(&create_tables))
            .await
            .map_err(|e| db_error("creating tenant tables", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("committing tenant schema", e))?;

        info!("Provisioned schema {} for tenant {}", schema, tenant_id);
        Ok(())
    }

    async fn open(&self, tenant_id: &str) -> Result<TenantStore, DomainError> {
        if !self.exists(tenant_id).await? {
            warn!("Store missing for tenant {}", tenant_id);
            return Err(DomainError::ProvisioningIncomplete {
                tenant_id: tenant_id.to_string(),
                reason: "tenant schema has not been provisioned".to_string(),
            });
        }

        let schema = self.schema(tenant_id)?;
        let pool = tenant_pool(&self.settings, &schema).map_err(|e| {
            error!("Failed to build pool for tenant {}: {}", tenant_id, e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(TenantStore {
            houses: Arc::new(PgHouseRepository::new(pool.clone())),
            floors: Arc::new(PgFloorRepository::new(pool.clone())),
            flats: Arc::new(PgFlatRepository::new(pool.clone())),
            users: Arc::new(PgTenantUserRepository::new(pool)),
        })
    }

    async fn exists(&self, tenant_id: &str) -> Result<bool, DomainError> {
        let schema = self.schema(tenant_id)?;
        sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM information_schema.tables
                WHERE table_schema = $1 AND table_name = 'tenant_users'
            )
            "#,
        )
        .bind(&schema)
        .fetch_one(&self.central)
        .await
        .map_err(|e| db_error("checking tenant schema", e))
    }

    async fn destroy(&self, tenant_id: &str) -> Result<(), DomainError> {
        let schema = self.schema(tenant_id)?;
        sqlx::raw_sql(&drop_schema_sql(&schema))
            .execute(&self.central)
            .await
            .map_err(|e| db_error("dropping tenant schema", e))?;

        info!("Dropped schema {} for tenant {}", schema, tenant_id);
        Ok(())
    }
}
