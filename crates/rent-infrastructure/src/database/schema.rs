// ============================================================================
// Rent Infrastructure - Schema DDL
// File: crates/rent-infrastructure/src/database/schema.rs
// Description: Central tables and the per-tenant schema, both idempotent
// ============================================================================

use sqlx::PgPool;
use tracing::info;

use rent_core::domain::Tenant;
use rent_core::error::DomainError;

use super::errors::db_error;

const CENTRAL_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS tenants (
    id          VARCHAR(63)  PRIMARY KEY,
    name        VARCHAR(255) NOT NULL,
    email       VARCHAR(255) NOT NULL,
    phone       VARCHAR(20),
    address     TEXT,
    owner_name  VARCHAR(255) NOT NULL,
    status      VARCHAR(20)  NOT NULL DEFAULT 'active'
                CHECK (status IN ('active', 'suspended', 'inactive')),
    created_at  TIMESTAMPTZ  NOT NULL DEFAULT NOW(),
    updated_at  TIMESTAMPTZ  NOT NULL DEFAULT NOW(),
    CONSTRAINT tenants_email_key UNIQUE (email)
);

CREATE TABLE IF NOT EXISTS domains (
    id          UUID         PRIMARY KEY,
    domain      VARCHAR(255) NOT NULL,
    tenant_id   VARCHAR(63)  NOT NULL REFERENCES tenants (id) ON DELETE CASCADE,
    created_at  TIMESTAMPTZ  NOT NULL DEFAULT NOW(),
    CONSTRAINT domains_domain_key UNIQUE (domain)
);
CREATE INDEX IF NOT EXISTS domains_tenant_id_idx ON domains (tenant_id);

CREATE TABLE IF NOT EXISTS admins (
    id            UUID         PRIMARY KEY,
    name          VARCHAR(255) NOT NULL,
    email         VARCHAR(255) NOT NULL,
    password_hash TEXT         NOT NULL,
    role          VARCHAR(50)  NOT NULL DEFAULT 'admin',
    is_active     BOOLEAN      NOT NULL DEFAULT TRUE,
    created_at    TIMESTAMPTZ  NOT NULL DEFAULT NOW(),
    updated_at    TIMESTAMPTZ  NOT NULL DEFAULT NOW(),
    CONSTRAINT admins_email_key UNIQUE (email)
);

CREATE TABLE IF NOT EXISTS access_tokens (
    token_hash    CHAR(64)     PRIMARY KEY,
    kind          VARCHAR(20)  NOT NULL CHECK (kind IN ('admin', 'tenant_user')),
    subject       VARCHAR(64)  NOT NULL,
    tenant_id     VARCHAR(63),
    name          VARCHAR(100) NOT NULL,
    created_at    TIMESTAMPTZ  NOT NULL DEFAULT NOW(),
    last_used_at  TIMESTAMPTZ
);
CREATE INDEX IF NOT EXISTS access_tokens_tenant_id_idx ON access_tokens (tenant_id);
"#;

/// Creates the central tables when missing.
pub async fn bootstrap_central_schema(pool: &PgPool) -> Result<(), DomainError> {
    sqlx::raw_sql(CENTRAL_SCHEMA)
        .execute(pool)
        .await
        .map_err(|e| db_error("bootstrapping central schema", e))?;
    info!("Central schema ready");
    Ok(())
}

/// Postgres truncates longer identifiers, which would let two tenants share a schema.
const MAX_IDENTIFIER_BYTES: usize = 63;

/// Schema name for a tenant id: `{prefix}{slug}` with dashes folded to underscores.
pub fn schema_name(prefix: &str, tenant_id: &str) -> Result<String, DomainError> {
    if !Tenant::is_valid_slug(tenant_id) {
        return Err(DomainError::InvalidSlug(tenant_id.to_string()));
    }
    let schema = format!("{}{}", prefix, tenant_id.replace('-', "_"));
    if schema.len() > MAX_IDENTIFIER_BYTES {
        return Err(DomainError::InvalidSlug(tenant_id.to_string()));
    }
    Ok(schema)
}

pub(crate) fn create_schema_sql(schema: &str) -> String {
    format!("CREATE SCHEMA IF NOT EXISTS \"{schema}\"")
}

pub(crate) fn drop_schema_sql(schema: &str) -> String {
    format!("DROP SCHEMA IF EXISTS \"{schema}\" CASCADE")
}

/// Full tenant schema. `tenant_users` is created last and marks completion.
pub(crate) fn tenant_tables_sql(schema: &str) -> String {
    format!(
        r#"
CREATE TABLE IF NOT EXISTS "{schema}".houses (
    id            BIGSERIAL    PRIMARY KEY,
    name          VARCHAR(255) NOT NULL,
    address       TEXT         NOT NULL,
    city          VARCHAR(100) NOT NULL,
    state         VARCHAR(100) NOT NULL,
    zip_code      VARCHAR(20)  NOT NULL,
    country       VARCHAR(100) NOT NULL DEFAULT 'USA',
    description   TEXT,
    total_floors  INTEGER      NOT NULL DEFAULT 1 CHECK (total_floors >= 1),
    amenities     JSONB,
    rules         JSONB,
    is_active     BOOLEAN      NOT NULL DEFAULT TRUE,
    created_at    TIMESTAMPTZ  NOT NULL DEFAULT NOW(),
    updated_at    TIMESTAMPTZ  NOT NULL DEFAULT NOW()
);

CREATE TABLE IF NOT EXISTS "{schema}".floors (
    id            BIGSERIAL    PRIMARY KEY,
    house_id      BIGINT       NOT NULL REFERENCES "{schema}".houses (id) ON DELETE CASCADE,
    floor_number  INTEGER      NOT NULL,
    name          VARCHAR(255),
    description   TEXT,
    total_flats   INTEGER      NOT NULL DEFAULT 0 CHECK (total_flats >= 0),
    is_active     BOOLEAN      NOT NULL DEFAULT TRUE,
    created_at    TIMESTAMPTZ  NOT NULL DEFAULT NOW(),
    updated_at    TIMESTAMPTZ  NOT NULL DEFAULT NOW(),
    CONSTRAINT floors_house_floor_number_key UNIQUE (house_id, floor_number)
);

CREATE TABLE IF NOT EXISTS "{schema}".flats (
    id                BIGSERIAL        PRIMARY KEY,
    house_id          BIGINT           NOT NULL REFERENCES "{schema}".houses (id) ON DELETE CASCADE,
    floor_id          BIGINT           NOT NULL REFERENCES "{schema}".floors (id) ON DELETE CASCADE,
    flat_number       VARCHAR(50)      NOT NULL,
    name              VARCHAR(255),
    type              VARCHAR(20)      NOT NULL
                      CHECK (type IN ('studio', '1bhk', '2bhk', '3bhk', '4bhk', 'penthouse', 'duplex')),
    bedrooms          INTEGER          NOT NULL DEFAULT 1 CHECK (bedrooms >= 0),
    bathrooms         INTEGER          NOT NULL DEFAULT 1 CHECK (bathrooms >= 0),
    size_sqft         INTEGER          CHECK (size_sqft >= 0),
    rent_amount       DOUBLE PRECISION NOT NULL CHECK (rent_amount >= 0),
    security_deposit  DOUBLE PRECISION NOT NULL DEFAULT 0 CHECK (security_deposit >= 0),
    description       TEXT,
    amenities         JSONB,
    status            VARCHAR(20)      NOT NULL DEFAULT 'available'
                      CHECK (status IN ('available', 'occupied', 'maintenance', 'reserved')),
    is_furnished      BOOLEAN          NOT NULL DEFAULT FALSE,
    available_from    DATE,
    created_at        TIMESTAMPTZ      NOT NULL DEFAULT NOW(),
    updated_at        TIMESTAMPTZ      NOT NULL DEFAULT NOW(),
    CONSTRAINT flats_house_floor_flat_number_key UNIQUE (house_id, floor_id, flat_number)
);
CREATE INDEX IF NOT EXISTS flats_status_idx ON "{schema}".flats (status);

CREATE TABLE IF NOT EXISTS "{schema}".tenant_users (
    id                     BIGSERIAL        PRIMARY KEY,
    name                   VARCHAR(255)     NOT NULL,
    email                  VARCHAR(255)     NOT NULL,
    password_hash          TEXT             NOT NULL,
    phone                  VARCHAR(20),
    flat_id                BIGINT           REFERENCES "{schema}".flats (id) ON DELETE SET NULL,
    lease_start            DATE,
    lease_end              DATE,
    monthly_rent           DOUBLE PRECISION,
    security_deposit_paid  DOUBLE PRECISION,
    emergency_contact      JSONB,
    documents              JSONB,
    status                 VARCHAR(20)      NOT NULL DEFAULT 'pending'
                           CHECK (status IN ('active', 'inactive', 'pending', 'terminated')),
    is_active              BOOLEAN          NOT NULL DEFAULT TRUE,
    created_at             TIMESTAMPTZ      NOT NULL DEFAULT NOW(),
    updated_at             TIMESTAMPTZ      NOT NULL DEFAULT NOW(),
    CONSTRAINT tenant_users_email_key UNIQUE (email)
);
CREATE INDEX IF NOT EXISTS tenant_users_flat_id_idx ON "{schema}".tenant_users (flat_id);
"#
    )
}
