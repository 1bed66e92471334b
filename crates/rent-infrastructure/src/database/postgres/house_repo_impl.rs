// ============================================================================
// Rent Infrastructure - PostgreSQL House Repository
// File: crates/rent-infrastructure/src/database/postgres/house_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

use rent_core::domain::{House, HouseFilter, HouseSummary, NewHouse};
use rent_core::error::DomainError;
use rent_core::repositories::HouseRepository;
use rent_shared::{Page, Pagination};

use crate::database::errors::{db_error, like_pattern};

/// Bound to one tenant schema through the pool's `search_path`.
pub struct PgHouseRepository {
    pool: PgPool,
}

impl PgHouseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct HouseRow {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub description: Option<String>,
    pub total_floors: i32,
    pub amenities: Option<Json<Vec<String>>>,
    pub rules: Option<Json<Vec<String>>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<HouseRow> for House {
    fn from(row: HouseRow) -> Self {
        House {
            id: row.id,
            name: row.name,
            address: row.address,
            city: row.city,
            state: row.state,
            zip_code: row.zip_code,
            country: row.country,
            description: row.description,
            total_floors: row.total_floors,
            amenities: row.amenities.map(|j| j.0),
            rules: row.rules.map(|j| j.0),
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct HouseSummaryRow {
    #[sqlx(flatten)]
    house: HouseRow,
    floors_count: i64,
    flats_count: i64,
}

const HOUSE_COLUMNS: &str = "h.id, h.name, h.address, h.city, h.state, h.zip_code, h.country, \
     h.description, h.total_floors, h.amenities, h.rules, h.is_active, h.created_at, h.updated_at";

#[async_trait]
impl HouseRepository for PgHouseRepository {
    async fn create(&self, house: &NewHouse) -> Result<House, DomainError> {
        let row: HouseRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO houses AS h (name, address, city, state, zip_code, country, description,
                                     total_floors, amenities, rules, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {HOUSE_COLUMNS}
            "#
        ))
        .bind(&house.name)
        .bind(&house.address)
        .bind(&house.city)
        .bind(&house.state)
        .bind(&house.zip_code)
        .bind(&house.country)
        .bind(&house.description)
        .bind(house.total_floors)
        .bind(house.amenities.as_ref().map(Json))
        .bind(house.rules.as_ref().map(Json))
        .bind(house.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("creating house", e))?;

        Ok(row.into())
    }

    async fn find(&self, id: i64) -> Result<Option<House>, DomainError> {
        let row: Option<HouseRow> = sqlx::query_as(&format!("SELECT {HOUSE_COLUMNS} FROM houses h WHERE h.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("finding house", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn list(&self, filter: &HouseFilter, pagination: Pagination) -> Result<Page<HouseSummary>, DomainError> {
        let search = like_pattern(filter.search.as_deref());
        const WHERE: &str = r#"
            WHERE ($1::boolean IS NULL OR h.is_active = $1)
              AND ($2::varchar IS NULL OR h.name ILIKE $2 OR h.address ILIKE $2 OR h.city ILIKE $2)
        "#;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM houses h {WHERE}"))
            .bind(filter.is_active)
            .bind(&search)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("counting houses", e))?;

        let rows: Vec<HouseSummaryRow> = sqlx::query_as(&format!(
            r#"
            SELECT {HOUSE_COLUMNS},
                   (SELECT COUNT(*) FROM floors f WHERE f.house_id = h.id) AS floors_count,
                   (SELECT COUNT(*) FROM flats x WHERE x.house_id = h.id) AS flats_count
            FROM houses h
            {WHERE}
            ORDER BY h.id
            LIMIT $3 OFFSET $4
            "#
        ))
        .bind(filter.is_active)
        .bind(&search)
        .bind(pagination.limit() as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing houses", e))?;

        let data = rows
            .into_iter()
            .map(|r| HouseSummary {
                house: r.house.into(),
                floors_count: r.floors_count,
                flats_count: r.flats_count,
            })
            .collect();
        Ok(Page::new(data, pagination, total as u64))
    }

    async fn update(&self, house: &House) -> Result<House, DomainError> {
        let row: Option<HouseRow> = sqlx::query_as(&format!(
            r#"
            UPDATE houses AS h
            SET name = $2, address = $3, city = $4, state = $5, zip_code = $6, country = $7,
                description = $8, total_floors = $9, amenities = $10, rules = $11,
                is_active = $12, updated_at = NOW()
            WHERE h.id = $1
            RETURNING {HOUSE_COLUMNS}
            "#
        ))
        .bind(house.id)
        .bind(&house.name)
        .bind(&house.address)
        .bind(&house.city)
        .bind(&house.state)
        .bind(&house.zip_code)
        .bind(&house.country)
        .bind(&house.description)
        .bind(house.total_floors)
        .bind(house.amenities.as_ref().map(Json))
        .bind(house.rules.as_ref().map(Json))
        .bind(house.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("updating house", e))?;

        row.map(House::from)
            .ok_or_else(|| DomainError::not_found("House", house.id))
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM houses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("deleting house", e))?;
        Ok(result.rows_affected() > 0)
    }
}
