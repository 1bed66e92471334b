// ============================================================================
// Rent Infrastructure - PostgreSQL Flat Repository
// File: crates/rent-infrastructure/src/database/postgres/flat_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};

use rent_core::domain::{Flat, FlatFilter, FlatStatus, FlatType, NewFlat};
use rent_core::error::DomainError;
use rent_core::repositories::FlatRepository;
use rent_shared::{Page, Pagination};

use crate::database::errors::{db_error, like_pattern, write_error};

const FLAT_NUMBER_KEY: &str = "flats_house_floor_flat_number_key";

pub struct PgFlatRepository {
    pool: PgPool,
}

impl PgFlatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct FlatRow {
    pub id: i64,
    pub house_id: i64,
    pub floor_id: i64,
    pub flat_number: String,
    pub name: Option<String>,
    #[sqlx(rename = "type")]
    pub flat_type: String,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub size_sqft: Option<i32>,
    pub rent_amount: f64,
    pub security_deposit: f64,
    pub description: Option<String>,
    pub amenities: Option<Json<Vec<String>>>,
    pub status: String,
    pub is_furnished: bool,
    pub available_from: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<FlatRow> for Flat {
    fn from(row: FlatRow) -> Self {
        Flat {
            id: row.id,
            house_id: row.house_id,
            floor_id: row.floor_id,
            flat_number: row.flat_number,
            name: row.name,
            flat_type: FlatType::from_str(&row.flat_type).unwrap_or(FlatType::Studio),
            bedrooms: row.bedrooms,
            bathrooms: row.bathrooms,
            size_sqft: row.size_sqft,
            rent_amount: row.rent_amount,
            security_deposit: row.security_deposit,
            description: row.description,
            amenities: row.amenities.map(|j| j.0),
            status: FlatStatus::from_str(&row.status).unwrap_or_default(),
            is_furnished: row.is_furnished,
            available_from: row.available_from,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const FLAT_COLUMNS: &str = "x.id, x.house_id, x.floor_id, x.flat_number, x.name, x.type, x.bedrooms, \
     x.bathrooms, x.size_sqft, x.rent_amount, x.security_deposit, x.description, x.amenities, \
     x.status, x.is_furnished, x.available_from, x.created_at, x.updated_at";

#[async_trait]
impl FlatRepository for PgFlatRepository {
    async fn create(&self, flat: &NewFlat) -> Result<Flat, DomainError> {
        let row: FlatRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO flats AS x (house_id, floor_id, flat_number, name, type, bedrooms, bathrooms,
                                    size_sqft, rent_amount, security_deposit, description, amenities,
                                    status, is_furnished, available_from)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING {FLAT_COLUMNS}
            "#
        ))
        .bind(flat.house_id)
        .bind(flat.floor_id)
        .bind(&flat.flat_number)
        .bind(&flat.name)
        .bind(flat.flat_type.as_str())
        .bind(flat.bedrooms)
        .bind(flat.bathrooms)
        .bind(flat.size_sqft)
        .bind(flat.rent_amount)
        .bind(flat.security_deposit)
        .bind(&flat.description)
        .bind(flat.amenities.as_ref().map(Json))
        .bind(flat.status.as_str())
        .bind(flat.is_furnished)
        .bind(flat.available_from)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error("creating flat", e, &[(FLAT_NUMBER_KEY, "flat_number", flat.flat_number.as_str())]))?;

        Ok(row.into())
    }

    async fn find(&self, id: i64) -> Result<Option<Flat>, DomainError> {
        let row: Option<FlatRow> = sqlx::query_as(&format!("SELECT {FLAT_COLUMNS} FROM flats x WHERE x.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("finding flat", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_number(&self, house_id: i64, floor_id: i64, flat_number: &str) -> Result<Option<Flat>, DomainError> {
        let row: Option<FlatRow> = sqlx::query_as(&format!(
            "SELECT {FLAT_COLUMNS} FROM flats x WHERE x.house_id = $1 AND x.floor_id = $2 AND x.flat_number = $3"
        ))
        .bind(house_id)
        .bind(floor_id)
        .bind(flat_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("finding flat by number", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn list(&self, filter: &FlatFilter, pagination: Pagination) -> Result<Page<Flat>, DomainError> {
        let status = filter.status.map(|s| s.as_str());
        let flat_type = filter.flat_type.map(|t| t.as_str());
        let search = like_pattern(filter.search.as_deref());
        const WHERE: &str = r#"
            WHERE ($1::bigint IS NULL OR x.house_id = $1)
              AND ($2::bigint IS NULL OR x.floor_id = $2)
              AND ($3::varchar IS NULL OR x.status = $3)
              AND ($4::varchar IS NULL OR x.type = $4)
              AND ($5::boolean IS NULL OR x.is_furnished = $5)
              AND ($6::float8 IS NULL OR x.rent_amount >= $6)
              AND ($7::float8 IS NULL OR x.rent_amount <= $7)
              AND ($8::integer IS NULL OR x.bedrooms = $8)
              AND ($9::varchar IS NULL OR x.flat_number ILIKE $9 OR x.name ILIKE $9 OR x.description ILIKE $9)
        "#;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM flats x {WHERE}"))
            .bind(filter.house_id)
            .bind(filter.floor_id)
            .bind(status)
            .bind(flat_type)
            .bind(filter.is_furnished)
            .bind(filter.min_rent)
            .bind(filter.max_rent)
            .bind(filter.bedrooms)
            .bind(&search)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("counting flats", e))?;

        let rows: Vec<FlatRow> = sqlx::query_as(&format!(
            "SELECT {FLAT_COLUMNS} FROM flats x {WHERE} ORDER BY x.id LIMIT $10 OFFSET $11"
        ))
        .bind(filter.house_id)
        .bind(filter.floor_id)
        .bind(status)
        .bind(flat_type)
        .bind(filter.is_furnished)
        .bind(filter.min_rent)
        .bind(filter.max_rent)
        .bind(filter.bedrooms)
        .bind(&search)
        .bind(pagination.limit() as i64)
        .bind(pagination.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing flats", e))?;

        let data = rows.into_iter().map(Flat::from).collect();
        Ok(Page::new(data, pagination, total as u64))
    }

    async fn list_by_house(&self, house_id: i64) -> Result<Vec<Flat>, DomainError> {
        let rows: Vec<FlatRow> = sqlx::query_as(&format!(
            "SELECT {FLAT_COLUMNS} FROM flats x WHERE x.house_id = $1 ORDER BY x.floor_id, x.flat_number"
        ))
        .bind(house_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing flats of house", e))?;

        Ok(rows.into_iter().map(Flat::from).collect())
    }

    async fn update(&self, flat: &Flat) -> Result<Flat, DomainError> {
        let row: Option<FlatRow> = sqlx::query_as(&format!(
            r#"
            UPDATE flats AS x
            SET house_id = $2, floor_id = $3, flat_number = $4, name = $5, type = $6,
                bedrooms = $7, bathrooms = $8, size_sqft = $9, rent_amount = $10,
                security_deposit = $11, description = $12, amenities = $13, status = $14,
                is_furnished = $15, available_from = $16, updated_at = NOW()
            WHERE x.id = $1
            RETURNING {FLAT_COLUMNS}
            "#
        ))
        .bind(flat.id)
        .bind(flat.house_id)
        .bind(flat.floor_id)
        .bind(&flat.flat_number)
        .bind(&flat.name)
        .bind(flat.flat_type.as_str())
        .bind(flat.bedrooms)
        .bind(flat.bathrooms)
        .bind(flat.size_sqft)
        .bind(flat.rent_amount)
        .bind(flat.security_deposit)
        .bind(&flat.description)
        .bind(flat.amenities.as_ref().map(Json))
        .bind(flat.status.as_str())
        .bind(flat.is_furnished)
        .bind(flat.available_from)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error("updating flat", e, &[(FLAT_NUMBER_KEY, "flat_number", flat.flat_number.as_str())]))?;

        row.map(Flat::from)
            .ok_or_else(|| DomainError::not_found("Flat", flat.id))
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM flats WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("deleting flat", e))?;
        Ok(result.rows_affected() > 0)
    }
}
