// ============================================================================
// Rent Infrastructure - PostgreSQL Floor Repository
// File: crates/rent-infrastructure/src/database/postgres/floor_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

use rent_core::domain::{Floor, FloorFilter, FloorSummary, NewFloor};
use rent_core::error::DomainError;
use rent_core::repositories::FloorRepository;

use crate::database::errors::{db_error, write_error};

pub struct PgFloorRepository {
    pool: PgPool,
}

impl PgFloorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct FloorRow {
    pub id: i64,
    pub house_id: i64,
    pub floor_number: i32,
    pub name: Option<String>,
    pub description: Option<String>,
    pub total_flats: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<FloorRow> for Floor {
    fn from(row: FloorRow) -> Self {
        Floor {
            id: row.id,
            house_id: row.house_id,
            floor_number: row.floor_number,
            name: row.name,
            description: row.description,
            total_flats: row.total_flats,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct FloorSummaryRow {
    #[sqlx(flatten)]
    floor: FloorRow,
    flats_count: i64,
}

const FLOOR_COLUMNS: &str =
    "f.id, f.house_id, f.floor_number, f.name, f.description, f.total_flats, f.is_active, f.created_at, f.updated_at";

#[async_trait]
impl FloorRepository for PgFloorRepository {
    async fn create(&self, house_id: i64, floor: &NewFloor) -> Result<Floor, DomainError> {
        let number = floor.floor_number.to_string();
        let row: FloorRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO floors AS f (house_id, floor_number, name, description, total_flats, is_active)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {FLOOR_COLUMNS}
            "#
        ))
        .bind(house_id)
        .bind(floor.floor_number)
        .bind(&floor.name)
        .bind(&floor.description)
        .bind(floor.total_flats)
        .bind(floor.is_active)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            write_error("creating floor", e, &[("floors_house_floor_number_key", "floor_number", number.as_str())])
        })?;

        Ok(row.into())
    }

    async fn find(&self, id: i64) -> Result<Option<Floor>, DomainError> {
        let row: Option<FloorRow> = sqlx::query_as(&format!("SELECT {FLOOR_COLUMNS} FROM floors f WHERE f.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("finding floor", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_number(&self, house_id: i64, floor_number: i32) -> Result<Option<Floor>, DomainError> {
        let row: Option<FloorRow> = sqlx::query_as(&format!(
            "SELECT {FLOOR_COLUMNS} FROM floors f WHERE f.house_id = $1 AND f.floor_number = $2"
        ))
        .bind(house_id)
        .bind(floor_number)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("finding floor by number", e))?;

        Ok(row.map(|r| r.into()))
    }

    async fn list_by_house(&self, house_id: i64, filter: &FloorFilter) -> Result<Vec<FloorSummary>, DomainError> {
        let rows: Vec<FloorSummaryRow> = sqlx::query_as(&format!(
            r#"
            SELECT {FLOOR_COLUMNS},
                   (SELECT COUNT(*) FROM flats x WHERE x.floor_id = f.id) AS flats_count
            FROM floors f
            WHERE f.house_id = $1 AND ($2::boolean IS NULL OR f.is_active = $2)
            ORDER BY f.floor_number
            "#
        ))
        .bind(house_id)
        .bind(filter.is_active)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("listing floors", e))?;

        Ok(rows
            .into_iter()
            .map(|r| FloorSummary { floor: r.floor.into(), flats_count: r.flats_count })
            .collect())
    }

    async fn update(&self, floor: &Floor) -> Result<Floor, DomainError> {
        let number = floor.floor_number.to_string();
        let row: Option<FloorRow> = sqlx::query_as(&format!(
            r#"
            UPDATE floors AS f
            SET floor_number = $2, name = $3, description = $4, total_flats = $5,
                is_active = $6, updated_at = NOW()
            WHERE f.id = $1
            RETURNING {FLOOR_COLUMNS}
            "#
        ))
        .bind(floor.id)
        .bind(floor.floor_number)
        .bind(&floor.name)
        .bind(&floor.description)
        .bind(floor.total_flats)
        .bind(floor.is_active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            write_error("updating floor", e, &[("floors_house_floor_number_key", "floor_number", number.as_str())])
        })?;

        row.map(Floor::from)
            .ok_or_else(|| DomainError::not_found("Floor", floor.id))
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM floors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("deleting floor", e))?;
        Ok(result.rows_affected() > 0)
    }
}
