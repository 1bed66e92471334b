//! Floor domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floor {
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

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewFloor {
    pub floor_number: i32,

    #[validate(length(max = 255, message = "The name may not be greater than 255 characters"))]
    pub name: Option<String>,

    pub description: Option<String>,

    #[serde(default)]
    #[validate(range(min = 0, message = "The total flats must be at least 0"))]
    pub total_flats: i32,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct FloorChanges {
    pub floor_number: Option<i32>,
    #[validate(length(max = 255, message = "The name may not be greater than 255 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0, message = "The total flats must be at least 0"))]
    pub total_flats: Option<i32>,
    pub is_active: Option<bool>,
}

impl Floor {
    pub fn apply(&mut self, changes: FloorChanges) {
        if let Some(v) = changes.floor_number {
            self.floor_number = v;
        }
        if changes.name.is_some() {
            self.name = changes.name;
        }
        if changes.description.is_some() {
            self.description = changes.description;
        }
        if let Some(v) = changes.total_flats {
            self.total_flats = v;
        }
        if let Some(v) = changes.is_active {
            self.is_active = v;
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FloorFilter {
    pub is_active: Option<bool>,
}

impl FloorFilter {
    pub fn matches(&self, floor: &Floor) -> bool {
        self.is_active.map_or(true, |active| floor.is_active == active)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorSummary {
    #[serde(flatten)]
    pub floor: Floor,
    pub flats_count: i64,
}
