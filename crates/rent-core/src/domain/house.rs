//! House domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{Flat, Floor};

fn default_country() -> String {
    "USA".to_string()
}

fn default_total_floors() -> i32 {
    1
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct House {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub description: Option<String>,
    pub total_floors: i32,
    pub amenities: Option<Vec<String>>,
    pub rules: Option<Vec<String>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewHouse {
    #[validate(length(min = 1, max = 255, message = "The name must be between 1 and 255 characters"))]
    pub name: String,

    #[validate(length(min = 1, message = "The address field is required"))]
    pub address: String,

    #[validate(length(min = 1, max = 100, message = "The city must be between 1 and 100 characters"))]
    pub city: String,

    #[validate(length(min = 1, max = 100, message = "The state must be between 1 and 100 characters"))]
    pub state: String,

    #[validate(length(min = 1, max = 20, message = "The zip code must be between 1 and 20 characters"))]
    pub zip_code: String,

    #[serde(default = "default_country")]
    #[validate(length(min = 1, max = 100, message = "The country must be between 1 and 100 characters"))]
    pub country: String,

    pub description: Option<String>,

    #[serde(default = "default_total_floors")]
    #[validate(range(min = 1, message = "The total floors must be at least 1"))]
    pub total_floors: i32,

    pub amenities: Option<Vec<String>>,
    pub rules: Option<Vec<String>>,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct HouseChanges {
    #[validate(length(min = 1, max = 255, message = "The name must be between 1 and 255 characters"))]
    pub name: Option<String>,
    #[validate(length(min = 1, message = "The address may not be empty"))]
    pub address: Option<String>,
    #[validate(length(min = 1, max = 100, message = "The city must be between 1 and 100 characters"))]
    pub city: Option<String>,
    #[validate(length(min = 1, max = 100, message = "The state must be between 1 and 100 characters"))]
    pub state: Option<String>,
    #[validate(length(min = 1, max = 20, message = "The zip code must be between 1 and 20 characters"))]
    pub zip_code: Option<String>,
    #[validate(length(min = 1, max = 100, message = "The country must be between 1 and 100 characters"))]
    pub country: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 1, message = "The total floors must be at least 1"))]
    pub total_floors: Option<i32>,
    pub amenities: Option<Vec<String>>,
    pub rules: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

impl House {
    pub fn apply(&mut self, changes: HouseChanges) {
        if let Some(v) = changes.name {
            self.name = v;
        }
        if let Some(v) = changes.address {
            self.address = v;
        }
        if let Some(v) = changes.city {
            self.city = v;
        }
        if let Some(v) = changes.state {
            self.state = v;
        }
        if let Some(v) = changes.zip_code {
            self.zip_code = v;
        }
        if let Some(v) = changes.country {
            self.country = v;
        }
        if changes.description.is_some() {
            self.description = changes.description;
        }
        if let Some(v) = changes.total_floors {
            self.total_floors = v;
        }
        if changes.amenities.is_some() {
            self.amenities = changes.amenities;
        }
        if changes.rules.is_some() {
            self.rules = changes.rules;
        }
        if let Some(v) = changes.is_active {
            self.is_active = v;
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HouseFilter {
    /// Substring over name, address and city.
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

impl HouseFilter {
    pub fn matches(&self, house: &House) -> bool {
        if let Some(active) = self.is_active {
            if house.is_active != active {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(needle) => {
                let needle = needle.to_lowercase();
                [&house.name, &house.address, &house.city]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            }
            None => true,
        }
    }
}

/// Listing row with relation counts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HouseSummary {
    #[serde(flatten)]
    pub house: House,
    pub floors_count: i64,
    pub flats_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloorWithFlats {
    #[serde(flatten)]
    pub floor: Floor,
    pub flats: Vec<Flat>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HouseDetail {
    #[serde(flatten)]
    pub house: House,
    pub floors: Vec<FloorWithFlats>,
    pub floors_count: i64,
    pub flats_count: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseStatistics {
    pub total_floors: i64,
    pub total_flats: i64,
    pub available_flats: i64,
    pub occupied_flats: i64,
    pub maintenance_flats: i64,
    pub reserved_flats: i64,
    pub total_rent_potential: f64,
    pub occupied_rent_amount: f64,
}
