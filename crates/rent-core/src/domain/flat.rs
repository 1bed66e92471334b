// ============================================================================
// Rent Core - Flat Entity
// File: crates/rent-core/src/domain/flat.rs
// ============================================================================

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{Floor, House, TenantUser};

/// Flat layout enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlatType {
    #[serde(rename = "studio")]
    Studio,
    #[serde(rename = "1bhk")]
    OneBhk,
    #[serde(rename = "2bhk")]
    TwoBhk,
    #[serde(rename = "3bhk")]
    ThreeBhk,
    #[serde(rename = "4bhk")]
    FourBhk,
    #[serde(rename = "penthouse")]
    Penthouse,
    #[serde(rename = "duplex")]
    Duplex,
}

impl FlatType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlatType::Studio => "studio",
            FlatType::OneBhk => "1bhk",
            FlatType::TwoBhk => "2bhk",
            FlatType::ThreeBhk => "3bhk",
            FlatType::FourBhk => "4bhk",
            FlatType::Penthouse => "penthouse",
            FlatType::Duplex => "duplex",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "studio" => Some(FlatType::Studio),
            "1bhk" => Some(FlatType::OneBhk),
            "2bhk" => Some(FlatType::TwoBhk),
            "3bhk" => Some(FlatType::ThreeBhk),
            "4bhk" => Some(FlatType::FourBhk),
            "penthouse" => Some(FlatType::Penthouse),
            "duplex" => Some(FlatType::Duplex),
            _ => None,
        }
    }
}

/// Flat occupancy status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlatStatus {
    Available,
    Occupied,
    Maintenance,
    Reserved,
}

impl FlatStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlatStatus::Available => "available",
            FlatStatus::Occupied => "occupied",
            FlatStatus::Maintenance => "maintenance",
            FlatStatus::Reserved => "reserved",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "available" => Some(FlatStatus::Available),
            "occupied" => Some(FlatStatus::Occupied),
            "maintenance" => Some(FlatStatus::Maintenance),
            "reserved" => Some(FlatStatus::Reserved),
            _ => None,
        }
    }
}

impl Default for FlatStatus {
    fn default() -> Self {
        FlatStatus::Available
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flat {
    pub id: i64,
    pub house_id: i64,
    pub floor_id: i64,
    pub flat_number: String,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub flat_type: FlatType,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub size_sqft: Option<i32>,
    pub rent_amount: f64,
    pub security_deposit: f64,
    pub description: Option<String>,
    pub amenities: Option<Vec<String>>,
    pub status: FlatStatus,
    pub is_furnished: bool,
    pub available_from: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewFlat {
    pub house_id: i64,
    pub floor_id: i64,

    #[validate(length(min = 1, max = 50, message = "The flat number must be between 1 and 50 characters"))]
    pub flat_number: String,

    #[validate(length(max = 255, message = "The name may not be greater than 255 characters"))]
    pub name: Option<String>,

    #[serde(rename = "type")]
    pub flat_type: FlatType,

    #[validate(range(min = 0, message = "The bedrooms must be at least 0"))]
    pub bedrooms: i32,

    #[validate(range(min = 0, message = "The bathrooms must be at least 0"))]
    pub bathrooms: i32,

    #[validate(range(min = 0, message = "The size must be at least 0"))]
    pub size_sqft: Option<i32>,

    #[validate(range(min = 0.0, message = "The rent amount must be at least 0"))]
    pub rent_amount: f64,

    #[validate(range(min = 0.0, message = "The security deposit must be at least 0"))]
    pub security_deposit: f64,

    pub description: Option<String>,
    pub amenities: Option<Vec<String>>,

    #[serde(default)]
    pub status: FlatStatus,

    #[serde(default)]
    pub is_furnished: bool,

    pub available_from: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct FlatChanges {
    pub house_id: Option<i64>,
    pub floor_id: Option<i64>,
    #[validate(length(min = 1, max = 50, message = "The flat number must be between 1 and 50 characters"))]
    pub flat_number: Option<String>,
    #[validate(length(max = 255, message = "The name may not be greater than 255 characters"))]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub flat_type: Option<FlatType>,
    #[validate(range(min = 0, message = "The bedrooms must be at least 0"))]
    pub bedrooms: Option<i32>,
    #[validate(range(min = 0, message = "The bathrooms must be at least 0"))]
    pub bathrooms: Option<i32>,
    #[validate(range(min = 0, message = "The size must be at least 0"))]
    pub size_sqft: Option<i32>,
    #[validate(range(min = 0.0, message = "The rent amount must be at least 0"))]
    pub rent_amount: Option<f64>,
    #[validate(range(min = 0.0, message = "The security deposit must be at least 0"))]
    pub security_deposit: Option<f64>,
    pub description: Option<String>,
    pub amenities: Option<Vec<String>>,
    pub status: Option<FlatStatus>,
    pub is_furnished: Option<bool>,
    pub available_from: Option<NaiveDate>,
}

impl Flat {
    pub fn apply(&mut self, changes: FlatChanges) {
        if let Some(v) = changes.house_id {
            self.house_id = v;
        }
        if let Some(v) = changes.floor_id {
            self.floor_id = v;
        }
        if let Some(v) = changes.flat_number {
            self.flat_number = v;
        }
        if changes.name.is_some() {
            self.name = changes.name;
        }
        if let Some(v) = changes.flat_type {
            self.flat_type = v;
        }
        if let Some(v) = changes.bedrooms {
            self.bedrooms = v;
        }
        if let Some(v) = changes.bathrooms {
            self.bathrooms = v;
        }
        if changes.size_sqft.is_some() {
            self.size_sqft = changes.size_sqft;
        }
        if let Some(v) = changes.rent_amount {
            self.rent_amount = v;
        }
        if let Some(v) = changes.security_deposit {
            self.security_deposit = v;
        }
        if changes.description.is_some() {
            self.description = changes.description;
        }
        if changes.amenities.is_some() {
            self.amenities = changes.amenities;
        }
        if let Some(v) = changes.status {
            self.status = v;
        }
        if let Some(v) = changes.is_furnished {
            self.is_furnished = v;
        }
        if changes.available_from.is_some() {
            self.available_from = changes.available_from;
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlatFilter {
    pub house_id: Option<i64>,
    pub floor_id: Option<i64>,
    pub status: Option<FlatStatus>,
    #[serde(rename = "type")]
    pub flat_type: Option<FlatType>,
    pub is_furnished: Option<bool>,
    pub min_rent: Option<f64>,
    pub max_rent: Option<f64>,
    pub bedrooms: Option<i32>,
    /// Substring over flat_number, name and description.
    pub search: Option<String>,
}

impl FlatFilter {
    pub fn available_in(house_id: Option<i64>) -> Self {
        Self {
            house_id,
            status: Some(FlatStatus::Available),
            ..Default::default()
        }
    }

    pub fn matches(&self, flat: &Flat) -> bool {
        if self.house_id.is_some_and(|id| flat.house_id != id) {
            return false;
        }
        if self.floor_id.is_some_and(|id| flat.floor_id != id) {
            return false;
        }
        if self.status.is_some_and(|s| flat.status != s) {
            return false;
        }
        if self.flat_type.is_some_and(|t| flat.flat_type != t) {
            return false;
        }
        if self.is_furnished.is_some_and(|f| flat.is_furnished != f) {
            return false;
        }
        if self.min_rent.is_some_and(|min| flat.rent_amount < min) {
            return false;
        }
        if self.max_rent.is_some_and(|max| flat.rent_amount > max) {
            return false;
        }
        if self.bedrooms.is_some_and(|b| flat.bedrooms != b) {
            return false;
        }
        match self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(needle) => {
                let needle = needle.to_lowercase();
                flat.flat_number.to_lowercase().contains(&needle)
                    || flat.name.as_deref().is_some_and(|n| n.to_lowercase().contains(&needle))
                    || flat
                        .description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            }
            None => true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlatStatusUpdate {
    pub status: FlatStatus,
}

/// Flat with its house, floor and residents loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlatDetail {
    #[serde(flatten)]
    pub flat: Flat,
    pub house: Option<House>,
    pub floor: Option<Floor>,
    pub tenant_users: Vec<TenantUser>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_type_wire_names() {
        let json = serde_json::to_string(&FlatType::TwoBhk).unwrap();
        assert_eq!(json, "\"2bhk\"");
        let parsed: FlatType = serde_json::from_str("\"penthouse\"").unwrap();
        assert_eq!(parsed, FlatType::Penthouse);
        assert_eq!(FlatType::from_str("1bhk"), Some(FlatType::OneBhk));
        assert!(serde_json::from_str::<FlatType>("\"castle\"").is_err());
    }

    #[test]
    fn test_new_flat_defaults() {
        let flat: NewFlat = serde_json::from_value(serde_json::json!({
            "house_id": 1, "floor_id": 1, "flat_number": "101", "type": "2bhk",
            "bedrooms": 2, "bathrooms": 1, "rent_amount": 2000, "security_deposit": 4000
        }))
        .unwrap();
        assert_eq!(flat.status, FlatStatus::Available);
        assert!(!flat.is_furnished);
        assert!(flat.validate().is_ok());
    }

    #[test]
    fn test_negative_rent_rejected() {
        let flat: NewFlat = serde_json::from_value(serde_json::json!({
            "house_id": 1, "floor_id": 1, "flat_number": "101", "type": "studio",
            "bedrooms": 0, "bathrooms": 1, "rent_amount": -5, "security_deposit": 0
        }))
        .unwrap();
        let errors = flat.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("rent_amount"));
    }
}
