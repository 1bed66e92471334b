// ============================================================================
// Rent Core - Tenant User Entity
// File: crates/rent-core/src/domain/tenant_user.rs
// Description: Residents stored inside a tenant's isolated store
// ============================================================================

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use super::Flat;

fn default_true() -> bool {
    true
}

/// Resident lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenantUserStatus {
    Active,
    Inactive,
    Pending,
    Terminated,
}

impl TenantUserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TenantUserStatus::Active => "active",
            TenantUserStatus::Inactive => "inactive",
            TenantUserStatus::Pending => "pending",
            TenantUserStatus::Terminated => "terminated",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(TenantUserStatus::Active),
            "inactive" => Some(TenantUserStatus::Inactive),
            "pending" => Some(TenantUserStatus::Pending),
            "terminated" => Some(TenantUserStatus::Terminated),
            _ => None,
        }
    }
}

impl Default for TenantUserStatus {
    fn default() -> Self {
        TenantUserStatus::Pending
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub phone: Option<String>,
    pub flat_id: Option<i64>,
    pub lease_start: Option<NaiveDate>,
    pub lease_end: Option<NaiveDate>,
    pub monthly_rent: Option<f64>,
    pub security_deposit_paid: Option<f64>,
    pub emergency_contact: Option<Value>,
    pub documents: Option<Value>,
    pub status: TenantUserStatus,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TenantUser {
    pub fn can_login(&self) -> bool {
        self.is_active
    }

    /// Occupies its flat: active status on an active account.
    pub fn is_occupying(&self) -> bool {
        self.flat_id.is_some() && self.is_active && self.status == TenantUserStatus::Active
    }

    /// `password_hash` is expected to be already hashed by the caller.
    pub fn apply(&mut self, changes: TenantUserChanges, password_hash: Option<String>) {
        if let Some(v) = changes.name {
            self.name = v.trim().to_string();
        }
        if let Some(v) = changes.email {
            self.email = v.trim().to_lowercase();
        }
        if let Some(hash) = password_hash {
            self.password_hash = hash;
        }
        if changes.phone.is_some() {
            self.phone = changes.phone;
        }
        if changes.flat_id.is_some() {
            self.flat_id = changes.flat_id;
        }
        if changes.lease_start.is_some() {
            self.lease_start = changes.lease_start;
        }
        if changes.lease_end.is_some() {
            self.lease_end = changes.lease_end;
        }
        if changes.monthly_rent.is_some() {
            self.monthly_rent = changes.monthly_rent;
        }
        if changes.security_deposit_paid.is_some() {
            self.security_deposit_paid = changes.security_deposit_paid;
        }
        if changes.emergency_contact.is_some() {
            self.emergency_contact = changes.emergency_contact;
        }
        if changes.documents.is_some() {
            self.documents = changes.documents;
        }
        if let Some(v) = changes.status {
            self.status = v;
        }
        if let Some(v) = changes.is_active {
            self.is_active = v;
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewTenantUser {
    #[validate(length(min = 1, max = 255, message = "The name must be between 1 and 255 characters"))]
    pub name: String,

    #[validate(email(message = "The email must be a valid email address"))]
    pub email: String,

    #[validate(length(
        min = 8,
        max = 128,
        message = "The password must be at least 8 characters"
    ))]
    pub password: String,

    #[validate(length(max = 20, message = "The phone may not be greater than 20 characters"))]
    pub phone: Option<String>,

    pub flat_id: Option<i64>,
    pub lease_start: Option<NaiveDate>,
    pub lease_end: Option<NaiveDate>,

    #[validate(range(min = 0.0, message = "The monthly rent must be at least 0"))]
    pub monthly_rent: Option<f64>,

    #[validate(range(min = 0.0, message = "The security deposit paid must be at least 0"))]
    pub security_deposit_paid: Option<f64>,

    pub emergency_contact: Option<Value>,
    pub documents: Option<Value>,

    #[serde(default)]
    pub status: TenantUserStatus,

    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct TenantUserChanges {
    #[validate(length(min = 1, max = 255, message = "The name must be between 1 and 255 characters"))]
    pub name: Option<String>,
    #[validate(email(message = "The email must be a valid email address"))]
    pub email: Option<String>,
    #[validate(length(
        min = 8,
        max = 128,
        message = "The password must be at least 8 characters"
    ))]
    pub password: Option<String>,
    #[validate(length(max = 20, message = "The phone may not be greater than 20 characters"))]
    pub phone: Option<String>,
    pub flat_id: Option<i64>,
    pub lease_start: Option<NaiveDate>,
    pub lease_end: Option<NaiveDate>,
    #[validate(range(min = 0.0, message = "The monthly rent must be at least 0"))]
    pub monthly_rent: Option<f64>,
    #[validate(range(min = 0.0, message = "The security deposit paid must be at least 0"))]
    pub security_deposit_paid: Option<f64>,
    pub emergency_contact: Option<Value>,
    pub documents: Option<Value>,
    pub status: Option<TenantUserStatus>,
    pub is_active: Option<bool>,
}

/// Lease terms required to move a resident into a flat.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FlatAssignment {
    pub flat_id: i64,
    pub lease_start: NaiveDate,
    pub lease_end: NaiveDate,
    #[validate(range(min = 0.0, message = "The monthly rent must be at least 0"))]
    pub monthly_rent: f64,
    #[validate(range(min = 0.0, message = "The security deposit paid must be at least 0"))]
    pub security_deposit_paid: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TenantUserFilter {
    pub flat_id: Option<i64>,
    pub status: Option<TenantUserStatus>,
    pub is_active: Option<bool>,
    /// Substring over name, email and phone.
    pub search: Option<String>,
}

impl TenantUserFilter {
    pub fn matches(&self, user: &TenantUser) -> bool {
        if self.flat_id.is_some() && user.flat_id != self.flat_id {
            return false;
        }
        if self.status.is_some_and(|s| user.status != s) {
            return false;
        }
        if self.is_active.is_some_and(|a| user.is_active != a) {
            return false;
        }
        match self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(needle) => {
                let needle = needle.to_lowercase();
                user.name.to_lowercase().contains(&needle)
                    || user.email.to_lowercase().contains(&needle)
                    || user.phone.as_deref().is_some_and(|p| p.to_lowercase().contains(&needle))
            }
            None => true,
        }
    }
}

/// Resident together with the flat it occupies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantUserDetail {
    #[serde(flatten)]
    pub user: TenantUser,
    pub flat: Option<Flat>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resident() -> TenantUser {
        let now = Utc::now();
        TenantUser {
            id: 1,
            name: "Rita".into(),
            email: "rita@acme.test".into(),
            password_hash: "hash".into(),
            phone: Some("555-0101".into()),
            flat_id: Some(3),
            lease_start: None,
            lease_end: None,
            monthly_rent: None,
            security_deposit_paid: None,
            emergency_contact: None,
            documents: None,
            status: TenantUserStatus::Active,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let json = serde_json::to_value(resident()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["status"], "active");
    }

    #[test]
    fn test_short_password_rejected() {
        let user: NewTenantUser = serde_json::from_value(serde_json::json!({
            "name": "Rita", "email": "rita@acme.test", "password": "short"
        }))
        .unwrap();
        assert_eq!(user.status, TenantUserStatus::Pending);
        let errors = user.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
    }

    #[test]
    fn test_occupancy_and_filter() {
        let mut user = resident();
        assert!(user.is_occupying());
        assert!(TenantUserFilter { search: Some("0101".into()), ..Default::default() }.matches(&user));
        assert!(!TenantUserFilter { flat_id: Some(9), ..Default::default() }.matches(&user));

        user.apply(TenantUserChanges { status: Some(TenantUserStatus::Inactive), ..Default::default() }, None);
        assert!(!user.is_occupying());
        assert_eq!(user.password_hash, "hash");
    }
}
