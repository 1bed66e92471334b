// ============================================================================
// Rent Core - Tenant Entity
// File: crates/rent-core/src/domain/tenant.rs
// Description: Tenant (organization) directory record and its domain bindings
// ============================================================================

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use rent_shared::constants::MAX_SLUG_LENGTH;

static SLUG_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9-]+$").expect("valid slug regex"));

/// Tenant status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenantStatus {
    Active,
    Suspended,
    Inactive,
}

impl TenantStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TenantStatus::Active => "active",
            TenantStatus::Suspended => "suspended",
            TenantStatus::Inactive => "inactive",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(TenantStatus::Active),
            "suspended" => Some(TenantStatus::Suspended),
            "inactive" => Some(TenantStatus::Inactive),
            _ => None,
        }
    }
}

impl Default for TenantStatus {
    fn default() -> Self {
        TenantStatus::Active
    }
}

impl std::fmt::Display for TenantStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Hostname bound to exactly one tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantDomain {
    pub id: Uuid,
    pub domain: String,
    pub tenant_id: String,
    pub created_at: DateTime<Utc>,
}

impl TenantDomain {
    pub fn new(domain: &str, tenant_id: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            domain: domain.trim().to_lowercase(),
            tenant_id: tenant_id.to_string(),
            created_at: Utc::now(),
        }
    }
}

/// Registration / profile attributes supplied by an admin
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TenantAttributes {
    #[validate(length(min = 1, max = 255, message = "The name must be between 1 and 255 characters"))]
    pub name: String,

    #[validate(email(message = "The email must be a valid email address"))]
    pub email: String,

    #[validate(length(max = 20, message = "The phone may not be greater than 20 characters"))]
    pub phone: Option<String>,

    pub address: Option<String>,

    #[validate(length(min = 1, max = 255, message = "The owner name must be between 1 and 255 characters"))]
    pub owner_name: String,
}

/// Partial tenant update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct TenantChanges {
    #[validate(length(min = 1, max = 255, message = "The name must be between 1 and 255 characters"))]
    pub name: Option<String>,

    #[validate(email(message = "The email must be a valid email address"))]
    pub email: Option<String>,

    #[validate(length(max = 20, message = "The phone may not be greater than 20 characters"))]
    pub phone: Option<String>,

    pub address: Option<String>,

    #[validate(length(min = 1, max = 255, message = "The owner name must be between 1 and 255 characters"))]
    pub owner_name: Option<String>,

    pub status: Option<TenantStatus>,
}

/// Tenant directory record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub owner_name: String,
    pub status: TenantStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub domains: Vec<TenantDomain>,
}

impl Tenant {
    pub fn new(id: &str, attrs: TenantAttributes) -> Self {
        let now = Utc::now();
        Self {
            id: id.trim().to_string(),
            name: attrs.name.trim().to_string(),
            email: attrs.email.trim().to_lowercase(),
            phone: attrs.phone.map(|p| p.trim().to_string()),
            address: attrs.address.map(|a| a.trim().to_string()),
            owner_name: attrs.owner_name.trim().to_string(),
            status: TenantStatus::Active,
            created_at: now,
            updated_at: now,
            domains: Vec::new(),
        }
    }

    pub fn with_status(mut self, status: TenantStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_valid_slug(slug: &str) -> bool {
        slug.len() <= MAX_SLUG_LENGTH && SLUG_PATTERN.is_match(slug)
    }

    pub fn is_active(&self) -> bool {
        self.status == TenantStatus::Active
    }

    pub fn apply(&mut self, changes: TenantChanges) {
        if let Some(name) = changes.name {
            self.name = name.trim().to_string();
        }
        if let Some(email) = changes.email {
            self.email = email.trim().to_lowercase();
        }
        if let Some(phone) = changes.phone {
            self.phone = Some(phone.trim().to_string());
        }
        if let Some(address) = changes.address {
            self.address = Some(address.trim().to_string());
        }
        if let Some(owner_name) = changes.owner_name {
            self.owner_name = owner_name.trim().to_string();
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
    }
}

/// Admin listing filter
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TenantFilter {
    pub status: Option<TenantStatus>,
    /// Case-insensitive substring over id, name and email.
    pub search: Option<String>,
}

impl TenantFilter {
    pub fn matches(&self, tenant: &Tenant) -> bool {
        if let Some(status) = self.status {
            if tenant.status != status {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(needle) => {
                let needle = needle.to_lowercase();
                [&tenant.id, &tenant.name, &tenant.email]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
            }
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs() -> TenantAttributes {
        TenantAttributes {
            name: " Acme Rentals ".to_string(),
            email: "A@Acme.test".to_string(),
            phone: None,
            address: Some("1 Main St".to_string()),
            owner_name: "Ann Owner".to_string(),
        }
    }

    #[test]
    fn test_slug_pattern() {
        assert!(Tenant::is_valid_slug("acme"));
        assert!(Tenant::is_valid_slug("acme-2"));
        assert!(!Tenant::is_valid_slug("Acme"));
        assert!(!Tenant::is_valid_slug("acme_2"));
        assert!(!Tenant::is_valid_slug("acme.test"));
        assert!(!Tenant::is_valid_slug(""));
    }

    #[test]
    fn test_slug_fits_one_dns_label() {
        assert!(Tenant::is_valid_slug(&"a".repeat(MAX_SLUG_LENGTH)));
        assert!(!Tenant::is_valid_slug(&"a".repeat(MAX_SLUG_LENGTH + 1)));
    }

    #[test]
    fn test_new_tenant_is_active_and_normalized() {
        let tenant = Tenant::new("acme", attrs());
        assert_eq!(tenant.name, "Acme Rentals");
        assert_eq!(tenant.email, "a@acme.test");
        assert!(tenant.is_active());
        assert!(tenant.domains.is_empty());
    }

    #[test]
    fn test_attribute_validation() {
        let mut bad = attrs();
        bad.email = "not-an-email".to_string();
        bad.owner_name = String::new();
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("owner_name"));
    }

    #[test]
    fn test_apply_changes() {
        let mut tenant = Tenant::new("acme", attrs());
        tenant.apply(TenantChanges {
            status: Some(TenantStatus::Suspended),
            phone: Some("555".to_string()),
            ..Default::default()
        });
        assert_eq!(tenant.status, TenantStatus::Suspended);
        assert_eq!(tenant.phone.as_deref(), Some("555"));
        assert_eq!(tenant.name, "Acme Rentals");
    }

    #[test]
    fn test_filter_matches() {
        let tenant = Tenant::new("acme", attrs());
        assert!(TenantFilter::default().matches(&tenant));
        assert!(TenantFilter { search: Some("ACME".into()), ..Default::default() }.matches(&tenant));
        assert!(!TenantFilter { status: Some(TenantStatus::Inactive), ..Default::default() }.matches(&tenant));
    }
}
