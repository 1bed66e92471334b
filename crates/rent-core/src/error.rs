//! Domain errors

use std::collections::BTreeMap;

use thiserror::Error;

use crate::tenancy::Rejection;

/// Per-field validation messages, keyed by field name.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("The given data was invalid")]
    ValidationFailed(FieldErrors),

    #[error("Invalid subdomain: {0}")]
    InvalidSlug(String),

    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("Unauthenticated")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Tenant rejected: {0}")]
    TenantRejected(#[from] Rejection),

    #[error("The {field} has already been taken: {value}")]
    Conflict { field: &'static str, value: String },

    #[error("Provisioning incomplete for tenant {tenant_id}: {reason}")]
    ProvisioningIncomplete { tenant_id: String, reason: String },

    #[error("A tenant context is already active for this task")]
    TenantContextActive,

    #[error("No tenant context is active for this task")]
    NoTenantContext,

    #[error("Password hash error: {0}")]
    PasswordHashError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        DomainError::NotFound { resource, id: id.to_string() }
    }

    pub fn conflict(field: &'static str, value: impl Into<String>) -> Self {
        DomainError::Conflict { field, value: value.into() }
    }

    /// Single-field validation failure.
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        let mut fields = FieldErrors::new();
        fields.insert(field.to_string(), vec![message.into()]);
        DomainError::ValidationFailed(fields)
    }

    pub fn invalid_credentials() -> Self {
        Self::invalid("email", "The provided credentials are incorrect.")
    }

    /// Field-level messages, when this error carries any.
    pub fn field_errors(&self) -> Option<FieldErrors> {
        match self {
            DomainError::ValidationFailed(fields) => Some(fields.clone()),
            DomainError::Conflict { field, .. } => {
                let message = format!("The {} has already been taken.", field.replace('_', " "));
                let mut fields = FieldErrors::new();
                fields.insert(field.to_string(), vec![message]);
                Some(fields)
            }
            DomainError::InvalidSlug(_) => {
                let mut fields = FieldErrors::new();
                fields.insert(
                    "subdomain".to_string(),
                    vec!["The subdomain may only contain lowercase letters, numbers and dashes.".to_string()],
                );
                Some(fields)
            }
            _ => None,
        }
    }
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields = FieldErrors::new();
        for (field, errs) in errors.field_errors() {
            let messages = errs
                .iter()
                .map(|e| match &e.message {
                    Some(message) => message.to_string(),
                    None => format!("The {} field is invalid.", field.replace('_', " ")),
                })
                .collect();
            fields.insert(field.to_string(), messages);
        }
        DomainError::ValidationFailed(fields)
    }
}

impl From<rent_security::password::PasswordError> for DomainError {
    fn from(err: rent_security::password::PasswordError) -> Self {
        use rent_security::password::PasswordError;
        match err {
            PasswordError::InvalidLength => {
                Self::invalid("password", "The password must be at least 8 characters")
            }
            other => DomainError::PasswordHashError(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(length(min = 3, message = "too short"))]
        name: String,
    }

    #[test]
    fn test_validation_errors_keep_field_names() {
        let err: DomainError = Probe { name: "ab".into() }.validate().unwrap_err().into();
        let fields = err.field_errors().unwrap();
        assert_eq!(fields["name"], vec!["too short".to_string()]);
    }

    #[test]
    fn test_conflict_reports_its_field() {
        let err = DomainError::conflict("flat_number", "101");
        assert!(err.field_errors().unwrap().contains_key("flat_number"));
        assert!(err.to_string().contains("101"));
    }
}
