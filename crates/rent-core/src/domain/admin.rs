//! Central admin domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,

    // Audit fields
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Admin {
    pub fn new(name: &str, email: &str, password_hash: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            email: email.trim().to_lowercase(),
            password_hash,
            role: "admin".to_string(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn can_login(&self) -> bool {
        self.is_active
    }
}

/// Email + password login payload, shared by admins and tenant users.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Credentials {
    #[validate(email(message = "The email must be a valid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "The password field is required"))]
    pub password: String,
}
