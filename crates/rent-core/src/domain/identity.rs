//! Authenticated principals and the token records that carry them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who a bearer token belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Identity {
    Admin { admin_id: Uuid },
    TenantUser { tenant_id: String, user_id: i64 },
}

impl Identity {
    pub fn kind(&self) -> &'static str {
        match self {
            Identity::Admin { .. } => "admin",
            Identity::TenantUser { .. } => "tenant_user",
        }
    }

    pub fn tenant_id(&self) -> Option<&str> {
        match self {
            Identity::Admin { .. } => None,
            Identity::TenantUser { tenant_id, .. } => Some(tenant_id),
        }
    }
}

/// Persisted form of an issued token. Only the digest is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessToken {
    pub token_hash: String,
    pub identity: Identity,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    pub fn new(token_hash: String, identity: Identity, name: &str) -> Self {
        Self {
            token_hash,
            identity,
            name: name.to_string(),
            created_at: Utc::now(),
            last_used_at: None,
        }
    }
}
