//! # Rent Core
//!
//! Domain entities, repository ports, tenancy and application services for
//! the HouseRent API.

pub mod domain;
pub mod error;
pub mod repositories;
pub mod services;
pub mod tenancy;

// Re-export domain entities
pub use domain::*;
pub use error::{DomainError, FieldErrors};
