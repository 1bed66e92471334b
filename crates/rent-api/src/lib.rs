//! # Rent API
//!
//! HTTP surface of the HouseRent service: host dispatch, middleware,
//! handlers and the JSON response envelope.

pub mod error;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::{AppState, Backends};
