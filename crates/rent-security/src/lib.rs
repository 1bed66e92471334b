//! # Rent Security
//! 
//! Security utilities: password hashing and opaque access tokens.

pub mod password;
pub mod token;

pub use password::PasswordService;
pub use token::{AccessTokenService, IssuedToken};
