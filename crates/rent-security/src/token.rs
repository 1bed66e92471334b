//! Opaque bearer tokens.
//!
//! The plaintext token is handed to the client once; only its sha256 digest is stored.

use rand::RngCore;
use sha2::{Digest, Sha256};

use rent_shared::constants::ACCESS_TOKEN_BYTES;

/// A freshly minted token and the digest to persist.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub plain_text: String,
    pub hash: String,
}

pub struct AccessTokenService;

impl AccessTokenService {
    pub fn generate() -> IssuedToken {
        let mut bytes = [0u8; ACCESS_TOKEN_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        let plain_text = hex::encode(bytes);
        let hash = Self::hash(&plain_text);
        IssuedToken { plain_text, hash }
    }

    pub fn hash(plain_text: &str) -> String {
        hex::encode(Sha256::digest(plain_text.as_bytes()))
    }

    /// Pulls the token out of an `Authorization: Bearer <token>` header value.
    pub fn parse_bearer(header_value: &str) -> Option<&str> {
        let (scheme, token) = header_value.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("bearer") {
            return None;
        }
        let token = token.trim();
        (!token.is_empty()).then_some(token)
    }
}
