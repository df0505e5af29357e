//! Authentication service for management API tokens.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::AppError;
use serde_json::json;

type HmacSha256 = Hmac<Sha256>;

/// Service for authenticating management API requests via Bearer tokens.
///
/// Both the presented and the configured token are hashed with HMAC-SHA256
/// (keyed by `signing_secret`) and the digests are compared in constant time,
/// so neither the token contents nor its length leak through timing.
pub struct AuthService {
    api_token: Option<String>,
    signing_secret: String,
}

impl AuthService {
    /// Creates a new authentication service.
    ///
    /// # Arguments
    ///
    /// - `api_token` - accepted bearer token; `None` disables the management API
    /// - `signing_secret` - HMAC key used for hashing before comparison
    pub fn new(api_token: Option<String>, signing_secret: String) -> Self {
        Self {
            api_token: api_token.filter(|t| !t.is_empty()),
            signing_secret,
        }
    }

    fn mac(&self, token: &str) -> HmacSha256 {
        let mut mac = HmacSha256::new_from_slice(self.signing_secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(token.as_bytes());
        mac
    }

    /// Hashes a raw token with HMAC-SHA256 using the server signing secret.
    ///
    /// Returns a 64-character lowercase hex-encoded MAC.
    fn hash_token(&self, token: &str) -> String {
        hex::encode(self.mac(token).finalize().into_bytes())
    }

    /// Whether a token is configured at all.
    pub fn is_enabled(&self) -> bool {
        self.api_token.is_some()
    }

    /// Authenticates a raw bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if:
    /// - No API token is configured
    /// - The token does not match
    pub async fn authenticate(&self, token: &str) -> Result<(), AppError> {
        let Some(expected) = &self.api_token else {
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Management API is disabled"}),
            ));
        };

        let presented = self.mac(token).finalize().into_bytes();

        if self.mac(expected).verify_slice(&presented).is_err() {
            tracing::warn!("Rejected management API request with invalid token");
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Invalid token"}),
            ));
        }

        Ok(())
    }
}
