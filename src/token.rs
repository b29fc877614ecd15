//! Manage json web tokens.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ServerError};

const DEFAULT_AUDIENCE: &str = "ponto";
/// Access token lifetime, in seconds.
pub const EXPIRATION_TIME: u64 = 60 * 15; // 15 minutes.

/// Pieces of information asserted on a JWT.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Claims {
    /// Recipients that the JWT is intended for.
    pub aud: String,
    /// Identifies the expiration time on or after which the JWT must not
    /// be accepted for processing.
    pub exp: u64,
    /// Identifies the time at which the JWT was issued.
    pub iat: u64,
    /// Identifies the organization that issued the JWT.
    pub iss: String,
    /// User ID.
    pub sub: String,
}

/// Manage JWT tokens.
#[derive(Clone)]
pub struct TokenManager {
    encoding: EncodingKey,
    decoding: DecodingKey,
    name: String,
    audience: String,
}

impl TokenManager {
    /// Create a new [`TokenManager`] signing with an HMAC secret.
    pub fn new(name: &str, secret: &str, audience: Option<&str>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            name: name.to_owned(),
            audience: audience.unwrap_or(DEFAULT_AUDIENCE).to_owned(),
        }
    }

    /// Create a new token for a user.
    pub fn create(&self, user_id: i64) -> Result<String> {
        let time = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|err| ServerError::Internal { details: err.to_string() })?
            .as_secs();

        let claims = Claims {
            aud: self.audience.clone(),
            exp: time + EXPIRATION_TIME,
            iat: time,
            iss: self.name.clone(),
            sub: user_id.to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| ServerError::Internal { details: err.to_string() })
    }

    /// Decode and check a token, returning its claims.
    pub fn decode(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.audience]);

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|_| ServerError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_decode() {
        let manager = TokenManager::new("ponto-test", "secret", None);

        let token = manager.create(42).unwrap();
        let claims = manager.decode(&token).unwrap();

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.iss, "ponto-test");
        assert_eq!(claims.aud, DEFAULT_AUDIENCE);
        assert_eq!(claims.exp, claims.iat + EXPIRATION_TIME);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let manager = TokenManager::new("ponto-test", "secret", None);
        let other = TokenManager::new("ponto-test", "another-secret", None);

        let token = manager.create(42).unwrap();
        assert!(matches!(other.decode(&token), Err(ServerError::Unauthorized)));
    }

    #[test]
    fn test_wrong_audience_rejected() {
        let manager = TokenManager::new("ponto-test", "secret", Some("internal"));
        let other = TokenManager::new("ponto-test", "secret", Some("external"));

        let token = manager.create(42).unwrap();
        assert!(matches!(other.decode(&token), Err(ServerError::Unauthorized)));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let manager = TokenManager::new("ponto-test", "secret", None);
        assert!(matches!(manager.decode("a.b.c"), Err(ServerError::Unauthorized)));
    }
}
