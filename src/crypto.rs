//! Password hashing with Argon2id.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::config;
use crate::error::{Result, ServerError};

#[derive(Clone, Debug, Default)]
pub struct Crypto {
    params: Params,
}

impl Crypto {
    /// Create a hasher from the optional `argon2` configuration section.
    pub fn new(config: Option<config::Argon2>) -> Result<Self> {
        let params = match config {
            Some(cfg) => Params::new(
                cfg.memory_cost,
                cfg.iterations,
                cfg.parallelism,
                Some(cfg.hash_length),
            )
            .map_err(|err| ServerError::Internal {
                details: format!("invalid argon2 parameters: {err}"),
            })?,
            None => Params::default(),
        };

        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'_> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a password into a PHC string with a fresh salt.
    pub fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| ServerError::Internal {
                details: format!("password hashing failed: {err}"),
            })
    }

    /// Verify a password against a stored PHC string.
    ///
    /// A mismatch and an unreadable stored hash are both reported as
    /// [`ServerError::Unauthorized`]; callers never learn which one.
    pub fn verify(&self, password: &str, stored: &str) -> Result<()> {
        let parsed = PasswordHash::new(stored).map_err(|_| ServerError::Unauthorized)?;

        self.argon2()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| ServerError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crypto() -> Crypto {
        // smaller than production cost, tests only need correctness.
        Crypto::new(Some(config::Argon2 {
            memory_cost: 1024,
            iterations: 2,
            parallelism: 1,
            hash_length: 32,
        }))
        .unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let crypto = crypto();
        let hash = crypto.hash("P$soW%920$n&").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(crypto.verify("P$soW%920$n&", &hash).is_ok());
    }

    #[test]
    fn test_wrong_password_rejected() {
        let crypto = crypto();
        let hash = crypto.hash("P$soW%920$n&").unwrap();

        assert!(matches!(
            crypto.verify("wrong-password", &hash),
            Err(ServerError::Unauthorized)
        ));
    }

    #[test]
    fn test_garbage_stored_hash_rejected() {
        assert!(matches!(
            crypto().verify("whatever", "not-a-phc-string"),
            Err(ServerError::Unauthorized)
        ));
    }
}
