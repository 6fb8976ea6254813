//! Argon2id password hashing.
//!
//! Implements the `CredentialHasher` trait from `olivia-core`. Hashes are
//! PHC strings (`$argon2id$v=19$m=19456,t=2,p=1$...`) with a random salt, so
//! parameters travel with each stored hash.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use olivia_core::identity::hasher::CredentialHasher;
use olivia_types::error::AccountError;

/// Argon2id implementation of `CredentialHasher`.
///
/// Uses OWASP recommended parameters: 19 MiB memory, 2 iterations,
/// 1 degree of parallelism.
pub struct Argon2CredentialHasher {
    params: Params,
}

impl Argon2CredentialHasher {
    pub fn new() -> Self {
        Self {
            params: Params::new(19456, 2, 1, None).unwrap_or_default(),
        }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl Default for Argon2CredentialHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialHasher for Argon2CredentialHasher {
    fn hash(&self, password: &str) -> Result<String, AccountError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| AccountError::Hashing)
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };
        self.argon2()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    }
}
