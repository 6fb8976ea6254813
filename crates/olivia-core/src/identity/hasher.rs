//! CredentialHasher trait for password storage.
//!
//! Defined in olivia-core so the account service can hash and verify
//! passwords without coupling to an algorithm. The `Argon2CredentialHasher`
//! adapter lives in olivia-infra.

use olivia_types::error::AccountError;

pub trait CredentialHasher: Send + Sync {
    /// Hash a password into a self-describing string (salt included).
    fn hash(&self, password: &str) -> Result<String, AccountError>;

    /// Check a password against a stored hash. Unparsable hashes never verify.
    fn verify(&self, password: &str, hash: &str) -> bool;
}
