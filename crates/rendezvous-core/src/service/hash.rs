//! CredentialHasher trait for password and token handling.
//!
//! Defined in rendezvous-core so services can hash credentials without
//! coupling to a specific algorithm. The `Argon2CredentialHasher` adapter
//! lives in rendezvous-infra.

use rendezvous_types::error::UserError;

/// Abstraction over credential hashing and token generation.
pub trait CredentialHasher: Send + Sync {
    /// Hash a password into a self-describing string (salt included).
    fn hash_password(&self, password: &str) -> Result<String, UserError>;

    /// Check a password against a stored hash. Malformed hashes never verify.
    fn verify_password(&self, password: &str, hash: &str) -> bool;

    /// Generate a new random plaintext API token.
    fn generate_token(&self) -> String;

    /// Deterministic hash of a plaintext token, used as its lookup key.
    fn hash_token(&self, token: &str) -> String;
}
