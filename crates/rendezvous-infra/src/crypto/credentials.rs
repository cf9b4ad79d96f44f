//! Credential hashing for user passwords and API tokens.
//!
//! Implements the `CredentialHasher` trait from `rendezvous-core`:
//! - passwords: Argon2id PHC strings with a random 16-byte salt
//! - tokens: `rdv_` + 32 random bytes (hex), stored as a SHA-256 hex digest
//!
//! SECURITY: Error values never contain the password or token.

use aes_gcm::aead::OsRng;
use aes_gcm::aead::rand_core::RngCore;
use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use sha2::{Digest, Sha256};

use rendezvous_core::service::hash::CredentialHasher;
use rendezvous_types::error::UserError;

/// Prefix of every plaintext API token.
pub const TOKEN_PREFIX: &str = "rdv_";

/// Random bytes per token (hex-encoded to 64 characters).
const TOKEN_BYTES: usize = 32;

/// Salt bytes per password hash.
const SALT_BYTES: usize = 16;

/// Argon2id + SHA-256 implementation of `CredentialHasher`.
#[derive(Clone, Default)]
pub struct Argon2CredentialHasher {
    argon2: Argon2<'static>,
}

impl Argon2CredentialHasher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialHasher for Argon2CredentialHasher {
    fn hash_password(&self, password: &str) -> Result<String, UserError> {
        let mut salt_bytes = [0u8; SALT_BYTES];
        OsRng.fill_bytes(&mut salt_bytes);
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| UserError::Hashing(e.to_string()))?;

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserError::Hashing(e.to_string()))
    }

    fn verify_password(&self, password: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => self
                .argon2
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    fn generate_token(&self) -> String {
        let mut bytes = [0u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        format!("{TOKEN_PREFIX}{}", to_hex(&bytes))
    }

    fn hash_token(&self, token: &str) -> String {
        let digest = Sha256::digest(token.as_bytes());
        format!("{:x}", digest)
    }
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
