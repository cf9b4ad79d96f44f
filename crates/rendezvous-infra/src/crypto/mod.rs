//! Cryptographic operations for Rendezvous.
//!
//! - `credentials`: Argon2id password hashing, random API tokens, SHA-256 token digests

pub mod credentials;
