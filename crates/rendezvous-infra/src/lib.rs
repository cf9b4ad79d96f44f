//! Infrastructure layer for Rendezvous.
//!
//! Contains implementations of the traits defined in `rendezvous-core`:
//! SQLite storage, the local attachment store, the OpenAI-compatible
//! assistant client, VADER sentiment scoring, and credential hashing
//! (Argon2id passwords, SHA-256 token digests). Also loads `config.toml`.

pub mod config;
pub mod crypto;
pub mod filesystem;
pub mod llm;
pub mod sentiment;
pub mod sqlite;
pub mod storage;
