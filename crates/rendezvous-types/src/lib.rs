//! Shared domain types for Rendezvous.
//!
//! This crate contains the core domain types used across the Rendezvous
//! backend: users and their settings, conversations, messages, sentiment
//! labels, LLM transcript shapes, configuration, and error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror, secrecy.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod user;
