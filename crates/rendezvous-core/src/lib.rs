//! Business logic and repository trait definitions for Rendezvous.
//!
//! This crate defines the "ports" (repository, storage, provider traits)
//! that the infrastructure layer implements. It depends only on
//! `rendezvous-types` -- never on `rendezvous-infra` or any database/IO crate.

pub mod chat;
pub mod llm;
pub mod repository;
pub mod service;
pub mod storage;
