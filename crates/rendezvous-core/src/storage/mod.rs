//! Storage abstractions for Rendezvous.
//!
//! Defines the trait for persisting chat attachments.
//! Implementations live in rendezvous-infra.

pub mod attachment;
