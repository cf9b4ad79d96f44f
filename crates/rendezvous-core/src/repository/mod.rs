//! Repository trait definitions (ports).
//!
//! These traits define the storage interface that the infrastructure layer
//! (rendezvous-infra) implements. The core crate never depends on any
//! specific storage technology. The chat repository lives next to the chat
//! pipeline in `crate::chat::repository`.

pub mod user;
