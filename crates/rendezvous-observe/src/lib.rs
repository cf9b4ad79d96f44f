//! Observability setup shared by the Rendezvous binaries.

pub mod tracing_setup;
