//! Chat pipeline for Rendezvous.
//!
//! - `repository`: persistence trait for conversations and messages
//! - `sentiment`: polarity thresholds over a pluggable scorer
//! - `assistant`: transcript construction and the completion call
//! - `service`: the end-to-end message flow and history queries

pub mod assistant;
pub mod repository;
pub mod sentiment;
pub mod service;
