//! Attachment storage on the local filesystem.

pub mod filesystem;
