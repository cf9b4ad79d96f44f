//! Attachment store trait.
//!
//! Uploaded chat files are written under a content root and referenced from
//! the message row by their root-relative path.

use rendezvous_types::error::ChatError;

/// Trait for persisting chat attachments.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
/// Implementations live in rendezvous-infra.
pub trait AttachmentStore: Send + Sync {
    /// Write `bytes` under `file_name` and return the path relative to the
    /// content root (e.g., `chat_files/report.pdf`).
    ///
    /// An existing file is never overwritten; the stored name may differ
    /// from `file_name` when it collides.
    fn store(
        &self,
        file_name: &str,
        bytes: &[u8],
    ) -> impl std::future::Future<Output = Result<String, ChatError>> + Send;

    /// Remove a previously stored file by its relative path.
    fn remove(
        &self,
        path: &str,
    ) -> impl std::future::Future<Output = Result<(), ChatError>> + Send;
}

/// Reduce a client-supplied file name to a safe final path component.
///
/// Directory parts (either separator) are dropped. Names that reduce to
/// nothing, `.` or `..` are rejected.
pub fn sanitize_file_name(file_name: &str) -> Result<String, ChatError> {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    let cleaned: String = base.chars().filter(|c| !c.is_control()).collect();

    match cleaned.as_str() {
        "" | "." | ".." => Err(ChatError::Validation(format!(
            "invalid attachment file name: '{file_name}'"
        ))),
        _ => Ok(cleaned),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_plain_name() {
        assert_eq!(sanitize_file_name("report.pdf").unwrap(), "report.pdf");
        assert_eq!(sanitize_file_name("  notes.txt ").unwrap(), "notes.txt");
    }

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize_file_name("../../etc/passwd").unwrap(), "passwd");
        assert_eq!(sanitize_file_name("C:\\Users\\me\\a.png").unwrap(), "a.png");
        assert_eq!(sanitize_file_name("/abs/path/b.txt").unwrap(), "b.txt");
    }

    #[test]
    fn test_sanitize_rejects_empty_and_dots() {
        for bad in ["", "   ", ".", "..", "dir/", "a/..", "\u{0}"] {
            assert!(
                matches!(sanitize_file_name(bad), Err(ChatError::Validation(_))),
                "expected rejection for {bad:?}"
            );
        }
    }
}
