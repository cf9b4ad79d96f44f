//! Local filesystem attachment store.
//!
//! Implements the `AttachmentStore` trait from `rendezvous-core` with files
//! stored at `{content_root}/chat_files/`. Existing files are never
//! overwritten: a name that is already taken gets a short random suffix
//! before its extension.

use std::path::{Path, PathBuf};

use rendezvous_core::storage::attachment::{AttachmentStore, sanitize_file_name};
use rendezvous_types::error::ChatError;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Subdirectory of the content root holding chat attachments.
pub const CHAT_FILES_DIR: &str = "chat_files";

/// Suffixed names tried after the plain name is taken.
const MAX_SUFFIX_ATTEMPTS: usize = 8;

/// Filesystem-backed attachment store.
///
/// Directory layout:
/// ```text
/// {content_root}/chat_files/
///   report.pdf
///   report-1a2b3c4d.pdf
/// ```
#[derive(Debug, Clone)]
pub struct LocalAttachmentStore {
    content_root: PathBuf,
}

impl LocalAttachmentStore {
    /// Create a new store rooted at `content_root`.
    pub fn new(content_root: PathBuf) -> Self {
        Self { content_root }
    }

    fn files_dir(&self) -> PathBuf {
        self.content_root.join(CHAT_FILES_DIR)
    }

    /// Create `dir/name` exclusively and write `bytes` into it.
    ///
    /// Returns `Ok(false)` if the name is already taken.
    async fn write_new(dir: &Path, name: &str, bytes: &[u8]) -> Result<bool, ChatError> {
        let path = dir.join(name);
        let mut file = match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(false),
            Err(e) => {
                return Err(ChatError::Attachment(format!(
                    "failed to create {}: {e}",
                    path.display()
                )));
            }
        };

        let written = async {
            file.write_all(bytes).await?;
            file.flush().await
        }
        .await;

        if let Err(e) = written {
            // Do not leave a truncated file behind.
            let _ = tokio::fs::remove_file(&path).await;
            return Err(ChatError::Attachment(format!(
                "failed to write {}: {e}",
                path.display()
            )));
        }

        Ok(true)
    }
}

/// `notes.txt` -> `notes-1a2b3c4d.txt`; `README` -> `README-1a2b3c4d`.
fn suffixed_name(file_name: &str, suffix: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}-{suffix}.{ext}"),
        _ => format!("{file_name}-{suffix}"),
    }
}

fn random_suffix() -> String {
    // The low bits of a v7 UUID are random.
    let simple = Uuid::now_v7().simple().to_string();
    simple[simple.len() - 8..].to_string()
}

impl AttachmentStore for LocalAttachmentStore {
    async fn store(&self, file_name: &str, bytes: &[u8]) -> Result<String, ChatError> {
        let file_name = sanitize_file_name(file_name)?;
        let dir = self.files_dir();

        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            ChatError::Attachment(format!("failed to create {}: {e}", dir.display()))
        })?;

        if Self::write_new(&dir, &file_name, bytes).await? {
            return Ok(format!("{CHAT_FILES_DIR}/{file_name}"));
        }

        for _ in 0..MAX_SUFFIX_ATTEMPTS {
            let candidate = suffixed_name(&file_name, &random_suffix());
            if Self::write_new(&dir, &candidate, bytes).await? {
                tracing::debug!(requested = %file_name, stored = %candidate, "attachment name taken, stored with suffix");
                return Ok(format!("{CHAT_FILES_DIR}/{candidate}"));
            }
        }

        Err(ChatError::Attachment(format!(
            "could not find a free name for '{file_name}'"
        )))
    }

    async fn remove(&self, path: &str) -> Result<(), ChatError> {
        let name = path
            .strip_prefix(CHAT_FILES_DIR)
            .and_then(|rest| rest.strip_prefix('/'))
            .ok_or_else(|| ChatError::Attachment(format!("not an attachment path: '{path}'")))?;
        let name = sanitize_file_name(name)?;

        match tokio::fs::remove_file(self.files_dir().join(&name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ChatError::Attachment(format!(
                "failed to remove '{path}': {e}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_store_writes_under_chat_files() {
        let dir = tempdir().unwrap();
        let store = LocalAttachmentStore::new(dir.path().to_path_buf());

        let path = store.store("report.pdf", b"%PDF-1.7").await.unwrap();
        assert_eq!(path, "chat_files/report.pdf");

        let on_disk = tokio::fs::read(dir.path().join(&path)).await.unwrap();
        assert_eq!(on_disk, b"%PDF-1.7");
    }

    #[tokio::test]
    async fn test_store_collision_gets_suffix_and_keeps_original() {
        let dir = tempdir().unwrap();
        let store = LocalAttachmentStore::new(dir.path().to_path_buf());

        let first = store.store("notes.txt", b"first").await.unwrap();
        let second = store.store("notes.txt", b"second").await.unwrap();

        assert_eq!(first, "chat_files/notes.txt");
        assert_ne!(first, second);
        assert!(second.starts_with("chat_files/notes-"));
        assert!(second.ends_with(".txt"));

        let original = tokio::fs::read(dir.path().join(&first)).await.unwrap();
        assert_eq!(original, b"first");
        let renamed = tokio::fs::read(dir.path().join(&second)).await.unwrap();
        assert_eq!(renamed, b"second");
    }

    #[tokio::test]
    async fn test_store_strips_directories() {
        let dir = tempdir().unwrap();
        let store = LocalAttachmentStore::new(dir.path().to_path_buf());

        let path = store.store("../../escape.txt", b"x").await.unwrap();
        assert_eq!(path, "chat_files/escape.txt");
        assert!(!dir.path().parent().unwrap().join("escape.txt").exists());
    }

    #[tokio::test]
    async fn test_store_rejects_dot_names() {
        let dir = tempdir().unwrap();
        let store = LocalAttachmentStore::new(dir.path().to_path_buf());

        for bad in ["", "..", "."] {
            let err = store.store(bad, b"x").await.unwrap_err();
            assert!(matches!(err, ChatError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn test_remove() {
        let dir = tempdir().unwrap();
        let store = LocalAttachmentStore::new(dir.path().to_path_buf());

        let path = store.store("a.txt", b"x").await.unwrap();
        store.remove(&path).await.unwrap();
        assert!(!dir.path().join(&path).exists());

        // Removing again is a no-op.
        store.remove(&path).await.unwrap();

        assert!(store.remove("elsewhere/a.txt").await.is_err());
    }

    #[test]
    fn test_suffixed_name() {
        assert_eq!(suffixed_name("notes.txt", "abcd1234"), "notes-abcd1234.txt");
        assert_eq!(suffixed_name("archive.tar.gz", "abcd1234"), "archive.tar-abcd1234.gz");
        assert_eq!(suffixed_name("README", "abcd1234"), "README-abcd1234");
        assert_eq!(suffixed_name(".env", "abcd1234"), ".env-abcd1234");
    }
}
