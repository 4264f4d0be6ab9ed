use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};
use uuid::Uuid;

/// Stores uploaded image files under `<public>/images/` and maps them to
/// `/images/<name>` URL paths.
#[derive(Debug, Clone)]
pub struct UploadStore {
    images_dir: PathBuf,
}

impl UploadStore {
    #[must_use]
    pub fn new(public_dir: &str) -> Self {
        Self {
            images_dir: Path::new(public_dir).join("images"),
        }
    }

    /// Write the uploaded bytes under a fresh random name and return the
    /// relative URL path (`/images/<name>`).
    pub async fn save(&self, original_name: Option<&str>, bytes: &[u8]) -> Result<String> {
        let extension = original_name
            .map(Path::new)
            .and_then(|p| p.extension())
            .and_then(|e| e.to_str())
            .filter(|e| e.chars().all(|c| c.is_ascii_alphanumeric()))
            .map_or_else(|| "jpg".to_string(), str::to_lowercase);

        let filename = format!("{}.{extension}", Uuid::new_v4());

        if !self.images_dir.exists() {
            fs::create_dir_all(&self.images_dir).await?;
        }

        let file_path = self.images_dir.join(&filename);

        fs::write(&file_path, bytes)
            .await
            .with_context(|| format!("Failed to write upload to {}", file_path.display()))?;

        info!(path = %file_path.display(), "Stored uploaded image");

        Ok(format!("/images/{filename}"))
    }

    /// Best-effort removal of a stored file by its `/images/<name>` path.
    /// Failures are logged and swallowed; callers must not let cleanup
    /// change the outcome of the primary operation.
    pub async fn remove(&self, relative_path: &str) {
        let Some(filename) = relative_path.strip_prefix("/images/") else {
            warn!(path = relative_path, "Refusing to delete non-upload path");
            return;
        };

        // Stored names are UUID-based; anything path-like is not ours.
        if filename.is_empty() || filename.contains('/') || filename.contains("..") {
            warn!(path = relative_path, "Refusing to delete suspicious path");
            return;
        }

        let file_path = self.images_dir.join(filename);
        match fs::remove_file(&file_path).await {
            Ok(()) => info!(path = %file_path.display(), "Deleted stored image"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %file_path.display(), error = %e, "Failed to delete stored image"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (UploadStore, PathBuf) {
        let dir = std::env::temp_dir().join(format!("fitcms-uploads-{}", Uuid::new_v4()));
        (UploadStore::new(dir.to_str().unwrap()), dir)
    }

    #[tokio::test]
    async fn test_save_and_remove_round_trip() {
        let (store, dir) = temp_store();

        let relative = store.save(Some("banner.PNG"), b"fake image").await.unwrap();
        assert!(relative.starts_with("/images/"));
        assert!(relative.ends_with(".png"));

        let on_disk = dir.join("images").join(relative.trim_start_matches("/images/"));
        assert!(on_disk.exists());

        store.remove(&relative).await;
        assert!(!on_disk.exists());

        // removing twice is not an error
        store.remove(&relative).await;

        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn test_remove_rejects_foreign_paths() {
        let (store, dir) = temp_store();

        store.remove("/etc/passwd").await;
        store.remove("/images/../escape.txt").await;
        assert!(!dir.exists());
    }
}
