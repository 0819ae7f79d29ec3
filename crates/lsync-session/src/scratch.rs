//! Per-job scratch storage.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// A scratch directory scoped to one job.
///
/// `cleanup` is idempotent and the `Drop` impl removes the directory on any
/// exit path that skipped it, so scratch files never outlive the session.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
    cleaned: bool,
}

impl ScratchDir {
    /// Create `{root}/{tag}`, including missing parents.
    pub async fn create(root: &Path, tag: &str) -> std::io::Result<Self> {
        let path = root.join(tag);
        tokio::fs::create_dir_all(&path).await?;
        debug!("created scratch directory {}", path.display());
        Ok(Self {
            path,
            cleaned: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the directory and everything in it.
    pub async fn cleanup(&mut self) {
        if self.cleaned {
            return;
        }
        if let Err(e) = tokio::fs::remove_dir_all(&self.path).await {
            warn!("failed to remove scratch {}: {}", self.path.display(), e);
        }
        self.cleaned = true;
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if !self.cleaned {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }
}

/// Move a file, falling back to copy-and-delete for cross-device moves.
pub async fn move_file(src: &Path, dst: &Path) -> std::io::Result<()> {
    if let Some(parent) = dst.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    match tokio::fs::rename(src, dst).await {
        Ok(()) => Ok(()),
        Err(e) if is_cross_device_error(&e) => {
            debug!(
                "cross-device rename, copying instead: {} -> {}",
                src.display(),
                dst.display()
            );
            tokio::fs::copy(src, dst).await?;
            tokio::fs::remove_file(src).await
        }
        Err(e) => Err(e),
    }
}

/// EXDEV is error code 18 on Linux/macOS.
fn is_cross_device_error(e: &std::io::Error) -> bool {
    e.raw_os_error() == Some(18)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cleanup_removes_directory_and_contents() {
        let root = tempfile::tempdir().unwrap();
        let mut scratch = ScratchDir::create(root.path(), "job-1").await.unwrap();
        tokio::fs::write(scratch.path().join("artifact.mp4"), b"data")
            .await
            .unwrap();

        scratch.cleanup().await;
        assert!(!root.path().join("job-1").exists());

        // Idempotent.
        scratch.cleanup().await;
    }

    #[tokio::test]
    async fn test_drop_removes_directory() {
        let root = tempfile::tempdir().unwrap();
        let path;
        {
            let scratch = ScratchDir::create(root.path(), "job-2").await.unwrap();
            path = scratch.path().to_path_buf();
            tokio::fs::write(path.join("partial.mp4"), b"x").await.unwrap();
        }
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_move_file_same_device() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("a.mp4");
        let dst = dir.path().join("results").join("b.mp4");
        tokio::fs::write(&src, b"payload").await.unwrap();

        move_file(&src, &dst).await.unwrap();
        assert!(!src.exists());
        assert_eq!(tokio::fs::read(&dst).await.unwrap(), b"payload");
    }
}
