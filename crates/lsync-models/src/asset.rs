//! Media assets staged for upload or received as job output.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Broad media classification used for upload content negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Video,
    Audio,
}

impl MediaKind {
    /// Infer the kind from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "mp4" | "mov" | "mxf" | "avi" | "webm" => Some(MediaKind::Video),
            "wav" | "mp3" | "aac" | "m4a" | "aiff" | "flac" => Some(MediaKind::Audio),
            _ => None,
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            MediaKind::Video => "video/mp4",
            MediaKind::Audio => "audio/wav",
        }
    }
}

/// A local media file, either selected by the user as source material or
/// written to scratch storage as a downloaded result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaAsset {
    pub local_path: PathBuf,
    pub size_bytes: u64,
    pub kind: MediaKind,
}

impl MediaAsset {
    /// Stat a local file and build an asset from it.
    ///
    /// Fails when the file does not exist or its extension is not a
    /// recognized media type.
    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let kind = MediaKind::from_path(path).ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("unrecognized media extension: {}", path.display()),
            )
        })?;
        let meta = tokio::fs::metadata(path).await?;

        Ok(Self {
            local_path: path.to_path_buf(),
            size_bytes: meta.len(),
            kind,
        })
    }

    /// Build an asset from already-known metadata, without touching disk.
    pub fn new(local_path: impl Into<PathBuf>, size_bytes: u64, kind: MediaKind) -> Self {
        Self {
            local_path: local_path.into(),
            size_bytes,
            kind,
        }
    }

    pub fn file_name(&self) -> &str {
        self.local_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("asset")
    }
}

/// Reference to an asset held by the remote service, either an uploaded
/// source or a completed result. The reported size is the baseline for
/// download integrity verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteAssetRef {
    pub asset_id: String,
    pub size_bytes: u64,
    /// Download location for result artifacts; absent on uploaded sources.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

impl RemoteAssetRef {
    pub fn new(asset_id: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            asset_id: asset_id.into(),
            size_bytes,
            download_url: None,
        }
    }

    pub fn with_download_url(mut self, url: impl Into<String>) -> Self {
        self.download_url = Some(url.into());
        self
    }
}
