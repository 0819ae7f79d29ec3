//! Transfer manager: plan execution for uploads and downloads.

use std::path::Path;

use tokio::io::AsyncReadExt;
use tracing::{debug, info};

use lsync_api::{CreateChunkedUploadRequest, SyncApiClient};
use lsync_models::{MediaAsset, MediaKind, RemoteAssetRef, TransferPlan};

use crate::error::{TransferError, TransferResult};
use crate::plan::plan_transfer;
use crate::retry::{retry_api, RetryConfig};

/// Moves media between the local filesystem and the processing service
/// according to the size-tiered plan, with bounded retries on transient
/// network failure.
#[derive(Clone)]
pub struct TransferManager {
    api: SyncApiClient,
    retry: RetryConfig,
}

impl TransferManager {
    pub fn new(api: SyncApiClient, retry: RetryConfig) -> Self {
        Self { api, retry }
    }

    /// Upload an asset, choosing direct or chunked transfer by size.
    pub async fn upload(&self, asset: &MediaAsset) -> TransferResult<RemoteAssetRef> {
        let plan = plan_transfer(asset)?;
        info!(
            size_bytes = asset.size_bytes,
            ?plan,
            "uploading {}",
            asset.file_name()
        );

        match plan {
            TransferPlan::Direct => {
                let uploaded = retry_api(&self.retry, "upload_direct", || {
                    self.api.upload_direct(
                        &asset.local_path,
                        asset.file_name(),
                        asset.kind.content_type(),
                    )
                })
                .await?;
                Ok(uploaded.into())
            }
            TransferPlan::Chunked { chunk_size_bytes } => {
                self.upload_chunked(asset, chunk_size_bytes).await
            }
        }
    }

    /// Upload an asset in fixed-size parts. A transient failure retries the
    /// current part, not the whole transfer.
    pub(crate) async fn upload_chunked(
        &self,
        asset: &MediaAsset,
        chunk_size_bytes: u64,
    ) -> TransferResult<RemoteAssetRef> {
        let request = CreateChunkedUploadRequest {
            file_name: asset.file_name().to_string(),
            size_bytes: asset.size_bytes,
            chunk_size_bytes,
            content_type: asset.kind.content_type().to_string(),
        };
        let upload = retry_api(&self.retry, "create_chunked_upload", || {
            self.api.create_chunked_upload(&request)
        })
        .await?;

        let total_parts = TransferPlan::Chunked { chunk_size_bytes }.chunk_count(asset.size_bytes);
        let mut file = tokio::fs::File::open(&asset.local_path).await?;

        for part_index in 1..=total_parts {
            let offset = (part_index - 1) * chunk_size_bytes;
            let part_len = (asset.size_bytes - offset).min(chunk_size_bytes) as usize;
            let mut buf = vec![0u8; part_len];
            file.read_exact(&mut buf).await?;

            let operation = format!("upload_part {part_index}/{total_parts}");
            retry_api(&self.retry, &operation, || {
                self.api.upload_part(&upload.upload_id, part_index, buf.clone())
            })
            .await?;
            debug!(part_index, total_parts, "part uploaded");
        }

        let uploaded = retry_api(&self.retry, "complete_chunked_upload", || {
            self.api.complete_chunked_upload(&upload.upload_id)
        })
        .await?;
        Ok(uploaded.into())
    }

    /// Download a result artifact into `dest_dir` and verify its length
    /// against the size the service reported.
    pub async fn download(
        &self,
        remote: &RemoteAssetRef,
        dest_dir: impl AsRef<Path>,
    ) -> TransferResult<MediaAsset> {
        let url = remote
            .download_url
            .clone()
            .unwrap_or_else(|| format!("/v1/assets/{}", remote.asset_id));
        let dest = dest_dir.as_ref().join(artifact_file_name(remote));

        let written = retry_api(&self.retry, "download_artifact", || {
            self.api.download_artifact(&url, &dest)
        })
        .await?;

        if written != remote.size_bytes {
            // Remove the partial file; the caller may retry the whole job.
            let _ = tokio::fs::remove_file(&dest).await;
            return Err(TransferError::IntegrityMismatch {
                expected: remote.size_bytes,
                actual: written,
            });
        }

        info!(bytes = written, "downloaded {}", dest.display());
        let kind = MediaKind::from_path(&dest).unwrap_or(MediaKind::Video);
        Ok(MediaAsset::new(dest, written, kind))
    }
}

/// File name for a downloaded artifact: the URL's final segment when it
/// looks like a file, otherwise derived from the asset id.
fn artifact_file_name(remote: &RemoteAssetRef) -> String {
    if let Some(url) = &remote.download_url {
        if let Some(segment) = url.rsplit('/').next() {
            let clean = segment.split('?').next().unwrap_or(segment);
            if clean.contains('.') {
                return clean.to_string();
            }
        }
    }
    format!("{}.mp4", remote.asset_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::time::Duration;

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use lsync_api::SyncApiConfig;

    fn manager_for(server: &MockServer) -> TransferManager {
        let api = SyncApiClient::new(SyncApiConfig {
            base_url: server.uri(),
            api_key: String::new(),
            timeout: Duration::from_secs(5),
        })
        .unwrap();
        let retry = RetryConfig {
            max_retries: 3,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
        };
        TransferManager::new(api, retry)
    }

    async fn write_source(dir: &tempfile::TempDir, len: usize) -> MediaAsset {
        let path = dir.path().join("source.mp4");
        tokio::fs::write(&path, vec![9u8; len]).await.unwrap();
        MediaAsset::from_path(&path).await.unwrap()
    }

    #[test]
    fn test_artifact_file_name() {
        let with_url = RemoteAssetRef::new("out-1", 10).with_download_url("/v1/files/result.mov");
        assert_eq!(artifact_file_name(&with_url), "result.mov");

        let with_query =
            RemoteAssetRef::new("out-1", 10).with_download_url("/dl/result.mp4?token=abc");
        assert_eq!(artifact_file_name(&with_query), "result.mp4");

        let bare = RemoteAssetRef::new("out-2", 10);
        assert_eq!(artifact_file_name(&bare), "out-2.mp4");
    }

    #[tokio::test]
    async fn test_direct_upload_round_trip_preserves_length() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let asset = write_source(&dir, 1024).await;

        Mock::given(method("POST"))
            .and(path("/v1/assets"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"assetId": "asset-1", "sizeBytes": 1024}),
            ))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/assets/asset-1"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![9u8; 1024]))
            .mount(&server)
            .await;

        let manager = manager_for(&server);
        let remote = manager.upload(&asset).await.unwrap();
        assert_eq!(remote.size_bytes, asset.size_bytes);

        let out_dir = tempfile::tempdir().unwrap();
        let downloaded = manager.download(&remote, out_dir.path()).await.unwrap();
        assert_eq!(downloaded.size_bytes, asset.size_bytes);
    }

    #[tokio::test]
    async fn test_chunked_upload_retries_failing_part() {
        // Three parts; part 2 returns one transient 503 and then succeeds.
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let asset = write_source(&dir, 20).await;

        Mock::given(method("POST"))
            .and(path("/v1/assets/uploads"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"uploadId": "u1", "partCount": 3}),
            ))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/v1/assets/uploads/u1/parts/2"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        for part in 1..=3 {
            Mock::given(method("PUT"))
                .and(path(format!("/v1/assets/uploads/u1/parts/{part}")))
                .respond_with(ResponseTemplate::new(200))
                .mount(&server)
                .await;
        }
        Mock::given(method("POST"))
            .and(path("/v1/assets/uploads/u1/complete"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"assetId": "asset-2", "sizeBytes": 20}),
            ))
            .mount(&server)
            .await;

        let manager = manager_for(&server);
        let remote = manager.upload_chunked(&asset, 8).await.unwrap();
        assert_eq!(remote.asset_id, "asset-2");
    }

    #[tokio::test]
    async fn test_chunked_upload_exhausts_on_persistent_failure() {
        let server = MockServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let asset = write_source(&dir, 20).await;

        Mock::given(method("POST"))
            .and(path("/v1/assets/uploads"))
            .respond_with(ResponseTemplate::new(200).set_body_json(
                serde_json::json!({"uploadId": "u1", "partCount": 3}),
            ))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = manager_for(&server)
            .upload_chunked(&asset, 8)
            .await
            .unwrap_err();
        assert!(matches!(err, TransferError::Exhausted { attempts: 4, .. }));
    }

    #[tokio::test]
    async fn test_download_integrity_mismatch_removes_partial_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/assets/out-1"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![1u8; 100]))
            .mount(&server)
            .await;

        let out_dir = tempfile::tempdir().unwrap();
        let remote = RemoteAssetRef::new("out-1", 200);
        let err = manager_for(&server)
            .download(&remote, out_dir.path())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            TransferError::IntegrityMismatch {
                expected: 200,
                actual: 100
            }
        ));
        assert!(!out_dir.path().join("out-1.mp4").exists());
    }

    #[tokio::test]
    async fn test_oversized_upload_makes_no_network_call() {
        let server = MockServer::start().await;
        // No mocks mounted: any request would fail the test via 404 → the
        // plan must reject the asset before the client is ever used.
        let asset = MediaAsset::new(
            "/tmp/huge.mp4",
            3 * lsync_models::ASSET_MAX_BYTES / 2,
            MediaKind::Video,
        );

        let err = manager_for(&server).upload(&asset).await.unwrap_err();
        assert!(matches!(err, TransferError::AssetTooLarge { .. }));
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
