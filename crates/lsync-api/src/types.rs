//! Wire types for the processing service.

use serde::{Deserialize, Serialize};

use lsync_models::{RemoteAssetRef, SyncJobStatus};

#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// An asset the service has accepted, directly or via a completed chunked
/// upload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedAsset {
    pub asset_id: String,
    pub size_bytes: u64,
}

impl From<UploadedAsset> for RemoteAssetRef {
    fn from(asset: UploadedAsset) -> Self {
        RemoteAssetRef::new(asset.asset_id, asset.size_bytes)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChunkedUploadRequest {
    pub file_name: String,
    pub size_bytes: u64,
    pub chunk_size_bytes: u64,
    pub content_type: String,
}

/// An open chunked upload: parts are sent by index, then completed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkedUpload {
    pub upload_id: String,
    pub part_count: u64,
}

/// Options forwarded with a job submission.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitOptions {
    /// Processing model the service should run
    pub model: String,
    /// Container format requested for the output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_format: Option<String>,
}

impl Default for SubmitOptions {
    fn default() -> Self {
        Self {
            model: "lipsync-2".to_string(),
            output_format: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitJobRequest {
    pub asset_id: String,
    #[serde(flatten)]
    pub options: SubmitOptions,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobCreated {
    pub job_id: String,
}

/// The completed artifact as reported in a job status poll.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultArtifact {
    pub asset_id: String,
    pub size_bytes: u64,
    pub download_url: String,
}

impl ResultArtifact {
    pub fn as_remote_ref(&self) -> RemoteAssetRef {
        RemoteAssetRef::new(self.asset_id.clone(), self.size_bytes)
            .with_download_url(self.download_url.clone())
    }
}

/// One poll of a job's remote state.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatusResponse {
    pub job_id: String,
    pub status: SyncJobStatus,
    #[serde(default)]
    pub result: Option<ResultArtifact>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_response_round_trip() {
        let raw = r#"{
            "jobId": "job-9",
            "status": "completed",
            "result": {"assetId": "out-9", "sizeBytes": 1234, "downloadUrl": "/v1/assets/out-9"}
        }"#;
        let parsed: JobStatusResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.status, SyncJobStatus::Completed);
        assert_eq!(parsed.result.unwrap().size_bytes, 1234);
    }

    #[test]
    fn test_status_response_failed_carries_error() {
        let raw = r#"{"jobId": "job-9", "status": "failed", "error": "face not detected"}"#;
        let parsed: JobStatusResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.status, SyncJobStatus::Failed);
        assert_eq!(parsed.error.as_deref(), Some("face not detected"));
    }

    #[test]
    fn test_submit_request_flattens_options() {
        let request = SubmitJobRequest {
            asset_id: "asset-1".to_string(),
            options: SubmitOptions::default(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["assetId"], "asset-1");
        assert_eq!(json["model"], "lipsync-2");
    }
}
