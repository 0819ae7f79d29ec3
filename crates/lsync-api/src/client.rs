//! Processing service HTTP client.

use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use crate::error::{ApiError, ApiResult};
use crate::types::{
    ChunkedUpload, CreateChunkedUploadRequest, HealthResponse, JobCreated, JobStatusResponse,
    SubmitJobRequest, SubmitOptions, UploadedAsset,
};

/// Configuration for the processing service client.
#[derive(Debug, Clone)]
pub struct SyncApiConfig {
    /// Base URL of the processing service
    pub base_url: String,
    /// API key passed through as a bearer credential
    pub api_key: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for SyncApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.lipsyncpanel.com".to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(120),
        }
    }
}

impl SyncApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("LIPSYNC_API_URL").unwrap_or(defaults.base_url),
            api_key: std::env::var("LIPSYNC_API_KEY").unwrap_or_default(),
            timeout: Duration::from_secs(
                std::env::var("LIPSYNC_API_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(120),
            ),
        }
    }
}

/// Client for the remote lip-sync processing service.
#[derive(Clone)]
pub struct SyncApiClient {
    http: Client,
    config: SyncApiConfig,
}

impl SyncApiClient {
    /// Create a new client.
    pub fn new(config: SyncApiConfig) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(ApiError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> ApiResult<Self> {
        Self::new(SyncApiConfig::from_env())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn authed(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if self.config.api_key.is_empty() {
            builder
        } else {
            builder.bearer_auth(&self.config.api_key)
        }
    }

    async fn expect_success(response: reqwest::Response) -> ApiResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::status(status.as_u16(), body))
    }

    /// Check if the service is reachable and healthy. Never errors.
    pub async fn health_check(&self) -> bool {
        let url = self.url("/health");

        match self.http.get(&url).send().await {
            Ok(response) if response.status().is_success() => response
                .json::<HealthResponse>()
                .await
                .map(|h| h.status == "healthy" || h.status == "ok")
                .unwrap_or(false),
            Ok(response) => {
                warn!("service health check failed: {}", response.status());
                false
            }
            Err(e) => {
                warn!("service health check error: {}", e);
                false
            }
        }
    }

    /// Upload a small asset in one multipart request.
    pub async fn upload_direct(
        &self,
        path: impl AsRef<Path>,
        file_name: &str,
        content_type: &str,
    ) -> ApiResult<UploadedAsset> {
        let url = self.url("/v1/assets");
        debug!("direct upload of {} to {}", file_name, url);

        let bytes = tokio::fs::read(path.as_ref()).await?;
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .authed(self.http.post(&url).multipart(form))
            .send()
            .await?;
        let response = Self::expect_success(response).await?;
        Ok(response.json().await?)
    }

    /// Open a chunked upload for a large asset.
    pub async fn create_chunked_upload(
        &self,
        request: &CreateChunkedUploadRequest,
    ) -> ApiResult<ChunkedUpload> {
        let url = self.url("/v1/assets/uploads");

        let response = self
            .authed(self.http.post(&url).json(request))
            .send()
            .await?;
        let response = Self::expect_success(response).await?;
        Ok(response.json().await?)
    }

    /// Send one part of a chunked upload. Part indexes start at 1.
    pub async fn upload_part(
        &self,
        upload_id: &str,
        part_index: u64,
        bytes: Vec<u8>,
    ) -> ApiResult<()> {
        let url = self.url(&format!("/v1/assets/uploads/{upload_id}/parts/{part_index}"));
        debug!(part_index, bytes = bytes.len(), "uploading part");

        let response = self
            .authed(
                self.http
                    .put(&url)
                    .header("content-type", "application/octet-stream")
                    .body(bytes),
            )
            .send()
            .await?;
        Self::expect_success(response).await?;
        Ok(())
    }

    /// Complete a chunked upload and receive the assembled asset.
    pub async fn complete_chunked_upload(&self, upload_id: &str) -> ApiResult<UploadedAsset> {
        let url = self.url(&format!("/v1/assets/uploads/{upload_id}/complete"));

        let response = self.authed(self.http.post(&url)).send().await?;
        let response = Self::expect_success(response).await?;
        Ok(response.json().await?)
    }

    /// Submit a processing job for an uploaded asset.
    pub async fn submit_job(
        &self,
        asset_id: &str,
        options: SubmitOptions,
    ) -> ApiResult<JobCreated> {
        let url = self.url("/v1/jobs");
        let request = SubmitJobRequest {
            asset_id: asset_id.to_string(),
            options,
        };

        let response = self
            .authed(self.http.post(&url).json(&request))
            .send()
            .await?;
        let response = Self::expect_success(response).await?;
        Ok(response.json().await?)
    }

    /// Poll a job's current status.
    pub async fn job_status(&self, job_id: &str) -> ApiResult<JobStatusResponse> {
        let url = self.url(&format!("/v1/jobs/{job_id}"));

        let response = self.authed(self.http.get(&url)).send().await?;
        let response = Self::expect_success(response).await?;
        Ok(response.json().await?)
    }

    /// Ask the service to cancel a job. Best-effort: callers do not depend
    /// on the acknowledgment.
    pub async fn cancel_job(&self, job_id: &str) -> ApiResult<()> {
        let url = self.url(&format!("/v1/jobs/{job_id}/cancel"));

        let response = self.authed(self.http.post(&url)).send().await?;
        Self::expect_success(response).await?;
        Ok(())
    }

    /// Stream a result artifact to `dest`. Returns the bytes written.
    ///
    /// `download_url` may be absolute or relative to the service base.
    pub async fn download_artifact(
        &self,
        download_url: &str,
        dest: impl AsRef<Path>,
    ) -> ApiResult<u64> {
        let url = if download_url.starts_with("http://") || download_url.starts_with("https://") {
            download_url.to_string()
        } else {
            self.url(download_url)
        };
        let dest = dest.as_ref();
        debug!("downloading artifact from {} to {}", url, dest.display());

        let response = self.authed(self.http.get(&url)).send().await?;
        let response = Self::expect_success(response).await?;

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let mut file = tokio::fs::File::create(dest).await?;
        let mut stream = response.bytes_stream();
        let mut written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> SyncApiClient {
        SyncApiClient::new(SyncApiConfig {
            base_url: server.uri(),
            api_key: "test-key".to_string(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[test]
    fn test_config_defaults() {
        let config = SyncApiConfig::default();
        assert_eq!(config.base_url, "https://api.lipsyncpanel.com");
        assert_eq!(config.timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = SyncApiClient::new(SyncApiConfig {
            base_url: "http://localhost:8000/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(client.url("/v1/jobs"), "http://localhost:8000/v1/jobs");
    }

    #[tokio::test]
    async fn test_health_check_down_service() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        assert!(!client_for(&server).health_check().await);
    }

    #[tokio::test]
    async fn test_submit_job_round_trip() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/jobs"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"jobId": "job-1"})),
            )
            .mount(&server)
            .await;

        let created = client_for(&server)
            .submit_job("asset-1", SubmitOptions::default())
            .await
            .unwrap();
        assert_eq!(created.job_id, "job-1");
    }

    #[tokio::test]
    async fn test_error_status_carries_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/jobs/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such job"))
            .mount(&server)
            .await;

        let err = client_for(&server).job_status("missing").await.unwrap_err();
        match err {
            ApiError::Status { status, body } => {
                assert_eq!(status, 404);
                assert_eq!(body, "no such job");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_download_artifact_streams_to_disk() {
        let server = MockServer::start().await;
        let payload = vec![7u8; 4096];
        Mock::given(method("GET"))
            .and(path("/v1/assets/out-1"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(payload.clone()))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("result.mp4");
        let written = client_for(&server)
            .download_artifact("/v1/assets/out-1", &dest)
            .await
            .unwrap();

        assert_eq!(written, 4096);
        assert_eq!(tokio::fs::read(&dest).await.unwrap(), payload);
    }
}
