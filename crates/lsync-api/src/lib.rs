//! HTTP client for the remote lip-sync processing service.
//!
//! The service is an external collaborator: HTTPS JSON endpoints for asset
//! upload (direct and chunked), job submission, status polling, cancel, and
//! result download. This crate covers the wire boundary only; retry and
//! polling policy live with the transfer manager and job orchestrator.

pub mod client;
pub mod error;
pub mod types;

pub use client::{SyncApiClient, SyncApiConfig};
pub use error::{ApiError, ApiResult};
pub use types::{
    ChunkedUpload, CreateChunkedUploadRequest, HealthResponse, JobCreated, JobStatusResponse,
    ResultArtifact, SubmitJobRequest, SubmitOptions, UploadedAsset,
};
