//! Sync job lifecycle.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::asset::RemoteAssetRef;

/// Unique identifier for a remote processing job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string (e.g. the id the remote API assigned).
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status of a sync job.
///
/// `queued → processing → {completed | failed}`, with `cancelled` reachable
/// from `queued` or `processing` only. Terminal states never transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SyncJobStatus {
    /// Job is waiting for a worker on the remote service
    #[default]
    Queued,
    /// Job is being processed
    Processing,
    /// Job completed successfully
    Completed,
    /// Job failed on the remote service
    Failed,
    /// Job was cancelled locally
    Cancelled,
}

impl SyncJobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncJobStatus::Queued => "queued",
            SyncJobStatus::Processing => "processing",
            SyncJobStatus::Completed => "completed",
            SyncJobStatus::Failed => "failed",
            SyncJobStatus::Cancelled => "cancelled",
        }
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SyncJobStatus::Completed | SyncJobStatus::Failed | SyncJobStatus::Cancelled
        )
    }
}

impl fmt::Display for SyncJobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One remote processing request and its lifecycle.
///
/// Mutated only through the transition methods below; every transition out
/// of a terminal state is a silent no-op.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncJob {
    /// Job ID assigned by the remote service
    pub id: JobId,

    /// Current status
    #[serde(default)]
    pub status: SyncJobStatus,

    /// Submission timestamp
    pub submitted_at: DateTime<Utc>,

    /// Last local update timestamp
    pub updated_at: DateTime<Utc>,

    /// Reference to the completed result artifact
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_ref: Option<RemoteAssetRef>,

    /// Error detail reported by the remote service (if failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
}

impl SyncJob {
    /// Create a job in `Queued`, as returned by a fresh submission.
    pub fn new(id: JobId) -> Self {
        let now = Utc::now();
        Self {
            id,
            status: SyncJobStatus::Queued,
            submitted_at: now,
            updated_at: now,
            result_ref: None,
            error_detail: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Record that the remote service started processing.
    pub fn mark_processing(&mut self) {
        if self.is_terminal() {
            return;
        }
        self.status = SyncJobStatus::Processing;
        self.updated_at = Utc::now();
    }

    /// Mark the job completed with its result artifact.
    pub fn complete(&mut self, result_ref: RemoteAssetRef) {
        if self.is_terminal() {
            return;
        }
        self.status = SyncJobStatus::Completed;
        self.result_ref = Some(result_ref);
        self.updated_at = Utc::now();
    }

    /// Mark the job failed with the server-provided detail.
    pub fn fail(&mut self, detail: impl Into<String>) {
        if self.is_terminal() {
            return;
        }
        self.status = SyncJobStatus::Failed;
        self.error_detail = Some(detail.into());
        self.updated_at = Utc::now();
    }

    /// Cancel the job locally. No-op once terminal.
    pub fn cancel(&mut self) {
        if self.is_terminal() {
            return;
        }
        self.status = SyncJobStatus::Cancelled;
        self.updated_at = Utc::now();
    }
}
