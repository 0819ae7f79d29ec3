//! Session error types with stage attribution.

use std::fmt;

use thiserror::Error;

use lsync_api::ApiError;
use lsync_host::HostError;
use lsync_jobs::JobError;
use lsync_transfer::TransferError;

pub type SessionResult<T> = Result<T, SessionError>;

/// Pipeline stage a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Statting the source and deriving the transfer plan
    Prepare,
    Upload,
    Submit,
    /// Waiting on the remote job
    Process,
    Download,
    Import,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Prepare => "prepare",
            Stage::Upload => "upload",
            Stage::Submit => "submit",
            Stage::Process => "process",
            Stage::Download => "download",
            Stage::Import => "import",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The single user-facing error for one session, carrying the stage that
/// failed and the component error underneath.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("{stage} stage failed: {source}")]
    Host {
        stage: Stage,
        #[source]
        source: HostError,
    },

    #[error("{stage} stage failed: {source}")]
    Transfer {
        stage: Stage,
        #[source]
        source: TransferError,
    },

    #[error("{stage} stage failed: {source}")]
    Job {
        stage: Stage,
        #[source]
        source: JobError,
    },

    #[error("{stage} stage failed: {source}")]
    Io {
        stage: Stage,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to initialize the service client: {0}")]
    Init(#[source] ApiError),

    #[error("session cancelled")]
    Cancelled,
}

impl SessionError {
    pub fn host(stage: Stage, source: HostError) -> Self {
        Self::Host { stage, source }
    }

    pub fn transfer(stage: Stage, source: TransferError) -> Self {
        Self::Transfer { stage, source }
    }

    pub fn job(stage: Stage, source: JobError) -> Self {
        Self::Job { stage, source }
    }

    pub fn io(stage: Stage, source: std::io::Error) -> Self {
        Self::Io { stage, source }
    }

    /// The stage this error is attributed to, when it belongs to one.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            SessionError::Host { stage, .. }
            | SessionError::Transfer { stage, .. }
            | SessionError::Job { stage, .. }
            | SessionError::Io { stage, .. } => Some(*stage),
            SessionError::Init(_) | SessionError::Cancelled => None,
        }
    }
}
