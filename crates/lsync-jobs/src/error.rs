//! Job orchestration error types.

use std::time::Duration;

use thiserror::Error;

use lsync_api::ApiError;

pub type JobResult<T> = Result<T, JobError>;

#[derive(Debug, Error)]
pub enum JobError {
    /// No terminal state was reached within the polling deadline.
    #[error("job did not finish within {waited:?}")]
    Timeout { waited: Duration },

    /// The remote service reported the job failed.
    #[error("job failed: {0}")]
    Failed(String),

    /// The service reported completion but no result artifact.
    #[error("job completed without a result artifact")]
    MissingResult,

    #[error("API error: {0}")]
    Api(#[from] ApiError),
}
