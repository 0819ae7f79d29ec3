//! Transfer error types.

use thiserror::Error;

use lsync_api::ApiError;

pub type TransferResult<T> = Result<T, TransferError>;

#[derive(Debug, Error)]
pub enum TransferError {
    /// The asset has no content to transfer.
    #[error("asset is empty: {0}")]
    EmptyAsset(String),

    /// Policy boundary: assets at or above the hard ceiling are rejected
    /// before any network call.
    #[error("asset of {size_bytes} bytes exceeds the {limit_bytes} byte limit")]
    AssetTooLarge { size_bytes: u64, limit_bytes: u64 },

    /// The downloaded artifact's length disagrees with the size the
    /// service reported.
    #[error("integrity mismatch: expected {expected} bytes, received {actual}")]
    IntegrityMismatch { expected: u64, actual: u64 },

    /// A retryable operation kept failing until the attempt budget ran out.
    #[error("{operation} failed after {attempts} attempts: {source}")]
    Exhausted {
        operation: String,
        attempts: u32,
        #[source]
        source: ApiError,
    },

    #[error("API error: {0}")]
    Api(#[from] ApiError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
