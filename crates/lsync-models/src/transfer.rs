//! Transfer planning types and thresholds.

use serde::{Deserialize, Serialize};

/// Largest asset eligible for a single direct upload: 20 MiB.
pub const DIRECT_MAX_BYTES: u64 = 20 * 1024 * 1024;

/// Hard ceiling on asset size: 1 GiB. Larger assets are rejected outright.
pub const ASSET_MAX_BYTES: u64 = 1024 * 1024 * 1024;

/// Chunk size used for the chunked tier: 8 MiB.
pub const DEFAULT_CHUNK_BYTES: u64 = 8 * 1024 * 1024;

/// How an asset travels to the remote service.
///
/// Derived deterministically from the asset size against the fixed
/// thresholds; recomputed per asset, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "strategy")]
pub enum TransferPlan {
    /// Single request upload
    Direct,
    /// Multi-part upload in fixed-size chunks
    Chunked { chunk_size_bytes: u64 },
}

impl TransferPlan {
    /// Number of chunks a chunked plan needs for `size_bytes`.
    pub fn chunk_count(&self, size_bytes: u64) -> u64 {
        match self {
            TransferPlan::Direct => 1,
            TransferPlan::Chunked { chunk_size_bytes } => {
                size_bytes.div_ceil(*chunk_size_bytes)
            }
        }
    }
}
