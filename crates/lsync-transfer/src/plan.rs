//! Size-tiered transfer planning.

use lsync_models::{MediaAsset, TransferPlan, ASSET_MAX_BYTES, DEFAULT_CHUNK_BYTES, DIRECT_MAX_BYTES};

use crate::error::{TransferError, TransferResult};

/// Derive the transfer strategy for an asset from its size.
///
/// Direct below 20 MiB, chunked from 20 MiB up to (not including) 1 GiB,
/// rejected at 1 GiB and above. Purely size-driven; no I/O.
pub fn plan_transfer(asset: &MediaAsset) -> TransferResult<TransferPlan> {
    if asset.size_bytes == 0 {
        return Err(TransferError::EmptyAsset(
            asset.local_path.display().to_string(),
        ));
    }
    if asset.size_bytes >= ASSET_MAX_BYTES {
        return Err(TransferError::AssetTooLarge {
            size_bytes: asset.size_bytes,
            limit_bytes: ASSET_MAX_BYTES,
        });
    }
    if asset.size_bytes < DIRECT_MAX_BYTES {
        return Ok(TransferPlan::Direct);
    }
    Ok(TransferPlan::Chunked {
        chunk_size_bytes: DEFAULT_CHUNK_BYTES,
    })
}
