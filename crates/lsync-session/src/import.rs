//! Import coordinator.

use tracing::info;

use lsync_host::{CapabilityHandle, HostError};
use lsync_models::{ImportResult, ImportTarget, MediaAsset};

/// Inserts a completed artifact into the host project through the active
/// capability handle.
pub struct ImportCoordinator;

impl ImportCoordinator {
    /// Import `asset` at the host's native placement.
    ///
    /// A host that cannot auto-import is not a session failure: the result
    /// comes back flagged `manual_action_required` with the artifact path
    /// for the user to place themselves. Other host errors propagate.
    pub async fn import_result(
        asset: &MediaAsset,
        handle: &CapabilityHandle,
    ) -> Result<ImportResult, HostError> {
        let target = ImportTarget::default_for(handle.identity().host_id);

        match handle.import_media(&asset.local_path, target).await {
            Ok(result) => Ok(result),
            Err(e) if e.is_capability_unavailable() => {
                info!(
                    host = %handle.identity().host_id,
                    "auto-import unavailable, surfacing artifact for manual placement"
                );
                Ok(ImportResult::manual(&asset.local_path))
            }
            Err(e) => Err(e),
        }
    }
}
