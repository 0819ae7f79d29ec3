//! The fixed capability surface every host provider implements.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use lsync_models::{HostIdentity, ImportResult, ImportTarget, ProjectInfo, SystemPathKind};

use crate::error::HostResult;

/// Opaque handle to the active host's capability provider. Bound to exactly
/// one [`HostIdentity`] for the panel's lifetime.
pub type CapabilityHandle = Arc<dyn HostCapabilities>;

/// Uniform capability surface over the four host automation mechanisms.
///
/// Every capability is optional from the caller's perspective: a provider
/// that cannot perform one fails with
/// [`HostError::CapabilityUnavailable`](crate::HostError::CapabilityUnavailable),
/// which callers treat as an expected, recoverable outcome.
#[async_trait]
pub trait HostCapabilities: Send + Sync {
    /// The identity this provider was built for.
    fn identity(&self) -> &HostIdentity;

    /// Evaluate a script inside the host and return its string result.
    ///
    /// Unsupported on hosts without an embedded script bridge.
    async fn run_host_script(&self, code: &str) -> HostResult<String>;

    /// Path and open-state of the host's active project.
    async fn active_project_info(&self) -> HostResult<ProjectInfo>;

    /// Insert a local media file into the host project at the given target.
    async fn import_media(&self, local_path: &Path, target: ImportTarget)
        -> HostResult<ImportResult>;

    /// Resolve a well-known filesystem location through the host.
    ///
    /// Infallible by contract: returns an empty string when the underlying
    /// surface cannot answer, never an error.
    async fn system_path(&self, kind: SystemPathKind) -> String;
}
