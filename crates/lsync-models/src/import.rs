//! Import placement targets and results.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::host::HostId;

/// Where a completed artifact should land inside the host project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportTarget {
    /// Layer stack of the active composition, at the current time (AEFT)
    CompTimeline,
    /// The active sequence (PPRO)
    ActiveSequence,
    /// The active library or media bin (FCPX, Resolve)
    LibraryBin,
}

impl ImportTarget {
    /// The native placement for a given host.
    pub fn default_for(host: HostId) -> Self {
        match host {
            HostId::Aeft => ImportTarget::CompTimeline,
            HostId::Ppro => ImportTarget::ActiveSequence,
            HostId::Fcpx | HostId::Resolve => ImportTarget::LibraryBin,
        }
    }
}

/// Outcome of inserting an artifact into the host project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResult {
    /// Whether the artifact landed in the project automatically
    pub imported: bool,
    /// The host could not auto-import; the user must place the file manually
    pub manual_action_required: bool,
    /// Local path of the artifact, surfaced for manual placement
    pub artifact_path: PathBuf,
    /// Host-provided detail about the placement, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ImportResult {
    /// The artifact was placed in the project.
    pub fn imported(artifact_path: impl Into<PathBuf>, detail: Option<String>) -> Self {
        Self {
            imported: true,
            manual_action_required: false,
            artifact_path: artifact_path.into(),
            detail,
        }
    }

    /// Auto-import was unavailable; the user places the file themselves.
    pub fn manual(artifact_path: impl Into<PathBuf>) -> Self {
        Self {
            imported: false,
            manual_action_required: true,
            artifact_path: artifact_path.into(),
            detail: None,
        }
    }
}
