//! Host identity and the bootstrap marker.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The four creative applications the panel can run under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HostId {
    /// Adobe After Effects
    Aeft,
    /// Adobe Premiere Pro
    Ppro,
    /// Apple Final Cut Pro
    Fcpx,
    /// Blackmagic DaVinci Resolve
    Resolve,
}

impl HostId {
    pub fn as_str(&self) -> &'static str {
        match self {
            HostId::Aeft => "AEFT",
            HostId::Ppro => "PPRO",
            HostId::Fcpx => "FCPX",
            HostId::Resolve => "RESOLVE",
        }
    }

    /// Whether the host embeds an evaluated-script bridge (ExtendScript).
    pub fn has_script_bridge(&self) -> bool {
        matches!(self, HostId::Aeft | HostId::Ppro)
    }
}

impl fmt::Display for HostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error for host identifiers outside the known set.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown host identifier: {0}")]
pub struct UnknownHostId(pub String);

impl FromStr for HostId {
    type Err = UnknownHostId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "AEFT" => Ok(HostId::Aeft),
            "PPRO" => Ok(HostId::Ppro),
            "FCPX" => Ok(HostId::Fcpx),
            "RESOLVE" => Ok(HostId::Resolve),
            other => Err(UnknownHostId(other.to_string())),
        }
    }
}

/// The process-wide marker written by the host bootstrap script before any
/// core logic runs. Core logic reads it exactly once.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostMarker {
    pub host_id: String,
    pub host_name: String,
    #[serde(default)]
    pub is_ae: bool,
}

/// Immutable identity of the embedding host, derived from the bootstrap
/// marker at panel load and never changed during a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostIdentity {
    pub host_id: HostId,
    pub host_name: String,
    pub extendscript_capable: bool,
}

impl HostIdentity {
    /// Build the identity from the bootstrap marker.
    ///
    /// Fails with [`UnknownHostId`] when the marker names a host outside
    /// the supported set.
    pub fn from_marker(marker: &HostMarker) -> Result<Self, UnknownHostId> {
        let host_id = marker.host_id.parse::<HostId>()?;
        Ok(Self {
            host_id,
            host_name: marker.host_name.clone(),
            extendscript_capable: host_id.has_script_bridge(),
        })
    }
}

/// State of the host's active project, as reported by the capability layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectInfo {
    /// Path of the active project file, if any.
    pub path: Option<PathBuf>,
    /// Whether a project is currently open.
    pub is_project_open: bool,
}

/// Well-known filesystem locations resolvable through a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemPathKind {
    UserData,
    ExtensionRoot,
    Documents,
    Temp,
}

impl SystemPathKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SystemPathKind::UserData => "user_data",
            SystemPathKind::ExtensionRoot => "extension_root",
            SystemPathKind::Documents => "documents",
            SystemPathKind::Temp => "temp",
        }
    }
}
