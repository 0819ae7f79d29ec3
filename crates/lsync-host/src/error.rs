//! Host layer error types.

use std::time::Duration;

use thiserror::Error;

use lsync_models::{HostId, UnknownHostId};

/// Result type for host capability operations.
pub type HostResult<T> = Result<T, HostError>;

/// Errors that can occur in the host capability layer.
#[derive(Debug, Error)]
pub enum HostError {
    /// The detected host is outside the supported set. Fatal: the session
    /// cannot start.
    #[error("unsupported host: {0}")]
    UnsupportedHost(String),

    /// The capability exists in the surface but this host cannot perform
    /// it. Recoverable: callers degrade (e.g. manual import).
    #[error("capability '{capability}' is unavailable on {host}")]
    CapabilityUnavailable {
        host: HostId,
        capability: &'static str,
    },

    /// The evaluated-script bridge could not dispatch or reported an
    /// evaluation error. Distinct from a script that ran and returned an
    /// empty string.
    #[error("script bridge error: {0}")]
    Bridge(String),

    /// The bridge callback never fired within the bound.
    #[error("script bridge timed out after {0:?}")]
    BridgeTimeout(Duration),

    /// The bridge callback was dropped without a reply.
    #[error("script bridge dropped the reply callback")]
    BridgeDropped,

    /// The host script ran and reported a failure of its own.
    #[error("host script failed: {0}")]
    ScriptFailed(String),

    /// The external automation tool failed.
    #[error("automation tool failed: {0}")]
    Automation(String),

    /// A process-wide capability handle is already installed.
    #[error("a capability handle is already installed for this session")]
    AlreadyInstalled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl HostError {
    pub fn capability_unavailable(host: HostId, capability: &'static str) -> Self {
        Self::CapabilityUnavailable { host, capability }
    }

    /// Whether this error is the expected "host can't do that" outcome
    /// callers should degrade on rather than fail the session.
    pub fn is_capability_unavailable(&self) -> bool {
        matches!(self, HostError::CapabilityUnavailable { .. })
    }
}

impl From<UnknownHostId> for HostError {
    fn from(err: UnknownHostId) -> Self {
        HostError::UnsupportedHost(err.0)
    }
}
