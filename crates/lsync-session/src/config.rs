//! Panel configuration.

use std::path::PathBuf;

use lsync_api::SyncApiConfig;
use lsync_jobs::PollPolicy;
use lsync_transfer::RetryConfig;

/// Top-level configuration for one panel process.
#[derive(Debug, Clone)]
pub struct PanelConfig {
    /// Root under which per-job scratch directories are created
    pub scratch_root: PathBuf,
    /// Where artifacts land when the user has to place them manually
    pub downloads_dir: PathBuf,
    /// Remote service client settings
    pub api: SyncApiConfig,
    /// Transfer retry policy
    pub retry: RetryConfig,
    /// Job polling policy
    pub poll: PollPolicy,
}

impl Default for PanelConfig {
    fn default() -> Self {
        let temp = std::env::temp_dir();
        Self {
            scratch_root: temp.join("lipsync-panel"),
            downloads_dir: temp.join("lipsync-panel").join("results"),
            api: SyncApiConfig::default(),
            retry: RetryConfig::default(),
            poll: PollPolicy::default(),
        }
    }
}

impl PanelConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            scratch_root: std::env::var("LIPSYNC_SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.scratch_root),
            downloads_dir: std::env::var("LIPSYNC_DOWNLOADS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.downloads_dir),
            api: SyncApiConfig::from_env(),
            retry: RetryConfig::from_env(),
            poll: PollPolicy::from_env(),
        }
    }
}
