//! Final Cut Pro capability provider.
//!
//! FCPX has no embedded script bridge; everything goes through AppleScript
//! via `osascript`.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use lsync_models::{HostIdentity, ImportResult, ImportTarget, ProjectInfo, SystemPathKind};

use crate::capability::HostCapabilities;
use crate::error::{HostError, HostResult};
use crate::providers::{script_quote, AutomationRunner};

const OSASCRIPT: &str = "osascript";

/// Provider for Final Cut Pro, driven through its AppleScript surface.
pub struct FcpxProvider {
    identity: HostIdentity,
    runner: Arc<dyn AutomationRunner>,
}

impl FcpxProvider {
    pub fn new(identity: HostIdentity, runner: Arc<dyn AutomationRunner>) -> Self {
        Self { identity, runner }
    }
}

fn import_args(local_path: &Path) -> Vec<String> {
    let path = script_quote(&local_path.to_string_lossy());
    vec![
        "-e".to_string(),
        format!(
            "tell application \"Final Cut Pro\" to import {path} \
             into active library with copying"
        ),
    ]
}

fn project_info_args() -> Vec<String> {
    vec![
        "-e".to_string(),
        "tell application \"Final Cut Pro\" to get file of front document as text".to_string(),
    ]
}

#[async_trait]
impl HostCapabilities for FcpxProvider {
    fn identity(&self) -> &HostIdentity {
        &self.identity
    }

    async fn run_host_script(&self, _code: &str) -> HostResult<String> {
        Err(HostError::capability_unavailable(
            self.identity.host_id,
            "run_host_script",
        ))
    }

    async fn active_project_info(&self) -> HostResult<ProjectInfo> {
        match self.runner.run(OSASCRIPT, &project_info_args()).await {
            Ok(reply) if reply.is_empty() => Ok(ProjectInfo::default()),
            Ok(reply) => Ok(ProjectInfo {
                path: Some(reply.into()),
                is_project_open: true,
            }),
            // No front document is the common failure shape here.
            Err(HostError::Automation(_)) => Ok(ProjectInfo::default()),
            Err(e) => Err(e),
        }
    }

    async fn import_media(
        &self,
        local_path: &Path,
        _target: ImportTarget,
    ) -> HostResult<ImportResult> {
        self.runner.run(OSASCRIPT, &import_args(local_path)).await?;
        Ok(ImportResult::imported(
            local_path,
            Some("imported into the active library".to_string()),
        ))
    }

    async fn system_path(&self, kind: SystemPathKind) -> String {
        externally_scripted_system_path(kind)
    }
}

/// Path resolution for hosts reached from outside the application: derived
/// from the environment rather than a host bridge, empty on failure.
pub(crate) fn externally_scripted_system_path(kind: SystemPathKind) -> String {
    match kind {
        SystemPathKind::Temp => std::env::temp_dir().to_string_lossy().into_owned(),
        SystemPathKind::UserData => home_joined("Library/Application Support"),
        SystemPathKind::Documents => home_joined("Documents"),
        SystemPathKind::ExtensionRoot => String::new(),
    }
}

fn home_joined(suffix: &str) -> String {
    match std::env::var("HOME") {
        Ok(home) if !home.is_empty() => format!("{home}/{suffix}"),
        _ => String::new(),
    }
}
