//! DaVinci Resolve capability provider.
//!
//! Resolve is driven through its external script interpreter (`fuscript`)
//! with small Lua programs against the Resolve API.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use lsync_models::{HostIdentity, ImportResult, ImportTarget, ProjectInfo, SystemPathKind};

use crate::capability::HostCapabilities;
use crate::error::{HostError, HostResult};
use crate::providers::fcpx::externally_scripted_system_path;
use crate::providers::{script_quote, AutomationRunner};

const FUSCRIPT: &str = "fuscript";

/// Provider for DaVinci Resolve, driven through its scripting interpreter.
pub struct ResolveProvider {
    identity: HostIdentity,
    runner: Arc<dyn AutomationRunner>,
}

impl ResolveProvider {
    pub fn new(identity: HostIdentity, runner: Arc<dyn AutomationRunner>) -> Self {
        Self { identity, runner }
    }
}

fn lua_args(program: String) -> Vec<String> {
    vec!["-l".to_string(), "lua".to_string(), "-x".to_string(), program]
}

fn import_program(local_path: &Path) -> String {
    let path = script_quote(&local_path.to_string_lossy());
    format!(
        "local resolve = Resolve(); \
         local pool = resolve:GetProjectManager():GetCurrentProject():GetMediaPool(); \
         local items = resolve:GetMediaStorage():AddItemListToMediaPool({{{path}}}); \
         if items and #items > 0 then print('ok') else print('ERR:import rejected') end"
    )
}

fn project_info_program() -> String {
    "local resolve = Resolve(); \
     local project = resolve:GetProjectManager():GetCurrentProject(); \
     if project then print(project:GetName()) end"
        .to_string()
}

#[async_trait]
impl HostCapabilities for ResolveProvider {
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
        let reply = self.runner.run(FUSCRIPT, &lua_args(project_info_program())).await?;
        if reply.is_empty() {
            return Ok(ProjectInfo::default());
        }
        // Resolve projects live in its database; only the name is exposed.
        Ok(ProjectInfo {
            path: None,
            is_project_open: true,
        })
    }

    async fn import_media(
        &self,
        local_path: &Path,
        _target: ImportTarget,
    ) -> HostResult<ImportResult> {
        let reply = self
            .runner
            .run(FUSCRIPT, &lua_args(import_program(local_path)))
            .await?;
        if let Some(detail) = reply.strip_prefix("ERR:") {
            return Err(HostError::ScriptFailed(detail.trim().to_string()));
        }
        Ok(ImportResult::imported(
            local_path,
            Some("added to the media pool".to_string()),
        ))
    }

    async fn system_path(&self, kind: SystemPathKind) -> String {
        externally_scripted_system_path(kind)
    }
}
