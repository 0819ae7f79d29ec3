//! After Effects capability provider.

use std::path::Path;

use async_trait::async_trait;

use lsync_models::{HostIdentity, ImportResult, ImportTarget, ProjectInfo, SystemPathKind};

use crate::bridge::ScriptBridge;
use crate::capability::HostCapabilities;
use crate::error::{HostError, HostResult};
use crate::providers::script_quote;

/// Provider for After Effects, dispatching through the ExtendScript bridge.
pub struct AeftProvider {
    identity: HostIdentity,
    bridge: ScriptBridge,
}

impl AeftProvider {
    pub fn new(identity: HostIdentity, bridge: ScriptBridge) -> Self {
        Self { identity, bridge }
    }
}

/// Import a footage item and drop it into the active comp's layer stack at
/// the current time; falls back to the project bin when no comp is active.
fn import_snippet(local_path: &Path, target: ImportTarget) -> String {
    let path = script_quote(&local_path.to_string_lossy());
    let add_layer = matches!(target, ImportTarget::CompTimeline);
    format!(
        r#"(function () {{
    try {{
        var item = app.project.importFile(new ImportOptions(new File({path})));
        var comp = app.project.activeItem;
        if ({add_layer} && comp && comp instanceof CompItem) {{
            var layer = comp.layers.add(item);
            layer.startTime = comp.time;
            return "ok:comp";
        }}
        return "ok:bin";
    }} catch (e) {{
        return "ERR:" + e.toString();
    }}
}})()"#
    )
}

fn project_info_snippet() -> &'static str {
    r#"(function () {
    if (app.project && app.project.file) { return app.project.file.fsName; }
    return "";
})()"#
}

fn system_path_snippet(kind: SystemPathKind) -> String {
    let folder = match kind {
        SystemPathKind::UserData => "Folder.userData",
        SystemPathKind::ExtensionRoot => "Folder.startup",
        SystemPathKind::Documents => "Folder.myDocuments",
        SystemPathKind::Temp => "Folder.temp",
    };
    format!("(function () {{ try {{ return {folder}.fsName; }} catch (e) {{ return \"\"; }} }})()")
}

/// Interpret the `ok:`/`ERR:` reply convention used by the import snippets.
fn parse_import_reply(reply: &str, local_path: &Path) -> HostResult<ImportResult> {
    if let Some(detail) = reply.strip_prefix("ERR:") {
        return Err(HostError::ScriptFailed(detail.trim().to_string()));
    }
    match reply {
        "ok:comp" => Ok(ImportResult::imported(
            local_path,
            Some("added to the active composition".to_string()),
        )),
        "ok:bin" | "ok:sequence" | "ok:project" => Ok(ImportResult::imported(
            local_path,
            Some("added to the project".to_string()),
        )),
        other => Err(HostError::ScriptFailed(format!(
            "unexpected import reply: {other:?}"
        ))),
    }
}

#[async_trait]
impl HostCapabilities for AeftProvider {
    fn identity(&self) -> &HostIdentity {
        &self.identity
    }

    async fn run_host_script(&self, code: &str) -> HostResult<String> {
        self.bridge.run(code).await
    }

    async fn active_project_info(&self) -> HostResult<ProjectInfo> {
        let reply = self.bridge.run(project_info_snippet()).await?;
        if reply.is_empty() {
            // No project file: either nothing open or an unsaved project.
            return Ok(ProjectInfo::default());
        }
        Ok(ProjectInfo {
            path: Some(reply.into()),
            is_project_open: true,
        })
    }

    async fn import_media(
        &self,
        local_path: &Path,
        target: ImportTarget,
    ) -> HostResult<ImportResult> {
        let reply = self.bridge.run(&import_snippet(local_path, target)).await?;
        parse_import_reply(&reply, local_path)
    }

    async fn system_path(&self, kind: SystemPathKind) -> String {
        // Stable by contract even when the bridge is partially unavailable.
        self.bridge
            .run(&system_path_snippet(kind))
            .await
            .unwrap_or_default()
    }
}
