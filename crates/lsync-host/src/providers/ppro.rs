//! Premiere Pro capability provider.

use std::path::Path;

use async_trait::async_trait;

use lsync_models::{HostIdentity, ImportResult, ImportTarget, ProjectInfo, SystemPathKind};

use crate::bridge::ScriptBridge;
use crate::capability::HostCapabilities;
use crate::error::{HostError, HostResult};
use crate::providers::script_quote;

/// Provider for Premiere Pro, dispatching through the ExtendScript bridge.
pub struct PproProvider {
    identity: HostIdentity,
    bridge: ScriptBridge,
}

impl PproProvider {
    pub fn new(identity: HostIdentity, bridge: ScriptBridge) -> Self {
        Self { identity, bridge }
    }
}

/// Import into the project, then overlay onto the active sequence at the
/// playhead when one is open.
fn import_snippet(local_path: &Path, target: ImportTarget) -> String {
    let path = script_quote(&local_path.to_string_lossy());
    let into_sequence = matches!(target, ImportTarget::ActiveSequence);
    format!(
        r#"(function () {{
    try {{
        var bin = app.project.getInsertionBin();
        app.project.importFiles([{path}], true, bin, false);
        var seq = app.project.activeSequence;
        if ({into_sequence} && seq) {{
            var item = bin.children[bin.children.numItems - 1];
            seq.videoTracks[0].overwriteClip(item, seq.getPlayerPosition().seconds);
            return "ok:sequence";
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
    if (app.project && app.project.path) { return app.project.path; }
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

fn parse_import_reply(reply: &str, local_path: &Path) -> HostResult<ImportResult> {
    if let Some(detail) = reply.strip_prefix("ERR:") {
        return Err(HostError::ScriptFailed(detail.trim().to_string()));
    }
    match reply {
        "ok:sequence" => Ok(ImportResult::imported(
            local_path,
            Some("inserted into the active sequence".to_string()),
        )),
        "ok:bin" => Ok(ImportResult::imported(
            local_path,
            Some("added to the project bin".to_string()),
        )),
        other => Err(HostError::ScriptFailed(format!(
            "unexpected import reply: {other:?}"
        ))),
    }
}

#[async_trait]
impl HostCapabilities for PproProvider {
    fn identity(&self) -> &HostIdentity {
        &self.identity
    }

    async fn run_host_script(&self, code: &str) -> HostResult<String> {
        self.bridge.run(code).await
    }

    async fn active_project_info(&self) -> HostResult<ProjectInfo> {
        let reply = self.bridge.run(project_info_snippet()).await?;
        if reply.is_empty() {
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
        self.bridge
            .run(&system_path_snippet(kind))
            .await
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_snippet_targets_sequence() {
        let code = import_snippet(Path::new("/tmp/out.mp4"), ImportTarget::ActiveSequence);
        assert!(code.contains("overwriteClip"));
        assert!(code.contains("importFiles"));
    }

    #[test]
    fn test_parse_import_reply_sequence() {
        let result = parse_import_reply("ok:sequence", Path::new("/tmp/out.mp4")).unwrap();
        assert!(result.imported);
        assert!(!result.manual_action_required);
    }
}
