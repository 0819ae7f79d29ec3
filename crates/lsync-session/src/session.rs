//! Panel session controller.

use std::path::Path;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

use lsync_api::{SubmitOptions, SyncApiClient};
use lsync_host::CapabilityHandle;
use lsync_jobs::JobOrchestrator;
use lsync_models::{ImportResult, MediaAsset, SyncJob, SyncJobStatus};
use lsync_transfer::{plan_transfer, TransferManager};

use crate::config::PanelConfig;
use crate::error::{SessionError, SessionResult, Stage};
use crate::import::ImportCoordinator;
use crate::scratch::{move_file, ScratchDir};

/// What one finished session hands back to the panel UI.
#[derive(Debug)]
pub struct SessionOutcome {
    pub job: SyncJob,
    pub import: ImportResult,
}

/// Drives one user-initiated job end-to-end:
/// plan → upload → submit → await → download → import.
///
/// One active job at a time: `run` takes `&mut self`, so a second
/// submission from the same controller cannot start until the first
/// resolves. Scratch files are cleaned up on every exit path.
pub struct SessionController {
    handle: CapabilityHandle,
    transfer: TransferManager,
    orchestrator: JobOrchestrator,
    config: PanelConfig,
}

impl SessionController {
    pub fn new(handle: CapabilityHandle, config: PanelConfig) -> SessionResult<Self> {
        let api = SyncApiClient::new(config.api.clone()).map_err(SessionError::Init)?;
        Ok(Self {
            handle,
            transfer: TransferManager::new(api.clone(), config.retry.clone()),
            orchestrator: JobOrchestrator::new(api),
            config,
        })
    }

    /// Run one job for the media file at `source_path`.
    pub async fn run(
        &mut self,
        source_path: &Path,
        options: SubmitOptions,
        cancel: &CancellationToken,
    ) -> SessionResult<SessionOutcome> {
        let asset = MediaAsset::from_path(source_path)
            .await
            .map_err(|e| SessionError::io(Stage::Prepare, e))?;

        let tag = format!("job-{}", Uuid::new_v4());
        let mut scratch = ScratchDir::create(&self.config.scratch_root, &tag)
            .await
            .map_err(|e| SessionError::io(Stage::Prepare, e))?;

        let outcome = self
            .run_stages(&asset, scratch.path(), options, cancel)
            .await;

        // Scratch cleanup happens regardless of how the stages ended.
        scratch.cleanup().await;

        match &outcome {
            Ok(result) => info!(
                job_id = %result.job.id,
                imported = result.import.imported,
                "session finished"
            ),
            Err(e) => warn!("session failed: {}", e),
        }
        outcome
    }

    async fn run_stages(
        &self,
        asset: &MediaAsset,
        scratch_dir: &Path,
        options: SubmitOptions,
        cancel: &CancellationToken,
    ) -> SessionResult<SessionOutcome> {
        // Fail fast on assets the policy rejects, before any network call.
        plan_transfer(asset).map_err(|e| SessionError::transfer(Stage::Prepare, e))?;
        self.ensure_live(cancel)?;

        let remote = self
            .transfer
            .upload(asset)
            .await
            .map_err(|e| SessionError::transfer(Stage::Upload, e))?;
        self.ensure_live(cancel)?;

        let job = self
            .orchestrator
            .submit(&remote, options)
            .await
            .map_err(|e| SessionError::job(Stage::Submit, e))?;

        let job = self
            .orchestrator
            .await_completion(job, &self.config.poll, cancel)
            .await
            .map_err(|e| SessionError::job(Stage::Process, e))?;
        if job.status == SyncJobStatus::Cancelled {
            return Err(SessionError::Cancelled);
        }

        let result_ref = job
            .result_ref
            .clone()
            .ok_or_else(|| SessionError::job(Stage::Process, lsync_jobs::JobError::MissingResult))?;
        self.ensure_live(cancel)?;

        let artifact = self
            .transfer
            .download(&result_ref, scratch_dir)
            .await
            .map_err(|e| SessionError::transfer(Stage::Download, e))?;
        self.ensure_live(cancel)?;

        let import = ImportCoordinator::import_result(&artifact, &self.handle)
            .await
            .map_err(|e| SessionError::host(Stage::Import, e))?;

        // Manual placement needs the artifact to outlive scratch cleanup.
        let import = if import.manual_action_required {
            self.relocate_for_manual_import(import).await?
        } else {
            import
        };

        Ok(SessionOutcome { job, import })
    }

    async fn relocate_for_manual_import(
        &self,
        mut import: ImportResult,
    ) -> SessionResult<ImportResult> {
        let file_name = import
            .artifact_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "result.mp4".into());
        let dest = self.config.downloads_dir.join(file_name);

        move_file(&import.artifact_path, &dest)
            .await
            .map_err(|e| SessionError::io(Stage::Import, e))?;
        info!("artifact kept for manual import at {}", dest.display());

        import.artifact_path = dest;
        Ok(import)
    }

    fn ensure_live(&self, cancel: &CancellationToken) -> SessionResult<()> {
        if cancel.is_cancelled() {
            return Err(SessionError::Cancelled);
        }
        Ok(())
    }
}
