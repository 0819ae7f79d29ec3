//! Job orchestrator.

use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use lsync_api::{SubmitOptions, SyncApiClient};
use lsync_models::{JobId, RemoteAssetRef, SyncJob, SyncJobStatus};

use crate::error::{JobError, JobResult};

/// Polling cadence and wall-clock bound for one job.
#[derive(Debug, Clone)]
pub struct PollPolicy {
    /// Fixed interval between status polls
    pub interval: Duration,
    /// Wall-clock deadline for reaching a terminal state
    pub timeout: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3),
            timeout: Duration::from_secs(15 * 60),
        }
    }
}

impl PollPolicy {
    /// Create policy from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            interval: Duration::from_millis(
                std::env::var("LIPSYNC_POLL_INTERVAL_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.interval.as_millis() as u64),
            ),
            timeout: Duration::from_secs(
                std::env::var("LIPSYNC_JOB_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.timeout.as_secs()),
            ),
        }
    }
}

/// Drives one remote job from submission to a terminal state.
#[derive(Clone)]
pub struct JobOrchestrator {
    api: SyncApiClient,
}

impl JobOrchestrator {
    pub fn new(api: SyncApiClient) -> Self {
        Self { api }
    }

    /// Submit a processing request for an uploaded asset.
    pub async fn submit(
        &self,
        source: &RemoteAssetRef,
        options: SubmitOptions,
    ) -> JobResult<SyncJob> {
        let created = self.api.submit_job(&source.asset_id, options).await?;
        info!(job_id = %created.job_id, asset_id = %source.asset_id, "job submitted");
        Ok(SyncJob::new(JobId::from_string(created.job_id)))
    }

    /// Poll the job on a fixed interval until it reaches a terminal state.
    ///
    /// Transient poll errors carry no new information and never reset the
    /// deadline. Cancellation is honored at the next suspension point: the
    /// local job flips to cancelled immediately and a best-effort remote
    /// cancel is issued without awaiting its acknowledgment.
    pub async fn await_completion(
        &self,
        mut job: SyncJob,
        policy: &PollPolicy,
        cancel: &CancellationToken,
    ) -> JobResult<SyncJob> {
        if job.is_terminal() {
            debug!(job_id = %job.id, status = %job.status, "job already terminal");
            return Ok(job);
        }

        let deadline = tokio::time::Instant::now() + policy.timeout;
        let mut ticker = tokio::time::interval(policy.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    return Ok(self.cancel_local(job));
                }
                _ = ticker.tick() => {
                    if tokio::time::Instant::now() >= deadline {
                        warn!(job_id = %job.id, "job polling deadline exceeded");
                        return Err(JobError::Timeout {
                            waited: policy.timeout,
                        });
                    }

                    match self.api.job_status(job.id.as_str()).await {
                        Ok(remote) => match remote.status {
                            SyncJobStatus::Queued => {}
                            SyncJobStatus::Processing => job.mark_processing(),
                            SyncJobStatus::Completed => {
                                let artifact =
                                    remote.result.ok_or(JobError::MissingResult)?;
                                job.complete(artifact.as_remote_ref());
                                info!(job_id = %job.id, "job completed");
                                return Ok(job);
                            }
                            SyncJobStatus::Failed => {
                                let detail = remote
                                    .error
                                    .unwrap_or_else(|| "processing failed".to_string());
                                job.fail(detail.clone());
                                return Err(JobError::Failed(detail));
                            }
                            SyncJobStatus::Cancelled => {
                                job.cancel();
                                info!(job_id = %job.id, "job cancelled by the service");
                                return Ok(job);
                            }
                        },
                        Err(e) => {
                            // No new information; keep the deadline running.
                            warn!(job_id = %job.id, "status poll failed, will poll again: {}", e);
                        }
                    }
                }
            }
        }
    }

    fn cancel_local(&self, mut job: SyncJob) -> SyncJob {
        job.cancel();
        info!(job_id = %job.id, "job cancelled locally");

        let api = self.api.clone();
        let job_id = job.id.to_string();
        tokio::spawn(async move {
            if let Err(e) = api.cancel_job(&job_id).await {
                warn!(job_id = %job_id, "best-effort remote cancel failed: {}", e);
            }
        });

        job
    }
}
