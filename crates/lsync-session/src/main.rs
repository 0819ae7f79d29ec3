//! Panel driver binary.
//!
//! Reads the host bootstrap marker, resolves the matching capability
//! provider, and runs one session for the media file named on the command
//! line. Under the externally-scripted hosts this binary is the whole
//! panel backend; under the script-engine hosts the embedding runtime
//! supplies the evaluated-script transport instead.

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use lsync_api::SubmitOptions;
use lsync_host::{HostRegistry, HostRuntime};
use lsync_models::{HostIdentity, HostMarker};
use lsync_session::{PanelConfig, SessionController};

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for TLS/HTTPS)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    // Load environment variables
    dotenvy::dotenv().ok();

    init_tracing();

    if let Err(e) = run().await {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("lsync=info".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }
}

async fn run() -> anyhow::Result<()> {
    let source = std::env::args()
        .nth(1)
        .context("usage: lsync-panel <media-file>")?;

    // The bootstrap marker is written before core logic runs and read
    // exactly once, here.
    let marker_json = std::env::var("LIPSYNC_HOST_MARKER")
        .context("LIPSYNC_HOST_MARKER is not set; the host bootstrap did not run")?;
    let marker: HostMarker =
        serde_json::from_str(&marker_json).context("invalid host bootstrap marker")?;
    let identity = HostIdentity::from_marker(&marker)?;

    info!(host = %identity.host_id, "starting lsync-panel for {}", identity.host_name);

    let handle = HostRegistry::resolve(&identity, &HostRuntime::default())?;
    HostRegistry::install(handle.clone())?;

    let config = PanelConfig::from_env();
    let mut controller = SessionController::new(handle, config)?;

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("received shutdown signal, cancelling session");
        ctrl_c.cancel();
    });

    let outcome = controller
        .run(source.as_ref(), SubmitOptions::default(), &cancel)
        .await?;

    if outcome.import.manual_action_required {
        info!(
            "processing finished; import the result manually from {}",
            outcome.import.artifact_path.display()
        );
    } else {
        info!("processing finished and result imported into the project");
    }

    Ok(())
}
