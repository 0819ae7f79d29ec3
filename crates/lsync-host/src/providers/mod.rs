//! Per-host capability providers.
//!
//! AEFT and PPRO run over the embedded evaluated-script bridge; FCPX and
//! Resolve run over their external automation tools.

mod aeft;
mod fcpx;
mod ppro;
mod resolve;

pub use aeft::AeftProvider;
pub use fcpx::FcpxProvider;
pub use ppro::PproProvider;
pub use resolve::ResolveProvider;

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::{HostError, HostResult};

/// Seam to the external automation surface of the scripted hosts.
///
/// Runs one automation invocation to completion and returns its stdout.
#[async_trait]
pub trait AutomationRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[String]) -> HostResult<String>;
}

/// Subprocess-backed runner used in production.
#[derive(Debug, Default)]
pub struct ProcessRunner;

#[async_trait]
impl AutomationRunner for ProcessRunner {
    async fn run(&self, program: &str, args: &[String]) -> HostResult<String> {
        debug!(program, ?args, "running host automation tool");

        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(HostError::Automation(format!(
                "{} exited with {}: {}",
                program,
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// Quote a string for inclusion in a host-side script literal.
pub(crate) fn script_quote(raw: &str) -> String {
    let mut quoted = String::with_capacity(raw.len() + 2);
    quoted.push('"');
    for c in raw.chars() {
        match c {
            '\\' => quoted.push_str("\\\\"),
            '"' => quoted.push_str("\\\""),
            '\n' => quoted.push_str("\\n"),
            '\r' => quoted.push_str("\\r"),
            other => quoted.push(other),
        }
    }
    quoted.push('"');
    quoted
}
