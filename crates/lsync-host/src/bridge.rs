//! Evaluated-script bridge.
//!
//! The embedding runtime exposes script evaluation as a callback-based call
//! with no native promise support. [`ScriptBridge`] wraps that callback in a
//! single-resolution future with a bounded timeout so callers use the same
//! suspension model as every other asynchronous operation in the pipeline.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tracing::debug;

use crate::error::{HostError, HostResult};

/// Reply delivered by the embedding runtime: the script's string result, or
/// a transport-level dispatch failure.
pub type BridgeReply = Result<String, String>;

/// Sentinel string some bridge runtimes hand to the callback instead of a
/// script result when evaluation itself fails.
pub const EVAL_ERROR_SENTINEL: &str = "EvalScript error.";

/// The seam to the embedding runtime's `evalScript` call.
///
/// Implementations must invoke `done` exactly once, from any thread.
pub trait EvalTransport: Send + Sync {
    fn eval(&self, code: &str, done: Box<dyn FnOnce(BridgeReply) + Send>);
}

/// Async wrapper over a callback-based script transport.
#[derive(Clone)]
pub struct ScriptBridge {
    transport: Arc<dyn EvalTransport>,
    timeout: Duration,
}

impl ScriptBridge {
    /// Default bound on a single script evaluation.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

    pub fn new(transport: Arc<dyn EvalTransport>) -> Self {
        Self {
            transport,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Evaluate a script in the host and await its string result.
    ///
    /// Outcomes are kept distinct: a transport failure or the runtime's
    /// error sentinel is [`HostError::Bridge`], a callback that never fires
    /// is [`HostError::BridgeTimeout`], and a script that legitimately
    /// returns an empty string is `Ok("")`.
    pub async fn run(&self, code: &str) -> HostResult<String> {
        let (tx, rx) = oneshot::channel::<BridgeReply>();

        debug!(bytes = code.len(), "dispatching script to host bridge");
        self.transport.eval(
            code,
            Box::new(move |reply| {
                // A reply after timeout finds the receiver gone; ignore it.
                let _ = tx.send(reply);
            }),
        );

        match tokio::time::timeout(self.timeout, rx).await {
            Err(_) => Err(HostError::BridgeTimeout(self.timeout)),
            Ok(Err(_)) => Err(HostError::BridgeDropped),
            Ok(Ok(Err(transport_err))) => Err(HostError::Bridge(transport_err)),
            Ok(Ok(Ok(result))) if result == EVAL_ERROR_SENTINEL => Err(HostError::Bridge(
                "host runtime reported an evaluation error".to_string(),
            )),
            Ok(Ok(Ok(result))) => Ok(result),
        }
    }
}
