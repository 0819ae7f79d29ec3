//! Host registry: provider selection and the process-wide handle.

use std::sync::Arc;
use std::sync::OnceLock;
use std::time::Duration;

use tracing::info;

use lsync_models::{HostId, HostIdentity};

use crate::bridge::{EvalTransport, ScriptBridge};
use crate::capability::CapabilityHandle;
use crate::error::{HostError, HostResult};
use crate::providers::{
    AeftProvider, AutomationRunner, FcpxProvider, PproProvider, ProcessRunner, ResolveProvider,
};

/// Runtime collaborators handed to the registry by the embedding
/// environment: the evaluated-script transport (present only under the
/// script-engine hosts) and the automation runner for the external hosts.
#[derive(Clone)]
pub struct HostRuntime {
    pub script_transport: Option<Arc<dyn EvalTransport>>,
    pub automation: Arc<dyn AutomationRunner>,
    pub bridge_timeout: Duration,
}

impl Default for HostRuntime {
    fn default() -> Self {
        Self {
            script_transport: None,
            automation: Arc::new(ProcessRunner),
            bridge_timeout: ScriptBridge::DEFAULT_TIMEOUT,
        }
    }
}

impl HostRuntime {
    pub fn with_script_transport(mut self, transport: Arc<dyn EvalTransport>) -> Self {
        self.script_transport = Some(transport);
        self
    }

    pub fn with_automation(mut self, runner: Arc<dyn AutomationRunner>) -> Self {
        self.automation = runner;
        self
    }

    fn bridge(&self, identity: &HostIdentity) -> HostResult<ScriptBridge> {
        let transport = self.script_transport.clone().ok_or_else(|| {
            HostError::Bridge(format!(
                "no evaluated-script transport provided for {}",
                identity.host_id
            ))
        })?;
        Ok(ScriptBridge::new(transport).with_timeout(self.bridge_timeout))
    }
}

/// Selects the capability provider matching the detected host identity.
///
/// Selection is a pure function of the identity; detection itself happens
/// earlier, when the bootstrap marker is parsed into a [`HostIdentity`].
pub struct HostRegistry;

static HANDLE: OnceLock<CapabilityHandle> = OnceLock::new();

impl HostRegistry {
    /// Resolve the provider for `identity`.
    ///
    /// Total over the four known hosts. An identity that could not be
    /// parsed never reaches this point; it fails earlier with
    /// [`HostError::UnsupportedHost`].
    pub fn resolve(identity: &HostIdentity, runtime: &HostRuntime) -> HostResult<CapabilityHandle> {
        let handle: CapabilityHandle = match identity.host_id {
            HostId::Aeft => Arc::new(AeftProvider::new(identity.clone(), runtime.bridge(identity)?)),
            HostId::Ppro => Arc::new(PproProvider::new(identity.clone(), runtime.bridge(identity)?)),
            HostId::Fcpx => Arc::new(FcpxProvider::new(
                identity.clone(),
                runtime.automation.clone(),
            )),
            HostId::Resolve => Arc::new(ResolveProvider::new(
                identity.clone(),
                runtime.automation.clone(),
            )),
        };

        info!(
            host = %identity.host_id,
            host_name = %identity.host_name,
            bridge = identity.extendscript_capable,
            "selected host capability provider"
        );

        Ok(handle)
    }

    /// Install the process-wide handle. Rejected if one is already
    /// installed: the handle is never swapped mid-session.
    pub fn install(handle: CapabilityHandle) -> HostResult<()> {
        HANDLE
            .set(handle)
            .map_err(|_| HostError::AlreadyInstalled)
    }

    /// The handle installed for this session, if any.
    pub fn current() -> Option<CapabilityHandle> {
        HANDLE.get().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use lsync_models::{HostMarker, SystemPathKind};

    use crate::bridge::BridgeReply;

    struct EchoTransport;

    impl EvalTransport for EchoTransport {
        fn eval(&self, code: &str, done: Box<dyn FnOnce(BridgeReply) + Send>) {
            done(Ok(code.to_string()));
        }
    }

    fn identity(token: &str) -> HostIdentity {
        let marker = HostMarker {
            host_id: token.to_string(),
            host_name: token.to_string(),
            is_ae: token == "AEFT",
        };
        HostIdentity::from_marker(&marker).unwrap()
    }

    fn runtime_with_transport() -> HostRuntime {
        HostRuntime::default().with_script_transport(Arc::new(EchoTransport))
    }

    #[test]
    fn test_resolution_is_total_over_known_hosts() {
        let runtime = runtime_with_transport();
        for token in ["AEFT", "PPRO", "FCPX", "RESOLVE"] {
            let id = identity(token);
            let handle = HostRegistry::resolve(&id, &runtime).unwrap();
            assert_eq!(handle.identity().host_id, id.host_id);
        }
    }

    #[test]
    fn test_unknown_host_fails_before_resolution() {
        let marker = HostMarker {
            host_id: "KBRG".to_string(),
            host_name: "Bridge".to_string(),
            is_ae: false,
        };
        let err: HostError = HostIdentity::from_marker(&marker).unwrap_err().into();
        assert!(matches!(err, HostError::UnsupportedHost(ref h) if h == "KBRG"));
    }

    #[test]
    fn test_script_host_requires_transport() {
        let err = HostRegistry::resolve(&identity("AEFT"), &HostRuntime::default()).unwrap_err();
        assert!(matches!(err, HostError::Bridge(_)));
    }

    #[tokio::test]
    async fn test_fcpx_handle_rejects_script_capability() {
        // Scenario: marker {hostId:"FCPX"} selects the FCPX provider and
        // run_host_script on it is an unavailable capability.
        let handle =
            HostRegistry::resolve(&identity("FCPX"), &HostRuntime::default()).unwrap();
        let err = handle.run_host_script("app.version").await.unwrap_err();
        assert!(err.is_capability_unavailable());
    }

    #[tokio::test]
    async fn test_script_hosts_dispatch_through_bridge() {
        let handle = HostRegistry::resolve(&identity("PPRO"), &runtime_with_transport()).unwrap();
        let result = handle.run_host_script("app.version").await.unwrap();
        assert_eq!(result, "app.version");
    }

    #[tokio::test]
    async fn test_system_path_never_errors() {
        // A script host with no usable bridge reply still answers with a
        // stable (empty) string.
        struct FailingTransport;
        impl EvalTransport for FailingTransport {
            fn eval(&self, _code: &str, done: Box<dyn FnOnce(BridgeReply) + Send>) {
                done(Err("bridge offline".to_string()));
            }
        }

        let runtime =
            HostRuntime::default().with_script_transport(Arc::new(FailingTransport));
        let handle = HostRegistry::resolve(&identity("AEFT"), &runtime).unwrap();
        assert_eq!(handle.system_path(SystemPathKind::UserData).await, "");
    }
}
