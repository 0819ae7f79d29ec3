//! Host capability abstraction.
//!
//! One fixed capability surface ([`capability::HostCapabilities`]) with a
//! provider per host: After Effects and Premiere Pro dispatch through the
//! embedded evaluated-script bridge, Final Cut Pro and DaVinci Resolve go
//! through their external automation tools. The [`registry`] selects the
//! provider matching the identity detected at panel load.

pub mod bridge;
pub mod capability;
pub mod error;
pub mod providers;
pub mod registry;

pub use bridge::{BridgeReply, EvalTransport, ScriptBridge};
pub use capability::{CapabilityHandle, HostCapabilities};
pub use error::{HostError, HostResult};
pub use providers::{AutomationRunner, ProcessRunner};
pub use registry::{HostRegistry, HostRuntime};
