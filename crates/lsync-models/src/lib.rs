//! Shared data models for the LipSync panel core.
//!
//! Everything that crosses a crate boundary lives here: host identity,
//! media assets, sync jobs and their status machine, transfer plans, and
//! import targets/results.

pub mod asset;
pub mod host;
pub mod import;
pub mod job;
pub mod transfer;

pub use asset::{MediaAsset, MediaKind, RemoteAssetRef};
pub use host::{HostId, HostIdentity, HostMarker, ProjectInfo, SystemPathKind, UnknownHostId};
pub use import::{ImportResult, ImportTarget};
pub use job::{JobId, SyncJob, SyncJobStatus};
pub use transfer::{TransferPlan, ASSET_MAX_BYTES, DEFAULT_CHUNK_BYTES, DIRECT_MAX_BYTES};
