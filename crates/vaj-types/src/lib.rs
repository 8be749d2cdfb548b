//! Foundation types for the versioned artifact journal (VAJ).
//!
//! The journal records, for every (network, contract, alias) triple, an ordered
//! history of deployment versions. This crate holds the data model shared by
//! the store, the declaration generator and the deployment handler.
//!
//! # Key Types
//!
//! - [`Layer`]: Insertion-ordered string-keyed map used at every nesting level
//! - [`Networks`]: The full four-level structure (network → contract → alias → version)
//! - [`VersionRecord`]: One deployed version with its build artifacts
//! - [`JournalVersion`]: Metadata-only view of a version, as stored in the journal
//! - [`ArtifactPayload`]: The large binary fields kept outside the journal
//! - [`VersionSelector`]: Explicit version tag or the `latest` sentinel

pub mod error;
pub mod layer;
pub mod names;
pub mod version;

pub use error::{TypesError, TypesResult};
pub use layer::Layer;
pub use names::{validate_name, NameKind};
pub use version::{
    now_ms, version_tag, Aliases, ArtifactPayload, Contracts, JournalNetworks, JournalVersion,
    Networks, VersionRecord, VersionSelector, Versions, LATEST_VERSION,
};

/// Name of a network (e.g. `local`, `mainnet`).
pub type NetworkName = String;
/// Name of a contract as known to the build system.
pub type ContractName = String;
/// User-chosen logical name for one deployment instance of a contract.
pub type AliasName = String;
/// Version tag within an alias (`v_0`, `v_1`, ... or explicit).
pub type VersionName = String;
