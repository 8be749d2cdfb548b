//! Deployment handler for the versioned artifact journal.
//!
//! Wraps an [`ArtifactStore`](vaj_store::ArtifactStore) and a [`Deployer`]:
//! each deployment is awaited first, then its address and build artifacts are
//! folded into a version record and appended to the journal.

pub mod deployer;
pub mod error;
pub mod handler;

pub use deployer::{BuildArtifacts, DeployRequest, Deployer, Deployment};
pub use error::{DeployError, DeployResult};
pub use handler::{ContractHandle, DeployOutcome, DeploymentHandler};
