use thiserror::Error;

use crate::deployer::Deployment;

#[derive(Debug, Error)]
pub enum DeployError {
    /// The deployer could not deploy the contract.
    #[error("deployment of {contract} failed: {reason}")]
    DeployFailed { contract: String, reason: String },

    /// A stored ABI could not be parsed into a contract handle.
    #[error("abi for {address} is not valid JSON: {source}")]
    InvalidAbi {
        address: String,
        #[source]
        source: serde_json::Error,
    },

    /// The contract was deployed but the journal rejected the record.
    /// The deployment is returned so the caller can still reach it.
    #[error("contract deployed at {} but not recorded: {source}", .deployment.address)]
    Unrecorded {
        deployment: Box<Deployment>,
        #[source]
        source: vaj_store::StoreError,
    },

    #[error("store error: {0}")]
    Store(#[from] vaj_store::StoreError),
}

pub type DeployResult<T> = Result<T, DeployError>;
