use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::DeployResult;

/// Parameters of one contract deployment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployRequest {
    /// Contract name as known to the build system.
    pub contract: String,
    #[serde(default)]
    pub init_params: Value,
    #[serde(default)]
    pub constructor_params: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    /// Amount attached to the deploy message, in nano units.
    pub value: String,
}

impl DeployRequest {
    pub fn new(contract: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            contract: contract.into(),
            init_params: Value::Null,
            constructor_params: Value::Null,
            public_key: None,
            value: value.into(),
        }
    }

    pub fn with_init_params(mut self, params: Value) -> Self {
        self.init_params = params;
        self
    }

    pub fn with_constructor_params(mut self, params: Value) -> Self {
        self.constructor_params = params;
        self
    }

    pub fn with_public_key(mut self, key: impl Into<String>) -> Self {
        self.public_key = Some(key.into());
        self
    }
}

/// Build outputs of the deployed contract.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildArtifacts {
    pub abi: String,
    pub tvc: String,
    pub code: String,
    pub code_hash: String,
}

/// What a [`Deployer`] returns for a successful deployment.
#[derive(Clone, Debug, PartialEq)]
pub struct Deployment {
    /// Address of the deployed contract.
    pub address: String,
    pub artifacts: BuildArtifacts,
    /// Opaque transaction result, passed through to the caller.
    pub transaction: Value,
}

/// Performs on-chain deployments.
///
/// Implemented by the host framework; the journal never talks to a network
/// itself.
#[async_trait]
pub trait Deployer: Send + Sync {
    async fn deploy(&self, request: &DeployRequest) -> DeployResult<Deployment>;
}
