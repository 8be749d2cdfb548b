use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{info, warn};
use vaj_store::{ArtifactStore, StoreConfig};
use vaj_types::{ArtifactPayload, VersionRecord, VersionSelector};

use crate::deployer::{DeployRequest, Deployer, Deployment};
use crate::error::{DeployError, DeployResult};

/// A deployed contract ready to be called: its address and parsed ABI.
#[derive(Clone, Debug, PartialEq)]
pub struct ContractHandle {
    pub address: String,
    pub abi: Value,
}

/// Result of [`DeploymentHandler::deploy_contract`].
#[derive(Clone, Debug, PartialEq)]
pub struct DeployOutcome {
    /// Tag the new version was recorded under.
    pub version: String,
    pub deployment: Deployment,
}

/// Deploys contracts on one network and journals every deployment.
pub struct DeploymentHandler<D> {
    store: ArtifactStore,
    network: String,
    deployer: D,
}

impl<D: Deployer> DeploymentHandler<D> {
    pub fn new(store: ArtifactStore, network: impl Into<String>, deployer: D) -> Self {
        Self {
            store,
            network: network.into(),
            deployer,
        }
    }

    /// Open the store described by `config` and wrap it.
    pub fn open(config: &StoreConfig, network: impl Into<String>, deployer: D) -> DeployResult<Self> {
        Ok(Self::new(ArtifactStore::open(config)?, network, deployer))
    }

    pub fn network(&self) -> &str {
        &self.network
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    /// Snapshot of every recorded deployment.
    pub fn artifacts(&self) -> DeployResult<Value> {
        Ok(self.store.data_obj()?)
    }

    /// Snapshot deserialized into a caller-defined shape.
    pub fn artifacts_as<T: DeserializeOwned>(&self) -> DeployResult<T> {
        Ok(self.store.data_as()?)
    }

    /// Build a callable handle from a recorded version.
    pub fn contract(&self, record: &VersionRecord) -> DeployResult<ContractHandle> {
        let abi = serde_json::from_str(&record.abi).map_err(|source| DeployError::InvalidAbi {
            address: record.address.clone(),
            source,
        })?;
        Ok(ContractHandle {
            address: record.address.clone(),
            abi,
        })
    }

    /// Deploy with the handler's deployer and record the result under
    /// (network, `request.contract`, `alias`, `version`).
    ///
    /// Names are checked before anything is deployed. Nothing is journaled
    /// if the deployment fails; if the deployment succeeds but cannot be
    /// recorded, it comes back in [`DeployError::Unrecorded`].
    pub async fn deploy_contract(
        &mut self,
        alias: &str,
        version: VersionSelector,
        request: DeployRequest,
    ) -> DeployResult<DeployOutcome> {
        self.store
            .check_target(&self.network, &request.contract, alias, &version)?;
        let deployment = self.deployer.deploy(&request).await?;
        self.record(alias, version, &request, deployment)
    }

    /// Like [`deploy_contract`](Self::deploy_contract) but with a one-off deployer.
    pub async fn deploy_contract_with(
        &mut self,
        deployer: &dyn Deployer,
        alias: &str,
        version: VersionSelector,
        request: DeployRequest,
    ) -> DeployResult<DeployOutcome> {
        self.store
            .check_target(&self.network, &request.contract, alias, &version)?;
        let deployment = deployer.deploy(&request).await?;
        self.record(alias, version, &request, deployment)
    }

    /// Forget every recorded deployment.
    pub fn reset(&mut self) -> DeployResult<()> {
        self.store.reset()?;
        Ok(())
    }

    fn record(
        &mut self,
        alias: &str,
        version: VersionSelector,
        request: &DeployRequest,
        deployment: Deployment,
    ) -> DeployResult<DeployOutcome> {
        let artifacts = &deployment.artifacts;
        let mut record = VersionRecord::new(&deployment.address, &artifacts.code_hash)
            .with_init_params(request.init_params.clone())
            .with_constructor_params(request.constructor_params.clone())
            .with_payload(ArtifactPayload {
                abi: artifacts.abi.clone(),
                tvc: artifacts.tvc.clone(),
                code: artifacts.code.clone(),
            });
        record.public_key = request.public_key.clone();

        let version = match self
            .store
            .add_contract(&self.network, &request.contract, alias, version, record)
        {
            Ok(version) => version,
            Err(source) => {
                warn!(
                    network = %self.network,
                    contract = %request.contract,
                    address = %deployment.address,
                    error = %source,
                    "deployed contract could not be recorded"
                );
                return Err(DeployError::Unrecorded {
                    deployment: Box::new(deployment),
                    source,
                });
            }
        };
        info!(
            network = %self.network,
            contract = %request.contract,
            alias,
            version = %version,
            address = %deployment.address,
            "contract deployed"
        );
        Ok(DeployOutcome {
            version,
            deployment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use serde_json::json;
    use vaj_store::StoreError;

    struct CountingDeployer {
        deployed: AtomicUsize,
        prefix: &'static str,
    }

    impl CountingDeployer {
        fn new(prefix: &'static str) -> Self {
            Self {
                deployed: AtomicUsize::new(0),
                prefix,
            }
        }
    }

    #[async_trait]
    impl Deployer for CountingDeployer {
        async fn deploy(&self, request: &DeployRequest) -> DeployResult<Deployment> {
            let n = self.deployed.fetch_add(1, Ordering::SeqCst);
            Ok(Deployment {
                address: format!("{}:{n}", self.prefix),
                artifacts: crate::deployer::BuildArtifacts {
                    abi: r#"{"ABI version":2,"functions":[{"name":"getState"}]}"#.into(),
                    tvc: format!("tvc-of-{}", request.contract),
                    code: format!("code-of-{}", request.contract),
                    code_hash: "c0de".into(),
                },
                transaction: json!({"id": n}),
            })
        }
    }

    struct GarbageAbiDeployer;

    #[async_trait]
    impl Deployer for GarbageAbiDeployer {
        async fn deploy(&self, _request: &DeployRequest) -> DeployResult<Deployment> {
            Ok(Deployment {
                address: "0:feed".into(),
                artifacts: crate::deployer::BuildArtifacts {
                    abi: "not json".into(),
                    tvc: "T".into(),
                    code: "C".into(),
                    code_hash: "c0de".into(),
                },
                transaction: json!({"id": 42}),
            })
        }
    }

    struct FailingDeployer;

    #[async_trait]
    impl Deployer for FailingDeployer {
        async fn deploy(&self, request: &DeployRequest) -> DeployResult<Deployment> {
            Err(DeployError::DeployFailed {
                contract: request.contract.clone(),
                reason: "insufficient balance".into(),
            })
        }
    }

    fn handler<D: Deployer>(dir: &tempfile::TempDir, deployer: D) -> DeploymentHandler<D> {
        let config = StoreConfig::at(dir.path().join("artifacts"));
        DeploymentHandler::open(&config, "local", deployer).unwrap()
    }

    fn sample_request() -> DeployRequest {
        DeployRequest::new("Sample", "3000000000")
            .with_init_params(json!({"_nonce": 0}))
            .with_constructor_params(json!({"_state": 0}))
            .with_public_key("a1b2")
    }

    #[tokio::test]
    async fn deploy_records_version() {
        let dir = tempfile::tempdir().unwrap();
        let mut h = handler(&dir, CountingDeployer::new("0"));

        let outcome = h
            .deploy_contract("SampleA", VersionSelector::Latest, sample_request())
            .await
            .unwrap();
        assert_eq!(outcome.version, "v_0");
        assert_eq!(outcome.deployment.transaction["id"], 0);

        let artifacts = h.artifacts().unwrap();
        let v0 = &artifacts["local"]["Sample"]["SampleA"]["v_0"];
        assert_eq!(v0["address"], "0:0");
        assert_eq!(v0["codeHash"], "c0de");
        assert_eq!(v0["initParams"]["_nonce"], 0);
        assert_eq!(v0["publicKey"], "a1b2");
        assert_eq!(v0["tvc"], "tvc-of-Sample");
        assert!(v0["updatedAt"].is_u64());
    }

    #[tokio::test]
    async fn repeated_deploys_are_versioned() {
        let dir = tempfile::tempdir().unwrap();
        let mut h = handler(&dir, CountingDeployer::new("0"));
        for _ in 0..3 {
            h.deploy_contract("SampleA", VersionSelector::parse("latest"), sample_request())
                .await
                .unwrap();
        }
        let versions = h.store().versions("local", "Sample", "SampleA").unwrap();
        assert_eq!(versions.keys().collect::<Vec<_>>(), vec!["v_0", "v_1", "v_2"]);
        assert_eq!(versions.get("v_2").unwrap().address, "0:2");
    }

    #[tokio::test]
    async fn failed_deploy_journals_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut h = handler(&dir, FailingDeployer);
        let err = h
            .deploy_contract("SampleA", VersionSelector::Latest, sample_request())
            .await
            .unwrap_err();
        assert!(matches!(err, DeployError::DeployFailed { .. }));
        assert!(h.store().is_empty());
        assert!(!h.store().journal_path().exists());
    }

    #[tokio::test]
    async fn bad_names_are_rejected_before_deploying() {
        let dir = tempfile::tempdir().unwrap();
        let mut h = handler(&dir, CountingDeployer::new("0"));

        let err = h
            .deploy_contract("bad/alias", VersionSelector::Latest, sample_request())
            .await
            .unwrap_err();
        assert!(matches!(err, DeployError::Store(StoreError::InvalidName(_))));

        let err = h
            .deploy_contract("SampleA", VersionSelector::Tag("..".into()), sample_request())
            .await
            .unwrap_err();
        assert!(matches!(err, DeployError::Store(StoreError::InvalidName(_))));

        let custom = CountingDeployer::new("-1");
        let request = DeployRequest::new("", "1");
        assert!(h
            .deploy_contract_with(&custom, "SampleA", VersionSelector::Latest, request)
            .await
            .is_err());

        assert_eq!(h.deployer.deployed.load(Ordering::SeqCst), 0);
        assert_eq!(custom.deployed.load(Ordering::SeqCst), 0);
        assert!(h.store().is_empty());
    }

    #[tokio::test]
    async fn reserved_network_is_rejected_before_deploying() {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::at(dir.path().join("artifacts"));
        let mut h = DeploymentHandler::open(&config, "journal.json", CountingDeployer::new("0")).unwrap();
        let err = h
            .deploy_contract("SampleA", VersionSelector::Latest, sample_request())
            .await
            .unwrap_err();
        assert!(matches!(err, DeployError::Store(StoreError::ReservedName { .. })));
        assert_eq!(h.deployer.deployed.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unrecordable_deployment_is_returned() {
        let dir = tempfile::tempdir().unwrap();
        let mut h = handler(&dir, GarbageAbiDeployer);
        let err = h
            .deploy_contract("SampleA", VersionSelector::Latest, sample_request())
            .await
            .unwrap_err();
        match err {
            DeployError::Unrecorded { deployment, source } => {
                assert_eq!(deployment.address, "0:feed");
                assert_eq!(deployment.transaction["id"], 42);
                assert!(matches!(source, StoreError::InvalidAbi { .. }));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(h.store().is_empty());
        assert!(!h.store().journal_path().exists());
    }

    #[tokio::test]
    async fn override_deployer_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let mut h = handler(&dir, FailingDeployer);
        let custom = CountingDeployer::new("-1");
        let outcome = h
            .deploy_contract_with(&custom, "Custom", VersionSelector::Tag("v_10".into()), sample_request())
            .await
            .unwrap();
        assert_eq!(outcome.version, "v_10");
        assert_eq!(outcome.deployment.address, "-1:0");
    }

    #[tokio::test]
    async fn deployments_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut h = handler(&dir, CountingDeployer::new("0"));
            h.deploy_contract("SampleA", VersionSelector::Latest, sample_request())
                .await
                .unwrap();
        }
        let h = handler(&dir, CountingDeployer::new("0"));
        let record = h.store().get("local", "Sample", "SampleA", "v_0").unwrap();
        let contract = h.contract(record).unwrap();
        assert_eq!(contract.address, "0:0");
        assert_eq!(contract.abi["functions"][0]["name"], "getState");
    }

    #[tokio::test]
    async fn typed_artifacts() {
        #[derive(serde::Deserialize)]
        struct Version {
            address: String,
        }
        #[derive(serde::Deserialize)]
        struct Sample {
            #[serde(rename = "SampleA")]
            sample_a: std::collections::HashMap<String, Version>,
        }
        #[derive(serde::Deserialize)]
        struct Local {
            #[serde(rename = "Sample")]
            sample: Sample,
        }
        #[derive(serde::Deserialize)]
        struct Artifacts {
            local: Local,
        }

        let dir = tempfile::tempdir().unwrap();
        let mut h = handler(&dir, CountingDeployer::new("0"));
        h.deploy_contract("SampleA", VersionSelector::Latest, sample_request())
            .await
            .unwrap();
        let typed: Artifacts = h.artifacts_as().unwrap();
        assert_eq!(typed.local.sample.sample_a["v_0"].address, "0:0");
    }

    #[tokio::test]
    async fn reset_clears_history() {
        let dir = tempfile::tempdir().unwrap();
        let mut h = handler(&dir, CountingDeployer::new("0"));
        h.deploy_contract("SampleA", VersionSelector::Latest, sample_request())
            .await
            .unwrap();
        h.reset().unwrap();
        assert_eq!(h.artifacts().unwrap(), json!({}));
        assert_eq!(h.network(), "local");
    }

    #[test]
    fn contract_rejects_bad_abi() {
        let dir = tempfile::tempdir().unwrap();
        let h = handler(&dir, FailingDeployer);
        let mut record = VersionRecord::new("0:1", "h");
        record.abi = "nope".into();
        assert!(matches!(
            h.contract(&record).unwrap_err(),
            DeployError::InvalidAbi { .. }
        ));
    }
}
