use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::layer::Layer;

/// Sentinel version name that asks for the next auto-generated tag.
pub const LATEST_VERSION: &str = "latest";

/// Versions of one alias, keyed by tag.
pub type Versions = Layer<VersionRecord>;
/// Aliases of one contract.
pub type Aliases = Layer<Versions>;
/// Contracts deployed on one network.
pub type Contracts = Layer<Aliases>;
/// The complete in-memory structure.
pub type Networks = Layer<Contracts>;

/// The journal's metadata-only mirror of [`Networks`].
pub type JournalNetworks = Layer<Layer<Layer<Layer<JournalVersion>>>>;

/// Auto-generated tag for the version at `index` within an alias.
pub fn version_tag(index: usize) -> String {
    format!("v_{index}")
}

/// Wall-clock milliseconds since the UNIX epoch.
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// How the tag of a newly added version is chosen.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum VersionSelector {
    /// Next dense tag: `v_{number of existing versions}`.
    #[default]
    Latest,
    /// Use this tag verbatim, overwriting any version already under it.
    Tag(String),
}

impl VersionSelector {
    /// Interpret a caller-supplied version name; `"latest"` is the sentinel.
    pub fn parse(name: &str) -> Self {
        if name == LATEST_VERSION {
            Self::Latest
        } else {
            Self::Tag(name.to_string())
        }
    }

    /// Resolve to a concrete tag given the alias's current version count.
    pub fn resolve(&self, existing: usize) -> String {
        match self {
            Self::Latest => version_tag(existing),
            Self::Tag(tag) => tag.clone(),
        }
    }
}

impl FromStr for VersionSelector {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<Option<&str>> for VersionSelector {
    fn from(name: Option<&str>) -> Self {
        name.map(Self::parse).unwrap_or_default()
    }
}

impl fmt::Display for VersionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => write!(f, "{LATEST_VERSION}"),
            Self::Tag(tag) => write!(f, "{tag}"),
        }
    }
}

/// The large build outputs of a version, stored as files beside the journal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactPayload {
    /// JSON text of the contract interface.
    pub abi: String,
    /// Serialized compiled image.
    pub tvc: String,
    /// Serialized bytecode.
    pub code: String,
}

/// One deployed version of a contract alias.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionRecord {
    pub address: String,
    pub code_hash: String,
    #[serde(default)]
    pub init_params: Value,
    #[serde(default)]
    pub constructor_params: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    /// Milliseconds since epoch; assigned once, when the version is first added.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<u64>,
    pub abi: String,
    pub tvc: String,
    pub code: String,
}

impl VersionRecord {
    /// Create a record with empty parameters and artifacts.
    pub fn new(address: impl Into<String>, code_hash: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            code_hash: code_hash.into(),
            init_params: Value::Null,
            constructor_params: Value::Null,
            public_key: None,
            updated_at: None,
            abi: String::new(),
            tvc: String::new(),
            code: String::new(),
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

    pub fn with_updated_at(mut self, ms: u64) -> Self {
        self.updated_at = Some(ms);
        self
    }

    pub fn with_payload(mut self, payload: ArtifactPayload) -> Self {
        self.abi = payload.abi;
        self.tvc = payload.tvc;
        self.code = payload.code;
        self
    }

    /// Copy of the artifact fields.
    pub fn payload(&self) -> ArtifactPayload {
        ArtifactPayload {
            abi: self.abi.clone(),
            tvc: self.tvc.clone(),
            code: self.code.clone(),
        }
    }

    /// The metadata-only projection written to the journal.
    pub fn to_journal(&self) -> JournalVersion {
        JournalVersion {
            address: self.address.clone(),
            code_hash: self.code_hash.clone(),
            init_params: self.init_params.clone(),
            constructor_params: self.constructor_params.clone(),
            public_key: self.public_key.clone(),
            updated_at: self.updated_at,
        }
    }
}

/// A version as listed in the journal: every field except `abi`, `tvc`, `code`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalVersion {
    pub address: String,
    pub code_hash: String,
    #[serde(default)]
    pub init_params: Value,
    #[serde(default)]
    pub constructor_params: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<u64>,
}

impl JournalVersion {
    /// Rejoin the metadata with its artifacts read back from disk.
    pub fn into_record(self, payload: ArtifactPayload) -> VersionRecord {
        VersionRecord {
            address: self.address,
            code_hash: self.code_hash,
            init_params: self.init_params,
            constructor_params: self.constructor_params,
            public_key: self.public_key,
            updated_at: self.updated_at,
            abi: payload.abi,
            tvc: payload.tvc,
            code: payload.code,
        }
    }
}
