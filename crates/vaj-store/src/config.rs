use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use vaj_typegen::DEFAULT_INTERFACE_NAME;

use crate::error::{StoreError, StoreResult};

/// Where the journal lives and how the declaration is named.
///
/// Every field has a default, so a TOML file only needs the keys it changes:
///
/// ```toml
/// root = "deployments"
/// interface_name = "IDeployments"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Root directory holding the journal and the version directories.
    pub root: PathBuf,
    /// Journal file name inside `root`.
    pub journal_file: String,
    /// Generated declaration file name inside `root`.
    pub declaration_file: String,
    /// Name of the exported interface in the declaration.
    pub interface_name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("artifacts"),
            journal_file: "journal.json".into(),
            declaration_file: "artifacts.d.ts".into(),
            interface_name: DEFAULT_INTERFACE_NAME.into(),
        }
    }
}

impl StoreConfig {
    /// Default configuration rooted at `root`.
    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Configuration for an explicit journal path; the root is its parent directory.
    pub fn for_journal(journal_path: impl AsRef<Path>) -> Self {
        let journal_path = journal_path.as_ref();
        let root = journal_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let mut config = Self::at(root);
        if let Some(name) = journal_path.file_name() {
            config.journal_file = name.to_string_lossy().into_owned();
        }
        config
    }

    pub fn from_toml_str(text: &str) -> StoreResult<Self> {
        toml::from_str(text).map_err(|e| StoreError::Config(e.to_string()))
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| StoreError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn journal_path(&self) -> PathBuf {
        self.root.join(&self.journal_file)
    }

    pub fn declaration_path(&self) -> PathBuf {
        self.root.join(&self.declaration_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = StoreConfig::default();
        assert_eq!(c.root, PathBuf::from("artifacts"));
        assert_eq!(c.journal_path(), PathBuf::from("artifacts/journal.json"));
        assert_eq!(c.declaration_path(), PathBuf::from("artifacts/artifacts.d.ts"));
        assert_eq!(c.interface_name, "IDeployArtifacts");
    }

    #[test]
    fn for_journal_splits_path() {
        let c = StoreConfig::for_journal("./build/history.json");
        assert_eq!(c.root, PathBuf::from("./build"));
        assert_eq!(c.journal_file, "history.json");
        assert_eq!(c.declaration_file, "artifacts.d.ts");
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = StoreConfig::from_toml_str("root = \"deployments\"\n").unwrap();
        assert_eq!(c.root, PathBuf::from("deployments"));
        assert_eq!(c.journal_file, "journal.json");
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let err = StoreConfig::from_toml_str("root = [").unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn toml_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vaj.toml");
        fs::write(&path, "interface_name = \"IMine\"\n").unwrap();
        let c = StoreConfig::from_toml_file(&path).unwrap();
        assert_eq!(c.interface_name, "IMine");
    }
}
