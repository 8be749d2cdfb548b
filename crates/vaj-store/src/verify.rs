//! Consistency check between the journal and the version directories.
//!
//! Opening a store fails hard when a listed version is missing its files, and
//! the journal is never patched automatically. `verify` gives an operator the
//! full picture before fixing things by hand: which listed versions are
//! incomplete, and which version directories the journal does not know about.

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::warn;
use walkdir::WalkDir;

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::journal::decode_journal;
use crate::layout::{read_file, StoreLayout, ABI_FILE, CODE_FILE, TVC_FILE};

/// A journal entry whose artifact files are incomplete.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MissingArtifact {
    pub network: String,
    pub contract: String,
    pub alias: String,
    pub version: String,
    /// File names absent from the version directory.
    pub files: Vec<&'static str>,
}

/// Result of [`verify`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    /// Number of versions listed in the journal.
    pub versions: usize,
    pub missing: Vec<MissingArtifact>,
    /// Version directories that the journal does not list.
    pub orphans: Vec<PathBuf>,
}

impl VerifyReport {
    pub fn is_consistent(&self) -> bool {
        self.missing.is_empty() && self.orphans.is_empty()
    }
}

/// Compare the journal with the directory tree without loading artifacts.
///
/// Fails only when the journal itself cannot be read or parsed.
pub fn verify(config: &StoreConfig) -> StoreResult<VerifyReport> {
    let layout = StoreLayout::new(config);
    let mut report = VerifyReport::default();
    let journal_path = layout.journal_path();
    if !journal_path.is_file() {
        return Ok(report);
    }

    let text = read_file(journal_path)?;
    let journal = decode_journal(&text).map_err(|source| StoreError::JournalParse {
        path: journal_path.to_path_buf(),
        source,
    })?;

    let mut listed = HashSet::new();
    for (network, contracts) in journal.iter() {
        for (contract, aliases) in contracts.iter() {
            for (alias, versions) in aliases.iter() {
                for version in versions.keys() {
                    report.versions += 1;
                    let dir = layout.version_dir(network, contract, alias, version);
                    let files: Vec<&'static str> = [TVC_FILE, ABI_FILE, CODE_FILE]
                        .into_iter()
                        .filter(|name| !dir.join(name).is_file())
                        .collect();
                    if !files.is_empty() {
                        warn!(dir = %dir.display(), ?files, "listed version is missing artifacts");
                        report.missing.push(MissingArtifact {
                            network: network.to_string(),
                            contract: contract.to_string(),
                            alias: alias.to_string(),
                            version: version.to_string(),
                            files,
                        });
                    }
                    listed.insert(dir);
                }
            }
        }
    }

    report.orphans = find_orphans(layout.root(), &listed)?;
    for orphan in &report.orphans {
        warn!(dir = %orphan.display(), "version directory not listed in journal");
    }
    Ok(report)
}

/// Directories at version depth (`<network>/<contract>/<alias>/<version>`) not in `listed`.
fn find_orphans(root: &Path, listed: &HashSet<PathBuf>) -> StoreResult<Vec<PathBuf>> {
    let mut orphans = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(4)
        .max_depth(4)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| StoreError::Read {
            path: e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf()),
            source: io::Error::from(e),
        })?;
        if entry.file_type().is_dir() && !listed.contains(entry.path()) {
            orphans.push(entry.into_path());
        }
    }
    Ok(orphans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use vaj_types::{ArtifactPayload, VersionRecord, VersionSelector};

    use crate::store::ArtifactStore;

    fn record() -> VersionRecord {
        VersionRecord::new("0:1", "h").with_payload(ArtifactPayload {
            abi: "{}".into(),
            tvc: "T".into(),
            code: "C".into(),
        })
    }

    fn populated() -> (tempfile::TempDir, StoreConfig) {
        let dir = tempfile::tempdir().unwrap();
        let config = StoreConfig::at(dir.path().join("artifacts"));
        let mut store = ArtifactStore::open(&config).unwrap();
        store
            .add_contract("local", "A", "a", VersionSelector::Latest, record())
            .unwrap();
        store
            .add_contract("local", "A", "a", VersionSelector::Latest, record())
            .unwrap();
        (dir, config)
    }

    #[test]
    fn missing_root_is_consistent() {
        let dir = tempfile::tempdir().unwrap();
        let report = verify(&StoreConfig::at(dir.path().join("none"))).unwrap();
        assert!(report.is_consistent());
        assert_eq!(report.versions, 0);
    }

    #[test]
    fn fresh_store_is_consistent() {
        let (_dir, config) = populated();
        let report = verify(&config).unwrap();
        assert!(report.is_consistent());
        assert_eq!(report.versions, 2);
    }

    #[test]
    fn reports_missing_files() {
        let (_dir, config) = populated();
        let vdir = config.root.join("local/A/a/v_1");
        fs::remove_file(vdir.join(ABI_FILE)).unwrap();
        fs::remove_file(vdir.join(CODE_FILE)).unwrap();

        let report = verify(&config).unwrap();
        assert_eq!(report.missing.len(), 1);
        let missing = &report.missing[0];
        assert_eq!(missing.version, "v_1");
        assert_eq!(missing.files, vec![ABI_FILE, CODE_FILE]);
        assert!(report.orphans.is_empty());
    }

    #[test]
    fn reports_orphan_directories() {
        let (_dir, config) = populated();
        let orphan = config.root.join("local/A/a/v_7");
        fs::create_dir_all(&orphan).unwrap();
        fs::create_dir_all(config.root.join("dev/B/b/v_0")).unwrap();

        let report = verify(&config).unwrap();
        assert_eq!(
            report.orphans,
            vec![config.root.join("dev/B/b/v_0"), orphan]
        );
        assert!(!report.is_consistent());
    }

    #[test]
    fn corrupt_journal_is_an_error() {
        let (_dir, config) = populated();
        fs::write(config.journal_path(), "[").unwrap();
        assert!(matches!(
            verify(&config).unwrap_err(),
            StoreError::JournalParse { .. }
        ));
    }
}
