//! Deterministic on-disk layout of the journal root.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;
use vaj_types::ArtifactPayload;

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};

/// Compiled image file inside a version directory.
pub const TVC_FILE: &str = "tvc";
/// Pretty-printed ABI file inside a version directory.
pub const ABI_FILE: &str = "abi.json";
/// Bytecode file inside a version directory.
pub const CODE_FILE: &str = "code";

/// Resolved paths of one journal root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreLayout {
    root: PathBuf,
    journal: PathBuf,
    declaration: PathBuf,
}

impl StoreLayout {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            root: config.root.clone(),
            journal: config.journal_path(),
            declaration: config.declaration_path(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn journal_path(&self) -> &Path {
        &self.journal
    }

    pub fn declaration_path(&self) -> &Path {
        &self.declaration
    }

    /// Whether `name` is taken by the journal or declaration file at the root.
    pub fn is_reserved(&self, name: &str) -> bool {
        [&self.journal, &self.declaration]
            .into_iter()
            .any(|path| path.file_name().is_some_and(|file| file == name))
    }

    /// `<root>/<network>/<contract>/<alias>/<version>`.
    pub fn version_dir(&self, network: &str, contract: &str, alias: &str, version: &str) -> PathBuf {
        self.root.join(network).join(contract).join(alias).join(version)
    }

    /// Read the three artifact files of a version directory.
    pub fn read_payload(&self, dir: &Path) -> StoreResult<ArtifactPayload> {
        Ok(ArtifactPayload {
            tvc: read_file(&dir.join(TVC_FILE))?,
            abi: read_file(&dir.join(ABI_FILE))?,
            code: read_file(&dir.join(CODE_FILE))?,
        })
    }

    /// Write the three artifact files, creating the directory as needed.
    pub fn write_payload(&self, dir: &Path, payload: &ArtifactPayload) -> StoreResult<()> {
        write_file(&dir.join(TVC_FILE), payload.tvc.as_bytes())?;
        write_file(&dir.join(ABI_FILE), payload.abi.as_bytes())?;
        write_file(&dir.join(CODE_FILE), payload.code.as_bytes())?;
        debug!(dir = %dir.display(), "artifact files written");
        Ok(())
    }

    /// Remove the root directory recursively. Returns `false` if it did not exist.
    pub fn remove_root(&self) -> StoreResult<bool> {
        match fs::remove_dir_all(&self.root) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(StoreError::Remove {
                path: self.root.clone(),
                source,
            }),
        }
    }
}

/// Re-render ABI text as 2-space indented JSON.
pub fn pretty_abi(tag: &str, abi: &str) -> StoreResult<String> {
    let value: serde_json::Value =
        serde_json::from_str(abi).map_err(|source| StoreError::InvalidAbi {
            tag: tag.to_string(),
            source,
        })?;
    serde_json::to_string_pretty(&value).map_err(|e| StoreError::Serialization(e.to_string()))
}

pub(crate) fn read_file(path: &Path) -> StoreResult<String> {
    fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// Replace `path` with `contents` through a temporary file in the same directory.
pub(crate) fn write_file(path: &Path, contents: &[u8]) -> StoreResult<()> {
    let write_err = |source: io::Error| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(write_err)?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(contents).map_err(write_err)?;
    tmp.flush().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}
