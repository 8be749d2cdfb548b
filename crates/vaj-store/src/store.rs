use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};
use vaj_typegen::render_declaration;
use vaj_types::{
    now_ms, validate_name, NameKind, Networks, VersionRecord, VersionSelector, Versions,
};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::journal::{decode_journal, encode_journal};
use crate::layout::{pretty_abi, read_file, write_file, StoreLayout};

/// Versioned artifact journal backed by a root directory.
///
/// The full structure is held in memory. It is read once when the store is
/// opened and afterwards only changed by [`add_contract`](Self::add_contract)
/// and [`reset`](Self::reset), each of which flushes to disk before
/// returning.
pub struct ArtifactStore {
    data: Networks,
    layout: StoreLayout,
    interface_name: String,
}

impl std::fmt::Debug for ArtifactStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactStore")
            .field("root", &self.layout.root())
            .field("networks", &self.data.len())
            .field("versions", &self.len())
            .finish()
    }
}

impl ArtifactStore {
    /// Open the store described by `config`, loading any existing journal.
    pub fn open(config: &StoreConfig) -> StoreResult<Self> {
        let layout = StoreLayout::new(config);
        let data = load(&layout)?;
        let store = Self {
            data,
            layout,
            interface_name: config.interface_name.clone(),
        };
        info!(
            root = %store.layout.root().display(),
            networks = store.data.len(),
            versions = store.len(),
            "artifact journal opened"
        );
        Ok(store)
    }

    /// Open a store with default settings rooted at `root`.
    pub fn open_at(root: impl AsRef<Path>) -> StoreResult<Self> {
        Self::open(&StoreConfig::at(root.as_ref()))
    }

    // ---------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------

    /// Record a new version and flush it to disk. Returns the resolved tag.
    ///
    /// With [`VersionSelector::Latest`] the tag is `v_{n}` where `n` is the
    /// alias's current version count; an explicit tag is used verbatim and
    /// replaces any version already stored under it. `updated_at` is set to
    /// the current time unless the record already carries one.
    ///
    /// After the in-memory insert the journal is rewritten, then the version's
    /// artifact files, then the declaration. A failure part-way leaves the
    /// earlier steps on disk.
    pub fn add_contract(
        &mut self,
        network: &str,
        contract: &str,
        alias: &str,
        version: VersionSelector,
        mut record: VersionRecord,
    ) -> StoreResult<String> {
        self.check_target(network, contract, alias, &version)?;

        let existing = self.versions(network, contract, alias).map_or(0, Versions::len);
        let tag = version.resolve(existing);
        validate_name(NameKind::Version, &tag)?;

        record.abi = pretty_abi(&tag, &record.abi)?;
        if record.updated_at.is_none() {
            record.updated_at = Some(now_ms());
        }
        let payload = record.payload();

        let replaced = self
            .data
            .entry_or_default(network)
            .entry_or_default(contract)
            .entry_or_default(alias)
            .insert(tag.as_str(), record)
            .is_some();

        self.save_journal()?;
        let dir = self.layout.version_dir(network, contract, alias, &tag);
        self.layout.write_payload(&dir, &payload)?;
        self.save_declaration()?;

        debug!(network, contract, alias, version = %tag, replaced, "version recorded");
        Ok(tag)
    }

    /// Check that a version could be recorded under these names, without
    /// touching any state.
    ///
    /// Names must be safe path segments, and a network may not shadow the
    /// journal or declaration file in the root.
    pub fn check_target(
        &self,
        network: &str,
        contract: &str,
        alias: &str,
        version: &VersionSelector,
    ) -> StoreResult<()> {
        validate_name(NameKind::Network, network)?;
        validate_name(NameKind::Contract, contract)?;
        validate_name(NameKind::Alias, alias)?;
        if let VersionSelector::Tag(tag) = version {
            validate_name(NameKind::Version, tag)?;
        }
        if self.layout.is_reserved(network) {
            return Err(StoreError::ReservedName {
                name: network.to_string(),
            });
        }
        Ok(())
    }

    /// Delete everything: the root directory, the in-memory structure, and
    /// start over with an empty journal and declaration.
    pub fn reset(&mut self) -> StoreResult<()> {
        let removed = self.layout.remove_root()?;
        self.data.clear();
        self.save_journal()?;
        self.save_declaration()?;
        info!(root = %self.layout.root().display(), removed, "artifact journal reset");
        Ok(())
    }

    /// Rewrite the declaration file from the current structure.
    pub fn save_declaration(&self) -> StoreResult<()> {
        let text = render_declaration(&self.interface_name, &self.data);
        write_file(self.layout.declaration_path(), text.as_bytes())?;
        debug!(path = %self.layout.declaration_path().display(), "declaration written");
        Ok(())
    }

    fn save_journal(&self) -> StoreResult<()> {
        let text = encode_journal(&self.data)?;
        write_file(self.layout.journal_path(), text.as_bytes())?;
        debug!(path = %self.layout.journal_path().display(), "journal written");
        Ok(())
    }

    // ---------------------------------------------------------------
    // Reads
    // ---------------------------------------------------------------

    /// Plain nested-object snapshot of the whole structure, binaries included.
    pub fn data_obj(&self) -> StoreResult<Value> {
        serde_json::to_value(&self.data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Snapshot deserialized into a caller-defined shape.
    pub fn data_as<T: DeserializeOwned>(&self) -> StoreResult<T> {
        serde_json::from_value(self.data_obj()?)
            .map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// The typed in-memory structure.
    pub fn data(&self) -> &Networks {
        &self.data
    }

    pub fn get(
        &self,
        network: &str,
        contract: &str,
        alias: &str,
        version: &str,
    ) -> Option<&VersionRecord> {
        self.versions(network, contract, alias)?.get(version)
    }

    /// All versions of one alias, in insertion order.
    pub fn versions(&self, network: &str, contract: &str, alias: &str) -> Option<&Versions> {
        self.data.get(network)?.get(contract)?.get(alias)
    }

    /// The version in the last position of an alias.
    pub fn last(&self, network: &str, contract: &str, alias: &str) -> Option<(&str, &VersionRecord)> {
        self.versions(network, contract, alias)?.last()
    }

    /// Network names in insertion order.
    pub fn networks(&self) -> impl Iterator<Item = &str> {
        self.data.keys()
    }

    /// Total number of versions across all networks.
    pub fn len(&self) -> usize {
        self.data
            .values()
            .flat_map(|contracts| contracts.values())
            .flat_map(|aliases| aliases.values())
            .map(Versions::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn layout(&self) -> &StoreLayout {
        &self.layout
    }

    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    pub fn journal_path(&self) -> &Path {
        self.layout.journal_path()
    }

    pub fn declaration_path(&self) -> &Path {
        self.layout.declaration_path()
    }
}

/// Rebuild the structure from the journal and the version directories.
fn load(layout: &StoreLayout) -> StoreResult<Networks> {
    let journal_path = layout.journal_path();
    if !layout.root().is_dir() || !journal_path.is_file() {
        debug!(root = %layout.root().display(), "no journal found; starting empty");
        return Ok(Networks::new());
    }

    let text = read_file(journal_path)?;
    let journal = decode_journal(&text).map_err(|source| StoreError::JournalParse {
        path: journal_path.to_path_buf(),
        source,
    })?;

    let mut data = Networks::new();
    for (network, contracts) in journal {
        let contracts_out = data.entry_or_default(&network);
        for (contract, aliases) in contracts {
            let aliases_out = contracts_out.entry_or_default(&contract);
            for (alias, versions) in aliases {
                let versions_out = aliases_out.entry_or_default(&alias);
                for (tag, meta) in versions {
                    let dir = layout.version_dir(&network, &contract, &alias, &tag);
                    let payload = layout.read_payload(&dir)?;
                    versions_out.insert(tag, meta.into_record(payload));
                }
            }
        }
    }
    Ok(data)
}
