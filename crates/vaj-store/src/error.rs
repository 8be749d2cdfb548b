use std::path::PathBuf;

/// Errors from journal store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A file the journal depends on could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A journal, declaration or artifact file could not be written.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The root directory could not be removed during reset.
    #[error("failed to remove {}: {source}", .path.display())]
    Remove {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The journal file exists but is not valid journal JSON.
    #[error("corrupt journal {}: {source}", .path.display())]
    JournalParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A version's ABI text is not valid JSON.
    #[error("abi for version {tag} is not valid JSON: {source}")]
    InvalidAbi {
        tag: String,
        #[source]
        source: serde_json::Error,
    },

    /// Serialization of the in-memory structure failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The store configuration could not be loaded.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A network name collides with a file kept in the journal root.
    #[error("network name {name:?} is reserved for a file in the journal root")]
    ReservedName { name: String },

    /// A network, contract, alias or version name was rejected.
    #[error(transparent)]
    InvalidName(#[from] vaj_types::TypesError),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
