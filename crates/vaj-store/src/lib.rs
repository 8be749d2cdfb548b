//! Persistent store for the versioned artifact journal.
//!
//! The store keeps, per (network, contract, alias), an ordered history of
//! deployed versions. State lives in two places under one root directory:
//!
//! ```text
//! <root>/journal.json                                  metadata index
//! <root>/artifacts.d.ts                                generated declaration
//! <root>/<network>/<contract>/<alias>/<version>/tvc
//! <root>/<network>/<contract>/<alias>/<version>/abi.json
//! <root>/<network>/<contract>/<alias>/<version>/code
//! ```
//!
//! # Design Rules
//!
//! 1. The journal is the single source of truth for which versions exist.
//! 2. The journal never holds `abi`, `tvc` or `code`; those live only in the
//!    version directory and are merged back on load.
//! 3. Every append rewrites the whole journal, then writes the new version's
//!    files, then regenerates the declaration. The three steps are not
//!    transactional; each individual file is replaced atomically.
//! 4. Load is all-or-nothing: a malformed journal or a missing artifact file
//!    fails the open.
//! 5. One store per root per process. Concurrent writers lose updates.

pub mod config;
pub mod error;
pub mod journal;
pub mod layout;
pub mod store;
pub mod verify;

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use journal::{decode_journal, encode_journal, journal_view};
pub use layout::{StoreLayout, ABI_FILE, CODE_FILE, TVC_FILE};
pub use store::ArtifactStore;
pub use verify::{verify, MissingArtifact, VerifyReport};
