//! Journal view transform and codec.
//!
//! The journal is the full structure with every version reduced to its
//! metadata ([`JournalVersion`]), written as 2-space indented JSON with keys
//! in insertion order.

use vaj_types::{JournalNetworks, JournalVersion, Layer, Networks};

use crate::error::{StoreError, StoreResult};

/// Metadata-only projection of the whole structure.
pub fn journal_view(data: &Networks) -> JournalNetworks {
    data.map_values(|contracts| {
        contracts.map_values(|aliases| {
            aliases.map_values(|versions| versions.map_values(|record| record.to_journal()))
        })
    })
}

/// Render the journal text for the whole structure.
pub fn encode_journal(data: &Networks) -> StoreResult<String> {
    serde_json::to_string_pretty(&journal_view(data))
        .map_err(|e| StoreError::Serialization(e.to_string()))
}

type NullableNetworks = Layer<Option<Layer<Layer<Layer<JournalVersion>>>>>;

/// Parse journal text.
///
/// Blank text is an empty journal, and networks whose value is `null` are
/// skipped.
pub fn decode_journal(text: &str) -> Result<JournalNetworks, serde_json::Error> {
    if text.trim().is_empty() {
        return Ok(JournalNetworks::new());
    }
    let parsed: NullableNetworks = serde_json::from_str(text)?;
    Ok(parsed
        .into_iter()
        .filter_map(|(name, contracts)| contracts.map(|c| (name, c)))
        .collect())
}
