use thiserror::Error;

use crate::names::NameKind;

/// Errors raised while constructing journal types.
#[derive(Debug, Error)]
pub enum TypesError {
    /// A network, contract, alias or version name cannot be used as a path component.
    #[error("invalid {kind} name {name:?}: {reason}")]
    InvalidName {
        kind: NameKind,
        name: String,
        reason: String,
    },
}

/// Convenience alias for type-level results.
pub type TypesResult<T> = Result<T, TypesError>;
