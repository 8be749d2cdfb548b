//! Validation for network, contract, alias and version names.
//!
//! Every name becomes a directory component under the journal root
//! (`<root>/<network>/<contract>/<alias>/<version>/`), so a name must be a
//! single, non-traversing path segment:
//! - Must be non-empty
//! - Must not be `.` or `..`
//! - Must not contain `/`, `\` or NUL

use std::fmt;

use crate::error::{TypesError, TypesResult};

/// Characters that are forbidden anywhere in a name.
const FORBIDDEN_CHARS: &[char] = &['/', '\\', '\0'];

/// Which level of the journal a name belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NameKind {
    Network,
    Contract,
    Alias,
    Version,
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network => write!(f, "network"),
            Self::Contract => write!(f, "contract"),
            Self::Alias => write!(f, "alias"),
            Self::Version => write!(f, "version"),
        }
    }
}

/// Validate a name, returning `Ok(())` if it is a safe path segment.
///
/// # Examples
///
/// ```
/// use vaj_types::{validate_name, NameKind};
///
/// assert!(validate_name(NameKind::Network, "local").is_ok());
/// assert!(validate_name(NameKind::Alias, "").is_err());
/// assert!(validate_name(NameKind::Contract, "../escape").is_err());
/// ```
pub fn validate_name(kind: NameKind, name: &str) -> TypesResult<()> {
    let invalid = |reason: &str| TypesError::InvalidName {
        kind,
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if name == "." || name == ".." {
        return Err(invalid("must not be a relative path component"));
    }
    if let Some(ch) = name.chars().find(|c| FORBIDDEN_CHARS.contains(c)) {
        return Err(invalid(&format!("contains forbidden character: {ch:?}")));
    }
    Ok(())
}
