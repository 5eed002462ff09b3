//! Artifact identifiers
//!
//! An [`ArtifactId`] is only constructible from a string with a known kind
//! prefix, so holding one proves the kind can be derived. References held in
//! metadata (parents, dependencies) stay plain strings: they may point at
//! nothing, and reporting that is the validator's job.

use crate::error::ArtifactError;
use crate::kind::ArtifactKind;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// Globally unique artifact id of the form `<PREFIX>-<suffix>`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArtifactId(String);

impl ArtifactId {
    /// Parse and validate an id
    ///
    /// # Errors
    /// - [`ArtifactError::UnknownPrefix`] if the prefix is not in the kind table
    /// - [`ArtifactError::EmptySuffix`] for ids like `UC-`
    pub fn parse(raw: impl AsRef<str>) -> Result<Self, ArtifactError> {
        let raw = raw.as_ref().trim();
        let Some((prefix, suffix)) = raw.split_once('-') else {
            return Err(ArtifactError::UnknownPrefix(raw.to_string()));
        };
        if ArtifactKind::from_prefix(prefix).is_none() {
            return Err(ArtifactError::UnknownPrefix(raw.to_string()));
        }
        if suffix.is_empty() {
            return Err(ArtifactError::EmptySuffix(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    /// Kind derived from the prefix
    #[must_use]
    pub fn kind(&self) -> ArtifactKind {
        match ArtifactKind::from_id(&self.0) {
            Some(kind) => kind,
            None => unreachable!("ArtifactId constructed without a known prefix"),
        }
    }

    /// Borrow as `&str`
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ArtifactId {
    type Err = ArtifactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ArtifactId {
    type Error = ArtifactError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ArtifactId> for String {
    fn from(value: ArtifactId) -> Self {
        value.0
    }
}

impl AsRef<str> for ArtifactId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Ord on the newtype matches Ord on the inner string, so maps keyed by
// ArtifactId can be queried with &str.
impl Borrow<str> for ArtifactId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn parse_valid_ids() {
        let id = ArtifactId::parse("UC-100").unwrap();
        assert_eq!(id.kind(), ArtifactKind::UseCase);
        assert_eq!(id.as_str(), "UC-100");

        let id = ArtifactId::parse("  TSK-0042 ").unwrap();
        assert_eq!(id.as_str(), "TSK-0042");
        assert_eq!(id.kind(), ArtifactKind::Task);
    }

    #[test]
    fn parse_rejects_unknown_prefix() {
        assert!(matches!(
            ArtifactId::parse("FB-UC-100"),
            Err(ArtifactError::UnknownPrefix(_))
        ));
        assert!(matches!(
            ArtifactId::parse("Design_Patterns"),
            Err(ArtifactError::UnknownPrefix(_))
        ));
    }

    #[test]
    fn parse_rejects_empty_suffix() {
        assert!(matches!(ArtifactId::parse("GL-"), Err(ArtifactError::EmptySuffix(_))));
    }

    #[test]
    fn map_lookup_by_str() {
        let mut map = BTreeMap::new();
        map.insert(ArtifactId::parse("GL-001").unwrap(), 1);
        assert_eq!(map.get("GL-001"), Some(&1));
        assert_eq!(map.get("GL-002"), None);
    }
}
