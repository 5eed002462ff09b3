//! Artifact kinds and the fixed schema tables keyed by kind
//!
//! Every table here is an exhaustive `match` over [`ArtifactKind`], so adding
//! a kind fails to compile until its prefix, required fields and parent
//! routing are all declared.

use crate::error::ArtifactError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The five artifact kinds of the blueprint hierarchy
///
/// Goal → Feature/Research → UseCase → Task
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ArtifactKind {
    /// Top-level objective
    Goal,
    /// Product feature derived from a goal
    Feature,
    /// Research spike derived from a goal
    Research,
    /// Use case refining a feature
    UseCase,
    /// Unit of execution work for a use case
    Task,
}

impl ArtifactKind {
    /// All kinds, in hierarchy order
    pub const ALL: [ArtifactKind; 5] = [
        ArtifactKind::Goal,
        ArtifactKind::Feature,
        ArtifactKind::Research,
        ArtifactKind::UseCase,
        ArtifactKind::Task,
    ];

    /// ID prefix (the part before the first `-`)
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            ArtifactKind::Goal => "GL",
            ArtifactKind::Feature => "FT",
            ArtifactKind::Research => "RS",
            ArtifactKind::UseCase => "UC",
            ArtifactKind::Task => "TSK",
        }
    }

    /// Resolve a kind from an ID prefix
    #[must_use]
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.prefix() == prefix)
    }

    /// Derive the kind from a full artifact id such as `UC-100`
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        let (prefix, _) = id.split_once('-')?;
        Self::from_prefix(prefix)
    }

    /// Display name used in reports and exports
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ArtifactKind::Goal => "Goal",
            ArtifactKind::Feature => "Feature",
            ArtifactKind::Research => "Research",
            ArtifactKind::UseCase => "UseCase",
            ArtifactKind::Task => "Task",
        }
    }

    /// Metadata fields that must be present and non-empty for this kind
    #[must_use]
    pub const fn required_fields(self) -> &'static [RequiredField] {
        use RequiredField::*;
        match self {
            ArtifactKind::Goal => &[Id, Title, Status],
            ArtifactKind::Feature => &[Id, Title, Status, ParentGoal],
            ArtifactKind::Research => &[Id, Hypothesis, Verdict, ParentGoal],
            ArtifactKind::UseCase => &[Id, Title, Status, ParentFeat, Dependencies],
            ArtifactKind::Task => &[Id, Title, Status, ParentUc],
        }
    }

    /// Parent field this kind is expected to use
    #[must_use]
    pub const fn parent_field(self) -> Option<ParentField> {
        match self {
            ArtifactKind::Goal => None,
            ArtifactKind::Feature | ArtifactKind::Research => Some(ParentField::ParentGoal),
            ArtifactKind::UseCase => Some(ParentField::ParentFeat),
            ArtifactKind::Task => Some(ParentField::ParentUc),
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactKind {
    type Err = ArtifactError;

    /// Accepts the display name (`UseCase`) case-insensitively, or an ID
    /// prefix (`UC`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(trimmed) || k.prefix() == trimmed)
            .ok_or_else(|| ArtifactError::UnknownKind(s.to_string()))
    }
}

/// Metadata fields that can be demanded by the completeness table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredField {
    Id,
    Title,
    Status,
    ParentGoal,
    ParentFeat,
    ParentUc,
    Hypothesis,
    Verdict,
    Dependencies,
}

impl RequiredField {
    /// Frontmatter key
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            RequiredField::Id => "id",
            RequiredField::Title => "title",
            RequiredField::Status => "status",
            RequiredField::ParentGoal => ParentField::ParentGoal.key(),
            RequiredField::ParentFeat => ParentField::ParentFeat.key(),
            RequiredField::ParentUc => ParentField::ParentUc.key(),
            RequiredField::Hypothesis => "hypothesis",
            RequiredField::Verdict => "verdict",
            RequiredField::Dependencies => "dependencies",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The four metadata keys that point at a parent artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParentField {
    ParentUc,
    ParentFeat,
    ParentGoal,
    Origin,
}

impl ParentField {
    /// Lookup priority when walking upward: most specific first, `origin` last
    pub const PRIORITY: [ParentField; 4] = [
        ParentField::ParentUc,
        ParentField::ParentFeat,
        ParentField::ParentGoal,
        ParentField::Origin,
    ];

    /// Frontmatter key
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            ParentField::ParentUc => "parent_uc",
            ParentField::ParentFeat => "parent_feat",
            ParentField::ParentGoal => "parent_goal",
            ParentField::Origin => "origin",
        }
    }

    /// Key a child should use to point at a parent of `parent_kind`
    #[must_use]
    pub const fn for_parent_kind(parent_kind: ArtifactKind) -> Self {
        match parent_kind {
            ArtifactKind::Goal => ParentField::ParentGoal,
            ArtifactKind::Feature => ParentField::ParentFeat,
            ArtifactKind::UseCase => ParentField::ParentUc,
            ArtifactKind::Research | ArtifactKind::Task => ParentField::Origin,
        }
    }
}

impl fmt::Display for ParentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_from_id_prefix() {
        assert_eq!(ArtifactKind::from_id("GL-001"), Some(ArtifactKind::Goal));
        assert_eq!(ArtifactKind::from_id("FT-010"), Some(ArtifactKind::Feature));
        assert_eq!(ArtifactKind::from_id("RS-3"), Some(ArtifactKind::Research));
        assert_eq!(ArtifactKind::from_id("UC-100"), Some(ArtifactKind::UseCase));
        assert_eq!(ArtifactKind::from_id("TSK-7"), Some(ArtifactKind::Task));
    }

    #[test]
    fn kind_from_id_rejects_unknown() {
        assert_eq!(ArtifactKind::from_id("README"), None);
        assert_eq!(ArtifactKind::from_id("TS-1"), None);
        assert_eq!(ArtifactKind::from_id("UCX-1"), None);
        assert_eq!(ArtifactKind::from_id("uc-1"), None);
    }

    #[test]
    fn kind_parses_name_or_prefix() {
        assert_eq!("usecase".parse::<ArtifactKind>().unwrap(), ArtifactKind::UseCase);
        assert_eq!("TSK".parse::<ArtifactKind>().unwrap(), ArtifactKind::Task);
        assert!("Epic".parse::<ArtifactKind>().is_err());
    }

    #[test]
    fn use_case_requires_dependencies() {
        let fields = ArtifactKind::UseCase.required_fields();
        assert!(fields.contains(&RequiredField::Dependencies));
        assert!(fields.contains(&RequiredField::ParentFeat));
    }

    #[test]
    fn research_requires_verdict_not_status() {
        let fields = ArtifactKind::Research.required_fields();
        assert!(fields.contains(&RequiredField::Verdict));
        assert!(!fields.contains(&RequiredField::Status));
    }

    #[test]
    fn parent_routing() {
        assert_eq!(ParentField::for_parent_kind(ArtifactKind::Goal), ParentField::ParentGoal);
        assert_eq!(ParentField::for_parent_kind(ArtifactKind::UseCase), ParentField::ParentUc);
        assert_eq!(ParentField::for_parent_kind(ArtifactKind::Research), ParentField::Origin);
        assert_eq!(ArtifactKind::Task.parent_field(), Some(ParentField::ParentUc));
        assert_eq!(ArtifactKind::Goal.parent_field(), None);
    }
}
