//! Typed artifact metadata
//!
//! Frontmatter arrives as a loose YAML mapping. It is normalized here, once,
//! into [`ArtifactMetadata`]: scalar values become trimmed strings, empty
//! values become absent, and the dependency field (written either as a YAML
//! list or as a delimited string) becomes an ordered set. Nothing downstream
//! probes the raw mapping for rule evaluation.

use crate::kind::{ArtifactKind, ParentField, RequiredField};
use crate::status::{Checked, Status, Verdict};
use serde_yaml::{Mapping, Value};
use std::collections::BTreeSet;

/// Revision assumed for documents that never recorded one
pub const DEFAULT_REVISION: u64 = 1;

/// Parent references, one slot per parent key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParentRefs {
    pub parent_uc: Option<String>,
    pub parent_feat: Option<String>,
    pub parent_goal: Option<String>,
    pub origin: Option<String>,
}

impl ParentRefs {
    /// Value stored under `field`
    #[must_use]
    pub fn get(&self, field: ParentField) -> Option<&str> {
        match field {
            ParentField::ParentUc => self.parent_uc.as_deref(),
            ParentField::ParentFeat => self.parent_feat.as_deref(),
            ParentField::ParentGoal => self.parent_goal.as_deref(),
            ParentField::Origin => self.origin.as_deref(),
        }
    }

    /// Present references in [`ParentField::PRIORITY`] order
    pub fn iter(&self) -> impl Iterator<Item = (ParentField, &str)> + '_ {
        ParentField::PRIORITY
            .into_iter()
            .filter_map(|field| self.get(field).map(|value| (field, value)))
    }

    /// Highest-priority present reference; the edge followed by trace paths
    #[must_use]
    pub fn primary(&self) -> Option<(ParentField, &str)> {
        self.iter().next()
    }

    /// Whether any slot names `id`
    #[must_use]
    pub fn references(&self, id: &str) -> bool {
        self.iter().any(|(_, value)| value == id)
    }

    fn slot_mut(&mut self, field: ParentField) -> &mut Option<String> {
        match field {
            ParentField::ParentUc => &mut self.parent_uc,
            ParentField::ParentFeat => &mut self.parent_feat,
            ParentField::ParentGoal => &mut self.parent_goal,
            ParentField::Origin => &mut self.origin,
        }
    }
}

/// Fields that only exist on some kinds
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KindFields {
    Goal,
    Feature {
        /// Use cases under this feature need prerequisite research
        research_required: bool,
    },
    Research {
        hypothesis: Option<String>,
        verdict: Checked<Verdict>,
    },
    UseCase,
    Task,
}

/// Normalized metadata of one artifact document
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactMetadata {
    pub title: Option<String>,
    pub status: Checked<Status>,
    pub parents: ParentRefs,
    /// `None` when the key was never written; `Some(empty)` for `[]`/null
    pub dependencies: Option<BTreeSet<String>>,
    pub kind_fields: KindFields,
    pub revision: u64,
    /// The frontmatter exactly as read, kept for export
    pub raw: Mapping,
}

impl ArtifactMetadata {
    /// Normalize a frontmatter mapping for an artifact of `kind`
    #[must_use]
    pub fn from_mapping(kind: ArtifactKind, raw: &Mapping) -> Self {
        let mut parents = ParentRefs::default();
        for field in ParentField::PRIORITY {
            *parents.slot_mut(field) = scalar(raw, field.key());
        }

        let kind_fields = match kind {
            ArtifactKind::Goal => KindFields::Goal,
            ArtifactKind::Feature => KindFields::Feature {
                research_required: flag(raw, "research_required"),
            },
            ArtifactKind::Research => KindFields::Research {
                hypothesis: scalar(raw, "hypothesis"),
                verdict: Checked::from_raw(scalar(raw, "verdict")),
            },
            ArtifactKind::UseCase => KindFields::UseCase,
            ArtifactKind::Task => KindFields::Task,
        };

        let revision = counter(raw, "revision_count")
            .or_else(|| counter(raw, "revision"))
            .unwrap_or(DEFAULT_REVISION);

        Self {
            title: scalar(raw, "title"),
            status: Checked::from_raw(scalar(raw, "status")),
            parents,
            dependencies: raw.get("dependencies").map(dependency_set),
            kind_fields,
            revision,
            raw: raw.clone(),
        }
    }

    /// Dependency ids, empty when undeclared
    pub fn dependencies(&self) -> impl Iterator<Item = &str> + '_ {
        self.dependencies.iter().flatten().map(String::as_str)
    }

    /// `research_required` flag; false for every kind but Feature
    #[must_use]
    pub fn research_required(&self) -> bool {
        matches!(self.kind_fields, KindFields::Feature { research_required: true })
    }

    /// Verdict of a Research artifact
    #[must_use]
    pub fn verdict(&self) -> Option<Verdict> {
        match &self.kind_fields {
            KindFields::Research { verdict, .. } => verdict.valid(),
            _ => None,
        }
    }

    /// Presence check used by the completeness rule
    ///
    /// `id` is always present: documents without one never become artifacts.
    /// `dependencies` declared as `[]` or null counts as missing.
    #[must_use]
    pub fn has_field(&self, field: RequiredField) -> bool {
        match field {
            RequiredField::Id => true,
            RequiredField::Title => self.title.is_some(),
            RequiredField::Status => self.status.is_present(),
            RequiredField::ParentGoal => self.parents.parent_goal.is_some(),
            RequiredField::ParentFeat => self.parents.parent_feat.is_some(),
            RequiredField::ParentUc => self.parents.parent_uc.is_some(),
            RequiredField::Hypothesis => {
                matches!(&self.kind_fields, KindFields::Research { hypothesis: Some(_), .. })
            }
            RequiredField::Verdict => {
                matches!(&self.kind_fields, KindFields::Research { verdict, .. } if verdict.is_present())
            }
            RequiredField::Dependencies => self
                .dependencies
                .as_ref()
                .is_some_and(|deps| !deps.is_empty()),
        }
    }
}

/// Read `key` as a trimmed, non-empty string
///
/// Numbers and booleans are rendered as text so `id: 12` style values are
/// not silently dropped.
#[must_use]
pub fn scalar(raw: &Mapping, key: &str) -> Option<String> {
    raw.get(key).and_then(scalar_value)
}

fn scalar_value(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Tagged(tagged) => return scalar_value(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn flag(raw: &Mapping, key: &str) -> bool {
    match raw.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "yes" | "y" | "1"
        ),
        Some(Value::Number(n)) => n.as_u64().is_some_and(|n| n != 0),
        _ => false,
    }
}

fn counter(raw: &Mapping, key: &str) -> Option<u64> {
    match raw.get(key)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Canonical dependency set from either a YAML list or a delimited string
///
/// Strings are split on commas, semicolons and whitespace. Blank entries are
/// dropped; duplicates collapse.
#[must_use]
pub fn dependency_set(value: &Value) -> BTreeSet<String> {
    match value {
        Value::Sequence(items) => items.iter().filter_map(scalar_value).collect(),
        Value::String(s) => s
            .split(|c: char| c == ',' || c == ';' || c.is_whitespace())
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect(),
        Value::Tagged(tagged) => dependency_set(&tagged.value),
        other => scalar_value(other).into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn mapping(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn dependencies_from_list_and_string_agree() {
        let list = mapping("dependencies: [UC-2, UC-1, UC-2]");
        let text = mapping("dependencies: 'UC-1, UC-2;UC-2'");
        let a = ArtifactMetadata::from_mapping(ArtifactKind::UseCase, &list);
        let b = ArtifactMetadata::from_mapping(ArtifactKind::UseCase, &text);
        assert_eq!(a.dependencies, b.dependencies);
        assert_eq!(a.dependencies().collect::<Vec<_>>(), vec!["UC-1", "UC-2"]);
    }

    #[test]
    fn absent_versus_empty_dependencies() {
        let absent = ArtifactMetadata::from_mapping(ArtifactKind::UseCase, &mapping("title: x"));
        assert_eq!(absent.dependencies, None);
        assert!(!absent.has_field(RequiredField::Dependencies));

        let empty = ArtifactMetadata::from_mapping(ArtifactKind::UseCase, &mapping("dependencies: []"));
        assert_eq!(empty.dependencies, Some(BTreeSet::new()));
        assert!(!empty.has_field(RequiredField::Dependencies));

        let null = ArtifactMetadata::from_mapping(ArtifactKind::UseCase, &mapping("dependencies:"));
        assert!(!null.has_field(RequiredField::Dependencies));

        let listed = ArtifactMetadata::from_mapping(ArtifactKind::UseCase, &mapping("dependencies: [UC-2]"));
        assert!(listed.has_field(RequiredField::Dependencies));
    }

    #[test]
    fn empty_strings_are_absent() {
        let meta = ArtifactMetadata::from_mapping(
            ArtifactKind::Task,
            &mapping("title: '   '\nparent_uc: ''\nstatus: DRAFT"),
        );
        assert_eq!(meta.title, None);
        assert_eq!(meta.parents.parent_uc, None);
        assert_eq!(meta.status, Checked::Valid(Status::Draft));
    }

    #[test]
    fn parent_priority() {
        let meta = ArtifactMetadata::from_mapping(
            ArtifactKind::Task,
            &mapping("origin: GL-1\nparent_uc: UC-1"),
        );
        assert_eq!(meta.parents.primary(), Some((ParentField::ParentUc, "UC-1")));
        let all: Vec<_> = meta.parents.iter().collect();
        assert_eq!(all, vec![(ParentField::ParentUc, "UC-1"), (ParentField::Origin, "GL-1")]);
        assert!(meta.parents.references("GL-1"));
    }

    #[test]
    fn research_fields() {
        let meta = ArtifactMetadata::from_mapping(
            ArtifactKind::Research,
            &mapping("hypothesis: caching helps\nverdict: SUCCESS\nparent_goal: GL-1"),
        );
        assert_eq!(meta.verdict(), Some(Verdict::Success));
        assert!(meta.has_field(RequiredField::Hypothesis));
        assert!(meta.has_field(RequiredField::Verdict));
        assert!(!meta.has_field(RequiredField::Status));
    }

    #[test]
    fn research_required_flag_forms() {
        for yaml in ["research_required: true", "research_required: 'yes'", "research_required: 1"] {
            let meta = ArtifactMetadata::from_mapping(ArtifactKind::Feature, &mapping(yaml));
            assert!(meta.research_required(), "{yaml}");
        }
        let meta = ArtifactMetadata::from_mapping(ArtifactKind::Feature, &mapping("title: x"));
        assert!(!meta.research_required());
    }

    #[test]
    fn revision_defaults_and_reads() {
        let meta = ArtifactMetadata::from_mapping(ArtifactKind::Goal, &mapping("title: x"));
        assert_eq!(meta.revision, DEFAULT_REVISION);
        let meta = ArtifactMetadata::from_mapping(ArtifactKind::Goal, &mapping("revision_count: 4"));
        assert_eq!(meta.revision, 4);
    }

    #[test]
    fn numeric_scalars_are_text() {
        let raw = mapping("title: 42");
        assert_eq!(scalar(&raw, "title").as_deref(), Some("42"));
    }
}
