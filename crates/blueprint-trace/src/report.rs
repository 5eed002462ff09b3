//! Validation report
//!
//! An ordered, serializable list of issues with a plain-text summary.

use blueprint_artifact::{ArtifactId, ArtifactKind, DocumentLocation};
use serde::Serialize;
use std::fmt;

/// How serious an issue is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error taxonomy class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Structural,
    Referential,
    Completeness,
    Lifecycle,
    Advisory,
}

/// Kind of issue found by the validator
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueKind {
    DuplicateId,
    MissingField,
    /// Status or verdict outside its enumerated set
    InvalidValue,
    Orphan,
    GateViolation,
    BlockedByParent,
    SoftWarning,
}

impl IssueKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            IssueKind::DuplicateId => "DUPLICATE_ID",
            IssueKind::MissingField => "MISSING_FIELD",
            IssueKind::InvalidValue => "INVALID_VALUE",
            IssueKind::Orphan => "ORPHAN",
            IssueKind::GateViolation => "GATE_VIOLATION",
            IssueKind::BlockedByParent => "BLOCKED_BY_PARENT",
            IssueKind::SoftWarning => "SOFT_WARNING",
        }
    }

    #[must_use]
    pub const fn category(self) -> Category {
        match self {
            IssueKind::DuplicateId => Category::Structural,
            IssueKind::Orphan => Category::Referential,
            IssueKind::MissingField | IssueKind::InvalidValue => Category::Completeness,
            IssueKind::GateViolation | IssueKind::BlockedByParent => Category::Lifecycle,
            IssueKind::SoftWarning => Category::Advisory,
        }
    }

    /// Severity the validator always assigns to this kind
    #[must_use]
    pub const fn severity(self) -> Severity {
        match self {
            IssueKind::SoftWarning => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub artifact_id: ArtifactId,
    pub kind: ArtifactKind,
    pub location: DocumentLocation,
    pub error_kind: IssueKind,
    pub message: String,
    pub severity: Severity,
}

impl ValidationIssue {
    #[must_use]
    pub fn new(
        artifact_id: ArtifactId,
        location: DocumentLocation,
        error_kind: IssueKind,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind: artifact_id.kind(),
            artifact_id,
            location,
            error_kind,
            message: message.into(),
            severity: error_kind.severity(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}/{}] {} ({}): {}",
            self.severity, self.error_kind, self.artifact_id, self.kind, self.message
        )
    }
}

/// Everything the validator found in one snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Artifacts in the snapshot
    pub checked: usize,
    pub issues: Vec<ValidationIssue>,
}

#[derive(Serialize)]
struct ReportDocument<'a> {
    checked: usize,
    errors: usize,
    warnings: usize,
    issues: &'a [ValidationIssue],
}

impl ValidationReport {
    #[must_use]
    pub fn new(checked: usize, issues: Vec<ValidationIssue>) -> Self {
        Self { checked, issues }
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    #[inline]
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issues of one kind
    pub fn of_kind(&self, kind: IssueKind) -> impl Iterator<Item = &ValidationIssue> + '_ {
        self.issues.iter().filter(move |issue| issue.error_kind == kind)
    }

    /// Issues attached to one artifact
    pub fn for_artifact<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a ValidationIssue> + 'a {
        self.issues
            .iter()
            .filter(move |issue| issue.artifact_id.as_str() == id)
    }

    fn count(&self, severity: Severity) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == severity)
            .count()
    }

    /// Human-readable summary, one issue per line
    #[must_use]
    pub fn summary(&self) -> String {
        if self.is_clean() {
            return format!(
                "All valid: {} artifact(s) checked, no traceability issues found.",
                self.checked
            );
        }
        let mut out = format!(
            "Found {} error(s), {} warning(s):",
            self.error_count(),
            self.warning_count()
        );
        for issue in &self.issues {
            out.push_str("\n  ");
            out.push_str(&issue.to_string());
        }
        out
    }

    /// Counts plus issues as pretty JSON
    ///
    /// # Errors
    /// Only if serialization itself fails
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&ReportDocument {
            checked: self.checked,
            errors: self.error_count(),
            warnings: self.warning_count(),
            issues: &self.issues,
        })
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn issue(id: &str, kind: IssueKind, message: &str) -> ValidationIssue {
        ValidationIssue::new(
            ArtifactId::parse(id).unwrap(),
            DocumentLocation::new(format!("{id}.md")),
            kind,
            message,
        )
    }

    #[test]
    fn empty_report_is_all_valid() {
        let report = ValidationReport::new(0, Vec::new());
        assert!(!report.has_errors());
        assert!(report.summary().starts_with("All valid"));
    }

    #[test]
    fn summary_lists_each_issue() {
        let report = ValidationReport::new(
            3,
            vec![
                issue("UC-1", IssueKind::Orphan, "parent_feat 'FT-9' not found"),
                issue("FT-2", IssueKind::SoftWarning, "no feedback"),
            ],
        );
        assert_eq!(report.error_count(), 1);
        assert_eq!(report.warning_count(), 1);
        assert_eq!(
            report.summary(),
            "Found 1 error(s), 1 warning(s):\n  [ERROR/ORPHAN] UC-1 (UseCase): parent_feat 'FT-9' not found\n  [WARNING/SOFT_WARNING] FT-2 (Feature): no feedback"
        );
    }

    #[test]
    fn json_carries_counts() {
        let report = ValidationReport::new(1, vec![issue("TSK-1", IssueKind::BlockedByParent, "x")]);
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["errors"], 1);
        assert_eq!(value["issues"][0]["error_kind"], "BLOCKED_BY_PARENT");
        assert_eq!(value["issues"][0]["kind"], "Task");
    }

    #[test]
    fn taxonomy() {
        assert_eq!(IssueKind::DuplicateId.category(), Category::Structural);
        assert_eq!(IssueKind::BlockedByParent.category(), Category::Lifecycle);
        assert_eq!(IssueKind::SoftWarning.severity(), Severity::Warning);
        assert_eq!(IssueKind::InvalidValue.severity(), Severity::Error);
    }
}
