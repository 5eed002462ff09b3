//! Graph validator
//!
//! Runs the fixed rule set over one [`Snapshot`] and batches everything it
//! finds. Rules per artifact, in order:
//!
//! 1. duplicate id / file name anomalies
//! 2. completeness (required fields, enumerated values)
//! 3. orphan parent references
//! 4. orphan dependencies
//! 5. `DONE` requires every resolved dependency `DONE`
//! 6. a Task requires an `APPROVED` parent UseCase
//! 7. a UseCase under a `research_required` Feature requires qualifying
//!    Research under the same root Goal
//! 8. advisory: sent back for fixes without a feedback record
//!
//! followed by one dependency cycle search over the whole graph. The report
//! is stably sorted by artifact id, so rule order holds within one artifact.

use crate::cycle::find_first_cycle;
use crate::gate::status_text;
use crate::report::{IssueKind, ValidationIssue, ValidationReport};
use crate::snapshot::Snapshot;
use blueprint_artifact::{ArtifactKind, ArtifactNode, Checked, KindFields, ParentField, Status};
use blueprint_store::FeedbackStore;
use std::collections::BTreeSet;

/// Validator bound to a feedback store
#[derive(Debug, Clone)]
pub struct GraphValidator<F> {
    feedback: F,
}

impl<F: FeedbackStore> GraphValidator<F> {
    #[must_use]
    pub fn new(feedback: F) -> Self {
        Self { feedback }
    }

    /// Check every rule against `snapshot`
    ///
    /// Never mutates the snapshot. Running twice over the same snapshot
    /// yields the same report.
    #[must_use]
    pub fn validate(&self, snapshot: &Snapshot) -> ValidationReport {
        let mut issues = Vec::new();

        for anomaly in snapshot.anomalies() {
            issues.push(ValidationIssue::new(
                anomaly.artifact_id.clone(),
                anomaly.location.clone(),
                IssueKind::DuplicateId,
                anomaly.message(),
            ));
        }

        let researched_goals = researched_goals(snapshot);
        for node in snapshot.iter() {
            let mut push = |kind: IssueKind, message: String| {
                issues.push(ValidationIssue::new(
                    node.id.clone(),
                    node.location.clone(),
                    kind,
                    message,
                ));
            };
            check_completeness(node, &mut push);
            check_orphans(node, snapshot, &mut push);
            check_done_gate(node, snapshot, &mut push);
            check_task_parent(node, snapshot, &mut push);
            check_research_gate(node, snapshot, &researched_goals, &mut push);
            self.check_feedback(node, &mut push);
        }

        if let Some(cycle) = find_first_cycle(snapshot) {
            if let Some(node) = cycle.head().and_then(|id| snapshot.get_by_id(id.as_str())) {
                issues.push(ValidationIssue::new(
                    node.id.clone(),
                    node.location.clone(),
                    IssueKind::GateViolation,
                    format!("circular dependency: {cycle}"),
                ));
            }
        }

        issues.sort_by(|a, b| a.artifact_id.cmp(&b.artifact_id));
        let report = ValidationReport::new(snapshot.len(), issues);
        tracing::info!(
            checked = report.checked,
            errors = report.error_count(),
            warnings = report.warning_count(),
            "validation finished"
        );
        report
    }

    fn check_feedback(&self, node: &ArtifactNode, push: &mut impl FnMut(IssueKind, String)) {
        let Some(status) = node.status() else {
            return;
        };
        if status.expects_feedback() && !self.feedback.has_feedback(node.id.as_str()) {
            push(
                IssueKind::SoftWarning,
                format!("status is {status} but no feedback record explains why"),
            );
        }
    }
}

fn check_completeness(node: &ArtifactNode, push: &mut impl FnMut(IssueKind, String)) {
    for field in node.missing_fields() {
        push(
            IssueKind::MissingField,
            format!("missing required field '{field}'"),
        );
    }
    if let Checked::Invalid(raw) = &node.metadata.status {
        push(
            IssueKind::InvalidValue,
            format!("status '{raw}' is not a lifecycle status"),
        );
    }
    if let KindFields::Research {
        verdict: Checked::Invalid(raw),
        ..
    } = &node.metadata.kind_fields
    {
        push(
            IssueKind::InvalidValue,
            format!("verdict '{raw}' is not a research verdict"),
        );
    }
}

fn check_orphans(node: &ArtifactNode, snapshot: &Snapshot, push: &mut impl FnMut(IssueKind, String)) {
    for (field, parent) in node.metadata.parents.iter() {
        if !snapshot.contains(parent) {
            push(
                IssueKind::Orphan,
                format!("{field} '{parent}' does not exist"),
            );
        }
    }
    for dep in node.dependencies() {
        if !snapshot.contains(dep) {
            push(
                IssueKind::Orphan,
                format!("dependency '{dep}' does not exist"),
            );
        }
    }
}

fn check_done_gate(node: &ArtifactNode, snapshot: &Snapshot, push: &mut impl FnMut(IssueKind, String)) {
    if node.status() != Some(Status::Done) {
        return;
    }
    for dep in node.dependencies().filter_map(|dep| snapshot.get_by_id(dep)) {
        if dep.status() != Some(Status::Done) {
            push(
                IssueKind::GateViolation,
                format!(
                    "marked DONE but dependency '{}' is {}",
                    dep.id,
                    status_text(&dep.metadata.status)
                ),
            );
        }
    }
}

fn check_task_parent(node: &ArtifactNode, snapshot: &Snapshot, push: &mut impl FnMut(IssueKind, String)) {
    if node.kind() != ArtifactKind::Task {
        return;
    }
    let Some(parent_id) = node.parent(ParentField::ParentUc) else {
        push(
            IssueKind::BlockedByParent,
            "task has no parent_uc; it cannot be executed".to_string(),
        );
        return;
    };
    let Some(parent) = snapshot.get_by_id(parent_id) else {
        push(
            IssueKind::BlockedByParent,
            format!("parent use case '{parent_id}' is unresolved"),
        );
        return;
    };
    if parent.kind() != ArtifactKind::UseCase {
        push(
            IssueKind::BlockedByParent,
            format!("parent_uc '{parent_id}' is a {}, not a UseCase", parent.kind()),
        );
    } else if parent.status() != Some(Status::Approved) {
        push(
            IssueKind::BlockedByParent,
            format!(
                "parent UseCase '{parent_id}' has status '{}'; must be APPROVED",
                status_text(&parent.metadata.status)
            ),
        );
    }
}

fn check_research_gate(
    node: &ArtifactNode,
    snapshot: &Snapshot,
    researched_goals: &BTreeSet<&str>,
    push: &mut impl FnMut(IssueKind, String),
) {
    if node.kind() != ArtifactKind::UseCase {
        return;
    }
    let Some(feature) = node
        .parent(ParentField::ParentFeat)
        .and_then(|id| snapshot.get_by_id(id))
    else {
        return;
    };
    if !feature.metadata.research_required() {
        return;
    }
    match snapshot.root_goal(feature.id.as_str()) {
        Some(goal) if researched_goals.contains(goal.id.as_str()) => {}
        Some(goal) => push(
            IssueKind::GateViolation,
            format!(
                "feature '{}' requires research, but no Research under goal '{}' has verdict SUCCESS or PENDING",
                feature.id, goal.id
            ),
        ),
        None => push(
            IssueKind::GateViolation,
            format!(
                "feature '{}' requires research but does not trace to a goal",
                feature.id
            ),
        ),
    }
}

/// Root goals that have at least one Research with a qualifying verdict
fn researched_goals(snapshot: &Snapshot) -> BTreeSet<&str> {
    snapshot
        .get_by_kind(ArtifactKind::Research)
        .into_iter()
        .filter(|research| {
            research
                .metadata
                .verdict()
                .is_some_and(|verdict| verdict.satisfies_prerequisite())
        })
        .filter_map(|research| snapshot.root_goal(research.id.as_str()))
        .map(|goal| goal.id.as_str())
        .collect()
}
