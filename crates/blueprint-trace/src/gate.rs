//! Lifecycle gate engine
//!
//! Deny-list state machine over [`Status`], plus the creation gate. Every
//! check is a pure function of its arguments and fails fast with a single
//! [`GateError`].

use crate::error::GateError;
use crate::snapshot::Snapshot;
use blueprint_artifact::{ArtifactKind, Checked, ParentField, Status};

const AFTER_DONE: &[Status] = &[
    Status::Draft,
    Status::Review,
    Status::Approved,
    Status::NeedsFix,
    Status::Blocked,
    Status::Done,
    Status::Rejected,
];

/// Targets `from` may never move to
#[must_use]
pub const fn forbidden_targets(from: Status) -> &'static [Status] {
    match from {
        Status::Approved => &[Status::Draft, Status::Review],
        Status::Done => AFTER_DONE,
        Status::Draft
        | Status::Review
        | Status::NeedsFix
        | Status::Blocked
        | Status::Archived
        | Status::Rejected => &[],
    }
}

/// Whether the deny-list permits `from -> to`
#[must_use]
pub fn is_transition_allowed(from: Status, to: Status) -> bool {
    !forbidden_targets(from).contains(&to)
}

fn denial_reason(from: Status) -> &'static str {
    match from {
        Status::Approved => "approved artifacts are reopened through NEEDS_FIX",
        Status::Done => "completed artifacts can only be archived",
        _ => "transition not permitted",
    }
}

/// Check one proposed status change of artifact `id`
///
/// # Errors
/// [`GateError::ForbiddenTransition`] naming the artifact and both statuses
pub fn check_transition(id: &str, from: Status, to: Status) -> Result<(), GateError> {
    if is_transition_allowed(from, to) {
        Ok(())
    } else {
        Err(GateError::ForbiddenTransition {
            id: id.to_string(),
            from,
            to,
            reason: denial_reason(from),
        })
    }
}

/// Check a proposed creation of a `kind` artifact under `parent`
///
/// - any named parent must exist in `snapshot`
/// - a Task must name a parent, that parent must be a UseCase, and its status
///   must be exactly `APPROVED`
///
/// # Errors
/// The first failing rule, as a [`GateError`]
pub fn check_create(
    kind: ArtifactKind,
    parent: Option<&str>,
    snapshot: &Snapshot,
) -> Result<(), GateError> {
    let parent = parent.map(str::trim).filter(|p| !p.is_empty());

    let node = match parent {
        Some(parent_id) => Some(snapshot.get_by_id(parent_id).ok_or_else(|| {
            GateError::ParentNotFound {
                parent: parent_id.to_string(),
            }
        })?),
        None => None,
    };

    if kind != ArtifactKind::Task {
        return Ok(());
    }

    let Some(node) = node else {
        return Err(GateError::MissingParent {
            kind,
            expected: ArtifactKind::UseCase,
            field: ParentField::for_parent_kind(ArtifactKind::UseCase),
        });
    };
    if node.kind() != ArtifactKind::UseCase {
        return Err(GateError::ParentKindMismatch {
            kind,
            parent: node.id.to_string(),
            expected: ArtifactKind::UseCase,
            actual: node.kind(),
        });
    }
    if node.status() != Some(Status::Approved) {
        return Err(GateError::ParentNotApproved {
            kind,
            parent_kind: node.kind(),
            parent: node.id.to_string(),
            status: status_text(&node.metadata.status),
        });
    }
    Ok(())
}

/// Status as written in the document, for error messages
pub(crate) fn status_text(status: &Checked<Status>) -> String {
    match status {
        Checked::Valid(s) => s.to_string(),
        Checked::Invalid(raw) => raw.clone(),
        Checked::Absent => "none".to_string(),
    }
}
