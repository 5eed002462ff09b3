//! Error types for the gate engine
//!
//! A [`GateError`] always names the artifact, the rule, and the offending
//! value, so a blocked write can be explained without re-running anything.

use blueprint_artifact::{ArtifactKind, ParentField, Status};
use blueprint_store::StoreError;

/// A gate rejected one proposed write
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    /// Status change forbidden by the lifecycle deny-list
    #[error("artifact '{id}' cannot transition from {from} to {to}: {reason}")]
    ForbiddenTransition {
        id: String,
        from: Status,
        to: Status,
        reason: &'static str,
    },

    /// Kind that must hang off a parent was proposed without one
    #[error("cannot create {kind}: a parent {expected} must be named in '{field}'")]
    MissingParent {
        kind: ArtifactKind,
        expected: ArtifactKind,
        field: ParentField,
    },

    /// Named parent is not in the snapshot
    #[error("parent '{parent}' not found; create the parent first")]
    ParentNotFound { parent: String },

    /// Named parent exists but is of the wrong kind
    #[error("cannot create {kind}: parent '{parent}' is a {actual}, expected a {expected}")]
    ParentKindMismatch {
        kind: ArtifactKind,
        parent: String,
        expected: ArtifactKind,
        actual: ArtifactKind,
    },

    /// Parent exists but is not approved
    #[error("cannot create {kind}: parent {parent_kind} '{parent}' has status '{status}'; must be APPROVED")]
    ParentNotApproved {
        kind: ArtifactKind,
        parent_kind: ArtifactKind,
        parent: String,
        status: String,
    },

    /// Transition requested for an id that is not in the snapshot
    #[error("artifact '{id}' not found")]
    ArtifactNotFound { id: String },
}

impl GateError {
    /// Short rule tag used in logs
    #[must_use]
    pub fn rule(&self) -> &'static str {
        match self {
            GateError::ForbiddenTransition { .. } | GateError::ArtifactNotFound { .. } => "G0",
            GateError::MissingParent { .. }
            | GateError::ParentKindMismatch { .. }
            | GateError::ParentNotApproved { .. } => "G1",
            GateError::ParentNotFound { .. } => "G2",
        }
    }
}

/// Combined engine error
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("gate blocked: {0}")]
    Gate(#[from] GateError),
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_transition_names_everything() {
        let err = GateError::ForbiddenTransition {
            id: "UC-100".into(),
            from: Status::Approved,
            to: Status::Draft,
            reason: "approved artifacts are revised via NEEDS_FIX",
        };
        let text = err.to_string();
        assert!(text.contains("UC-100"));
        assert!(text.contains("APPROVED"));
        assert!(text.contains("DRAFT"));
        assert_eq!(err.rule(), "G0");
    }

    #[test]
    fn parent_not_approved_names_status() {
        let err = GateError::ParentNotApproved {
            kind: ArtifactKind::Task,
            parent_kind: ArtifactKind::UseCase,
            parent: "UC-100".into(),
            status: "REVIEW".into(),
        };
        assert_eq!(
            err.to_string(),
            "cannot create Task: parent UseCase 'UC-100' has status 'REVIEW'; must be APPROVED"
        );
    }

    #[test]
    fn gate_converts_into_engine_error() {
        let err: EngineError = GateError::ParentNotFound { parent: "UC-1".into() }.into();
        assert!(matches!(err, EngineError::Gate(_)));
        assert!(err.to_string().contains("create the parent first"));
    }
}
