//! Error types for the artifact model

/// Errors raised while interpreting artifact identifiers and enumerated
/// metadata values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArtifactError {
    /// Identifier does not start with a known `<PREFIX>-`
    #[error("unrecognized artifact id prefix: '{0}'")]
    UnknownPrefix(String),

    /// Identifier has a known prefix but nothing after the dash
    #[error("artifact id '{0}' has an empty suffix")]
    EmptySuffix(String),

    /// Status string outside the lifecycle set
    #[error("unknown status '{0}'")]
    UnknownStatus(String),

    /// Verdict string outside the research verdict set
    #[error("unknown verdict '{0}'")]
    UnknownVerdict(String),

    /// Kind name that is not one of the five artifact kinds
    #[error("unknown artifact kind '{0}'")]
    UnknownKind(String),
}
