//! Blueprint Trace
//!
//! Traceability and gate validation over a blueprint corpus.
//!
//! - **Index**: scan the corpus into an immutable [`Snapshot`]
//! - **Resolve**: lookups by id and kind, children, trace paths
//! - **Validate**: batch the full rule set into a [`ValidationReport`]
//! - **Gate**: accept or reject one proposed transition or creation
//!
//! # Quick Start
//!
//! ```rust
//! use blueprint_trace::prelude::*;
//!
//! let store = MemoryDocumentStore::new()
//!     .with_document("UC-100.md", "---\nid: UC-100\ntitle: Checkout\nstatus: REVIEW\n---\n");
//! let repo = Repository::new(store, InMemoryFeedback::new());
//!
//! let snapshot = repo.build_index(false).unwrap();
//! assert!(snapshot.get_by_id("UC-100").is_some());
//!
//! let err = repo.authorize_create(ArtifactKind::Task, Some("UC-100")).unwrap_err();
//! assert!(err.to_string().contains("REVIEW"));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod cycle;
pub mod error;
pub mod export;
pub mod gate;
pub mod report;
pub mod repository;
pub mod resolver;
pub mod snapshot;
pub mod validator;

pub use cycle::{find_first_cycle, DependencyCycle};
pub use error::{EngineError, EngineResult, GateError};
pub use export::{IndexEntry, PendingArtifact, PendingQueue, UnreadFeedback};
pub use gate::{check_create, check_transition, is_transition_allowed};
pub use report::{Category, IssueKind, Severity, ValidationIssue, ValidationReport};
pub use repository::{build_index, Repository};
pub use snapshot::{AnomalyKind, NodeMap, Snapshot, StructuralAnomaly};
pub use validator::GraphValidator;

/// Everything needed to build, query and gate a corpus
pub mod prelude {
    pub use crate::error::{EngineError, GateError};
    pub use crate::report::{IssueKind, Severity, ValidationReport};
    pub use crate::repository::{build_index, Repository};
    pub use crate::snapshot::Snapshot;
    pub use crate::validator::GraphValidator;
    pub use blueprint_artifact::{ArtifactId, ArtifactKind, ArtifactNode, Status};
    pub use blueprint_store::{
        FsDocumentStore, FsFeedbackStore, InMemoryFeedback, MemoryDocumentStore, TraceConfig,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
