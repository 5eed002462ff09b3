//! Blueprint Artifact Model
//!
//! Typed representation of the documents in a blueprint corpus.
//!
//! # Core Concepts
//!
//! - [`ArtifactId`]: validated `<PREFIX>-<suffix>` identifier
//! - [`ArtifactKind`]: closed set of kinds (Goal, Feature, Research, UseCase,
//!   Task) with the fixed prefix, required-field and parent-field tables
//! - [`Status`] / [`Verdict`]: enumerated lifecycle values
//! - [`ArtifactMetadata`]: frontmatter normalized into typed, optional fields
//! - [`ArtifactNode`]: one artifact of a snapshot, with its storage location
//!
//! # Example
//!
//! ```rust
//! use blueprint_artifact::{ArtifactId, ArtifactKind, ArtifactMetadata};
//!
//! let id = ArtifactId::parse("UC-100").unwrap();
//! assert_eq!(id.kind(), ArtifactKind::UseCase);
//!
//! let raw: serde_yaml::Mapping = serde_yaml::from_str("dependencies: 'UC-1, UC-2'").unwrap();
//! let meta = ArtifactMetadata::from_mapping(id.kind(), &raw);
//! assert_eq!(meta.dependencies().count(), 2);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod error;
mod id;
mod kind;
mod metadata;
mod node;
mod status;

pub use error::ArtifactError;
pub use id::ArtifactId;
pub use kind::{ArtifactKind, ParentField, RequiredField};
pub use metadata::{dependency_set, scalar, ArtifactMetadata, KindFields, ParentRefs, DEFAULT_REVISION};
pub use node::{ArtifactNode, DocumentLocation};
pub use status::{Checked, Status, Verdict};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
