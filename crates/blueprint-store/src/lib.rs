//! Blueprint Store
//!
//! The boundary between the files of a blueprint corpus and the typed
//! artifact model.
//!
//! # Core Operations
//!
//! - **List**: enumerate candidate documents under the corpus root
//! - **Read metadata**: parse the YAML frontmatter block (never fails)
//! - **Read body**: document text with the frontmatter stripped
//! - **Feedback**: look up reviewer feedback records by artifact id
//!
//! ```text
//! _blueprint/**.md → DocumentStore → (Mapping, body) → blueprint-trace
//! _blueprint/inbound/User_Feedback/FB-<id>.md → FeedbackStore
//! ```
//!
//! Nothing in this crate writes to the corpus.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod feedback;
pub mod frontmatter;
pub mod store;

pub use config::TraceConfig;
pub use error::{StoreError, StoreResult};
pub use feedback::{FeedbackRecord, FeedbackStore, FsFeedbackStore, InMemoryFeedback};
pub use store::{DocumentStore, FsDocumentStore, MemoryDocumentStore};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
