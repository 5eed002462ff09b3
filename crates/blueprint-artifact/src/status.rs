//! Lifecycle statuses, research verdicts, and the checked-field wrapper used
//! for enumerated metadata values

use crate::error::ArtifactError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status of an artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Draft,
    Review,
    Approved,
    NeedsFix,
    Blocked,
    Done,
    Archived,
    Rejected,
}

impl Status {
    /// Every lifecycle status
    pub const ALL: [Status; 8] = [
        Status::Draft,
        Status::Review,
        Status::Approved,
        Status::NeedsFix,
        Status::Blocked,
        Status::Done,
        Status::Archived,
        Status::Rejected,
    ];

    /// Canonical upper-case spelling used in frontmatter
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Status::Draft => "DRAFT",
            Status::Review => "REVIEW",
            Status::Approved => "APPROVED",
            Status::NeedsFix => "NEEDS_FIX",
            Status::Blocked => "BLOCKED",
            Status::Done => "DONE",
            Status::Archived => "ARCHIVED",
            Status::Rejected => "REJECTED",
        }
    }

    /// Statuses that ask a reviewer to explain themselves with feedback
    #[must_use]
    pub const fn expects_feedback(self) -> bool {
        matches!(self, Status::NeedsFix | Status::Rejected)
    }

    /// Statuses listed in the pending review queue
    #[must_use]
    pub const fn is_pending_review(self) -> bool {
        matches!(self, Status::Review | Status::NeedsFix)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ArtifactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|st| st.as_str() == trimmed)
            .ok_or_else(|| ArtifactError::UnknownStatus(s.to_string()))
    }
}

/// Outcome recorded on a Research artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Success,
    Pending,
    Failed,
    Inconclusive,
}

impl Verdict {
    /// Every research verdict
    pub const ALL: [Verdict; 4] = [
        Verdict::Success,
        Verdict::Pending,
        Verdict::Failed,
        Verdict::Inconclusive,
    ];

    /// Canonical upper-case spelling used in frontmatter
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Verdict::Success => "SUCCESS",
            Verdict::Pending => "PENDING",
            Verdict::Failed => "FAILED",
            Verdict::Inconclusive => "INCONCLUSIVE",
        }
    }

    /// Whether research with this verdict unblocks dependent use cases
    #[must_use]
    pub const fn satisfies_prerequisite(self) -> bool {
        matches!(self, Verdict::Success | Verdict::Pending)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verdict {
    type Err = ArtifactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == trimmed)
            .ok_or_else(|| ArtifactError::UnknownVerdict(s.to_string()))
    }
}

/// An enumerated metadata value after normalization
///
/// Distinguishes a key that was never written from one holding a value
/// outside the enumerated set; both are defects, but different ones.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Checked<T> {
    /// Key absent or empty
    #[default]
    Absent,
    /// Parsed into the enumerated set
    Valid(T),
    /// Present but not a member of the set; keeps the raw text for reporting
    Invalid(String),
}

impl<T: FromStr> Checked<T> {
    /// Normalize an optional raw string
    pub fn from_raw(raw: Option<String>) -> Self {
        match raw {
            None => Checked::Absent,
            Some(text) => match text.parse::<T>() {
                Ok(value) => Checked::Valid(value),
                Err(_) => Checked::Invalid(text),
            },
        }
    }
}

impl<T: Copy> Checked<T> {
    /// The value, when valid
    #[must_use]
    pub fn valid(&self) -> Option<T> {
        match self {
            Checked::Valid(v) => Some(*v),
            Checked::Absent | Checked::Invalid(_) => None,
        }
    }
}

impl<T> Checked<T> {
    /// Key was written with some non-empty value
    #[must_use]
    pub fn is_present(&self) -> bool {
        !matches!(self, Checked::Absent)
    }
}
