//! Core ledger types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Internal job handle, generated at claim time.
///
/// Independent of the caller-supplied identifier: the identifier names the
/// logical unit of work, the job id names one claimed run of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub Uuid);

impl JobId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier derivation failure, surfaced synchronously to the scheduler's
/// caller.
#[derive(Debug, Clone, thiserror::Error)]
#[error("invalid job identifier: {0}")]
pub struct InvalidIdentifier(pub String);

/// Caller-supplied key naming the logical unit of work.
///
/// Must be a pure, deterministic function of the work — never of wall-clock
/// time or random state — so concurrent duplicate requests collide on the
/// same key. Unique within the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobIdentifier(String);

const MAX_IDENTIFIER_LEN: usize = 512;

impl JobIdentifier {
    pub fn new(value: impl Into<String>) -> Result<Self, InvalidIdentifier> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(InvalidIdentifier("identifier must not be empty".into()));
        }
        if value.len() > MAX_IDENTIFIER_LEN {
            return Err(InvalidIdentifier(format!(
                "identifier exceeds {MAX_IDENTIFIER_LEN} bytes"
            )));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of a claim attempt.
///
/// A conflict is expected control flow (somebody already ran, or is
/// running, this unit of work), not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The caller won the race and owns the run.
    Claimed(JobId),
    /// A record for this identifier already exists, in progress or released.
    Conflict,
}

/// Snapshot of one ledger row.
///
/// Rows are created by `claim` with `in_progress = true`, flipped to `false`
/// exactly once by `release`, and never deleted: a released identifier stays
/// in the ledger forever and keeps conflicting with new claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub identifier: JobIdentifier,
    pub job_id: JobId,
    pub in_progress: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_rejects_empty() {
        assert!(JobIdentifier::new("").is_err());
        assert!(JobIdentifier::new("   ").is_err());
    }

    #[test]
    fn identifier_rejects_oversized() {
        assert!(JobIdentifier::new("x".repeat(513)).is_err());
    }

    #[test]
    fn identifier_keeps_value() {
        let id = JobIdentifier::new("quiz-1-solution-2").unwrap();
        assert_eq!(id.as_str(), "quiz-1-solution-2");
    }

    #[test]
    fn job_ids_are_unique() {
        assert_ne!(JobId::new(), JobId::new());
    }
}
