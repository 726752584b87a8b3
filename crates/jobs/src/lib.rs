//! Background job dispatch: at most one run per logical identifier.
//!
//! ## Design
//!
//! - A [`JobLedger`] records, per identifier, whether a job is in flight.
//!   The atomic insert-if-absent of a new ledger row is the sole
//!   concurrency gate; no other locking exists or is needed.
//! - A [`DispatchGuard`] wraps an arbitrary async worker: it derives the
//!   identifier from typed call arguments, claims it, hands the worker to a
//!   fire-and-forget [`TaskRunner`], and releases the claim unconditionally
//!   when the worker finishes — success, error, or panic.
//! - Duplicate claims are an expected outcome, modelled as
//!   [`ClaimOutcome::Conflict`] rather than an error.
//!
//! Scheduling is at-most-one-attempt and fire-and-forget: a caller that
//! loses the race is told whether the winning run is still in flight, and a
//! worker failure is logged but never reported back to the scheduling
//! caller.

pub mod dispatch;
pub mod ledger;
pub mod runner;
pub mod types;

pub use dispatch::{DispatchError, DispatchGuard, JobKey};
pub use ledger::{InMemoryJobLedger, JobLedger, LedgerError};
pub use runner::{BoxedTask, TaskRunner, TokioTaskRunner};
pub use types::{ClaimOutcome, InvalidIdentifier, JobId, JobIdentifier, JobRecord};
