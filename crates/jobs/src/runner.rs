//! Fire-and-forget task runner seam.

use std::future::Future;
use std::pin::Pin;

/// A unit of background work, ready to run.
pub type BoxedTask = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Runs work outside the current request/response cycle.
///
/// The scheduler never observes completion or a return value; the ledger is
/// the only record that a run happened.
pub trait TaskRunner: Send + Sync {
    fn spawn(&self, task: BoxedTask);
}

/// Production runner backed by the tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTaskRunner;

impl TaskRunner for TokioTaskRunner {
    fn spawn(&self, task: BoxedTask) {
        tokio::spawn(task);
    }
}
