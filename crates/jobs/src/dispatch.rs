//! Dispatch guard: claim, run, always release.

use std::future::Future;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{error, info};

use crate::ledger::{JobLedger, LedgerError};
use crate::runner::TaskRunner;
use crate::types::{ClaimOutcome, InvalidIdentifier, JobId, JobIdentifier};

/// Typed key extraction for a schedulable unit of work.
///
/// Implemented by the argument struct of each background worker. Derivation
/// must be a pure function of the arguments (no clocks, no randomness) so
/// racing duplicate requests collide on the same identifier.
pub trait JobKey {
    fn job_identifier(&self) -> Result<JobIdentifier, InvalidIdentifier>;
}

/// Scheduling failure visible to the caller of [`DispatchGuard::schedule`].
///
/// Everything here happens before any background work is dispatched; worker
/// failures are logged and swallowed, never surfaced through this type.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Identifier(#[from] InvalidIdentifier),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Wraps async workers so that at most one run per identifier is ever in
/// flight, and the in-flight marker is always cleared.
#[derive(Clone)]
pub struct DispatchGuard {
    ledger: Arc<dyn JobLedger>,
    runner: Arc<dyn TaskRunner>,
}

impl DispatchGuard {
    pub fn new(ledger: Arc<dyn JobLedger>, runner: Arc<dyn TaskRunner>) -> Self {
        Self { ledger, runner }
    }

    pub fn ledger(&self) -> &Arc<dyn JobLedger> {
        &self.ledger
    }

    /// Schedule `worker` under the identifier derived from `key`.
    ///
    /// Returns `Ok(true)` when a run was started just now or is still in
    /// flight, `Ok(false)` when a previous run already completed under this
    /// identifier (the caller should fetch the persisted result instead of
    /// expecting a re-run). The call never waits for the worker.
    ///
    /// `worker` is lazy: on a conflict it is dropped without being polled,
    /// so exactly one execution happens per successful claim.
    pub async fn schedule<K, F, E>(&self, key: &K, worker: F) -> Result<bool, DispatchError>
    where
        K: JobKey,
        F: Future<Output = Result<(), E>> + Send + 'static,
        E: std::fmt::Display + Send + 'static,
    {
        let identifier = key.job_identifier()?;

        match self.ledger.claim(&identifier).await? {
            ClaimOutcome::Claimed(job_id) => {
                info!(%job_id, identifier = %identifier, "background job claimed");
                let ledger = Arc::clone(&self.ledger);
                self.runner
                    .spawn(Box::pin(run_and_release(ledger, job_id, worker)));
                Ok(true)
            }
            ClaimOutcome::Conflict => {
                // Somebody already ran (or is running) this unit of work;
                // report their status verbatim. NotFound here means the
                // ledger broke an invariant and is propagated.
                let in_progress = self.ledger.status_of(&identifier).await?;
                Ok(in_progress)
            }
        }
    }
}

/// Run the worker, then release the claim no matter what.
///
/// Worker errors and panics are logged with the job id and swallowed; the
/// release must happen on every path or the identifier would report "in
/// progress" forever.
async fn run_and_release<F, E>(ledger: Arc<dyn JobLedger>, job_id: JobId, worker: F)
where
    F: Future<Output = Result<(), E>>,
    E: std::fmt::Display + Send + 'static,
{
    match std::panic::AssertUnwindSafe(worker).catch_unwind().await {
        Ok(Ok(())) => info!(%job_id, "background job finished"),
        Ok(Err(error)) => error!(%job_id, %error, "background job failed"),
        Err(_) => error!(%job_id, "background job panicked"),
    }

    if let Err(error) = ledger.release(job_id).await {
        error!(%job_id, %error, "failed to release job record");
    }
}
