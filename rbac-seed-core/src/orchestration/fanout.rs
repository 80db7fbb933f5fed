use std::{any::Any, fmt, panic::AssertUnwindSafe, sync::Arc};

use futures::{FutureExt, future::BoxFuture};
use tokio::{sync::Semaphore, task::JoinSet};
use tracing::{debug, error, warn};

use crate::error::{Result, SeedError};
use crate::orchestration::config::MAX_WORKERS_LIMIT;

/// One unit of work for [`BoundedFanOut`], plus the hook that runs after it.
pub struct FanOutJob {
    label: String,
    work: BoxFuture<'static, Result<()>>,
    on_complete: Option<BoxFuture<'static, ()>>,
}

impl fmt::Debug for FanOutJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FanOutJob")
            .field("label", &self.label)
            .field("has_completion_hook", &self.on_complete.is_some())
            .finish()
    }
}

impl FanOutJob {
    /// `label` completes sentences like "Error encountered during {label}",
    /// e.g. `role seeding for tenant acme [1 of 2]`.
    pub fn new<F>(label: impl Into<String>, work: F) -> Self
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        Self {
            label: label.into(),
            work: work.boxed(),
            on_complete: None,
        }
    }

    /// Runs after the work settles, whether it succeeded, failed or
    /// panicked, while the job still holds its worker slot.
    pub fn on_complete<F>(mut self, hook: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.on_complete = Some(hook.boxed());
        self
    }

    async fn execute(self, permits: Arc<Semaphore>) -> JobOutcome {
        let Self {
            label,
            work,
            on_complete,
        } = self;

        match permits.acquire_owned().await {
            Ok(permit) => {
                let outcome = run_work(&label, work).await;
                if let Some(hook) = on_complete {
                    hook.await;
                }
                drop(permit);
                outcome
            }
            Err(_) => {
                let err = SeedError::Internal("worker pool closed".into());
                error!("Error encountered during {label}: {err}.");
                JobOutcome::Failed
            }
        }
    }
}

async fn run_work(
    label: &str,
    work: BoxFuture<'static, Result<()>>,
) -> JobOutcome {
    match AssertUnwindSafe(work).catch_unwind().await {
        Ok(Ok(())) => JobOutcome::Succeeded,
        Ok(Err(err)) => {
            error!("Error encountered during {label}: {err}.");
            JobOutcome::Failed
        }
        Err(payload) => {
            error!(
                "Panic encountered during {label}: {}.",
                panic_message(payload.as_ref())
            );
            JobOutcome::Panicked
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JobOutcome {
    Succeeded,
    Failed,
    Panicked,
}

/// Tally of one [`BoundedFanOut::run`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanOutReport {
    pub submitted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub panicked: usize,
    /// Tasks that never reported back, e.g. cancelled by runtime shutdown.
    pub aborted: usize,
}

impl FanOutReport {
    fn record(&mut self, outcome: JobOutcome) {
        match outcome {
            JobOutcome::Succeeded => self.succeeded += 1,
            JobOutcome::Failed => self.failed += 1,
            JobOutcome::Panicked => self.panicked += 1,
        }
    }

    pub fn completed(&self) -> usize {
        self.succeeded + self.failed + self.panicked
    }
}

/// Runs independent jobs with at most `max_workers` of them in flight.
/// `max_workers` is clamped to `1..=MAX_WORKERS_LIMIT`.
///
/// Jobs are spawned in iteration order without waiting for a free slot; each
/// one waits for a permit before its work starts. [`BoundedFanOut::run`]
/// returns once every spawned job has finished.
#[derive(Debug, Clone, Copy)]
pub struct BoundedFanOut {
    max_workers: usize,
}

impl BoundedFanOut {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.clamp(1, MAX_WORKERS_LIMIT),
        }
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    pub async fn run<I>(&self, jobs: I) -> FanOutReport
    where
        I: IntoIterator<Item = FanOutJob>,
    {
        let permits = Arc::new(Semaphore::new(self.max_workers));
        let mut tasks = JoinSet::new();
        let mut report = FanOutReport::default();

        for job in jobs {
            report.submitted += 1;
            tasks.spawn(job.execute(Arc::clone(&permits)));
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => report.record(outcome),
                Err(err) if err.is_panic() => {
                    // Only the completion hook can get here; work panics are
                    // caught inside the job.
                    error!(error = %err, "seed job completion hook panicked");
                    report.panicked += 1;
                }
                Err(err) => {
                    warn!(error = %err, "seed job was cancelled before finishing");
                    report.aborted += 1;
                }
            }
        }

        debug!(
            submitted = report.submitted,
            succeeded = report.succeeded,
            failed = report.failed,
            panicked = report.panicked,
            aborted = report.aborted,
            max_workers = self.max_workers,
            "fan-out drained"
        );

        report
    }
}
