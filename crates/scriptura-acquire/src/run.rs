//! Acquisition orchestrator: fans work units out over a bounded pool and
//! folds their outcomes into a run summary.

use crate::error::AcquireError;
use crate::extract::extract;
use crate::fetch::Fetcher;
use crate::output::write_chapter;
use crate::progress::RunObserver;
use crate::request::{expand, AcquirePlan, ChapterRequest, PlanError};
use scriptura_model::ChapterDocument;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

pub const DEFAULT_CONCURRENCY: usize = 10;

/// Outcome of a whole run, reported after every unit has settled.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub succeeded: Vec<ChapterRequest>,
    pub failed: Vec<(ChapterRequest, AcquireError)>,
    /// Units dropped before doing any work because the run was cancelled.
    pub cancelled: usize,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len() + self.cancelled
    }
}

enum UnitOutcome {
    Succeeded(ChapterRequest),
    Failed(ChapterRequest, AcquireError),
    Cancelled,
}

/// Run a full acquisition: expand the plan, dispatch every unit under the
/// concurrency bound, and collect outcomes.
///
/// Request-shape errors (unknown book, bad selector) fail here before any
/// unit is scheduled. Per-unit errors are captured into the summary; a
/// failing unit never aborts the run and never leaves a partial file.
///
/// Cancellation is cooperative: units that have not started are dropped,
/// and an in-flight unit is only interrupted at the network boundary —
/// once a page has been fetched, extract and write run to completion.
pub async fn run(
    plan: &AcquirePlan,
    dest_root: &Path,
    fetcher: Arc<Fetcher>,
    concurrency: usize,
    cancel: CancellationToken,
    observer: Arc<dyn RunObserver>,
) -> Result<RunSummary, PlanError> {
    let units = expand(plan)?;
    observer.run_started(units.len());
    tracing::info!(
        units = units.len(),
        version = %plan.version,
        concurrency,
        dest = %dest_root.display(),
        "Starting acquisition run"
    );

    let semaphore = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut join_set = JoinSet::new();

    for request in units {
        let semaphore = Arc::clone(&semaphore);
        let fetcher = Arc::clone(&fetcher);
        let cancel = cancel.clone();
        let dest_root = dest_root.to_path_buf();

        join_set.spawn(async move {
            let _permit = tokio::select! {
                _ = cancel.cancelled() => return UnitOutcome::Cancelled,
                permit = semaphore.acquire_owned() => match permit {
                    Ok(p) => p,
                    Err(_) => return UnitOutcome::Cancelled,
                },
            };
            if cancel.is_cancelled() {
                return UnitOutcome::Cancelled;
            }
            match process_unit(&fetcher, &dest_root, &request, &cancel).await {
                None => UnitOutcome::Cancelled,
                Some(Ok(_)) => UnitOutcome::Succeeded(request),
                Some(Err(error)) => UnitOutcome::Failed(request, error),
            }
        });
    }

    let mut summary = RunSummary::default();
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok(UnitOutcome::Succeeded(request)) => {
                tracing::debug!(unit = %request, "Chapter acquired");
                observer.unit_finished(&request, None);
                summary.succeeded.push(request);
            }
            Ok(UnitOutcome::Failed(request, error)) => {
                if error.is_local() {
                    tracing::warn!(unit = %request, error = %error, "Local write failure");
                } else {
                    tracing::warn!(unit = %request, error = %error, "Chapter failed");
                }
                observer.unit_finished(&request, Some(&error));
                summary.failed.push((request, error));
            }
            Ok(UnitOutcome::Cancelled) => summary.cancelled += 1,
            Err(join_error) => {
                tracing::error!(error = %join_error, "Acquisition task panicked");
            }
        }
    }

    tracing::info!(
        succeeded = summary.succeeded.len(),
        failed = summary.failed.len(),
        cancelled = summary.cancelled,
        "Acquisition run complete"
    );
    Ok(summary)
}

/// One unit: Fetch → Extract → Write, short-circuiting at the first failure.
/// Returns `None` when cancelled mid-fetch.
async fn process_unit(
    fetcher: &Fetcher,
    dest_root: &Path,
    request: &ChapterRequest,
    cancel: &CancellationToken,
) -> Option<Result<PathBuf, AcquireError>> {
    // The network call is the only suspension point; racing it against the
    // cancel signal means an aborted unit has written nothing
    let markup = tokio::select! {
        _ = cancel.cancelled() => return None,
        fetched = fetcher.fetch(&request.version, request.book.name, request.chapter) => {
            match fetched {
                Ok(markup) => markup,
                Err(e) => return Some(Err(e.into())),
            }
        }
    };

    let verses = match extract(&markup) {
        Ok(verses) => verses,
        Err(e) => return Some(Err(e.into())),
    };

    let document = ChapterDocument::new(request.book.code, &request.version, request.chapter, verses);
    Some(write_chapter(dest_root, request, &document))
}
