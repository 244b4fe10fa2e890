//! Acquisition engine: turns a (version, book, chapter-range) request into
//! validated chapter documents on disk.
//!
//! Each work unit flows Fetch → Extract → Write independently under a
//! semaphore-bounded pool; one unit's failure never aborts the run.

pub mod error;
pub mod extract;
pub mod fetch;
pub mod output;
pub mod progress;
pub mod request;
pub mod retry;
pub mod run;

pub use error::{AcquireError, FetchError, IsRetryable, ParseError};
pub use extract::extract;
pub use fetch::{FetchConfig, Fetcher};
pub use output::write_chapter;
pub use progress::{NoopObserver, RunObserver};
pub use request::{expand, AcquirePlan, ChapterRequest, PlanError};
pub use retry::RetryPolicy;
pub use run::{run, RunSummary, DEFAULT_CONCURRENCY};
