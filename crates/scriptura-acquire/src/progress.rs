//! Per-unit completion events for a caller-supplied sink.
//!
//! The orchestrator only emits; whether events drive a console bar, a log,
//! or nothing at all is the surrounding tool's concern.

use crate::error::AcquireError;
use crate::request::ChapterRequest;

/// Observer of an acquisition run. Implementations must tolerate calls from
/// any task at any time; completion order is unconstrained.
pub trait RunObserver: Send + Sync {
    /// Called once before any unit is dispatched.
    fn run_started(&self, total: usize) {
        let _ = total;
    }

    /// Called once per settled unit. `error` is `None` on success.
    fn unit_finished(&self, request: &ChapterRequest, error: Option<&AcquireError>);
}

/// Default observer: discards everything.
pub struct NoopObserver;

impl RunObserver for NoopObserver {
    fn unit_finished(&self, _request: &ChapterRequest, _error: Option<&AcquireError>) {}
}
