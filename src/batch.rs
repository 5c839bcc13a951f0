//! Cancellable bulk work over many images.
//!
//! Detector runs and bulk imports can take a while and belong on a worker
//! thread. The editor itself is single-threaded, so workers only produce
//! results; the host merges them on the UI thread afterwards, e.g. through
//! [`crate::session::AnnotationSession::apply_prelabels`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use web_time::Instant;

/// Shared cancellation flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Result of a batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome<R> {
    /// Results of the items that finished, in input order
    pub completed: Vec<R>,
    /// True if the run stopped early on cancellation
    pub cancelled: bool,
    pub elapsed: Duration,
}

/// Apply `f` to each item until done or `token` is cancelled.
///
/// Cancellation is checked between items; an item already started always
/// finishes and its result is kept.
pub fn run_batch<T, R>(
    items: impl IntoIterator<Item = T>,
    token: &CancelToken,
    mut f: impl FnMut(T) -> R,
) -> BatchOutcome<R> {
    let start = Instant::now();
    let mut completed = Vec::new();
    let mut cancelled = false;

    for item in items {
        if token.is_cancelled() {
            cancelled = true;
            break;
        }
        completed.push(f(item));
    }

    let elapsed = start.elapsed();
    if cancelled {
        log::info!(
            "Batch cancelled after {} items ({:.1?})",
            completed.len(),
            elapsed
        );
    } else {
        log::info!("Batch finished {} items in {:.1?}", completed.len(), elapsed);
    }

    BatchOutcome {
        completed,
        cancelled,
        elapsed,
    }
}
