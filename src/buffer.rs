// Point buffer shared by concurrent writers. Appending and the flush decision
// happen under one lock; the swapped-out batch is delivered by the caller
// after the lock is released.

use crate::models::Point;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::time::{Duration, Instant};

/// Decides whether to flush, given the time elapsed since the last flush.
pub type FlushPolicy = Arc<dyn Fn(Duration) -> bool + Send + Sync>;

/// Flush once at least `buffer_duration` has passed since the last flush.
pub fn elapsed_policy(buffer_duration: Duration) -> FlushPolicy {
    Arc::new(move |elapsed| elapsed >= buffer_duration)
}

struct BufferState {
    pending: Vec<Point>,
    last_flushed_at: Instant,
    ready_to_flush: FlushPolicy,
}

pub struct PointBuffer {
    state: Mutex<BufferState>,
}

impl PointBuffer {
    pub fn new(buffer_duration: Duration) -> Self {
        Self::with_policy(elapsed_policy(buffer_duration))
    }

    pub fn with_policy(ready_to_flush: FlushPolicy) -> Self {
        Self {
            state: Mutex::new(BufferState {
                pending: Vec::new(),
                last_flushed_at: Instant::now(),
                ready_to_flush,
            }),
        }
    }

    /// Replace the flush policy. Pending points are kept.
    pub fn override_ready_to_flush(&self, ready_to_flush: FlushPolicy) {
        self.lock().ready_to_flush = ready_to_flush;
    }

    /// Append `points` and, if the policy says so, take everything pending.
    /// Returns the batch to deliver; `None` when the policy did not trigger.
    pub fn append(&self, points: Vec<Point>) -> Option<Vec<Point>> {
        let mut state = self.lock();
        state.pending.extend(points);

        let now = Instant::now();
        let elapsed = now.saturating_duration_since(state.last_flushed_at);
        if !(state.ready_to_flush)(elapsed) {
            return None;
        }
        state.last_flushed_at = now;
        Some(std::mem::take(&mut state.pending))
    }

    pub fn pending_len(&self) -> usize {
        self.lock().pending.len()
    }

    pub fn last_flushed_at(&self) -> Instant {
        self.lock().last_flushed_at
    }

    // The state is never left half-updated, so a panic in another writer
    // does not invalidate it.
    fn lock(&self) -> MutexGuard<'_, BufferState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
