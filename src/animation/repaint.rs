//! Repaint coordination between state producers and the single render
//! consumer.
//!
//! Producers call [`RepaintManager::request_repaint`]; bursts can be
//! batched with paired [`push_hold`](RepaintManager::push_hold) /
//! [`pop_hold`](RepaintManager::pop_hold) calls so only one repaint is
//! issued when the last hold is released. The render consumer picks
//! requests up with [`take_repaint_request`](RepaintManager::take_repaint_request)
//! or [`wait_for_request`](RepaintManager::wait_for_request) and reports
//! each finished pass with [`repaint_done`](RepaintManager::repaint_done).
//!
//! [`request_repaint_and_wait`](RepaintManager::request_repaint_and_wait)
//! is a single-slot handshake: one waiter at a time.

use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use web_time::Instant;

use crate::util::cancel::CancelToken;

/// Longest single condvar wait before the cancel token is re-checked.
const CANCEL_POLL: Duration = Duration::from_millis(10);

/// How a repaint-and-wait handshake ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepaintWait {
    /// The consumer finished a pass after the request.
    Repainted,
    /// The timeout elapsed first.
    TimedOut,
    /// The cancel token fired first.
    Cancelled,
}

#[derive(Debug, Default)]
struct RepaintState {
    /// Outstanding `push_hold` calls.
    hold_count: u32,
    /// A repaint was requested while held.
    deferred: bool,
    /// A repaint is waiting for the consumer.
    pending: bool,
    /// Bumped by every `repaint_done`.
    completed_passes: u64,
}

/// Hold/release batching plus a single-slot repaint handshake.
#[derive(Debug, Default)]
pub struct RepaintManager {
    state: Mutex<RepaintState>,
    /// Signalled when a repaint becomes pending.
    requested: Condvar,
    /// Signalled when the consumer finishes a pass.
    done: Condvar,
}

impl RepaintManager {
    /// Manager with no holds and nothing pending.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RepaintState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Defer repaints until the matching [`pop_hold`](Self::pop_hold).
    pub fn push_hold(&self) {
        self.lock().hold_count += 1;
    }

    /// Release one hold. When the last hold is released and a repaint was
    /// deferred, it is issued now. Returns whether a repaint was issued.
    pub fn pop_hold(&self) -> bool {
        let mut state = self.lock();
        if state.hold_count == 0 {
            log::warn!("pop_hold without matching push_hold");
            return false;
        }
        state.hold_count -= 1;
        if state.hold_count == 0 && state.deferred {
            state.deferred = false;
            state.pending = true;
            self.requested.notify_all();
            return true;
        }
        false
    }

    /// Outstanding holds.
    #[must_use]
    pub fn hold_count(&self) -> u32 {
        self.lock().hold_count
    }

    /// Ask for a repaint. Returns `false` if it was deferred by a hold.
    pub fn request_repaint(&self) -> bool {
        let mut state = self.lock();
        if state.hold_count > 0 {
            state.deferred = true;
            return false;
        }
        state.pending = true;
        self.requested.notify_all();
        true
    }

    /// Whether a repaint is waiting for the consumer.
    #[must_use]
    pub fn repaint_pending(&self) -> bool {
        self.lock().pending
    }

    /// Consumer side: claim the pending request, if any.
    pub fn take_repaint_request(&self) -> bool {
        std::mem::take(&mut self.lock().pending)
    }

    /// Consumer side: block up to `timeout` for a request and claim it.
    pub fn wait_for_request(&self, timeout: Duration) -> bool {
        let state = self.lock();
        let (mut state, _) = self
            .requested
            .wait_timeout_while(state, timeout, |s| !s.pending)
            .unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut state.pending)
    }

    /// Consumer side: report a finished render pass and wake the waiter.
    pub fn repaint_done(&self) {
        let mut state = self.lock();
        state.pending = false;
        state.completed_passes += 1;
        self.done.notify_all();
    }

    /// Number of passes reported by [`repaint_done`](Self::repaint_done).
    #[must_use]
    pub fn completed_passes(&self) -> u64 {
        self.lock().completed_passes
    }

    /// Request a repaint and block until the consumer finishes a pass,
    /// `timeout` elapses, or `cancel` fires.
    ///
    /// Holds are bypassed: the caller is waiting on this exact repaint.
    pub fn request_repaint_and_wait(
        &self,
        timeout: Duration,
        cancel: &CancelToken,
    ) -> RepaintWait {
        let deadline = Instant::now() + timeout;
        let mut state = self.lock();
        let target = state.completed_passes + 1;
        state.pending = true;
        self.requested.notify_all();

        while state.completed_passes < target {
            if cancel.is_cancelled() {
                return RepaintWait::Cancelled;
            }
            let now = Instant::now();
            if now >= deadline {
                log::debug!("repaint wait timed out after {timeout:?}");
                return RepaintWait::TimedOut;
            }
            let slice = (deadline - now).min(CANCEL_POLL);
            let (guard, _) = self
                .done
                .wait_timeout(state, slice)
                .unwrap_or_else(PoisonError::into_inner);
            state = guard;
        }
        RepaintWait::Repainted
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn holds_batch_requests_into_one() {
        let rm = RepaintManager::new();
        rm.push_hold();
        rm.push_hold();
        assert!(!rm.request_repaint());
        assert!(!rm.request_repaint());
        assert!(!rm.repaint_pending());
        assert!(!rm.pop_hold());
        assert!(!rm.repaint_pending());
        assert!(rm.pop_hold());
        assert!(rm.take_repaint_request());
        assert!(!rm.take_repaint_request());
    }

    #[test]
    fn pop_without_push_is_harmless() {
        let rm = RepaintManager::new();
        assert!(!rm.pop_hold());
        assert_eq!(rm.hold_count(), 0);
    }

    #[test]
    fn release_without_requests_issues_nothing() {
        let rm = RepaintManager::new();
        rm.push_hold();
        assert!(!rm.pop_hold());
        assert!(!rm.repaint_pending());
    }

    #[test]
    fn wait_returns_after_consumer_pass() {
        let rm = Arc::new(RepaintManager::new());
        let consumer = Arc::clone(&rm);
        let handle = thread::spawn(move || {
            assert!(consumer.wait_for_request(Duration::from_secs(5)));
            consumer.repaint_done();
        });
        let outcome =
            rm.request_repaint_and_wait(Duration::from_secs(5), &CancelToken::new());
        handle.join().unwrap();
        assert_eq!(outcome, RepaintWait::Repainted);
        assert_eq!(rm.completed_passes(), 1);
    }

    #[test]
    fn wait_times_out_without_consumer() {
        let rm = RepaintManager::new();
        let outcome = rm
            .request_repaint_and_wait(Duration::from_millis(20), &CancelToken::new());
        assert_eq!(outcome, RepaintWait::TimedOut);
        assert!(rm.repaint_pending());
    }

    #[test]
    fn wait_observes_cancellation() {
        let rm = Arc::new(RepaintManager::new());
        let cancel = CancelToken::new();
        let waiter_rm = Arc::clone(&rm);
        let waiter_cancel = cancel.clone();
        let handle = thread::spawn(move || {
            waiter_rm.request_repaint_and_wait(Duration::from_secs(10), &waiter_cancel)
        });
        thread::sleep(Duration::from_millis(20));
        cancel.cancel();
        assert_eq!(handle.join().unwrap(), RepaintWait::Cancelled);
    }
}
