//! Background thread that drives multi-frame playback.
//!
//! The [`AnimationScheduler`] owns the [`AnimationState`] behind a single
//! lock. Control calls (start, pause, reverse, ...) come from the UI
//! thread; at most one worker thread advances frames at the configured
//! rate, posts a repaint request per step, and notifies the
//! [`StatusListener`]. The worker never waits on the repaint itself: only
//! programmatic camera moves use the blocking handshake.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use web_time::Instant;

use super::listener::{NoopListener, StatusListener};
use super::repaint::RepaintManager;
use super::state::{AnimationState, PlaybackStatus, ReplayMode, StepOutcome};
use crate::error::ViewerError;
use crate::options::AnimationOptions;
use crate::util::cancel::CancelToken;
use crate::util::pacing::Pacer;

/// Longest wait while paused before the cancel token is re-checked.
const PAUSE_POLL: Duration = Duration::from_millis(10);

#[derive(Debug)]
struct Shared {
    state: Mutex<AnimationState>,
    /// Signalled on resume and stop.
    wake: Condvar,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, AnimationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct Worker {
    cancel: CancelToken,
    handle: JoinHandle<()>,
}

/// Playback controller plus its worker thread.
pub struct AnimationScheduler {
    shared: Arc<Shared>,
    repaint: Arc<RepaintManager>,
    listener: Arc<dyn StatusListener>,
    worker: Option<Worker>,
}

impl AnimationScheduler {
    /// Stopped scheduler with no frames.
    pub fn new(options: &AnimationOptions, repaint: Arc<RepaintManager>) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(AnimationState::new(options)),
                wake: Condvar::new(),
            }),
            repaint,
            listener: Arc::new(NoopListener),
            worker: None,
        }
    }

    /// Replace the status listener.
    pub fn set_listener(&mut self, listener: Arc<dyn StatusListener>) {
        self.listener = listener;
    }

    /// Copy of the current playback state.
    #[must_use]
    pub fn snapshot(&self) -> AnimationState {
        self.shared.lock().clone()
    }

    /// Lifecycle status.
    #[must_use]
    pub fn status(&self) -> PlaybackStatus {
        self.shared.lock().status()
    }

    /// Displayed frame index.
    #[must_use]
    pub fn current_frame(&self) -> usize {
        self.shared.lock().current_frame()
    }

    // -- Lifecycle --

    /// Begin playback. Returns `Ok(false)` without spawning when fewer than
    /// two frames are in range or playback is already active.
    ///
    /// Under ONCE, a start from the terminal frame rewinds first.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::ThreadSpawn`] if the worker thread cannot be
    /// created; the state stays STOPPED.
    pub fn start(&mut self) -> Result<bool, ViewerError> {
        self.reap_worker();
        {
            let mut state = self.shared.lock();
            if state.range_len() < 2 {
                log::warn!(
                    "animation start refused: {} frame(s) in range",
                    state.range_len()
                );
                return Ok(false);
            }
            if state.replay_mode() == ReplayMode::Once && at_terminal_frame(&state) {
                state.rewind();
            }
            if !state.start() {
                return Ok(false);
            }
        }

        let cancel = CancelToken::new();
        let shared = Arc::clone(&self.shared);
        let repaint = Arc::clone(&self.repaint);
        let listener = Arc::clone(&self.listener);
        let worker_cancel = cancel.clone();
        let spawned = thread::Builder::new()
            .name("animation-scheduler".into())
            .spawn(move || run_playback(&shared, &repaint, &*listener, &worker_cancel));
        let handle = match spawned {
            Ok(handle) => handle,
            Err(e) => {
                let _ = self.shared.lock().stop();
                return Err(ViewerError::ThreadSpawn(e));
            }
        };
        self.worker = Some(Worker { cancel, handle });
        log::info!("animation started");
        self.listener.animation_state_changed(PlaybackStatus::Running);
        Ok(true)
    }

    /// RUNNING → PAUSED, keeping the position.
    pub fn pause(&self) -> bool {
        let paused = self.shared.lock().pause();
        if paused {
            log::debug!("animation paused");
            self.listener.animation_state_changed(PlaybackStatus::Paused);
        }
        paused
    }

    /// PAUSED → RUNNING.
    pub fn resume(&self) -> bool {
        let resumed = self.shared.lock().resume();
        if resumed {
            self.shared.wake.notify_all();
            log::debug!("animation resumed");
            self.listener.animation_state_changed(PlaybackStatus::Running);
        }
        resumed
    }

    /// Flip the play direction without stopping.
    pub fn reverse(&self) {
        self.shared.lock().reverse();
    }

    /// Stop playback and join the worker. Safe to call when already
    /// stopped.
    pub fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            worker.cancel.cancel();
            self.shared.wake.notify_all();
            if worker.handle.join().is_err() {
                log::error!("animation thread panicked");
            }
        }
        let changed = self.shared.lock().stop();
        if changed {
            self.listener.animation_state_changed(PlaybackStatus::Stopped);
        }
    }

    /// Join a worker that already finished on its own.
    fn reap_worker(&mut self) {
        let finished = self
            .worker
            .as_ref()
            .is_some_and(|worker| worker.handle.is_finished());
        if finished {
            self.stop();
        }
    }

    // -- Configuration --

    /// Set the playback rate. Invalid values are logged and rejected; the
    /// previous rate stays in effect.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::InvalidOption`] for rates outside the valid
    /// range.
    pub fn set_fps(&self, fps: f32) -> Result<(), ViewerError> {
        self.shared.lock().set_fps(fps).inspect_err(|e| log::error!("{e}"))
    }

    /// Set the boundary policy.
    pub fn set_replay_mode(&self, mode: ReplayMode) {
        self.shared.lock().set_replay_mode(mode);
    }

    /// Set the boundary policy by name (`once`, `loop`, `palindrome`).
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::UnknownReplayMode`] for other names; the
    /// previous mode stays in effect.
    pub fn set_replay_mode_named(&self, name: &str) -> Result<(), ViewerError> {
        let mode = name
            .parse::<ReplayMode>()
            .inspect_err(|e| log::error!("{e}"))?;
        self.set_replay_mode(mode);
        Ok(())
    }

    /// Set the first/last frame dwell times.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::InvalidOption`] for negative delays.
    pub fn set_boundary_delays(
        &self,
        first_secs: f32,
        last_secs: f32,
    ) -> Result<(), ViewerError> {
        self.shared
            .lock()
            .set_boundary_delays(first_secs, last_secs)
            .inspect_err(|e| log::error!("{e}"))
    }

    // -- Frames --

    /// Replace the frame count (on model load). Playback stops first.
    pub fn set_frame_count(&mut self, count: usize) {
        self.stop();
        self.shared.lock().set_frame_count(count);
    }

    /// Restrict playback to `first..=last`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::FrameOutOfRange`] for indices past the loaded
    /// frames.
    pub fn set_frame_range(&self, first: usize, last: usize) -> Result<(), ViewerError> {
        self.shared.lock().set_frame_range(first, last)
    }

    /// Jump to a frame and request a repaint.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::FrameOutOfRange`] for indices past the loaded
    /// frames.
    pub fn set_frame(&self, index: usize) -> Result<(), ViewerError> {
        self.shared.lock().set_frame(index)?;
        let _ = self.repaint.request_repaint();
        self.listener.frame_changed(index);
        Ok(())
    }

    /// Advance one frame by hand under the replay policy. Returns the new
    /// frame, or `None` at a ONCE boundary.
    ///
    /// A ONCE boundary reached during playback stops it; the listener is
    /// told here because the worker then exits without a status change.
    pub fn step_once(&self) -> Option<usize> {
        let (before, outcome) = {
            let mut state = self.shared.lock();
            (state.status(), state.advance())
        };
        match outcome {
            StepOutcome::Advanced(frame) => {
                let _ = self.repaint.request_repaint();
                self.listener.frame_changed(frame);
                Some(frame)
            }
            StepOutcome::Finished => {
                if before != PlaybackStatus::Stopped {
                    self.shared.wake.notify_all();
                    log::info!("animation finished");
                    self.listener.animation_state_changed(PlaybackStatus::Stopped);
                }
                None
            }
        }
    }
}

impl Drop for AnimationScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for AnimationScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationScheduler")
            .field("state", &*self.shared.lock())
            .field("worker", &self.worker.is_some())
            .finish_non_exhaustive()
    }
}

fn at_terminal_frame(state: &AnimationState) -> bool {
    let (first, last) = state.frame_range();
    if state.direction() > 0 {
        state.current_frame() == last
    } else {
        state.current_frame() == first
    }
}

/// Worker loop. Exits on cancellation or a ONCE boundary and always
/// leaves the state STOPPED.
fn run_playback(
    shared: &Shared,
    repaint: &RepaintManager,
    listener: &dyn StatusListener,
    cancel: &CancelToken,
) {
    let mut pacer = Pacer::new(Instant::now());
    let finished = loop {
        let Some(interval) = wait_while_paused(shared, cancel, &mut pacer) else {
            break false;
        };
        let _ = pacer.advance(interval);
        if !cancel.sleep(pacer.remaining(Instant::now())) {
            break false;
        }

        let outcome = {
            let mut state = shared.lock();
            match state.status() {
                PlaybackStatus::Running => state.advance(),
                // Paused during the sleep; the step is retried after resume.
                PlaybackStatus::Paused => continue,
                PlaybackStatus::Stopped => break false,
            }
        };
        match outcome {
            StepOutcome::Advanced(frame) => {
                let _ = repaint.request_repaint();
                listener.frame_changed(frame);
            }
            StepOutcome::Finished => break true,
        }
    };

    let changed = shared.lock().stop();
    if finished {
        log::info!("animation finished");
    } else {
        log::debug!("animation thread cancelled");
    }
    // A ONCE boundary already moved the state to STOPPED inside `advance`.
    if changed || finished {
        listener.animation_state_changed(PlaybackStatus::Stopped);
    }
}

/// Block while PAUSED. Returns the interval for the next step, or `None`
/// if the worker should exit.
fn wait_while_paused(
    shared: &Shared,
    cancel: &CancelToken,
    pacer: &mut Pacer,
) -> Option<Duration> {
    let mut state = shared.lock();
    let mut was_paused = false;
    while state.status() == PlaybackStatus::Paused {
        if cancel.is_cancelled() {
            return None;
        }
        was_paused = true;
        let (guard, _) = shared
            .wake
            .wait_timeout(state, PAUSE_POLL)
            .unwrap_or_else(PoisonError::into_inner);
        state = guard;
    }
    if cancel.is_cancelled() || state.status() == PlaybackStatus::Stopped {
        return None;
    }
    if was_paused {
        pacer.reset(Instant::now());
    }
    Some(state.frame_interval())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        frames: Mutex<Vec<usize>>,
        statuses: Mutex<Vec<PlaybackStatus>>,
    }

    impl StatusListener for Recorder {
        fn frame_changed(&self, frame: usize) {
            self.frames.lock().unwrap().push(frame);
        }

        fn animation_state_changed(&self, status: PlaybackStatus) {
            self.statuses.lock().unwrap().push(status);
        }
    }

    fn scheduler(frames: usize, fps: f32, mode: ReplayMode) -> AnimationScheduler {
        let options = AnimationOptions {
            fps,
            replay_mode: mode,
            ..AnimationOptions::default()
        };
        let mut s = AnimationScheduler::new(&options, Arc::new(RepaintManager::new()));
        s.set_frame_count(frames);
        s
    }

    fn wait_for_stop(s: &AnimationScheduler, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if s.status() == PlaybackStatus::Stopped {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        false
    }

    #[test]
    fn start_needs_two_frames() {
        let mut s = scheduler(1, 60.0, ReplayMode::Loop);
        assert!(!s.start().unwrap());
        assert_eq!(s.status(), PlaybackStatus::Stopped);
    }

    #[test]
    fn once_plays_to_the_end_and_stops() {
        let mut s = scheduler(4, 120.0, ReplayMode::Once);
        let recorder = Arc::new(Recorder::default());
        s.set_listener(recorder.clone());
        assert!(s.start().unwrap());
        assert!(wait_for_stop(&s, Duration::from_secs(5)));
        s.stop();
        assert_eq!(*recorder.frames.lock().unwrap(), vec![1, 2, 3]);
        assert_eq!(
            *recorder.statuses.lock().unwrap(),
            vec![PlaybackStatus::Running, PlaybackStatus::Stopped]
        );
        assert_eq!(s.current_frame(), 3);
    }

    #[test]
    fn once_restart_rewinds() {
        let mut s = scheduler(3, 120.0, ReplayMode::Once);
        s.set_frame(2).unwrap();
        assert!(s.start().unwrap());
        assert!(wait_for_stop(&s, Duration::from_secs(5)));
        assert_eq!(s.current_frame(), 2);
    }

    #[test]
    fn stop_cancels_a_slow_animation_promptly() {
        let mut s = scheduler(10, 1.0, ReplayMode::Loop);
        assert!(s.start().unwrap());
        thread::sleep(Duration::from_millis(20));
        let began = Instant::now();
        s.stop();
        assert!(began.elapsed() < Duration::from_millis(500));
        assert_eq!(s.status(), PlaybackStatus::Stopped);
        assert_eq!(s.current_frame(), 0);
    }

    #[test]
    fn pause_holds_position() {
        let mut s = scheduler(50, 100.0, ReplayMode::Loop);
        assert!(s.start().unwrap());
        thread::sleep(Duration::from_millis(30));
        assert!(s.pause());
        thread::sleep(Duration::from_millis(20));
        let held = s.current_frame();
        thread::sleep(Duration::from_millis(50));
        assert_eq!(s.current_frame(), held);
        assert_eq!(s.status(), PlaybackStatus::Paused);
        assert!(s.resume());
        s.stop();
        assert_eq!(s.status(), PlaybackStatus::Stopped);
    }

    #[test]
    fn invalid_settings_keep_previous_values() {
        let s = scheduler(4, 12.0, ReplayMode::Loop);
        assert!(s.set_fps(-1.0).is_err());
        assert!(s.set_replay_mode_named("sideways").is_err());
        let state = s.snapshot();
        assert_eq!(state.fps(), 12.0);
        assert_eq!(state.replay_mode(), ReplayMode::Loop);
        s.set_replay_mode_named("Palindrome").unwrap();
        assert_eq!(s.snapshot().replay_mode(), ReplayMode::Palindrome);
    }

    #[test]
    fn manual_stepping_follows_replay_mode() {
        let s = scheduler(3, 10.0, ReplayMode::Palindrome);
        let seq: Vec<_> = (0..5).filter_map(|_| s.step_once()).collect();
        assert_eq!(seq, vec![1, 2, 1, 0, 1]);
    }

    #[test]
    fn manual_step_past_once_boundary_reports_stop() {
        let mut s = scheduler(3, 1.0, ReplayMode::Once);
        let recorder = Arc::new(Recorder::default());
        s.set_listener(recorder.clone());
        s.set_frame(1).unwrap();
        assert!(s.start().unwrap());
        assert_eq!(s.step_once(), Some(2));
        assert_eq!(s.step_once(), None);
        assert_eq!(s.status(), PlaybackStatus::Stopped);
        s.stop();
        assert_eq!(
            *recorder.statuses.lock().unwrap(),
            vec![PlaybackStatus::Running, PlaybackStatus::Stopped]
        );
        assert_eq!(s.step_once(), None);
        assert_eq!(recorder.statuses.lock().unwrap().len(), 2);
    }

    #[test]
    fn frame_jump_requests_repaint() {
        let repaint = Arc::new(RepaintManager::new());
        let mut s = AnimationScheduler::new(&AnimationOptions::default(), repaint.clone());
        s.set_frame_count(5);
        s.set_frame(3).unwrap();
        assert!(repaint.take_repaint_request());
        assert!(s.set_frame(9).is_err());
        assert_eq!(s.current_frame(), 3);
    }
}
