//! Playback state machine for multi-frame animation.
//!
//! [`AnimationState`] is pure data: the scheduler thread owns the only
//! mutable copy (behind one lock) and everything here is deterministic, so
//! replay policies are tested without threads or clocks.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ViewerError;
use crate::options::{validate_delay, validate_fps, AnimationOptions};

/// What happens when playback reaches an end of the frame range.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ReplayMode {
    /// Stop at the boundary.
    #[default]
    Once,
    /// Wrap around to the opposite end.
    Loop,
    /// Bounce back without repeating the boundary frame.
    Palindrome,
}

impl FromStr for ReplayMode {
    type Err = ViewerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "once" => Ok(Self::Once),
            "loop" => Ok(Self::Loop),
            "palindrome" => Ok(Self::Palindrome),
            _ => Err(ViewerError::UnknownReplayMode(s.to_owned())),
        }
    }
}

impl fmt::Display for ReplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Once => "once",
            Self::Loop => "loop",
            Self::Palindrome => "palindrome",
        };
        f.write_str(name)
    }
}

/// Scheduler lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackStatus {
    /// Not playing; the scheduler thread is absent or exiting.
    #[default]
    Stopped,
    /// Advancing frames.
    Running,
    /// Holding the current frame; resumes without losing position.
    Paused,
}

/// Result of one playback step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The current frame moved to this index.
    Advanced(usize),
    /// ONCE mode hit the end of the range; playback stopped.
    Finished,
}

/// Current frame, direction, replay policy, and timing.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationState {
    frame_count: usize,
    first_frame: usize,
    last_frame: usize,
    current: usize,
    /// Logical play direction, +1 or -1.
    direction: i64,
    /// Palindrome bounce direction, +1 or -1.
    bounce: i64,
    replay_mode: ReplayMode,
    fps: f32,
    first_frame_delay: f32,
    last_frame_delay: f32,
    status: PlaybackStatus,
}

impl Default for AnimationState {
    fn default() -> Self {
        Self::new(&AnimationOptions::default())
    }
}

impl AnimationState {
    /// Stopped state with no frames, configured from `options`.
    ///
    /// Invalid option values fall back to the defaults.
    #[must_use]
    pub fn new(options: &AnimationOptions) -> Self {
        let defaults = AnimationOptions::default();
        Self {
            frame_count: 0,
            first_frame: 0,
            last_frame: 0,
            current: 0,
            direction: 1,
            bounce: 1,
            replay_mode: options.replay_mode,
            fps: validate_fps(options.fps).unwrap_or(defaults.fps),
            first_frame_delay: validate_delay("", options.first_frame_delay_secs)
                .unwrap_or(0.0),
            last_frame_delay: validate_delay("", options.last_frame_delay_secs)
                .unwrap_or(0.0),
            status: PlaybackStatus::Stopped,
        }
    }

    // -- Frames --

    /// Replace the frame count; the range resets to all frames.
    pub fn set_frame_count(&mut self, count: usize) {
        self.frame_count = count;
        self.first_frame = 0;
        self.last_frame = count.saturating_sub(1);
        self.current = self.current.min(self.last_frame);
        self.bounce = 1;
    }

    /// Number of loaded frames.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frame_count
    }

    /// Restrict playback to `first..=last` (order-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::FrameOutOfRange`] if either end is past the
    /// loaded frames; the previous range is kept.
    pub fn set_frame_range(
        &mut self,
        first: usize,
        last: usize,
    ) -> Result<(), ViewerError> {
        for index in [first, last] {
            if index >= self.frame_count {
                return Err(ViewerError::FrameOutOfRange {
                    index,
                    count: self.frame_count,
                });
            }
        }
        self.first_frame = first.min(last);
        self.last_frame = first.max(last);
        self.current = self.current.clamp(self.first_frame, self.last_frame);
        self.bounce = 1;
        Ok(())
    }

    /// `(first, last)` of the playback range.
    #[must_use]
    pub fn frame_range(&self) -> (usize, usize) {
        (self.first_frame, self.last_frame)
    }

    /// Number of frames inside the playback range.
    #[must_use]
    pub fn range_len(&self) -> usize {
        if self.frame_count == 0 {
            0
        } else {
            self.last_frame - self.first_frame + 1
        }
    }

    /// Jump to a frame.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::FrameOutOfRange`] for indices past the loaded
    /// frames.
    pub fn set_frame(&mut self, index: usize) -> Result<(), ViewerError> {
        if index >= self.frame_count {
            return Err(ViewerError::FrameOutOfRange {
                index,
                count: self.frame_count,
            });
        }
        self.current = index;
        Ok(())
    }

    /// Index of the displayed frame.
    #[must_use]
    pub fn current_frame(&self) -> usize {
        self.current
    }

    /// Return to the start of the range for the current play direction.
    pub fn rewind(&mut self) {
        self.current = if self.direction > 0 {
            self.first_frame
        } else {
            self.last_frame
        };
        self.bounce = 1;
    }

    // -- Stepping --

    /// Advance one frame under the replay policy.
    pub fn advance(&mut self) -> StepOutcome {
        self.advance_by(1)
    }

    /// Advance `step` frames under the replay policy.
    ///
    /// The candidate index is `current + step × direction × bounce`; if it
    /// leaves the range the replay mode decides: ONCE stops at the
    /// boundary, LOOP wraps to the opposite end, PALINDROME reflects off
    /// the boundary and flips the bounce direction.
    pub fn advance_by(&mut self, step: usize) -> StepOutcome {
        if self.range_len() < 2 {
            return StepOutcome::Finished;
        }
        let lo = self.first_frame as i64;
        let hi = self.last_frame as i64;
        let len = hi - lo + 1;
        let step = step as i64;
        let mut next = self.current as i64 + step * self.direction * self.bounce;

        if next < lo || next > hi {
            match self.replay_mode {
                ReplayMode::Once => {
                    self.status = PlaybackStatus::Stopped;
                    return StepOutcome::Finished;
                }
                ReplayMode::Loop => {
                    next = lo + (next - lo).rem_euclid(len);
                }
                ReplayMode::Palindrome => {
                    self.bounce = -self.bounce;
                    next = if next > hi { 2 * hi - next } else { 2 * lo - next };
                    next = next.clamp(lo, hi);
                }
            }
        }
        self.current = next as usize;
        StepOutcome::Advanced(self.current)
    }

    /// Flip the logical play direction without stopping.
    pub fn reverse(&mut self) {
        self.direction = -self.direction;
    }

    /// Logical play direction (+1 forward, -1 backward).
    #[must_use]
    pub fn direction(&self) -> i64 {
        self.direction
    }

    // -- Lifecycle --

    /// STOPPED → RUNNING. Requires at least two frames in the range.
    pub fn start(&mut self) -> bool {
        if self.range_len() < 2 || self.status != PlaybackStatus::Stopped {
            return false;
        }
        self.status = PlaybackStatus::Running;
        true
    }

    /// RUNNING → PAUSED.
    pub fn pause(&mut self) -> bool {
        if self.status != PlaybackStatus::Running {
            return false;
        }
        self.status = PlaybackStatus::Paused;
        true
    }

    /// PAUSED → RUNNING.
    pub fn resume(&mut self) -> bool {
        if self.status != PlaybackStatus::Paused {
            return false;
        }
        self.status = PlaybackStatus::Running;
        true
    }

    /// Any → STOPPED. Returns whether the status changed.
    pub fn stop(&mut self) -> bool {
        let changed = self.status != PlaybackStatus::Stopped;
        self.status = PlaybackStatus::Stopped;
        changed
    }

    /// Current lifecycle status.
    #[must_use]
    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    // -- Timing and policy --

    /// Set the playback rate.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::InvalidOption`] for out-of-range rates; the
    /// previous rate is kept.
    pub fn set_fps(&mut self, fps: f32) -> Result<(), ViewerError> {
        self.fps = validate_fps(fps)?;
        Ok(())
    }

    /// Frames per second.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Set the boundary policy.
    pub fn set_replay_mode(&mut self, mode: ReplayMode) {
        self.replay_mode = mode;
        self.bounce = 1;
    }

    /// Boundary policy.
    #[must_use]
    pub fn replay_mode(&self) -> ReplayMode {
        self.replay_mode
    }

    /// Set the extra hold on the first/last frame of the range.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::InvalidOption`] for negative delays; both
    /// previous delays are kept.
    pub fn set_boundary_delays(
        &mut self,
        first_secs: f32,
        last_secs: f32,
    ) -> Result<(), ViewerError> {
        let first =
            validate_delay("animation.first_frame_delay_secs", first_secs)?;
        let last = validate_delay("animation.last_frame_delay_secs", last_secs)?;
        self.first_frame_delay = first;
        self.last_frame_delay = last;
        Ok(())
    }

    /// How long the current frame stays up before the next step: the
    /// nominal interval plus any dwell for a boundary frame.
    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        let mut secs = 1.0 / f64::from(self.fps);
        if self.current == self.first_frame {
            secs += f64::from(self.first_frame_delay);
        }
        if self.current == self.last_frame {
            secs += f64::from(self.last_frame_delay);
        }
        Duration::from_secs_f64(secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(frames: usize, mode: ReplayMode) -> AnimationState {
        let mut s = AnimationState::default();
        s.set_frame_count(frames);
        s.set_replay_mode(mode);
        assert!(s.start());
        s
    }

    fn collect(s: &mut AnimationState, steps: usize) -> Vec<usize> {
        (0..steps)
            .map_while(|_| match s.advance() {
                StepOutcome::Advanced(i) => Some(i),
                StepOutcome::Finished => None,
            })
            .collect()
    }

    #[test]
    fn once_stops_at_last_frame() {
        let mut s = running(4, ReplayMode::Once);
        assert_eq!(collect(&mut s, 10), vec![1, 2, 3]);
        assert_eq!(s.current_frame(), 3);
        assert_eq!(s.status(), PlaybackStatus::Stopped);
        assert_eq!(s.advance(), StepOutcome::Finished);
        assert_eq!(s.current_frame(), 3);
    }

    #[test]
    fn loop_wraps_to_opposite_end() {
        let mut s = running(3, ReplayMode::Loop);
        assert_eq!(collect(&mut s, 7), vec![1, 2, 0, 1, 2, 0, 1]);
        s.reverse();
        assert_eq!(collect(&mut s, 4), vec![0, 2, 1, 0]);
    }

    #[test]
    fn palindrome_never_repeats_boundary() {
        let mut s = running(4, ReplayMode::Palindrome);
        let seq = collect(&mut s, 12);
        assert_eq!(seq, vec![1, 2, 3, 2, 1, 0, 1, 2, 3, 2, 1, 0]);
        let mut prev = 0;
        for &i in &seq {
            assert_ne!(i, prev);
            prev = i;
        }
    }

    #[test]
    fn palindrome_two_frames_alternates() {
        let mut s = running(2, ReplayMode::Palindrome);
        assert_eq!(collect(&mut s, 5), vec![1, 0, 1, 0, 1]);
    }

    #[test]
    fn reverse_flips_direction_mid_play() {
        let mut s = running(5, ReplayMode::Once);
        assert_eq!(collect(&mut s, 2), vec![1, 2]);
        s.reverse();
        assert_eq!(collect(&mut s, 5), vec![1, 0]);
        assert_eq!(s.status(), PlaybackStatus::Stopped);
    }

    #[test]
    fn frame_range_limits_playback() {
        let mut s = AnimationState::default();
        s.set_frame_count(10);
        s.set_frame_range(7, 4).unwrap();
        assert_eq!(s.frame_range(), (4, 7));
        s.set_replay_mode(ReplayMode::Loop);
        s.rewind();
        assert!(s.start());
        assert_eq!(collect(&mut s, 5), vec![5, 6, 7, 4, 5]);
        assert!(s.set_frame_range(2, 10).is_err());
        assert_eq!(s.frame_range(), (4, 7));
    }

    #[test]
    fn start_requires_two_frames() {
        let mut s = AnimationState::default();
        s.set_frame_count(1);
        assert!(!s.start());
        assert_eq!(s.status(), PlaybackStatus::Stopped);
    }

    #[test]
    fn pause_resume_keeps_position() {
        let mut s = running(5, ReplayMode::Loop);
        let _ = s.advance();
        assert!(s.pause());
        assert!(!s.pause());
        assert_eq!(s.status(), PlaybackStatus::Paused);
        assert!(s.resume());
        assert_eq!(s.current_frame(), 1);
        assert!(s.stop());
        assert!(!s.stop());
    }

    #[test]
    fn invalid_fps_keeps_previous() {
        let mut s = AnimationState::default();
        s.set_fps(24.0).unwrap();
        assert!(s.set_fps(-1.0).is_err());
        assert!(s.set_fps(0.0).is_err());
        assert_eq!(s.fps(), 24.0);
    }

    #[test]
    fn replay_mode_parses_names() {
        assert_eq!("LOOP".parse::<ReplayMode>().unwrap(), ReplayMode::Loop);
        assert_eq!(
            " palindrome ".parse::<ReplayMode>().unwrap(),
            ReplayMode::Palindrome
        );
        assert!(matches!(
            "swing".parse::<ReplayMode>(),
            Err(ViewerError::UnknownReplayMode(_))
        ));
        assert_eq!(ReplayMode::Once.to_string(), "once");
    }

    fn assert_interval(s: &AnimationState, millis: u64) {
        let expected = Duration::from_millis(millis);
        let actual = s.frame_interval();
        let diff = if actual > expected {
            actual - expected
        } else {
            expected - actual
        };
        assert!(diff < Duration::from_micros(1), "{:?}", s.frame_interval());
    }

    #[test]
    fn boundary_delays_extend_interval() {
        let mut s = AnimationState::default();
        s.set_frame_count(3);
        s.set_fps(10.0).unwrap();
        s.set_boundary_delays(0.5, 1.0).unwrap();
        assert_interval(&s, 600);
        s.set_frame(1).unwrap();
        assert_interval(&s, 100);
        s.set_frame(2).unwrap();
        assert_interval(&s, 1100);
        assert!(s.set_boundary_delays(-0.1, 0.0).is_err());
        s.set_frame(0).unwrap();
        assert_interval(&s, 600);
    }
}
