//! Multi-frame playback and repaint coordination.
//!
//! [`AnimationState`] is the pure playback state machine
//! (STOPPED → RUNNING ⇄ PAUSED → STOPPED) with the ONCE / LOOP /
//! PALINDROME boundary policies. [`AnimationScheduler`] drives it from a
//! background thread with drift-free pacing. [`RepaintManager`] is the
//! meeting point between producers (scheduler, camera moves, edits) and the
//! single render consumer.

mod listener;
mod repaint;
mod scheduler;
mod state;

pub use listener::{NoopListener, StatusListener};
pub use repaint::{RepaintManager, RepaintWait};
pub use scheduler::AnimationScheduler;
pub use state::{AnimationState, PlaybackStatus, ReplayMode, StepOutcome};
