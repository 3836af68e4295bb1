//! Playback notifications for the status/UI collaborator.

use super::state::PlaybackStatus;

/// Receives playback notifications from the scheduler thread.
///
/// Callbacks run on the scheduler thread with no scheduler lock held; keep
/// them short.
pub trait StatusListener: Send + Sync {
    /// The displayed frame index changed.
    fn frame_changed(&self, _frame: usize) {}

    /// The playback lifecycle changed.
    fn animation_state_changed(&self, _status: PlaybackStatus) {}
}

/// Listener that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl StatusListener for NoopListener {}
