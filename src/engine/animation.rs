//! Multi-frame playback methods for [`Viewer`].

use super::Viewer;
use crate::animation::{AnimationState, PlaybackStatus, ReplayMode};
use crate::error::ViewerError;

impl Viewer {
    /// Start playback from the current frame. Returns `false` when there is
    /// nothing to play (fewer than two frames in range) or playback is
    /// already running.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::ThreadSpawn`] if the playback thread cannot be
    /// created.
    pub fn play(&mut self) -> Result<bool, ViewerError> {
        self.scheduler.start()
    }

    /// Pause playback, keeping the current frame.
    pub fn pause(&self) -> bool {
        self.scheduler.pause()
    }

    /// Resume paused playback.
    pub fn resume(&self) -> bool {
        self.scheduler.resume()
    }

    /// Stop playback and join the playback thread.
    pub fn stop(&mut self) {
        self.scheduler.stop();
    }

    /// Flip the playback direction.
    pub fn reverse(&self) {
        self.scheduler.reverse();
    }

    /// Show frame `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::FrameOutOfRange`] for indices past the loaded
    /// frames; the displayed frame is unchanged.
    pub fn set_frame(&self, index: usize) -> Result<(), ViewerError> {
        self.scheduler.set_frame(index)
    }

    /// Advance one frame by hand. Returns the new frame, or `None` at a
    /// `once` boundary.
    pub fn step_once(&self) -> Option<usize> {
        self.scheduler.step_once()
    }

    /// Restrict playback to `first..=last`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::FrameOutOfRange`] for indices past the loaded
    /// frames.
    pub fn set_frame_range(
        &self,
        first: usize,
        last: usize,
    ) -> Result<(), ViewerError> {
        self.scheduler.set_frame_range(first, last)
    }

    /// Set the boundary policy.
    pub fn set_replay_mode(&mut self, mode: ReplayMode) {
        self.scheduler.set_replay_mode(mode);
        self.options.animation.replay_mode = mode;
    }

    /// Playback state.
    #[must_use]
    pub fn playback_status(&self) -> PlaybackStatus {
        self.scheduler.status()
    }

    /// Copy of the full playback state.
    #[must_use]
    pub fn animation_state(&self) -> AnimationState {
        self.scheduler.snapshot()
    }

    /// Index of the displayed frame.
    #[must_use]
    pub fn current_frame(&self) -> usize {
        self.scheduler.current_frame()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::super::tests::viewer_with_frames;
    use super::*;
    use crate::options::Options;

    fn fast_viewer(frames: usize) -> Viewer {
        let mut viewer = viewer_with_frames(frames);
        let mut options = Options::default();
        options.animation.fps = 120.0;
        viewer.set_options(options).unwrap();
        viewer
    }

    #[test]
    fn single_frame_refuses_to_play() {
        let mut viewer = viewer_with_frames(1);
        assert!(!viewer.play().unwrap());
        assert_eq!(viewer.playback_status(), PlaybackStatus::Stopped);
    }

    #[test]
    fn once_playback_runs_to_the_last_frame() {
        let mut viewer = fast_viewer(4);
        viewer.set_replay_mode(ReplayMode::Once);
        assert!(viewer.play().unwrap());
        let deadline = std::time::Instant::now() + Duration::from_secs(5);
        while viewer.playback_status() == PlaybackStatus::Running
            && std::time::Instant::now() < deadline
        {
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(viewer.playback_status(), PlaybackStatus::Stopped);
        assert_eq!(viewer.current_frame(), 3);
    }

    #[test]
    fn pause_and_resume_keep_the_frame() {
        let mut viewer = viewer_with_frames(3);
        viewer.set_replay_mode(ReplayMode::Loop);
        assert!(viewer.play().unwrap());
        assert!(viewer.pause());
        let frame = viewer.current_frame();
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(viewer.current_frame(), frame);
        assert_eq!(viewer.playback_status(), PlaybackStatus::Paused);
        assert!(viewer.resume());
        viewer.stop();
        assert_eq!(viewer.playback_status(), PlaybackStatus::Stopped);
    }

    #[test]
    fn manual_stepping_honors_range() {
        let viewer = viewer_with_frames(5);
        viewer.set_frame_range(1, 2).unwrap();
        viewer.set_frame(1).unwrap();
        assert!(viewer.set_frame(9).is_err());
        assert!(viewer.set_frame_range(0, 7).is_err());
        assert_eq!(viewer.step_once(), Some(2));
    }
}
