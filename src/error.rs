//! Crate-level error types.

use std::fmt;

use crate::scene::ShapeKind;

/// Errors produced by the molscope crate.
#[derive(Debug)]
pub enum ViewerError {
    /// A projection was requested before the transform engine was finalized
    /// for the first render pass.
    TransformNotFinalized,
    /// A configuration value was rejected; the previous value is retained.
    InvalidOption {
        /// Option key, e.g. `animation.fps`.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },
    /// Replay mode name not recognized.
    UnknownReplayMode(String),
    /// No renderer is registered (or it previously failed) for a shape kind.
    RendererUnavailable(ShapeKind),
    /// A renderer factory failed to build its renderer.
    RendererInit {
        /// Shape kind whose renderer failed.
        kind: ShapeKind,
        /// Failure description from the factory.
        reason: String,
    },
    /// A frame index outside the loaded frames.
    FrameOutOfRange {
        /// Requested frame index.
        index: usize,
        /// Number of loaded frames.
        count: usize,
    },
    /// Failed to spawn a background thread.
    ThreadSpawn(std::io::Error),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
}

impl ViewerError {
    /// Shorthand for [`ViewerError::InvalidOption`].
    pub(crate) fn invalid_option(
        key: &str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidOption {
            key: key.to_owned(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TransformNotFinalized => write!(
                f,
                "transform used before finalize_transform_parameters()"
            ),
            Self::InvalidOption { key, reason } => {
                write!(f, "invalid value for '{key}': {reason}")
            }
            Self::UnknownReplayMode(name) => {
                write!(f, "unknown replay mode '{name}'")
            }
            Self::RendererUnavailable(kind) => {
                write!(f, "no renderer available for {kind:?}")
            }
            Self::RendererInit { kind, reason } => {
                write!(f, "renderer for {kind:?} failed to initialize: {reason}")
            }
            Self::FrameOutOfRange { index, count } => {
                write!(f, "frame {index} out of range ({count} frames)")
            }
            Self::ThreadSpawn(e) => {
                write!(f, "failed to spawn thread: {e}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
        }
    }
}

impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) | Self::ThreadSpawn(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ViewerError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
