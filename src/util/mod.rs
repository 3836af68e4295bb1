//! Shared utilities for the viewer core.
//!
//! Cooperative cancellation for background threads and drift-free step
//! pacing.

pub mod cancel;
pub mod pacing;
