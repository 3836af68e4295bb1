// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Interactive 3D molecular scene viewer core.
//!
//! Molscope keeps the state behind a molecular viewer: the camera
//! transform that maps Angstrom world coordinates to screen pixels, the
//! scene's shape slots and decorative primitives, secondary-structure axis
//! fitting, and multi-frame playback. Drawing itself is delegated to a
//! host-supplied [`renderer::Rasterizer`].
//!
//! # Key entry points
//!
//! - [`engine::Viewer`] - the facade owning every subsystem
//! - [`camera::TransformManager`] - world/screen projection and navigation
//! - [`renderer::RenderDispatcher`] - per-shape renderer dispatch
//! - [`primitive::PrimitiveCollection`] - thread-safe decorative geometry
//! - [`structure`] - helix, sheet, and turn axis fitting
//! - [`animation::AnimationScheduler`] - frame playback and repaint
//!   coordination
//! - [`options::Options`] - runtime configuration with TOML presets
//!
//! # Architecture
//!
//! A render pass finalizes the transform once, then walks the scene's
//! populated shapes in priority order and hands each to its renderer.
//! Playback and programmatic camera moves run on their own threads and
//! reach the host only through the [`animation::RepaintManager`]: they
//! request a repaint, and a camera move waits for the pass to finish
//! before taking its next step.

pub mod animation;
pub mod camera;
pub mod engine;
pub mod error;
pub mod options;
pub mod primitive;
pub mod renderer;
pub mod scene;
pub mod structure;
pub mod util;

pub use engine::{Viewer, ViewerCommand};
pub use error::ViewerError;
