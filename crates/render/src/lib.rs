//! Renderer-agnostic frame composition.
//!
//! Builds the shared cube mesh, turns draw commands into model-view matrices
//! and drives one frame through any [`Renderer`].
//!
//! # Invariants
//! - Renderers never mutate the shared mesh or the scene inputs.
//! - Every box is lifted by half its height before scaling (base-centered origin).
//! - Draws are submitted in draw-list order, arm links first.

pub mod compose;
pub mod frame;
pub mod mesh;
mod renderer;

pub use compose::{box_local_transform, box_model_view, projection_matrix};
pub use frame::{FrameLoop, FrameStats, build_scene};
pub use mesh::{MeshBuilder, MeshData, build_colored_cube};
pub use renderer::{DebugTextRenderer, RecordedDraw, Renderer};
