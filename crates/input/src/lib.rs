//! Input mapping: sliders and pointer events become [`ArmCommand`]s applied to
//! a [`SceneState`] owned by the frame loop.
//!
//! # Invariants
//! - Handlers publish through a [`CommandQueue`]; only the frame loop mutates state.
//! - Commands apply in publish order, so the last write in a frame wins.
//! - Non-finite values are rejected at this boundary.

pub mod action;
pub mod pointer;
pub mod state;

pub use action::ArmCommand;
pub use pointer::PointerDrag;
pub use state::{CommandQueue, SceneState};
