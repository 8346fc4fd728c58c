//! Kinematic chain: joint angles in, per-link world transforms out.
//!
//! # Invariants
//! - Evaluation is pure: the same angles always produce the same draw list.
//! - The arm always emits exactly five links in base, upper arm, lower arm,
//!   left finger, right finger order.
//! - The two fingers branch from one gripper pivot; the right finger's angle is
//!   the exact negation of the left finger's.
//! - Box origins are bottom-face centers; the half-height render lift belongs to
//!   the renderer, not to this crate.

pub mod arm;
pub mod chain;
pub mod scene;

pub use arm::{ARM_LINK_COUNT, ArmLink, ArmRig, evaluate};
pub use chain::{Axis, ChainNode, JointDrive};
pub use scene::{DrawSource, Scene, StaticProp};
