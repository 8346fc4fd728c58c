//! Shared types for the arm viewer.
//!
//! # Invariants
//! - Joint angles are degrees and never clamped here; any real value is a valid pose input.
//! - Box dimensions describe a link whose local origin is the center of its bottom face.
//! - Camera pitch is always held strictly inside (-90, 90) degrees.

pub mod camera;
pub mod config;
pub mod types;

pub use camera::OrbitCamera;
pub use config::{ConfigError, ViewerConfig};
pub use types::{BoxDimensions, DrawCommand, Joint, JointAngles, VertexRange};
