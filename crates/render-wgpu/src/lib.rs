//! wgpu render backend for the arm viewer.
//!
//! Uploads the packed cube mesh once, then draws each box with its own
//! model-view matrix selected by a dynamic uniform offset.
//!
//! # Invariants
//! - Mesh buffers are immutable after creation.
//! - A draw never samples outside the packed mesh; such draws are skipped.
//! - Shader sources come from disk at startup; a missing file aborts startup.

mod context;
mod error;
mod gpu;
mod shaders;

pub use context::GpuContext;
pub use error::RenderError;
pub use gpu::WgpuRenderer;
pub use shaders::ShaderSources;
