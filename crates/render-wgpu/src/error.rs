use std::path::PathBuf;

/// Errors that stop the renderer from starting.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible GPU adapter found")]
    NoAdapter,
    #[error("failed to create device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface reports no supported formats")]
    NoSurfaceFormat,
    #[error("failed to load shader {path}: {source}")]
    ShaderAsset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("shader {path} is empty")]
    EmptyShader { path: PathBuf },
    #[error("failed to build render pipeline: {0}")]
    Pipeline(String),
}
