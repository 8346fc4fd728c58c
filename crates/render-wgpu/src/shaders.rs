use crate::error::RenderError;
use std::path::Path;

/// Vertex and fragment WGSL text, read once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSources {
    pub vertex: String,
    pub fragment: String,
}

impl ShaderSources {
    /// Read both shader files. Any failure is fatal to startup and is not retried.
    pub fn load(vertex: &Path, fragment: &Path) -> Result<Self, RenderError> {
        Ok(Self {
            vertex: read_shader(vertex)?,
            fragment: read_shader(fragment)?,
        })
    }
}

fn read_shader(path: &Path) -> Result<String, RenderError> {
    let source = std::fs::read_to_string(path).map_err(|source| RenderError::ShaderAsset {
        path: path.to_path_buf(),
        source,
    })?;
    if source.trim().is_empty() {
        return Err(RenderError::EmptyShader {
            path: path.to_path_buf(),
        });
    }
    tracing::info!("loaded shader {} ({} bytes)", path.display(), source.len());
    Ok(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn loads_both_sources() {
        let dir = tempfile::tempdir().unwrap();
        let vs = dir.path().join("box.vert.wgsl");
        let fs_path = dir.path().join("box.frag.wgsl");
        fs::write(&vs, "@vertex fn vs_main() {}").unwrap();
        fs::write(&fs_path, "@fragment fn fs_main() {}").unwrap();

        let sources = ShaderSources::load(&vs, &fs_path).unwrap();
        assert!(sources.vertex.contains("vs_main"));
        assert!(sources.fragment.contains("fs_main"));
    }

    #[test]
    fn missing_fragment_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let vs = dir.path().join("box.vert.wgsl");
        fs::write(&vs, "@vertex fn vs_main() {}").unwrap();

        let err = ShaderSources::load(&vs, &dir.path().join("missing.wgsl")).unwrap_err();
        match err {
            RenderError::ShaderAsset { path, .. } => assert!(path.ends_with("missing.wgsl")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_shader_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let vs = dir.path().join("box.vert.wgsl");
        fs::write(&vs, "  \n").unwrap();
        let err = ShaderSources::load(&vs, &vs).unwrap_err();
        assert!(matches!(err, RenderError::EmptyShader { .. }));
    }

    #[test]
    fn bundled_shaders_load() {
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../assets/shaders");
        let sources =
            ShaderSources::load(&root.join("box.vert.wgsl"), &root.join("box.frag.wgsl")).unwrap();
        assert!(sources.vertex.contains("fn vs_main"));
        assert!(sources.fragment.contains("fn fs_main"));
    }
}
