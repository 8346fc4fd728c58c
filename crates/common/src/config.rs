//! Viewer configuration with defaults matching the canonical scene, loadable from YAML.

use crate::camera::OrbitCamera;
use crate::types::{Joint, JointAngles};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors from loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Top-level viewer configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
    pub window: WindowConfig,
    pub camera: CameraConfig,
    pub projection: ProjectionConfig,
    pub joints: JointSliders,
    pub shaders: ShaderPaths,
    /// RGBA clear color of the draw surface.
    pub clear_color: [f64; 4],
    /// Draw the static cube next to the arm.
    pub show_prop: bool,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            camera: CameraConfig::default(),
            projection: ProjectionConfig::default(),
            joints: JointSliders::default(),
            shaders: ShaderPaths::default(),
            clear_color: [0.95, 0.95, 0.95, 1.0],
            show_prop: true,
        }
    }
}

impl ViewerConfig {
    /// Parse a YAML config file. Missing keys fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_yaml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `path` if given, otherwise use built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => {
                tracing::debug!("no config file given, using defaults");
                Ok(Self::default())
            }
        }
    }
}

/// Draw surface settings. The surface is sized once at startup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 640,
            title: "Robot Arm".into(),
        }
    }
}

/// Initial orbit state and drag/zoom tuning.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Radians.
    pub yaw: f32,
    /// Radians; clamped short of +/-90 degrees.
    pub pitch: f32,
    pub radius: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    /// Radians per pixel of drag.
    pub sensitivity: f32,
    /// Radius change per scroll line.
    pub zoom_step: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            radius: 20.0,
            min_radius: 2.0,
            max_radius: 80.0,
            sensitivity: 0.01,
            zoom_step: 1.0,
        }
    }
}

impl CameraConfig {
    pub fn build(&self) -> OrbitCamera {
        let mut cam = OrbitCamera::default();
        cam.yaw = self.yaw;
        cam.sensitivity = self.sensitivity;
        cam.min_radius = self.min_radius;
        cam.max_radius = self.max_radius;
        cam.set_pitch(self.pitch);
        cam.set_radius(self.radius);
        cam
    }
}

/// Projection used for every frame.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProjectionConfig {
    /// Fixed view volume; `half_width`/`half_height` are world units.
    Orthographic {
        half_width: f32,
        half_height: f32,
        near: f32,
        far: f32,
    },
    Perspective {
        fov_degrees: f32,
        near: f32,
        far: f32,
    },
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        ProjectionConfig::Orthographic {
            half_width: 10.0,
            half_height: 8.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

/// Slider bounds and starting value for one joint, in degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SliderRange {
    pub min: f32,
    pub max: f32,
    pub default: f32,
}

impl SliderRange {
    pub const fn new(min: f32, max: f32, default: f32) -> Self {
        Self { min, max, default }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct JointSliders {
    pub base: SliderRange,
    pub upper_arm: SliderRange,
    pub lower_arm: SliderRange,
    pub gripper: SliderRange,
}

impl Default for JointSliders {
    fn default() -> Self {
        Self {
            base: SliderRange::new(-180.0, 180.0, 0.0),
            upper_arm: SliderRange::new(-90.0, 90.0, 0.0),
            lower_arm: SliderRange::new(-135.0, 135.0, 0.0),
            // start slightly open
            gripper: SliderRange::new(-25.0, 45.0, 15.0),
        }
    }
}

impl JointSliders {
    pub fn range(&self, joint: Joint) -> SliderRange {
        match joint {
            Joint::Base => self.base,
            Joint::UpperArm => self.upper_arm,
            Joint::LowerArm => self.lower_arm,
            Joint::Gripper => self.gripper,
        }
    }

    pub fn initial_angles(&self) -> JointAngles {
        let mut angles = JointAngles::default();
        for joint in Joint::ALL {
            angles.set(joint, self.range(joint).default);
        }
        angles
    }
}

/// Locations of the two WGSL shader sources read at startup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShaderPaths {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
}

impl Default for ShaderPaths {
    fn default() -> Self {
        Self {
            vertex: PathBuf::from("assets/shaders/box.vert.wgsl"),
            fragment: PathBuf::from("assets/shaders/box.frag.wgsl"),
        }
    }
}
