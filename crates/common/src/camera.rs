use glam::{Mat4, Vec3};
use std::f32::consts::FRAC_PI_2;

/// Pitch stays this far short of straight up/down so look-at never sees a
/// forward vector parallel to the up axis.
pub const PITCH_EPSILON: f32 = 0.01;

/// Pitch lies strictly inside `(-PITCH_BOUND, PITCH_BOUND)`.
pub const PITCH_BOUND: f32 = FRAC_PI_2 - PITCH_EPSILON;

/// Largest pitch magnitude the camera will hold; one margin inside the open bound.
pub const PITCH_LIMIT: f32 = PITCH_BOUND - 1.0e-5;

/// Orbit camera around a fixed target: yaw, pitch and radius in, view matrix out.
///
/// Purely positional state. There is no drag velocity or momentum; the view is
/// recomputed from `(yaw, pitch, radius)` every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    pub yaw: f32,
    pitch: f32,
    radius: f32,
    pub target: Vec3,
    pub sensitivity: f32,
    pub min_radius: f32,
    pub max_radius: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            radius: 20.0,
            target: Vec3::ZERO,
            sensitivity: 0.01,
            min_radius: 2.0,
            max_radius: 80.0,
        }
    }
}

impl OrbitCamera {
    /// Build a camera, clamping pitch into its limits and radius into `[min_radius, max_radius]`.
    pub fn new(yaw: f32, pitch: f32, radius: f32) -> Self {
        let mut cam = Self {
            yaw,
            ..Self::default()
        };
        cam.set_pitch(pitch);
        cam.set_radius(radius);
        cam
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        // NaN fails every comparison in clamp and would stick; fall back to level.
        self.pitch = if pitch.is_nan() {
            0.0
        } else {
            pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT)
        };
    }

    pub fn set_radius(&mut self, radius: f32) {
        let lo = self.min_radius.max(f32::EPSILON);
        let hi = self.max_radius.max(lo);
        self.radius = if radius.is_nan() { lo } else { radius.clamp(lo, hi) };
    }

    /// Apply a pointer-drag delta in pixels. Screen Y grows downward, so
    /// dragging down lowers the pitch.
    pub fn drag(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.set_pitch(self.pitch - dy * self.sensitivity);
    }

    /// Move toward (positive amount) or away from the target.
    pub fn zoom(&mut self, amount: f32) {
        self.set_radius(self.radius - amount);
    }

    pub fn eye(&self) -> Vec3 {
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        self.target
            + Vec3::new(
                self.radius * cos_pitch * sin_yaw,
                self.radius * sin_pitch,
                self.radius * cos_pitch * cos_yaw,
            )
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }
}
