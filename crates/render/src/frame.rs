use crate::mesh::{GRAY_SHADES, MeshBuilder, WARM_SHADES};
use crate::renderer::Renderer;
use armview_common::{DrawCommand, JointAngles, OrbitCamera};
use armview_kinematics::{ArmRig, Scene, StaticProp};
use glam::Mat4;

/// Pack the arm cube (and the prop cube when wanted) into one mesh and build
/// the scene that samples it.
pub fn build_scene(show_prop: bool) -> (Scene, MeshBuilder) {
    let mut mesh = MeshBuilder::new();
    let arm_range = mesh.push_cube(&GRAY_SHADES);
    let mut scene = Scene::new(ArmRig::new(arm_range));
    if show_prop {
        let prop_range = mesh.push_cube(&WARM_SHADES);
        scene = scene.with_prop(StaticProp::cube_beside_arm(prop_range));
    }
    (scene, mesh)
}

/// Per-frame counters for instrumentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub frame: u64,
    pub draws: usize,
}

/// Drives one frame: camera view, begin, evaluate, submit in order.
///
/// Scheduling the next frame is the host's job (a redraw request).
#[derive(Debug)]
pub struct FrameLoop {
    projection: Mat4,
    commands: Vec<DrawCommand>,
    frame: u64,
}

impl FrameLoop {
    pub fn new(projection: Mat4) -> Self {
        Self {
            projection,
            commands: Vec::new(),
            frame: 0,
        }
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn set_projection(&mut self, projection: Mat4) {
        self.projection = projection;
    }

    /// Commands submitted by the most recent frame.
    pub fn last_commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn run_frame<R: Renderer + ?Sized>(
        &mut self,
        renderer: &mut R,
        scene: &Scene,
        angles: &JointAngles,
        camera: &OrbitCamera,
    ) -> FrameStats {
        let view = camera.view_matrix();
        renderer.begin_frame(self.projection, view);

        scene.draw_list(angles, &mut self.commands);
        for cmd in &self.commands {
            renderer.draw_box(cmd.model, cmd.dims, cmd.range);
        }

        self.frame += 1;
        tracing::trace!(frame = self.frame, draws = self.commands.len(), "frame submitted");
        FrameStats {
            frame: self.frame,
            draws: self.commands.len(),
        }
    }
}
