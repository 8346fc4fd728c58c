use crate::arm::{ARM_LINK_COUNT, ArmRig, ROOT_OFFSET};
use armview_common::{BoxDimensions, DrawCommand, JointAngles, VertexRange};
use glam::{Mat4, Vec3};

/// Anything that contributes draw commands to a frame.
pub trait DrawSource {
    /// Append this source's commands for the current pose.
    fn append_draws(&self, angles: &JointAngles, out: &mut Vec<DrawCommand>);
}

impl DrawSource for ArmRig {
    fn append_draws(&self, angles: &JointAngles, out: &mut Vec<DrawCommand>) {
        out.extend(self.evaluate(angles));
    }
}

/// A box that never moves, independent of the joint angles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticProp {
    pub model: Mat4,
    pub dims: BoxDimensions,
    pub range: VertexRange,
}

impl StaticProp {
    pub const CUBE_DIMS: BoxDimensions = BoxDimensions::cube(2.5);

    /// The reference cube standing on the arm's floor, off to its right.
    pub fn cube_beside_arm(range: VertexRange) -> Self {
        Self {
            model: Mat4::from_translation(Vec3::new(10.0, ROOT_OFFSET.y, 0.0)),
            dims: Self::CUBE_DIMS,
            range,
        }
    }
}

impl DrawSource for StaticProp {
    fn append_draws(&self, _angles: &JointAngles, out: &mut Vec<DrawCommand>) {
        out.push(DrawCommand {
            model: self.model,
            dims: self.dims,
            range: self.range,
        });
    }
}

/// The full scene: one arm followed by its static props.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    pub arm: ArmRig,
    pub props: Vec<StaticProp>,
}

impl Scene {
    pub fn new(arm: ArmRig) -> Self {
        Self {
            arm,
            props: Vec::new(),
        }
    }

    pub fn with_prop(mut self, prop: StaticProp) -> Self {
        self.props.push(prop);
        self
    }

    /// Commands per frame.
    pub fn draw_count(&self) -> usize {
        ARM_LINK_COUNT + self.props.len()
    }

    /// Rebuild `out` with this frame's commands: arm links first, then props.
    pub fn draw_list(&self, angles: &JointAngles, out: &mut Vec<DrawCommand>) {
        out.clear();
        out.reserve(self.draw_count());
        self.arm.append_draws(angles, out);
        for prop in &self.props {
            prop.append_draws(angles, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arm::{ArmLink, evaluate};

    #[test]
    fn draw_list_is_arm_then_props() {
        let prop_range = VertexRange::new(36, 36);
        let scene = Scene::default().with_prop(StaticProp::cube_beside_arm(prop_range));
        let angles = JointAngles::new(30.0, 10.0, -20.0, 5.0);

        let mut out = Vec::new();
        scene.draw_list(&angles, &mut out);

        assert_eq!(out.len(), 6);
        assert_eq!(scene.draw_count(), 6);
        assert_eq!(&out[..ARM_LINK_COUNT], &evaluate(&angles)[..]);
        assert_eq!(out[5].range, prop_range);
        assert_eq!(out[5].dims, StaticProp::CUBE_DIMS);
    }

    #[test]
    fn draw_list_is_rebuilt_each_frame() {
        let scene = Scene::default();
        let mut out = Vec::new();
        scene.draw_list(&JointAngles::default(), &mut out);
        scene.draw_list(&JointAngles::new(90.0, 0.0, 0.0, 0.0), &mut out);
        assert_eq!(out.len(), ARM_LINK_COUNT);
        assert_eq!(out[ArmLink::Base.slot()], evaluate(&JointAngles::new(90.0, 0.0, 0.0, 0.0))[0]);
    }

    #[test]
    fn prop_ignores_joint_angles() {
        let prop = StaticProp::cube_beside_arm(VertexRange::UNIT_CUBE);
        let mut a = Vec::new();
        let mut b = Vec::new();
        prop.append_draws(&JointAngles::default(), &mut a);
        prop.append_draws(&JointAngles::new(10.0, 20.0, 30.0, 40.0), &mut b);
        assert_eq!(a, b);
        assert_eq!(a[0].model.w_axis.truncate(), Vec3::new(10.0, -6.5, 0.0));
    }
}
