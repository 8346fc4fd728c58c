use crate::chain::{Axis, ChainNode, JointDrive};
use armview_common::{BoxDimensions, DrawCommand, Joint, JointAngles, VertexRange};
use glam::{Mat4, Vec3};

/// Drops the whole arm so it sits centered in the default view volume.
pub const ROOT_OFFSET: Vec3 = Vec3::new(0.0, -6.5, 0.0);

pub const BASE_DIMS: BoxDimensions = BoxDimensions::new(5.5, 2.8, 3.5);
/// Shared by the upper and lower arm.
pub const ARM_DIMS: BoxDimensions = BoxDimensions::new(0.7, 4.2, 0.7);
pub const GRIP_DIMS: BoxDimensions = BoxDimensions::new(0.35, 2.0, 0.35);

/// Lateral distance of each finger hinge from the gripper pivot.
pub const GRIPPER_SPREAD: f32 = 0.55;
/// Finger opening (degrees) at a gripper angle of zero.
pub const GRIPPER_V_ANGLE: f32 = 25.0;

pub const ARM_LINK_COUNT: usize = 5;

/// Drawn links in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArmLink {
    Base = 0,
    UpperArm = 1,
    LowerArm = 2,
    LeftFinger = 3,
    RightFinger = 4,
}

impl ArmLink {
    pub const ALL: [ArmLink; ARM_LINK_COUNT] = [
        ArmLink::Base,
        ArmLink::UpperArm,
        ArmLink::LowerArm,
        ArmLink::LeftFinger,
        ArmLink::RightFinger,
    ];

    pub fn slot(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            ArmLink::Base => "base",
            ArmLink::UpperArm => "upper_arm",
            ArmLink::LowerArm => "lower_arm",
            ArmLink::LeftFinger => "left_finger",
            ArmLink::RightFinger => "right_finger",
        }
    }
}

/// Name of the undrawn node both fingers hang from.
pub const GRIPPER_PIVOT: &str = "gripper_pivot";

/// Build the arm's joint hierarchy.
pub fn arm_hierarchy() -> ChainNode {
    let finger = |link: ArmLink, spread: f32, drive: JointDrive| {
        ChainNode::pivot(link.name(), Vec3::new(spread, 0.0, 0.0))
            .driven_by(drive)
            .lifted(Vec3::new(0.0, GRIP_DIMS.height / 2.0, 0.0))
            .drawn(link.slot(), GRIP_DIMS)
    };
    let grip = JointDrive::new(Joint::Gripper, Axis::Lateral).with_bias(GRIPPER_V_ANGLE);

    let pivot = ChainNode::pivot(GRIPPER_PIVOT, Vec3::new(0.0, ARM_DIMS.height, 0.0))
        .with_child(finger(ArmLink::LeftFinger, GRIPPER_SPREAD, grip))
        .with_child(finger(ArmLink::RightFinger, -GRIPPER_SPREAD, grip.mirrored()));

    let lower = ChainNode::pivot(ArmLink::LowerArm.name(), Vec3::new(0.0, ARM_DIMS.height, 0.0))
        .driven_by(JointDrive::new(Joint::LowerArm, Axis::Lateral))
        .drawn(ArmLink::LowerArm.slot(), ARM_DIMS)
        .with_child(pivot);

    let upper = ChainNode::pivot(ArmLink::UpperArm.name(), Vec3::new(0.0, BASE_DIMS.height, 0.0))
        .driven_by(JointDrive::new(Joint::UpperArm, Axis::Lateral))
        .drawn(ArmLink::UpperArm.slot(), ARM_DIMS)
        .with_child(lower);

    let base = ChainNode::pivot(ArmLink::Base.name(), Vec3::ZERO)
        .driven_by(JointDrive::new(Joint::Base, Axis::Vertical))
        .drawn(ArmLink::Base.slot(), BASE_DIMS)
        .with_child(upper);

    ChainNode::pivot("root", ROOT_OFFSET).with_child(base)
}

/// The articulated arm: its hierarchy plus the mesh range every link samples.
#[derive(Debug, Clone, PartialEq)]
pub struct ArmRig {
    root: ChainNode,
    range: VertexRange,
}

impl Default for ArmRig {
    fn default() -> Self {
        Self::new(VertexRange::UNIT_CUBE)
    }
}

impl ArmRig {
    pub fn new(range: VertexRange) -> Self {
        Self {
            root: arm_hierarchy(),
            range,
        }
    }

    pub fn hierarchy(&self) -> &ChainNode {
        &self.root
    }

    pub fn range(&self) -> VertexRange {
        self.range
    }

    /// Turn a joint-angle vector into the five link draws, always in
    /// base, upper arm, lower arm, left finger, right finger order.
    ///
    /// Total over all inputs; non-finite angles propagate into the matrices.
    pub fn evaluate(&self, angles: &JointAngles) -> [DrawCommand; ARM_LINK_COUNT] {
        let mut out = [DrawCommand::default(); ARM_LINK_COUNT];
        self.root.evaluate(Mat4::IDENTITY, angles, self.range, &mut out);
        out
    }

    /// Accumulated transform of the shared gripper pivot, if the hierarchy has one.
    pub fn gripper_pivot(&self, angles: &JointAngles) -> Option<Mat4> {
        let node = self.root.find(GRIPPER_PIVOT)?;
        let lower = self.evaluate(angles)[ArmLink::LowerArm.slot()].model;
        Some(lower * node.local_transform(angles))
    }
}

/// Evaluate the default arm rig sampling the unit cube range.
pub fn evaluate(angles: &JointAngles) -> [DrawCommand; ARM_LINK_COUNT] {
    ArmRig::default().evaluate(angles)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn t(x: f32, y: f32, z: f32) -> Mat4 {
        Mat4::from_translation(Vec3::new(x, y, z))
    }

    fn rz(deg: f32) -> Mat4 {
        Mat4::from_rotation_z(deg.to_radians())
    }

    #[test]
    fn always_five_commands_in_fixed_order() {
        let rig = ArmRig::default();
        for angles in [
            JointAngles::default(),
            JointAngles::new(45.0, -30.0, 120.0, -80.0),
            JointAngles::new(1.0e5, -1.0e5, 360.0, 720.0),
        ] {
            let cmds = rig.evaluate(&angles);
            assert_eq!(cmds.len(), ARM_LINK_COUNT);
            let dims: Vec<_> = cmds.iter().map(|c| c.dims).collect();
            assert_eq!(dims, vec![BASE_DIMS, ARM_DIMS, ARM_DIMS, GRIP_DIMS, GRIP_DIMS]);
        }
        assert_eq!(rig.hierarchy().link_count(), ARM_LINK_COUNT);
    }

    #[test]
    fn zero_pose_matches_hand_composed_chain() {
        let cmds = evaluate(&JointAngles::default());

        let base = t(0.0, -6.5, 0.0);
        let upper = base * t(0.0, BASE_DIMS.height, 0.0);
        let lower = upper * t(0.0, ARM_DIMS.height, 0.0);
        let joint = lower * t(0.0, ARM_DIMS.height, 0.0);
        let left = joint
            * t(GRIPPER_SPREAD, 0.0, 0.0)
            * rz(GRIPPER_V_ANGLE)
            * t(0.0, GRIP_DIMS.height / 2.0, 0.0);
        let right = joint
            * t(-GRIPPER_SPREAD, 0.0, 0.0)
            * rz(-GRIPPER_V_ANGLE)
            * t(0.0, GRIP_DIMS.height / 2.0, 0.0);

        assert!(cmds[0].model.abs_diff_eq(base, EPS));
        assert!(cmds[1].model.abs_diff_eq(upper, EPS));
        assert!(cmds[2].model.abs_diff_eq(lower, EPS));
        assert!(cmds[3].model.abs_diff_eq(left, EPS));
        assert!(cmds[4].model.abs_diff_eq(right, EPS));
        assert!(cmds.iter().all(|c| c.range == VertexRange::UNIT_CUBE));
    }

    #[test]
    fn fingers_are_mirror_images_for_any_gripper_angle() {
        for g in [-60.0, -25.0, 0.0, 10.0, 33.3, 90.0] {
            let angles = JointAngles::new(20.0, 15.0, -40.0, g);
            let cmds = evaluate(&angles);
            let rig = ArmRig::default();
            let joint = rig.gripper_pivot(&angles).unwrap();

            let left_local = joint.inverse() * cmds[ArmLink::LeftFinger.slot()].model;
            let right_local = joint.inverse() * cmds[ArmLink::RightFinger.slot()].model;

            let expected_left = t(GRIPPER_SPREAD, 0.0, 0.0)
                * rz(GRIPPER_V_ANGLE + g)
                * t(0.0, GRIP_DIMS.height / 2.0, 0.0);
            let expected_right = t(-GRIPPER_SPREAD, 0.0, 0.0)
                * rz(-(GRIPPER_V_ANGLE + g))
                * t(0.0, GRIP_DIMS.height / 2.0, 0.0);
            assert!(left_local.abs_diff_eq(expected_left, EPS), "left at g={g}");
            assert!(right_local.abs_diff_eq(expected_right, EPS), "right at g={g}");

            // Rotation angle about Z read back from the local x axis.
            let left_angle = left_local.x_axis.y.atan2(left_local.x_axis.x);
            let right_angle = right_local.x_axis.y.atan2(right_local.x_axis.x);
            assert!((left_angle + right_angle).abs() < EPS);
        }
    }

    #[test]
    fn base_rotation_is_a_prefix_for_every_descendant() {
        let rest = evaluate(&JointAngles::new(0.0, 0.0, 0.0, 0.0));
        let turned = evaluate(&JointAngles::new(90.0, 0.0, 0.0, 0.0));
        let root = t(0.0, -6.5, 0.0);
        let ry = Mat4::from_rotation_y(90f32.to_radians());

        assert!(turned[0].model.abs_diff_eq(root * ry, EPS));
        for (a, b) in rest.iter().zip(turned.iter()) {
            // turned = root * Ry * (root^-1 * rest)
            let expected = root * ry * root.inverse() * a.model;
            assert!(b.model.abs_diff_eq(expected, EPS));
            assert_eq!(a.dims, b.dims);
        }
    }

    #[test]
    fn upper_arm_rotation_moves_lower_arm_origin() {
        let cmds = evaluate(&JointAngles::new(0.0, 90.0, 0.0, 0.0));
        let origin = cmds[ArmLink::LowerArm.slot()].model.transform_point3(Vec3::ZERO);
        // Upper arm swings toward -X, so its tip sits ARM height to the left of its hinge.
        let hinge_y = ROOT_OFFSET.y + BASE_DIMS.height;
        assert!(origin.abs_diff_eq(Vec3::new(-ARM_DIMS.height, hinge_y, 0.0), EPS));
    }

    #[test]
    fn non_finite_angles_propagate_without_panicking() {
        let cmds = evaluate(&JointAngles::new(f32::NAN, 0.0, 0.0, f32::INFINITY));
        assert!(cmds[0].model.is_nan());
        assert_eq!(cmds.len(), ARM_LINK_COUNT);
    }

    #[test]
    fn gripper_pivot_sits_at_lower_arm_tip() {
        let angles = JointAngles::new(30.0, -20.0, 45.0, 10.0);
        let rig = ArmRig::default();
        let lower = rig.evaluate(&angles)[ArmLink::LowerArm.slot()].model;
        let pivot = rig.gripper_pivot(&angles).unwrap();
        assert!(pivot.abs_diff_eq(lower * t(0.0, ARM_DIMS.height, 0.0), EPS));
    }

    #[test]
    fn gripper_pivot_is_none_without_pivot_node() {
        let rig = ArmRig {
            root: ChainNode::pivot("root", ROOT_OFFSET),
            range: VertexRange::UNIT_CUBE,
        };
        assert!(rig.gripper_pivot(&JointAngles::default()).is_none());
    }

    #[test]
    fn custom_range_is_carried_by_every_link() {
        let range = VertexRange::new(36, 36);
        let cmds = ArmRig::new(range).evaluate(&JointAngles::default());
        assert!(cmds.iter().all(|c| c.range == range));
    }
}
