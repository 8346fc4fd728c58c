use crate::action::ArmCommand;
use armview_common::{JointAngles, OrbitCamera};
use std::collections::VecDeque;

/// Commands published by input handlers, drained once per frame.
#[derive(Debug, Clone, Default)]
pub struct CommandQueue {
    pending: VecDeque<ArmCommand>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: ArmCommand) {
        self.pending.push_back(command);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = ArmCommand> + '_ {
        self.pending.drain(..)
    }
}

/// The mutable scene inputs the frame loop samples: pose and camera.
#[derive(Debug, Clone)]
pub struct SceneState {
    pub angles: JointAngles,
    pub camera: OrbitCamera,
    initial_angles: JointAngles,
    initial_camera: OrbitCamera,
    /// Radius change per zoom unit.
    pub zoom_step: f32,
}

impl SceneState {
    pub fn new(angles: JointAngles, camera: OrbitCamera) -> Self {
        Self {
            angles,
            initial_angles: angles,
            initial_camera: camera.clone(),
            camera,
            zoom_step: 1.0,
        }
    }

    pub fn with_zoom_step(mut self, step: f32) -> Self {
        self.zoom_step = step;
        self
    }

    /// Apply one command. Returns false if it was rejected.
    pub fn apply(&mut self, command: ArmCommand) -> bool {
        if !command.is_finite() {
            tracing::warn!("ignoring non-finite command {command:?}");
            return false;
        }
        match command {
            ArmCommand::SetJoint { joint, degrees } => self.angles.set(joint, degrees),
            ArmCommand::Orbit { dx, dy } => self.camera.drag(dx, dy),
            ArmCommand::Zoom(amount) => self.camera.zoom(amount * self.zoom_step),
            ArmCommand::ResetPose => self.angles = self.initial_angles,
            ArmCommand::ResetCamera => self.camera = self.initial_camera.clone(),
        }
        true
    }

    /// Apply everything queued since the last frame, in publish order.
    /// Returns the number of commands applied.
    pub fn apply_pending(&mut self, queue: &mut CommandQueue) -> usize {
        let mut applied = 0;
        for command in queue.drain() {
            if self.apply(command) {
                applied += 1;
            }
        }
        if applied > 0 {
            tracing::debug!("applied {applied} input commands");
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use armview_common::Joint;

    fn state() -> SceneState {
        SceneState::new(JointAngles::new(0.0, 0.0, 0.0, 15.0), OrbitCamera::default())
    }

    #[test]
    fn set_joint_changes_only_that_joint() {
        let mut s = state();
        assert!(s.apply(ArmCommand::SetJoint {
            joint: Joint::LowerArm,
            degrees: -42.0
        }));
        assert_eq!(s.angles, JointAngles::new(0.0, 0.0, -42.0, 15.0));
    }

    #[test]
    fn last_writer_wins_within_a_frame() {
        let mut s = state();
        let mut queue = CommandQueue::new();
        for degrees in [10.0, 20.0, 30.0] {
            queue.push(ArmCommand::SetJoint {
                joint: Joint::Base,
                degrees,
            });
        }
        assert_eq!(s.apply_pending(&mut queue), 3);
        assert!(queue.is_empty());
        assert_eq!(s.angles.base, 30.0);
    }

    #[test]
    fn non_finite_commands_are_rejected() {
        let mut s = state();
        let mut queue = CommandQueue::new();
        queue.push(ArmCommand::SetJoint {
            joint: Joint::Gripper,
            degrees: f32::NAN,
        });
        queue.push(ArmCommand::Orbit {
            dx: f32::INFINITY,
            dy: 0.0,
        });
        assert_eq!(queue.len(), 2);
        assert_eq!(s.apply_pending(&mut queue), 0);
        assert_eq!(s.angles.gripper, 15.0);
        assert_eq!(s.camera, OrbitCamera::default());
    }

    #[test]
    fn orbit_and_zoom_move_camera_then_reset() {
        let mut s = state().with_zoom_step(2.0);
        s.apply(ArmCommand::Orbit { dx: 30.0, dy: -10.0 });
        s.apply(ArmCommand::Zoom(1.5));
        assert!(s.camera.yaw > 0.0);
        assert!(s.camera.pitch() > 0.0);
        assert_eq!(s.camera.radius(), OrbitCamera::default().radius() - 3.0);

        s.apply(ArmCommand::ResetCamera);
        assert_eq!(s.camera, OrbitCamera::default());
    }

    #[test]
    fn reset_pose_restores_initial_angles() {
        let mut s = state();
        s.apply(ArmCommand::SetJoint {
            joint: Joint::UpperArm,
            degrees: 70.0,
        });
        s.apply(ArmCommand::ResetPose);
        assert_eq!(s.angles, JointAngles::new(0.0, 0.0, 0.0, 15.0));
    }
}
