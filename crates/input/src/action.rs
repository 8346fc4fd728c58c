use armview_common::Joint;

/// A high-level change that a slider, pointer or CLI flag can produce.
///
/// Input handlers never touch scene state directly; they publish commands and
/// the frame loop applies them at the start of the next frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArmCommand {
    /// Set one joint to an absolute angle in degrees.
    SetJoint { joint: Joint, degrees: f32 },
    /// Orbit the camera by a pointer delta in pixels.
    Orbit { dx: f32, dy: f32 },
    /// Zoom the camera; positive moves toward the target.
    Zoom(f32),
    /// Restore the configured starting pose.
    ResetPose,
    /// Restore the configured starting camera.
    ResetCamera,
}

impl ArmCommand {
    /// Non-finite payloads would poison the pose or camera for every later frame.
    pub fn is_finite(&self) -> bool {
        match *self {
            ArmCommand::SetJoint { degrees, .. } => degrees.is_finite(),
            ArmCommand::Orbit { dx, dy } => dx.is_finite() && dy.is_finite(),
            ArmCommand::Zoom(amount) => amount.is_finite(),
            ArmCommand::ResetPose | ArmCommand::ResetCamera => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finite_payloads() {
        assert!(
            ArmCommand::SetJoint {
                joint: Joint::Base,
                degrees: 45.0
            }
            .is_finite()
        );
        assert!(ArmCommand::ResetPose.is_finite());
        assert!(!ArmCommand::Orbit { dx: f32::NAN, dy: 0.0 }.is_finite());
        assert!(!ArmCommand::Zoom(f32::INFINITY).is_finite());
    }
}
