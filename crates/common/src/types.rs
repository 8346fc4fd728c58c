use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// One of the four independently driven joints of the arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    Base,
    UpperArm,
    LowerArm,
    Gripper,
}

impl Joint {
    pub const ALL: [Joint; 4] = [Joint::Base, Joint::UpperArm, Joint::LowerArm, Joint::Gripper];

    /// Human-readable label used by sliders and CLI output.
    pub fn label(self) -> &'static str {
        match self {
            Joint::Base => "Base",
            Joint::UpperArm => "Upper arm",
            Joint::LowerArm => "Lower arm",
            Joint::Gripper => "Gripper",
        }
    }
}

/// Joint angles in degrees. Entries are independent; any real value is accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JointAngles {
    pub base: f32,
    pub upper_arm: f32,
    pub lower_arm: f32,
    pub gripper: f32,
}

impl JointAngles {
    pub fn new(base: f32, upper_arm: f32, lower_arm: f32, gripper: f32) -> Self {
        Self {
            base,
            upper_arm,
            lower_arm,
            gripper,
        }
    }

    pub fn get(&self, joint: Joint) -> f32 {
        match joint {
            Joint::Base => self.base,
            Joint::UpperArm => self.upper_arm,
            Joint::LowerArm => self.lower_arm,
            Joint::Gripper => self.gripper,
        }
    }

    pub fn set(&mut self, joint: Joint, degrees: f32) {
        let slot = match joint {
            Joint::Base => &mut self.base,
            Joint::UpperArm => &mut self.upper_arm,
            Joint::LowerArm => &mut self.lower_arm,
            Joint::Gripper => &mut self.gripper,
        };
        *slot = degrees;
    }
}

/// Extent of one rigid link. The local origin sits at the center of the bottom face.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxDimensions {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl BoxDimensions {
    pub const fn new(width: f32, height: f32, depth: f32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    pub const fn cube(side: f32) -> Self {
        Self::new(side, side, side)
    }

    pub fn as_vec3(&self) -> Vec3 {
        Vec3::new(self.width, self.height, self.depth)
    }
}

/// Sub-range of the shared vertex buffer sampled by one draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexRange {
    pub offset: u32,
    pub count: u32,
}

impl VertexRange {
    /// 6 faces x 2 triangles x 3 vertices.
    pub const CUBE_VERTEX_COUNT: u32 = 36;

    /// The arm's cube, packed first in the shared buffer.
    pub const UNIT_CUBE: VertexRange = VertexRange {
        offset: 0,
        count: Self::CUBE_VERTEX_COUNT,
    };

    pub const fn new(offset: u32, count: u32) -> Self {
        Self { offset, count }
    }

    /// One past the last vertex, saturating so a corrupt range cannot wrap.
    pub fn end(&self) -> u32 {
        self.offset.saturating_add(self.count)
    }

    pub fn as_range(&self) -> std::ops::Range<u32> {
        self.offset..self.end()
    }
}

/// Everything needed to render one rigid link for a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrawCommand {
    pub model: Mat4,
    pub dims: BoxDimensions,
    pub range: VertexRange,
}

impl Default for DrawCommand {
    fn default() -> Self {
        Self {
            model: Mat4::IDENTITY,
            dims: BoxDimensions::cube(1.0),
            range: VertexRange::UNIT_CUBE,
        }
    }
}
