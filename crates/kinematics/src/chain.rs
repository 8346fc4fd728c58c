use armview_common::{BoxDimensions, DrawCommand, Joint, JointAngles, VertexRange};
use glam::{Mat4, Vec3};

/// Rotation axis of a revolute joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// World/local Y.
    Vertical,
    /// Local Z; swings a link sideways in the arm's plane.
    Lateral,
}

impl Axis {
    pub fn rotation(self, degrees: f32) -> Mat4 {
        let radians = degrees.to_radians();
        match self {
            Axis::Vertical => Mat4::from_rotation_y(radians),
            Axis::Lateral => Mat4::from_rotation_z(radians),
        }
    }
}

/// A rotation driven by one joint angle.
///
/// The applied angle is `bias + angles[joint]`, negated when `mirrored`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointDrive {
    pub joint: Joint,
    pub axis: Axis,
    pub bias: f32,
    pub mirrored: bool,
}

impl JointDrive {
    pub fn new(joint: Joint, axis: Axis) -> Self {
        Self {
            joint,
            axis,
            bias: 0.0,
            mirrored: false,
        }
    }

    pub fn with_bias(mut self, bias: f32) -> Self {
        self.bias = bias;
        self
    }

    pub fn mirrored(mut self) -> Self {
        self.mirrored = true;
        self
    }

    /// Applied angle in degrees.
    pub fn angle(&self, angles: &JointAngles) -> f32 {
        let angle = self.bias + angles.get(self.joint);
        if self.mirrored { -angle } else { angle }
    }
}

/// A rendered rigid link: which output slot it fills and its extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkShape {
    pub slot: usize,
    pub dims: BoxDimensions,
}

/// One node of the joint hierarchy.
///
/// Local transform is `translate(offset) * rotate(drive) * translate(lift)`.
/// Children are evaluated against this node's accumulated transform, so
/// siblings fork from the same pivot instead of chaining into each other.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainNode {
    pub name: &'static str,
    pub offset: Vec3,
    pub drive: Option<JointDrive>,
    pub lift: Vec3,
    pub shape: Option<LinkShape>,
    pub children: Vec<ChainNode>,
}

impl ChainNode {
    /// A pivot that only translates and draws nothing.
    pub fn pivot(name: &'static str, offset: Vec3) -> Self {
        Self {
            name,
            offset,
            drive: None,
            lift: Vec3::ZERO,
            shape: None,
            children: Vec::new(),
        }
    }

    pub fn driven_by(mut self, drive: JointDrive) -> Self {
        self.drive = Some(drive);
        self
    }

    pub fn lifted(mut self, lift: Vec3) -> Self {
        self.lift = lift;
        self
    }

    pub fn drawn(mut self, slot: usize, dims: BoxDimensions) -> Self {
        self.shape = Some(LinkShape { slot, dims });
        self
    }

    pub fn with_child(mut self, child: ChainNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn local_transform(&self, angles: &JointAngles) -> Mat4 {
        let rotation = self
            .drive
            .map_or(Mat4::IDENTITY, |d| d.axis.rotation(d.angle(angles)));
        Mat4::from_translation(self.offset) * rotation * Mat4::from_translation(self.lift)
    }

    /// Number of drawn links in this subtree.
    pub fn link_count(&self) -> usize {
        usize::from(self.shape.is_some())
            + self.children.iter().map(ChainNode::link_count).sum::<usize>()
    }

    /// Evaluate this subtree under `parent`, writing each drawn link into its slot.
    ///
    /// Returns this node's accumulated transform. Slots outside `out` are skipped.
    pub fn evaluate(
        &self,
        parent: Mat4,
        angles: &JointAngles,
        range: VertexRange,
        out: &mut [DrawCommand],
    ) -> Mat4 {
        let world = parent * self.local_transform(angles);
        if let Some(shape) = self.shape {
            match out.get_mut(shape.slot) {
                Some(cmd) => {
                    *cmd = DrawCommand {
                        model: world,
                        dims: shape.dims,
                        range,
                    }
                }
                None => tracing::warn!(
                    "link {} targets slot {} beyond {} outputs",
                    self.name,
                    shape.slot,
                    out.len()
                ),
            }
        }
        for child in &self.children {
            child.evaluate(world, angles, range, out);
        }
        world
    }

    /// Depth-first search by node name.
    pub fn find(&self, name: &str) -> Option<&ChainNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }
}
