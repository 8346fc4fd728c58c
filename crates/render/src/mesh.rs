use armview_common::VertexRange;

/// Homogeneous position or RGBA color, laid out for direct upload.
pub type Vec4Data = [f32; 4];

/// Corners of a unit cube centered on the origin.
const CORNERS: [Vec4Data; 8] = [
    [-0.5, -0.5, 0.5, 1.0],
    [-0.5, 0.5, 0.5, 1.0],
    [0.5, 0.5, 0.5, 1.0],
    [0.5, -0.5, 0.5, 1.0],
    [-0.5, -0.5, -0.5, 1.0],
    [-0.5, 0.5, -0.5, 1.0],
    [0.5, 0.5, -0.5, 1.0],
    [0.5, -0.5, -0.5, 1.0],
];

/// Corner indices per face; each quad splits into (a, b, c) and (a, c, d).
const FACES: [[usize; 4]; 6] = [
    [1, 0, 3, 2], // +Z
    [2, 3, 7, 6], // +X
    [3, 0, 4, 7], // -Y
    [6, 5, 1, 2], // +Y
    [4, 5, 6, 7], // -Z
    [5, 4, 0, 1], // -X
];

/// One flat shade per face, in [`FACES`] order. Slightly different grays read as 3D.
pub const GRAY_SHADES: [Vec4Data; 6] = [
    [0.8, 0.8, 0.8, 1.0],
    [0.68, 0.68, 0.68, 1.0],
    [0.58, 0.58, 0.58, 1.0],
    [0.88, 0.88, 0.88, 1.0],
    [0.62, 0.62, 0.62, 1.0],
    [0.74, 0.74, 0.74, 1.0],
];

/// Palette for the static prop so it stands apart from the arm.
pub const WARM_SHADES: [Vec4Data; 6] = [
    [0.9, 0.62, 0.35, 1.0],
    [0.78, 0.52, 0.28, 1.0],
    [0.66, 0.44, 0.24, 1.0],
    [0.96, 0.7, 0.42, 1.0],
    [0.72, 0.48, 0.26, 1.0],
    [0.84, 0.57, 0.31, 1.0],
];

/// Append a flat-shaded unit cube: 36 vertices and 36 matching colors.
///
/// Append-only. Calling twice on the same containers yields two cubes.
pub fn append_cube(positions: &mut Vec<Vec4Data>, colors: &mut Vec<Vec4Data>, shades: &[Vec4Data; 6]) {
    for (face, shade) in FACES.iter().zip(shades) {
        let [a, b, c, d] = *face;
        for corner in [a, b, c, a, c, d] {
            positions.push(CORNERS[corner]);
            colors.push(*shade);
        }
    }
}

/// Append the arm's gray cube.
pub fn build_colored_cube(positions: &mut Vec<Vec4Data>, colors: &mut Vec<Vec4Data>) {
    append_cube(positions, colors, &GRAY_SHADES);
}

/// CPU-side vertex data for the shared buffers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<Vec4Data>,
    pub colors: Vec<Vec4Data>,
}

impl MeshData {
    pub fn vertex_count(&self) -> u32 {
        self.positions.len() as u32
    }
}

/// Packs several objects into one position/color buffer pair and hands back
/// each object's vertex range.
#[derive(Debug, Default)]
pub struct MeshBuilder {
    data: MeshData,
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a cube with the given face shades and return where it landed.
    pub fn push_cube(&mut self, shades: &[Vec4Data; 6]) -> VertexRange {
        let offset = self.data.vertex_count();
        append_cube(&mut self.data.positions, &mut self.data.colors, shades);
        let range = VertexRange::new(offset, self.data.vertex_count() - offset);
        tracing::debug!("packed cube at {}..{}", range.offset, range.end());
        range
    }

    pub fn vertex_count(&self) -> u32 {
        self.data.vertex_count()
    }

    pub fn finish(self) -> MeshData {
        self.data
    }
}
