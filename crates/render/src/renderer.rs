use crate::compose::box_model_view;
use armview_common::{BoxDimensions, VertexRange};
use glam::Mat4;

/// Backend-agnostic draw interface. All renderers implement this trait.
///
/// A frame is one `begin_frame` followed by any number of `draw_box` calls.
/// Implementations sample the shared mesh but never modify it.
pub trait Renderer {
    /// Clear the target, upload the projection and remember the view for this frame.
    fn begin_frame(&mut self, projection: Mat4, view: Mat4);

    /// Draw the vertex range `range` of the shared mesh as a base-centered box.
    fn draw_box(&mut self, model: Mat4, dims: BoxDimensions, range: VertexRange);
}

/// One draw as the GPU would see it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordedDraw {
    pub model_view: Mat4,
    pub range: VertexRange,
}

/// Records draws instead of rasterizing them.
///
/// Produces a human-readable report of the last frame. Used by the CLI and by
/// tests that need to see exactly what a frame submitted.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    projection: Mat4,
    view: Mat4,
    draws: Vec<RecordedDraw>,
    frames: u64,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    /// Draws of the current frame, in submission order.
    pub fn draws(&self) -> &[RecordedDraw] {
        &self.draws
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn report(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Frame {} ({} draws) ===\n",
            self.frames,
            self.draws.len()
        ));
        for (i, draw) in self.draws.iter().enumerate() {
            let origin = draw.model_view.w_axis;
            out.push_str(&format!(
                "  [{i}] vertices {}..{} origin_view=({:.2}, {:.2}, {:.2})\n",
                draw.range.offset,
                draw.range.end(),
                origin.x,
                origin.y,
                origin.z
            ));
        }
        out
    }
}

impl Renderer for DebugTextRenderer {
    fn begin_frame(&mut self, projection: Mat4, view: Mat4) {
        self.projection = projection;
        self.view = view;
        self.draws.clear();
        self.frames += 1;
    }

    fn draw_box(&mut self, model: Mat4, dims: BoxDimensions, range: VertexRange) {
        self.draws.push(RecordedDraw {
            model_view: box_model_view(self.view, model, dims),
            range,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn begin_frame_clears_previous_draws() {
        let mut renderer = DebugTextRenderer::new();
        renderer.begin_frame(Mat4::IDENTITY, Mat4::IDENTITY);
        renderer.draw_box(Mat4::IDENTITY, BoxDimensions::cube(1.0), VertexRange::UNIT_CUBE);
        renderer.begin_frame(Mat4::IDENTITY, Mat4::IDENTITY);
        assert!(renderer.draws().is_empty());
        assert_eq!(renderer.frames(), 2);
    }

    #[test]
    fn draw_uses_view_of_current_frame() {
        let mut renderer = DebugTextRenderer::new();
        let view = Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0));
        renderer.begin_frame(Mat4::IDENTITY, view);
        renderer.draw_box(Mat4::IDENTITY, BoxDimensions::cube(2.0), VertexRange::new(36, 36));

        let draw = renderer.draws()[0];
        assert_eq!(draw.range, VertexRange::new(36, 36));
        assert!(draw.model_view.w_axis.truncate().abs_diff_eq(Vec3::new(0.0, 1.0, -5.0), 1e-6));
    }

    #[test]
    fn report_lists_every_draw() {
        let mut renderer = DebugTextRenderer::new();
        renderer.begin_frame(Mat4::IDENTITY, Mat4::IDENTITY);
        renderer.draw_box(Mat4::IDENTITY, BoxDimensions::cube(1.0), VertexRange::UNIT_CUBE);
        renderer.draw_box(Mat4::IDENTITY, BoxDimensions::cube(1.0), VertexRange::new(36, 36));
        let report = renderer.report();
        assert!(report.contains("Frame 1 (2 draws)"));
        assert!(report.contains("vertices 36..72"));
    }
}
