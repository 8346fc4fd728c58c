use glam::Vec2;

/// Converts press/move/release/leave pointer events into drag deltas.
///
/// A drag is active only between a press and the next release or leave.
#[derive(Debug, Clone, Default)]
pub struct PointerDrag {
    last: Option<Vec2>,
    pressed: bool,
}

impl PointerDrag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.pressed
    }

    pub fn press(&mut self, x: f32, y: f32) {
        self.pressed = true;
        self.last = Some(Vec2::new(x, y));
    }

    /// Record a cursor move. Returns the delta since the last sample while dragging.
    pub fn moved(&mut self, x: f32, y: f32) -> Option<Vec2> {
        let pos = Vec2::new(x, y);
        let previous = self.last.replace(pos);
        if !self.pressed {
            return None;
        }
        previous.map(|p| pos - p).filter(|d| *d != Vec2::ZERO)
    }

    pub fn release(&mut self) {
        self.pressed = false;
    }

    /// Pointer left the surface: end the drag and forget the position.
    pub fn leave(&mut self) {
        self.pressed = false;
        self.last = None;
    }
}
