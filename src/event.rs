//! Pointer input delivered by a host to the player.

/// Horizontal extent of a control in client coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrackRect {
    pub left: f64,
    pub width: f64,
}

impl TrackRect {
    pub fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    /// Fraction of the track under `pointer_x`, clamped to `[0, 1]`.
    /// `None` when the track has no usable width.
    pub fn fraction_at(&self, pointer_x: f64) -> Option<f64> {
        if !(self.width > 0.0) || !pointer_x.is_finite() || !self.left.is_finite() {
            return None;
        }
        Some(((pointer_x - self.left) / self.width).clamp(0.0, 1.0))
    }
}

/// Controls that accept pointer gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    SeekTrack,
    VolumeSlider,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
    Click,
}

/// A pointer event in client space.
///
/// `target` names the control the event originated on together with its
/// bounding rect. Moves and ups are document-level and usually carry none.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub x: f64,
    pub target: Option<(Control, TrackRect)>,
}

impl PointerEvent {
    pub fn down(x: f64, control: Control, rect: TrackRect) -> Self {
        Self { kind: PointerKind::Down, x, target: Some((control, rect)) }
    }

    pub fn click(x: f64, control: Control, rect: TrackRect) -> Self {
        Self { kind: PointerKind::Click, x, target: Some((control, rect)) }
    }

    pub fn moved(x: f64) -> Self {
        Self { kind: PointerKind::Move, x, target: None }
    }

    pub fn up(x: f64) -> Self {
        Self { kind: PointerKind::Up, x, target: None }
    }
}
