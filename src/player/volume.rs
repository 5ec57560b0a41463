//! Volume-slider interaction and the coupling between level and mute.

use super::drag::{Axis, DragSubscription, PointerHub};
use crate::event::TrackRect;
use crate::media::MediaSurface;

/// Level restored when unmuting out of silence.
pub const UNMUTE_LEVEL: f64 = 0.5;

/// Smallest change, in hundredths, a drag move must exceed to be applied.
const JITTER_STEPS: i64 = 1;

/// Volume as one tagged value, so "muted" and "audible at level 0" cannot
/// both be true.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Volume {
    /// Silent. `restore` is the level to return to on unmute (may be 0).
    Muted { restore: f64 },
    /// Audible at a level in `(0, 1]`.
    Level(f64),
}

impl Default for Volume {
    fn default() -> Self {
        Volume::Level(1.0)
    }
}

impl Volume {
    /// Volume after a user set `level`: zero mutes, anything else is audible.
    pub fn from_level(level: f64) -> Self {
        let level = sanitize_level(level);
        if level > 0.0 { Volume::Level(level) } else { Volume::Muted { restore: 0.0 } }
    }

    /// Reconcile a surface's independent level and mute flags.
    pub fn from_surface(level: f64, muted: bool) -> Self {
        let level = sanitize_level(level);
        if muted || level == 0.0 { Volume::Muted { restore: level } } else { Volume::Level(level) }
    }

    pub fn is_muted(self) -> bool {
        matches!(self, Volume::Muted { .. })
    }

    /// Level shown on the slider.
    pub fn displayed(self) -> f64 {
        match self {
            Volume::Muted { .. } => 0.0,
            Volume::Level(level) => level,
        }
    }

    /// Level kept for the surface, including while muted.
    pub fn stored(self) -> f64 {
        match self {
            Volume::Muted { restore } => restore,
            Volume::Level(level) => level,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Volume::Level(level) => Volume::Muted { restore: level },
            Volume::Muted { restore } if restore > 0.0 => Volume::Level(restore),
            Volume::Muted { .. } => Volume::Level(UNMUTE_LEVEL),
        }
    }
}

fn sanitize_level(level: f64) -> f64 {
    if level.is_finite() { level.clamp(0.0, 1.0) } else { 0.0 }
}

fn round_hundredths(level: f64) -> f64 {
    (level * 100.0).round() / 100.0
}

fn hundredths(level: f64) -> i64 {
    (level * 100.0).round() as i64
}

/// Slider fraction under `pointer_x`, rounded to two decimals.
/// Returns `previous` when the slider has no width.
pub fn volume_from_pointer(pointer_x: f64, slider: TrackRect, previous: f64) -> f64 {
    slider.fraction_at(pointer_x).map(round_hundredths).unwrap_or(previous)
}

#[derive(Debug)]
struct VolumeDrag {
    _subscription: DragSubscription,
    slider: TrackRect,
}

#[derive(Debug, Default)]
pub struct VolumeController {
    volume: Volume,
    drag: Option<VolumeDrag>,
}

impl VolumeController {
    pub fn new(volume: Volume) -> Self {
        Self { volume, drag: None }
    }

    pub fn volume(&self) -> Volume {
        self.volume
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Start a drag and apply the pressed level. A slider without width
    /// leaves volume and drag state untouched.
    pub fn pointer_down<S: MediaSurface>(
        &mut self,
        pointer_x: f64,
        slider: TrackRect,
        surface: &mut S,
        hub: &PointerHub,
    ) {
        if slider.fraction_at(pointer_x).is_none() {
            return;
        }
        self.drag = Some(VolumeDrag { _subscription: hub.subscribe(Axis::Volume), slider });
        let level = volume_from_pointer(pointer_x, slider, self.volume.displayed());
        self.apply(level, surface);
    }

    pub fn pointer_move<S: MediaSurface>(&mut self, pointer_x: f64, surface: &mut S) {
        let Some(drag) = &self.drag else {
            return;
        };
        let current = self.volume.displayed();
        let level = volume_from_pointer(pointer_x, drag.slider, current);
        if (hundredths(level) - hundredths(current)).abs() > JITTER_STEPS {
            self.apply(level, surface);
        }
    }

    pub fn pointer_up(&mut self) {
        self.drag = None;
    }

    pub fn click<S: MediaSurface>(&mut self, pointer_x: f64, slider: TrackRect, surface: &mut S) {
        if self.is_dragging() || slider.fraction_at(pointer_x).is_none() {
            return;
        }
        let level = volume_from_pointer(pointer_x, slider, self.volume.displayed());
        self.apply(level, surface);
    }

    /// Write `level` through to the surface, then couple the mute flag.
    pub fn apply<S: MediaSurface>(&mut self, level: f64, surface: &mut S) {
        let was_muted = self.volume.is_muted();
        self.volume = Volume::from_level(round_hundredths(sanitize_level(level)));
        surface.set_volume(self.volume.stored());
        if self.volume.is_muted() != was_muted {
            surface.set_muted(self.volume.is_muted());
        }
    }

    pub fn toggle_mute<S: MediaSurface>(&mut self, surface: &mut S) {
        let previous = self.volume;
        self.volume = previous.toggled();
        if self.volume.stored() != previous.stored() {
            surface.set_volume(self.volume.stored());
        }
        surface.set_muted(self.volume.is_muted());
    }
}
