//! Seek-bar interaction: pointer geometry to playback time, drag lifecycle,
//! and reconciliation with surface time updates.

use super::drag::{Axis, DragSubscription, PointerHub};
use crate::event::TrackRect;
use crate::media::MediaSurface;
use crate::state::PlaybackPosition;

/// Time under `pointer_x` on `track` for a clip of `duration` seconds.
///
/// `None` while the duration is unknown or not positive, or the track has no
/// width; callers treat that as a no-op.
pub fn time_from_pointer(pointer_x: f64, track: TrackRect, duration: Option<f64>) -> Option<f64> {
    let duration = duration.filter(|d| d.is_finite() && *d > 0.0)?;
    track.fraction_at(pointer_x).map(|fraction| fraction * duration)
}

#[derive(Debug)]
struct SeekDrag {
    _subscription: DragSubscription,
    track: TrackRect,
}

#[derive(Debug, Default)]
pub struct ScrubController {
    position: PlaybackPosition,
    drag: Option<SeekDrag>,
}

impl ScrubController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> PlaybackPosition {
        self.position
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Start a drag and seek to the pressed point. Ignored until the
    /// duration is known.
    pub fn pointer_down<S: MediaSurface>(
        &mut self,
        pointer_x: f64,
        track: TrackRect,
        surface: &mut S,
        hub: &PointerHub,
    ) {
        let Some(time) = time_from_pointer(pointer_x, track, self.position.duration) else {
            return;
        };
        // A stale drag (missed pointer-up) is replaced, releasing its listener.
        self.drag = Some(SeekDrag { _subscription: hub.subscribe(Axis::Seek), track });
        self.seek(time, surface);
    }

    pub fn pointer_move<S: MediaSurface>(&mut self, pointer_x: f64, surface: &mut S) {
        let Some(drag) = &self.drag else {
            return;
        };
        if let Some(time) = time_from_pointer(pointer_x, drag.track, self.position.duration) {
            self.seek(time, surface);
        }
    }

    pub fn pointer_up(&mut self) {
        self.drag = None;
    }

    /// Single-shot seek for a click that was not part of a drag.
    pub fn click<S: MediaSurface>(&mut self, pointer_x: f64, track: TrackRect, surface: &mut S) {
        if self.is_dragging() {
            return;
        }
        if let Some(time) = time_from_pointer(pointer_x, track, self.position.duration) {
            self.seek(time, surface);
        }
    }

    /// Relative seek from the displayed position, clamped to the clip.
    pub fn seek_by<S: MediaSurface>(&mut self, delta: f64, surface: &mut S) {
        if self.is_dragging() || !delta.is_finite() {
            return;
        }
        let Some(duration) = self.position.seekable_duration() else {
            return;
        };
        let target = (self.position.current_time + delta).clamp(0.0, duration);
        self.seek(target, surface);
    }

    pub fn accept_duration(&mut self, reported: f64) -> bool {
        self.position.accept_duration(reported)
    }

    /// Apply a surface-reported time unless a drag owns the playhead.
    pub fn time_update(&mut self, reported: f64) -> bool {
        if self.is_dragging() || !reported.is_finite() {
            return false;
        }
        let changed = self.position.current_time != reported;
        self.position.current_time = reported;
        changed
    }

    // Mirror immediately instead of waiting for the surface's time update.
    fn seek<S: MediaSurface>(&mut self, time: f64, surface: &mut S) {
        surface.set_current_time(time);
        self.position.current_time = time;
    }
}
