// state.rs: Displayed playback position and the render snapshot handed to hosts

use crate::text_utils::format_time;

/// Playback position as displayed by the player.
///
/// `duration` stays `None` until a surface reports a finite, non-negative value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlaybackPosition {
    pub current_time: f64,
    pub duration: Option<f64>,
}

impl PlaybackPosition {
    /// Accept a reported duration if it is usable. Returns true when the
    /// stored value changed.
    pub fn accept_duration(&mut self, reported: f64) -> bool {
        if !reported.is_finite() || reported < 0.0 {
            return false;
        }
        if self.duration == Some(reported) {
            return false;
        }
        self.duration = Some(reported);
        true
    }

    /// Duration usable for seeking, i.e. known and strictly positive.
    pub fn seekable_duration(&self) -> Option<f64> {
        self.duration.filter(|d| *d > 0.0)
    }

    pub fn progress_fraction(&self) -> f64 {
        match self.seekable_duration() {
            Some(d) if self.current_time.is_finite() => (self.current_time / d).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }
}

/// Everything a host needs to draw the player. Recomputed after every
/// transition; holds no references into the player.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerView {
    pub current_time_label: String,
    pub duration_label: String,
    pub progress_fraction: f64,
    pub volume_fraction: f64,
    pub is_playing: bool,
    pub is_muted: bool,
    pub show_toggle_pulse: bool,
    /// Whether the surface was last asked to play. Unlike `is_playing` this
    /// flips at request time, so the toggle pulse shows what was pressed.
    pub play_requested: bool,
}

impl PlayerView {
    pub fn new(
        position: PlaybackPosition,
        volume_fraction: f64,
        is_playing: bool,
        is_muted: bool,
        show_toggle_pulse: bool,
        play_requested: bool,
    ) -> Self {
        Self {
            current_time_label: format_time(position.current_time),
            duration_label: format_time(position.duration.unwrap_or(f64::NAN)),
            progress_fraction: position.progress_fraction(),
            volume_fraction,
            is_playing,
            is_muted,
            show_toggle_pulse,
            play_requested,
        }
    }

    /// One-line status used by pipe mode.
    pub fn status_line(&self) -> String {
        let glyph = if self.is_playing { "▶" } else { "⏸" };
        let volume = if self.is_muted {
            "muted".to_string()
        } else {
            format!("{:.0}%", self.volume_fraction * 100.0)
        };
        format!(
            "{} {} / {} vol {}",
            glyph, self.current_time_label, self.duration_label, volume
        )
    }
}
