//! Play/pause and fullscreen arbitration against surface-confirmed state.

use crate::media::MediaSurface;
use crate::timer::PulseTimer;
use std::time::Instant;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlaybackState {
    #[default]
    Paused,
    Playing,
}

/// Displayed playback state only changes on surface `Play`/`Pause`
/// notifications; toggles merely issue requests.
#[derive(Debug, Default)]
pub struct PlaybackCoordinator {
    state: PlaybackState,
    pulse: PulseTimer,
}

impl PlaybackCoordinator {
    pub fn new(state: PlaybackState) -> Self {
        Self { state, pulse: PulseTimer::default() }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Ask the surface to flip playback and (re)start the toggle pulse.
    ///
    /// The request follows the surface's own paused flag, so a second toggle
    /// before confirmation cancels the first rather than repeating it.
    pub fn toggle_play<S: MediaSurface>(&mut self, surface: &mut S, now: Instant) {
        if surface.paused() {
            surface.play();
        } else {
            surface.pause();
        }
        self.pulse.restart(now);
    }

    /// Record a confirmation from the surface. Returns true on change.
    pub fn confirm(&mut self, state: PlaybackState) -> bool {
        let changed = self.state != state;
        self.state = state;
        changed
    }

    pub fn toggle_fullscreen<S: MediaSurface>(&mut self, surface: &mut S) {
        if surface.is_fullscreen() {
            surface.exit_fullscreen();
        } else {
            surface.request_fullscreen();
        }
    }

    pub fn show_pulse(&self, now: Instant) -> bool {
        self.pulse.is_active(now)
    }

    pub fn pulse_deadline(&self) -> Option<Instant> {
        self.pulse.deadline()
    }

    pub fn expire_pulse(&mut self, now: Instant) -> bool {
        self.pulse.expire(now)
    }

    pub fn cancel_pulse(&mut self) {
        self.pulse.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::{MediaNotification, SimulatedSurface};
    use crate::timer::TOGGLE_PULSE;
    use assert_matches::assert_matches;
    use std::time::Duration;

    fn ready_surface() -> SimulatedSurface {
        let mut surface = SimulatedSurface::new();
        surface.load(60.0);
        surface.poll_notifications();
        surface
    }

    #[test]
    fn toggle_waits_for_confirmation() {
        let mut surface = ready_surface();
        let mut coord = PlaybackCoordinator::default();
        coord.toggle_play(&mut surface, Instant::now());

        assert_matches!(coord.state(), PlaybackState::Paused);
        assert!(!surface.paused());
        assert_eq!(surface.poll_notifications(), vec![MediaNotification::Play]);
        assert!(coord.confirm(PlaybackState::Playing));
        assert!(coord.is_playing());
    }

    #[test]
    fn rejected_play_stays_paused() {
        let mut surface = ready_surface();
        surface.block_autoplay(true);
        let mut coord = PlaybackCoordinator::default();
        let t0 = Instant::now();
        coord.toggle_play(&mut surface, t0);

        assert!(surface.poll_notifications().is_empty());
        assert_matches!(coord.state(), PlaybackState::Paused);
        assert!(coord.show_pulse(t0));
    }

    #[test]
    fn rapid_toggles_restart_the_pulse() {
        let mut surface = ready_surface();
        let mut coord = PlaybackCoordinator::default();
        let t0 = Instant::now();
        let second = t0 + Duration::from_millis(500);
        coord.toggle_play(&mut surface, t0);
        coord.toggle_play(&mut surface, second);

        assert_eq!(coord.pulse_deadline(), Some(second + TOGGLE_PULSE));
        assert!(!coord.expire_pulse(t0 + TOGGLE_PULSE));
        assert!(coord.show_pulse(t0 + TOGGLE_PULSE));
        assert!(coord.expire_pulse(second + TOGGLE_PULSE));
        assert!(!coord.show_pulse(second + TOGGLE_PULSE));
        assert_eq!(coord.pulse_deadline(), None);
    }

    #[test]
    fn fullscreen_toggles_against_surface() {
        let mut surface = ready_surface();
        let mut coord = PlaybackCoordinator::default();
        coord.toggle_fullscreen(&mut surface);
        assert!(surface.is_fullscreen());
        coord.toggle_fullscreen(&mut surface);
        assert!(!surface.is_fullscreen());
    }
}
