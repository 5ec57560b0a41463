//! Player core: scrub, volume and playback controllers bound to one surface.
//!
//! All handlers are synchronous and run on the host's event thread. The
//! surface is the source of truth for playback; the controllers own any
//! in-progress drag. Time is passed in as `now` so hosts decide the clock.

pub mod drag;
pub mod playback;
pub mod scrub;
pub mod volume;

use crate::event::{Control, PointerEvent, PointerKind};
use crate::media::{MediaNotification, MediaSurface};
use crate::state::PlayerView;
use drag::{Axis, PointerHub};
use playback::{PlaybackCoordinator, PlaybackState};
use scrub::ScrubController;
use std::time::Instant;
use volume::{Volume, VolumeController};

pub struct Player<S: MediaSurface> {
    surface: S,
    hub: PointerHub,
    scrub: ScrubController,
    volume: VolumeController,
    playback: PlaybackCoordinator,
}

impl<S: MediaSurface> Player<S> {
    /// Mount a player on `surface`, adopting whatever state it already has.
    pub fn new(surface: S) -> Self {
        let mut scrub = ScrubController::new();
        scrub.accept_duration(surface.duration());
        scrub.time_update(surface.current_time());
        let volume = VolumeController::new(Volume::from_surface(surface.volume(), surface.muted()));
        let state = if surface.paused() { PlaybackState::Paused } else { PlaybackState::Playing };
        Self {
            surface,
            hub: PointerHub::new(),
            scrub,
            volume,
            playback: PlaybackCoordinator::new(state),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn pointer_hub(&self) -> &PointerHub {
        &self.hub
    }

    pub fn scrub(&self) -> &ScrubController {
        &self.scrub
    }

    pub fn volume(&self) -> Volume {
        self.volume.volume()
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.playback.state()
    }

    /// Route a pointer event. Moves and ups go to whichever controllers hold
    /// a document-level listener; each still checks its own drag flag.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match (event.kind, event.target) {
            (PointerKind::Down, Some((Control::SeekTrack, rect))) => {
                self.scrub.pointer_down(event.x, rect, &mut self.surface, &self.hub)
            }
            (PointerKind::Down, Some((Control::VolumeSlider, rect))) => {
                self.volume.pointer_down(event.x, rect, &mut self.surface, &self.hub)
            }
            (PointerKind::Click, Some((Control::SeekTrack, rect))) => {
                self.scrub.click(event.x, rect, &mut self.surface)
            }
            (PointerKind::Click, Some((Control::VolumeSlider, rect))) => {
                self.volume.click(event.x, rect, &mut self.surface)
            }
            (PointerKind::Move, _) => {
                for axis in self.hub.listeners() {
                    match axis {
                        Axis::Seek => self.scrub.pointer_move(event.x, &mut self.surface),
                        Axis::Volume => self.volume.pointer_move(event.x, &mut self.surface),
                    }
                }
            }
            (PointerKind::Up, _) => {
                for axis in self.hub.listeners() {
                    match axis {
                        Axis::Seek => self.scrub.pointer_up(),
                        Axis::Volume => self.volume.pointer_up(),
                    }
                }
            }
            (PointerKind::Down | PointerKind::Click, None) => {}
        }
    }

    pub fn toggle_play(&mut self, now: Instant) {
        self.playback.toggle_play(&mut self.surface, now);
    }

    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute(&mut self.surface);
    }

    pub fn toggle_fullscreen(&mut self) {
        self.playback.toggle_fullscreen(&mut self.surface);
    }

    pub fn set_volume(&mut self, level: f64) {
        self.volume.apply(level, &mut self.surface);
    }

    pub fn seek_by(&mut self, delta: f64) {
        self.scrub.seek_by(delta, &mut self.surface);
    }

    /// Apply one surface notification. Returns true if the view may differ.
    pub fn notify(&mut self, notification: MediaNotification) -> bool {
        let mut changed = false;
        if notification.may_carry_duration() {
            // A new source brings a new duration and usually a new playhead.
            changed |= self.scrub.accept_duration(self.surface.duration());
            changed |= self.scrub.time_update(self.surface.current_time());
        }
        changed |= match notification {
            MediaNotification::Play => self.playback.confirm(PlaybackState::Playing),
            MediaNotification::Pause => self.playback.confirm(PlaybackState::Paused),
            _ => false,
        };
        changed
    }

    /// Drain the surface and expire the pulse. Returns true if anything changed.
    pub fn pump(&mut self, now: Instant) -> bool {
        let mut changed = false;
        for notification in self.surface.poll_notifications() {
            changed |= self.notify(notification);
        }
        changed |= self.playback.expire_pulse(now);
        changed
    }

    /// When the host must wake next to hide the toggle pulse.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.playback.pulse_deadline()
    }

    pub fn view(&self, now: Instant) -> PlayerView {
        let volume = self.volume.volume();
        PlayerView::new(
            self.scrub.position(),
            volume.displayed(),
            self.playback.is_playing(),
            volume.is_muted(),
            self.playback.show_pulse(now),
            !self.surface.paused(),
        )
    }
}

impl<S: MediaSurface> Drop for Player<S> {
    fn drop(&mut self) {
        self.scrub.pointer_up();
        self.volume.pointer_up();
        self.playback.cancel_pulse();
        tracing::debug!(listeners = self.hub.listener_count(), "player unmounted");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::TrackRect;
    use crate::media::SimulatedSurface;
    use crate::timer::TOGGLE_PULSE;
    use std::time::Duration;

    fn loaded_player(duration: f64) -> Player<SimulatedSurface> {
        let mut surface = SimulatedSurface::new();
        surface.load(duration);
        let mut player = Player::new(surface);
        player.pump(Instant::now());
        player
    }

    #[test]
    fn click_before_duration_then_after() {
        let now = Instant::now();
        let track = TrackRect::new(0.0, 300.0);
        let mut player = Player::new(SimulatedSurface::new());

        player.handle_pointer(PointerEvent::down(150.0, Control::SeekTrack, track));
        player.handle_pointer(PointerEvent::up(150.0));
        player.handle_pointer(PointerEvent::click(150.0, Control::SeekTrack, track));
        assert_eq!(player.scrub().position().current_time, 0.0);
        assert_eq!(player.view(now).progress_fraction, 0.0);

        player.surface_mut().load(120.0);
        assert!(player.pump(now));

        player.handle_pointer(PointerEvent::click(150.0, Control::SeekTrack, track));
        assert_eq!(player.scrub().position().current_time, 60.0);
        assert_eq!(player.surface().current_time(), 60.0);
        let view = player.view(now);
        assert_eq!(view.current_time_label, "1:00");
        assert_eq!(view.duration_label, "2:00");
        assert_eq!(view.progress_fraction, 0.5);
    }

    #[test]
    fn drag_volume_to_zero_then_unmute() {
        let now = Instant::now();
        let slider = TrackRect::new(0.0, 100.0);
        let mut player = loaded_player(60.0);
        player.set_volume(0.8);
        assert_eq!(player.volume(), Volume::Level(0.8));

        player.handle_pointer(PointerEvent::down(80.0, Control::VolumeSlider, slider));
        player.handle_pointer(PointerEvent::moved(-20.0));
        player.handle_pointer(PointerEvent::up(-20.0));
        assert_eq!(player.volume(), Volume::Muted { restore: 0.0 });
        assert!(player.surface().muted());
        let view = player.view(now);
        assert!(view.is_muted);
        assert_eq!(view.volume_fraction, 0.0);

        player.toggle_mute();
        assert_eq!(player.volume(), Volume::Level(0.5));
        assert!(!player.surface().muted());
        assert_eq!(player.view(now).volume_fraction, 0.5);
    }

    #[test]
    fn surface_time_updates_wait_for_drag_end() {
        let track = TrackRect::new(0.0, 100.0);
        let mut player = loaded_player(100.0);
        player.handle_pointer(PointerEvent::down(40.0, Control::SeekTrack, track));

        for t in [1.0, 2.0, 3.0] {
            player.surface_mut().report_time(t);
            player.pump(Instant::now());
            assert_eq!(player.scrub().position().current_time, 40.0);
        }

        player.handle_pointer(PointerEvent::up(40.0));
        player.surface_mut().report_time(41.0);
        player.pump(Instant::now());
        assert_eq!(player.scrub().position().current_time, 41.0);
    }

    #[test]
    fn moves_go_only_to_the_dragging_control() {
        let track = TrackRect::new(0.0, 100.0);
        let mut player = loaded_player(100.0);
        player.set_volume(0.3);
        player.handle_pointer(PointerEvent::down(10.0, Control::SeekTrack, track));
        player.handle_pointer(PointerEvent::moved(90.0));

        assert_eq!(player.scrub().position().current_time, 90.0);
        assert_eq!(player.volume(), Volume::Level(0.3));
        assert_eq!(player.pointer_hub().listeners(), vec![Axis::Seek]);

        player.handle_pointer(PointerEvent::up(90.0));
        assert_eq!(player.pointer_hub().listener_count(), 0);
        player.handle_pointer(PointerEvent::moved(20.0));
        assert_eq!(player.scrub().position().current_time, 90.0);
    }

    #[test]
    fn playback_follows_notifications_and_pulses() {
        let t0 = Instant::now();
        let mut player = loaded_player(30.0);
        player.toggle_play(t0);
        assert!(!player.view(t0).is_playing);
        assert!(player.view(t0).show_toggle_pulse);
        assert!(player.view(t0).play_requested);

        player.pump(t0);
        assert!(player.view(t0).is_playing);

        player.toggle_play(t0 + Duration::from_millis(400));
        assert_eq!(player.next_deadline(), Some(t0 + Duration::from_millis(400) + TOGGLE_PULSE));
        player.pump(t0 + TOGGLE_PULSE);
        let view = player.view(t0 + TOGGLE_PULSE);
        assert!(!view.is_playing);
        assert!(view.show_toggle_pulse);

        assert!(player.pump(t0 + Duration::from_millis(1200)));
        assert!(!player.view(t0 + Duration::from_millis(1200)).show_toggle_pulse);
        assert_eq!(player.next_deadline(), None);
    }

    #[test]
    fn swapping_source_while_paused_resets_playhead() {
        let now = Instant::now();
        let mut player = loaded_player(120.0);
        player.seek_by(60.0);
        player.pump(now);
        assert_eq!(player.view(now).current_time_label, "1:00");

        player.surface_mut().load(30.0);
        assert!(player.pump(now));
        assert_eq!(player.surface().current_time(), 0.0);
        let view = player.view(now);
        assert_eq!(view.current_time_label, "0:00");
        assert_eq!(view.duration_label, "0:30");
        assert_eq!(view.progress_fraction, 0.0);
    }

    #[test]
    fn duration_change_during_drag_keeps_drag_position() {
        let track = TrackRect::new(0.0, 100.0);
        let mut player = loaded_player(100.0);
        player.handle_pointer(PointerEvent::down(40.0, Control::SeekTrack, track));
        player.surface_mut().load(200.0);
        player.pump(Instant::now());
        assert_eq!(player.scrub().position().current_time, 40.0);
        assert_eq!(player.scrub().position().duration, Some(200.0));
    }

    #[test]
    fn blocked_play_keeps_player_paused() {
        let now = Instant::now();
        let mut player = loaded_player(30.0);
        player.surface_mut().block_autoplay(true);
        player.toggle_play(now);
        player.pump(now);
        assert_eq!(player.playback_state(), PlaybackState::Paused);
    }

    #[test]
    fn mount_adopts_surface_state() {
        let mut surface = SimulatedSurface::new();
        surface.load(50.0);
        surface.set_current_time(12.0);
        surface.set_volume(0.0);
        surface.play();
        let player = Player::new(surface);

        assert_eq!(player.playback_state(), PlaybackState::Playing);
        assert_eq!(player.scrub().position().current_time, 12.0);
        assert_eq!(player.scrub().position().duration, Some(50.0));
        assert!(player.volume().is_muted());
    }

    #[test]
    fn unmount_releases_listeners_and_timers() {
        let now = Instant::now();
        let track = TrackRect::new(0.0, 100.0);
        let mut player = loaded_player(100.0);
        let hub = player.pointer_hub().clone();
        player.handle_pointer(PointerEvent::down(10.0, Control::SeekTrack, track));
        player.handle_pointer(PointerEvent::down(10.0, Control::VolumeSlider, track));
        player.toggle_play(now);
        assert_eq!(hub.listener_count(), 2);

        drop(player);
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn keyboard_seek_and_volume() {
        let mut player = loaded_player(100.0);
        player.seek_by(5.0);
        player.seek_by(5.0);
        assert_eq!(player.scrub().position().current_time, 10.0);
        player.set_volume(0.0);
        assert!(player.view(Instant::now()).is_muted);
        player.set_volume(0.05);
        assert_eq!(player.volume(), Volume::Level(0.05));
    }
}
