//! `MediaSurface` implementation backed by an MPRIS player.

use crate::media::{MediaNotification, MediaSurface};
use crate::mpris::connection::MprisError;
use crate::mpris::events::{Report, Snapshot, connect, run_bridge};
use crate::mpris::metadata::TrackMetadata;
use crate::mpris::playback::{Command, is_paused_status};
use crate::timer::PlaybackTimer;
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// How long a play/pause request may go unanswered before `paused` falls
/// back to the last reported state. Players may ignore `Play` silently.
pub const CONFIRM_TIMEOUT: Duration = Duration::from_millis(1500);

/// A remote player seen through a cache that the bridge task keeps current.
///
/// MPRIS has no mute flag, so muting writes volume 0 and unmuting writes the
/// cached level back.
pub struct MprisSurface {
    service: String,
    metadata: TrackMetadata,
    timer: PlaybackTimer,
    /// Flips as soon as play/pause is requested, like a media element's `paused`.
    paused: bool,
    /// Last state the player itself reported.
    confirmed_playing: bool,
    /// When the outstanding play/pause request was sent.
    requested_at: Option<Instant>,
    volume: f64,
    muted: bool,
    fullscreen: bool,
    commands: mpsc::UnboundedSender<Command>,
    reports: mpsc::UnboundedReceiver<Report>,
    queue: VecDeque<MediaNotification>,
    bridge: Option<AbortHandle>,
}

impl MprisSurface {
    /// Connect to `service` and spawn its bridge task.
    pub async fn connect(service: &str) -> Result<Self, MprisError> {
        let (proxies, snapshot) = connect(service).await?;
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (report_tx, report_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(async move {
            if let Err(e) = run_bridge(proxies, command_rx, report_tx).await {
                tracing::warn!(error = %e, "MPRIS bridge failed");
            }
        });
        let mut surface = Self::from_parts(service, snapshot, command_tx, report_rx, Instant::now());
        surface.bridge = Some(task.abort_handle());
        Ok(surface)
    }

    /// Build a surface over existing channels, queuing the notifications a
    /// freshly loaded element would fire for `snapshot`.
    pub fn from_parts(
        service: &str,
        snapshot: Snapshot,
        commands: mpsc::UnboundedSender<Command>,
        reports: mpsc::UnboundedReceiver<Report>,
        now: Instant,
    ) -> Self {
        let paused = is_paused_status(&snapshot.status);
        let mut timer = PlaybackTimer::default();
        timer.set_position(snapshot.position, now);
        if !paused {
            timer.mark_playing(now);
        }
        let mut queue = VecDeque::new();
        if snapshot.metadata.length.is_some() {
            queue.extend([
                MediaNotification::LoadedMetadata,
                MediaNotification::DurationChange,
                MediaNotification::CanPlay,
            ]);
        }
        queue.push_back(if paused { MediaNotification::Pause } else { MediaNotification::Play });
        Self {
            service: service.to_string(),
            metadata: snapshot.metadata,
            timer,
            paused,
            confirmed_playing: !paused,
            requested_at: None,
            volume: snapshot.volume.clamp(0.0, 1.0),
            muted: false,
            fullscreen: snapshot.fullscreen,
            commands,
            reports,
            queue,
            bridge: None,
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            tracing::warn!(service = %self.service, "MPRIS bridge is gone, dropping command");
        }
    }

    fn apply_report(&mut self, report: Report, now: Instant) {
        match report {
            Report::Metadata(metadata) => {
                if metadata.length != self.metadata.length {
                    if self.metadata.length.is_none() {
                        self.queue.push_back(MediaNotification::LoadedMetadata);
                    }
                    self.queue.push_back(MediaNotification::DurationChange);
                }
                self.metadata = metadata;
            }
            Report::Position(position) => {
                self.timer.set_position(position, now);
                self.queue.push_back(MediaNotification::TimeUpdate);
            }
            Report::Status(status) => {
                let paused = is_paused_status(&status);
                self.paused = paused;
                self.confirmed_playing = !paused;
                self.requested_at = None;
                if paused {
                    self.timer.mark_paused(now);
                    self.queue.push_back(MediaNotification::Pause);
                } else {
                    self.timer.mark_playing(now);
                    self.queue.push_back(MediaNotification::Play);
                }
            }
            Report::Volume(volume) => {
                // Our own mute shows up as volume 0; anything else is a real level.
                if !(self.muted && volume == 0.0) {
                    self.volume = volume.clamp(0.0, 1.0);
                    self.muted = false;
                }
            }
            Report::Fullscreen(on) => self.fullscreen = on,
        }
    }

    fn request_transport(&mut self, paused: bool, command: Command) {
        self.paused = paused;
        self.requested_at = Some(Instant::now());
        self.send(command);
    }

    /// Apply pending reports as of `now` and return queued notifications.
    pub fn drain(&mut self, now: Instant) -> Vec<MediaNotification> {
        while let Ok(report) = self.reports.try_recv() {
            self.apply_report(report, now);
        }
        if let Some(sent) = self.requested_at
            && now.saturating_duration_since(sent) >= CONFIRM_TIMEOUT
        {
            tracing::warn!(service = %self.service, "player ignored play/pause request");
            self.paused = !self.confirmed_playing;
            self.requested_at = None;
        }
        if self.confirmed_playing {
            self.queue.push_back(MediaNotification::TimeUpdate);
        }
        self.queue.drain(..).collect()
    }
}

impl Drop for MprisSurface {
    fn drop(&mut self) {
        if let Some(bridge) = self.bridge.take() {
            bridge.abort();
        }
    }
}

impl MediaSurface for MprisSurface {
    fn current_time(&self) -> f64 {
        let estimate = self.timer.estimate(Instant::now());
        match self.metadata.length {
            Some(length) => estimate.min(length),
            None => estimate,
        }
    }

    fn duration(&self) -> f64 {
        self.metadata.length.unwrap_or(f64::NAN)
    }

    fn volume(&self) -> f64 {
        self.volume
    }

    fn muted(&self) -> bool {
        self.muted
    }

    fn paused(&self) -> bool {
        self.paused
    }

    fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    fn set_current_time(&mut self, seconds: f64) {
        let now = Instant::now();
        let from = self.timer.estimate(now);
        self.timer.set_position(seconds, now);
        self.send(Command::SeekTo {
            target: seconds,
            from,
            track_id: self.metadata.track_id.clone(),
        });
        self.queue.push_back(MediaNotification::TimeUpdate);
    }

    fn set_volume(&mut self, level: f64) {
        self.volume = level.clamp(0.0, 1.0);
        if !self.muted {
            self.send(Command::SetVolume(self.volume));
        }
    }

    fn set_muted(&mut self, muted: bool) {
        if muted == self.muted {
            return;
        }
        self.muted = muted;
        self.send(Command::SetVolume(if muted { 0.0 } else { self.volume }));
    }

    fn play(&mut self) {
        if self.paused {
            self.request_transport(false, Command::Play);
        }
    }

    fn pause(&mut self) {
        if !self.paused {
            self.request_transport(true, Command::Pause);
        }
    }

    fn request_fullscreen(&mut self) {
        self.send(Command::SetFullscreen(true));
    }

    fn exit_fullscreen(&mut self) {
        self.send(Command::SetFullscreen(false));
    }

    fn poll_notifications(&mut self) -> Vec<MediaNotification> {
        self.drain(Instant::now())
    }

    fn title(&self) -> Option<String> {
        self.metadata.display_title()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Player;
    use crate::player::playback::PlaybackState;
    use MediaNotification::*;

    struct Harness {
        surface: MprisSurface,
        commands: mpsc::UnboundedReceiver<Command>,
        reports: mpsc::UnboundedSender<Report>,
    }

    fn harness(snapshot: Snapshot) -> Harness {
        let (command_tx, commands) = mpsc::unbounded_channel();
        let (reports, report_rx) = mpsc::unbounded_channel();
        let surface =
            MprisSurface::from_parts("org.mpris.MediaPlayer2.test", snapshot, command_tx, report_rx, Instant::now());
        Harness { surface, commands, reports }
    }

    fn paused_snapshot() -> Snapshot {
        Snapshot {
            metadata: TrackMetadata { length: Some(200.0), ..Default::default() },
            position: 42.0,
            status: "Paused".to_string(),
            volume: 0.6,
            fullscreen: false,
        }
    }

    #[test]
    fn initial_notifications_describe_snapshot() {
        let mut h = harness(paused_snapshot());
        assert_eq!(h.surface.poll_notifications(), vec![LoadedMetadata, DurationChange, CanPlay, Pause]);
        assert_eq!(h.surface.duration(), 200.0);
        assert_eq!(h.surface.current_time(), 42.0);
        assert!(h.surface.paused());

        let mut unknown = harness(Snapshot { status: "Stopped".to_string(), ..Default::default() });
        assert!(unknown.surface.duration().is_nan());
        assert_eq!(unknown.surface.poll_notifications(), vec![Pause]);
    }

    #[test]
    fn play_is_optimistic_but_confirmation_comes_from_status() {
        let mut h = harness(paused_snapshot());
        h.surface.poll_notifications();

        h.surface.play();
        h.surface.play();
        assert!(!h.surface.paused());
        assert_eq!(h.commands.try_recv().ok(), Some(Command::Play));
        assert!(h.commands.try_recv().is_err());
        assert!(h.surface.poll_notifications().is_empty());

        h.reports.send(Report::Status("Playing".to_string())).unwrap();
        assert_eq!(h.surface.poll_notifications(), vec![Play, TimeUpdate]);
    }

    #[test]
    fn rejected_play_resyncs_paused_flag() {
        let mut h = harness(paused_snapshot());
        h.surface.poll_notifications();
        h.surface.play();
        h.reports.send(Report::Status("Paused".to_string())).unwrap();
        assert_eq!(h.surface.poll_notifications(), vec![Pause]);
        assert!(h.surface.paused());
    }

    #[test]
    fn ignored_play_lets_the_next_toggle_retry() {
        let Harness { surface, mut commands, reports: _reports } = harness(paused_snapshot());
        let mut player = Player::new(surface);
        let t0 = Instant::now();
        player.pump(t0);

        player.toggle_play(t0);
        assert_eq!(commands.try_recv().ok(), Some(Command::Play));
        player.pump(t0);
        assert_eq!(player.playback_state(), PlaybackState::Paused);

        // No status change ever arrives.
        player.surface_mut().drain(Instant::now() + CONFIRM_TIMEOUT);
        assert!(player.surface().paused());

        player.toggle_play(t0 + CONFIRM_TIMEOUT);
        assert_eq!(commands.try_recv().ok(), Some(Command::Play));
        assert_eq!(player.playback_state(), PlaybackState::Paused);
    }

    #[test]
    fn confirmed_request_is_not_reverted() {
        let mut h = harness(paused_snapshot());
        h.surface.poll_notifications();
        h.surface.play();
        h.reports.send(Report::Status("Playing".to_string())).unwrap();
        h.surface.poll_notifications();

        h.surface.drain(Instant::now() + CONFIRM_TIMEOUT);
        assert!(!h.surface.paused());
    }

    #[test]
    fn mute_is_emulated_with_volume() {
        let mut h = harness(paused_snapshot());
        h.surface.set_muted(true);
        h.surface.set_volume(0.3);
        assert!(h.surface.muted());
        h.surface.set_muted(false);

        assert_eq!(h.commands.try_recv().ok(), Some(Command::SetVolume(0.0)));
        assert_eq!(h.commands.try_recv().ok(), Some(Command::SetVolume(0.3)));
        assert!(h.commands.try_recv().is_err());

        // The echo of our own mute does not unmute.
        h.surface.set_muted(true);
        h.reports.send(Report::Volume(0.0)).unwrap();
        h.surface.poll_notifications();
        assert!(h.surface.muted());
        assert_eq!(h.surface.volume(), 0.3);
    }

    #[test]
    fn seeks_carry_track_id_when_known() {
        let mut snapshot = paused_snapshot();
        snapshot.metadata.track_id = zvariant::OwnedObjectPath::try_from("/track/9").ok();
        let mut h = harness(snapshot);
        h.surface.set_current_time(100.0);

        match h.commands.try_recv().ok() {
            Some(Command::SeekTo { target, from, track_id }) => {
                assert_eq!(target, 100.0);
                assert_eq!(from, 42.0);
                assert_eq!(track_id.as_ref().map(|p| p.as_str()), Some("/track/9"));
            }
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(h.surface.current_time(), 100.0);
    }

    #[test]
    fn metadata_reports_map_to_duration_notifications() {
        let mut h = harness(Snapshot { status: "Paused".to_string(), ..Default::default() });
        h.surface.poll_notifications();

        let with_length = |length| TrackMetadata { length: Some(length), ..Default::default() };
        h.reports.send(Report::Metadata(with_length(120.0))).unwrap();
        assert_eq!(h.surface.poll_notifications(), vec![LoadedMetadata, DurationChange]);
        h.reports.send(Report::Metadata(with_length(120.0))).unwrap();
        assert!(h.surface.poll_notifications().is_empty());
        h.reports.send(Report::Metadata(with_length(95.0))).unwrap();
        assert_eq!(h.surface.poll_notifications(), vec![DurationChange]);
        assert_eq!(h.surface.duration(), 95.0);
    }

    #[test]
    fn dropping_surface_closes_command_channel() {
        let mut h = harness(paused_snapshot());
        drop(h.surface);
        assert!(matches!(
            h.commands.try_recv(),
            Err(mpsc::error::TryRecvError::Disconnected)
        ));
    }
}
