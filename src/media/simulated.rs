//! In-memory media surface with its own clock.

use super::{MediaNotification, MediaSurface};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// A clip that behaves like a host media element: requests mutate state
/// synchronously and queue the notification a real element would fire.
#[derive(Debug)]
pub struct SimulatedSurface {
    title: Option<String>,
    current_time: f64,
    duration: f64,
    volume: f64,
    muted: bool,
    paused: bool,
    fullscreen: bool,
    autoplay_blocked: bool,
    /// Wall-clock anchor; `Some` only in realtime mode.
    last_tick: Option<Instant>,
    queue: VecDeque<MediaNotification>,
}

impl Default for SimulatedSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedSurface {
    /// An empty surface whose duration is not yet known.
    pub fn new() -> Self {
        Self {
            title: None,
            current_time: 0.0,
            duration: f64::NAN,
            volume: 1.0,
            muted: false,
            paused: true,
            fullscreen: false,
            autoplay_blocked: false,
            last_tick: None,
            queue: VecDeque::new(),
        }
    }

    /// A loaded clip that advances with the wall clock on every poll.
    pub fn realtime(duration: f64) -> Self {
        let mut surface = Self::new();
        surface.title = Some(format!("Simulated clip ({})", crate::text_utils::format_time(duration)));
        surface.load(duration);
        surface.last_tick = Some(Instant::now());
        surface
    }

    /// Swap in a source of the given length and fire the lifecycle sequence.
    pub fn load(&mut self, duration: f64) {
        self.duration = duration;
        if self.current_time != 0.0 {
            self.current_time = 0.0;
            self.queue.push_back(MediaNotification::TimeUpdate);
        }
        self.queue.extend([
            MediaNotification::LoadedMetadata,
            MediaNotification::DurationChange,
            MediaNotification::LoadedData,
            MediaNotification::CanPlay,
        ]);
    }

    pub fn block_autoplay(&mut self, blocked: bool) {
        self.autoplay_blocked = blocked;
    }

    /// Move the clock forward. Reaching the end pauses playback.
    pub fn advance(&mut self, dt: Duration) {
        if self.paused || !self.duration.is_finite() {
            return;
        }
        self.current_time = (self.current_time + dt.as_secs_f64()).min(self.duration);
        self.queue.push_back(MediaNotification::TimeUpdate);
        if self.current_time >= self.duration {
            self.paused = true;
            self.queue.push_back(MediaNotification::Pause);
        }
    }

    /// Move the playhead as if the media itself had progressed, firing a time update.
    pub fn report_time(&mut self, seconds: f64) {
        self.current_time = seconds;
        self.queue.push_back(MediaNotification::TimeUpdate);
    }
}

impl MediaSurface for SimulatedSurface {
    fn current_time(&self) -> f64 {
        self.current_time
    }

    fn duration(&self) -> f64 {
        self.duration
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
        let upper = if self.duration.is_finite() { self.duration } else { 0.0 };
        self.current_time = seconds.clamp(0.0, upper);
        self.queue.push_back(MediaNotification::TimeUpdate);
    }

    fn set_volume(&mut self, level: f64) {
        self.volume = level.clamp(0.0, 1.0);
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn play(&mut self) {
        if self.autoplay_blocked {
            tracing::warn!("simulated surface rejected play request");
            return;
        }
        if self.paused {
            if self.duration.is_finite() && self.current_time >= self.duration {
                self.current_time = 0.0;
            }
            self.paused = false;
            self.queue.push_back(MediaNotification::Play);
        }
    }

    fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            self.queue.push_back(MediaNotification::Pause);
        }
    }

    fn request_fullscreen(&mut self) {
        self.fullscreen = true;
    }

    fn exit_fullscreen(&mut self) {
        self.fullscreen = false;
    }

    fn poll_notifications(&mut self) -> Vec<MediaNotification> {
        if let Some(last) = self.last_tick {
            let now = Instant::now();
            self.last_tick = Some(now);
            self.advance(now.saturating_duration_since(last));
        }
        self.queue.drain(..).collect()
    }

    fn title(&self) -> Option<String> {
        self.title.clone()
    }
}
