//! Media surface contract: the playable resource the player drives and observes.

pub mod simulated;

pub use simulated::SimulatedSurface;

/// Lifecycle and progress notifications emitted by a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaNotification {
    LoadedMetadata,
    LoadedData,
    CanPlay,
    DurationChange,
    TimeUpdate,
    Play,
    Pause,
}

impl MediaNotification {
    /// Notifications after which the surface's duration is worth reading.
    /// Hosts are unreliable about which of these arrives first.
    pub fn may_carry_duration(self) -> bool {
        matches!(
            self,
            Self::LoadedMetadata
                | Self::LoadedData
                | Self::CanPlay
                | Self::DurationChange
                | Self::TimeUpdate
        )
    }
}

/// A playable resource exclusively driven by one player.
///
/// Requests (`play`, `pause`, fullscreen) are fire-and-forget: a backend that
/// cannot honor one logs it and simply never emits the confirming notification.
pub trait MediaSurface {
    fn current_time(&self) -> f64;
    /// Length in seconds, NaN while unknown.
    fn duration(&self) -> f64;
    fn volume(&self) -> f64;
    fn muted(&self) -> bool;
    fn paused(&self) -> bool;
    fn is_fullscreen(&self) -> bool;

    fn set_current_time(&mut self, seconds: f64);
    fn set_volume(&mut self, level: f64);
    fn set_muted(&mut self, muted: bool);

    fn play(&mut self);
    fn pause(&mut self);
    fn request_fullscreen(&mut self);
    fn exit_fullscreen(&mut self);

    /// Drain notifications queued since the last call, oldest first.
    fn poll_notifications(&mut self) -> Vec<MediaNotification>;

    fn title(&self) -> Option<String> {
        None
    }
}
