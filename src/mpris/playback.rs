//! MPRIS player proxies and execution of playback commands.

use crate::mpris::connection::MprisError;
use crate::mpris::metadata::secs_to_micros;
use std::collections::HashMap;
use zbus::proxy;
use zvariant::{ObjectPath, OwnedObjectPath, OwnedValue};

/// MPRIS MediaPlayer2.Player interface proxy
#[proxy(
    interface = "org.mpris.MediaPlayer2.Player",
    default_path = "/org/mpris/MediaPlayer2"
)]
pub trait MediaPlayer2Player {
    fn play(&self) -> zbus::Result<()>;

    fn pause(&self) -> zbus::Result<()>;

    fn seek(&self, offset: i64) -> zbus::Result<()>;

    fn set_position(&self, track_id: &ObjectPath<'_>, position: i64) -> zbus::Result<()>;

    #[zbus(property)]
    fn metadata(&self) -> zbus::Result<HashMap<String, OwnedValue>>;

    #[zbus(property(emits_changed_signal = "false"))]
    fn position(&self) -> zbus::Result<i64>;

    #[zbus(property)]
    fn playback_status(&self) -> zbus::Result<String>;

    #[zbus(property)]
    fn volume(&self) -> zbus::Result<f64>;

    #[zbus(property)]
    fn set_volume(&self, value: f64) -> zbus::Result<()>;

    #[zbus(signal)]
    fn seeked(&self, position: i64) -> zbus::Result<()>;
}

/// MPRIS root interface proxy; only the optional fullscreen bits are used.
#[proxy(interface = "org.mpris.MediaPlayer2", default_path = "/org/mpris/MediaPlayer2")]
pub trait MediaPlayer2 {
    #[zbus(property)]
    fn fullscreen(&self) -> zbus::Result<bool>;

    #[zbus(property)]
    fn set_fullscreen(&self, value: bool) -> zbus::Result<()>;

    #[zbus(property)]
    fn can_set_fullscreen(&self) -> zbus::Result<bool>;
}

/// Requests queued by the surface for the bridge task.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Play,
    Pause,
    /// Absolute seek. `from` is the position the surface believed it was at,
    /// used for a relative `Seek` when no track id is known.
    SeekTo { target: f64, from: f64, track_id: Option<OwnedObjectPath> },
    SetVolume(f64),
    SetFullscreen(bool),
}

/// Map an MPRIS `PlaybackStatus` to the paused flag. Stopped counts as paused.
pub fn is_paused_status(status: &str) -> bool {
    status != "Playing"
}

pub async fn execute(
    player: &MediaPlayer2PlayerProxy<'_>,
    root: &MediaPlayer2Proxy<'_>,
    command: Command,
) -> Result<(), MprisError> {
    match command {
        Command::Play => player.play().await?,
        Command::Pause => player.pause().await?,
        Command::SeekTo { target, from, track_id } => match track_id {
            Some(track_id) => player.set_position(&track_id, secs_to_micros(target)).await?,
            None => player.seek(secs_to_micros(target - from)).await?,
        },
        Command::SetVolume(level) => player.set_volume(level.clamp(0.0, 1.0)).await?,
        Command::SetFullscreen(on) => {
            if !root.can_set_fullscreen().await.unwrap_or(false) {
                tracing::info!("player does not support fullscreen");
                return Ok(());
            }
            root.set_fullscreen(on).await?
        }
    }
    Ok(())
}
