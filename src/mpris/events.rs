//! Bridge task between an MPRIS player on the bus and the in-process surface.
//!
//! The task owns the D-Bus proxies. It executes queued [`Command`]s, watches
//! the player's signals and property changes, and forwards what it learns as
//! [`Report`]s. It exits when the surface drops either end of its channels.

use crate::mpris::connection::{MprisError, get_dbus_conn};
use crate::mpris::metadata::{TrackMetadata, extract_metadata, micros_to_secs};
use crate::mpris::playback::{Command, MediaPlayer2PlayerProxy, MediaPlayer2Proxy, execute};
use futures_util::StreamExt;
use std::time::Duration;
use tokio::sync::mpsc;

/// How often the bridge re-reads `Position`, which players do not signal.
const POSITION_REFRESH: Duration = Duration::from_secs(1);

/// Observations forwarded from the bus to the surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    Metadata(TrackMetadata),
    Position(f64),
    Status(String),
    Volume(f64),
    Fullscreen(bool),
}

/// State read from the player when the surface is created.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub metadata: TrackMetadata,
    pub position: f64,
    pub status: String,
    pub volume: f64,
    pub fullscreen: bool,
}

pub struct Proxies {
    pub player: MediaPlayer2PlayerProxy<'static>,
    pub root: MediaPlayer2Proxy<'static>,
}

/// Build proxies for `service` and read its current state.
pub async fn connect(service: &str) -> Result<(Proxies, Snapshot), MprisError> {
    let conn = get_dbus_conn().await?;
    let player = MediaPlayer2PlayerProxy::builder(&conn)
        .destination(service.to_string())?
        .build()
        .await?;
    let root = MediaPlayer2Proxy::builder(&conn)
        .destination(service.to_string())?
        .build()
        .await?;

    // PlaybackStatus is mandatory; a player that cannot answer it is not usable.
    let status = player.playback_status().await?;
    let snapshot = Snapshot {
        metadata: player
            .metadata()
            .await
            .map(|map| extract_metadata(&map))
            .unwrap_or_default(),
        position: player.position().await.map(micros_to_secs).unwrap_or(0.0),
        status,
        volume: player.volume().await.unwrap_or(1.0),
        fullscreen: root.fullscreen().await.unwrap_or(false),
    };
    tracing::info!(service, status = %snapshot.status, "connected to MPRIS player");
    Ok((Proxies { player, root }, snapshot))
}

fn forward(reports: &mpsc::UnboundedSender<Report>, report: Report) -> bool {
    reports.send(report).is_ok()
}

/// Run until the surface goes away.
pub async fn run_bridge(
    proxies: Proxies,
    mut commands: mpsc::UnboundedReceiver<Command>,
    reports: mpsc::UnboundedSender<Report>,
) -> Result<(), MprisError> {
    let Proxies { player, root } = proxies;
    let mut seeked_stream = player.receive_seeked().await?;
    let mut metadata_stream = player.receive_metadata_changed().await;
    let mut status_stream = player.receive_playback_status_changed().await;
    let mut volume_stream = player.receive_volume_changed().await;
    let mut fullscreen_stream = root.receive_fullscreen_changed().await;
    let mut refresh = tokio::time::interval(POSITION_REFRESH);

    loop {
        let alive = tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else { break };
                let transport = matches!(command, Command::Play | Command::Pause);
                if let Err(e) = execute(&player, &root, command.clone()).await {
                    tracing::warn!(?command, error = %e, "MPRIS command failed");
                }
                // Players may ignore Play/Pause without an error; the status
                // read back settles the surface's optimistic paused flag.
                if !transport {
                    true
                } else {
                    match player.playback_status().await {
                        Ok(status) => forward(&reports, Report::Status(status)),
                        Err(_) => true,
                    }
                }
            }

            Some(signal) = seeked_stream.next() => {
                match signal.args() {
                    Ok(args) => forward(&reports, Report::Position(micros_to_secs(*args.position()))),
                    Err(e) => {
                        tracing::debug!(error = %e, "malformed Seeked signal");
                        true
                    }
                }
            }

            Some(changed) = metadata_stream.next() => {
                match changed.get().await {
                    Ok(map) => forward(&reports, Report::Metadata(extract_metadata(&map))),
                    Err(e) => {
                        tracing::debug!(error = %e, "failed to read changed metadata");
                        true
                    }
                }
            }

            Some(changed) = status_stream.next() => {
                match changed.get().await {
                    Ok(status) => {
                        // Players rarely signal position; resync it on every transition.
                        let position = player.position().await.map(micros_to_secs);
                        forward(&reports, Report::Status(status))
                            && position.map_or(true, |p| forward(&reports, Report::Position(p)))
                    }
                    Err(e) => {
                        tracing::debug!(error = %e, "failed to read playback status");
                        true
                    }
                }
            }

            Some(changed) = volume_stream.next() => {
                match changed.get().await {
                    Ok(volume) => forward(&reports, Report::Volume(volume)),
                    Err(_) => true,
                }
            }

            Some(changed) = fullscreen_stream.next() => {
                match changed.get().await {
                    Ok(on) => forward(&reports, Report::Fullscreen(on)),
                    Err(_) => true,
                }
            }

            _ = refresh.tick() => {
                match player.position().await {
                    Ok(micros) => forward(&reports, Report::Position(micros_to_secs(micros))),
                    Err(e) => {
                        tracing::debug!(error = %e, "position refresh failed");
                        !reports.is_closed()
                    }
                }
            }
        };
        if !alive {
            break;
        }
    }
    tracing::debug!("MPRIS bridge stopped");
    Ok(())
}
