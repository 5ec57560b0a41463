//! D-Bus connection management and player discovery for MPRIS.

use std::sync::Arc;
use tokio::sync::OnceCell;
use zbus::proxy;

const MPRIS_PREFIX: &str = "org.mpris.MediaPlayer2.";
const PLAYERCTLD: &str = "org.mpris.MediaPlayer2.playerctld";

/// Errors that can occur during MPRIS operations
#[derive(thiserror::Error, Debug)]
pub enum MprisError {
    #[error("D-Bus error: {0}")]
    ZBus(#[from] zbus::Error),
    #[error("D-Bus fdo error: {0}")]
    Fdo(#[from] zbus::fdo::Error),
    #[error("Failed to establish D-Bus connection")]
    NoConnection,
    #[error("No MPRIS player available")]
    NoPlayer,
}

/// Global D-Bus connection singleton
static DBUS_CONNECTION: OnceCell<Arc<zbus::Connection>> = OnceCell::const_new();

/// Get or create a shared D-Bus session connection
pub async fn get_dbus_conn() -> Result<Arc<zbus::Connection>, MprisError> {
    DBUS_CONNECTION
        .get_or_try_init(|| async {
            let conn = zbus::Connection::session()
                .await
                .map_err(|_| MprisError::NoConnection)?;
            Ok(Arc::new(conn))
        })
        .await
        .cloned()
}

/// Proxy interface for playerctld to get active MPRIS players
#[proxy(
    interface = "com.github.altdesktop.playerctld",
    default_service = "org.mpris.MediaPlayer2.playerctld",
    default_path = "/org/mpris/MediaPlayer2"
)]
trait Playerctld {
    #[zbus(property)]
    fn player_names(&self) -> zbus::Result<Vec<String>>;
}

/// Get list of active MPRIS player service names.
///
/// playerctld orders players by recent activity, so it is asked first. Without
/// it, MPRIS names on the bus are returned in bus order.
pub async fn get_active_player_names() -> Result<Vec<String>, MprisError> {
    let conn = get_dbus_conn().await?;

    if let Ok(proxy) = PlayerctldProxy::new(&conn).await
        && let Ok(names) = proxy.player_names().await
        && !names.is_empty()
    {
        return Ok(names);
    }

    let dbus = zbus::fdo::DBusProxy::new(&conn).await?;
    let names = dbus
        .list_names()
        .await?
        .into_iter()
        .map(|name| name.to_string())
        .collect();
    Ok(mpris_service_names(names))
}

fn mpris_service_names(names: Vec<String>) -> Vec<String> {
    names
        .into_iter()
        .filter(|name| name.starts_with(MPRIS_PREFIX) && name != PLAYERCTLD)
        .collect()
}

/// Check if a player service name should be blocked
///
/// Returns true if the service name (case-insensitive) contains any blocked string.
pub fn is_blocked(service: &str, block_list: &[String]) -> bool {
    let service_lower = service.to_lowercase();
    block_list
        .iter()
        .any(|blocked| service_lower.contains(&blocked.to_lowercase()))
}

/// Pick the service to drive: the pinned one if given, else the first
/// active player not on the blocklist.
pub async fn select_player(pinned: Option<&str>, block_list: &[String]) -> Result<String, MprisError> {
    if let Some(service) = pinned {
        let service = if service.starts_with(MPRIS_PREFIX) {
            service.to_string()
        } else {
            format!("{MPRIS_PREFIX}{service}")
        };
        return Ok(service);
    }
    let names = get_active_player_names().await?;
    tracing::debug!(players = ?names, "discovered MPRIS players");
    names
        .into_iter()
        .find(|s| !is_blocked(s, block_list))
        .ok_or(MprisError::NoPlayer)
}
