use crate::media::MediaSurface;
use crate::player::Player;
use std::future::Future;
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Print the player status to stdout whenever it changes (for scripting).
/// Runs until Ctrl-C.
pub async fn display_player_pipe<S: MediaSurface>(
    player: Player<S>,
    tick: Duration,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "cannot listen for Ctrl-C");
            futures_util::future::pending::<()>().await;
        }
    };
    print_status_lines(player, tick, &mut io::stdout(), shutdown).await
}

async fn print_status_lines<S: MediaSurface, W: Write>(
    mut player: Player<S>,
    tick: Duration,
    out: &mut W,
    shutdown: impl Future<Output = ()>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut interval = tokio::time::interval(tick);
    tokio::pin!(shutdown);
    let mut last_line: Option<String> = None;

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = interval.tick() => {
                if let Some(line) = next_status_line(&mut player, Instant::now(), &mut last_line) {
                    writeln!(out, "{}", line)?;
                    out.flush()?;
                }
            }
        }
    }
    Ok(())
}

/// Drain the player and return its status line if it differs from the last one printed.
fn next_status_line<S: MediaSurface>(
    player: &mut Player<S>,
    now: Instant,
    last_line: &mut Option<String>,
) -> Option<String> {
    player.pump(now);
    let line = player.view(now).status_line();
    if last_line.as_deref() == Some(line.as_str()) {
        return None;
    }
    *last_line = Some(line.clone());
    Some(line)
}
