mod event;
mod media;
mod mpris;
mod player;
mod state;
mod text_utils;
mod timer;
mod ui;

use crate::media::{MediaSurface, SimulatedSurface};
use crate::mpris::{MprisSurface, select_player};
use crate::player::Player;
use crate::ui::HostOptions;
use clap::Parser;
use std::error::Error;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Application configuration from CLI
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Config {
    /// Print a status line to stdout on every change (default is the full-screen UI)
    #[arg(long)]
    pipe: bool,
    /// MPRIS player to control, with or without the org.mpris.MediaPlayer2. prefix
    #[arg(long, value_name = "SERVICE")]
    player: Option<String>,
    /// Blocklist for MPRIS player service names (comma-separated, case-insensitive).
    /// If empty, the SCRUBPLAYER_BLOCK env var will be used as a fallback.
    #[arg(
        long = "block",
        value_name = "SERVICE1,SERVICE2",
        value_delimiter = ','
    )]
    block: Vec<String>,
    /// Play a simulated clip of this many seconds instead of an MPRIS player
    #[arg(long, value_name = "SECONDS", value_parser = parse_clip_length)]
    simulate: Option<f64>,
    /// With --simulate, refuse every play request the way a browser blocks autoplay
    #[arg(long, requires = "simulate")]
    reject_play: bool,
    /// Seconds moved by the left/right arrow keys
    #[arg(long, default_value_t = 5.0)]
    seek_step: f64,
    /// Milliseconds between surface polls
    #[arg(long, default_value_t = 250, value_parser = clap::value_parser!(u64).range(10..))]
    tick_ms: u64,
    /// Enable debug logging to stderr
    #[arg(long)]
    pub debug_log: bool,
}

impl Config {
    fn host_options(&self) -> HostOptions {
        HostOptions {
            seek_step: self.seek_step,
            tick: Duration::from_millis(self.tick_ms),
        }
    }
}

fn parse_clip_length(s: &str) -> Result<f64, String> {
    let seconds: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if seconds.is_finite() && seconds > 0.0 {
        Ok(seconds)
    } else {
        Err("clip length must be a positive number of seconds".to_string())
    }
}

fn block_from_env_if_empty(cli: &mut Config) {
    if cli.block.is_empty()
        && let Ok(s) = std::env::var("SCRUBPLAYER_BLOCK")
    {
        cli.block = parse_block_list(&s);
    }
}

fn parse_block_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|p| p.trim().to_lowercase())
        .filter(|p| !p.is_empty())
        .collect()
}

/// Logs go to stderr and are off unless asked for; `RUST_LOG` wins over `--debug-log`.
fn init_logging(debug_log: bool) {
    let fallback = if debug_log { "debug" } else { "off" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run<S: MediaSurface>(player: Player<S>, cfg: &Config) -> Result<(), Box<dyn Error + Send + Sync>> {
    let options = cfg.host_options();
    if cfg.pipe {
        crate::ui::pipe::display_player_pipe(player, options.tick).await
    } else {
        crate::ui::modern::display_player_modern(player, options).await
    }
}

async fn run_configured(cfg: &Config) -> Result<(), Box<dyn Error + Send + Sync>> {
    match cfg.simulate {
        Some(seconds) => {
            let mut surface = SimulatedSurface::realtime(seconds);
            surface.block_autoplay(cfg.reject_play);
            run(Player::new(surface), cfg).await
        }
        None => {
            let service = select_player(cfg.player.as_deref(), &cfg.block).await?;
            let surface = MprisSurface::connect(&service).await?;
            tracing::info!(service = surface.service(), "controlling player");
            run(Player::new(surface), cfg).await
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let mut cfg = Config::parse();
    block_from_env_if_empty(&mut cfg);
    init_logging(cfg.debug_log);

    let result = run_configured(&cfg).await;

    // Print error if any, for better diagnostics
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        return Err(e);
    }
    Ok(())
}
