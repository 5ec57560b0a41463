//! Modern TUI mode: a full-screen, mouse-driven player.
//!
//! The event loop uses `tokio::select!` to handle:
//! - terminal input (keys and mouse) forwarded from a polling thread
//! - the toggle pulse deadline, so the flash disappears on time
//! - a periodic tick that drains the surface's notifications

use crate::media::MediaSurface;
use crate::player::Player;
use crate::player::playback::PlaybackState;
use crate::ui::HostOptions;
use crate::ui::layout::{GestureTracker, HostAction, Regions};
use crate::ui::modern_helpers::draw_player;
use crate::ui::styles::PlayerStyles;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::{Backend, CrosstermBackend}};
use std::io;
use std::thread;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

const VOLUME_STEP: f64 = 0.05;

/// UI state for the modern TUI mode
#[derive(Default)]
pub struct ModernUIState {
    /// Layout of the last drawn frame; `None` until the first draw.
    pub regions: Option<Regions>,
    pub gestures: GestureTracker,
    pub should_exit: bool,
}

/// Run the player full-screen until the user quits.
pub async fn display_player_modern<S: MediaSurface>(
    mut player: Player<S>,
    options: HostOptions,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    enable_raw_mode().map_err(to_boxed_err)?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(to_boxed_err)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(to_boxed_err)?;

    let result = run_loop(&mut terminal, &mut player, &options).await;

    disable_raw_mode().map_err(to_boxed_err)?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture).map_err(to_boxed_err)?;
    terminal.show_cursor().map_err(to_boxed_err)?;
    result
}

async fn run_loop<B: Backend, S: MediaSurface>(
    terminal: &mut Terminal<B>,
    player: &mut Player<S>,
    options: &HostOptions,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let styles = PlayerStyles::default();
    let mut state = ModernUIState::default();

    // A dedicated OS thread polls crossterm and forwards events. `blocking_send`
    // keeps drag sequences intact when the loop is briefly busy.
    let (event_tx, mut event_rx) = mpsc::channel(64);
    thread::spawn(move || {
        loop {
            match crossterm::event::poll(std::time::Duration::from_millis(100)) {
                Ok(true) => {
                    if let Ok(ev) = crossterm::event::read() {
                        if event_tx.blocking_send(ev).is_err() {
                            break;
                        }
                    }
                }
                Ok(false) => {
                    if event_tx.is_closed() {
                        break;
                    }
                }
                Err(_) => std::thread::sleep(std::time::Duration::from_millis(100)),
            }
        }
    });

    let mut tick = tokio::time::interval(options.tick);
    tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

    player.pump(Instant::now());
    redraw(terminal, player, &mut state, &styles)?;

    while !state.should_exit {
        let pulse_deadline = player.next_deadline();
        let dirty = tokio::select! {
            biased;

            maybe_event = event_rx.recv() => match maybe_event {
                Some(event) => process_event(event, &mut state, player, options, Instant::now()),
                None => {
                    state.should_exit = true;
                    false
                }
            },

            _ = async {
                match pulse_deadline {
                    Some(deadline) => tokio::time::sleep_until(deadline.into()).await,
                    None => futures_util::future::pending::<()>().await,
                }
            } => player.pump(Instant::now()),

            _ = tick.tick() => {
                // The clock moves while playing even if nothing was reported.
                player.pump(Instant::now()) || player.playback_state() == PlaybackState::Playing
            }
        };
        if dirty && !state.should_exit {
            redraw(terminal, player, &mut state, &styles)?;
        }
    }
    Ok(())
}

fn redraw<B: Backend, S: MediaSurface>(
    terminal: &mut Terminal<B>,
    player: &Player<S>,
    state: &mut ModernUIState,
    styles: &PlayerStyles,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let view = player.view(Instant::now());
    let title = player.surface().title();
    state.regions = Some(draw_player(terminal, &view, title.as_deref(), styles)?);
    Ok(())
}

/// Handle one terminal event. Returns true when the screen should be redrawn.
fn process_event<S: MediaSurface>(
    event: Event,
    state: &mut ModernUIState,
    player: &mut Player<S>,
    options: &HostOptions,
    now: Instant,
) -> bool {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => state.should_exit = true,
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    state.should_exit = true;
                }
                KeyCode::Char(' ') | KeyCode::Char('k') => player.toggle_play(now),
                KeyCode::Char('m') => player.toggle_mute(),
                KeyCode::Char('f') => player.toggle_fullscreen(),
                KeyCode::Left => player.seek_by(-options.seek_step),
                KeyCode::Right => player.seek_by(options.seek_step),
                KeyCode::Up => player.set_volume(player.volume().displayed() + VOLUME_STEP),
                KeyCode::Down => player.set_volume(player.volume().displayed() - VOLUME_STEP),
                _ => return false,
            }
            true
        }
        Event::Mouse(mouse) => {
            let Some(regions) = state.regions else {
                return false;
            };
            let actions = state.gestures.translate(&regions, mouse.kind, mouse.column, mouse.row);
            let dirty = !actions.is_empty();
            for action in actions {
                match action {
                    HostAction::Pointer(pointer) => player.handle_pointer(pointer),
                    HostAction::TogglePlay => player.toggle_play(now),
                    HostAction::ToggleMute => player.toggle_mute(),
                    HostAction::ToggleFullscreen => player.toggle_fullscreen(),
                }
            }
            dirty
        }
        Event::Resize(_, _) => true,
        _ => false,
    }
}

fn to_boxed_err<E: std::error::Error + Send + Sync + 'static>(
    e: E,
) -> Box<dyn std::error::Error + Send + Sync> {
    Box::new(e)
}
