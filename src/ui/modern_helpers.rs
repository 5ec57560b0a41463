//! Rendering helpers for the modern TUI mode.

use crate::state::PlayerView;
use crate::ui::layout::Regions;
use crate::ui::styles::PlayerStyles;
use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::Alignment,
    widgets::{Gauge, Paragraph},
};

const HELP: &str = "space play/pause  ←/→ seek  ↑/↓ volume  m mute  f fullscreen  q quit";

pub fn play_glyph(is_playing: bool) -> &'static str {
    if is_playing { "⏸" } else { "▶" }
}

/// Text flashed in the middle of the screen after play/pause is toggled.
/// It names the requested action, which may not be confirmed yet.
pub fn pulse_text(view: &PlayerView) -> &'static str {
    if !view.show_toggle_pulse {
        ""
    } else if view.play_requested {
        "▶  playing"
    } else {
        "⏸  paused"
    }
}

pub fn volume_label(view: &PlayerView) -> String {
    if view.is_muted {
        "muted".to_string()
    } else {
        format!("{:>3.0}%", view.volume_fraction * 100.0)
    }
}

/// Draw one frame and return the regions it was laid out with, so that
/// mouse input can be hit-tested against what is on screen.
pub fn draw_player<B: Backend>(
    terminal: &mut Terminal<B>,
    view: &PlayerView,
    title: Option<&str>,
    styles: &PlayerStyles,
) -> Result<Regions, Box<dyn std::error::Error + Send + Sync>> {
    let mut regions = Regions::default();
    terminal.draw(|frame| {
        regions = Regions::compute(frame.area());
        render_player(frame, &regions, view, title, styles);
    })?;
    Ok(regions)
}

fn render_player(frame: &mut Frame, regions: &Regions, view: &PlayerView, title: Option<&str>, styles: &PlayerStyles) {
    frame.render_widget(
        Paragraph::new(title.unwrap_or("Nothing playing"))
            .style(styles.title)
            .alignment(Alignment::Center),
        regions.title,
    );
    frame.render_widget(
        Paragraph::new(pulse_text(view))
            .style(styles.pulse)
            .alignment(Alignment::Center),
        regions.pulse,
    );

    frame.render_widget(
        Paragraph::new(view.current_time_label.as_str()).style(styles.label),
        regions.current_label,
    );
    frame.render_widget(
        Gauge::default()
            .gauge_style(styles.progress)
            .ratio(view.progress_fraction)
            .use_unicode(true)
            .label(""),
        regions.seek_bar,
    );
    frame.render_widget(
        Paragraph::new(view.duration_label.as_str())
            .style(styles.label)
            .alignment(Alignment::Right),
        regions.duration_label,
    );

    frame.render_widget(
        Paragraph::new(format!("[{}]", play_glyph(view.is_playing))).style(styles.button),
        regions.play_button,
    );
    frame.render_widget(
        Paragraph::new(if view.is_muted { "[×]" } else { "[♪]" }).style(styles.button),
        regions.mute_button,
    );
    frame.render_widget(
        Gauge::default()
            .gauge_style(if view.is_muted { styles.muted } else { styles.volume })
            .ratio(view.volume_fraction)
            .use_unicode(true)
            .label(""),
        regions.volume_bar,
    );
    frame.render_widget(
        Paragraph::new(volume_label(view))
            .style(styles.label)
            .alignment(Alignment::Right),
        regions.volume_label,
    );
    frame.render_widget(
        Paragraph::new("[F]").style(styles.button),
        regions.fullscreen_button,
    );

    frame.render_widget(
        Paragraph::new(HELP).style(styles.help).alignment(Alignment::Center),
        regions.help,
    );
}
