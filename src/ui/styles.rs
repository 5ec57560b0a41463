use ratatui::style::{Color, Modifier, Style};

pub struct PlayerStyles {
    pub title: Style,
    pub label: Style,
    pub progress: Style,
    pub volume: Style,
    pub muted: Style,
    pub pulse: Style,
    pub button: Style,
    pub help: Style,
}

impl Default for PlayerStyles {
    fn default() -> Self {
        Self {
            title: Style::default().add_modifier(Modifier::BOLD),
            label: Style::default(),
            progress: Style::default().fg(Color::Green).bg(Color::DarkGray),
            volume: Style::default().fg(Color::Cyan).bg(Color::DarkGray),
            muted: Style::default().fg(Color::Red).add_modifier(Modifier::DIM),
            pulse: Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            button: Style::default().add_modifier(Modifier::BOLD),
            help: Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM),
        }
    }
}
