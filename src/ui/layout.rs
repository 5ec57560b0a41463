//! Screen regions of the player and translation of terminal mouse input.
//!
//! Terminal cells are the client coordinate space: a column index is the
//! pointer's x. A bar of `n` cells maps its first cell to 0 and its last to 1.

use crate::event::{Control, PointerEvent, TrackRect};
use crossterm::event::{MouseButton, MouseEventKind};
use ratatui::layout::{Constraint, Layout, Position, Rect};

/// Something under the pointer that reacts to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Seek,
    Volume,
    PlayButton,
    MuteButton,
    FullscreenButton,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Regions {
    pub title: Rect,
    pub pulse: Rect,
    pub current_label: Rect,
    pub seek_bar: Rect,
    pub duration_label: Rect,
    pub play_button: Rect,
    pub mute_button: Rect,
    pub volume_bar: Rect,
    pub volume_label: Rect,
    pub fullscreen_button: Rect,
    pub help: Rect,
}

impl Regions {
    pub fn compute(area: Rect) -> Self {
        let [_, title, _, pulse, _, seek_row, controls_row, _, help, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(area);

        let [_, current_label, seek_bar, duration_label, _] = Layout::horizontal([
            Constraint::Length(2),
            Constraint::Length(7),
            Constraint::Fill(1),
            Constraint::Length(7),
            Constraint::Length(2),
        ])
        .areas(seek_row);

        let [_, play_button, mute_button, volume_bar, volume_label, _, fullscreen_button, _] =
            Layout::horizontal([
                Constraint::Length(2),
                Constraint::Length(4),
                Constraint::Length(4),
                Constraint::Length(20),
                Constraint::Length(7),
                Constraint::Fill(1),
                Constraint::Length(4),
                Constraint::Length(2),
            ])
            .areas(controls_row);

        Self {
            title,
            pulse,
            current_label,
            seek_bar,
            duration_label,
            play_button,
            mute_button,
            volume_bar,
            volume_label,
            fullscreen_button,
            help,
        }
    }

    pub fn hit(&self, column: u16, row: u16) -> Option<Hit> {
        let at = Position::new(column, row);
        [
            (self.seek_bar, Hit::Seek),
            (self.volume_bar, Hit::Volume),
            (self.play_button, Hit::PlayButton),
            (self.mute_button, Hit::MuteButton),
            (self.fullscreen_button, Hit::FullscreenButton),
        ]
        .into_iter()
        .find(|(rect, _)| rect.contains(at))
        .map(|(_, hit)| hit)
    }

    pub fn seek_track(&self) -> TrackRect {
        track_rect(self.seek_bar)
    }

    pub fn volume_track(&self) -> TrackRect {
        track_rect(self.volume_bar)
    }

    fn control(&self, hit: Hit) -> Option<(Control, TrackRect)> {
        match hit {
            Hit::Seek => Some((Control::SeekTrack, self.seek_track())),
            Hit::Volume => Some((Control::VolumeSlider, self.volume_track())),
            _ => None,
        }
    }
}

/// A one-cell bar has no usable width, which the controllers treat as a no-op.
pub fn track_rect(area: Rect) -> TrackRect {
    TrackRect::new(f64::from(area.x), f64::from(area.width.saturating_sub(1)))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostAction {
    Pointer(PointerEvent),
    TogglePlay,
    ToggleMute,
    ToggleFullscreen,
}

/// Turns raw terminal mouse events into pointer events and button presses.
///
/// A release over the same thing that was pressed also yields a click, the
/// way a browser fires `click` after `mouseup`.
#[derive(Debug, Default)]
pub struct GestureTracker {
    pressed: Option<Hit>,
}

impl GestureTracker {
    pub fn translate(&mut self, regions: &Regions, kind: MouseEventKind, column: u16, row: u16) -> Vec<HostAction> {
        let x = f64::from(column);
        match kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let hit = regions.hit(column, row);
                self.pressed = hit;
                hit.and_then(|hit| regions.control(hit))
                    .map(|(control, rect)| HostAction::Pointer(PointerEvent::down(x, control, rect)))
                    .into_iter()
                    .collect()
            }
            MouseEventKind::Drag(MouseButton::Left) => vec![HostAction::Pointer(PointerEvent::moved(x))],
            MouseEventKind::Up(MouseButton::Left) => {
                let mut actions = vec![HostAction::Pointer(PointerEvent::up(x))];
                let pressed = self.pressed.take();
                if let Some(hit) = pressed.filter(|p| regions.hit(column, row) == Some(*p)) {
                    match hit {
                        Hit::Seek | Hit::Volume => {
                            if let Some((control, rect)) = regions.control(hit) {
                                actions.push(HostAction::Pointer(PointerEvent::click(x, control, rect)));
                            }
                        }
                        Hit::PlayButton => actions.push(HostAction::TogglePlay),
                        Hit::MuteButton => actions.push(HostAction::ToggleMute),
                        Hit::FullscreenButton => actions.push(HostAction::ToggleFullscreen),
                    }
                }
                actions
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::PointerKind;

    fn regions() -> Regions {
        Regions::compute(Rect::new(0, 0, 80, 24))
    }

    #[test]
    fn regions_fit_inside_the_screen() {
        let r = regions();
        assert_eq!(r.seek_bar.y, r.current_label.y);
        assert_eq!(r.seek_bar.x, 9);
        assert_eq!(r.seek_bar.width, 80 - 2 - 7 - 7 - 2);
        assert_eq!(r.volume_bar.width, 20);
        assert!(r.volume_bar.y > r.seek_bar.y);
        assert!(r.help.bottom() <= 24);
    }

    #[test]
    fn hit_testing_finds_controls() {
        let r = regions();
        assert_eq!(r.hit(r.seek_bar.x + 3, r.seek_bar.y), Some(Hit::Seek));
        assert_eq!(r.hit(r.volume_bar.x, r.volume_bar.y), Some(Hit::Volume));
        assert_eq!(r.hit(r.play_button.x + 1, r.play_button.y), Some(Hit::PlayButton));
        assert_eq!(r.hit(0, 0), None);
    }

    #[test]
    fn track_rect_spans_first_to_last_cell() {
        let track = track_rect(Rect::new(10, 3, 21, 1));
        assert_eq!(track, TrackRect::new(10.0, 20.0));
        assert_eq!(track.fraction_at(30.0), Some(1.0));
        assert_eq!(track_rect(Rect::new(4, 0, 1, 1)).fraction_at(4.0), None);
    }

    #[test]
    fn press_drag_release_on_seek_bar() {
        let r = regions();
        let mut gestures = GestureTracker::default();
        let row = r.seek_bar.y;
        let col = r.seek_bar.x + 5;

        let down = gestures.translate(&r, MouseEventKind::Down(MouseButton::Left), col, row);
        assert_eq!(down, vec![HostAction::Pointer(PointerEvent::down(f64::from(col), Control::SeekTrack, r.seek_track()))]);

        let drag = gestures.translate(&r, MouseEventKind::Drag(MouseButton::Left), 0, 0);
        assert_eq!(drag, vec![HostAction::Pointer(PointerEvent::moved(0.0))]);

        // Released off the bar: drag ends, no click.
        let up = gestures.translate(&r, MouseEventKind::Up(MouseButton::Left), 0, 0);
        assert_eq!(up, vec![HostAction::Pointer(PointerEvent::up(0.0))]);
    }

    #[test]
    fn release_on_same_control_clicks() {
        let r = regions();
        let mut gestures = GestureTracker::default();
        let (col, row) = (r.volume_bar.x + 2, r.volume_bar.y);
        gestures.translate(&r, MouseEventKind::Down(MouseButton::Left), col, row);
        let up = gestures.translate(&r, MouseEventKind::Up(MouseButton::Left), col, row);
        assert_eq!(up.len(), 2);
        match up[1] {
            HostAction::Pointer(ev) => assert_eq!(ev.kind, PointerKind::Click),
            other => panic!("expected click, got {other:?}"),
        }
    }

    #[test]
    fn buttons_fire_on_release() {
        let r = regions();
        let mut gestures = GestureTracker::default();
        let (col, row) = (r.mute_button.x, r.mute_button.y);
        assert!(gestures.translate(&r, MouseEventKind::Down(MouseButton::Left), col, row).is_empty());
        let up = gestures.translate(&r, MouseEventKind::Up(MouseButton::Left), col, row);
        assert_eq!(up.last(), Some(&HostAction::ToggleMute));
    }
}
