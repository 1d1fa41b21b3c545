use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::ui::components::key_stats;

/// Keyboard panel height with full two-line tiles, borders included.
pub const KEYBOARD_FULL_HEIGHT: u16 = key_stats::FULL_HEIGHT + 2;
/// Keyboard panel height with one-line tiles.
pub const KEYBOARD_COMPACT_HEIGHT: u16 = 5;

pub struct AppLayout {
    pub nav: Rect,
    pub typing: Rect,
    pub keyboard: Option<Rect>,
    pub footer: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let keyboard_height = if area.height >= 20 {
            KEYBOARD_FULL_HEIGHT
        } else if area.height >= 12 {
            KEYBOARD_COMPACT_HEIGHT
        } else {
            0
        };

        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(keyboard_height),
                Constraint::Length(1),
            ])
            .split(area);

        Self {
            nav: vertical[0],
            typing: vertical[1],
            keyboard: (keyboard_height > 0).then_some(vertical[2]),
            footer: vertical[3],
        }
    }
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_POPUP_WIDTH: u16 = 60;
    const MIN_POPUP_HEIGHT: u16 = 16;

    let requested_w = area.width.saturating_mul(percent_x.min(100)) / 100;
    let requested_h = area.height.saturating_mul(percent_y.min(100)) / 100;

    let target_w = requested_w.max(MIN_POPUP_WIDTH).min(area.width);
    let target_h = requested_h.max(MIN_POPUP_HEIGHT).min(area.height);

    let left = area
        .x
        .saturating_add((area.width.saturating_sub(target_w)) / 2);
    let top = area
        .y
        .saturating_add((area.height.saturating_sub(target_h)) / 2);

    Rect::new(left, top, target_w, target_h)
}
