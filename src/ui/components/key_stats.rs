use std::time::Instant;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Widget};

use crate::engine::key_stats::{KeyStat, KeyStatRecord};
use crate::engine::speed::{SpeedFormula, SpeedLabel};
use crate::keyboard::tile::KeyboardState;
use crate::ui::theme::Theme;

const TILE_WIDTH: u16 = 8;
const TILE_HEIGHT: u16 = 2;
const COMPACT_TILE_WIDTH: u16 = 4;
/// Horizontal stagger of each row, in tile widths / 4.
const ROW_STAGGER: [u16; 3] = [0, 1, 2];

/// What a tile shows: the key name and, once the key has been timed, the
/// speed readout.
#[derive(Debug, PartialEq, Eq)]
pub struct TileText {
    pub label: String,
    pub readout: Option<String>,
}

pub fn tile_text(key_name: &str, speed: u32) -> TileText {
    TileText {
        label: key_name.to_string(),
        readout: (speed != 0).then(|| format!("{speed} WPM")),
    }
}

/// One key of the stats keyboard.
pub struct KeyStatTile<'a> {
    key_name: &'a str,
    stat: KeyStat,
    pressed: bool,
    compact: bool,
    formula: &'a dyn SpeedFormula,
    theme: &'a Theme,
}

impl<'a> KeyStatTile<'a> {
    pub fn new(
        key_name: &'a str,
        stat: KeyStat,
        pressed: bool,
        formula: &'a dyn SpeedFormula,
        theme: &'a Theme,
    ) -> Self {
        Self {
            key_name,
            stat,
            pressed,
            compact: false,
            formula,
            theme,
        }
    }

    pub fn compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    pub fn speed(&self) -> u32 {
        self.stat.speed(self.formula)
    }

    pub fn label(&self) -> SpeedLabel {
        SpeedLabel::from_speed(self.speed())
    }

    pub fn style(&self) -> Style {
        let colors = &self.theme.colors;
        if self.pressed {
            Style::default()
                .fg(colors.bg())
                .bg(colors.key_pressed())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(colors.key_fg())
                .bg(colors.key_label_bg(self.label()))
        }
    }
}

/// The readout to draw in `width` columns. The unit is dropped before any
/// digit would be cut.
fn fit_readout(readout: Option<String>, speed: u32, width: u16) -> String {
    match readout {
        Some(full) if full.chars().count() <= width as usize => full,
        Some(_) => speed.to_string(),
        None => String::new(),
    }
}

fn centered(text: &str, width: u16) -> String {
    let width = width as usize;
    let text: String = text.chars().take(width).collect();
    let len = text.chars().count();
    let left = (width - len) / 2;
    format!("{}{}{}", " ".repeat(left), text, " ".repeat(width - len - left))
}

impl Widget for KeyStatTile<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let style = self.style();
        let speed = self.speed();
        let text = tile_text(self.key_name, speed);

        buf.set_string(area.x, area.y, centered(&text.label, area.width), style);

        if self.compact || area.height < TILE_HEIGHT {
            return;
        }
        let readout = fit_readout(text.readout, speed, area.width);
        buf.set_string(
            area.x,
            area.y + 1,
            centered(&readout, area.width),
            style.remove_modifier(Modifier::BOLD),
        );
    }
}

/// The stats keyboard: one tile per key of the active scheme.
pub struct KeyStatsView<'a> {
    keyboard: &'a KeyboardState,
    record: &'a KeyStatRecord,
    formula: &'a dyn SpeedFormula,
    theme: &'a Theme,
    now: Instant,
}

impl<'a> KeyStatsView<'a> {
    pub fn new(
        keyboard: &'a KeyboardState,
        record: &'a KeyStatRecord,
        formula: &'a dyn SpeedFormula,
        theme: &'a Theme,
        now: Instant,
    ) -> Self {
        Self {
            keyboard,
            record,
            formula,
            theme,
            now,
        }
    }

    fn widest_row(&self) -> u16 {
        self.keyboard
            .rows()
            .iter()
            .map(|row| row.len() as u16)
            .max()
            .unwrap_or(0)
    }
}

/// Inner height needed to draw full tiles.
pub const FULL_HEIGHT: u16 = TILE_HEIGHT * 3;

impl Widget for KeyStatsView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" Keyboard \u{00b7} {} ", self.keyboard.scheme().name))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 3 || inner.width < 30 {
            return;
        }

        let max_stagger = ROW_STAGGER[2];
        let full_width = self.widest_row() * TILE_WIDTH + max_stagger * TILE_WIDTH / 4;
        let compact = inner.height < FULL_HEIGHT || inner.width < full_width;
        let (tile_width, tile_height) = if compact {
            (COMPACT_TILE_WIDTH, 1)
        } else {
            (TILE_WIDTH, TILE_HEIGHT)
        };

        for (row_idx, row) in self.keyboard.rows().iter().enumerate() {
            let y = inner.y + row_idx as u16 * tile_height;
            if y + tile_height > inner.y + inner.height {
                break;
            }
            let offset = ROW_STAGGER.get(row_idx).copied().unwrap_or(0) * tile_width / 4;

            for (col_idx, tile) in row.iter().enumerate() {
                let x = inner.x + offset + col_idx as u16 * tile_width;
                if x + tile_width > inner.x + inner.width {
                    break;
                }
                // Leave one column of background between tiles.
                let tile_area = Rect::new(x, y, tile_width - 1, tile_height);
                KeyStatTile::new(
                    tile.key_name(),
                    self.record.get_or_zero(tile.key_name()),
                    tile.is_pressed(self.now),
                    self.formula,
                    self.theme,
                )
                .compact(compact)
                .render(tile_area, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::speed::WordsPerMinute;
    use crate::keyboard::press_bus::KeyPressBus;
    use std::time::Duration;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    fn buffer_text(buf: &Buffer) -> String {
        (0..buf.area.height)
            .map(|y| row_text(buf, y))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_tile_text_hides_zero_speed() {
        assert_eq!(
            tile_text("a", 0),
            TileText {
                label: "a".to_string(),
                readout: None
            }
        );
        assert_eq!(tile_text("a", 72).readout.as_deref(), Some("72 WPM"));
    }

    #[test]
    fn test_centered_pads_and_truncates() {
        assert_eq!(centered("ab", 6), "  ab  ");
        assert_eq!(centered("abc", 6), " abc  ");
        assert_eq!(centered("abcdefgh", 4), "abcd");
    }

    #[test]
    fn test_four_digit_speed_keeps_every_digit() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, TILE_WIDTH - 1, 2);
        let mut buf = Buffer::empty(area);
        // A single 10ms rollover sample: 5 * 60_000 / 50 = 1200 WPM
        let rollover = KeyStat { count: 1, total_time: 10.0 };
        KeyStatTile::new("e", rollover, false, &WordsPerMinute, &theme).render(area, &mut buf);
        assert_eq!(row_text(&buf, 1), " 1200  ");

        let mut buf = Buffer::empty(area);
        let fast = KeyStat { count: 1, total_time: 30.0 };
        KeyStatTile::new("e", fast, false, &WordsPerMinute, &theme).render(area, &mut buf);
        assert_eq!(row_text(&buf, 1), "400 WPM");
    }

    #[test]
    fn test_fit_readout() {
        assert_eq!(fit_readout(Some("72 WPM".to_string()), 72, 7), "72 WPM");
        assert_eq!(fit_readout(Some("60000 WPM".to_string()), 60_000, 7), "60000");
        assert_eq!(fit_readout(None, 0, 7), "");
    }

    #[test]
    fn test_tile_colors_follow_label_and_press() {
        let theme = Theme::default();
        let colors = &theme.colors;
        let fast = KeyStat { count: 5, total_time: 600.0 };

        let tile = KeyStatTile::new("a", fast, false, &WordsPerMinute, &theme);
        assert_eq!(tile.label(), SpeedLabel::Fast);
        assert_eq!(tile.style().bg, Some(colors.key_label_bg(SpeedLabel::Fast)));

        let pressed = KeyStatTile::new("a", fast, true, &WordsPerMinute, &theme);
        assert_eq!(pressed.style().bg, Some(colors.key_pressed()));

        let untyped = KeyStatTile::new("a", KeyStat::default(), false, &WordsPerMinute, &theme);
        assert_eq!(untyped.style().bg, Some(colors.key_bg()));
    }

    #[test]
    fn test_tile_renders_readout_only_when_typed() {
        let theme = Theme::default();
        let area = Rect::new(0, 0, 7, 2);

        let mut buf = Buffer::empty(area);
        let slow = KeyStat { count: 5, total_time: 2000.0 };
        KeyStatTile::new("k", slow, false, &WordsPerMinute, &theme).render(area, &mut buf);
        assert_eq!(row_text(&buf, 0), "   k   ");
        assert_eq!(row_text(&buf, 1), "30 WPM ");

        let mut buf = Buffer::empty(area);
        KeyStatTile::new("k", KeyStat::default(), false, &WordsPerMinute, &theme)
            .render(area, &mut buf);
        assert_eq!(row_text(&buf, 1).trim(), "");
    }

    #[test]
    fn test_view_renders_every_scheme_key() {
        let theme = Theme::default();
        let bus = KeyPressBus::new();
        let keyboard = KeyboardState::new("qwerty", &bus);
        let mut record = KeyStatRecord::for_all_schemes();
        record.record("f", 150.0);

        let area = Rect::new(0, 0, 90, 8);
        let mut buf = Buffer::empty(area);
        KeyStatsView::new(&keyboard, &record, &WordsPerMinute, &theme, Instant::now())
            .render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("QWERTY"));
        for key in ["q", "p", "a", "l", "z", "m"] {
            assert!(text.contains(&format!(" {key} ")), "missing {key}\n{text}");
        }
        // One sample of 150ms: 5 * 60_000 / 750 = 80 WPM
        assert!(text.contains("80 WPM"), "{text}");
    }

    #[test]
    fn test_view_marks_pressed_tile() {
        let theme = Theme::default();
        let bus = KeyPressBus::new();
        let keyboard = KeyboardState::new("qwerty", &bus);
        let record = KeyStatRecord::for_all_schemes();
        let t0 = Instant::now();
        bus.dispatch("q", t0);

        let area = Rect::new(0, 0, 90, 8);
        let render_at = |now: Instant| {
            let mut buf = Buffer::empty(area);
            KeyStatsView::new(&keyboard, &record, &WordsPerMinute, &theme, now)
                .render(area, &mut buf);
            buf
        };

        // First tile of the first row sits right inside the border.
        let buf = render_at(t0 + Duration::from_millis(50));
        assert_eq!(buf[(1, 1)].bg, theme.colors.key_pressed());

        let buf = render_at(t0 + Duration::from_millis(100));
        assert_eq!(buf[(1, 1)].bg, theme.colors.key_bg());
    }

    #[test]
    fn test_view_compacts_in_small_area() {
        let theme = Theme::default();
        let bus = KeyPressBus::new();
        let keyboard = KeyboardState::new("qwerty", &bus);
        let mut record = KeyStatRecord::for_all_schemes();
        record.record("a", 100.0);

        let area = Rect::new(0, 0, 50, 5);
        let mut buf = Buffer::empty(area);
        KeyStatsView::new(&keyboard, &record, &WordsPerMinute, &theme, Instant::now())
            .render(area, &mut buf);
        let text = buffer_text(&buf);
        assert!(text.contains(" q "));
        assert!(!text.contains("WPM"));
    }

    #[test]
    fn test_view_skips_tiny_area() {
        let theme = Theme::default();
        let bus = KeyPressBus::new();
        let keyboard = KeyboardState::new("qwerty", &bus);
        let record = KeyStatRecord::for_all_schemes();
        let area = Rect::new(0, 0, 20, 4);
        let mut buf = Buffer::empty(area);
        KeyStatsView::new(&keyboard, &record, &WordsPerMinute, &theme, Instant::now())
            .render(area, &mut buf);
        assert!(!buffer_text(&buf).contains(" q "));
    }
}
