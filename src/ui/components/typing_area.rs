use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::session::input::CharStatus;
use crate::session::practice::PracticeState;
use crate::ui::theme::Theme;

pub struct TypingArea<'a> {
    practice: &'a PracticeState,
    theme: &'a Theme,
}

impl<'a> TypingArea<'a> {
    pub fn new(practice: &'a PracticeState, theme: &'a Theme) -> Self {
        Self { practice, theme }
    }
}

/// Text shown for position `idx`: the typed char when it was wrong, so the
/// mistake is visible. A wrong space shows as a middle dot.
fn display_char(practice: &PracticeState, idx: usize) -> String {
    match practice.input.get(idx) {
        Some(CharStatus::Incorrect(' ')) => "\u{00b7}".to_string(),
        Some(CharStatus::Incorrect(actual)) if practice.target[idx] != ' ' => actual.to_string(),
        Some(CharStatus::Incorrect(_)) => "\u{00b7}".to_string(),
        _ => practice.target[idx].to_string(),
    }
}

impl Widget for TypingArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let spans: Vec<Span> = (0..self.practice.target.len())
            .map(|idx| {
                let style = if idx < self.practice.cursor {
                    match &self.practice.input[idx] {
                        CharStatus::Correct => Style::default().fg(colors.text_correct()),
                        CharStatus::Incorrect(_) => Style::default()
                            .fg(colors.text_incorrect())
                            .bg(colors.text_incorrect_bg())
                            .add_modifier(Modifier::UNDERLINED),
                    }
                } else if idx == self.practice.cursor {
                    Style::default()
                        .fg(colors.text_cursor_fg())
                        .bg(colors.text_cursor_bg())
                } else {
                    Style::default().fg(colors.text_pending())
                };
                Span::styled(display_char(self.practice, idx), style)
            })
            .collect();

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        Paragraph::new(Line::from(spans))
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn practice_with(target: &str, typed: &[CharStatus]) -> PracticeState {
        let mut practice = PracticeState::new(target);
        practice.input = typed.to_vec();
        practice.cursor = typed.len();
        practice
    }

    #[test]
    fn test_display_pending_and_correct() {
        let practice = practice_with("ab", &[CharStatus::Correct]);
        assert_eq!(display_char(&practice, 0), "a");
        assert_eq!(display_char(&practice, 1), "b");
    }

    #[test]
    fn test_display_shows_mistyped_char() {
        let practice = practice_with("ab", &[CharStatus::Incorrect('x')]);
        assert_eq!(display_char(&practice, 0), "x");
    }

    #[test]
    fn test_display_wrong_space_as_dot() {
        let practice = practice_with(
            "a b",
            &[CharStatus::Correct, CharStatus::Incorrect('q')],
        );
        assert_eq!(display_char(&practice, 1), "\u{00b7}");
        let practice = practice_with("ab", &[CharStatus::Incorrect(' ')]);
        assert_eq!(display_char(&practice, 0), "\u{00b7}");
    }

    #[test]
    fn test_render_shows_target_text() {
        let theme = Theme::default();
        let practice = practice_with("hello world", &[CharStatus::Correct]);
        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);
        TypingArea::new(&practice, &theme).render(area, &mut buf);
        let line: String = (1..12).map(|x| buf[(x, 1)].symbol().to_string()).collect();
        assert_eq!(line, "hello world");
        assert_eq!(buf[(2, 1)].bg, theme.colors.text_cursor_bg());
    }
}
