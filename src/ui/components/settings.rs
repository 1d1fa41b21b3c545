use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::config::Config;
use crate::keyboard::scheme;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsField {
    KeyboardScheme,
    Theme,
    WordCount,
}

impl SettingsField {
    pub const ALL: [SettingsField; 3] = [
        SettingsField::KeyboardScheme,
        SettingsField::Theme,
        SettingsField::WordCount,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SettingsField::KeyboardScheme => "Keyboard Scheme",
            SettingsField::Theme => "Theme",
            SettingsField::WordCount => "Word Count",
        }
    }

    pub fn value(self, config: &Config) -> String {
        match self {
            SettingsField::KeyboardScheme => scheme::find_scheme(&config.keyboard_scheme)
                .name
                .to_string(),
            SettingsField::Theme => config.theme.clone(),
            SettingsField::WordCount => config.word_count.to_string(),
        }
    }
}

pub struct SettingsView<'a> {
    config: &'a Config,
    selected: usize,
    theme: &'a Theme,
}

impl<'a> SettingsView<'a> {
    pub fn new(config: &'a Config, selected: usize, theme: &'a Theme) -> Self {
        Self {
            config,
            selected,
            theme,
        }
    }
}

impl Widget for SettingsView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Settings ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let fields = SettingsField::ALL;
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(fields.len() as u16 * 3),
                Constraint::Min(0),
                Constraint::Length(2),
            ])
            .split(inner);

        Paragraph::new(Line::from(Span::styled(
            "  Use arrows to navigate, Enter/Right to change, ESC to save & exit",
            Style::default().fg(colors.text_pending()),
        )))
        .render(layout[0], buf);

        let field_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(fields.iter().map(|_| Constraint::Length(3)).collect::<Vec<_>>())
            .split(layout[1]);

        for (i, field) in fields.iter().enumerate() {
            let is_selected = i == self.selected;
            let indicator = if is_selected { " > " } else { "   " };

            let label_style = Style::default()
                .fg(if is_selected { colors.accent() } else { colors.fg() })
                .add_modifier(if is_selected {
                    Modifier::BOLD
                } else {
                    Modifier::empty()
                });
            let value_style = Style::default().fg(if is_selected {
                colors.fg()
            } else {
                colors.text_pending()
            });

            let lines = vec![
                Line::from(Span::styled(
                    format!("{indicator}{}:", field.label()),
                    label_style,
                )),
                Line::from(Span::styled(
                    format!("  < {} >", field.value(self.config)),
                    value_style,
                )),
            ];
            Paragraph::new(lines).render(field_layout[i], buf);
        }

        Paragraph::new(Line::from(Span::styled(
            "  [ESC] Save & back  [Enter/arrows] Change value",
            Style::default().fg(colors.accent()),
        )))
        .render(layout[3], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_values() {
        let mut config = Config::default();
        config.keyboard_scheme = "dvorak".to_string();
        config.word_count = 30;
        assert_eq!(SettingsField::KeyboardScheme.value(&config), "Dvorak");
        assert_eq!(SettingsField::WordCount.value(&config), "30");
        assert_eq!(SettingsField::Theme.value(&config), "terminal-default");
    }

    #[test]
    fn test_render_marks_selected_field() {
        let theme = Theme::default();
        let config = Config::default();
        let area = Rect::new(0, 0, 80, 16);
        let mut buf = Buffer::empty(area);
        SettingsView::new(&config, 1, &theme).render(area, &mut buf);

        let text: String = (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n");
        assert!(text.contains(" > Theme:"), "{text}");
        assert!(text.contains("   Keyboard Scheme:"));
        assert!(text.contains("< QWERTY >"));
    }
}
