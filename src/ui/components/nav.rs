use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::ui::theme::Theme;

pub const APP_NAME: &str = "Fast Type";
pub const GITHUB_URL: &str = "https://github.com/solomonshalom/FastType";
pub const TWITTER_URL: &str = "https://twitter.com/shalomlijo";

/// Project links shown on the right of the nav bar, as (label, url).
pub const LINKS: &[(&str, &str)] = &[("github", GITHUB_URL), ("twitter", TWITTER_URL)];

/// Top bar: app name on the left, project links on the right.
pub struct NavBar<'a> {
    status: Option<String>,
    theme: &'a Theme,
}

impl<'a> NavBar<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self {
            status: None,
            theme,
        }
    }

    /// Extra text after the app name, e.g. live WPM.
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}

impl Widget for NavBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let bar = Style::default().fg(colors.header_fg()).bg(colors.header_bg());

        let mut left = vec![Span::styled(
            format!(" {APP_NAME} "),
            bar.add_modifier(Modifier::BOLD),
        )];
        if let Some(status) = &self.status {
            left.push(Span::styled(
                format!("| {status}"),
                Style::default().fg(colors.text_pending()).bg(colors.header_bg()),
            ));
        }
        Paragraph::new(Line::from(left))
            .style(bar)
            .render(area, buf);

        let links = LINKS
            .iter()
            .map(|(label, _)| *label)
            .collect::<Vec<_>>()
            .join("  ");
        let links = format!("{links} ");
        let width = links.chars().count() as u16;
        if area.height == 0 || width >= area.width {
            return;
        }
        buf.set_string(
            area.x + area.width - width,
            area.y,
            &links,
            Style::default().fg(colors.accent()).bg(colors.header_bg()),
        );
    }
}

/// Bottom line: key hints followed by the project link URLs.
pub struct HelpFooter<'a> {
    hints: &'a str,
    theme: &'a Theme,
}

impl<'a> HelpFooter<'a> {
    pub fn new(hints: &'a str, theme: &'a Theme) -> Self {
        Self { hints, theme }
    }
}

impl Widget for HelpFooter<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let mut spans = vec![Span::styled(
            self.hints,
            Style::default().fg(colors.text_pending()),
        )];
        for (i, (_, url)) in LINKS.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("  ", Style::default().fg(colors.text_pending())));
            }
            spans.push(Span::styled(*url, Style::default().fg(colors.accent())));
        }
        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
