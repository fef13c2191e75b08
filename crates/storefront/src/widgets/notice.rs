//! The two non-grid outcomes of a fetch: the error banner and the empty
//! search result.

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap};

pub const ERROR_HEADING: &str = "An error occurred while fetching products";

/// Red alert box: bold heading, then the failure message verbatim.
pub struct ErrorBanner<'a> {
    message: &'a str,
}

impl<'a> ErrorBanner<'a> {
    pub fn new(message: &'a str) -> Self {
        Self { message }
    }
}

impl Widget for ErrorBanner<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let red = Style::default().fg(Color::Red);
        let text = vec![
            Line::from(Span::styled(ERROR_HEADING, red.add_modifier(Modifier::BOLD))),
            Line::from(Span::styled(self.message, red)),
            Line::default(),
            Line::from(Span::styled(
                "Press Ctrl+R to try again.",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        // Heading, message, blank, hint, plus the border.
        let [banner] = Layout::vertical([Constraint::Length(6)]).areas(area);
        Paragraph::new(text)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Thick)
                    .border_style(red)
                    .title(" Error "),
            )
            .render(banner, buf);
    }
}

/// Centred "nothing matched" message echoing the raw term.
pub struct EmptyState<'a> {
    term: &'a str,
}

impl<'a> EmptyState<'a> {
    pub fn new(term: &'a str) -> Self {
        Self { term }
    }

    pub fn message(&self) -> String {
        format!("No products found for \"{}\"", self.term)
    }
}

impl Widget for EmptyState<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [_, middle, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(2),
            Constraint::Fill(1),
        ])
        .areas(area);
        Paragraph::new(vec![
            Line::from(self.message()).centered(),
            Line::from(Span::styled(
                "Try a different name, category, or brand.",
                Style::default().fg(Color::DarkGray),
            ))
            .centered(),
        ])
        .wrap(Wrap { trim: true })
        .render(middle, buf);
    }
}
