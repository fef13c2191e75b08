//! The always-focused, single-line search box bound to the live term.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};
use ratatui::Frame;
use storefront_core::{Command, Component};

#[derive(Debug, Clone)]
struct SearchInputStyle {
    border: Style,
    prompt: Style,
    text: Style,
    placeholder: Style,
    cursor: Style,
}

impl Default for SearchInputStyle {
    fn default() -> Self {
        Self {
            border: Style::default().fg(Color::Cyan),
            prompt: Style::default().fg(Color::Cyan),
            text: Style::default(),
            placeholder: Style::default().fg(Color::DarkGray),
            cursor: Style::default().add_modifier(Modifier::REVERSED),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    KeyPress(KeyEvent),
    Paste(String),
    /// Emitted after every edit with the new raw value.
    Changed(String),
}

/// Search box. Every edit emits [`Message::Changed`] immediately; there is
/// no debounce and no submit step.
pub struct SearchInput {
    value: Vec<char>,
    cursor: usize,
    placeholder: String,
    prompt: String,
    style: SearchInputStyle,
}

impl SearchInput {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            value: Vec::new(),
            cursor: 0,
            placeholder: placeholder.into(),
            prompt: "/ ".to_string(),
            style: SearchInputStyle::default(),
        }
    }

    /// The raw term exactly as typed.
    pub fn value(&self) -> String {
        self.value.iter().collect()
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    fn changed(&self) -> Command<Message> {
        Command::message(Message::Changed(self.value()))
    }

    fn insert(&mut self, text: &str) -> Command<Message> {
        let chars: Vec<char> = text.chars().filter(|c| !c.is_control()).collect();
        if chars.is_empty() {
            return Command::none();
        }
        let count = chars.len();
        self.value.splice(self.cursor..self.cursor, chars);
        self.cursor += count;
        self.changed()
    }

    fn delete_backward(&mut self) -> Command<Message> {
        if self.cursor == 0 {
            return Command::none();
        }
        self.cursor -= 1;
        self.value.remove(self.cursor);
        self.changed()
    }

    fn delete_forward(&mut self) -> Command<Message> {
        if self.cursor >= self.value.len() {
            return Command::none();
        }
        self.value.remove(self.cursor);
        self.changed()
    }

    fn delete_word_backward(&mut self) -> Command<Message> {
        if self.cursor == 0 {
            return Command::none();
        }
        let mut start = self.cursor;
        while start > 0 && self.value[start - 1] == ' ' {
            start -= 1;
        }
        while start > 0 && self.value[start - 1] != ' ' {
            start -= 1;
        }
        self.value.drain(start..self.cursor);
        self.cursor = start;
        self.changed()
    }

    fn delete_to_start(&mut self) -> Command<Message> {
        if self.cursor == 0 {
            return Command::none();
        }
        self.value.drain(..self.cursor);
        self.cursor = 0;
        self.changed()
    }
}

impl Component for SearchInput {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::KeyPress(key) => match (key.code, key.modifiers) {
                (KeyCode::Char('w'), m) if m.contains(KeyModifiers::CONTROL) => {
                    self.delete_word_backward()
                }
                (KeyCode::Backspace, m) if m.contains(KeyModifiers::ALT) => {
                    self.delete_word_backward()
                }
                (KeyCode::Char('u'), m) if m.contains(KeyModifiers::CONTROL) => {
                    self.delete_to_start()
                }
                (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
                    let mut buf = [0u8; 4];
                    self.insert(c.encode_utf8(&mut buf))
                }
                (KeyCode::Backspace, _) => self.delete_backward(),
                (KeyCode::Delete, _) => self.delete_forward(),
                (KeyCode::Left, _) => {
                    self.cursor = self.cursor.saturating_sub(1);
                    Command::none()
                }
                (KeyCode::Right, _) => {
                    self.cursor = (self.cursor + 1).min(self.value.len());
                    Command::none()
                }
                (KeyCode::Home, _) => {
                    self.cursor = 0;
                    Command::none()
                }
                (KeyCode::Char('a'), m) if m.contains(KeyModifiers::CONTROL) => {
                    self.cursor = 0;
                    Command::none()
                }
                (KeyCode::End, _) => {
                    self.cursor = self.value.len();
                    Command::none()
                }
                (KeyCode::Char('e'), m) if m.contains(KeyModifiers::CONTROL) => {
                    self.cursor = self.value.len();
                    Command::none()
                }
                _ => Command::none(),
            },
            // Pasted newlines would otherwise be dropped as control chars
            // and glue words together.
            Message::Paste(text) => self.insert(&text.replace(['\n', '\r', '\t'], " ")),
            // Outgoing only; the parent owns the term.
            Message::Changed(_) => Command::none(),
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(self.style.border)
            .title(" Search ");
        let inner = block.inner(area);
        frame.render_widget(block, area);
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let available = (inner.width as usize)
            .saturating_sub(self.prompt.chars().count())
            .max(1);
        // Keep the cursor cell on screen.
        let offset = (self.cursor + 1).saturating_sub(available);

        let mut spans = vec![Span::styled(self.prompt.as_str(), self.style.prompt)];
        if self.value.is_empty() {
            spans.push(Span::styled(" ", self.style.cursor));
            spans.push(Span::styled(self.placeholder.as_str(), self.style.placeholder));
        } else {
            let end = (offset + available).min(self.value.len());
            let before: String = self.value[offset..self.cursor].iter().collect();
            let under = self.value.get(self.cursor).map_or(" ".to_string(), char::to_string);
            let after: String = self
                .value
                .get(self.cursor + 1..end)
                .map(|chars| chars.iter().collect())
                .unwrap_or_default();
            spans.push(Span::styled(before, self.style.text));
            spans.push(Span::styled(under, self.style.cursor));
            spans.push(Span::styled(after, self.style.text));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), inner);
    }
}
