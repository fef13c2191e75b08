//! Animated loading indicator shown while the first fetch is pending.

use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use std::time::{Duration, Instant};
use storefront_core::{subscribe, Command, Component, Every, Subscription};

pub mod frames {
    /// Braille dot spinner cycling through ten positions.
    pub const DOTS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    /// ASCII fallback for terminals without braille glyphs.
    pub const LINE: &[&str] = &["|", "/", "-", "\\"];
}

#[derive(Debug, Clone)]
pub enum Message {
    /// Advance to the next frame.
    Tick,
}

/// A spinner with a caption. It animates only while spinning; the timer
/// subscription disappears when it stops.
pub struct Spinner {
    frames: &'static [&'static str],
    frame_index: usize,
    title: String,
    style: Style,
    interval: Duration,
    spinning: bool,
    id: &'static str,
}

impl Spinner {
    /// Create a spinner whose timer is keyed by `id`.
    pub fn new(id: &'static str) -> Self {
        Self {
            frames: frames::DOTS,
            frame_index: 0,
            title: String::new(),
            style: Style::default().fg(Color::Cyan),
            interval: Duration::from_millis(80),
            spinning: true,
            id,
        }
    }

    pub fn with_frames(mut self, frames: &'static [&'static str]) -> Self {
        self.frames = frames;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn start(&mut self) {
        self.spinning = true;
    }

    pub fn stop(&mut self) {
        self.spinning = false;
        self.frame_index = 0;
    }

    pub fn is_spinning(&self) -> bool {
        self.spinning
    }

    /// The glyph currently shown.
    pub fn current_frame(&self) -> &'static str {
        self.frames.get(self.frame_index).copied().unwrap_or("")
    }
}

impl Component for Spinner {
    type Message = Message;

    fn update(&mut self, msg: Message) -> Command<Message> {
        match msg {
            Message::Tick => {
                if self.spinning && !self.frames.is_empty() {
                    self.frame_index = (self.frame_index + 1) % self.frames.len();
                }
                Command::none()
            }
        }
    }

    fn view(&self, frame: &mut Frame, area: Rect) {
        if !self.spinning || area.width == 0 || area.height == 0 {
            return;
        }
        let line = Line::from(vec![
            Span::styled(self.current_frame(), self.style),
            Span::raw(" "),
            Span::raw(self.title.as_str()),
        ])
        .centered();
        frame.render_widget(Paragraph::new(line), area);
    }

    fn subscriptions(&self) -> Vec<Subscription<Message>> {
        if self.spinning {
            vec![subscribe(Every::new(self.interval, self.id)).map(|_: Instant| Message::Tick)]
        } else {
            vec![]
        }
    }
}
