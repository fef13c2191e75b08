use crate::command::Command;
use crate::subscription::Subscription;
use ratatui::{layout::Rect, Frame};

/// A reusable sub-model that renders into a region chosen by its parent.
///
/// A parent wraps the component's message type in one of its own variants
/// and uses [`Command::map`] / [`Subscription::map`] to lift the child's
/// effects:
///
/// ```rust,ignore
/// Msg::Search(m) => self.search.update(m).map(Msg::Search),
/// ```
pub trait Component: Send + 'static {
    /// The component's internal message type.
    type Message: Send + 'static;

    /// Handle a message and return any follow-up command.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Render into `area`.
    fn view(&self, frame: &mut Frame, area: Rect);

    /// Subscriptions for the component's current state.
    fn subscriptions(&self) -> Vec<Subscription<Self::Message>> {
        vec![]
    }
}
