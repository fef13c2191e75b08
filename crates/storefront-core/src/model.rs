use crate::command::Command;
use crate::subscription::Subscription;
use ratatui::Frame;

/// The top-level application trait.
///
/// The runtime drives an **init -> update -> view** cycle:
///
/// 1. [`init`](Model::init) builds the initial state and may return a
///    [`Command`] for startup work (the catalog fetch, for instance).
/// 2. [`view`](Model::view) draws the current state into a [`Frame`].
/// 3. Events arrive as messages through [`Subscription`]s or as the results
///    of earlier commands.
/// 4. [`update`](Model::update) handles one message and may return another
///    [`Command`].
/// 5. Steps 2-4 repeat until a [`Command::quit`] is returned.
pub trait Model: Sized + Send + 'static {
    /// Every event that can affect the application state.
    type Message: Send + 'static;

    /// Startup data handed to [`Model::init`].
    type Flags: Send + 'static;

    /// Create the initial state and a startup command.
    fn init(flags: Self::Flags) -> (Self, Command<Self::Message>);

    /// Handle one message, mutate state, and describe any follow-up work.
    fn update(&mut self, msg: Self::Message) -> Command<Self::Message>;

    /// Render the current state. Must not mutate observable state.
    fn view(&self, frame: &mut Frame);

    /// Subscriptions that should be active for the current state.
    ///
    /// Called after every update; the runtime starts new ones and stops the
    /// ones that disappeared from the list.
    fn subscriptions(&self) -> Vec<Subscription<Self::Message>> {
        vec![]
    }
}
