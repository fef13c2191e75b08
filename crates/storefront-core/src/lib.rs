//! Terminal runtime for the **storefront** catalog viewer.
//!
//! The application is written as an [Elm Architecture] program: a pure
//! **init -> update -> view** cycle, with every side effect (HTTP requests,
//! timers, terminal input) pushed to the edges through [`Command`]s and
//! [`Subscription`]s.
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`Model`] | Top-level application trait (init / update / view) |
//! | [`Component`] | Reusable sub-model rendering into a [`ratatui::layout::Rect`] |
//! | [`Command`] | Side effect executed by the runtime |
//! | [`Subscription`] | Long-lived event source (terminal input, timers) |
//! | [`Program`] | Drives a [`Model`] on the real terminal |
//! | [`TestProgram`](testing::TestProgram) | Headless harness for tests |
//!
//! [Elm Architecture]: https://guide.elm-lang.org/architecture/

pub mod command;
pub mod component;
pub mod event;
pub mod model;
pub mod runtime;
pub mod subscription;
pub mod subscriptions;
pub mod testing;

pub use command::Command;
pub use component::Component;
pub use event::TerminalEvent;
pub use model::Model;
pub use runtime::{Program, ProgramError, ProgramOptions};
pub use subscription::{subscribe, Subscription, SubscriptionId, SubscriptionSource};
pub use subscriptions::{terminal_events, Every};

/// Run a model on the terminal with the given options.
pub async fn run_with<M: Model>(flags: M::Flags, options: ProgramOptions) -> Result<M, ProgramError> {
    Program::<M>::with_options(flags, options)?.run().await
}
