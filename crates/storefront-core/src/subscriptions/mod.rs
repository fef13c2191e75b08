//! Built-in subscription sources: terminal input and repeating timers.

mod terminal;
mod timer;

pub use terminal::terminal_events;
pub use timer::Every;
