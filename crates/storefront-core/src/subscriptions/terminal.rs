use crate::event::TerminalEvent;
use crate::subscription::{Subscription, SubscriptionId};
use crossterm::event::EventStream;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;

struct TerminalEvents;

/// Subscribe to terminal input, mapping each event to an optional message.
///
/// ```rust,ignore
/// terminal_events(|event| match event {
///     TerminalEvent::Key(key) => Some(Msg::Key(key)),
///     _ => None,
/// })
/// ```
pub fn terminal_events<Msg: Send + 'static>(
    map: impl Fn(TerminalEvent) -> Option<Msg> + Send + Sync + 'static,
) -> Subscription<Msg> {
    let map = Arc::new(map);
    Subscription {
        id: SubscriptionId::of::<TerminalEvents>(),
        spawn: Box::new(move |tx: mpsc::UnboundedSender<Msg>| {
            tokio::spawn(async move {
                // Built inside the task: constructing an EventStream on every
                // `subscriptions()` call would fight the live one for input.
                let mut events = EventStream::new();
                while let Some(event) = events.next().await {
                    let Ok(event) = event else { continue };
                    if let Some(msg) = map(TerminalEvent::from(event)) {
                        if tx.send(msg).is_err() {
                            break;
                        }
                    }
                }
            })
            .abort_handle()
        }),
    }
}
