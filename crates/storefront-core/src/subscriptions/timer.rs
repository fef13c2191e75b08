use crate::subscription::{SubscriptionId, SubscriptionSource};
use futures::stream::BoxStream;
use futures::StreamExt;
use std::time::{Duration, Instant};
use tokio::time::MissedTickBehavior;

/// A repeating timer emitting the current [`Instant`] on every tick.
///
/// The `id` keeps several timers apart (for example the spinner animation
/// and the freshness check).
///
/// ```rust,ignore
/// subscribe(Every::new(Duration::from_secs(1), "freshness")).map(Msg::FreshnessTick)
/// ```
pub struct Every {
    /// The interval between ticks.
    pub interval: Duration,
    /// Distinguishes this timer from other `Every` subscriptions.
    pub id: &'static str,
}

impl Every {
    /// Create a new repeating timer.
    pub fn new(interval: Duration, id: &'static str) -> Self {
        Self { interval, id }
    }
}

impl SubscriptionSource for Every {
    type Output = Instant;

    fn id(&self) -> SubscriptionId {
        SubscriptionId::with_str::<Self>(self.id)
    }

    fn stream(self) -> BoxStream<'static, Instant> {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        Box::pin(
            tokio_stream::wrappers::IntervalStream::new(interval).map(|tick| tick.into_std()),
        )
    }
}
