//! Request state for the product listing.
//!
//! [`ProductQuery`] is the in-process cache in front of a
//! [`ProductSource`](crate::ProductSource): it tracks the visible
//! [`FetchState`], when data was last fetched (the freshness window), and
//! which request is the latest one issued so that late responses from
//! superseded requests are dropped.

use crate::error::FetchError;
use crate::product::{ProductCollection, ProductPage};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Identifies one issued fetch. Ids increase monotonically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

/// What the page should show. Exactly one is current.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState {
    Pending,
    Failed(String),
    Succeeded(Arc<ProductCollection>),
}

/// Whether an issued fetch replaces what is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// No data to show yet; the page shows the loading state.
    Foreground,
    /// Data stays on screen until the new response arrives.
    Background,
}

/// Outcome of handing a response to [`ProductQuery::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The response was the latest issued and is now the current state.
    Applied,
    /// A newer request was issued after this one; the response was dropped.
    Superseded,
}

#[derive(Debug)]
pub struct ProductQuery {
    state: FetchState,
    stale_after: Duration,
    fetched_at: Option<Instant>,
    issued: u64,
    in_flight: Option<RequestId>,
}

impl ProductQuery {
    pub fn new(stale_after: Duration) -> Self {
        Self {
            state: FetchState::Pending,
            stale_after,
            fetched_at: None,
            issued: 0,
            in_flight: None,
        }
    }

    /// Issue a new request id. Any response to an earlier id will be
    /// discarded from now on.
    pub fn begin(&mut self) -> (RequestId, FetchKind) {
        self.issued += 1;
        let id = RequestId(self.issued);
        self.in_flight = Some(id);

        let kind = if matches!(self.state, FetchState::Succeeded(_)) {
            FetchKind::Background
        } else {
            self.state = FetchState::Pending;
            FetchKind::Foreground
        };
        tracing::info!(request = id.0, ?kind, "product fetch issued");
        (id, kind)
    }

    /// Apply the response to `id` if it is still the latest request.
    pub fn resolve(
        &mut self,
        id: RequestId,
        result: Result<ProductPage, FetchError>,
        now: Instant,
    ) -> Resolution {
        if self.in_flight != Some(id) {
            tracing::debug!(request = id.0, latest = self.issued, "discarding superseded response");
            return Resolution::Superseded;
        }
        self.in_flight = None;

        match result {
            Ok(page) => {
                tracing::info!(request = id.0, products = page.products.len(), "product fetch succeeded");
                self.state = FetchState::Succeeded(Arc::new(page.products));
                self.fetched_at = Some(now);
            }
            Err(err) => {
                tracing::warn!(request = id.0, error = %err, "product fetch failed");
                self.state = FetchState::Failed(err.to_string());
                self.fetched_at = None;
            }
        }
        Resolution::Applied
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    /// The collection currently on screen, if any.
    pub fn products(&self) -> Option<&Arc<ProductCollection>> {
        match &self.state {
            FetchState::Succeeded(products) => Some(products),
            _ => None,
        }
    }

    pub fn is_fetching(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Succeeded data younger than the freshness window.
    pub fn is_fresh(&self, now: Instant) -> bool {
        self.products().is_some()
            && self
                .fetched_at
                .is_some_and(|at| now.saturating_duration_since(at) < self.stale_after)
    }

    /// Whether a silent background refetch is due: data is on screen, the
    /// window has elapsed, and nothing is already in flight. Failed fetches
    /// never qualify; they wait for an explicit refresh.
    pub fn should_refetch(&self, now: Instant) -> bool {
        self.products().is_some() && !self.is_fresh(now) && !self.is_fetching()
    }

    /// Mark the current data stale immediately.
    pub fn invalidate(&mut self) {
        self.fetched_at = None;
    }
}
