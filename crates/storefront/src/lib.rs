//! **storefront**: a terminal catalog viewer.
//!
//! Fetches the product listing once on start, filters it client-side as
//! you type, and lays the matches out as a responsive card grid. The page
//! is a [`Storefront`] model run by [`storefront_core`]; the catalog logic
//! lives in [`storefront_catalog`].

pub mod app;
pub mod widgets;

pub use app::{Flags, Msg, Storefront};
