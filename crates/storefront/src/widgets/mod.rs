//! Widgets that make up the catalog page.
//!
//! | Widget | Kind | Role |
//! |--------|------|------|
//! | [`SearchInput`] | component | live search term |
//! | [`Spinner`] | component | loading indicator |
//! | [`CardGrid`] | component | scrolling grid, per-card image state |
//! | [`ProductCard`] | widget | one product |
//! | [`ErrorBanner`] / [`EmptyState`] | widget | fetch failure, no matches |

pub mod card_grid;
pub mod notice;
pub mod product_card;
pub mod search_input;
pub mod spinner;
pub mod text;

pub use card_grid::CardGrid;
pub use notice::{EmptyState, ErrorBanner};
pub use product_card::ProductCard;
pub use search_input::SearchInput;
pub use spinner::Spinner;
