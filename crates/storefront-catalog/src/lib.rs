//! Catalog domain for **storefront**.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`product`] | [`Product`], [`ProductCollection`] and the listing envelope |
//! | [`fetch`] | [`ProductSource`] seam and its HTTP implementation |
//! | [`query`] | [`ProductQuery`]: fetch state, freshness window, latest-wins |
//! | [`filter`] | Case-insensitive search and the [`FilterMemo`] cache |
//! | [`thumbnail`] | Card image download, decode and placeholder fallback |
//! | [`config`] | [`StorefrontConfig`] loaded from TOML |
//! | [`error`] | Error enums per failure domain |

pub mod config;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod product;
pub mod query;
pub mod thumbnail;

pub use config::StorefrontConfig;
pub use error::{ConfigError, FetchError, ImageLoadError};
pub use fetch::{http_client, HttpProductSource, ProductSource};
pub use filter::{filter, FilterMemo, FilteredView};
pub use product::{Product, ProductCollection, ProductId, ProductPage};
pub use query::{FetchKind, FetchState, ProductQuery, RequestId, Resolution};
pub use thumbnail::{
    HttpThumbnailSource, ImageFallback, ImageState, ImageVariant, Thumbnail, ThumbnailSource,
};
