use crate::config::StorefrontConfig;
use crate::error::{ConfigError, FetchError};
use crate::product::ProductPage;
use async_trait::async_trait;
use std::time::Duration;

/// Where the product listing comes from.
///
/// The app only ever talks to this trait; tests substitute an in-memory
/// source.
#[async_trait]
pub trait ProductSource: Send + Sync {
    async fn fetch_products(&self) -> Result<ProductPage, FetchError>;
}

/// Builds the reqwest client shared by the product and thumbnail sources.
pub fn http_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(5))
        .timeout(timeout)
        .user_agent(concat!("storefront/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Fetches the listing over HTTP with a single GET.
pub struct HttpProductSource {
    client: reqwest::Client,
    url: reqwest::Url,
}

impl HttpProductSource {
    /// Fails if the configured endpoint is not an absolute URL. A query
    /// string already on the endpoint is kept ahead of the listing
    /// parameters.
    pub fn new(client: reqwest::Client, config: &StorefrontConfig) -> Result<Self, ConfigError> {
        let mut url = reqwest::Url::parse(config.endpoint.trim()).map_err(|e| {
            ConfigError::Invalid(format!("endpoint {:?} is not a valid URL: {e}", config.endpoint))
        })?;
        // Written raw so `select` stays a plain comma-separated list.
        let listing = config
            .query_params()
            .into_iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&");
        let query = match url.query().filter(|existing| !existing.is_empty()) {
            Some(existing) => format!("{existing}&{listing}"),
            None => listing,
        };
        url.set_query(Some(&query));
        Ok(Self { client, url })
    }

    /// The full request URL, query string included.
    pub fn url(&self) -> &str {
        self.url.as_str()
    }
}

#[async_trait]
impl ProductSource for HttpProductSource {
    async fn fetch_products(&self) -> Result<ProductPage, FetchError> {
        tracing::info!(url = %self.url, "fetching products");

        let response = self
            .client
            .get(self.url.clone())
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Network {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        let page: ProductPage =
            serde_json::from_slice(&body).map_err(|e| FetchError::Parse(e.to_string()))?;

        tracing::debug!(
            received = page.products.len(),
            total = page.total,
            skip = page.skip,
            limit = page.limit,
            "product page parsed"
        );
        Ok(page)
    }
}
