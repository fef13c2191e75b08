use clap::Parser;
use std::path::PathBuf;
use storefront_catalog::StorefrontConfig;

/// Browse a product catalog in the terminal.
///
/// Type to filter by product name, category, or brand. Settings come from
/// the config file (`~/.config/storefront/config.toml` by default); flags
/// override it.
#[derive(Parser, Debug)]
#[command(name = "storefront", version)]
pub struct Args {
    /// Config file to load instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Product listing endpoint
    #[arg(long, value_name = "URL", env = "STOREFRONT_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Seconds fetched data stays fresh before a background refetch
    #[arg(long, value_name = "SECS")]
    pub stale_after: Option<u64>,

    /// Do not download card thumbnails
    #[arg(long)]
    pub no_images: bool,

    /// Append logs to this file (logging is off without one)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Log filter, e.g. "debug" or "storefront_catalog=trace"
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

impl Args {
    /// Overlay the flags that were given onto `config`.
    pub fn apply(&self, config: &mut StorefrontConfig) {
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(secs) = self.stale_after {
            config.stale_after_secs = secs;
        }
        if self.no_images {
            config.thumbnails = false;
        }
        if let Some(path) = &self.log_file {
            config.log_file = Some(path.clone());
        }
        if let Some(level) = &self.log_level {
            config.log_level = Some(level.clone());
        }
    }
}
