mod cli;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use storefront::app::HEADING;
use storefront::{Flags, Storefront};
use storefront_catalog::{
    http_client, HttpProductSource, HttpThumbnailSource, StorefrontConfig, ThumbnailSource,
};
use storefront_core::ProgramOptions;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = StorefrontConfig::load(args.config.as_deref())
        .context("failed to load configuration")?;
    args.apply(&mut config);
    config.validate().context("invalid configuration")?;

    logging::init(config.log_file.as_deref(), config.log_level.as_deref())?;
    tracing::info!(endpoint = %config.endpoint, thumbnails = config.thumbnails, "starting");

    let client =
        http_client(config.request_timeout()).context("failed to build the HTTP client")?;
    let products = Arc::new(
        HttpProductSource::new(client.clone(), &config).context("invalid product endpoint")?,
    );
    let thumbnails = config.thumbnails.then(|| {
        Arc::new(HttpThumbnailSource::new(client, config.max_image_downloads))
            as Arc<dyn ThumbnailSource>
    });

    let flags = Flags {
        products,
        thumbnails,
        stale_after: config.stale_after(),
        placeholder_url: config.placeholder_url.clone(),
    };
    let options = ProgramOptions {
        fps: config.fps,
        focus_reporting: true,
        title: Some(HEADING.to_string()),
        ..ProgramOptions::default()
    };

    storefront_core::run_with::<Storefront>(flags, options)
        .await
        .context("terminal error")?;
    tracing::info!("exited cleanly");
    Ok(())
}
