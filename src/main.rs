use anyhow::{Context, Result};
use reqwest::Client;
use std::sync::Arc;
use tracing::{error, info};
use vaxdash::{
    config::Config,
    dashboard::{self, AppState},
    load_dataset, logging, LoadError,
};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    logging::init();
    info!("startup");

    // ─── 2) configuration ────────────────────────────────────────────
    let config = Config::load().context("loading configuration")?;
    info!(
        local = %config.local_sample.display(),
        sources = config.sources.len(),
        bind = %config.bind,
        "configured"
    );

    let mut builder = Client::builder();
    if let Some(timeout) = config.request_timeout() {
        builder = builder.timeout(timeout);
    }
    let client = builder.build().context("building HTTP client")?;

    // ─── 3) acquire + normalize, once ────────────────────────────────
    let normalized = match load_dataset(&config, &client).await {
        Ok(n) => n,
        Err(LoadError::Acquisition(e)) => {
            for attempt in e.attempts() {
                error!(source = %attempt.source, error = %attempt.failure, "source failed");
            }
            return Err(e).context("no data source available");
        }
        Err(LoadError::Schema(e)) => {
            error!(error = %e, "source table has an unusable schema");
            return Err(e).context("normalizing source table");
        }
    };

    // ─── 4) serve ────────────────────────────────────────────────────
    let table = Arc::new(normalized.table);
    let state = Arc::new(AppState::new(
        table,
        config.page_title.clone(),
        &config.default_region,
    ));
    dashboard::serve(config.bind, state).await
}
