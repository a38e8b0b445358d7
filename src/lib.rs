pub mod config;
pub mod dashboard;
pub mod fetch;
pub mod logging;
pub mod process;
pub mod table;

use tracing::{info, instrument};

use crate::config::Config;
use crate::fetch::{AcquisitionError, Fetch};
use crate::process::{Normalized, SchemaError};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Startup routine: resolve the raw table from the configured sources and
/// normalize it. Either both succeed or nothing is served.
#[instrument(level = "info", skip_all)]
pub async fn load_dataset<F: Fetch>(config: &Config, fetcher: &F) -> Result<Normalized, LoadError> {
    let raw = fetch::resolve(&config.local_sample, &config.sources, fetcher).await?;
    let normalized = process::normalize(&raw)?;
    info!(
        records = normalized.table.len(),
        dropped = normalized.dropped,
        "dataset ready"
    );
    Ok(normalized)
}
