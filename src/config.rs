// src/config.rs

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{env, fs, net::SocketAddr, path::PathBuf, time::Duration};
use url::Url;

/// Google Drive file id of the published vaccination export.
pub const DEFAULT_DRIVE_FILE_ID: &str = "1hfH9rL7Eeee4SNaFKHFkZVy4L4Kji47-";

pub const ENV_CONFIG: &str = "VAXDASH_CONFIG";
pub const ENV_LOCAL_SAMPLE: &str = "VAXDASH_LOCAL_SAMPLE";
pub const ENV_BIND: &str = "VAXDASH_BIND";
pub const ENV_DRIVE_FILE_ID: &str = "VAXDASH_DRIVE_FILE_ID";

/// The three download forms Drive accepts, in the order they are tried:
/// usercontent direct download, `uc?export=download`, plain `uc?id=`.
pub fn drive_urls(file_id: &str) -> Result<Vec<Url>> {
    let forms = [
        format!("https://drive.usercontent.google.com/download?id={file_id}&export=download&confirm=t"),
        format!("https://drive.google.com/uc?export=download&id={file_id}"),
        format!("https://drive.google.com/uc?id={file_id}"),
    ];
    forms
        .iter()
        .map(|u| Url::parse(u).with_context(|| format!("parsing source URL {}", u)))
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Optional local CSV; when it exists no network source is tried.
    pub local_sample: PathBuf,
    /// Remote CSV locations, highest priority first.
    pub sources: Vec<Url>,
    pub bind: SocketAddr,
    /// Region preselected in the dropdown.
    pub default_region: String,
    pub page_title: String,
    /// Per-request timeout for remote sources. Unset means wait forever.
    pub request_timeout_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            local_sample: PathBuf::from("data/sample_vaccinations.csv"),
            sources: drive_urls(DEFAULT_DRIVE_FILE_ID).unwrap_or_default(),
            bind: SocketAddr::from(([127, 0, 0, 1], 8050)),
            default_region: "IN".to_string(),
            page_title: "US Vaccination Dashboard".to_string(),
            request_timeout_secs: None,
        }
    }
}

impl Config {
    /// Defaults, then the YAML file named by `VAXDASH_CONFIG`, then env overrides.
    pub fn load() -> Result<Self> {
        let mut cfg = match env::var(ENV_CONFIG) {
            Ok(path) => Self::from_yaml_file(&PathBuf::from(path))?,
            Err(_) => Self::default(),
        };
        cfg.apply_env(|key| env::var(key).ok())?;
        Ok(cfg)
    }

    pub fn from_yaml_file(path: &std::path::Path) -> Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("reading config {:?}", path))?;
        Self::from_yaml(&text).with_context(|| format!("parsing config {:?}", path))
    }

    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Apply overrides from `lookup` (the process environment in production).
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_LOCAL_SAMPLE) {
            self.local_sample = PathBuf::from(path);
        }
        if let Some(bind) = lookup(ENV_BIND) {
            self.bind = bind
                .parse()
                .with_context(|| format!("{} is not a socket address: {:?}", ENV_BIND, bind))?;
        }
        if let Some(id) = lookup(ENV_DRIVE_FILE_ID) {
            self.sources = drive_urls(id.trim())?;
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
