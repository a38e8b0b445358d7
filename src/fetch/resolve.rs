// src/fetch/resolve.rs
//
// Ordered source fallback: local sample first, then each remote URL once.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use tokio::fs;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::{looks_like_html, page_title, snippet, Fetch};
use crate::process::{parse_csv, CsvError, RawTable};

/// One place the raw table may come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Local(PathBuf),
    Remote(Url),
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Local(p) => write!(f, "local {}", p.display()),
            Source::Remote(u) => write!(f, "remote {}", u),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AttemptFailure {
    #[error("read failed: {0}")]
    Read(String),

    #[error("expected CSV but got HTML{}; snippet: {snippet}", title_suffix(.title))]
    HtmlPayload {
        snippet: String,
        title: Option<String>,
    },

    #[error("not parseable as CSV: {0}")]
    Parse(#[from] CsvError),
}

fn title_suffix(title: &Option<String>) -> String {
    match title {
        Some(t) => format!(" ({t:?})"),
        None => String::new(),
    }
}

#[derive(Debug)]
pub struct SourceAttempt {
    pub source: Source,
    pub failure: AttemptFailure,
}

impl fmt::Display for SourceAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source, self.failure)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AcquisitionError {
    #[error("no source produced a table ({} attempts){}", .attempts.len(), join_attempts(.attempts))]
    Exhausted { attempts: Vec<SourceAttempt> },
}

impl AcquisitionError {
    pub fn attempts(&self) -> &[SourceAttempt] {
        match self {
            AcquisitionError::Exhausted { attempts } => attempts,
        }
    }
}

fn join_attempts(attempts: &[SourceAttempt]) -> String {
    attempts
        .iter()
        .map(|a| format!("\n  - {a}"))
        .collect()
}

async fn read_local(path: &Path) -> Result<RawTable, AttemptFailure> {
    let data = fs::read(path)
        .await
        .map_err(|e| AttemptFailure::Read(format!("reading {}: {}", path.display(), e)))?;
    Ok(parse_csv(&data)?)
}

async fn read_remote<F: Fetch>(fetcher: &F, url: &Url) -> Result<RawTable, AttemptFailure> {
    let data = fetcher
        .fetch(url)
        .await
        .map_err(|e| AttemptFailure::Read(format!("{e:#}")))?;

    // hosts answer with an interstitial page instead of the file
    if looks_like_html(&data) {
        return Err(AttemptFailure::HtmlPayload {
            snippet: snippet(&data),
            title: page_title(&data),
        });
    }

    Ok(parse_csv(&data)?)
}

/// Obtain the raw table from the first source that yields one.
///
/// An existing `local` file takes precedence over every remote: it is the
/// only candidate tried and no network request is made. Otherwise each of
/// `remotes` is fetched once, in order. Failures are collected, not retried.
#[instrument(level = "info", skip(local, remotes, fetcher), fields(local = %local.display(), remotes = remotes.len()))]
pub async fn resolve<F: Fetch>(
    local: &Path,
    remotes: &[Url],
    fetcher: &F,
) -> Result<RawTable, AcquisitionError> {
    if fs::try_exists(local).await.unwrap_or(false) {
        info!("using local sample");
        return read_local(local).await.map_err(|failure| {
            warn!(error = %failure, "local sample unusable");
            AcquisitionError::Exhausted {
                attempts: vec![SourceAttempt {
                    source: Source::Local(local.to_path_buf()),
                    failure,
                }],
            }
        });
    }
    debug!("no local sample; trying remotes");

    let mut attempts = Vec::with_capacity(remotes.len());
    for (idx, url) in remotes.iter().enumerate() {
        match read_remote(fetcher, url).await {
            Ok(raw) => {
                info!(%url, attempt = idx + 1, rows = raw.rows.len(), "fetched table");
                return Ok(raw);
            }
            Err(failure) => {
                warn!(%url, attempt = idx + 1, error = %failure, "source failed; trying next");
                attempts.push(SourceAttempt {
                    source: Source::Remote(url.clone()),
                    failure,
                });
            }
        }
    }

    Err(AcquisitionError::Exhausted { attempts })
}
