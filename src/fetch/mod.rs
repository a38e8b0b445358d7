// src/fetch/mod.rs

use anyhow::{Context, Result};
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::debug;
use url::Url;

pub mod resolve;

pub use resolve::{resolve, AcquisitionError, AttemptFailure, Source, SourceAttempt};

/// Leading byte patterns of an HTML document, lowercase.
const HTML_SIGNATURES: &[&[u8]] = &[b"<!doctype html", b"<html"];

/// How many leading bytes of a rejected page to keep for diagnostics.
pub const SNIPPET_LEN: usize = 200;

/// Network access used by the resolver.
#[allow(async_fn_in_trait)]
pub trait Fetch {
    /// GET `url` and return the full body. Non-2xx responses are errors.
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>>;
}

impl Fetch for Client {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
        debug!("Fetching bytes from {}", url);
        let bytes = self
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("GET {} failed", url))?
            .error_for_status()
            .with_context(|| format!("Non-success status {}", url))?
            .bytes()
            .await
            .with_context(|| format!("Reading body from {}", url))?;
        Ok(Vec::from(bytes))
    }
}

/// True when the payload, after leading whitespace, starts with an HTML
/// document signature (case-insensitive).
pub fn looks_like_html(data: &[u8]) -> bool {
    let trimmed = data.trim_ascii_start();
    HTML_SIGNATURES.iter().any(|sig| {
        trimmed.len() >= sig.len() && trimmed[..sig.len()].eq_ignore_ascii_case(sig)
    })
}

/// First [`SNIPPET_LEN`] bytes of the payload as text.
pub fn snippet(data: &[u8]) -> String {
    let end = data.len().min(SNIPPET_LEN);
    String::from_utf8_lossy(&data[..end]).trim().to_string()
}

/// The `<title>` of an HTML page, if it has a non-empty one.
pub fn page_title(data: &[u8]) -> Option<String> {
    let doc = Html::parse_document(&String::from_utf8_lossy(data));
    let sel = Selector::parse("title").ok()?;
    let title = doc
        .select(&sel)
        .next()?
        .text()
        .collect::<String>()
        .trim()
        .to_string();
    (!title.is_empty()).then_some(title)
}
