use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{Client, StatusCode};
use rusqlite::Connection;
use tokio::sync::Semaphore;
use tracing::{info, warn};
use url::Url;

use crate::db::{self, FetchRow};

const CONCURRENCY: usize = 10;
const MAX_RETRIES: u32 = 3;
const BASE_BACKOFF_MS: u64 = 2000;
const FETCH_TIMEOUT_SECS: u64 = 10;

/// Browser-profile headers; plenty of job boards refuse obvious bots.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";
const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

pub struct FetchStats {
    pub total: usize,
    pub ok: usize,
    pub errors: usize,
}

pub fn build_client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(FETCH_TIMEOUT_SECS))
        .build()
        .context("Failed to build HTTP client")
}

/// Reject anything without an http(s) scheme and a host before any I/O
/// happens.
pub fn validate_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).with_context(|| format!("Invalid URL: {raw}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("Unsupported URL scheme: {}", url.scheme());
    }
    if url.host_str().is_none() {
        bail!("URL has no host: {raw}");
    }
    Ok(url)
}

enum FetchOutcome {
    Body(String),
    Retryable(StatusCode),
}

/// Fetch one page, retrying rate limits and server errors with exponential
/// backoff. Returns the raw markup; any transport failure is an error, never
/// partial content.
pub async fn fetch_page(client: &Client, raw_url: &str) -> Result<String> {
    let url = validate_url(raw_url)?;
    let mut attempt = 0;
    loop {
        match fetch_once(client, url.clone()).await? {
            FetchOutcome::Body(body) => return Ok(body),
            FetchOutcome::Retryable(status) if attempt < MAX_RETRIES => {
                let backoff = Duration::from_millis(BASE_BACKOFF_MS * 2u64.pow(attempt));
                warn!(
                    "Status {status} on {url} (attempt {}/{}), backing off {:.1}s",
                    attempt + 1,
                    MAX_RETRIES,
                    backoff.as_secs_f64()
                );
                tokio::time::sleep(backoff).await;
                attempt += 1;
            }
            FetchOutcome::Retryable(status) => {
                bail!("Gave up on {url} after {} attempts (last status {status})", attempt + 1)
            }
        }
    }
}

async fn fetch_once(client: &Client, url: Url) -> Result<FetchOutcome> {
    let resp = client
        .get(url)
        .header("Accept", ACCEPT)
        .header("Accept-Language", ACCEPT_LANGUAGE)
        .send()
        .await
        .context("Request failed")?;

    let status = resp.status();
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        return Ok(FetchOutcome::Retryable(status));
    }
    if !status.is_success() {
        bail!("HTTP {status} fetching page");
    }
    let body = resp.text().await.context("Failed to read response body")?;
    Ok(FetchOutcome::Body(body))
}

/// Fetch pages concurrently, saving each result to the database as it
/// arrives. Failed fetches produce error rows so their pages still leave
/// the queue.
pub async fn fetch_pages_streaming(
    conn: &Connection,
    pages: Vec<(i64, String)>,
) -> Result<FetchStats> {
    let client = build_client()?;
    let semaphore = Arc::new(Semaphore::new(CONCURRENCY));
    let total = pages.len();

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    // Channel: workers send results, the receiving loop owns the DB writes
    let (tx, mut rx) = tokio::sync::mpsc::channel::<FetchRow>(CONCURRENCY * 2);

    for (page_id, url) in pages {
        let client = client.clone();
        let sem = Arc::clone(&semaphore);
        let tx = tx.clone();

        tokio::spawn(async move {
            let _permit = match sem.acquire().await {
                Ok(p) => p,
                Err(_) => return,
            };
            let start = Instant::now();
            let row = match fetch_page(&client, &url).await {
                Ok(html) => FetchRow {
                    page_id,
                    url,
                    html: Some(html),
                    error: None,
                    latency_ms: Some(start.elapsed().as_millis() as i64),
                    fetched_at: chrono::Utc::now().to_rfc3339(),
                },
                Err(e) => {
                    warn!("Fetch failed for {url}: {e:#}");
                    FetchRow {
                        page_id,
                        url,
                        html: None,
                        error: Some(format!("{e:#}")),
                        latency_ms: Some(start.elapsed().as_millis() as i64),
                        fetched_at: chrono::Utc::now().to_rfc3339(),
                    }
                }
            };
            let _ = tx.send(row).await;
        });
    }

    // Drop our copy of tx so rx closes when all spawned tasks finish
    drop(tx);

    let mut ok = 0usize;
    let mut errors = 0usize;
    while let Some(row) = rx.recv().await {
        if row.error.is_some() {
            errors += 1;
        } else {
            ok += 1;
        }
        db::save_fetch(conn, &row)?;
        pb.inc(1);
    }

    pb.finish_and_clear();
    info!("Fetched {total} pages ({ok} ok, {errors} errors)");

    Ok(FetchStats { total, ok, errors })
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn https_urls_pass_validation() {
        assert!(validate_url("https://boards.example.com/jobs/123").is_ok());
        assert!(validate_url("http://example.com").is_ok());
    }

    #[test]
    fn missing_scheme_is_rejected() {
        assert!(validate_url("example.com/jobs/123").is_err());
    }

    #[test]
    fn non_http_scheme_is_rejected() {
        assert!(validate_url("ftp://example.com/jobs").is_err());
        assert!(validate_url("file:///etc/passwd").is_err());
    }
}
