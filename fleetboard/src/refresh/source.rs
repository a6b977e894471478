/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Where feed text comes from.
//!
//! The dashboard reads both feeds through [`FeedSource`], so the remote
//! (hosted file) and local (static directory) deployments share one pipeline.
//! [`build_source`] picks the implementation from the configuration.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{CACHE_CONTROL, LAST_MODIFIED, PRAGMA};
use reqwest::Url;
use tracing::debug;

use super::error::FeedError;
use crate::config::FeedSourceConfig;

/// Name of the cache-busting query parameter appended to remote URLs.
pub const CACHE_BUST_PARAM: &str = "t";

/// Per-request timeout for remote feeds.
const HTTP_TIMEOUT: Duration = Duration::from_secs(20);

// ── FeedText ──────────────────────────────────────────────────────────────────

/// Raw text of one fetched feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedText {
    pub body: String,
    /// `Last-Modified` of the remote file, or the local file's mtime.
    pub last_modified: Option<DateTime<Utc>>,
}

// ── FeedSource ────────────────────────────────────────────────────────────────

/// A place one feed can be fetched from.
#[async_trait]
pub trait FeedSource: Send + Sync + 'static {
    /// Human-readable location, used in logs.
    fn describe(&self) -> String;

    /// Retrieves the current feed text.
    async fn fetch(&self) -> Result<FeedText, FeedError>;
}

/// Builds the source described by `config`.
///
/// # Errors
/// [`FeedError::InvalidUrl`] or [`FeedError::Client`] for a remote source that
/// cannot be set up.
pub fn build_source(config: &FeedSourceConfig) -> Result<Arc<dyn FeedSource>, FeedError> {
    Ok(match config {
        FeedSourceConfig::Url(url) => Arc::new(HttpFeedSource::new(url)?),
        FeedSourceConfig::Path(path) => Arc::new(LocalFileSource::new(path)),
    })
}

// ── HttpFeedSource ────────────────────────────────────────────────────────────

/// Remote feed fetched over HTTP(S) with caching defeated.
pub struct HttpFeedSource {
    url: Url,
    client: reqwest::Client,
}

impl HttpFeedSource {
    /// # Errors
    /// [`FeedError::InvalidUrl`] when `url` does not parse, [`FeedError::Client`]
    /// when the HTTP client cannot be built.
    pub fn new(url: &str) -> Result<Self, FeedError> {
        let url = Url::parse(url).map_err(|e| FeedError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|source| FeedError::Client {
                url: url.to_string(),
                source,
            })?;
        Ok(Self { url, client })
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    fn describe(&self) -> String {
        self.url.to_string()
    }

    async fn fetch(&self) -> Result<FeedText, FeedError> {
        let target = cache_busted_url(&self.url, Utc::now().timestamp_millis());
        let transport = |source| FeedError::Transport {
            url: self.url.to_string(),
            source,
        };

        let response = self
            .client
            .get(target)
            .header(CACHE_CONTROL, "no-cache, no-store, must-revalidate")
            .header(PRAGMA, "no-cache")
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                url: self.url.to_string(),
                status: status.as_u16(),
            });
        }

        let last_modified = response
            .headers()
            .get(LAST_MODIFIED)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_http_date);

        let body = response.text().await.map_err(transport)?;
        debug!(url = %self.url, bytes = body.len(), "feed downloaded");

        Ok(FeedText {
            body,
            last_modified,
        })
    }
}

/// Returns `url` with `t=<stamp_ms>` appended to its query string.
pub fn cache_busted_url(url: &Url, stamp_ms: i64) -> Url {
    let mut target = url.clone();
    target
        .query_pairs_mut()
        .append_pair(CACHE_BUST_PARAM, &stamp_ms.to_string());
    target
}

/// Parses an HTTP date (`Wed, 21 Oct 2015 07:28:00 GMT`).
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|date| date.with_timezone(&Utc))
}

// ── LocalFileSource ───────────────────────────────────────────────────────────

/// Feed read from a file on disk.
pub struct LocalFileSource {
    path: PathBuf,
}

impl LocalFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl FeedSource for LocalFileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<FeedText, FeedError> {
        let io = |source| FeedError::Io {
            path: self.path.clone(),
            source,
        };

        let body = tokio::fs::read_to_string(&self.path).await.map_err(io)?;
        let last_modified = tokio::fs::metadata(&self.path)
            .await
            .and_then(|meta| meta.modified())
            .ok()
            .map(DateTime::<Utc>::from);

        debug!(path = %self.path.display(), bytes = body.len(), "feed read");
        Ok(FeedText {
            body,
            last_modified,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    /// Serves exactly one HTTP response and reports the request line.
    async fn serve_once(response: String) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let n = socket.read(&mut buf).await.unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).to_string();
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            let _ = tx.send(request);
        });
        (format!("http://{addr}/truck_status.csv"), rx)
    }

    fn http_response(status: &str, extra_headers: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n{extra_headers}\r\n{body}",
            body.len()
        )
    }

    // ── URL / header helpers ──────────────────────────────────────────────────

    #[test]
    fn cache_busting_appends_parameter() {
        let url = Url::parse("https://example.org/feeds/schedule.csv").unwrap();
        assert_eq!(
            cache_busted_url(&url, 1_700_000_000_123).as_str(),
            "https://example.org/feeds/schedule.csv?t=1700000000123"
        );
    }

    #[test]
    fn cache_busting_keeps_existing_query() {
        let url = Url::parse("https://example.org/raw?ref=main").unwrap();
        assert_eq!(
            cache_busted_url(&url, 5).as_str(),
            "https://example.org/raw?ref=main&t=5"
        );
    }

    #[test]
    fn http_date_parses_gmt_form() {
        let date = parse_http_date("Wed, 21 Oct 2015 07:28:00 GMT").unwrap();
        assert_eq!(date.to_rfc3339(), "2015-10-21T07:28:00+00:00");
        assert!(parse_http_date("yesterday").is_none());
    }

    #[test]
    fn invalid_url_is_rejected_up_front() {
        let err = HttpFeedSource::new("not a url").err().unwrap();
        assert!(matches!(err, FeedError::InvalidUrl { .. }));
    }

    #[test]
    fn valid_url_builds_a_client() {
        let source = HttpFeedSource::new("https://example.org/feeds/schedule.csv").unwrap();
        assert_eq!(source.describe(), "https://example.org/feeds/schedule.csv");
    }

    #[test]
    fn build_source_picks_the_strategy() {
        let remote = build_source(&FeedSourceConfig::Url("https://example.org/a.csv".into())).unwrap();
        assert_eq!(remote.describe(), "https://example.org/a.csv");
        let local = build_source(&FeedSourceConfig::Path("/srv/feeds/a.csv".into())).unwrap();
        assert_eq!(local.describe(), "/srv/feeds/a.csv");
    }

    // ── HttpFeedSource ────────────────────────────────────────────────────────

    #[tokio::test]
    async fn http_source_fetches_body_and_last_modified() {
        let response = http_response(
            "200 OK",
            "Last-Modified: Wed, 21 Oct 2015 07:28:00 GMT\r\n",
            "Unité;DATE\nRO1;x\n",
        );
        let (url, request) = serve_once(response).await;

        let text = HttpFeedSource::new(&url).unwrap().fetch().await.unwrap();
        assert_eq!(text.body, "Unité;DATE\nRO1;x\n");
        assert_eq!(text.last_modified, parse_http_date("Wed, 21 Oct 2015 07:28:00 GMT"));

        let request = request.await.unwrap();
        let request_line = request.lines().next().unwrap();
        assert!(request_line.starts_with("GET /truck_status.csv?t="), "{request_line}");
        assert!(request.to_lowercase().contains("cache-control: no-cache, no-store, must-revalidate"));
    }

    #[tokio::test]
    async fn http_source_reports_non_success_status() {
        let (url, _request) = serve_once(http_response("404 Not Found", "", "missing")).await;
        let err = HttpFeedSource::new(&url).unwrap().fetch().await.unwrap_err();
        assert!(err.is_status());
        assert!(matches!(err, FeedError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn http_source_reports_transport_failure() {
        // bind then drop: nothing listens on this port any more
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let source = HttpFeedSource::new(&format!("http://{addr}/x.csv")).unwrap();
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, FeedError::Transport { .. }), "{err}");
    }

    // ── LocalFileSource ───────────────────────────────────────────────────────

    #[tokio::test]
    async fn local_source_reads_file_and_mtime() {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all("T\nA;Lundi;RO1\n".as_bytes()).unwrap();

        let text = LocalFileSource::new(f.path()).fetch().await.unwrap();
        assert_eq!(text.body, "T\nA;Lundi;RO1\n");
        assert!(text.last_modified.is_some());
    }

    #[tokio::test]
    async fn local_source_missing_file_is_io_error() {
        let err = LocalFileSource::new("/nonexistent/fleetboard/schedule.csv")
            .fetch()
            .await
            .unwrap_err();
        assert!(matches!(err, FeedError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/fleetboard/schedule.csv"));
    }
}
