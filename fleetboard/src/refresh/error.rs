/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured error type for feed retrieval.
//!
//! Only transport problems are errors.  Malformed feed content is never
//! reported here; the parsers absorb it.
//!
//! | Variant | Raised by | Typical cause |
//! |---|---|---|
//! | `InvalidUrl` | [`HttpFeedSource`] | bad URL in the configuration |
//! | `Client` | [`HttpFeedSource`] | TLS backend could not be initialised |
//! | `Transport` | [`HttpFeedSource`] | DNS, TLS, connection reset, timeout |
//! | `Status` | [`HttpFeedSource`] | non-2xx answer |
//! | `Io` | [`LocalFileSource`] | missing or unreadable file |
//!
//! [`HttpFeedSource`]: super::source::HttpFeedSource
//! [`LocalFileSource`]: super::source::LocalFileSource

use std::path::PathBuf;

use thiserror::Error;

/// Failure to retrieve one feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The configured URL cannot be parsed.
    #[error("invalid feed url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The HTTP client could not be built.
    #[error("cannot build http client for '{url}': {source}")]
    Client {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The request never produced a response (or its body could not be read).
    #[error("request to '{url}' failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status code.
    #[error("'{url}' answered with HTTP status {status}")]
    Status { url: String, status: u16 },

    /// A local feed file could not be read.
    #[error("cannot read feed file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FeedError {
    /// `true` for failures that came back from the server as a status code.
    pub fn is_status(&self) -> bool {
        matches!(self, FeedError::Status { .. })
    }
}
