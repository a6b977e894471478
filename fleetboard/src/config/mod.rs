//! Dashboard configuration loading.
//!
//! Selects where each feed comes from and how fast the dashboard rotates and
//! refreshes.  Every key is optional; an absent file means "all defaults".
//!
//! The expected YAML structure is:
//! ```yaml
//! feeds:
//!   status:
//!     url: "https://raw.githubusercontent.com/WidoomVil/suivis_truck/main/truck_status.csv"
//!   schedule:
//!     path: "public/schedule.csv"
//! rotation_period_secs: 15
//! refresh_interval_secs: 30
//! ```
//!
//! A feed is either `url:` (remote, fetched over HTTP) or `path:` (local file).

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use crate::refresh::DEFAULT_REFRESH_INTERVAL;
use crate::rotation::DEFAULT_ROTATION_PERIOD;

/// Hosted status feed used when nothing else is configured.
pub const DEFAULT_STATUS_URL: &str =
    "https://raw.githubusercontent.com/WidoomVil/suivis_truck/main/truck_status.csv";

/// Hosted schedule feed used when nothing else is configured.
pub const DEFAULT_SCHEDULE_URL: &str =
    "https://raw.githubusercontent.com/WidoomVil/suivis_truck/main/schedule.csv";

/// File names looked up inside a local feed directory.
pub const STATUS_FILE_NAME: &str = "truck_status.csv";
pub const SCHEDULE_FILE_NAME: &str = "schedule.csv";

// ── Private YAML deserialization types ────────────────────────────────────────

/// Top-level wrapper that maps directly onto the YAML file layout.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DashboardConfigFile {
    #[serde(default)]
    feeds: FeedsEntry,
    rotation_period_secs: Option<u64>,
    refresh_interval_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FeedsEntry {
    status: Option<FeedEntry>,
    schedule: Option<FeedEntry>,
}

/// One feed as written in the file: exactly one of `url` / `path`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FeedEntry {
    url: Option<String>,
    path: Option<PathBuf>,
}

impl FeedEntry {
    fn into_source(self, feed: &str) -> Result<FeedSourceConfig> {
        match (self.url, self.path) {
            (Some(url), None) => Ok(FeedSourceConfig::Url(url)),
            (None, Some(path)) => Ok(FeedSourceConfig::Path(path)),
            (Some(_), Some(_)) => bail!("feed '{feed}' sets both 'url' and 'path'"),
            (None, None) => bail!("feed '{feed}' needs either 'url' or 'path'"),
        }
    }
}

// ── Public data structures ────────────────────────────────────────────────────

/// Where one feed is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSourceConfig {
    /// Remote file, fetched with cache busting.
    Url(String),
    /// Local file.
    Path(PathBuf),
}

/// Effective dashboard settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub status: FeedSourceConfig,
    pub schedule: FeedSourceConfig,
    /// Time each section stays on screen.
    pub rotation_period: Duration,
    /// Delay between two refreshes of both feeds.
    pub refresh_interval: Duration,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            status: FeedSourceConfig::Url(DEFAULT_STATUS_URL.to_string()),
            schedule: FeedSourceConfig::Url(DEFAULT_SCHEDULE_URL.to_string()),
            rotation_period: DEFAULT_ROTATION_PERIOD,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
        }
    }
}

impl DashboardConfig {
    /// Reads and validates the YAML file at `path`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened, if the YAML is
    /// structurally invalid, or if a period is zero.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading dashboard configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open configuration file: {}", path.display()))?;

        Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid configuration file: {}", path.display()))
    }

    /// Parses and validates a YAML document.  An empty document yields the
    /// defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let file: DashboardConfigFile = if content.trim().is_empty() {
            DashboardConfigFile::default()
        } else {
            serde_yaml::from_str(content).context("Failed to parse YAML")?
        };

        let defaults = Self::default();
        let config = Self {
            status: match file.feeds.status {
                Some(entry) => entry.into_source("status")?,
                None => defaults.status,
            },
            schedule: match file.feeds.schedule {
                Some(entry) => entry.into_source("schedule")?,
                None => defaults.schedule,
            },
            rotation_period: file
                .rotation_period_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.rotation_period),
            refresh_interval: file
                .refresh_interval_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.refresh_interval),
        };
        config.validate()?;

        debug!(?config, "configuration parsed");
        Ok(config)
    }

    /// Points both feeds at `<dir>/truck_status.csv` and `<dir>/schedule.csv`.
    pub fn use_local_dir(&mut self, dir: &Path) {
        self.status = FeedSourceConfig::Path(dir.join(STATUS_FILE_NAME));
        self.schedule = FeedSourceConfig::Path(dir.join(SCHEDULE_FILE_NAME));
    }

    /// Rejects settings the timers cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.rotation_period.is_zero() {
            bail!("rotation_period_secs must be greater than zero");
        }
        if self.refresh_interval.is_zero() {
            bail!("refresh_interval_secs must be greater than zero");
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
