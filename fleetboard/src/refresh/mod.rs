/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Periodic re-fetch of both feeds.
//!
//! ```text
//!             every refresh interval
//! RefreshController ──spawn──► fetch status   ──parse──► FeedUpdate::Status   ─┐
//!                   └─spawn──► fetch schedule ──parse──► FeedUpdate::Schedule ─┴─► channel ─► DashboardData::apply
//! ```
//!
//! The two fetches of a cycle are independent tasks; their results arrive in
//! any order and each one is applied on its own.  A failed feed keeps its
//! previous data, so a broken schedule never blanks a working status table and
//! the other way around.  Fetches that are still in flight when the next cycle
//! starts are not cancelled: whichever completes last wins.
//!
//! This module never touches rotation state.

pub mod error;
pub mod source;

pub use error::FeedError;
pub use source::{build_source, FeedSource, FeedText, HttpFeedSource, LocalFileSource};

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, info, warn};

use crate::config::DashboardConfig;
use crate::parse::schedule::{parse_schedule_text, ScheduleDocument};
use crate::parse::status::{parse_status_text, StatusRow};

/// Default delay between two refresh cycles.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Message shown on the dashboard when the status feed cannot be loaded.
pub const STATUS_ERROR_MESSAGE: &str = "Impossible de charger le CSV statut";

// ── Updates ───────────────────────────────────────────────────────────────────

/// Parsed status feed of one fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSnapshot {
    /// `None` when the feed was completely blank (no header line).
    pub rows: Option<Vec<StatusRow>>,
    pub last_modified: Option<DateTime<Utc>>,
}

/// Result of one feed fetch, delivered to the dashboard event loop.
#[derive(Debug)]
pub enum FeedUpdate {
    Status(Result<StatusSnapshot, FeedError>),
    Schedule(Result<ScheduleDocument, FeedError>),
}

/// Fetches and parses the status feed.
pub async fn fetch_status(source: &dyn FeedSource) -> Result<StatusSnapshot, FeedError> {
    let text = source.fetch().await?;
    Ok(StatusSnapshot {
        rows: parse_status_text(&text.body),
        last_modified: text.last_modified,
    })
}

/// Fetches and parses the schedule feed.
pub async fn fetch_schedule(source: &dyn FeedSource) -> Result<ScheduleDocument, FeedError> {
    let text = source.fetch().await?;
    Ok(parse_schedule_text(&text.body))
}

// ── DashboardData ─────────────────────────────────────────────────────────────

/// Latest successfully loaded data of both feeds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardData {
    pub rows: Vec<StatusRow>,
    pub schedule: ScheduleDocument,
    /// User-visible message while the status feed is failing.
    pub error: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl DashboardData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one feed result using the current wall-clock time.
    pub fn apply(&mut self, update: FeedUpdate) -> bool {
        self.apply_at(update, Utc::now())
    }

    /// Applies one feed result.  Returns `true` when rows or schedule were
    /// replaced, i.e. when sections must be rebuilt.
    ///
    /// `now` stamps `last_updated` when the status feed carries no
    /// modification time.
    pub fn apply_at(&mut self, update: FeedUpdate, now: DateTime<Utc>) -> bool {
        match update {
            FeedUpdate::Status(Ok(snapshot)) => {
                self.error = None;
                self.last_updated = Some(snapshot.last_modified.unwrap_or(now));
                match snapshot.rows {
                    Some(rows) => {
                        info!(rows = rows.len(), "status rows updated");
                        self.rows = rows;
                        true
                    }
                    None => {
                        debug!("status feed is blank, keeping previous rows");
                        false
                    }
                }
            }
            FeedUpdate::Status(Err(e)) => {
                warn!(error = %e, "status feed unavailable, keeping previous rows");
                self.error = Some(STATUS_ERROR_MESSAGE.to_string());
                false
            }
            FeedUpdate::Schedule(Ok(schedule)) => {
                info!(
                    suppliers = schedule.rows.len(),
                    entries = schedule.entry_count(),
                    "schedule updated"
                );
                self.schedule = schedule;
                true
            }
            FeedUpdate::Schedule(Err(e)) if e.is_status() => {
                debug!(error = %e, "schedule feed not served, keeping previous schedule");
                false
            }
            FeedUpdate::Schedule(Err(e)) => {
                warn!(error = %e, "schedule feed unavailable, keeping previous schedule");
                false
            }
        }
    }
}

// ── RefreshController ─────────────────────────────────────────────────────────

/// Re-fetches both feeds on a fixed interval.
pub struct RefreshController {
    status: Arc<dyn FeedSource>,
    schedule: Arc<dyn FeedSource>,
    interval: Duration,
}

impl RefreshController {
    pub fn new(
        status: Arc<dyn FeedSource>,
        schedule: Arc<dyn FeedSource>,
        interval: Duration,
    ) -> Self {
        Self {
            status,
            schedule,
            interval,
        }
    }

    /// Builds both sources from the configuration.
    ///
    /// # Errors
    /// [`FeedError::InvalidUrl`] when a configured URL does not parse.
    pub fn from_config(config: &DashboardConfig) -> Result<Self, FeedError> {
        Ok(Self::new(
            build_source(&config.status)?,
            build_source(&config.schedule)?,
            config.refresh_interval,
        ))
    }

    /// Starts one refresh cycle: both feeds are fetched by independent tasks
    /// that each send their [`FeedUpdate`] on `updates`.
    pub fn refresh_once(&self, updates: &UnboundedSender<FeedUpdate>) -> [JoinHandle<()>; 2] {
        let status = Arc::clone(&self.status);
        let tx = updates.clone();
        let status_task = tokio::spawn(async move {
            let result = fetch_status(status.as_ref()).await;
            if tx.send(FeedUpdate::Status(result)).is_err() {
                debug!("dashboard gone, dropping status update");
            }
        });

        let schedule = Arc::clone(&self.schedule);
        let tx = updates.clone();
        let schedule_task = tokio::spawn(async move {
            let result = fetch_schedule(schedule.as_ref()).await;
            if tx.send(FeedUpdate::Schedule(result)).is_err() {
                debug!("dashboard gone, dropping schedule update");
            }
        });

        [status_task, schedule_task]
    }

    /// Runs refresh cycles forever: one immediately, then one per interval.
    ///
    /// Returns once the receiving side of `updates` is dropped.
    pub async fn run(self, updates: UnboundedSender<FeedUpdate>) {
        info!(
            status = %self.status.describe(),
            schedule = %self.schedule.describe(),
            interval_s = self.interval.as_secs(),
            "refresh loop started"
        );

        let mut ticker = time::interval(self.interval);
        let mut cycle: u64 = 0;
        loop {
            ticker.tick().await;
            if updates.is_closed() {
                break;
            }
            cycle += 1;
            debug!(cycle, "refresh cycle");
            self.refresh_once(&updates);
        }

        info!(cycles = cycle, "refresh loop stopped");
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
