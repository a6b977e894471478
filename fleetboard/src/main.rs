/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, error, info, warn};

use fleetboard::config::{DashboardConfig, FeedSourceConfig};
use fleetboard::dashboard::{self, Command};
use fleetboard::render::TextRenderer;

// ── CLI argument definition ───────────────────────────────────────────────────

/// Fleet maintenance dashboard.
///
/// Example:
///   fleetboard --local-dir public --rotation-secs 10
///
/// While running, type `enter` / `leave` to pause and resume rotation,
/// `next` / `prev` to switch section and `quit` to exit.
#[derive(Debug, Parser)]
#[command(
    name = "fleetboard",
    about = "Fleet maintenance dashboard – truck status and workshop schedule",
    long_about = None,
)]
struct Cli {
    /// Path to the YAML dashboard configuration file.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// URL of the truck status feed.
    #[arg(long = "status-url")]
    status_url: Option<String>,

    /// URL of the workshop schedule feed.
    #[arg(long = "schedule-url")]
    schedule_url: Option<String>,

    /// Directory holding truck_status.csv and schedule.csv (replaces both URLs).
    #[arg(short = 'l', long = "local-dir", conflicts_with_all = ["status_url", "schedule_url"])]
    local_dir: Option<PathBuf>,

    /// Seconds each section stays on screen.
    #[arg(short = 'r', long = "rotation-secs")]
    rotation_secs: Option<u64>,

    /// Seconds between two refreshes of the feeds.
    #[arg(short = 'i', long = "refresh-secs")]
    refresh_secs: Option<u64>,

    /// Fetch once, print the first section and exit.
    #[arg(long = "once", default_value_t = false)]
    once: bool,
}

impl Cli {
    /// Command-line flags win over the configuration file.
    fn apply_overrides(&self, config: &mut DashboardConfig) {
        if let Some(dir) = &self.local_dir {
            config.use_local_dir(dir);
        }
        if let Some(url) = &self.status_url {
            config.status = FeedSourceConfig::Url(url.clone());
        }
        if let Some(url) = &self.schedule_url {
            config.schedule = FeedSourceConfig::Url(url.clone());
        }
        if let Some(secs) = self.rotation_secs {
            config.rotation_period = Duration::from_secs(secs);
        }
        if let Some(secs) = self.refresh_secs {
            config.refresh_interval = Duration::from_secs(secs);
        }
    }
}

/// Forwards stdin lines as commands until EOF.
fn spawn_command_reader() -> UnboundedReceiver<Command> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) if line.trim().is_empty() => continue,
                Ok(Some(line)) => match line.parse::<Command>() {
                    Ok(command) => {
                        if tx.send(command).is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!("{e}"),
                },
                Ok(None) => break,
                Err(e) => {
                    warn!("stdin unreadable, commands disabled: {e}");
                    break;
                }
            }
        }
        debug!("command reader stopped");
    });
    rx
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialise structured logging on stderr; stdout carries the dashboard.
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // ── Load dashboard configuration ──────────────────────────────────────────
    let mut config = match &cli.config {
        Some(path) => match DashboardConfig::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load dashboard configuration: {:#}", e);
                process::exit(1);
            }
        },
        None => {
            info!("No configuration file provided, using default feeds");
            DashboardConfig::default()
        }
    };
    cli.apply_overrides(&mut config);
    if let Err(e) = config.validate() {
        error!("Invalid settings: {:#}", e);
        process::exit(1);
    }

    info!(
        status        = ?config.status,
        schedule      = ?config.schedule,
        rotation_secs = config.rotation_period.as_secs(),
        refresh_secs  = config.refresh_interval.as_secs(),
        once          = cli.once,
        "Fleetboard starting"
    );

    // ── Run ───────────────────────────────────────────────────────────────────
    let stdout = std::io::stdout();
    let result = if cli.once {
        let mut renderer = TextRenderer::new(stdout.lock());
        dashboard::run_once(&config, &mut renderer).await
    } else {
        let mut renderer = TextRenderer::new(stdout.lock()).clearing();
        dashboard::run(&config, &mut renderer, spawn_command_reader()).await
    };

    if let Err(e) = result {
        error!("Dashboard failed: {:#}", e);
        process::exit(1);
    }

    info!("Fleetboard stopped");
    // A pending stdin read would otherwise hold the runtime open.
    process::exit(0);
}
