/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Dashboard runtime: the single owner of feed data, sections and rotation.
//!
//! Every state change happens inside [`Dashboard`] in response to one
//! discrete event:
//!
//! | Event | Source | Effect |
//! |---|---|---|
//! | [`FeedUpdate`] | refresh tasks | data replaced, sections rebuilt |
//! | [`TimerId`] | rotation timer | next section |
//! | [`Command`] | pointer / buttons (stdin) | pause, resume, previous, next |
//!
//! [`run`] drives those events from one `tokio::select!` loop, so no locks
//! are involved.

use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{Datelike, Local, Weekday};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, info};

use crate::config::DashboardConfig;
use crate::refresh::{DashboardData, FeedUpdate, RefreshController};
use crate::render::{DashboardView, Renderer};
use crate::rotation::{RotationController, RotationPhase, TimerId, TimerScheduler, TokioTimerScheduler};
use crate::section::{build_sections, section_layout, Section};

// ── Commands ──────────────────────────────────────────────────────────────────

/// User input.  `PointerEnter` / `PointerLeave` stand for the pointer moving
/// over and off the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    PointerEnter,
    PointerLeave,
    Next,
    Previous,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "enter" | "e" => Ok(Command::PointerEnter),
            "leave" | "l" => Ok(Command::PointerLeave),
            "next" | "n" => Ok(Command::Next),
            "prev" | "previous" | "p" => Ok(Command::Previous),
            "quit" | "q" => Ok(Command::Quit),
            other => Err(format!(
                "unknown command '{other}' (expected enter, leave, next, prev or quit)"
            )),
        }
    }
}

// ── Dashboard ─────────────────────────────────────────────────────────────────

pub struct Dashboard<S: TimerScheduler> {
    data: DashboardData,
    sections: Vec<Section>,
    rotation: RotationController<S>,
}

impl<S: TimerScheduler> Dashboard<S> {
    /// Builds the initial (empty) section list and starts rotating it.
    pub fn new(mut rotation: RotationController<S>) -> Self {
        let data = DashboardData::new();
        let sections = build_sections(&data.rows, &data.schedule);
        rotation.on_sections_changed(sections.len());
        Self {
            data,
            sections,
            rotation,
        }
    }

    pub fn data(&self) -> &DashboardData {
        &self.data
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn rotation(&self) -> &RotationController<S> {
        &self.rotation
    }

    pub fn rotation_mut(&mut self) -> &mut RotationController<S> {
        &mut self.rotation
    }

    /// Visible section, if any.
    pub fn current_section(&self) -> Option<&Section> {
        self.rotation
            .current_index()
            .and_then(|i| self.sections.get(i))
    }

    /// Applies a feed result.  Returns `true` when the frame must be redrawn.
    ///
    /// Sections are rebuilt whenever data changed; the rotation controller is
    /// only told when the section layout itself changed.
    pub fn apply_feed(&mut self, update: FeedUpdate) -> bool {
        let had_error = self.data.error.is_some();
        let changed = self.data.apply(update);

        if changed {
            let sections = build_sections(&self.data.rows, &self.data.schedule);
            let layout_changed = section_layout(&sections) != section_layout(&self.sections);
            self.sections = sections;
            if layout_changed {
                self.rotation.on_sections_changed(self.sections.len());
            }
        }

        changed || had_error != self.data.error.is_some()
    }

    /// Applies one user command.  Returns `true` when the frame must be
    /// redrawn; `Quit` is the caller's business and changes nothing.
    pub fn handle_command(&mut self, command: Command) -> bool {
        debug!(?command, "command");
        match command {
            Command::PointerEnter => self.rotation.pointer_enter(),
            Command::PointerLeave => self.rotation.pointer_leave(),
            Command::Next => self.rotation.next(),
            Command::Previous => self.rotation.previous(),
            Command::Quit => return false,
        }
        true
    }

    /// Forwards a timer firing.  Returns `true` when the section changed.
    pub fn on_timer_fired(&mut self, id: TimerId) -> bool {
        self.rotation.on_timer_fired(id)
    }

    /// Snapshot of everything the renderer needs.
    pub fn view(&self, today: Weekday) -> DashboardView<'_> {
        DashboardView {
            section: self.current_section(),
            schedule: &self.data.schedule,
            position: self
                .rotation
                .current_index()
                .map(|i| (i, self.sections.len())),
            error: self.data.error.as_deref(),
            last_updated: self.data.last_updated,
            paused: self.rotation.phase() == RotationPhase::Paused,
            rotation_period: self.rotation.period(),
            today,
        }
    }
}

fn today() -> Weekday {
    Local::now().weekday()
}

// ── Runtime ───────────────────────────────────────────────────────────────────

/// Runs the dashboard until `Quit` or Ctrl-C.
///
/// A closed `commands` channel (e.g. stdin at EOF) only disables input; the
/// dashboard keeps rotating and refreshing.
///
/// # Errors
/// Fails when a feed URL is invalid or when the renderer cannot write.
pub async fn run<R: Renderer>(
    config: &DashboardConfig,
    renderer: &mut R,
    mut commands: UnboundedReceiver<Command>,
) -> Result<()> {
    let refresh = RefreshController::from_config(config).context("Invalid feed source")?;

    let (tick_tx, mut ticks) = mpsc::unbounded_channel();
    let (feed_tx, mut feeds) = mpsc::unbounded_channel();

    let refresh_task = tokio::spawn(refresh.run(feed_tx));
    let scheduler = TokioTimerScheduler::new(tick_tx);
    let mut dashboard = Dashboard::new(RotationController::new(scheduler, config.rotation_period));

    renderer
        .render(&dashboard.view(today()))
        .context("Failed to render dashboard")?;

    let mut input_open = true;
    loop {
        let redraw = tokio::select! {
            Some(id) = ticks.recv() => dashboard.on_timer_fired(id),
            Some(update) = feeds.recv() => dashboard.apply_feed(update),
            command = commands.recv(), if input_open => match command {
                Some(Command::Quit) => break,
                Some(command) => dashboard.handle_command(command),
                None => {
                    debug!("input closed, running without commands");
                    input_open = false;
                    false
                }
            },
            _ = tokio::signal::ctrl_c() => break,
            else => break,
        };

        if redraw {
            renderer
                .render(&dashboard.view(today()))
                .context("Failed to render dashboard")?;
        }
    }

    info!("dashboard stopping");
    refresh_task.abort();
    Ok(())
}

/// Fetches both feeds once and renders the first section.
///
/// # Errors
/// Fails when a feed URL is invalid or when the renderer cannot write.
pub async fn run_once<R: Renderer>(config: &DashboardConfig, renderer: &mut R) -> Result<()> {
    let refresh = RefreshController::from_config(config).context("Invalid feed source")?;
    let (feed_tx, mut feeds) = mpsc::unbounded_channel();
    for task in refresh.refresh_once(&feed_tx) {
        task.await.context("Feed task failed")?;
    }
    drop(feed_tx);

    let (tick_tx, _ticks) = mpsc::unbounded_channel();
    let scheduler = TokioTimerScheduler::new(tick_tx);
    let mut dashboard = Dashboard::new(RotationController::new(scheduler, config.rotation_period));
    while let Some(update) = feeds.recv().await {
        dashboard.apply_feed(update);
    }

    renderer
        .render(&dashboard.view(today()))
        .context("Failed to render dashboard")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
