/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Section rotation and pause state machine.
//!
//! ```text
//!            sections > 0                pointer_enter
//!   Idle ───────────────────► Active ─────────────────► Paused
//!    ▲                          │  ▲                      │
//!    │     sections == 0        │  └──────────────────────┘
//!    └──────────────────────────┘       pointer_leave
//! ```
//!
//! # Timer invariant
//! At most one recurring timer is alive per controller, under any sequence of
//! signals.  It is alive exactly when the phase is [`RotationPhase::Active`].
//! Every path that starts a timer first cancels the previous one, and firings
//! of a timer that is no longer the live one are dropped by
//! [`RotationController::on_timer_fired`].
//!
//! The section count and pause flag are plain fields of the controller;
//! a firing carries nothing but its [`TimerId`], so a tick can never act on a
//! stale count.

pub mod timer;

use std::time::Duration;

use tracing::{debug, info};

pub use timer::{TimerId, TimerScheduler, TokioTimerScheduler};

/// Default time a section stays on screen.
pub const DEFAULT_ROTATION_PERIOD: Duration = Duration::from_secs(15);

/// Observable phase of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationPhase {
    /// No sections; nothing is current and no timer runs.
    Idle,
    /// A section is visible and the timer runs.
    Active,
    /// A section is visible, rotation is suspended by the pointer.
    Paused,
}

/// Owns the current section index and the rotation timer.
pub struct RotationController<S: TimerScheduler> {
    scheduler: S,
    period: Duration,
    section_count: usize,
    index: usize,
    paused: bool,
    timer: Option<TimerId>,
}

impl<S: TimerScheduler> RotationController<S> {
    /// Creates an idle controller with no sections.
    pub fn new(scheduler: S, period: Duration) -> Self {
        Self {
            scheduler,
            period,
            section_count: 0,
            index: 0,
            paused: false,
            timer: None,
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    /// Index of the visible section, or `None` when there are no sections.
    pub fn current_index(&self) -> Option<usize> {
        (self.section_count > 0).then_some(self.index)
    }

    pub fn phase(&self) -> RotationPhase {
        if self.section_count == 0 {
            RotationPhase::Idle
        } else if self.paused {
            RotationPhase::Paused
        } else {
            RotationPhase::Active
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn section_count(&self) -> usize {
        self.section_count
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Id of the live timer, if any.
    pub fn active_timer(&self) -> Option<TimerId> {
        self.timer
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    // ── Signals ───────────────────────────────────────────────────────────────

    /// New data produced a section list of `count` sections.
    ///
    /// Tears down the current timer, re-clamps the index into the new range
    /// (without resetting it) and restarts the timer unless paused.
    pub fn on_sections_changed(&mut self, count: usize) {
        self.stop_timer();
        self.section_count = count;
        self.index = if count == 0 { 0 } else { self.index % count };

        if count > 0 && !self.paused {
            self.start_timer();
        }

        info!(
            sections = count,
            index = ?self.current_index(),
            phase = ?self.phase(),
            "section list changed"
        );
    }

    /// Pointer entered the dashboard: suspend rotation.
    pub fn pointer_enter(&mut self) {
        if self.paused {
            return;
        }
        self.paused = true;
        self.stop_timer();
        debug!(index = ?self.current_index(), "rotation paused");
    }

    /// Pointer left the dashboard: resume rotation with a fresh full period.
    ///
    /// Leaving while not paused does nothing.
    pub fn pointer_leave(&mut self) {
        if !self.paused {
            return;
        }
        self.paused = false;
        if self.section_count > 0 {
            self.start_timer();
        }
        debug!(index = ?self.current_index(), "rotation resumed");
    }

    /// Manual "next": same step as a timer firing.  Pause state and timer are
    /// left alone.
    pub fn next(&mut self) {
        self.advance();
    }

    /// Manual "previous": steps back with wraparound; stays at 0 when there
    /// are no sections.
    pub fn previous(&mut self) {
        self.index = if self.section_count == 0 {
            0
        } else {
            (self.index + self.section_count - 1) % self.section_count
        };
        debug!(index = ?self.current_index(), "previous section");
    }

    /// A timer fired.  Returns `true` when it was the live timer and the
    /// index advanced; stale firings are ignored.
    pub fn on_timer_fired(&mut self, id: TimerId) -> bool {
        if self.timer != Some(id) {
            debug!(timer = id.raw(), "ignoring stale timer firing");
            return false;
        }
        self.advance();
        true
    }

    // ── Internals ─────────────────────────────────────────────────────────────

    fn advance(&mut self) {
        if self.section_count == 0 {
            return;
        }
        let from = self.index;
        self.index = (self.index + 1) % self.section_count;
        debug!(from, to = self.index, total = self.section_count, "slide");
    }

    fn start_timer(&mut self) {
        self.stop_timer();
        self.timer = Some(self.scheduler.start(self.period));
    }

    fn stop_timer(&mut self) {
        if let Some(id) = self.timer.take() {
            self.scheduler.cancel(id);
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
