/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Recurring-timer capability used by the rotation controller.
//!
//! The controller only needs two operations, `start` and `cancel`.  Firings
//! are delivered out of band as [`TimerId`]s so that the controller can tell
//! a live timer from one that was cancelled while a tick was already queued.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

/// Opaque identifier of one started timer.  Never reused by a scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Start / cancel capability for recurring timers.
pub trait TimerScheduler {
    /// Starts a timer that fires every `period`, first after one full period.
    fn start(&mut self, period: Duration) -> TimerId;

    /// Stops a timer.  Cancelling an unknown or already cancelled id is a
    /// no-op.
    fn cancel(&mut self, id: TimerId);

    /// Number of timers currently running.
    fn live_timers(&self) -> usize;
}

// ── TokioTimerScheduler ───────────────────────────────────────────────────────

/// Timers backed by spawned `tokio::time::interval` tasks.
///
/// Every firing sends the timer's id on `fired`; the dashboard event loop
/// forwards it to the controller.  Cancelled tasks are aborted, and all
/// remaining ones are aborted when the scheduler is dropped.
pub struct TokioTimerScheduler {
    fired: UnboundedSender<TimerId>,
    tasks: HashMap<TimerId, JoinHandle<()>>,
    next_id: u64,
}

impl TokioTimerScheduler {
    pub fn new(fired: UnboundedSender<TimerId>) -> Self {
        Self {
            fired,
            tasks: HashMap::new(),
            next_id: 0,
        }
    }
}

impl TimerScheduler for TokioTimerScheduler {
    fn start(&mut self, period: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;

        let fired = self.fired.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                if fired.send(id).is_err() {
                    break;
                }
            }
        });

        debug!(timer = id.0, period_ms = period.as_millis() as u64, "timer started");
        self.tasks.insert(id, handle);
        id
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(handle) = self.tasks.remove(&id) {
            handle.abort();
            debug!(timer = id.0, "timer cancelled");
        }
    }

    fn live_timers(&self) -> usize {
        self.tasks.len()
    }
}

impl Drop for TokioTimerScheduler {
    fn drop(&mut self) {
        for (_, handle) in self.tasks.drain() {
            handle.abort();
        }
    }
}

// ── ManualScheduler (tests) ───────────────────────────────────────────────────

/// Deterministic scheduler driven by [`ManualScheduler::advance`].
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct ManualScheduler {
    now: Duration,
    next_id: u64,
    /// id → (period, next due time)
    live: std::collections::BTreeMap<TimerId, (Duration, Duration)>,
    pub started: usize,
    pub cancelled: usize,
}

#[cfg(test)]
impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward by `by` and returns every firing in that
    /// window, in time order.
    pub fn advance(&mut self, by: Duration) -> Vec<TimerId> {
        let until = self.now + by;
        let mut fired: Vec<(Duration, TimerId)> = Vec::new();
        for (id, (period, due)) in self.live.iter_mut() {
            while *due <= until {
                fired.push((*due, *id));
                *due += *period;
            }
        }
        self.now = until;
        fired.sort();
        fired.into_iter().map(|(_, id)| id).collect()
    }

    pub fn is_live(&self, id: TimerId) -> bool {
        self.live.contains_key(&id)
    }
}

#[cfg(test)]
impl TimerScheduler for ManualScheduler {
    fn start(&mut self, period: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.started += 1;
        self.live.insert(id, (period, self.now + period));
        id
    }

    fn cancel(&mut self, id: TimerId) {
        if self.live.remove(&id).is_some() {
            self.cancelled += 1;
        }
    }

    fn live_timers(&self) -> usize {
        self.live.len()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
