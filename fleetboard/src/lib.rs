/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Fleetboard – fleet maintenance dashboard
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── config/     – YAML dashboard configuration (feeds, periods)
//! ├── parse/      – `;`-delimited feed parsing (status rows, schedule document)
//! ├── section.rs  – category buckets and the ordered section list
//! ├── rotation/   – auto-rotation / pause state machine and its timers
//! ├── refresh/    – feed sources and the periodic refresh loop
//! ├── render.rs   – text rendering of the visible section
//! └── dashboard.rs – event loop tying data, sections and rotation together
//! ```

pub mod config;
pub mod dashboard;
pub mod parse;
pub mod refresh;
pub mod render;
pub mod rotation;
pub mod section;
