/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Grouping of parsed feeds into the rotating display sections.
//!
//! The section list is fully determined by its inputs:
//!
//! ```text
//! [ROLL-OFF] [CHARGEMENT AVANT] [CHARGEMENT LATÉRAL] [Autres camions] ([Planification atelier])
//! ```
//!
//! The four status categories are always present, even when empty; the
//! schedule section only when the schedule document has content.

use crate::parse::schedule::ScheduleDocument;
use crate::parse::status::StatusRow;

/// Name of the trailing schedule section.
pub const SCHEDULE_SECTION_NAME: &str = "Planification atelier";

// ── Category ──────────────────────────────────────────────────────────────────

/// Truck category derived from the unit label prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    RollOff,
    FrontLoader,
    SideLoader,
    Other,
}

impl Category {
    /// Every category in display order.  `Other` is the catch-all and stays
    /// last.
    pub const ALL: [Category; 4] = [
        Category::RollOff,
        Category::FrontLoader,
        Category::SideLoader,
        Category::Other,
    ];

    /// Section title shown on the dashboard.
    pub fn label(self) -> &'static str {
        match self {
            Category::RollOff => "ROLL-OFF",
            Category::FrontLoader => "CHARGEMENT AVANT",
            Category::SideLoader => "CHARGEMENT LATÉRAL",
            Category::Other => "Autres camions",
        }
    }
}

/// Categorises a unit label by its (trimmed, upper-cased) prefix.
///
/// `RO…` → roll-off, `CA…` → front loader, `LA…` → side loader, anything
/// else (including an empty label) → [`Category::Other`].
pub fn categorize(unit: &str) -> Category {
    let unit = unit.trim().to_uppercase();
    if unit.starts_with("RO") {
        Category::RollOff
    } else if unit.starts_with("CA") {
        Category::FrontLoader
    } else if unit.starts_with("LA") {
        Category::SideLoader
    } else {
        Category::Other
    }
}

// ── Section ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Status,
    /// Content lives in the separately held [`ScheduleDocument`].
    Schedule,
}

/// One rotating display unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub kind: SectionKind,
    /// Rows of a status section; always empty for the schedule section.
    pub rows: Vec<StatusRow>,
}

impl Section {
    fn status(category: Category, rows: Vec<StatusRow>) -> Self {
        Self {
            name: category.label().to_string(),
            kind: SectionKind::Status,
            rows,
        }
    }

    fn schedule() -> Self {
        Self {
            name: SCHEDULE_SECTION_NAME.to_string(),
            kind: SectionKind::Schedule,
            rows: Vec::new(),
        }
    }
}

/// Buckets `rows` into the four status sections, keeping input order inside
/// each bucket.
pub fn build_status_sections(rows: &[StatusRow]) -> Vec<Section> {
    Category::ALL
        .iter()
        .map(|&category| {
            let bucket = rows
                .iter()
                .filter(|row| categorize(&row.unit) == category)
                .cloned()
                .collect();
            Section::status(category, bucket)
        })
        .collect()
}

/// `true` when the schedule section should be shown.
pub fn has_schedule(schedule: &ScheduleDocument) -> bool {
    schedule.has_content()
}

/// Full ordered section list: status sections, then the schedule section when
/// [`has_schedule`] holds.
pub fn build_sections(rows: &[StatusRow], schedule: &ScheduleDocument) -> Vec<Section> {
    let mut sections = build_status_sections(rows);
    if has_schedule(schedule) {
        sections.push(Section::schedule());
    }
    sections
}

/// Ordered section names; two lists with the same layout compare equal.
pub fn section_layout(sections: &[Section]) -> Vec<&str> {
    sections.iter().map(|s| s.name.as_str()).collect()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
