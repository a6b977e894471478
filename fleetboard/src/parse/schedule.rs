/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Workshop schedule feed → [`ScheduleDocument`].
//!
//! The feed has no header.  Its layout is positional:
//!
//! ```text
//! PLANIFICATION;SEMAINE 12            ← title line (non-empty cells joined)
//! Fournisseur A;Lundi;RO1;ca2         ← supplier, day, units...
//! ;Mardi;LA3                          ← supplier carried forward
//! Fournisseur B;Lundi;;RO9            ← empty unit cells dropped
//! ```
//!
//! Unit lists have a variable width per row.  Padding for display is the
//! renderer's job ([`ScheduleEntry::padded_units`]).

use chrono::Weekday;
use indexmap::IndexMap;
use tracing::debug;

use super::{split_cells, split_lines, FIELD_SEPARATOR};

/// Header shown above the schedule table when the feed has no title.
pub const DEFAULT_SCHEDULE_TITLE: &str = "PLANIFICATION ATELIER";

// ── Data types ────────────────────────────────────────────────────────────────

/// One supplier/day row of the schedule feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
    /// Carried-forward supplier name.
    pub supplier: String,
    /// Day label exactly as written in the feed.
    pub day: String,
    /// Upper-cased unit identifiers, empty cells removed.
    pub units: Vec<String>,
}

impl ScheduleEntry {
    /// Units padded with empty strings up to `width` cells.
    ///
    /// Rows wider than `width` are returned whole.
    pub fn padded_units(&self, width: usize) -> Vec<&str> {
        let mut cells: Vec<&str> = self.units.iter().map(String::as_str).collect();
        if cells.len() < width {
            cells.resize(width, "");
        }
        cells
    }
}

/// The parsed schedule feed.
///
/// `rows` keeps suppliers in the order they first appear in the feed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScheduleDocument {
    pub title: String,
    pub rows: IndexMap<String, Vec<ScheduleEntry>>,
}

impl ScheduleDocument {
    /// `true` when the document carries something worth a section: a
    /// non-blank title or at least one supplier group.
    pub fn has_content(&self) -> bool {
        !self.title.trim().is_empty() || !self.rows.is_empty()
    }

    /// Number of unit columns needed to show every row (never less than 1).
    pub fn max_units(&self) -> usize {
        self.rows
            .values()
            .flatten()
            .map(|entry| entry.units.len())
            .max()
            .unwrap_or(0)
            .max(1)
    }

    /// Title to display, falling back to [`DEFAULT_SCHEDULE_TITLE`].
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            DEFAULT_SCHEDULE_TITLE
        } else {
            &self.title
        }
    }

    /// Total number of entries across all suppliers.
    pub fn entry_count(&self) -> usize {
        self.rows.values().map(Vec::len).sum()
    }
}

// ── Parser ────────────────────────────────────────────────────────────────────

/// Parses the raw schedule feed.
///
/// An entirely blank feed yields the default document (empty title, no rows).
pub fn parse_schedule_text(text: &str) -> ScheduleDocument {
    let lines = split_lines(text);
    let Some((title_line, body)) = lines.split_first() else {
        return ScheduleDocument::default();
    };

    let title = title_line
        .split(FIELD_SEPARATOR)
        .filter(|cell| !cell.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let mut rows: IndexMap<String, Vec<ScheduleEntry>> = IndexMap::new();
    let mut current_supplier = String::new();

    for line in body {
        let mut cells = split_cells(line).into_iter();

        let supplier = cells.next().unwrap_or_default();
        if !supplier.is_empty() {
            current_supplier = supplier;
        }
        let day = cells.next().unwrap_or_default();
        let units: Vec<String> = cells
            .filter(|cell| !cell.is_empty())
            .map(|cell| cell.to_uppercase())
            .collect();

        rows.entry(current_supplier.clone())
            .or_default()
            .push(ScheduleEntry {
                supplier: current_supplier.clone(),
                day,
                units,
            });
    }

    let doc = ScheduleDocument { title, rows };
    debug!(
        title = %doc.title,
        suppliers = doc.rows.len(),
        entries = doc.entry_count(),
        "schedule feed parsed"
    );
    doc
}

// ── Day helpers ───────────────────────────────────────────────────────────────

/// French weekday names, Monday first.
const FRENCH_WEEKDAYS: [(Weekday, &str); 7] = [
    (Weekday::Mon, "lundi"),
    (Weekday::Tue, "mardi"),
    (Weekday::Wed, "mercredi"),
    (Weekday::Thu, "jeudi"),
    (Weekday::Fri, "vendredi"),
    (Weekday::Sat, "samedi"),
    (Weekday::Sun, "dimanche"),
];

/// French name of `day`, lower case.
pub fn french_weekday_name(day: Weekday) -> &'static str {
    FRENCH_WEEKDAYS[day.num_days_from_monday() as usize].1
}

/// Working day (Monday to Friday) named in a free-text day label.
///
/// Case-insensitive substring match, so `"Lundi 12/03"` is a Monday.  Weekend
/// labels get no highlighting and return `None`.
pub fn weekday_of(day_label: &str) -> Option<Weekday> {
    let label = day_label.trim().to_lowercase();
    FRENCH_WEEKDAYS[..5]
        .iter()
        .find(|(_, name)| label.contains(name))
        .map(|(day, _)| *day)
}

/// `true` when `day_label` names `today`.
pub fn is_current_day(day_label: &str, today: Weekday) -> bool {
    day_label
        .to_lowercase()
        .contains(french_weekday_name(today))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(supplier: &str, day: &str, units: &[&str]) -> ScheduleEntry {
        ScheduleEntry {
            supplier: supplier.to_string(),
            day: day.to_string(),
            units: units.iter().map(|u| u.to_string()).collect(),
        }
    }

    // ── parse_schedule_text ───────────────────────────────────────────────────

    #[test]
    fn reference_document_parses_with_carry_forward() {
        let doc = parse_schedule_text("TitreA;TitreB\nSupp1;Lundi;U1;U2\n;Mardi;U3");
        assert_eq!(doc.title, "TitreA TitreB");
        assert_eq!(doc.rows.len(), 1);
        assert_eq!(
            doc.rows["Supp1"],
            vec![
                entry("Supp1", "Lundi", &["U1", "U2"]),
                entry("Supp1", "Mardi", &["U3"]),
            ]
        );
    }

    #[test]
    fn title_skips_empty_cells() {
        let doc = parse_schedule_text(";PLANIF; ;SEMAINE 12;\nA;Lundi");
        assert_eq!(doc.title, "PLANIF SEMAINE 12");
    }

    #[test]
    fn units_are_upper_cased_and_empty_cells_dropped() {
        let doc = parse_schedule_text("T\nA;Lundi;ro1;;  ;ca2;\n");
        assert_eq!(doc.rows["A"][0].units, vec!["RO1", "CA2"]);
    }

    #[test]
    fn day_label_is_kept_verbatim() {
        let doc = parse_schedule_text("T\nA;lundi matin;X");
        assert_eq!(doc.rows["A"][0].day, "lundi matin");
    }

    #[test]
    fn interleaved_suppliers_group_in_first_seen_order() {
        let text = "T\nB;Lundi;1\nA;Lundi;2\nB;Mardi;3\n;Mercredi;4";
        let doc = parse_schedule_text(text);
        let suppliers: Vec<&str> = doc.rows.keys().map(String::as_str).collect();
        assert_eq!(suppliers, vec!["B", "A"]);
        assert_eq!(doc.rows["B"].len(), 3);
        assert_eq!(doc.rows["B"][2].day, "Mercredi");
        assert_eq!(doc.rows["A"].len(), 1);
    }

    #[test]
    fn rows_before_any_supplier_group_under_empty_name() {
        let doc = parse_schedule_text("T\n;Lundi;X\nA;Mardi;Y");
        assert_eq!(doc.rows[""][0].units, vec!["X"]);
        assert_eq!(doc.rows["A"][0].supplier, "A");
    }

    #[test]
    fn row_with_only_supplier_has_empty_day_and_units() {
        let doc = parse_schedule_text("T\nA");
        assert_eq!(doc.rows["A"], vec![entry("A", "", &[])]);
    }

    #[test]
    fn empty_feed_yields_default_document() {
        assert_eq!(parse_schedule_text(""), ScheduleDocument::default());
        assert_eq!(parse_schedule_text("\u{FEFF}\r\n  \r\n"), ScheduleDocument::default());
    }

    #[test]
    fn title_only_feed_has_content() {
        let doc = parse_schedule_text("\u{FEFF}PLANIF\r\n");
        assert_eq!(doc.title, "PLANIF");
        assert!(doc.rows.is_empty());
        assert!(doc.has_content());
    }

    #[test]
    fn parsing_twice_gives_identical_documents() {
        let text = "T;U\nA;Lundi;x\n;Mardi\nB;Jeudi;y;z";
        assert_eq!(parse_schedule_text(text), parse_schedule_text(text));
    }

    // ── Display helpers ───────────────────────────────────────────────────────

    #[test]
    fn max_units_is_widest_row_and_at_least_one() {
        assert_eq!(ScheduleDocument::default().max_units(), 1);
        let doc = parse_schedule_text("T\nA;Lundi;1;2;3\n;Mardi;4\nB;Jeudi");
        assert_eq!(doc.max_units(), 3);
    }

    #[test]
    fn padded_units_fills_to_width() {
        let e = entry("A", "Lundi", &["X"]);
        assert_eq!(e.padded_units(3), vec!["X", "", ""]);
        assert_eq!(e.padded_units(0), vec!["X"]);
    }

    #[test]
    fn display_title_falls_back_when_empty() {
        assert_eq!(ScheduleDocument::default().display_title(), DEFAULT_SCHEDULE_TITLE);
        let doc = parse_schedule_text("Semaine 3");
        assert_eq!(doc.display_title(), "Semaine 3");
    }

    #[test]
    fn blank_title_without_rows_has_no_content() {
        let doc = ScheduleDocument {
            title: "   ".into(),
            rows: IndexMap::new(),
        };
        assert!(!doc.has_content());
    }

    #[test]
    fn weekday_of_matches_working_days_only() {
        assert_eq!(weekday_of("Lundi"), Some(Weekday::Mon));
        assert_eq!(weekday_of(" MERCREDI 14 "), Some(Weekday::Wed));
        assert_eq!(weekday_of("vendredi pm"), Some(Weekday::Fri));
        assert_eq!(weekday_of("Samedi"), None);
        assert_eq!(weekday_of(""), None);
    }

    #[test]
    fn is_current_day_matches_by_substring() {
        assert!(is_current_day("Jeudi 21", Weekday::Thu));
        assert!(!is_current_day("Jeudi 21", Weekday::Fri));
        assert!(is_current_day("dimanche", Weekday::Sun));
    }
}
