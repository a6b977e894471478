/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Maintenance status feed: header-keyed rows → [`StatusRow`].
//!
//! The feed header has drifted over time.  Two columns have several accepted
//! spellings and are looked up in a fixed preference order:
//!
//! | Field | Headers, in preference order |
//! |---|---|
//! | `next_appointment` | `PROCHAINE DATE DE RÉPARATION`, `PROCHAIN RENDEZ-VOUS` |
//! | `available` | `DISPONIBLE`, `Disponible`, `APTE À ROULER` |
//!
//! Header names are matched exactly (case and accents included).

use tracing::debug;

use super::{parse_delimited, records_by_header, HeaderRecord};

// ── Header names ──────────────────────────────────────────────────────────────

pub const HEADER_UNIT: &str = "Unité";
pub const HEADER_DATE: &str = "DATE";
pub const HEADER_COMPLAINT: &str = "PLAINTE";
pub const HEADER_REPAIR_DATE: &str = "DATE RÉPARATION";
pub const HEADER_GARAGE: &str = "GARAGE";
pub const HEADER_COMPLETED: &str = "COMPLÉTÉE";
pub const HEADER_NOTE: &str = "NOTE";

/// Accepted spellings of the next-appointment column; the first non-empty
/// value wins.
pub const HEADERS_NEXT_APPOINTMENT: [&str; 2] =
    ["PROCHAINE DATE DE RÉPARATION", "PROCHAIN RENDEZ-VOUS"];

/// Accepted spellings of the availability column; the first column present in
/// the header wins, even when its cell is empty.
pub const HEADERS_AVAILABLE: [&str; 3] = ["DISPONIBLE", "Disponible", "APTE À ROULER"];

// ── Availability ──────────────────────────────────────────────────────────────

/// Tri-state availability flag of a truck.
///
/// `Unknown` is a state of its own: a blank or unrecognised cell must not be
/// rendered as "not available".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Availability {
    Yes,
    No,
    #[default]
    Unknown,
}

impl Availability {
    /// `Some(true)` / `Some(false)` / `None`.
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Availability::Yes => Some(true),
            Availability::No => Some(false),
            Availability::Unknown => None,
        }
    }

    /// Display label used by the status table (`oui`, `non`, or blank).
    pub fn label(self) -> &'static str {
        match self {
            Availability::Yes => "oui",
            Availability::No => "non",
            Availability::Unknown => "",
        }
    }
}

/// Parses a yes/no word in French or English.
///
/// Trimmed and case-insensitive: `oui`, `yes`, `true` → [`Availability::Yes`];
/// `non`, `no`, `false` → [`Availability::No`]; anything else, including a
/// missing cell, → [`Availability::Unknown`].
pub fn to_bool_oui_non(value: Option<&str>) -> Availability {
    let word = value.unwrap_or_default().trim().to_lowercase();
    match word.as_str() {
        "oui" | "yes" | "true" => Availability::Yes,
        "non" | "no" | "false" => Availability::No,
        _ => Availability::Unknown,
    }
}

// ── StatusRow ─────────────────────────────────────────────────────────────────

/// One maintenance record of the status feed.
///
/// Every text field is an owned `String` that defaults to `""`; a column
/// missing from the feed never yields an absent value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusRow {
    pub unit: String,
    pub date: String,
    pub complaint: String,
    pub repair_date: String,
    pub garage: String,
    pub completed: String,
    pub next_appointment: String,
    pub available: Availability,
    pub note: String,
}

impl StatusRow {
    /// The eight text fields, in column order.
    pub fn text_fields(&self) -> [&str; 8] {
        [
            self.unit.as_str(),
            self.date.as_str(),
            self.complaint.as_str(),
            self.repair_date.as_str(),
            self.garage.as_str(),
            self.completed.as_str(),
            self.next_appointment.as_str(),
            self.note.as_str(),
        ]
    }

    /// `true` when every text field is empty after trimming and availability
    /// is unknown.  A lone `oui` / `non` keeps the row.
    pub fn is_blank(&self) -> bool {
        self.available == Availability::Unknown
            && self.text_fields().iter().all(|f| f.trim().is_empty())
    }
}

/// Maps one header-keyed record onto a [`StatusRow`].
pub fn map_row(record: &HeaderRecord) -> StatusRow {
    let text = |name: &str| record.get(name).unwrap_or_default().trim().to_string();

    let next_appointment = HEADERS_NEXT_APPOINTMENT
        .iter()
        .map(|name| text(name))
        .find(|value| !value.is_empty())
        .unwrap_or_default();

    let available = to_bool_oui_non(HEADERS_AVAILABLE.iter().find_map(|name| record.get(name)));

    StatusRow {
        unit: text(HEADER_UNIT),
        date: text(HEADER_DATE),
        complaint: text(HEADER_COMPLAINT),
        repair_date: text(HEADER_REPAIR_DATE),
        garage: text(HEADER_GARAGE),
        completed: text(HEADER_COMPLETED),
        next_appointment,
        available,
        note: text(HEADER_NOTE),
    }
}

/// Parses the whole status feed.
///
/// Returns `None` when the text holds no non-blank line at all (not even a
/// header); callers keep the rows they already have in that case.  Otherwise
/// returns the mapped rows with fully blank ones removed.
pub fn parse_status_text(text: &str) -> Option<Vec<StatusRow>> {
    let matrix = parse_delimited(text);
    if matrix.is_empty() {
        return None;
    }

    let records = records_by_header(&matrix);
    let total = records.len();
    let rows: Vec<StatusRow> = records
        .iter()
        .map(map_row)
        .filter(|row| !row.is_blank())
        .collect();

    debug!(
        records = total,
        kept = rows.len(),
        "status feed parsed"
    );

    Some(rows)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Unité;DATE;PLAINTE;DATE RÉPARATION;GARAGE;COMPLÉTÉE;PROCHAIN RENDEZ-VOUS;DISPONIBLE;NOTE";

    fn record(header: &str, line: &str) -> HeaderRecord {
        let matrix = parse_delimited(&format!("{header}\n{line}"));
        records_by_header(&matrix).remove(0)
    }

    // ── to_bool_oui_non ───────────────────────────────────────────────────────

    #[test]
    fn yes_words_are_recognised() {
        assert_eq!(to_bool_oui_non(Some("OUI")), Availability::Yes);
        assert_eq!(to_bool_oui_non(Some("yes")), Availability::Yes);
        assert_eq!(to_bool_oui_non(Some(" True ")), Availability::Yes);
    }

    #[test]
    fn no_words_are_recognised() {
        assert_eq!(to_bool_oui_non(Some(" non ")), Availability::No);
        assert_eq!(to_bool_oui_non(Some("NO")), Availability::No);
        assert_eq!(to_bool_oui_non(Some("false")), Availability::No);
    }

    #[test]
    fn empty_missing_or_unknown_words_are_unknown() {
        assert_eq!(to_bool_oui_non(Some("")), Availability::Unknown);
        assert_eq!(to_bool_oui_non(None), Availability::Unknown);
        assert_eq!(to_bool_oui_non(Some("peut-être")), Availability::Unknown);
        assert_eq!(to_bool_oui_non(Some("1")), Availability::Unknown);
    }

    #[test]
    fn availability_labels_and_bools() {
        assert_eq!(Availability::Yes.as_bool(), Some(true));
        assert_eq!(Availability::No.as_bool(), Some(false));
        assert_eq!(Availability::Unknown.as_bool(), None);
        assert_eq!(Availability::Unknown.label(), "");
        assert_eq!(Availability::No.label(), "non");
    }

    // ── map_row ───────────────────────────────────────────────────────────────

    #[test]
    fn map_row_fills_every_field() {
        let row = map_row(&record(
            HEADER,
            "RO12;2024-03-01;Freins;2024-03-04;Garage Nord;non;2024-03-10;oui;pièce commandée",
        ));
        assert_eq!(row.unit, "RO12");
        assert_eq!(row.date, "2024-03-01");
        assert_eq!(row.complaint, "Freins");
        assert_eq!(row.repair_date, "2024-03-04");
        assert_eq!(row.garage, "Garage Nord");
        assert_eq!(row.completed, "non");
        assert_eq!(row.next_appointment, "2024-03-10");
        assert_eq!(row.available, Availability::Yes);
        assert_eq!(row.note, "pièce commandée");
    }

    #[test]
    fn missing_headers_default_to_empty_and_unknown() {
        let row = map_row(&record("Unité;AUTRE", "CA3;ignored"));
        assert_eq!(row.unit, "CA3");
        assert_eq!(row.date, "");
        assert_eq!(row.next_appointment, "");
        assert_eq!(row.available, Availability::Unknown);
        assert_eq!(row.note, "");
    }

    #[test]
    fn next_appointment_prefers_the_newer_header() {
        let header = "Unité;PROCHAIN RENDEZ-VOUS;PROCHAINE DATE DE RÉPARATION";
        let row = map_row(&record(header, "LA1;old;new"));
        assert_eq!(row.next_appointment, "new");
    }

    #[test]
    fn next_appointment_falls_back_when_preferred_cell_is_blank() {
        let header = "Unité;PROCHAINE DATE DE RÉPARATION;PROCHAIN RENDEZ-VOUS";
        let row = map_row(&record(header, "LA1; ;2024-05-05"));
        assert_eq!(row.next_appointment, "2024-05-05");
    }

    #[test]
    fn available_uses_first_present_header_in_preference_order() {
        let header = "Unité;APTE À ROULER;Disponible";
        let row = map_row(&record(header, "RO1;oui;non"));
        assert_eq!(row.available, Availability::No);

        let row = map_row(&record("Unité;APTE À ROULER", "RO1;oui"));
        assert_eq!(row.available, Availability::Yes);
    }

    #[test]
    fn available_present_but_blank_does_not_fall_through() {
        let header = "Unité;DISPONIBLE;APTE À ROULER";
        let row = map_row(&record(header, "RO1;;oui"));
        assert_eq!(row.available, Availability::Unknown);
    }

    #[test]
    fn header_names_are_case_and_accent_sensitive() {
        let row = map_row(&record("unite;Date", "RO1;2024"));
        assert_eq!(row.unit, "");
        assert_eq!(row.date, "");
    }

    // ── parse_status_text ─────────────────────────────────────────────────────

    #[test]
    fn blank_rows_are_discarded_and_partial_rows_kept() {
        let text = format!("{HEADER}\n;;;;;;;;\n;;;;;;;peut-être;\n;;PLAINTE SEULE;;;;;;\n");
        let rows = parse_status_text(&text).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].complaint, "PLAINTE SEULE");
    }

    #[test]
    fn availability_alone_keeps_the_row() {
        let rows = parse_status_text("Unité;DATE;DISPONIBLE\n;;oui\n;;non\n").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].available, Availability::Yes);
        assert_eq!(rows[1].available, Availability::No);
        assert!(rows.iter().all(|r| r.unit.is_empty()));
    }

    #[test]
    fn header_only_feed_yields_no_rows() {
        assert_eq!(parse_status_text(HEADER), Some(vec![]));
    }

    #[test]
    fn empty_feed_yields_none() {
        assert_eq!(parse_status_text(""), None);
        assert_eq!(parse_status_text("\u{FEFF}\r\n\r\n"), None);
    }

    #[test]
    fn bom_before_header_does_not_hide_the_unit_column() {
        let text = format!("\u{FEFF}{HEADER}\r\nRO5;;;;;;;non;\r\n");
        let rows = parse_status_text(&text).unwrap();
        assert_eq!(rows[0].unit, "RO5");
        assert_eq!(rows[0].available, Availability::No);
    }

    #[test]
    fn parsing_twice_gives_identical_rows() {
        let text = format!("{HEADER}\nRO1;a;b;c;d;e;f;oui;g\nCA2;;;;;;;;");
        assert_eq!(parse_status_text(&text), parse_status_text(&text));
    }
}
