/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Plain-text rendering of the visible section.
//!
//! This is a thin view: it formats whatever [`DashboardView`] holds and keeps
//! no state between frames.

use std::io::{self, Write};
use std::time::Duration;

use chrono::{DateTime, Local, Utc, Weekday};

use crate::parse::schedule::{is_current_day, weekday_of, ScheduleDocument};
use crate::parse::status::StatusRow;
use crate::section::{Section, SectionKind};

/// Column titles of the status table.
const STATUS_COLUMNS: [&str; 9] = [
    "Unité",
    "DATE",
    "PLAINTE",
    "DATE RÉPARATION",
    "GARAGE",
    "COMPLÉTÉE",
    "PROCHAIN RENDEZ-VOUS",
    "DISPONIBLE",
    "NOTE",
];

/// Title shown when no section is current.
const FALLBACK_TITLE: &str = "Tableau";

/// Everything needed to draw one frame.
#[derive(Debug, Clone)]
pub struct DashboardView<'a> {
    pub section: Option<&'a Section>,
    pub schedule: &'a ScheduleDocument,
    /// `(index, count)` of the visible section.
    pub position: Option<(usize, usize)>,
    pub error: Option<&'a str>,
    pub last_updated: Option<DateTime<Utc>>,
    pub paused: bool,
    pub rotation_period: Duration,
    /// Day used to highlight the schedule.
    pub today: Weekday,
}

/// Draws frames.
pub trait Renderer {
    fn render(&mut self, view: &DashboardView<'_>) -> io::Result<()>;
}

// ── TextRenderer ──────────────────────────────────────────────────────────────

/// Renders frames as aligned text tables.
pub struct TextRenderer<W: Write> {
    out: W,
    clear_screen: bool,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            clear_screen: false,
        }
    }

    /// Clears the terminal before every frame.
    pub fn clearing(mut self) -> Self {
        self.clear_screen = true;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn render(&mut self, view: &DashboardView<'_>) -> io::Result<()> {
        let mut frame = String::new();
        render_frame(&mut frame, view);

        if self.clear_screen {
            self.out.write_all(b"\x1b[2J\x1b[H")?;
        }
        self.out.write_all(frame.as_bytes())?;
        self.out.flush()
    }
}

/// Appends the text of one frame to `frame`.
pub fn render_frame(frame: &mut String, view: &DashboardView<'_>) {
    let title = view.section.map_or(FALLBACK_TITLE, |s| s.name.as_str());
    let mode = if view.paused {
        "en pause".to_string()
    } else {
        format!("Défilement auto: {}s", view.rotation_period.as_secs())
    };
    frame.push_str(&format!("< Précédent | {title} | Suivant >    {mode}\n"));

    if let Some(error) = view.error {
        frame.push_str(&format!("!! {error}\n"));
    }

    match view.section {
        Some(section) if section.kind == SectionKind::Schedule => {
            frame.push_str(&schedule_table(view.schedule, view.today));
        }
        section => {
            let rows = section.map(|s| s.rows.as_slice()).unwrap_or_default();
            frame.push_str(&status_table(rows));
            if let Some(updated) = view.last_updated {
                frame.push_str(&format!(
                    "Dernière mise à jour: {}\n",
                    updated.with_timezone(&Local).format("%Y-%m-%d %H:%M")
                ));
            }
        }
    }

    if let Some((index, count)) = view.position {
        frame.push_str(&format!("{} / {}\n", index + 1, count));
    }
}

/// Status rows as a table.  Rows of unavailable trucks are marked with `*`.
pub fn status_table(rows: &[StatusRow]) -> String {
    let header: Vec<String> = std::iter::once(String::new())
        .chain(STATUS_COLUMNS.iter().map(|c| c.to_string()))
        .collect();

    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            let marker = if row.available.as_bool() == Some(false) {
                "*"
            } else {
                ""
            };
            vec![
                marker.to_string(),
                row.unit.clone(),
                row.date.clone(),
                row.complaint.clone(),
                row.repair_date.clone(),
                row.garage.clone(),
                row.completed.clone(),
                row.next_appointment.clone(),
                row.available.label().to_string(),
                row.note.clone(),
            ]
        })
        .collect();

    format_table(&header, &body)
}

/// Short tag of the working day named in a schedule day label, blank for
/// weekend or unrecognised labels.
pub fn day_tag(day_label: &str) -> &'static str {
    match weekday_of(day_label) {
        Some(Weekday::Mon) => "LUN",
        Some(Weekday::Tue) => "MAR",
        Some(Weekday::Wed) => "MER",
        Some(Weekday::Thu) => "JEU",
        Some(Weekday::Fri) => "VEN",
        _ => "",
    }
}

/// Schedule document as a table padded to its widest row.
///
/// The supplier name is printed on the first row of its group only; each day
/// label is followed by its [`day_tag`]; rows for `today` are marked with `>`.
pub fn schedule_table(schedule: &ScheduleDocument, today: Weekday) -> String {
    let width = schedule.max_units();

    let mut header = vec![
        String::new(),
        "Fournisseur".to_string(),
        "Jour".to_string(),
        String::new(),
    ];
    header.extend((1..=width).map(|i| format!("Unité {i}")));

    let mut body = Vec::new();
    for (supplier, entries) in &schedule.rows {
        for (i, entry) in entries.iter().enumerate() {
            let marker = if is_current_day(&entry.day, today) { ">" } else { "" };
            let mut cells = vec![
                marker.to_string(),
                if i == 0 { supplier.clone() } else { String::new() },
                entry.day.clone(),
                day_tag(&entry.day).to_string(),
            ];
            cells.extend(entry.padded_units(width).into_iter().map(str::to_string));
            body.push(cells);
        }
    }

    format!("{}\n{}", schedule.display_title(), format_table(&header, &body))
}

/// Left-aligns cells into columns separated by ` | `.
fn format_table(header: &[String], body: &[Vec<String>]) -> String {
    let columns = std::iter::once(header.len())
        .chain(body.iter().map(Vec::len))
        .max()
        .unwrap_or(0);

    let mut widths = vec![0usize; columns];
    for row in std::iter::once(header).chain(body.iter().map(Vec::as_slice)) {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let line = |row: &[String]| {
        let cells: Vec<String> = widths
            .iter()
            .enumerate()
            .map(|(i, &w)| format!("{:<w$}", row.get(i).map(String::as_str).unwrap_or("")))
            .collect();
        format!("{}\n", cells.join(" | ").trim_end())
    };

    let mut out = line(header);
    out.push_str(&format!(
        "{}\n",
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-")
    ));
    for row in body {
        out.push_str(&line(row.as_slice()));
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::schedule::parse_schedule_text;
    use crate::parse::status::parse_status_text;
    use crate::section::build_sections;

    fn view<'a>(
        section: Option<&'a Section>,
        schedule: &'a ScheduleDocument,
        position: Option<(usize, usize)>,
    ) -> DashboardView<'a> {
        DashboardView {
            section,
            schedule,
            position,
            error: None,
            last_updated: None,
            paused: false,
            rotation_period: Duration::from_secs(15),
            today: Weekday::Tue,
        }
    }

    #[test]
    fn status_frame_shows_title_rows_and_pager() {
        let rows = parse_status_text("Unité;DISPONIBLE;NOTE\nRO1;non;attente\nRO2;oui;").unwrap();
        let doc = ScheduleDocument::default();
        let sections = build_sections(&rows, &doc);

        let mut r = TextRenderer::new(Vec::new());
        r.render(&view(Some(&sections[0]), &doc, Some((0, 4)))).unwrap();
        let out = String::from_utf8(r.into_inner()).unwrap();

        assert!(out.starts_with("< Précédent | ROLL-OFF | Suivant >    Défilement auto: 15s\n"));
        let ro1 = out.lines().find(|l| l.contains("RO1")).unwrap();
        assert!(ro1.starts_with('*'), "{ro1}");
        assert!(ro1.contains("attente"));
        let ro2 = out.lines().find(|l| l.contains("RO2")).unwrap();
        assert!(!ro2.starts_with('*'));
        assert!(out.ends_with("1 / 4\n"));
    }

    #[test]
    fn schedule_frame_pads_units_and_marks_today() {
        let doc = parse_schedule_text("Semaine 3\nA;Lundi;RO1;RO2;RO3\n;Mardi;ca1\nB;Mardi");
        let sections = build_sections(&[], &doc);

        let mut frame = String::new();
        render_frame(&mut frame, &view(Some(&sections[4]), &doc, Some((4, 5))));

        assert!(frame.contains("Planification atelier"));
        assert!(frame.contains("Semaine 3\n"));
        assert!(frame.contains("Unité 3"));
        assert!(!frame.contains("Unité 4"));

        let tuesday: Vec<&str> = frame.lines().filter(|l| l.contains("Mardi")).collect();
        assert_eq!(tuesday.len(), 2);
        assert!(tuesday.iter().all(|l| l.starts_with('>')));
        // supplier printed once per group
        assert_eq!(frame.matches("A ").count(), 1);
        assert!(frame.ends_with("5 / 5\n"));
    }

    #[test]
    fn schedule_rows_carry_their_weekday_tag() {
        let doc = parse_schedule_text("S\nA;Lundi 12/03;RO1\n;MERCREDI;RO2\n;Samedi;RO3");
        let table = schedule_table(&doc, Weekday::Sun);

        let tag_of = |day: &str| {
            let line = table.lines().find(|l| l.contains(day)).unwrap();
            line.split(" | ").nth(3).unwrap().trim().to_string()
        };
        assert_eq!(tag_of("Lundi 12/03"), "LUN");
        assert_eq!(tag_of("MERCREDI"), "MER");
        assert_eq!(tag_of("Samedi"), "");
        assert_eq!(day_tag("vendredi"), "VEN");
    }

    #[test]
    fn frame_without_section_uses_fallback_title() {
        let doc = ScheduleDocument::default();
        let mut v = view(None, &doc, None);
        v.paused = true;
        v.error = Some("Impossible de charger le CSV statut");
        let mut frame = String::new();
        render_frame(&mut frame, &v);

        assert!(frame.starts_with("< Précédent | Tableau | Suivant >    en pause\n"));
        assert!(frame.contains("!! Impossible de charger le CSV statut\n"));
        assert!(!frame.contains(" / "));
    }

    #[test]
    fn format_table_aligns_columns() {
        let header = vec!["a".to_string(), "bb".to_string()];
        let body = vec![vec!["ccc".to_string(), "d".to_string()]];
        assert_eq!(format_table(&header, &body), "a   | bb\n----+---\nccc | d\n");
    }
}
