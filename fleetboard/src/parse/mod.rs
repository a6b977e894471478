/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Tolerant parsing of the `;`-delimited feeds.
//!
//! Both feeds share the same low-level shape:
//!
//! ```text
//! raw text ──strip BOM──► lines (blank ones dropped) ──split ';'──► trimmed cells
//! ```
//!
//! Nothing in this module returns an error.  The feeds are edited by hand in
//! a spreadsheet and exported without validation, so short rows, long rows and
//! stray blank lines are all absorbed here with empty-string defaults.
//!
//! * [`status`] maps the header-keyed maintenance feed onto [`StatusRow`]s.
//! * [`schedule`] interprets the positional workshop schedule feed.
//!
//! [`StatusRow`]: status::StatusRow

pub mod schedule;
pub mod status;

// ── Constants ─────────────────────────────────────────────────────────────────

/// Field separator used by both feeds.
pub const FIELD_SEPARATOR: char = ';';

/// Byte-order mark that spreadsheet exports prepend to UTF-8 text.
const BOM: char = '\u{FEFF}';

// ── Line / cell splitting ─────────────────────────────────────────────────────

/// Removes a single leading byte-order mark, if present.
pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix(BOM).unwrap_or(text)
}

/// Splits `text` into lines on `\n` or `\r\n` and drops every line that is
/// empty after trimming.
///
/// The surviving lines are returned untrimmed; cell trimming happens in
/// [`split_cells`].
pub fn split_lines(text: &str) -> Vec<&str> {
    strip_bom(text)
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect()
}

/// Splits one line on [`FIELD_SEPARATOR`] and trims every cell.
pub fn split_cells(line: &str) -> Vec<String> {
    line.split(FIELD_SEPARATOR)
        .map(|cell| cell.trim().to_string())
        .collect()
}

/// Parses raw feed text into a matrix of trimmed cells.
///
/// Rows keep their own width: no padding, no truncation.  Consumers decide
/// whether to map cells by header name ([`records_by_header`]) or by
/// position.
pub fn parse_delimited(text: &str) -> Vec<Vec<String>> {
    split_lines(text).into_iter().map(split_cells).collect()
}

// ── Header-keyed records ──────────────────────────────────────────────────────

/// One data row keyed by the header line of its feed.
///
/// Cells missing from a short row read as `""`; cells beyond the header width
/// are not reachable by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderRecord {
    fields: Vec<(String, String)>,
}

impl HeaderRecord {
    /// Builds a record by zipping `header` with `cells`, padding with empty
    /// strings when `cells` is shorter.
    pub fn new(header: &[String], cells: &[String]) -> Self {
        let fields = header
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), cells.get(i).cloned().unwrap_or_default()))
            .collect();
        Self { fields }
    }

    /// Returns the cell under column `name`, or `None` if the header has no
    /// such column.
    ///
    /// When the header repeats a name, the leftmost column wins.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(header, _)| header == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Treats the first row of `matrix` as the header and keys every following
/// row by it.
///
/// Returns an empty list when the matrix is empty or holds only a header.
pub fn records_by_header(matrix: &[Vec<String>]) -> Vec<HeaderRecord> {
    match matrix.split_first() {
        Some((header, rows)) => rows
            .iter()
            .map(|cells| HeaderRecord::new(header, cells))
            .collect(),
        None => Vec::new(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
