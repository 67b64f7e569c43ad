// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use seido_import_domain::{ParsedSheet, RawRecord, SheetKind, map_header};
use tracing::debug;

/// Builds a sheet from `(line, cells)` rows in file order.
///
/// The first non-blank row is the header row. Following rows become records
/// keyed by canonical field; unknown columns and blank rows are dropped.
pub fn build_sheet<I>(kind: SheetKind, rows: I) -> ParsedSheet
where
    I: IntoIterator<Item = (usize, Vec<String>)>,
{
    let mut rows = rows
        .into_iter()
        .filter(|(_, cells)| cells.iter().any(|cell| !cell.trim().is_empty()));

    let Some((header_line, header_cells)) = rows.next() else {
        debug!(sheet = %kind, "Sheet has no header row");
        return ParsedSheet::default();
    };

    let headers: Vec<String> = trim_trailing_blanks(header_cells);
    let mapping: Vec<Option<&'static str>> = headers
        .iter()
        .map(|header| map_header(kind, header))
        .collect();
    let ignored: Vec<&str> = headers
        .iter()
        .zip(&mapping)
        .filter(|(header, key)| key.is_none() && !header.trim().is_empty())
        .map(|(header, _)| header.as_str())
        .collect();
    if !ignored.is_empty() {
        debug!(sheet = %kind, ?ignored, "Ignoring unmapped columns");
    }

    let records: Vec<RawRecord> = rows
        .map(|(line, cells)| {
            let mut record: RawRecord = RawRecord::new(line);
            for (cell, key) in cells.iter().zip(&mapping) {
                if let Some(key) = key {
                    record.insert(key, cell);
                }
            }
            record
        })
        .filter(|record| !record.is_blank())
        .collect();

    debug!(
        sheet = %kind,
        header_line,
        rows = records.len(),
        "Sheet read"
    );
    ParsedSheet::new(headers, records)
}

fn trim_trailing_blanks(mut cells: Vec<String>) -> Vec<String> {
    while cells.last().is_some_and(|cell| cell.trim().is_empty()) {
        cells.pop();
    }
    cells
}
