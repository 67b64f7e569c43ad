// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeMap;
use std::io::Cursor;

use calamine::{Data, Range, Reader, Sheets, open_workbook_auto_from_rs};
use seido_import_domain::{ParseResult, SheetKind};
use time::{Date, Duration, macros::date};
use tracing::{debug, info};

use crate::error::ParseError;
use crate::table::build_sheet;

/// Day zero of the 1900 date system, as Excel counts it.
const EXCEL_EPOCH: Date = date!(1899 - 12 - 30);

/// Reads an `.xlsx` or `.xls` workbook holding the four import sheets.
///
/// # Errors
///
/// Returns `ParseError::Workbook` when the bytes are not a readable
/// workbook and `ParseError::MissingSheets` when any of the four sheets
/// cannot be found by name.
pub fn parse_workbook(bytes: &[u8]) -> Result<ParseResult, ParseError> {
    let mut workbook: Sheets<Cursor<Vec<u8>>> =
        open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

    let mut located: BTreeMap<SheetKind, String> = BTreeMap::new();
    for name in workbook.sheet_names() {
        match SheetKind::from_sheet_name(&name) {
            Some(kind) => {
                located.entry(kind).or_insert(name);
            }
            None => debug!(sheet = %name, "Ignoring unrecognized sheet"),
        }
    }

    let missing: Vec<SheetKind> = SheetKind::ALL
        .into_iter()
        .filter(|kind| !located.contains_key(kind))
        .collect();
    if !missing.is_empty() {
        return Err(ParseError::MissingSheets(missing));
    }

    let mut result: ParseResult = ParseResult::default();
    for (kind, name) in &located {
        let range: Range<Data> = workbook.worksheet_range(name)?;
        *result.sheet_mut(*kind) = build_sheet(*kind, range_rows(&range));
    }

    info!(stats = ?result.stats(), "Workbook parsed");
    Ok(result)
}

/// Yields each row of a range with its 1-based spreadsheet line.
fn range_rows(range: &Range<Data>) -> impl Iterator<Item = (usize, Vec<String>)> + '_ {
    let first_line: usize = range
        .start()
        .map_or(1, |(row, _)| usize::try_from(row).unwrap_or(0) + 1);
    range
        .rows()
        .enumerate()
        .map(move |(index, row)| (first_line + index, row.iter().map(cell_text).collect()))
}

/// Renders a cell as the text a gestionnaire would see in the sheet.
///
/// Dates become `YYYY-MM-DD`; whole numbers lose their fractional part.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Int(n) => n.to_string(),
        Data::Float(n) => float_text(*n),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => excel_serial_date(dt.as_f64())
            .map_or_else(|| float_text(dt.as_f64()), |date| date.to_string()),
        Data::Error(e) => format!("#{e}"),
    }
}

/// Renders a numeric cell. Fractions are never written with exactly three
/// digits, since text amounts read `1234.567` as `1 234 567`.
#[allow(clippy::cast_possible_truncation)]
fn float_text(n: f64) -> String {
    if n.fract().abs() < f64::EPSILON && n.abs() < 1e15 {
        return format!("{}", n as i64);
    }
    let fixed: String = format!("{n:.4}");
    let Some((integer, fraction)) = fixed.split_once('.') else {
        return fixed;
    };
    let trimmed: &str = fraction.trim_end_matches('0');
    match trimmed.len() {
        0 => integer.to_string(),
        3 => format!("{integer}.{fraction}"),
        _ => format!("{integer}.{trimmed}"),
    }
}

/// Converts an Excel serial (1900 date system) to a calendar date.
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub fn excel_serial_date(serial: f64) -> Option<Date> {
    if !serial.is_finite() || serial < 1.0 {
        return None;
    }
    EXCEL_EPOCH.checked_add(Duration::days(serial.floor() as i64))
}
