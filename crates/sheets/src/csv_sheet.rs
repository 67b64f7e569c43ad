// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::borrow::Cow;

use csv::StringRecord;
use encoding_rs::WINDOWS_1252;
use seido_import_domain::{ParseResult, SheetKind};
use tracing::{debug, info};

use crate::error::ParseError;
use crate::table::build_sheet;

/// Reads a CSV file holding a single sheet.
///
/// The sheet is identified from the file stem (`contacts.csv`,
/// `Immeubles.csv`, ...). The other three sheets stay empty. Both `,` and
/// `;` separators are accepted, as is Windows-1252 content.
///
/// # Errors
///
/// Returns `ParseError::UnrecognizedCsvSheet` when the stem names no sheet
/// and `ParseError::Csv` when the content is malformed.
pub fn parse_csv(file_stem: &str, bytes: &[u8]) -> Result<ParseResult, ParseError> {
    let kind: SheetKind =
        SheetKind::from_sheet_name(file_stem).ok_or_else(|| ParseError::UnrecognizedCsvSheet {
            file_name: file_stem.to_string(),
        })?;

    let text: Cow<'_, str> = decode(bytes);
    let content: &str = text.strip_prefix('\u{feff}').unwrap_or(&text);
    let delimiter: u8 = detect_delimiter(content);
    debug!(sheet = %kind, delimiter = %char::from(delimiter), "Reading CSV");

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(content.as_bytes());

    let mut rows: Vec<(usize, Vec<String>)> = Vec::new();
    for result in reader.records() {
        let record: StringRecord = result?;
        let line: usize = record
            .position()
            .and_then(|position| usize::try_from(position.line()).ok())
            .unwrap_or(rows.len() + 1);
        rows.push((line, record.iter().map(str::to_string).collect()));
    }

    let mut result: ParseResult = ParseResult::default();
    *result.sheet_mut(kind) = build_sheet(kind, rows);
    info!(stats = ?result.stats(), "CSV parsed");
    Ok(result)
}

/// UTF-8 when valid, otherwise Windows-1252 as written by spreadsheet exports.
fn decode(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => WINDOWS_1252.decode_without_bom_handling(bytes).0,
    }
}

/// Picks the separator that occurs most often on the header line.
fn detect_delimiter(content: &str) -> u8 {
    let header: &str = content.lines().next().unwrap_or_default();
    let commas: usize = header.matches(',').count();
    [b';', b'\t']
        .into_iter()
        .map(|candidate| (candidate, header.matches(char::from(candidate)).count()))
        .filter(|(_, count)| *count > commas)
        .max_by_key(|(_, count)| *count)
        .map_or(b',', |(candidate, _)| candidate)
}
