// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod csv_sheet;
mod error;
mod file;
mod table;
mod template;
mod workbook;

#[cfg(test)]
mod tests;

use seido_import_domain::ParseResult;
use tracing::info;

pub use csv_sheet::parse_csv;
pub use error::{ParseError, TemplateError};
pub use file::{FileFormat, ImportFile, MAX_FILE_SIZE};
pub use template::{TEMPLATE_FILE_NAME, TemplateKind, build_template};
pub use workbook::{cell_text, excel_serial_date, parse_workbook};

/// Reads an accepted file into its four sheets.
///
/// Has no side effects beyond building the in-memory result.
///
/// # Errors
///
/// Returns a `ParseError` when the content is unreadable or a required sheet
/// cannot be found.
pub fn parse(file: &ImportFile) -> Result<ParseResult, ParseError> {
    info!(file = file.name(), format = ?file.format(), size = file.size(), "Parsing import file");
    match file.format() {
        FileFormat::Xlsx | FileFormat::Xls => parse_workbook(file.bytes()),
        FileFormat::Csv => parse_csv(file.stem(), file.bytes()),
    }
}
