// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use seido_import_domain::SheetKind;
use thiserror::Error;

fn sheet_list(sheets: &[SheetKind]) -> String {
    sheets
        .iter()
        .map(SheetKind::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Reasons a file cannot be turned into sheets.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The file exceeds the upload ceiling.
    #[error("File is {size} bytes, the maximum accepted size is {max} bytes")]
    FileTooLarge { size: usize, max: usize },

    /// The file name does not carry an accepted extension.
    #[error("Unsupported file type '{file_name}': expected .xlsx, .xls or .csv")]
    UnsupportedExtension { file_name: String },

    /// The file has no content at all.
    #[error("File is empty")]
    EmptyFile,

    /// The workbook is corrupt or not a spreadsheet.
    #[error("Workbook could not be read: {0}")]
    Workbook(#[from] calamine::Error),

    /// The CSV content is malformed.
    #[error("CSV file could not be read: {0}")]
    Csv(#[from] csv::Error),

    /// One or more of the four required sheets is absent.
    #[error("Workbook is missing required sheets: {}", sheet_list(.0))]
    MissingSheets(Vec<SheetKind>),

    /// A CSV file name does not say which sheet it holds.
    #[error(
        "Cannot tell which sheet '{file_name}' holds: \
         name the file after Buildings, Lots, Contacts or Contracts"
    )]
    UnrecognizedCsvSheet { file_name: String },
}

/// Reasons a template workbook cannot be generated.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// The workbook writer failed.
    #[error("Template could not be written: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}
