// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-sheet row preview of a parsed file.
//!
//! The preview only reads the parse result and the validation errors of a
//! session; it never touches the datastore.

use std::collections::BTreeMap;

use seido_import_domain::{
    ImportStats, ParseResult, ParsedSheet, RawRecord, SheetKind, ValidationError,
};
use serde::{Deserialize, Serialize};

/// Status of one previewed row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowPreviewStatus {
    /// Row has no validation error and will be imported.
    Valid,
    /// Row has validation errors and blocks the import.
    Invalid,
}

/// One data row of a sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowPreview {
    /// The 1-based spreadsheet line.
    pub line: usize,
    /// Non-empty cells keyed by canonical field key.
    pub values: BTreeMap<String, String>,
    pub status: RowPreviewStatus,
    /// Zero or more validation messages.
    pub errors: Vec<String>,
}

/// Preview of one sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetPreview {
    pub sheet: SheetKind,
    /// Header cells as written in the file.
    pub headers: Vec<String>,
    pub rows: Vec<RowPreview>,
    pub total_rows: usize,
    pub valid_count: usize,
    pub invalid_count: usize,
    /// Errors that point at no data row of this sheet.
    pub sheet_errors: Vec<String>,
}

/// Preview of a whole file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewResponse {
    pub session_id: String,
    pub stats: ImportStats,
    pub sheets: Vec<SheetPreview>,
    pub error_count: usize,
    pub can_proceed: bool,
}

/// Builds the preview of every sheet in canonical order.
#[must_use]
pub fn build_preview(parsed: &ParseResult, errors: &[ValidationError]) -> Vec<SheetPreview> {
    SheetKind::ALL
        .iter()
        .map(|kind| preview_sheet(*kind, parsed.sheet(*kind), errors))
        .collect()
}

fn preview_sheet(kind: SheetKind, sheet: &ParsedSheet, errors: &[ValidationError]) -> SheetPreview {
    let mut by_line: BTreeMap<usize, Vec<String>> = BTreeMap::new();
    for error in errors.iter().filter(|e| e.sheet == kind) {
        by_line
            .entry(error.row)
            .or_default()
            .push(error.message.clone());
    }

    let rows: Vec<RowPreview> = sheet
        .rows
        .iter()
        .map(|record| preview_row(record, by_line.remove(&record.line).unwrap_or_default()))
        .collect();

    let invalid_count: usize = rows
        .iter()
        .filter(|row| row.status == RowPreviewStatus::Invalid)
        .count();

    SheetPreview {
        sheet: kind,
        headers: sheet.headers.clone(),
        total_rows: rows.len(),
        valid_count: rows.len() - invalid_count,
        invalid_count,
        rows,
        sheet_errors: by_line.into_values().flatten().collect(),
    }
}

fn preview_row(record: &RawRecord, errors: Vec<String>) -> RowPreview {
    let status: RowPreviewStatus = if errors.is_empty() {
        RowPreviewStatus::Valid
    } else {
        RowPreviewStatus::Invalid
    };
    RowPreview {
        line: record.line,
        values: record
            .iter()
            .map(|(field, value)| (field.to_string(), value.to_string()))
            .collect(),
        status,
        errors,
    }
}
