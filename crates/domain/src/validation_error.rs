// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::sheet::SheetKind;

/// A problem attached to one spreadsheet row.
///
/// Produced by validation and, with the same shape, by failed upserts during
/// execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub sheet: SheetKind,
    /// The 1-based spreadsheet line.
    pub row: usize,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(sheet: SheetKind, row: usize, message: impl Into<String>) -> Self {
        Self {
            sheet,
            row,
            message: message.into(),
        }
    }

    /// Wraps a field-level error raised while reading a row.
    #[must_use]
    pub fn from_domain(sheet: SheetKind, row: usize, error: &DomainError) -> Self {
        Self::new(sheet, row, error.to_string())
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} row {}: {}", self.sheet, self.row, self.message)
    }
}
