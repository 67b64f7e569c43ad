// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::sheet::SheetKind;
use crate::stats::ImportStats;

/// One data row of a sheet, keyed by canonical field key.
///
/// Values are trimmed; empty cells are not stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// The 1-based spreadsheet line this row was read from.
    pub line: usize,
    values: BTreeMap<String, String>,
}

impl RawRecord {
    /// Creates an empty record for the given spreadsheet line.
    #[must_use]
    pub const fn new(line: usize) -> Self {
        Self {
            line,
            values: BTreeMap::new(),
        }
    }

    /// Stores a cell value. Blank values are dropped and the first value
    /// stored for a field wins.
    pub fn insert(&mut self, field: &str, value: &str) {
        let trimmed: &str = value.trim();
        if trimmed.is_empty() {
            return;
        }
        self.values
            .entry(field.to_string())
            .or_insert_with(|| trimmed.to_string());
    }

    /// Builder-style variant of [`Self::insert`].
    #[must_use]
    pub fn with(mut self, field: &str, value: &str) -> Self {
        self.insert(field, value);
        self
    }

    /// Returns the non-empty value of a field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    /// Returns `true` when no cell of the row holds a value.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(field, value)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// One sheet as read from the file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedSheet {
    /// Header cells in file order, as written.
    pub headers: Vec<String>,
    /// Data rows in file order.
    pub rows: Vec<RawRecord>,
}

impl ParsedSheet {
    /// Creates a sheet from its headers and rows.
    #[must_use]
    pub const fn new(headers: Vec<String>, rows: Vec<RawRecord>) -> Self {
        Self { headers, rows }
    }

    /// Returns the number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` when the sheet has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The four sheets of one import file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    pub buildings: ParsedSheet,
    pub lots: ParsedSheet,
    pub contacts: ParsedSheet,
    pub contracts: ParsedSheet,
}

impl ParseResult {
    /// Returns the sheet of the given kind.
    #[must_use]
    pub const fn sheet(&self, kind: SheetKind) -> &ParsedSheet {
        match kind {
            SheetKind::Buildings => &self.buildings,
            SheetKind::Lots => &self.lots,
            SheetKind::Contacts => &self.contacts,
            SheetKind::Contracts => &self.contracts,
        }
    }

    /// Returns the sheet of the given kind for modification.
    pub const fn sheet_mut(&mut self, kind: SheetKind) -> &mut ParsedSheet {
        match kind {
            SheetKind::Buildings => &mut self.buildings,
            SheetKind::Lots => &mut self.lots,
            SheetKind::Contacts => &mut self.contacts,
            SheetKind::Contracts => &mut self.contracts,
        }
    }

    /// Row counts per sheet.
    #[must_use]
    pub fn stats(&self) -> ImportStats {
        ImportStats::new(
            self.buildings.len(),
            self.lots.len(),
            self.contacts.len(),
            self.contracts.len(),
        )
    }
}
