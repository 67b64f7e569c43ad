// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Name-based resolution of cross-sheet references.
//!
//! The source file carries no database identifiers, so Lots point at
//! Buildings by name and Contracts point at Lots by reference. This module
//! indexes the sheets' own rows by those human-readable references; nothing
//! else in the pipeline performs joins.

use std::collections::BTreeMap;

use seido_import_domain::{Email, NaturalKey, ParseResult, fields, normalize_key};

/// A lot row as seen from the Contracts sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LotEntry {
    /// Spreadsheet line of the lot row.
    pub line: usize,
    /// The building name as written in the Lots sheet, `None` for independent lots.
    pub building_name: Option<String>,
    /// The lot's natural key.
    pub key: NaturalKey,
}

/// Why a lot reference could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LotLookupError {
    /// No lot row carries the reference (within the given building, if any).
    NotFound,
    /// Several buildings hold a lot with this reference and no building was given.
    Ambiguous {
        /// How many candidates matched.
        candidates: usize,
    },
}

/// Index from human-readable references to the rows that define them.
///
/// Built from raw rows so that a reference to a row with its own field
/// errors is still considered resolvable; that row reports its own problems.
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    buildings: BTreeMap<String, usize>,
    lots: BTreeMap<String, Vec<LotEntry>>,
    contact_emails: BTreeMap<String, usize>,
}

impl ReferenceIndex {
    /// Indexes the Buildings, Lots and Contacts sheets.
    #[must_use]
    pub fn build(parsed: &ParseResult) -> Self {
        let mut index: Self = Self::default();

        for row in &parsed.buildings.rows {
            if let Some(name) = row.get(fields::NAME) {
                index.buildings.entry(normalize_key(name)).or_insert(row.line);
            }
        }

        for row in &parsed.lots.rows {
            if let Some(reference) = row.get(fields::REFERENCE) {
                let building_name: Option<&str> = row.get(fields::BUILDING_NAME);
                let entries: &mut Vec<LotEntry> =
                    index.lots.entry(normalize_key(reference)).or_default();
                let key: NaturalKey = NaturalKey::lot(reference, building_name);
                if !entries.iter().any(|entry| entry.key == key) {
                    entries.push(LotEntry {
                        line: row.line,
                        building_name: building_name.map(str::to_string),
                        key,
                    });
                }
            }
        }

        for row in &parsed.contacts.rows {
            if let Some(email) = row.get(fields::EMAIL) {
                index
                    .contact_emails
                    .entry(email.trim().to_lowercase())
                    .or_insert(row.line);
            }
        }

        index
    }

    /// Returns the line of the Buildings row with this name.
    #[must_use]
    pub fn building_line(&self, name: &str) -> Option<usize> {
        self.buildings.get(&normalize_key(name)).copied()
    }

    /// Resolves a lot reference, optionally narrowed to one building.
    ///
    /// # Errors
    ///
    /// Returns `LotLookupError::NotFound` or `LotLookupError::Ambiguous`.
    pub fn resolve_lot(
        &self,
        reference: &str,
        building_name: Option<&str>,
    ) -> Result<&LotEntry, LotLookupError> {
        let candidates: &[LotEntry] = self
            .lots
            .get(&normalize_key(reference))
            .map_or(&[], Vec::as_slice);

        if let Some(building_name) = building_name {
            let wanted: String = normalize_key(building_name);
            return candidates
                .iter()
                .find(|entry| {
                    entry
                        .building_name
                        .as_deref()
                        .is_some_and(|name| normalize_key(name) == wanted)
                })
                .ok_or(LotLookupError::NotFound);
        }

        match candidates {
            [] => Err(LotLookupError::NotFound),
            [only] => Ok(only),
            _ => Err(LotLookupError::Ambiguous {
                candidates: candidates.len(),
            }),
        }
    }

    /// Returns `true` when a Contacts row uses this email.
    #[must_use]
    pub fn has_contact_email(&self, email: &Email) -> bool {
        self.contact_emails.contains_key(email.as_str())
    }
}
