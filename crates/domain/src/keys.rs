// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::sheet::EntityKind;
use crate::values::{Email, normalize_key};

/// The business identifier used to match a row against stored entities.
///
/// Two rows with equal natural keys denote the same entity; importing either
/// updates it rather than creating a duplicate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NaturalKey {
    entity: EntityKind,
    value: String,
}

impl NaturalKey {
    /// Company key: normalized name.
    #[must_use]
    pub fn company(name: &str) -> Self {
        Self {
            entity: EntityKind::Company,
            value: normalize_key(name),
        }
    }

    /// Contact key: the email when present, else normalized `name|phone`.
    #[must_use]
    pub fn contact(email: Option<&Email>, name: &str, phone: Option<&str>) -> Self {
        let value: String = email.map_or_else(
            || {
                let phone: String = phone
                    .unwrap_or_default()
                    .chars()
                    .filter(|c| c.is_ascii_digit() || *c == '+')
                    .collect();
                format!("{}|{phone}", escape_part(&normalize_key(name)))
            },
            |email| email.as_str().to_string(),
        );
        Self {
            entity: EntityKind::Contact,
            value,
        }
    }

    /// Building key: normalized name.
    #[must_use]
    pub fn building(name: &str) -> Self {
        Self {
            entity: EntityKind::Building,
            value: normalize_key(name),
        }
    }

    /// Lot key: normalized building name (empty for independent lots) and
    /// normalized reference.
    #[must_use]
    pub fn lot(reference: &str, building_name: Option<&str>) -> Self {
        Self {
            entity: EntityKind::Lot,
            value: format!(
                "{}/{}",
                escape_part(&building_name.map(normalize_key).unwrap_or_default()),
                escape_part(&normalize_key(reference))
            ),
        }
    }

    /// Contract key: the lot key and the start date.
    #[must_use]
    pub fn contract(lot: &Self, start_date: Date) -> Self {
        Self {
            entity: EntityKind::Contract,
            value: format!("{}@{start_date}", lot.value),
        }
    }

    /// Returns the entity kind this key identifies.
    #[must_use]
    pub const fn entity(&self) -> EntityKind {
        self.entity
    }

    /// Returns the string stored in the datastore's natural-key column.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.value
    }
}

/// Backslash-escapes the separators composite keys use, so distinct parts
/// never join into the same key.
fn escape_part(part: &str) -> String {
    let mut escaped: String = String::with_capacity(part.len());
    for c in part.chars() {
        if matches!(c, '\\' | '/' | '@' | '|') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl std::fmt::Display for NaturalKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.entity, self.value)
    }
}
