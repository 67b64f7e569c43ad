// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row validation and batch preparation.
//!
//! Every sheet is checked in full; no error stops the pass. Errors come out
//! in (sheet, row) order and several errors on one row are all kept.

use std::collections::BTreeMap;

use seido_import_domain::{
    BuildingRecord, CompanyRecord, ContactRecord, ContractRecord, DomainError, Email,
    ImportRecord, LotRecord, NaturalKey, ParseResult, RawRecord, SheetKind, ValidationError,
    fields,
};
use tracing::{debug, info};

use crate::batch::{ImportBatch, StagedRecord};
use crate::resolve::{LotLookupError, ReferenceIndex};

/// The outcome of one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preparation {
    /// Valid rows, typed and keyed, grouped by phase.
    pub batch: ImportBatch,
    /// Every problem found, in (sheet, row) order.
    pub errors: Vec<ValidationError>,
}

/// Validates a parsed file.
///
/// Pure: calling it twice on the same input yields the same errors.
#[must_use]
pub fn validate(parsed: &ParseResult) -> Vec<ValidationError> {
    prepare(parsed).errors
}

/// Validates a parsed file and stages its valid rows for import.
#[must_use]
pub fn prepare(parsed: &ParseResult) -> Preparation {
    let index: ReferenceIndex = ReferenceIndex::build(parsed);
    let mut pass: Pass = Pass::default();

    pass.buildings(parsed);
    pass.lots(parsed, &index);
    pass.contacts(parsed);
    pass.contracts(parsed, &index);

    info!(
        staged = pass.preparation.batch.len(),
        errors = pass.preparation.errors.len(),
        "Validation pass complete"
    );
    pass.preparation
}

/// Tracks the first line each natural key was seen on.
#[derive(Default)]
struct FirstSeen(BTreeMap<NaturalKey, usize>);

impl FirstSeen {
    /// Records the key, returning the earlier line if it was already seen.
    fn previous(&mut self, key: &NaturalKey, line: usize) -> Option<usize> {
        match self.0.get(key) {
            Some(first) => Some(*first),
            None => {
                self.0.insert(key.clone(), line);
                None
            }
        }
    }
}

#[derive(Default)]
struct Pass {
    preparation: Preparation,
}

impl Pass {
    fn error(&mut self, sheet: SheetKind, line: usize, message: String) {
        debug!(sheet = %sheet, row = line, %message, "Validation error");
        self.preparation
            .errors
            .push(ValidationError::new(sheet, line, message));
    }

    fn typed<T>(
        &mut self,
        sheet: SheetKind,
        raw: &RawRecord,
        read: fn(&RawRecord) -> Result<T, Vec<DomainError>>,
    ) -> Option<T> {
        match read(raw) {
            Ok(record) => Some(record),
            Err(errors) => {
                for error in &errors {
                    self.error(sheet, raw.line, error.to_string());
                }
                None
            }
        }
    }

    /// Flags a repeated natural key; returns `true` when the key is new.
    fn unique(
        &mut self,
        seen: &mut FirstSeen,
        sheet: SheetKind,
        key: &NaturalKey,
        line: usize,
        field: &str,
    ) -> bool {
        match seen.previous(key, line) {
            Some(first) => {
                self.error(sheet, line, format!("{field}: duplicate of row {first}"));
                false
            }
            None => true,
        }
    }

    fn stage(&mut self, record: ImportRecord, key: NaturalKey) {
        self.preparation.batch.push(StagedRecord::new(record, key));
    }

    fn buildings(&mut self, parsed: &ParseResult) {
        let sheet: SheetKind = SheetKind::Buildings;
        let mut seen: FirstSeen = FirstSeen::default();
        for raw in &parsed.buildings.rows {
            let Some(building) = self.typed(sheet, raw, BuildingRecord::from_raw) else {
                continue;
            };
            let key: NaturalKey = building.natural_key();
            if self.unique(&mut seen, sheet, &key, raw.line, fields::NAME) {
                self.stage(ImportRecord::Building(building), key);
            }
        }
    }

    fn lots(&mut self, parsed: &ParseResult, index: &ReferenceIndex) {
        let sheet: SheetKind = SheetKind::Lots;
        let mut seen: FirstSeen = FirstSeen::default();
        for raw in &parsed.lots.rows {
            let lot: Option<LotRecord> = self.typed(sheet, raw, LotRecord::from_raw);

            let mut resolved: bool = true;
            if let Some(name) = raw.get(fields::BUILDING_NAME)
                && index.building_line(name).is_none()
            {
                resolved = false;
                self.error(
                    sheet,
                    raw.line,
                    format!(
                        "{}: building '{name}' not found in the Buildings sheet",
                        fields::BUILDING_NAME
                    ),
                );
            }

            let Some(lot) = lot else {
                continue;
            };
            let key: NaturalKey = lot.natural_key();
            if self.unique(&mut seen, sheet, &key, raw.line, fields::REFERENCE) && resolved {
                self.stage(ImportRecord::Lot(lot), key);
            }
        }
    }

    fn contacts(&mut self, parsed: &ParseResult) {
        let sheet: SheetKind = SheetKind::Contacts;
        let mut seen: FirstSeen = FirstSeen::default();
        let mut companies: FirstSeen = FirstSeen::default();

        for raw in &parsed.contacts.rows {
            let Some(contact) = self.typed(sheet, raw, ContactRecord::from_raw) else {
                continue;
            };
            let key: NaturalKey = contact.natural_key();
            let field: &str = if contact.email.is_some() {
                fields::EMAIL
            } else {
                fields::NAME
            };
            if !self.unique(&mut seen, sheet, &key, raw.line, field) {
                continue;
            }

            if let Some(company) = CompanyRecord::from_contact(&contact) {
                let company_key: NaturalKey = company.natural_key();
                if companies.previous(&company_key, company.line).is_none() {
                    self.stage(ImportRecord::Company(company), company_key);
                }
            }
            self.stage(ImportRecord::Contact(contact), key);
        }
    }

    fn contracts(&mut self, parsed: &ParseResult, index: &ReferenceIndex) {
        let sheet: SheetKind = SheetKind::Contracts;
        let mut seen: FirstSeen = FirstSeen::default();
        for raw in &parsed.contracts.rows {
            let contract: Option<ContractRecord> =
                self.typed(sheet, raw, ContractRecord::from_raw);

            let building_name: Option<&str> = raw.get(fields::BUILDING_NAME);
            let lot_building: Option<Option<String>> = match raw.get(fields::LOT_REFERENCE) {
                Some(reference) => match index.resolve_lot(reference, building_name) {
                    Ok(entry) => Some(entry.building_name.clone()),
                    Err(LotLookupError::NotFound) => {
                        let scope: String = building_name.map_or_else(
                            || String::from("the Lots sheet"),
                            |name| format!("building '{name}'"),
                        );
                        self.error(
                            sheet,
                            raw.line,
                            format!(
                                "{}: lot '{reference}' not found in {scope}",
                                fields::LOT_REFERENCE
                            ),
                        );
                        None
                    }
                    Err(LotLookupError::Ambiguous { candidates }) => {
                        self.error(
                            sheet,
                            raw.line,
                            format!(
                                "{}: lot '{reference}' exists in {candidates} buildings, \
                                 fill {} to choose one",
                                fields::LOT_REFERENCE,
                                fields::BUILDING_NAME
                            ),
                        );
                        None
                    }
                },
                None => None,
            };

            let Some(mut contract) = contract else {
                continue;
            };

            let mut linked: bool = true;
            for (field, emails) in [
                (fields::TENANT_EMAILS, &contract.tenant_emails),
                (fields::GUARANTOR_EMAILS, &contract.guarantor_emails),
            ] {
                let unknown: Vec<&Email> = emails
                    .iter()
                    .filter(|email| !index.has_contact_email(email))
                    .collect();
                for email in unknown {
                    linked = false;
                    self.error(
                        sheet,
                        raw.line,
                        format!("{field}: contact '{email}' not found in the Contacts sheet"),
                    );
                }
            }

            let Some(lot_building) = lot_building else {
                continue;
            };
            contract.building_name = lot_building;
            let key: NaturalKey = contract.natural_key();
            if self.unique(&mut seen, sheet, &key, raw.line, fields::START_DATE) && linked {
                self.stage(ImportRecord::Contract(contract), key);
            }
        }
    }
}
