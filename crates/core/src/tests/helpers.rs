// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::BTreeMap;

use rust_xlsxwriter::{Workbook, Worksheet};
use seido_import_domain::{EntityKind, ImportRecord, NaturalKey, ParseResult, RawRecord};

use crate::{ImportAdapter, ImportObserver, ImportProgress, PersistError, RowOutcome, UpsertOutcome};

pub fn building(line: usize, name: &str) -> RawRecord {
    RawRecord::new(line)
        .with("name", name)
        .with("address", "Rue de la Loi 16")
        .with("postal_code", "1000")
        .with("city", "Bruxelles")
}

pub fn lot(line: usize, reference: &str, building_name: &str) -> RawRecord {
    RawRecord::new(line)
        .with("reference", reference)
        .with("building_name", building_name)
        .with("category", "appartement")
}

pub fn contact(line: usize, name: &str, email: &str) -> RawRecord {
    RawRecord::new(line)
        .with("name", name)
        .with("email", email)
        .with("role", "locataire")
}

pub fn contract(line: usize, lot_reference: &str, tenant: &str) -> RawRecord {
    RawRecord::new(line)
        .with("lot_reference", lot_reference)
        .with("start_date", "2025-01-01")
        .with("duration_months", "12")
        .with("rent", "850")
        .with("tenant_emails", tenant)
}

/// One building with two lots, two contacts (one with a company) and a lease.
pub fn sample_parse_result() -> ParseResult {
    let mut parsed: ParseResult = ParseResult::default();
    parsed.buildings.rows = vec![building(2, "Résidence Les Lilas")];
    parsed.lots.rows = vec![
        lot(2, "A1", "Résidence Les Lilas"),
        lot(3, "B2", "Résidence Les Lilas"),
    ];
    parsed.contacts.rows = vec![
        contact(2, "Jean Dupont", "jean.dupont@example.be").with("company_name", "Immo Lilas SPRL"),
        contact(3, "Marie Martin", "marie.martin@example.be"),
    ];
    parsed.contracts.rows = vec![contract(2, "A1", "jean.dupont@example.be")];
    parsed
}

/// An in-memory datastore keyed by natural key, with failure injection.
#[derive(Debug, Default)]
pub struct InMemoryAdapter {
    pub entities: BTreeMap<String, i64>,
    pub next_id: i64,
    /// Entities as they were when the open batch began.
    pub snapshot: Option<BTreeMap<String, i64>>,
    /// Every upsert call, in order.
    pub calls: Vec<(EntityKind, usize)>,
    /// Rows rejected with a non-fatal error.
    pub reject: Vec<(EntityKind, usize)>,
    /// The row at which the datastore becomes unavailable.
    pub unavailable_at: Option<(EntityKind, usize)>,
    pub fail_begin: bool,
    pub fail_commit: bool,
    pub commits: usize,
    pub rollbacks: usize,
}

impl InMemoryAdapter {
    pub fn count(&self, entity: EntityKind) -> usize {
        let prefix: String = format!("{}:", entity.as_str());
        self.entities.keys().filter(|key| key.starts_with(&prefix)).count()
    }

    fn require(&self, key: Option<NaturalKey>) -> Result<(), PersistError> {
        match key {
            Some(key) if !self.entities.contains_key(&key.to_string()) => {
                Err(PersistError::MissingReference {
                    entity: key.entity(),
                    key: key.storage_key().to_string(),
                })
            }
            _ => Ok(()),
        }
    }
}

impl ImportAdapter for InMemoryAdapter {
    fn upsert(
        &mut self,
        record: &ImportRecord,
        key: &NaturalKey,
    ) -> Result<UpsertOutcome, PersistError> {
        let row: (EntityKind, usize) = (record.entity(), record.line());
        self.calls.push(row);
        if self.unavailable_at == Some(row) {
            return Err(PersistError::Unavailable(String::from("disk I/O error")));
        }
        if self.reject.contains(&row) {
            return Err(PersistError::Rejected(String::from("refused by test")));
        }
        match record {
            ImportRecord::Lot(lot) => self.require(lot.building_key())?,
            ImportRecord::Contact(contact) => self.require(contact.company_key())?,
            ImportRecord::Contract(contract) => self.require(Some(contract.lot_key()))?,
            ImportRecord::Company(_) | ImportRecord::Building(_) => {}
        }

        if let Some(id) = self.entities.get(&key.to_string()) {
            return Ok(UpsertOutcome::updated(*id));
        }
        self.next_id += 1;
        self.entities.insert(key.to_string(), self.next_id);
        Ok(UpsertOutcome::created(self.next_id))
    }

    fn begin_batch(&mut self) -> Result<(), PersistError> {
        if self.fail_begin {
            return Err(PersistError::Unavailable(String::from("database is locked")));
        }
        self.snapshot = Some(self.entities.clone());
        Ok(())
    }

    fn commit_batch(&mut self) -> Result<(), PersistError> {
        if self.fail_commit {
            return Err(PersistError::Unavailable(String::from("disk full")));
        }
        self.snapshot = None;
        self.commits += 1;
        Ok(())
    }

    fn rollback_batch(&mut self) -> Result<(), PersistError> {
        if let Some(snapshot) = self.snapshot.take() {
            self.entities = snapshot;
        }
        self.rollbacks += 1;
        Ok(())
    }
}

/// Collects every event it receives.
#[derive(Debug, Default)]
pub struct Recorder {
    pub phases: Vec<ImportProgress>,
    pub rows: Vec<RowOutcome>,
}

impl ImportObserver for Recorder {
    fn on_phase(&mut self, progress: &ImportProgress) {
        self.phases.push(progress.clone());
    }

    fn on_row(&mut self, outcome: &RowOutcome) {
        self.rows.push(outcome.clone());
    }
}

/// Writes a workbook whose sheets hold the given rows of text cells.
pub fn workbook_bytes(sheets: &[(&str, &[&[&str]])]) -> Vec<u8> {
    let mut workbook: Workbook = Workbook::new();
    for (name, rows) in sheets {
        let worksheet: &mut Worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).unwrap();
        for (row, cells) in (0u32..).zip(rows.iter()) {
            for (col, cell) in (0u16..).zip(cells.iter()) {
                if !cell.is_empty() {
                    worksheet.write_string(row, col, *cell).unwrap();
                }
            }
        }
    }
    workbook.save_to_buffer().unwrap()
}

/// A complete, valid four-sheet workbook.
pub fn valid_workbook() -> Vec<u8> {
    workbook_bytes(&[
        (
            "Immeubles",
            &[
                &["Nom *", "Adresse *", "Code postal", "Ville"],
                &["Résidence Les Lilas", "Rue de la Loi 16", "1000", "Bruxelles"],
            ],
        ),
        (
            "Lots",
            &[
                &["Référence *", "Immeuble"],
                &["A1", "Résidence Les Lilas"],
            ],
        ),
        (
            "Contacts",
            &[
                &["Nom complet", "Email"],
                &["Jean Dupont", "jean.dupont@example.be"],
            ],
        ),
        (
            "Contrats",
            &[
                &["Référence lot", "Date de début", "Durée (mois)", "Loyer", "Locataires"],
                &["A1", "2025-01-01", "12", "850", "jean.dupont@example.be"],
            ],
        ),
    ])
}
