// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod initialization_tests;

use seido_import::{ImportMode, ImportResult, NoopObserver, Preparation, execute_import, prepare};
use seido_import_domain::{ParseResult, RawRecord};

use crate::Persistence;

pub fn building(line: usize, name: &str) -> RawRecord {
    RawRecord::new(line)
        .with("name", name)
        .with("address", "Rue de la Loi 16")
        .with("city", "Bruxelles")
}

pub fn lot(line: usize, reference: &str, building_name: &str) -> RawRecord {
    RawRecord::new(line)
        .with("reference", reference)
        .with("building_name", building_name)
}

pub fn contact(line: usize, name: &str, email: &str) -> RawRecord {
    RawRecord::new(line).with("name", name).with("email", email)
}

pub fn contract(line: usize, lot_reference: &str, tenant: &str) -> RawRecord {
    RawRecord::new(line)
        .with("lot_reference", lot_reference)
        .with("start_date", "01/01/2025")
        .with("duration_months", "12")
        .with("rent", "850,00")
        .with("deposit", "1700")
        .with("tenant_emails", tenant)
}

/// One building with two lots, two contacts (one with a company) and a lease.
pub fn sample_parse_result() -> ParseResult {
    let mut parsed: ParseResult = ParseResult::default();
    parsed.buildings.rows = vec![building(2, "Résidence Les Lilas")];
    parsed.lots.rows = vec![
        lot(2, "A1", "Résidence Les Lilas").with("floor", "1"),
        lot(3, "B2", "Résidence Les Lilas"),
    ];
    parsed.contacts.rows = vec![
        contact(2, "Jean Dupont", "jean.dupont@example.be").with("company_name", "Immo Lilas SPRL"),
        contact(3, "Marie Martin", "marie.martin@example.be"),
    ];
    parsed.contracts.rows = vec![
        contract(2, "A1", "jean.dupont@example.be")
            .with("guarantor_emails", "marie.martin@example.be"),
    ];
    parsed
}

/// Validates and imports `parsed`, asserting validation found nothing.
pub fn run_import(
    persistence: &mut Persistence,
    parsed: &ParseResult,
    mode: ImportMode,
) -> ImportResult {
    let preparation: Preparation = prepare(parsed);
    assert!(preparation.errors.is_empty(), "{:?}", preparation.errors);
    execute_import(&preparation.batch, persistence, mode, &mut NoopObserver)
}
