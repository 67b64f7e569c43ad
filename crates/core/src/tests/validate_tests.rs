// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use seido_import_domain::{
    EntityKind, ImportRecord, ParseResult, RawRecord, SheetKind, ValidationError,
};

use crate::{Preparation, prepare, validate};

use super::helpers::{building, contact, contract, lot, sample_parse_result};

#[test]
fn test_valid_file_has_no_errors() {
    let parsed: ParseResult = sample_parse_result();
    assert!(validate(&parsed).is_empty());
}

#[test]
fn test_prepare_stages_rows_by_phase() {
    let preparation: Preparation = prepare(&sample_parse_result());

    assert!(preparation.errors.is_empty());
    assert_eq!(preparation.batch.phase(EntityKind::Company).len(), 1);
    assert_eq!(preparation.batch.phase(EntityKind::Contact).len(), 2);
    assert_eq!(preparation.batch.phase(EntityKind::Building).len(), 1);
    assert_eq!(preparation.batch.phase(EntityKind::Lot).len(), 2);
    assert_eq!(preparation.batch.phase(EntityKind::Contract).len(), 1);
    assert_eq!(preparation.batch.len(), 7);
}

#[test]
fn test_decomposed_building_name_resolves() {
    let mut parsed: ParseResult = ParseResult::default();
    parsed.buildings.rows = vec![building(2, "R\u{e9}sidence Lilas")];
    parsed.lots.rows = vec![lot(2, "A1", "Re\u{301}sidence Lilas")];

    assert!(validate(&parsed).is_empty());
}

#[test]
fn test_separator_in_lot_reference_is_not_a_duplicate() {
    let mut parsed: ParseResult = ParseResult::default();
    parsed.buildings.rows = vec![building(2, "Residence 12"), building(3, "Residence 12/14")];
    parsed.lots.rows = vec![
        lot(2, "14/A1", "Residence 12"),
        lot(3, "A1", "Residence 12/14"),
    ];

    assert!(validate(&parsed).is_empty());
}

#[test]
fn test_validation_is_repeatable() {
    let mut parsed: ParseResult = sample_parse_result();
    parsed.lots.rows.push(lot(4, "C3", "Unknown Tower"));

    let first: Vec<ValidationError> = validate(&parsed);
    let second: Vec<ValidationError> = validate(&parsed);
    assert_eq!(first, second);
    assert_eq!(first.len(), 1);
}

#[test]
fn test_every_error_of_a_row_is_reported() {
    let mut parsed: ParseResult = sample_parse_result();
    parsed.buildings.rows.push(RawRecord::new(3).with("city", "Liège"));

    let errors: Vec<ValidationError> = validate(&parsed);
    assert_eq!(errors.len(), 2);
    assert!(errors.iter().all(|e| e.sheet == SheetKind::Buildings && e.row == 3));
    assert_eq!(errors[0].message, "name: required field is missing or empty");
    assert_eq!(errors[1].message, "address: required field is missing or empty");
}

#[test]
fn test_errors_are_ordered_by_sheet_then_row() {
    let mut parsed: ParseResult = sample_parse_result();
    parsed.contracts.rows.push(RawRecord::new(3).with("lot_reference", "A1"));
    parsed.contacts.rows.push(contact(5, "Bad Mail", "not-an-email"));
    parsed.lots.rows.push(lot(7, "Z9", "Nowhere"));
    parsed.buildings.rows.push(RawRecord::new(4).with("name", "No Address"));

    let errors: Vec<ValidationError> = validate(&parsed);
    let order: Vec<(SheetKind, usize)> = errors.iter().map(|e| (e.sheet, e.row)).collect();
    let mut sorted: Vec<(SheetKind, usize)> = order.clone();
    sorted.sort();
    assert_eq!(order, sorted);
    assert_eq!(order.first(), Some(&(SheetKind::Buildings, 4)));
    assert_eq!(order.last().map(|(sheet, _)| *sheet), Some(SheetKind::Contracts));
}

#[test]
fn test_lot_with_unknown_building_is_rejected() {
    let mut parsed: ParseResult = sample_parse_result();
    parsed.lots.rows.push(lot(4, "C3", "Unknown Tower"));

    let preparation: Preparation = prepare(&parsed);
    assert_eq!(
        preparation.errors,
        vec![ValidationError::new(
            SheetKind::Lots,
            4,
            "building_name: building 'Unknown Tower' not found in the Buildings sheet"
        )]
    );
    assert_eq!(preparation.batch.phase(EntityKind::Lot).len(), 2);
}

#[test]
fn test_independent_lot_needs_no_building() {
    let mut parsed: ParseResult = sample_parse_result();
    parsed
        .lots
        .rows
        .push(RawRecord::new(4).with("reference", "GARAGE-1").with("independent", "oui"));

    let preparation: Preparation = prepare(&parsed);
    assert!(preparation.errors.is_empty());
    assert_eq!(preparation.batch.phase(EntityKind::Lot).len(), 3);
}

#[test]
fn test_lot_without_building_or_flag_is_rejected() {
    let mut parsed: ParseResult = sample_parse_result();
    parsed.lots.rows.push(RawRecord::new(4).with("reference", "C3"));

    let errors: Vec<ValidationError> = validate(&parsed);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.starts_with("building_name: required field is missing"));
}

#[test]
fn test_duplicate_building_points_at_first_row() {
    let mut parsed: ParseResult = sample_parse_result();
    parsed.buildings.rows.push(building(3, "  résidence les lilas "));

    let errors: Vec<ValidationError> = validate(&parsed);
    assert_eq!(
        errors,
        vec![ValidationError::new(
            SheetKind::Buildings,
            3,
            "name: duplicate of row 2"
        )]
    );
}

#[test]
fn test_duplicate_contact_email_is_rejected() {
    let mut parsed: ParseResult = sample_parse_result();
    parsed
        .contacts
        .rows
        .push(contact(4, "J. Dupont", "Jean.Dupont@example.be"));

    let errors: Vec<ValidationError> = validate(&parsed);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].sheet, SheetKind::Contacts);
    assert_eq!(errors[0].message, "email: duplicate of row 2");
}

#[test]
fn test_companies_are_derived_once_from_contacts() {
    let mut parsed: ParseResult = sample_parse_result();
    parsed.contacts.rows.push(
        contact(4, "Paul Leroy", "paul.leroy@example.be").with("company_name", "IMMO LILAS SPRL"),
    );

    let preparation: Preparation = prepare(&parsed);
    let companies: Vec<&ImportRecord> = preparation
        .batch
        .phase(EntityKind::Company)
        .iter()
        .map(|staged| &staged.record)
        .collect();
    assert_eq!(companies.len(), 1);
    assert_eq!(companies[0].line(), 2);
}

#[test]
fn test_contract_with_unknown_lot_is_rejected() {
    let mut parsed: ParseResult = sample_parse_result();
    parsed
        .contracts
        .rows
        .push(contract(3, "Z9", "marie.martin@example.be"));

    let errors: Vec<ValidationError> = validate(&parsed);
    assert_eq!(
        errors,
        vec![ValidationError::new(
            SheetKind::Contracts,
            3,
            "lot_reference: lot 'Z9' not found in the Lots sheet"
        )]
    );
}

#[test]
fn test_contract_referencing_invalid_lot_reports_only_the_lot() {
    let mut parsed: ParseResult = sample_parse_result();
    parsed
        .lots
        .rows
        .push(lot(4, "C3", "Résidence Les Lilas").with("floor", "troisième"));
    parsed
        .contracts
        .rows
        .push(contract(3, "C3", "marie.martin@example.be"));

    let errors: Vec<ValidationError> = validate(&parsed);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].sheet, SheetKind::Lots);
    assert_eq!(errors[0].row, 4);
    assert!(errors[0].message.starts_with("floor:"));
}

#[test]
fn test_ambiguous_lot_reference_needs_building_name() {
    let mut parsed: ParseResult = sample_parse_result();
    parsed.buildings.rows.push(building(3, "Tour Horizon"));
    parsed.lots.rows.push(lot(4, "A1", "Tour Horizon"));

    let errors: Vec<ValidationError> = validate(&parsed);
    assert_eq!(
        errors,
        vec![ValidationError::new(
            SheetKind::Contracts,
            2,
            "lot_reference: lot 'A1' exists in 2 buildings, fill building_name to choose one"
        )]
    );

    parsed.contracts.rows[0].insert("building_name", "Tour Horizon");
    let preparation: Preparation = prepare(&parsed);
    assert!(preparation.errors.is_empty());
    let staged: &ImportRecord = &preparation.batch.phase(EntityKind::Contract)[0].record;
    let ImportRecord::Contract(record) = staged else {
        panic!("expected a contract, got {staged:?}");
    };
    assert_eq!(record.building_name.as_deref(), Some("Tour Horizon"));
}

#[test]
fn test_contract_building_is_filled_from_its_lot() {
    let preparation: Preparation = prepare(&sample_parse_result());
    let staged: &ImportRecord = &preparation.batch.phase(EntityKind::Contract)[0].record;
    let ImportRecord::Contract(record) = staged else {
        panic!("expected a contract, got {staged:?}");
    };
    assert_eq!(record.building_name.as_deref(), Some("Résidence Les Lilas"));
}

#[test]
fn test_contract_with_unknown_tenant_is_rejected() {
    let mut parsed: ParseResult = sample_parse_result();
    parsed
        .contracts
        .rows
        .push(contract(3, "B2", "ghost@example.be"));

    let preparation: Preparation = prepare(&parsed);
    assert_eq!(
        preparation.errors,
        vec![ValidationError::new(
            SheetKind::Contracts,
            3,
            "tenant_emails: contact 'ghost@example.be' not found in the Contacts sheet"
        )]
    );
    assert_eq!(preparation.batch.phase(EntityKind::Contract).len(), 1);
}

#[test]
fn test_duplicate_contract_on_same_lot_and_date() {
    let mut parsed: ParseResult = sample_parse_result();
    parsed
        .contracts
        .rows
        .push(contract(3, "A1", "marie.martin@example.be"));

    let errors: Vec<ValidationError> = validate(&parsed);
    assert_eq!(
        errors,
        vec![ValidationError::new(
            SheetKind::Contracts,
            3,
            "start_date: duplicate of row 2"
        )]
    );
}
