// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::macros::date;

use crate::{
    BuildingRecord, CompanyRecord, ContactRecord, ContactRole, ContractRecord, DomainError,
    ImportRecord, LotCategory, LotRecord, Money, PaymentFrequency, RawRecord, SheetKind,
};

#[test]
fn test_building_requires_name_and_address() {
    let raw: RawRecord = RawRecord::new(3).with("city", "Namur");
    let errors: Vec<DomainError> = BuildingRecord::from_raw(&raw).unwrap_err();
    let fields: Vec<&str> = errors.iter().map(DomainError::field).collect();
    assert_eq!(fields, vec!["name", "address"]);
}

#[test]
fn test_building_reads_optional_fields() {
    let raw: RawRecord = RawRecord::new(2)
        .with("name", "Résidence Alpha")
        .with("address", "Rue Haute 1")
        .with("postal_code", "1000");
    let building: BuildingRecord = BuildingRecord::from_raw(&raw).unwrap();
    assert_eq!(building.line, 2);
    assert_eq!(building.postal_code.as_deref(), Some("1000"));
    assert_eq!(building.city, None);
    assert_eq!(building.natural_key().storage_key(), "residence alpha");
}

#[test]
fn test_lot_must_name_building_or_be_independent() {
    let orphan: RawRecord = RawRecord::new(2).with("reference", "A1");
    let errors: Vec<DomainError> = LotRecord::from_raw(&orphan).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field(), "building_name");

    let independent: LotRecord =
        LotRecord::from_raw(&RawRecord::new(3).with("reference", "G1").with("independent", "oui"))
            .unwrap();
    assert!(independent.independent);
    assert_eq!(independent.building_name, None);
    assert_eq!(independent.category, LotCategory::Appartement);

    let both: RawRecord = RawRecord::new(4)
        .with("reference", "A2")
        .with("building_name", "Alpha")
        .with("independent", "yes");
    let errors: Vec<DomainError> = LotRecord::from_raw(&both).unwrap_err();
    assert!(matches!(errors[0], DomainError::ConflictingFields { .. }));
}

#[test]
fn test_lot_accumulates_every_field_error() {
    let raw: RawRecord = RawRecord::new(5)
        .with("building_name", "Alpha")
        .with("category", "château")
        .with("floor", "haut");
    let errors: Vec<DomainError> = LotRecord::from_raw(&raw).unwrap_err();
    let fields: Vec<&str> = errors.iter().map(DomainError::field).collect();
    assert_eq!(fields, vec!["reference", "category", "floor"]);
}

#[test]
fn test_lot_ground_floor_spelling() {
    let raw: RawRecord = RawRecord::new(2)
        .with("reference", "A0")
        .with("building_name", "Alpha")
        .with("floor", "Rez-de-chaussée")
        .with("category", "garage");
    let lot: LotRecord = LotRecord::from_raw(&raw).unwrap();
    assert_eq!(lot.floor, Some(0));
    assert_eq!(lot.category, LotCategory::Garage);
}

#[test]
fn test_contact_name_from_first_and_last() {
    let raw: RawRecord = RawRecord::new(2)
        .with("first_name", "Jean")
        .with("last_name", "Dupont")
        .with("email", "JEAN@example.be")
        .with("role", "locataire");
    let contact: ContactRecord = ContactRecord::from_raw(&raw).unwrap();
    assert_eq!(contact.name, "Jean Dupont");
    assert_eq!(contact.role, ContactRole::Locataire);
    assert_eq!(contact.natural_key().storage_key(), "jean@example.be");
}

#[test]
fn test_contact_without_name_or_with_bad_email_fails() {
    let raw: RawRecord = RawRecord::new(7).with("email", "not-an-email");
    let errors: Vec<DomainError> = ContactRecord::from_raw(&raw).unwrap_err();
    let fields: Vec<&str> = errors.iter().map(DomainError::field).collect();
    assert_eq!(fields, vec!["name", "email"]);
}

#[test]
fn test_company_derived_from_contact() {
    let raw: RawRecord = RawRecord::new(4)
        .with("name", "Plombier Pierre")
        .with("company_name", "Plomberie SA")
        .with("vat_number", "BE0123456789")
        .with("role", "prestataire");
    let contact: ContactRecord = ContactRecord::from_raw(&raw).unwrap();
    let company: CompanyRecord = CompanyRecord::from_contact(&contact).unwrap();
    assert_eq!(company.line, 4);
    assert_eq!(company.vat_number.as_deref(), Some("BE0123456789"));
    assert_eq!(contact.company_key(), Some(company.natural_key()));
}

#[test]
fn test_contract_reads_typed_values_and_defaults() {
    let raw: RawRecord = RawRecord::new(2)
        .with("lot_reference", "A1")
        .with("start_date", "01/02/2025")
        .with("duration_months", "12")
        .with("rent", "850,00")
        .with("tenant_emails", "jean@example.be; marie@example.be");
    let contract: ContractRecord = ContractRecord::from_raw(&raw).unwrap();
    assert_eq!(contract.start_date, date!(2025 - 02 - 01));
    assert_eq!(contract.end_date(), date!(2026 - 01 - 31));
    assert_eq!(contract.rent, Money::from_cents(85_000));
    assert_eq!(contract.charges, Money::ZERO);
    assert_eq!(contract.deposit, None);
    assert_eq!(contract.payment_frequency, PaymentFrequency::Mensuel);
    assert_eq!(contract.tenant_emails.len(), 2);
    assert_eq!(contract.title, "Bail A1 (2025-02-01)");
}

#[test]
fn test_contract_rejects_out_of_range_duration_and_bad_amounts() {
    let raw: RawRecord = RawRecord::new(6)
        .with("lot_reference", "A1")
        .with("start_date", "2025-02-30")
        .with("duration_months", "240")
        .with("rent", "beaucoup")
        .with("guarantor_emails", "nope");
    let errors: Vec<DomainError> = ContractRecord::from_raw(&raw).unwrap_err();
    let fields: Vec<&str> = errors.iter().map(DomainError::field).collect();
    assert_eq!(
        fields,
        vec!["start_date", "duration_months", "rent", "guarantor_emails"]
    );
}

#[test]
fn test_import_record_reports_origin() {
    let raw: RawRecord = RawRecord::new(9).with("name", "Alpha").with("address", "Rue 1");
    let record: ImportRecord = ImportRecord::Building(BuildingRecord::from_raw(&raw).unwrap());
    assert_eq!(record.line(), 9);
    assert_eq!(record.sheet(), SheetKind::Buildings);

    let json: serde_json::Value = serde_json::to_value(&record).unwrap();
    assert_eq!(json["entity"], "building");
    assert_eq!(json["name"], "Alpha");
}
