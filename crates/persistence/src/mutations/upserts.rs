// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Natural-key upserts.
//!
//! Each function looks the row up by its natural key, updates it in place
//! when found and inserts it otherwise. Re-importing a file therefore
//! updates rows instead of duplicating them. Stored columns are overwritten
//! with the row's values, blanks included.

use diesel::dsl::sql;
use diesel::expression::SqlLiteral;
use diesel::prelude::*;
use diesel::sql_types::{Nullable, Text};
use diesel::SqliteConnection;
use seido_import::UpsertOutcome;
use seido_import_domain::{
    BuildingRecord, CompanyRecord, ContactRecord, ContractRecord, Email, ImportRecord, LotRecord,
    Money, NaturalKey,
};
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::data_models::{GUARANTOR_ROLE, TENANT_ROLE};
use crate::diesel_schema::{buildings, companies, contacts, contract_contacts, contracts, lots};
use crate::error::PersistenceError;
use crate::queries::{find_id, require_id};

fn now() -> SqlLiteral<Nullable<Text>> {
    sql::<Nullable<Text>>("CURRENT_TIMESTAMP")
}

/// Upserts one record under `key`.
///
/// Callers wrap this in a transaction so a failing row leaves no partial
/// writes behind.
///
/// # Errors
///
/// Returns `PersistenceError::MissingReference` when a linked entity is not
/// stored, `PersistenceError::ConstraintViolation` when a constraint rejects
/// the row, or a database error.
pub fn upsert_record(
    conn: &mut SqliteConnection,
    record: &ImportRecord,
    key: &NaturalKey,
) -> Result<UpsertOutcome, PersistenceError> {
    let outcome: UpsertOutcome = match record {
        ImportRecord::Company(company) => upsert_company(conn, company, key)?,
        ImportRecord::Contact(contact) => upsert_contact(conn, contact, key)?,
        ImportRecord::Building(building) => upsert_building(conn, building, key)?,
        ImportRecord::Lot(lot) => upsert_lot(conn, lot, key)?,
        ImportRecord::Contract(contract) => upsert_contract(conn, contract, key)?,
    };
    debug!(key = %key, id = outcome.id, created = outcome.created, "Stored record");
    Ok(outcome)
}

fn upsert_company(
    conn: &mut SqliteConnection,
    company: &CompanyRecord,
    key: &NaturalKey,
) -> Result<UpsertOutcome, PersistenceError> {
    if let Some(id) = find_id(conn, key)? {
        diesel::update(companies::table.filter(companies::company_id.eq(id)))
            .set((
                companies::name.eq(&company.name),
                companies::vat_number.eq(company.vat_number.as_deref()),
                companies::updated_at.eq(now()),
            ))
            .execute(conn)?;
        return Ok(UpsertOutcome::updated(id));
    }

    diesel::insert_into(companies::table)
        .values((
            companies::natural_key.eq(key.storage_key()),
            companies::name.eq(&company.name),
            companies::vat_number.eq(company.vat_number.as_deref()),
        ))
        .execute(conn)?;
    Ok(UpsertOutcome::created(conn.get_last_insert_rowid()?))
}

fn upsert_contact(
    conn: &mut SqliteConnection,
    contact: &ContactRecord,
    key: &NaturalKey,
) -> Result<UpsertOutcome, PersistenceError> {
    let company_id: Option<i64> = match contact.company_key() {
        Some(company_key) => Some(require_id(conn, &company_key)?),
        None => None,
    };
    let email: Option<&str> = contact.email.as_ref().map(Email::as_str);

    if let Some(id) = find_id(conn, key)? {
        diesel::update(contacts::table.filter(contacts::contact_id.eq(id)))
            .set((
                contacts::name.eq(&contact.name),
                contacts::first_name.eq(contact.first_name.as_deref()),
                contacts::last_name.eq(contact.last_name.as_deref()),
                contacts::email.eq(email),
                contacts::phone.eq(contact.phone.as_deref()),
                contacts::role.eq(contact.role.as_str()),
                contacts::company_id.eq(company_id),
                contacts::vat_number.eq(contact.vat_number.as_deref()),
                contacts::speciality.eq(contact.speciality.as_deref()),
                contacts::notes.eq(contact.notes.as_deref()),
                contacts::updated_at.eq(now()),
            ))
            .execute(conn)?;
        return Ok(UpsertOutcome::updated(id));
    }

    diesel::insert_into(contacts::table)
        .values((
            contacts::natural_key.eq(key.storage_key()),
            contacts::name.eq(&contact.name),
            contacts::first_name.eq(contact.first_name.as_deref()),
            contacts::last_name.eq(contact.last_name.as_deref()),
            contacts::email.eq(email),
            contacts::phone.eq(contact.phone.as_deref()),
            contacts::role.eq(contact.role.as_str()),
            contacts::company_id.eq(company_id),
            contacts::vat_number.eq(contact.vat_number.as_deref()),
            contacts::speciality.eq(contact.speciality.as_deref()),
            contacts::notes.eq(contact.notes.as_deref()),
        ))
        .execute(conn)?;
    Ok(UpsertOutcome::created(conn.get_last_insert_rowid()?))
}

fn upsert_building(
    conn: &mut SqliteConnection,
    building: &BuildingRecord,
    key: &NaturalKey,
) -> Result<UpsertOutcome, PersistenceError> {
    if let Some(id) = find_id(conn, key)? {
        diesel::update(buildings::table.filter(buildings::building_id.eq(id)))
            .set((
                buildings::name.eq(&building.name),
                buildings::address.eq(&building.address),
                buildings::postal_code.eq(building.postal_code.as_deref()),
                buildings::city.eq(building.city.as_deref()),
                buildings::country.eq(building.country.as_deref()),
                buildings::description.eq(building.description.as_deref()),
                buildings::updated_at.eq(now()),
            ))
            .execute(conn)?;
        return Ok(UpsertOutcome::updated(id));
    }

    diesel::insert_into(buildings::table)
        .values((
            buildings::natural_key.eq(key.storage_key()),
            buildings::name.eq(&building.name),
            buildings::address.eq(&building.address),
            buildings::postal_code.eq(building.postal_code.as_deref()),
            buildings::city.eq(building.city.as_deref()),
            buildings::country.eq(building.country.as_deref()),
            buildings::description.eq(building.description.as_deref()),
        ))
        .execute(conn)?;
    Ok(UpsertOutcome::created(conn.get_last_insert_rowid()?))
}

fn upsert_lot(
    conn: &mut SqliteConnection,
    lot: &LotRecord,
    key: &NaturalKey,
) -> Result<UpsertOutcome, PersistenceError> {
    let building_id: Option<i64> = match lot.building_key() {
        Some(building_key) => Some(require_id(conn, &building_key)?),
        None => None,
    };

    if let Some(id) = find_id(conn, key)? {
        diesel::update(lots::table.filter(lots::lot_id.eq(id)))
            .set((
                lots::building_id.eq(building_id),
                lots::reference.eq(&lot.reference),
                lots::category.eq(lot.category.as_str()),
                lots::floor.eq(lot.floor),
                lots::door_number.eq(lot.door_number.as_deref()),
                lots::description.eq(lot.description.as_deref()),
                lots::updated_at.eq(now()),
            ))
            .execute(conn)?;
        return Ok(UpsertOutcome::updated(id));
    }

    diesel::insert_into(lots::table)
        .values((
            lots::natural_key.eq(key.storage_key()),
            lots::building_id.eq(building_id),
            lots::reference.eq(&lot.reference),
            lots::category.eq(lot.category.as_str()),
            lots::floor.eq(lot.floor),
            lots::door_number.eq(lot.door_number.as_deref()),
            lots::description.eq(lot.description.as_deref()),
        ))
        .execute(conn)?;
    Ok(UpsertOutcome::created(conn.get_last_insert_rowid()?))
}

fn upsert_contract(
    conn: &mut SqliteConnection,
    contract: &ContractRecord,
    key: &NaturalKey,
) -> Result<UpsertOutcome, PersistenceError> {
    let lot_id: i64 = require_id(conn, &contract.lot_key())?;
    let start_date: String = contract.start_date.to_string();
    let end_date: String = contract.end_date().to_string();
    let duration_months: i32 = i32::from(contract.duration_months);
    let deposit_cents: Option<i64> = contract.deposit.as_ref().map(Money::cents);

    let outcome: UpsertOutcome = if let Some(id) = find_id(conn, key)? {
        diesel::update(contracts::table.filter(contracts::contract_id.eq(id)))
            .set((
                contracts::lot_id.eq(lot_id),
                contracts::title.eq(&contract.title),
                contracts::start_date.eq(&start_date),
                contracts::end_date.eq(&end_date),
                contracts::duration_months.eq(duration_months),
                contracts::rent_cents.eq(contract.rent.cents()),
                contracts::charges_cents.eq(contract.charges.cents()),
                contracts::deposit_cents.eq(deposit_cents),
                contracts::payment_frequency.eq(contract.payment_frequency.as_str()),
                contracts::updated_at.eq(now()),
            ))
            .execute(conn)?;
        UpsertOutcome::updated(id)
    } else {
        diesel::insert_into(contracts::table)
            .values((
                contracts::natural_key.eq(key.storage_key()),
                contracts::lot_id.eq(lot_id),
                contracts::title.eq(&contract.title),
                contracts::start_date.eq(&start_date),
                contracts::end_date.eq(&end_date),
                contracts::duration_months.eq(duration_months),
                contracts::rent_cents.eq(contract.rent.cents()),
                contracts::charges_cents.eq(contract.charges.cents()),
                contracts::deposit_cents.eq(deposit_cents),
                contracts::payment_frequency.eq(contract.payment_frequency.as_str()),
            ))
            .execute(conn)?;
        UpsertOutcome::created(conn.get_last_insert_rowid()?)
    };

    replace_parties(conn, outcome.id, contract)?;
    Ok(outcome)
}

/// Rewrites the tenant and guarantor links of a contract.
fn replace_parties(
    conn: &mut SqliteConnection,
    contract_id: i64,
    contract: &ContractRecord,
) -> Result<(), PersistenceError> {
    diesel::delete(contract_contacts::table.filter(contract_contacts::contract_id.eq(contract_id)))
        .execute(conn)?;

    for (role, emails) in [
        (TENANT_ROLE, &contract.tenant_emails),
        (GUARANTOR_ROLE, &contract.guarantor_emails),
    ] {
        for email in emails {
            let contact_key: NaturalKey = NaturalKey::contact(Some(email), "", None);
            let contact_id: i64 = require_id(conn, &contact_key)?;
            diesel::insert_or_ignore_into(contract_contacts::table)
                .values((
                    contract_contacts::contract_id.eq(contract_id),
                    contract_contacts::contact_id.eq(contact_id),
                    contract_contacts::party_role.eq(role),
                ))
                .execute(conn)?;
        }
    }
    Ok(())
}
