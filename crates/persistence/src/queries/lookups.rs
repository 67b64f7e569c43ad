// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Natural-key lookups.
//!
//! Records carry no database identifiers; every link between stored rows is
//! resolved here from the natural key of the target.

use diesel::prelude::*;
use diesel::SqliteConnection;
use seido_import_domain::{EntityKind, NaturalKey};
use tracing::debug;

use crate::data_models::ContractPartyData;
use crate::diesel_schema::{buildings, companies, contacts, contract_contacts, contracts, lots};
use crate::error::PersistenceError;

/// Returns the row ID of the entity stored under `key`, if any.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_id(
    conn: &mut SqliteConnection,
    key: &NaturalKey,
) -> Result<Option<i64>, PersistenceError> {
    let value: &str = key.storage_key();
    let id: Option<i64> = match key.entity() {
        EntityKind::Company => companies::table
            .filter(companies::natural_key.eq(value))
            .select(companies::company_id)
            .first::<i64>(conn)
            .optional()?,
        EntityKind::Contact => contacts::table
            .filter(contacts::natural_key.eq(value))
            .select(contacts::contact_id)
            .first::<i64>(conn)
            .optional()?,
        EntityKind::Building => buildings::table
            .filter(buildings::natural_key.eq(value))
            .select(buildings::building_id)
            .first::<i64>(conn)
            .optional()?,
        EntityKind::Lot => lots::table
            .filter(lots::natural_key.eq(value))
            .select(lots::lot_id)
            .first::<i64>(conn)
            .optional()?,
        EntityKind::Contract => contracts::table
            .filter(contracts::natural_key.eq(value))
            .select(contracts::contract_id)
            .first::<i64>(conn)
            .optional()?,
    };
    debug!(key = %key, ?id, "Natural key lookup");
    Ok(id)
}

/// Like [`find_id`], but a missing entity is an error.
///
/// # Errors
///
/// Returns `PersistenceError::MissingReference` when nothing is stored under
/// `key`, or an error if the database query fails.
pub fn require_id(conn: &mut SqliteConnection, key: &NaturalKey) -> Result<i64, PersistenceError> {
    find_id(conn, key)?.ok_or_else(|| PersistenceError::MissingReference {
        entity: key.entity(),
        key: key.storage_key().to_string(),
    })
}

/// Lists the contacts linked to a contract, tenants first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn contract_parties(
    conn: &mut SqliteConnection,
    contract_id: i64,
) -> Result<Vec<ContractPartyData>, PersistenceError> {
    let rows: Vec<(i64, String)> = contract_contacts::table
        .filter(contract_contacts::contract_id.eq(contract_id))
        .select((contract_contacts::contact_id, contract_contacts::party_role))
        .order((
            contract_contacts::party_role.desc(),
            contract_contacts::contact_id.asc(),
        ))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(contact_id, party_role)| ContractPartyData {
            contact_id,
            party_role,
        })
        .collect())
}
