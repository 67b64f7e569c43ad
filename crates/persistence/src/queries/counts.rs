// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use num_traits::ToPrimitive;
use seido_import_domain::EntityKind;

use crate::diesel_schema::{buildings, companies, contacts, contracts, lots};
use crate::error::PersistenceError;

/// Counts the stored rows of one entity kind.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_entities(
    conn: &mut SqliteConnection,
    entity: EntityKind,
) -> Result<usize, PersistenceError> {
    let count: i64 = match entity {
        EntityKind::Company => companies::table.count().get_result(conn)?,
        EntityKind::Contact => contacts::table.count().get_result(conn)?,
        EntityKind::Building => buildings::table.count().get_result(conn)?,
        EntityKind::Lot => lots::table.count().get_result(conn)?,
        EntityKind::Contract => contracts::table.count().get_result(conn)?,
    };
    count
        .to_usize()
        .ok_or_else(|| PersistenceError::DatabaseError("Count conversion failed".to_string()))
}
