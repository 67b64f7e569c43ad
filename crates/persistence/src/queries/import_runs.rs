// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use num_traits::ToPrimitive;
use seido_import::ImportSummary;

use crate::data_models::ImportRunData;
use crate::diesel_schema::import_runs;
use crate::error::PersistenceError;

/// Diesel Queryable struct for import run rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = import_runs)]
struct ImportRunRow {
    run_id: i64,
    file_name: String,
    mode: String,
    success: i32,
    rolled_back: i32,
    duration_ms: i64,
    summary_json: String,
    error_count: i32,
    fatal_error: Option<String>,
    created_at: String,
}

impl TryFrom<ImportRunRow> for ImportRunData {
    type Error = PersistenceError;

    fn try_from(row: ImportRunRow) -> Result<Self, Self::Error> {
        let summary: ImportSummary = serde_json::from_str(&row.summary_json)?;
        Ok(Self {
            run_id: row.run_id,
            file_name: row.file_name,
            mode: row.mode,
            success: row.success != 0,
            rolled_back: row.rolled_back != 0,
            duration_ms: row.duration_ms.to_u64().ok_or_else(|| {
                PersistenceError::DatabaseError("Duration conversion failed".to_string())
            })?,
            summary,
            error_count: row.error_count.to_usize().ok_or_else(|| {
                PersistenceError::DatabaseError("Error count conversion failed".to_string())
            })?,
            fatal_error: row.fatal_error,
            created_at: row.created_at,
        })
    }
}

/// Lists recorded import runs, newest first.
///
/// # Errors
///
/// Returns an error if the query fails or a stored summary cannot be decoded.
pub fn list_import_runs(
    conn: &mut SqliteConnection,
    limit: i64,
) -> Result<Vec<ImportRunData>, PersistenceError> {
    let rows: Vec<ImportRunRow> = import_runs::table
        .order(import_runs::run_id.desc())
        .limit(limit)
        .select(ImportRunRow::as_select())
        .load(conn)?;

    rows.into_iter().map(ImportRunData::try_from).collect()
}
