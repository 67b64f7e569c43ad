// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use seido_import::ImportResult;
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::import_runs;
use crate::error::PersistenceError;

/// Records a finished import run.
///
/// Must be called outside the run's own batch so the history survives a
/// rollback.
///
/// # Errors
///
/// Returns an error if the summary cannot be encoded or the insert fails.
pub fn record_import_run(
    conn: &mut SqliteConnection,
    file_name: &str,
    result: &ImportResult,
) -> Result<i64, PersistenceError> {
    let summary_json: String = serde_json::to_string(&result.summary)?;
    let duration_ms: i64 = i64::try_from(result.duration_ms).unwrap_or(i64::MAX);
    let error_count: i32 = i32::try_from(result.errors.len()).unwrap_or(i32::MAX);

    diesel::insert_into(import_runs::table)
        .values((
            import_runs::file_name.eq(file_name),
            import_runs::mode.eq(result.mode.as_str()),
            import_runs::success.eq(i32::from(result.success)),
            import_runs::rolled_back.eq(i32::from(result.rolled_back)),
            import_runs::duration_ms.eq(duration_ms),
            import_runs::summary_json.eq(&summary_json),
            import_runs::error_count.eq(error_count),
            import_runs::fatal_error.eq(result.fatal_error.as_deref()),
        ))
        .execute(conn)?;

    let run_id: i64 = conn.get_last_insert_rowid()?;
    info!(run_id, file_name, success = result.success, "Import run recorded");
    Ok(run_id)
}
