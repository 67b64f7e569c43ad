// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `SQLite` storage for the spreadsheet import.
//!
//! This crate implements the `ImportAdapter` contract on top of Diesel:
//! natural-key upserts for every imported entity, a batch boundary for
//! transactional runs and the import-run history.
//!
//! ## Transactions
//!
//! Every upsert runs in its own transaction, so a failing row never leaves
//! partial writes. Inside a batch opened by `begin_batch` those per-row
//! transactions become savepoints and the batch is committed or rolled back
//! as a whole.
//!
//! ## Testing
//!
//! Tests run against a fresh shared-cache in-memory database each, named
//! from an atomic counter so parallel tests never collide.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::connection::{AnsiTransactionManager, SimpleConnection, TransactionManager};
use diesel::prelude::*;
use diesel::SqliteConnection;
use seido_import::{ImportAdapter, ImportResult, PersistError, UpsertOutcome};
use seido_import_domain::{EntityKind, ImportRecord, NaturalKey};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{info, warn};

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{ContractPartyData, GUARANTOR_ROLE, ImportRunData, TENANT_ROLE};
pub use error::PersistenceError;

/// Diesel-backed import adapter.
pub struct Persistence {
    conn: SqliteConnection,
    batch_open: bool,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String =
            format!("file:seido_import_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn,
            batch_open: false,
        })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self {
            conn,
            batch_open: false,
        })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    /// Upserts one record inside its own transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the row cannot be stored. Nothing of the row is
    /// written in that case.
    pub fn upsert_record(
        &mut self,
        record: &ImportRecord,
        key: &NaturalKey,
    ) -> Result<UpsertOutcome, PersistenceError> {
        self.conn
            .transaction::<UpsertOutcome, PersistenceError, _>(|conn| {
                mutations::upsert_record(conn, record, key)
            })
    }

    /// Returns the row ID stored under a natural key.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn find_id(&mut self, key: &NaturalKey) -> Result<Option<i64>, PersistenceError> {
        queries::find_id(&mut self.conn, key)
    }

    /// Counts the stored rows of one entity kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count_entities(&mut self, entity: EntityKind) -> Result<usize, PersistenceError> {
        queries::count_entities(&mut self.conn, entity)
    }

    /// Lists the tenants and guarantors of a contract.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn contract_parties(
        &mut self,
        contract_id: i64,
    ) -> Result<Vec<ContractPartyData>, PersistenceError> {
        queries::contract_parties(&mut self.conn, contract_id)
    }

    /// Records a finished run in the import history.
    ///
    /// # Errors
    ///
    /// Returns an error if the run cannot be stored.
    pub fn record_import_run(
        &mut self,
        file_name: &str,
        result: &ImportResult,
    ) -> Result<i64, PersistenceError> {
        mutations::record_import_run(&mut self.conn, file_name, result)
    }

    /// Lists recorded runs, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot be read.
    pub fn list_import_runs(&mut self, limit: i64) -> Result<Vec<ImportRunData>, PersistenceError> {
        queries::list_import_runs(&mut self.conn, limit)
    }
}

impl ImportAdapter for Persistence {
    fn upsert(
        &mut self,
        record: &ImportRecord,
        key: &NaturalKey,
    ) -> Result<UpsertOutcome, PersistError> {
        self.upsert_record(record, key).map_err(PersistError::from)
    }

    fn begin_batch(&mut self) -> Result<(), PersistError> {
        AnsiTransactionManager::begin_transaction(&mut self.conn)
            .map_err(|e| PersistError::from(PersistenceError::from(e)))?;
        self.batch_open = true;
        info!("Import batch opened");
        Ok(())
    }

    fn commit_batch(&mut self) -> Result<(), PersistError> {
        if !self.batch_open {
            return Ok(());
        }
        // The batch stays open on failure so `rollback_batch` still undoes it.
        AnsiTransactionManager::commit_transaction(&mut self.conn)
            .map_err(|e| PersistError::from(PersistenceError::from(e)))?;
        self.batch_open = false;
        info!("Import batch committed");
        Ok(())
    }

    fn rollback_batch(&mut self) -> Result<(), PersistError> {
        if !self.batch_open {
            return Ok(());
        }
        match AnsiTransactionManager::rollback_transaction(&mut self.conn) {
            Ok(()) => {}
            // A failed COMMIT ends Diesel's transaction bookkeeping, but SQLite
            // keeps the transaction open (e.g. on deferred foreign keys).
            Err(diesel::result::Error::NotInTransaction) => {
                rollback_open_transaction(&mut self.conn)
                    .map_err(|e| PersistError::from(PersistenceError::from(e)))?;
            }
            Err(e) => return Err(PersistError::from(PersistenceError::from(e))),
        }
        self.batch_open = false;
        warn!("Import batch rolled back");
        Ok(())
    }
}

/// Issues a raw `ROLLBACK`. A connection with no open transaction is already
/// rolled back.
fn rollback_open_transaction(conn: &mut SqliteConnection) -> Result<(), diesel::result::Error> {
    match conn.batch_execute("ROLLBACK") {
        Err(diesel::result::Error::DatabaseError(_, info))
            if info.message().contains("no transaction is active") =>
        {
            Ok(())
        }
        other => other,
    }
}
