// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The boundary between the orchestrator and the datastore.

use seido_import_domain::{EntityKind, ImportRecord, NaturalKey};

/// Identity of an upserted entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpsertOutcome {
    /// The datastore identifier of the entity.
    pub id: i64,
    /// `true` if the entity was created, `false` if an existing one was updated.
    pub created: bool,
}

impl UpsertOutcome {
    #[must_use]
    pub const fn created(id: i64) -> Self {
        Self { id, created: true }
    }

    #[must_use]
    pub const fn updated(id: i64) -> Self {
        Self { id, created: false }
    }
}

/// Errors reported by a persistence adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistError {
    /// The row collides with a different stored entity (for example an email
    /// already used by another contact). Affects only this row.
    Conflict(String),
    /// An entity this row links to does not exist in the datastore.
    MissingReference {
        /// The kind of the missing entity.
        entity: EntityKind,
        /// Its natural key.
        key: String,
    },
    /// The datastore refused the row for another business reason.
    Rejected(String),
    /// The datastore itself failed. Aborts the remaining phases.
    Unavailable(String),
}

impl PersistError {
    /// Returns `true` when the error must abort the whole run.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

impl std::fmt::Display for PersistError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Conflict(msg) => write!(f, "Conflict: {msg}"),
            Self::MissingReference { entity, key } => {
                write!(f, "Referenced {entity} '{key}' does not exist")
            }
            Self::Rejected(msg) => write!(f, "Rejected: {msg}"),
            Self::Unavailable(msg) => write!(f, "Datastore unavailable: {msg}"),
        }
    }
}

impl std::error::Error for PersistError {}

/// Turns validated records into create-or-update calls against a datastore.
///
/// Implementations match rows on their natural key and must be idempotent
/// under retry with the same key. Links between records (a lot's building, a
/// contact's company, a contract's lot and parties) are resolved by natural
/// key against entities upserted earlier in the run.
pub trait ImportAdapter {
    /// Creates the entity if no entity with `key` exists, otherwise updates it.
    ///
    /// # Errors
    ///
    /// Returns a `PersistError` when the row cannot be stored. Non-fatal
    /// errors leave the datastore as it was before the call.
    fn upsert(
        &mut self,
        record: &ImportRecord,
        key: &NaturalKey,
    ) -> Result<UpsertOutcome, PersistError>;

    /// Opens a boundary around a whole run.
    ///
    /// # Errors
    ///
    /// Returns a `PersistError` if the boundary cannot be opened.
    fn begin_batch(&mut self) -> Result<(), PersistError> {
        Ok(())
    }

    /// Makes every upsert since `begin_batch` permanent.
    ///
    /// # Errors
    ///
    /// Returns a `PersistError` if the commit fails.
    fn commit_batch(&mut self) -> Result<(), PersistError> {
        Ok(())
    }

    /// Discards every upsert since `begin_batch`.
    ///
    /// # Errors
    ///
    /// Returns a `PersistError` if the rollback fails.
    fn rollback_batch(&mut self) -> Result<(), PersistError> {
        Ok(())
    }
}
