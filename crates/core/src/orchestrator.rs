// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ordered, phase-by-phase execution of an import batch.
//!
//! Phases run strictly in `EntityKind::ORDER` and rows within a phase run
//! one after another, so later phases always see the entities earlier ones
//! created and two rows sharing a natural key never race.

use std::time::Instant;

use seido_import_domain::{EntityKind, ImportRecord, ValidationError};
use tracing::{debug, error, info, warn};

use crate::adapter::{ImportAdapter, PersistError, UpsertOutcome};
use crate::batch::{ImportBatch, StagedRecord};
use crate::progress::{ImportObserver, ImportProgress, RowOutcome, RowStatus};
use crate::result::{CreatedContact, EntitySummary, ImportMode, ImportResult, ImportSummary};

/// Runs every phase of `batch` against `adapter`.
///
/// Row failures are tallied and reported but do not stop the run. A fatal
/// adapter error aborts the remaining phases. In either case a result is
/// always produced and the observer always receives a final 100% event.
pub fn execute_import<A, O>(
    batch: &ImportBatch,
    adapter: &mut A,
    mode: ImportMode,
    observer: &mut O,
) -> ImportResult
where
    A: ImportAdapter + ?Sized,
    O: ImportObserver + ?Sized,
{
    let started: Instant = Instant::now();
    info!(%mode, rows = batch.len(), "Starting import");

    let mut run: Run = Run::default();

    let batch_open: bool = match mode {
        ImportMode::Transactional => match adapter.begin_batch() {
            Ok(()) => true,
            Err(e) => {
                error!(error = %e, "Could not open import batch");
                run.fatal = Some(e);
                false
            }
        },
        ImportMode::BestEffort => false,
    };

    if run.fatal.is_none() {
        'phases: for phase in EntityKind::ORDER {
            let progress: ImportProgress = ImportProgress::at_phase(phase);
            info!(
                phase = %phase,
                phase_index = progress.phase_index,
                total_progress = progress.total_progress,
                rows = batch.phase(phase).len(),
                "Import phase started"
            );
            observer.on_phase(&progress);

            for staged in batch.phase(phase) {
                if let Err(fatal) = run.row(adapter, observer, staged) {
                    error!(
                        phase = %phase,
                        row = staged.record.line(),
                        error = %fatal,
                        "Import aborted"
                    );
                    run.fatal = Some(fatal);
                    break 'phases;
                }
            }
        }
    }

    let mut rolled_back: bool = false;
    if batch_open {
        if run.errors.is_empty() && run.fatal.is_none() {
            if let Err(e) = adapter.commit_batch() {
                error!(error = %e, "Could not commit import batch");
                run.fatal = Some(e);
                rolled_back = rollback(adapter);
            }
        } else {
            rolled_back = rollback(adapter);
        }
    }
    if rolled_back {
        run.created_contacts.clear();
    }

    observer.on_phase(&ImportProgress::completed());

    let success: bool = run.errors.is_empty() && run.fatal.is_none();
    let result: ImportResult = ImportResult {
        success,
        summary: run.summary,
        errors: run.errors,
        created_contacts: run.created_contacts,
        duration_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        mode,
        rolled_back,
        fatal_error: run.fatal.map(|e| e.to_string()),
    };
    info!(
        success,
        rolled_back,
        created = result.summary.total().created,
        updated = result.summary.total().updated,
        failed = result.summary.total().failed,
        duration_ms = result.duration_ms,
        "Import finished"
    );
    result
}

fn rollback<A: ImportAdapter + ?Sized>(adapter: &mut A) -> bool {
    match adapter.rollback_batch() {
        Ok(()) => {
            warn!("Import batch rolled back");
            true
        }
        Err(e) => {
            error!(error = %e, "Could not roll back import batch");
            false
        }
    }
}

/// Mutable state of one run.
#[derive(Default)]
struct Run {
    summary: ImportSummary,
    errors: Vec<ValidationError>,
    created_contacts: Vec<CreatedContact>,
    fatal: Option<PersistError>,
}

impl Run {
    /// Upserts one row and records its outcome. Returns the error when it is fatal.
    fn row<A, O>(
        &mut self,
        adapter: &mut A,
        observer: &mut O,
        staged: &StagedRecord,
    ) -> Result<(), PersistError>
    where
        A: ImportAdapter + ?Sized,
        O: ImportObserver + ?Sized,
    {
        let entity: EntityKind = staged.record.entity();
        let line: usize = staged.record.line();
        let result: Result<UpsertOutcome, PersistError> =
            adapter.upsert(&staged.record, &staged.key);

        let (status, id): (RowStatus, Option<i64>) = match &result {
            Ok(outcome) => {
                let tally: &mut EntitySummary = self.summary.get_mut(entity);
                if outcome.created {
                    tally.created += 1;
                } else {
                    tally.updated += 1;
                }
                if outcome.created
                    && let ImportRecord::Contact(contact) = &staged.record
                {
                    self.created_contacts.push(CreatedContact {
                        id: outcome.id,
                        email: contact.email.as_ref().map(ToString::to_string),
                        name: contact.name.clone(),
                    });
                }
                debug!(
                    entity = %entity,
                    row = line,
                    key = %staged.key,
                    id = outcome.id,
                    created = outcome.created,
                    "Row upserted"
                );
                let status: RowStatus = if outcome.created {
                    RowStatus::Created
                } else {
                    RowStatus::Updated
                };
                (status, Some(outcome.id))
            }
            Err(e) => {
                self.summary.get_mut(entity).failed += 1;
                self.errors
                    .push(ValidationError::new(entity.sheet(), line, e.to_string()));
                warn!(entity = %entity, row = line, key = %staged.key, error = %e, "Row failed");
                (RowStatus::Failed, None)
            }
        };

        observer.on_row(&RowOutcome {
            entity,
            sheet: entity.sheet(),
            row: line,
            status,
            id,
        });

        match result {
            Err(e) if e.is_fatal() => Err(e),
            _ => Ok(()),
        }
    }
}
