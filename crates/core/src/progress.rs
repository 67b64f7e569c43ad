// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use seido_import_domain::{EntityKind, SheetKind};
use serde::{Deserialize, Serialize};

/// Label shown once every phase has run.
pub const COMPLETED_LABEL: &str = "Import terminé";

/// Live progress of an import run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportProgress {
    /// Position of the current phase, `-1` before the first one starts.
    pub phase_index: i32,
    /// The current phase, if one has started.
    pub phase: Option<EntityKind>,
    /// Localized label of the current phase.
    pub phase_name: String,
    /// Overall completion, 0 to 100.
    pub total_progress: u8,
}

impl ImportProgress {
    /// Progress before the first phase.
    #[must_use]
    pub const fn not_started() -> Self {
        Self {
            phase_index: -1,
            phase: None,
            phase_name: String::new(),
            total_progress: 0,
        }
    }

    /// Progress at the start of `phase`: `round(position / phases * 100)`.
    #[must_use]
    pub fn at_phase(phase: EntityKind) -> Self {
        let position: usize = phase.position();
        let phases: usize = EntityKind::ORDER.len();
        let percent: usize = (position * 200 + phases) / (phases * 2);
        Self {
            phase_index: i32::try_from(position).unwrap_or(i32::MAX),
            phase: Some(phase),
            phase_name: phase.label().to_string(),
            total_progress: u8::try_from(percent).unwrap_or(100),
        }
    }

    /// Progress once the run is over. Keeps the last phase index.
    #[must_use]
    pub fn completed() -> Self {
        let last: EntityKind = EntityKind::Contract;
        Self {
            phase_index: i32::try_from(last.position()).unwrap_or(i32::MAX),
            phase: Some(last),
            phase_name: COMPLETED_LABEL.to_string(),
            total_progress: 100,
        }
    }
}

/// What happened to one row during execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStatus {
    Created,
    Updated,
    Failed,
}

/// Fine-grained per-row event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowOutcome {
    pub entity: EntityKind,
    pub sheet: SheetKind,
    pub row: usize,
    pub status: RowStatus,
    /// The datastore identifier, when the upsert succeeded.
    pub id: Option<i64>,
}

/// Receives progress while an import runs.
///
/// `on_phase` fires at each phase start and once more at 100% when the run
/// ends. `on_row` is optional and fires after every row.
pub trait ImportObserver {
    fn on_phase(&mut self, progress: &ImportProgress);

    fn on_row(&mut self, _outcome: &RowOutcome) {}
}

impl<F> ImportObserver for F
where
    F: FnMut(&ImportProgress),
{
    fn on_phase(&mut self, progress: &ImportProgress) {
        self(progress);
    }
}

/// An observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ImportObserver for NoopObserver {
    fn on_phase(&mut self, _progress: &ImportProgress) {}
}
