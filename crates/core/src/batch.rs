// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use seido_import_domain::{EntityKind, ImportRecord, NaturalKey};

/// A typed record ready to be upserted, with the key it is matched on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedRecord {
    pub record: ImportRecord,
    pub key: NaturalKey,
}

impl StagedRecord {
    #[must_use]
    pub const fn new(record: ImportRecord, key: NaturalKey) -> Self {
        Self { record, key }
    }
}

/// Every valid row of a file, grouped by import phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportBatch {
    phases: [Vec<StagedRecord>; 5],
}

impl ImportBatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record to the phase of its entity kind.
    pub fn push(&mut self, staged: StagedRecord) {
        self.phases[staged.record.entity().position()].push(staged);
    }

    /// The records of one phase in sheet order.
    #[must_use]
    pub fn phase(&self, kind: EntityKind) -> &[StagedRecord] {
        &self.phases[kind.position()]
    }

    /// Total number of records across all phases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.phases.iter().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
