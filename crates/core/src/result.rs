// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use seido_import_domain::{EntityKind, ValidationError};
use serde::{Deserialize, Serialize};

/// How a run treats rows that already succeeded when another row fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportMode {
    /// All or nothing: the run is wrapped in one batch that is rolled back
    /// if any row fails.
    #[default]
    Transactional,
    /// Successful rows are kept even when others fail.
    BestEffort,
}

impl ImportMode {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Transactional => "transactional",
            Self::BestEffort => "best-effort",
        }
    }
}

impl std::fmt::Display for ImportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-entity tally of one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitySummary {
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
}

impl EntitySummary {
    #[must_use]
    pub const fn new(created: usize, updated: usize, failed: usize) -> Self {
        Self {
            created,
            updated,
            failed,
        }
    }

    #[must_use]
    pub const fn attempted(&self) -> usize {
        self.created + self.updated + self.failed
    }
}

/// Tallies for every phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub companies: EntitySummary,
    pub contacts: EntitySummary,
    pub buildings: EntitySummary,
    pub lots: EntitySummary,
    pub contracts: EntitySummary,
}

impl ImportSummary {
    #[must_use]
    pub const fn get(&self, kind: EntityKind) -> &EntitySummary {
        match kind {
            EntityKind::Company => &self.companies,
            EntityKind::Contact => &self.contacts,
            EntityKind::Building => &self.buildings,
            EntityKind::Lot => &self.lots,
            EntityKind::Contract => &self.contracts,
        }
    }

    pub const fn get_mut(&mut self, kind: EntityKind) -> &mut EntitySummary {
        match kind {
            EntityKind::Company => &mut self.companies,
            EntityKind::Contact => &mut self.contacts,
            EntityKind::Building => &mut self.buildings,
            EntityKind::Lot => &mut self.lots,
            EntityKind::Contract => &mut self.contracts,
        }
    }

    /// Sums every phase.
    #[must_use]
    pub fn total(&self) -> EntitySummary {
        EntityKind::ORDER
            .iter()
            .map(|kind| self.get(*kind))
            .fold(EntitySummary::default(), |acc, s| {
                EntitySummary::new(
                    acc.created + s.created,
                    acc.updated + s.updated,
                    acc.failed + s.failed,
                )
            })
    }
}

/// A contact created by a run, offered for invitation when it has an email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedContact {
    pub id: i64,
    pub email: Option<String>,
    pub name: String,
}

impl CreatedContact {
    /// Returns `true` when the contact can be invited.
    #[must_use]
    pub fn is_invitable(&self) -> bool {
        self.email.as_deref().is_some_and(|email| !email.trim().is_empty())
    }
}

/// Terminal artifact of one import run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportResult {
    /// `true` only when every row succeeded and nothing aborted the run.
    pub success: bool,
    pub summary: ImportSummary,
    /// Row failures in execution order, shaped like validation errors.
    pub errors: Vec<ValidationError>,
    /// Contacts created by the run, in creation order.
    pub created_contacts: Vec<CreatedContact>,
    /// Wall-clock duration in milliseconds.
    pub duration_ms: u64,
    pub mode: ImportMode,
    /// `true` when a transactional run discarded its writes.
    pub rolled_back: bool,
    /// The error that aborted the run, if any.
    pub fatal_error: Option<String>,
}

impl ImportResult {
    /// Created contacts that have an email address.
    pub fn invitable_contacts(&self) -> impl Iterator<Item = &CreatedContact> {
        self.created_contacts
            .iter()
            .filter(|contact| contact.is_invitable())
    }
}
