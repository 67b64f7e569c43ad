// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response types for the API boundary.

use seido_import::{CreatedContact, ImportMode, ImportProgress, ImportResult, WizardState};
use seido_import_domain::{ImportStats, ValidationError};
use seido_import_persistence::ImportRunData;
use serde::{Deserialize, Serialize};

use crate::sessions::ImportSession;

/// Everything a client needs to render one wizard session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub mode: ImportMode,
    pub state: WizardState,
    /// Row counts of the parsed file, once parsed.
    pub stats: Option<ImportStats>,
    /// Blocking validation errors of the current preview.
    pub errors: Vec<ValidationError>,
    pub can_proceed: bool,
    /// Last progress event of the current or latest run.
    pub progress: Option<ImportProgress>,
}

impl SessionSnapshot {
    /// Captures the current state of a session.
    #[must_use]
    pub fn of(session: &ImportSession) -> Self {
        Self {
            session_id: session.id.clone(),
            mode: session.wizard.mode(),
            state: session.wizard.state().clone(),
            stats: session.wizard.stats(),
            errors: session.wizard.errors().to_vec(),
            can_proceed: session.wizard.can_proceed(),
            progress: session.wizard.progress().cloned(),
        }
    }
}

/// A file handed to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetFileRequest {
    /// The original file name, extension included.
    pub name: String,
    /// The raw file content.
    pub bytes: Vec<u8>,
}

/// Outcome of a back navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoBackResponse {
    /// `false` when the current step has no previous step.
    pub moved: bool,
    pub session: SessionSnapshot,
}

/// Outcome of an executed import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteImportResponse {
    pub result: ImportResult,
    /// The history entry of the run, when it could be recorded.
    pub run_id: Option<i64>,
    pub session: SessionSnapshot,
}

/// Replacement list of contacts offered for invitation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetCreatedContactsRequest {
    pub contacts: Vec<CreatedContact>,
}

/// A generated template workbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateResponse {
    pub file_name: String,
    /// `.xlsx` bytes.
    pub bytes: Vec<u8>,
}

/// Request to list the import history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListImportRunsRequest {
    /// Maximum number of runs to return. Defaults to `DEFAULT_RUN_LIMIT`.
    pub limit: Option<usize>,
}

/// Recorded runs, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListImportRunsResponse {
    pub runs: Vec<ImportRunData>,
}
