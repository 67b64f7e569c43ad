// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Validation, ordered execution and the wizard state machine of the
//! spreadsheet import.
//!
//! The flow is `upload -> preview -> confirm -> progress -> result`. Parsing
//! lives in `seido-import-sheets`; storage is reached only through the
//! `ImportAdapter` trait.

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

mod adapter;
mod batch;
mod error;
mod orchestrator;
mod progress;
mod resolve;
mod result;
mod validate;
mod wizard;

#[cfg(test)]
mod tests;

pub use adapter::{ImportAdapter, PersistError, UpsertOutcome};
pub use batch::{ImportBatch, StagedRecord};
pub use error::WizardError;
pub use orchestrator::execute_import;
pub use progress::{
    COMPLETED_LABEL, ImportObserver, ImportProgress, NoopObserver, RowOutcome, RowStatus,
};
pub use resolve::{LotEntry, LotLookupError, ReferenceIndex};
pub use result::{CreatedContact, EntitySummary, ImportMode, ImportResult, ImportSummary};
pub use validate::{Preparation, prepare, validate};
pub use wizard::{FileUpload, ImportWizard, SelectedFile, WizardAction, WizardState, WizardStep};
