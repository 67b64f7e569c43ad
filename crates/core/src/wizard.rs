// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The import wizard state machine.
//!
//! `ImportWizard` exclusively owns its `WizardState`. Callers read snapshots
//! and request changes through the named actions only.

use seido_import_domain::{ImportStats, ParseResult, ValidationError};
use seido_import_sheets::{FileFormat, ImportFile, ParseError, parse};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::adapter::ImportAdapter;
use crate::error::WizardError;
use crate::orchestrator::execute_import;
use crate::progress::{ImportObserver, ImportProgress, RowOutcome};
use crate::result::{CreatedContact, ImportMode, ImportResult};
use crate::validate::{Preparation, prepare, validate};

/// Steps of the wizard, in forward order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    Upload,
    Preview,
    Confirm,
    Progress,
    Result,
    /// Optional follow-up offering to invite created contacts.
    Invite,
}

impl WizardStep {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::Preview => "preview",
            Self::Confirm => "confirm",
            Self::Progress => "progress",
            Self::Result => "result",
            Self::Invite => "invite",
        }
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The actions a caller may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardAction {
    SetFile,
    ParseFile,
    ValidateData,
    Proceed,
    ExecuteImport,
    GoBack,
    Reset,
    GoToInvitationStep,
    SetCreatedContacts,
}

impl std::fmt::Display for WizardAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let verb: &str = match self {
            Self::SetFile => "select a file",
            Self::ParseFile => "parse the file",
            Self::ValidateData => "validate the data",
            Self::Proceed => "proceed to confirmation",
            Self::ExecuteImport => "execute the import",
            Self::GoBack => "go back",
            Self::Reset => "reset",
            Self::GoToInvitationStep => "open the invitation step",
            Self::SetCreatedContacts => "set the created contacts",
        };
        write!(f, "{verb}")
    }
}

/// A file chosen by the user, before any check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    #[must_use]
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// Metadata of the accepted file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedFile {
    pub name: String,
    pub size: usize,
    pub format: FileFormat,
}

/// Everything the view layer renders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardState {
    pub step: WizardStep,
    pub file: Option<SelectedFile>,
    pub is_loading: bool,
    /// Error overlay. Set without changing `step`.
    pub error: Option<String>,
    pub parse_result: Option<ParseResult>,
    pub import_result: Option<ImportResult>,
}

/// Records the latest phase event before forwarding it.
struct Tracker<'a, O: ?Sized> {
    latest: &'a mut Option<ImportProgress>,
    inner: &'a mut O,
}

impl<O: ImportObserver + ?Sized> ImportObserver for Tracker<'_, O> {
    fn on_phase(&mut self, progress: &ImportProgress) {
        *self.latest = Some(progress.clone());
        self.inner.on_phase(progress);
    }

    fn on_row(&mut self, outcome: &RowOutcome) {
        self.inner.on_row(outcome);
    }
}

/// The import wizard.
#[derive(Debug, Clone, Default)]
pub struct ImportWizard {
    state: WizardState,
    file: Option<ImportFile>,
    errors: Vec<ValidationError>,
    validated: bool,
    progress: Option<ImportProgress>,
    mode: ImportMode,
}

impl ImportWizard {
    /// Creates a wizard in the `upload` step.
    #[must_use]
    pub fn new(mode: ImportMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn state(&self) -> &WizardState {
        &self.state
    }

    #[must_use]
    pub const fn mode(&self) -> ImportMode {
        self.mode
    }

    /// Row counts of the parsed file, if any.
    #[must_use]
    pub fn stats(&self) -> Option<ImportStats> {
        self.state.parse_result.as_ref().map(ParseResult::stats)
    }

    /// Errors of the latest validation pass.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Live progress while and after an import runs.
    #[must_use]
    pub const fn progress(&self) -> Option<&ImportProgress> {
        self.progress.as_ref()
    }

    /// The accepted file, if any.
    #[must_use]
    pub const fn file(&self) -> Option<&ImportFile> {
        self.file.as_ref()
    }

    /// Whether the current step's preconditions for moving forward are met.
    #[must_use]
    pub fn can_proceed(&self) -> bool {
        match self.state.step {
            WizardStep::Upload => self.file.is_some(),
            WizardStep::Preview => {
                self.validated
                    && self.errors.is_empty()
                    && self.stats().is_some_and(|stats| !stats.is_empty())
            }
            WizardStep::Confirm => true,
            WizardStep::Progress | WizardStep::Result | WizardStep::Invite => false,
        }
    }

    fn require(&self, action: WizardAction, allowed: &[WizardStep]) -> Result<(), WizardError> {
        if allowed.contains(&self.state.step) {
            Ok(())
        } else {
            warn!(%action, step = %self.state.step, "Rejected wizard action");
            Err(WizardError::IllegalTransition {
                action,
                step: self.state.step,
            })
        }
    }

    fn move_to(&mut self, step: WizardStep) {
        info!(from = %self.state.step, to = %step, "Wizard step changed");
        self.state.step = step;
    }

    /// Replaces or clears the selected file. Clears any prior error.
    ///
    /// The extension and the 10 MB ceiling are checked here, before anything
    /// is parsed. A rejected file is not kept.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::IllegalTransition` outside `upload` and
    /// `WizardError::InvalidFile` when the file is rejected.
    pub fn set_file(&mut self, upload: Option<FileUpload>) -> Result<(), WizardError> {
        self.require(WizardAction::SetFile, &[WizardStep::Upload])?;
        self.state.error = None;
        self.file = None;
        self.state.file = None;

        let Some(upload) = upload else {
            return Ok(());
        };
        match ImportFile::new(upload.name, upload.bytes) {
            Ok(file) => {
                info!(file = file.name(), size = file.size(), "File selected");
                self.state.file = Some(SelectedFile {
                    name: file.name().to_string(),
                    size: file.size(),
                    format: file.format(),
                });
                self.file = Some(file);
                Ok(())
            }
            Err(e) => Err(self.file_error(&e)),
        }
    }

    fn file_error(&mut self, error: &ParseError) -> WizardError {
        let message: String = error.to_string();
        warn!(error = %message, "File rejected");
        self.state.error = Some(message.clone());
        WizardError::InvalidFile(message)
    }

    /// Parses the selected file and, on success, moves to `preview` with a
    /// first validation pass already run.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::IllegalTransition` outside `upload`,
    /// `WizardError::NoFileSelected` without a file and
    /// `WizardError::InvalidFile` when parsing fails, in which case the wizard
    /// stays in `upload` with `state.error` set.
    pub fn parse_file(&mut self) -> Result<(), WizardError> {
        self.require(WizardAction::ParseFile, &[WizardStep::Upload])?;
        let file: &ImportFile = self.file.as_ref().ok_or(WizardError::NoFileSelected)?;

        self.state.is_loading = true;
        let parsed: Result<ParseResult, ParseError> = parse(file);
        self.state.is_loading = false;

        match parsed {
            Ok(parse_result) => {
                self.state.error = None;
                self.state.parse_result = Some(parse_result);
                self.move_to(WizardStep::Preview);
                self.run_validation();
                Ok(())
            }
            Err(e) => Err(self.file_error(&e)),
        }
    }

    fn run_validation(&mut self) {
        self.errors = self
            .state
            .parse_result
            .as_ref()
            .map(validate)
            .unwrap_or_default();
        self.validated = true;
    }

    /// Re-runs validation, replacing the previous error set.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::IllegalTransition` outside `preview`.
    pub fn validate_data(&mut self) -> Result<&[ValidationError], WizardError> {
        self.require(WizardAction::ValidateData, &[WizardStep::Preview])?;
        self.run_validation();
        info!(errors = self.errors.len(), "Data validated");
        Ok(&self.errors)
    }

    /// Moves from `preview` to `confirm`.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::IllegalTransition` outside `preview` and
    /// `WizardError::NotReady` while `can_proceed` is false.
    pub fn proceed(&mut self) -> Result<(), WizardError> {
        self.require(WizardAction::Proceed, &[WizardStep::Preview])?;
        if !self.can_proceed() {
            return Err(WizardError::NotReady {
                errors: self.errors.len(),
                rows: self.stats().map_or(0, |stats| stats.total),
            });
        }
        self.move_to(WizardStep::Confirm);
        Ok(())
    }

    /// Runs the import and moves to `result`.
    ///
    /// The wizard passes through `progress` and always ends in `result`,
    /// even when the run aborts; a fatal error is also copied into
    /// `state.error`.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::IllegalTransition` outside `confirm`.
    pub fn execute_import<A, O>(
        &mut self,
        adapter: &mut A,
        observer: &mut O,
    ) -> Result<&ImportResult, WizardError>
    where
        A: ImportAdapter + ?Sized,
        O: ImportObserver + ?Sized,
    {
        self.require(WizardAction::ExecuteImport, &[WizardStep::Confirm])?;
        let preparation: Preparation = self
            .state
            .parse_result
            .as_ref()
            .map(prepare)
            .ok_or(WizardError::NoFileSelected)?;
        if !preparation.errors.is_empty() {
            return Err(WizardError::NotReady {
                errors: preparation.errors.len(),
                rows: self.stats().map_or(0, |stats| stats.total),
            });
        }

        self.move_to(WizardStep::Progress);
        self.state.is_loading = true;
        self.state.error = None;
        self.progress = Some(ImportProgress::not_started());

        let mut tracker: Tracker<'_, O> = Tracker {
            latest: &mut self.progress,
            inner: observer,
        };
        let result: ImportResult =
            execute_import(&preparation.batch, adapter, self.mode, &mut tracker);

        if let Some(fatal) = &result.fatal_error {
            self.state.error = Some(fatal.clone());
        }
        self.state.is_loading = false;
        self.move_to(WizardStep::Result);
        Ok(&*self.state.import_result.insert(result))
    }

    /// Steps back from `preview` to `upload` or from `confirm` to `preview`.
    /// Leaving `invite` returns to `result`.
    ///
    /// Returns `false`, leaving the state unchanged, from any other step.
    pub fn go_back(&mut self) -> bool {
        let target: WizardStep = match self.state.step {
            WizardStep::Preview => WizardStep::Upload,
            WizardStep::Confirm => WizardStep::Preview,
            WizardStep::Invite => WizardStep::Result,
            WizardStep::Upload | WizardStep::Progress | WizardStep::Result => {
                warn!(step = %self.state.step, "Ignoring go back");
                return false;
            }
        };
        if target == WizardStep::Upload {
            self.state.parse_result = None;
            self.errors.clear();
            self.validated = false;
        }
        self.state.error = None;
        self.move_to(target);
        true
    }

    /// Returns to the initial `upload` state with every field cleared.
    pub fn reset(&mut self) {
        info!(from = %self.state.step, "Wizard reset");
        *self = Self::new(self.mode);
    }

    /// Moves from `result` to the invitation step.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::IllegalTransition` outside `result` and
    /// `WizardError::NothingToInvite` when no created contact has an email.
    pub fn go_to_invitation_step(&mut self) -> Result<(), WizardError> {
        self.require(WizardAction::GoToInvitationStep, &[WizardStep::Result])?;
        let invitable: usize = self
            .state
            .import_result
            .as_ref()
            .map_or(0, |result| result.invitable_contacts().count());
        if invitable == 0 {
            return Err(WizardError::NothingToInvite);
        }
        self.move_to(WizardStep::Invite);
        Ok(())
    }

    /// Replaces the contacts offered for invitation.
    ///
    /// # Errors
    ///
    /// Returns `WizardError::IllegalTransition` outside `result` and `invite`.
    pub fn set_created_contacts(
        &mut self,
        contacts: Vec<CreatedContact>,
    ) -> Result<(), WizardError> {
        self.require(
            WizardAction::SetCreatedContacts,
            &[WizardStep::Result, WizardStep::Invite],
        )?;
        if let Some(result) = self.state.import_result.as_mut() {
            result.created_contacts = contacts;
        }
        Ok(())
    }
}
