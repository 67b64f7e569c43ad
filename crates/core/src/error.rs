// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::wizard::{WizardAction, WizardStep};

/// Errors returned by wizard actions. The state is left untouched unless
/// noted otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    /// The action is not allowed in the current step.
    IllegalTransition {
        /// The attempted action.
        action: WizardAction,
        /// The step the wizard was in.
        step: WizardStep,
    },
    /// `parse_file` was called without a selected file.
    NoFileSelected,
    /// The preview still has blocking errors or no rows.
    NotReady {
        /// Number of validation errors.
        errors: usize,
        /// Number of data rows.
        rows: usize,
    },
    /// No created contact has an email address.
    NothingToInvite,
    /// The file was rejected or could not be parsed. `state.error` holds the
    /// same message.
    InvalidFile(String),
}

impl std::fmt::Display for WizardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IllegalTransition { action, step } => {
                write!(f, "Cannot {action} while in the {step} step")
            }
            Self::NoFileSelected => write!(f, "No file selected"),
            Self::NotReady { errors, rows } => {
                write!(
                    f,
                    "Import is not ready: {errors} validation error(s), {rows} row(s)"
                )
            }
            Self::NothingToInvite => write!(f, "No created contact has an email address"),
            Self::InvalidFile(msg) => write!(f, "Invalid file: {msg}"),
        }
    }
}

impl std::error::Error for WizardError {}
