// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use seido_import::WizardError;
use seido_import_persistence::PersistenceError;
use seido_import_sheets::TemplateError;

/// API-level errors.
///
/// These are distinct from wizard and storage errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The action is not allowed in the session's current wizard step.
    InvalidTransition {
        /// A human-readable description of the rejected action.
        message: String,
    },
    /// A wizard rule blocked the action.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::InvalidTransition { message } => write!(f, "{message}"),
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<WizardError> for ApiError {
    fn from(err: WizardError) -> Self {
        match err {
            WizardError::IllegalTransition { .. } => Self::InvalidTransition {
                message: err.to_string(),
            },
            WizardError::NoFileSelected => Self::InvalidInput {
                field: String::from("file"),
                message: err.to_string(),
            },
            WizardError::InvalidFile(message) => Self::InvalidInput {
                field: String::from("file"),
                message,
            },
            WizardError::NotReady { .. } => Self::DomainRuleViolation {
                rule: String::from("import_not_ready"),
                message: err.to_string(),
            },
            WizardError::NothingToInvite => Self::DomainRuleViolation {
                rule: String::from("nothing_to_invite"),
                message: err.to_string(),
            },
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        Self::Internal {
            message: format!("Persistence error: {err}"),
        }
    }
}

impl From<TemplateError> for ApiError {
    fn from(err: TemplateError) -> Self {
        Self::Internal {
            message: err.to_string(),
        }
    }
}
