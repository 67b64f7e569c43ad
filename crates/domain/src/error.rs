// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors raised while turning a raw spreadsheet row into a typed record.
///
/// Every variant names the field it concerns so the message shown to the
/// gestionnaire always starts with the column at fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required field is missing or empty.
    MissingField {
        /// The canonical field key.
        field: &'static str,
    },
    /// A field is required unless some other condition holds.
    RequiredUnless {
        /// The canonical field key.
        field: &'static str,
        /// The condition that makes the field optional.
        unless: &'static str,
    },
    /// An email address is malformed.
    InvalidEmail {
        /// The canonical field key.
        field: &'static str,
        /// The offending value.
        value: String,
    },
    /// A date could not be parsed.
    InvalidDate {
        /// The canonical field key.
        field: &'static str,
        /// The offending value.
        value: String,
    },
    /// A monetary amount could not be parsed or is negative.
    InvalidAmount {
        /// The canonical field key.
        field: &'static str,
        /// The offending value.
        value: String,
    },
    /// An integer could not be parsed or is out of range.
    InvalidNumber {
        /// The canonical field key.
        field: &'static str,
        /// The offending value.
        value: String,
        /// The accepted range, human readable.
        expected: &'static str,
    },
    /// A yes/no flag could not be interpreted.
    InvalidFlag {
        /// The canonical field key.
        field: &'static str,
        /// The offending value.
        value: String,
    },
    /// A value is not part of the accepted vocabulary for a field.
    UnknownValue {
        /// The canonical field key.
        field: &'static str,
        /// The offending value.
        value: String,
        /// The accepted values, human readable.
        accepted: &'static str,
    },
    /// Two fields contradict each other.
    ConflictingFields {
        /// The first field.
        field: &'static str,
        /// The field it conflicts with.
        other: &'static str,
        /// A description of the conflict.
        reason: &'static str,
    },
}

impl DomainError {
    /// Returns the canonical field key this error concerns.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::MissingField { field }
            | Self::RequiredUnless { field, .. }
            | Self::InvalidEmail { field, .. }
            | Self::InvalidDate { field, .. }
            | Self::InvalidAmount { field, .. }
            | Self::InvalidNumber { field, .. }
            | Self::InvalidFlag { field, .. }
            | Self::UnknownValue { field, .. }
            | Self::ConflictingFields { field, .. } => field,
        }
    }
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { field } => {
                write!(f, "{field}: required field is missing or empty")
            }
            Self::RequiredUnless { field, unless } => {
                write!(f, "{field}: required field is missing or empty unless {unless}")
            }
            Self::InvalidEmail { field, value } => {
                write!(f, "{field}: invalid email address '{value}'")
            }
            Self::InvalidDate { field, value } => {
                write!(
                    f,
                    "{field}: invalid date '{value}' (expected YYYY-MM-DD or DD/MM/YYYY)"
                )
            }
            Self::InvalidAmount { field, value } => {
                write!(f, "{field}: invalid amount '{value}'")
            }
            Self::InvalidNumber {
                field,
                value,
                expected,
            } => {
                write!(f, "{field}: invalid number '{value}' (expected {expected})")
            }
            Self::InvalidFlag { field, value } => {
                write!(f, "{field}: invalid yes/no value '{value}'")
            }
            Self::UnknownValue {
                field,
                value,
                accepted,
            } => {
                write!(f, "{field}: unknown value '{value}' (must be one of {accepted})")
            }
            Self::ConflictingFields {
                field,
                other,
                reason,
            } => {
                write!(f, "{field}: conflicts with {other} ({reason})")
            }
        }
    }
}

impl std::error::Error for DomainError {}
