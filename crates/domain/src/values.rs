// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Typed cell values and the parsers that produce them from raw strings.

use serde::{Deserialize, Serialize};
use time::{Date, Month};

use crate::columns::fold_label;
use crate::error::DomainError;

/// A syntactically valid, lower-cased email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Parses and normalizes an email address.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidEmail` if the value is not of the form
    /// `local@domain.tld`.
    pub fn parse(field: &'static str, value: &str) -> Result<Self, DomainError> {
        let normalized: String = value.trim().to_lowercase();
        let invalid = || DomainError::InvalidEmail {
            field,
            value: value.trim().to_string(),
        };

        let Some((local, domain)) = normalized.split_once('@') else {
            return Err(invalid());
        };
        if local.is_empty()
            || domain.contains('@')
            || normalized.chars().any(char::is_whitespace)
            || !domain.contains('.')
            || domain.split('.').any(str::is_empty)
        {
            return Err(invalid());
        }
        Ok(Self(normalized))
    }

    /// Returns the normalized address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A non-negative amount of money in euro cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero euros.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from cents.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the amount in cents.
    #[must_use]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Parses an amount such as `850`, `1 250,50`, `1.250,50 €` or `1250.5`.
    ///
    /// When both separators appear, the last one is the decimal separator.
    /// More than two decimals are rounded half up.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAmount` for anything else, including
    /// negative amounts.
    pub fn parse(field: &'static str, value: &str) -> Result<Self, DomainError> {
        let invalid = || DomainError::InvalidAmount {
            field,
            value: value.trim().to_string(),
        };

        let compact: String = value
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '€' && *c != '\u{a0}')
            .collect();
        if compact.is_empty() {
            return Err(invalid());
        }

        let decimal_at: Option<usize> = compact.rfind([',', '.']);
        let (integer_part, fraction_part): (String, &str) = match decimal_at {
            Some(index) => {
                let fraction: &str = &compact[index + 1..];
                // A lone separator followed by exactly three digits is a thousands separator.
                let only_one_separator: bool =
                    compact.matches([',', '.']).count() == 1 && fraction.len() == 3;
                if only_one_separator {
                    (compact.replace([',', '.'], ""), "")
                } else {
                    (compact[..index].replace([',', '.'], ""), fraction)
                }
            }
            None => (compact.clone(), ""),
        };

        if integer_part.is_empty() && fraction_part.is_empty() {
            return Err(invalid());
        }
        let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
        if !all_digits(&integer_part) || !all_digits(fraction_part) {
            return Err(invalid());
        }

        let euros: i64 = if integer_part.is_empty() {
            0
        } else {
            integer_part.parse().map_err(|_| invalid())?
        };

        let mut digits = fraction_part.bytes().map(|b| i64::from(b - b'0'));
        let tens: i64 = digits.next().unwrap_or(0);
        let units: i64 = digits.next().unwrap_or(0);
        let round_up: bool = digits.next().is_some_and(|d| d >= 5);
        let cents: i64 = tens * 10 + units + i64::from(round_up);

        euros
            .checked_mul(100)
            .and_then(|total| total.checked_add(cents))
            .map(Self)
            .ok_or_else(invalid)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Declares a closed vocabulary parsed from localized spreadsheet values.
macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident, $field:expr, $accepted:expr, default = $default:ident,
        { $($variant:ident => $canonical:literal [$($alias:literal),*]),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $(
                #[doc = $canonical]
                $variant,
            )+
        }

        impl $name {
            /// The value used when the cell is blank.
            pub const DEFAULT: Self = Self::$default;

            /// Returns the canonical stored value.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $canonical,)+
                }
            }

            /// Parses a localized value, falling back to the default when blank.
            ///
            /// # Errors
            ///
            /// Returns `DomainError::UnknownValue` for values outside the vocabulary.
            pub fn parse(value: Option<&str>) -> Result<Self, DomainError> {
                let Some(raw) = value else {
                    return Ok(Self::DEFAULT);
                };
                let folded: String = fold_label(raw).replace([' ', '-'], "_");
                match folded.as_str() {
                    $($canonical $(| $alias)* => Ok(Self::$variant),)+
                    _ => Err(DomainError::UnknownValue {
                        field: $field,
                        value: raw.trim().to_string(),
                        accepted: $accepted,
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }
    };
}

vocabulary! {
    /// The category of a lot.
    LotCategory, crate::columns::fields::CATEGORY,
    "appartement, collocation, maison, garage, local_commercial, parking, autre",
    default = Appartement,
    {
        Appartement => "appartement" ["apartment", "appart", "flat", "studio"],
        Collocation => "collocation" ["colocation", "coliving", "shared"],
        Maison => "maison" ["house", "villa"],
        Garage => "garage" ["box"],
        LocalCommercial => "local_commercial"
            ["commercial", "commerce", "shop", "bureau", "office"],
        Parking => "parking" ["parking_space", "place_de_parking"],
        Autre => "autre" ["other"],
    }
}

vocabulary! {
    /// The role a contact plays towards the gestionnaire.
    ContactRole, crate::columns::fields::ROLE,
    "locataire, proprietaire, prestataire, gestionnaire, autre",
    default = Autre,
    {
        Locataire => "locataire" ["tenant", "occupant"],
        Proprietaire => "proprietaire" ["owner", "bailleur", "landlord"],
        Prestataire => "prestataire" ["provider", "supplier", "fournisseur", "artisan"],
        Gestionnaire => "gestionnaire" ["manager", "syndic"],
        Autre => "autre" ["other"],
    }
}

vocabulary! {
    /// How often rent is paid.
    PaymentFrequency, crate::columns::fields::PAYMENT_FREQUENCY,
    "mensuel, trimestriel, semestriel, annuel",
    default = Mensuel,
    {
        Mensuel => "mensuel" ["mensuelle", "monthly", "mois"],
        Trimestriel => "trimestriel" ["trimestrielle", "quarterly", "trimestre"],
        Semestriel => "semestriel" ["semestrielle", "semiannual", "semi_annual", "semestre"],
        Annuel => "annuel" ["annuelle", "yearly", "annual", "an"],
    }
}

/// Parses a date written as `YYYY-MM-DD`, `DD/MM/YYYY`, `DD-MM-YYYY` or
/// `DD.MM.YYYY`. A trailing time part (`T...` or ` ...`) is ignored.
///
/// # Errors
///
/// Returns `DomainError::InvalidDate` when the value matches none of these or
/// names a day that does not exist.
pub fn parse_date(field: &'static str, value: &str) -> Result<Date, DomainError> {
    let trimmed: &str = value.trim();
    let invalid = || DomainError::InvalidDate {
        field,
        value: trimmed.to_string(),
    };

    let date_part: &str = trimmed
        .split(['T', ' '])
        .next()
        .filter(|part| !part.is_empty())
        .ok_or_else(invalid)?;
    let parts: Vec<&str> = date_part.split(['-', '/', '.']).collect();
    let [a, b, c] = parts.as_slice() else {
        return Err(invalid());
    };

    let (year, month, day): (&str, &str, &str) = if a.len() == 4 {
        (*a, *b, *c)
    } else {
        (*c, *b, *a)
    };
    if year.len() != 4 {
        return Err(invalid());
    }
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u8 = month.parse().map_err(|_| invalid())?;
    let day: u8 = day.parse().map_err(|_| invalid())?;
    let month: Month = Month::try_from(month).map_err(|_| invalid())?;
    Date::from_calendar_date(year, month, day).map_err(|_| invalid())
}

/// Adds whole months to a date, clamping the day to the end of the target month.
#[must_use]
pub fn add_months(date: Date, months: u16) -> Date {
    let zero_based: i32 = i32::from(u8::from(date.month())) - 1 + i32::from(months);
    let year: i32 = date.year() + zero_based.div_euclid(12);
    let month_number: u8 = u8::try_from(zero_based.rem_euclid(12) + 1).unwrap_or(1);
    let month: Month = Month::try_from(month_number).unwrap_or(Month::January);
    (28..=date.day())
        .rev()
        .chain(std::iter::once(date.day().min(28)))
        .find_map(|day| Date::from_calendar_date(year, month, day).ok())
        .unwrap_or(date)
}

/// Parses a yes/no flag (`oui`, `non`, `yes`, `no`, `true`, `false`, `1`,
/// `0`, `x`), treating a blank value as `false`.
///
/// # Errors
///
/// Returns `DomainError::InvalidFlag` for any other value.
pub fn parse_flag(field: &'static str, value: Option<&str>) -> Result<bool, DomainError> {
    let Some(raw) = value else {
        return Ok(false);
    };
    match fold_label(raw).as_str() {
        "oui" | "o" | "yes" | "y" | "true" | "vrai" | "1" | "x" => Ok(true),
        "non" | "n" | "no" | "false" | "faux" | "0" => Ok(false),
        _ => Err(DomainError::InvalidFlag {
            field,
            value: raw.trim().to_string(),
        }),
    }
}

/// Parses an integer within `range`. Spreadsheet renderings such as `12.0`
/// are accepted.
///
/// # Errors
///
/// Returns `DomainError::InvalidNumber` when the value is not an integer or
/// falls outside `range`.
pub fn parse_integer(
    field: &'static str,
    value: &str,
    range: std::ops::RangeInclusive<i64>,
    expected: &'static str,
) -> Result<i64, DomainError> {
    let trimmed: &str = value.trim();
    let whole: &str = trimmed
        .strip_suffix(".0")
        .or_else(|| trimmed.strip_suffix(",0"))
        .unwrap_or(trimmed);
    whole
        .parse::<i64>()
        .ok()
        .filter(|number| range.contains(number))
        .ok_or_else(|| DomainError::InvalidNumber {
            field,
            value: trimmed.to_string(),
            expected,
        })
}

/// Parses a `,`/`;` separated list of email addresses. Blank entries are skipped.
///
/// # Errors
///
/// Returns every malformed entry.
pub fn parse_email_list(
    field: &'static str,
    value: Option<&str>,
) -> Result<Vec<Email>, Vec<DomainError>> {
    let Some(raw) = value else {
        return Ok(Vec::new());
    };
    let mut emails: Vec<Email> = Vec::new();
    let mut errors: Vec<DomainError> = Vec::new();
    for entry in raw.split([',', ';']).map(str::trim).filter(|e| !e.is_empty()) {
        match Email::parse(field, entry) {
            Ok(email) => {
                if !emails.contains(&email) {
                    emails.push(email);
                }
            }
            Err(e) => errors.push(e),
        }
    }
    if errors.is_empty() { Ok(emails) } else { Err(errors) }
}

/// Normalizes free text used in natural keys and name-based joins:
/// accents folded, lower-cased, inner whitespace collapsed.
#[must_use]
pub fn normalize_key(value: &str) -> String {
    fold_label(value).split_whitespace().collect::<Vec<_>>().join(" ")
}
