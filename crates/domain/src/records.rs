// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Strongly typed records built from raw rows.
//!
//! Each `from_raw` constructor reports every field problem of the row at
//! once instead of stopping at the first one.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::columns::fields;
use crate::error::DomainError;
use crate::keys::NaturalKey;
use crate::parsed::RawRecord;
use crate::sheet::{EntityKind, SheetKind};
use crate::values::{
    ContactRole, Email, LotCategory, Money, PaymentFrequency, add_months, parse_date,
    parse_email_list, parse_flag, parse_integer,
};

/// Longest lease accepted, in months.
pub const MAX_DURATION_MONTHS: u16 = 120;

/// Collects field errors while reading one row.
struct RowReader<'a> {
    raw: &'a RawRecord,
    errors: Vec<DomainError>,
}

impl<'a> RowReader<'a> {
    const fn new(raw: &'a RawRecord) -> Self {
        Self {
            raw,
            errors: Vec::new(),
        }
    }

    fn optional(&self, field: &str) -> Option<String> {
        self.raw.get(field).map(str::to_string)
    }

    fn required(&mut self, field: &'static str) -> Option<String> {
        let value: Option<String> = self.optional(field);
        if value.is_none() {
            self.errors.push(DomainError::MissingField { field });
        }
        value
    }

    fn check<T>(&mut self, result: Result<T, DomainError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.errors.push(e);
                None
            }
        }
    }

    fn check_all<T>(&mut self, result: Result<T, Vec<DomainError>>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(mut errors) => {
                self.errors.append(&mut errors);
                None
            }
        }
    }

    const fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    fn into_errors(self) -> Vec<DomainError> {
        self.errors
    }
}

/// A building row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingRecord {
    pub line: usize,
    pub name: String,
    pub address: String,
    pub postal_code: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub description: Option<String>,
}

impl BuildingRecord {
    /// Reads a building from a raw row.
    ///
    /// # Errors
    ///
    /// Returns every field problem found; `name` and `address` are required.
    pub fn from_raw(raw: &RawRecord) -> Result<Self, Vec<DomainError>> {
        let mut reader: RowReader<'_> = RowReader::new(raw);
        let name: Option<String> = reader.required(fields::NAME);
        let address: Option<String> = reader.required(fields::ADDRESS);

        match (name, address) {
            (Some(name), Some(address)) if reader.is_clean() => Ok(Self {
                line: raw.line,
                name,
                address,
                postal_code: reader.optional(fields::POSTAL_CODE),
                city: reader.optional(fields::CITY),
                country: reader.optional(fields::COUNTRY),
                description: reader.optional(fields::DESCRIPTION),
            }),
            _ => Err(reader.into_errors()),
        }
    }

    #[must_use]
    pub fn natural_key(&self) -> NaturalKey {
        NaturalKey::building(&self.name)
    }
}

/// A lot row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotRecord {
    pub line: usize,
    pub reference: String,
    /// The building this lot belongs to, by name. `None` for independent lots.
    pub building_name: Option<String>,
    pub independent: bool,
    pub category: LotCategory,
    pub floor: Option<i32>,
    pub door_number: Option<String>,
    pub description: Option<String>,
}

fn parse_floor(value: &str) -> Result<i32, DomainError> {
    let folded: String = crate::columns::fold_label(value).replace('-', " ");
    if matches!(
        folded.as_str(),
        "rdc" | "rez" | "rez de chaussee" | "gelijkvloers" | "ground"
    ) {
        return Ok(0);
    }
    parse_integer(fields::FLOOR, value, -5..=200, "an integer between -5 and 200")
        .map(|floor| i32::try_from(floor).unwrap_or_default())
}

impl LotRecord {
    /// Reads a lot from a raw row.
    ///
    /// # Errors
    ///
    /// Returns every field problem found. A lot must either name its
    /// building or be flagged independent, never both.
    pub fn from_raw(raw: &RawRecord) -> Result<Self, Vec<DomainError>> {
        let mut reader: RowReader<'_> = RowReader::new(raw);
        let reference: Option<String> = reader.required(fields::REFERENCE);
        let building_name: Option<String> = reader.optional(fields::BUILDING_NAME);
        let independent: Option<bool> =
            reader.check(parse_flag(fields::INDEPENDENT, raw.get(fields::INDEPENDENT)));
        let category: Option<LotCategory> =
            reader.check(LotCategory::parse(raw.get(fields::CATEGORY)));
        let floor: Option<Option<i32>> = match raw.get(fields::FLOOR) {
            Some(value) => reader.check(parse_floor(value)).map(Some),
            None => Some(None),
        };

        match (independent, building_name.is_some()) {
            (Some(true), true) => reader.errors.push(DomainError::ConflictingFields {
                field: fields::INDEPENDENT,
                other: fields::BUILDING_NAME,
                reason: "an independent lot cannot belong to a building",
            }),
            (Some(false), false) => reader.errors.push(DomainError::RequiredUnless {
                field: fields::BUILDING_NAME,
                unless: "the lot is flagged independent",
            }),
            _ => {}
        }

        match (reference, independent, category, floor) {
            (Some(reference), Some(independent), Some(category), Some(floor))
                if reader.is_clean() =>
            {
                Ok(Self {
                    line: raw.line,
                    reference,
                    building_name,
                    independent,
                    category,
                    floor,
                    door_number: reader.optional(fields::DOOR_NUMBER),
                    description: reader.optional(fields::DESCRIPTION),
                })
            }
            _ => Err(reader.into_errors()),
        }
    }

    #[must_use]
    pub fn natural_key(&self) -> NaturalKey {
        NaturalKey::lot(&self.reference, self.building_name.as_deref())
    }

    /// The natural key of the owning building, if any.
    #[must_use]
    pub fn building_key(&self) -> Option<NaturalKey> {
        self.building_name.as_deref().map(NaturalKey::building)
    }
}

/// A contact row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub line: usize,
    /// Full display name, either given directly or built from first and last names.
    pub name: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<Email>,
    pub phone: Option<String>,
    pub role: ContactRole,
    pub company_name: Option<String>,
    pub vat_number: Option<String>,
    pub speciality: Option<String>,
    pub notes: Option<String>,
}

impl ContactRecord {
    /// Reads a contact from a raw row.
    ///
    /// # Errors
    ///
    /// Returns every field problem found. A name is required, either as a
    /// full name or as first and/or last name.
    pub fn from_raw(raw: &RawRecord) -> Result<Self, Vec<DomainError>> {
        let mut reader: RowReader<'_> = RowReader::new(raw);
        let first_name: Option<String> = reader.optional(fields::FIRST_NAME);
        let last_name: Option<String> = reader.optional(fields::LAST_NAME);
        let name: Option<String> = reader.optional(fields::NAME).or_else(|| {
            let joined: String = [first_name.as_deref(), last_name.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" ");
            (!joined.is_empty()).then_some(joined)
        });
        if name.is_none() {
            reader
                .errors
                .push(DomainError::MissingField { field: fields::NAME });
        }
        let email: Option<Option<Email>> = match raw.get(fields::EMAIL) {
            Some(value) => reader.check(Email::parse(fields::EMAIL, value)).map(Some),
            None => Some(None),
        };
        let role: Option<ContactRole> = reader.check(ContactRole::parse(raw.get(fields::ROLE)));

        match (name, email, role) {
            (Some(name), Some(email), Some(role)) if reader.is_clean() => Ok(Self {
                line: raw.line,
                name,
                first_name,
                last_name,
                email,
                phone: reader.optional(fields::PHONE),
                role,
                company_name: reader.optional(fields::COMPANY_NAME),
                vat_number: reader.optional(fields::VAT_NUMBER),
                speciality: reader.optional(fields::SPECIALITY),
                notes: reader.optional(fields::NOTES),
            }),
            _ => Err(reader.into_errors()),
        }
    }

    #[must_use]
    pub fn natural_key(&self) -> NaturalKey {
        NaturalKey::contact(self.email.as_ref(), &self.name, self.phone.as_deref())
    }

    /// The natural key of the company this contact works for, if any.
    #[must_use]
    pub fn company_key(&self) -> Option<NaturalKey> {
        self.company_name.as_deref().map(NaturalKey::company)
    }
}

/// A company derived from the `company_name` column of the Contacts sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRecord {
    /// The Contacts line the company was first seen on.
    pub line: usize,
    pub name: String,
    pub vat_number: Option<String>,
}

impl CompanyRecord {
    /// Derives the company a contact belongs to, if it names one.
    #[must_use]
    pub fn from_contact(contact: &ContactRecord) -> Option<Self> {
        contact.company_name.as_ref().map(|name| Self {
            line: contact.line,
            name: name.clone(),
            vat_number: contact.vat_number.clone(),
        })
    }

    #[must_use]
    pub fn natural_key(&self) -> NaturalKey {
        NaturalKey::company(&self.name)
    }
}

/// A contract (lease) row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractRecord {
    pub line: usize,
    pub title: String,
    pub lot_reference: String,
    /// Disambiguates the lot when several buildings use the same reference.
    pub building_name: Option<String>,
    pub start_date: Date,
    pub duration_months: u16,
    pub rent: Money,
    pub charges: Money,
    pub deposit: Option<Money>,
    pub payment_frequency: PaymentFrequency,
    pub tenant_emails: Vec<Email>,
    pub guarantor_emails: Vec<Email>,
}

impl ContractRecord {
    /// Reads a contract from a raw row.
    ///
    /// # Errors
    ///
    /// Returns every field problem found. `lot_reference`, `start_date`,
    /// `duration_months` and `rent` are required.
    pub fn from_raw(raw: &RawRecord) -> Result<Self, Vec<DomainError>> {
        let mut reader: RowReader<'_> = RowReader::new(raw);
        let lot_reference: Option<String> = reader.required(fields::LOT_REFERENCE);
        let start_date: Option<Date> = reader
            .required(fields::START_DATE)
            .and_then(|value| reader.check(parse_date(fields::START_DATE, &value)));
        let duration_months: Option<u16> = reader
            .required(fields::DURATION_MONTHS)
            .and_then(|value| {
                reader.check(parse_integer(
                    fields::DURATION_MONTHS,
                    &value,
                    1..=i64::from(MAX_DURATION_MONTHS),
                    "a number of months between 1 and 120",
                ))
            })
            .and_then(|months| u16::try_from(months).ok());
        let rent: Option<Money> = reader
            .required(fields::RENT)
            .and_then(|value| reader.check(Money::parse(fields::RENT, &value)));
        let charges: Option<Money> = match raw.get(fields::CHARGES) {
            Some(value) => reader.check(Money::parse(fields::CHARGES, value)),
            None => Some(Money::ZERO),
        };
        let deposit: Option<Option<Money>> = match raw.get(fields::DEPOSIT) {
            Some(value) => reader.check(Money::parse(fields::DEPOSIT, value)).map(Some),
            None => Some(None),
        };
        let payment_frequency: Option<PaymentFrequency> =
            reader.check(PaymentFrequency::parse(raw.get(fields::PAYMENT_FREQUENCY)));
        let tenant_emails: Option<Vec<Email>> = reader.check_all(parse_email_list(
            fields::TENANT_EMAILS,
            raw.get(fields::TENANT_EMAILS),
        ));
        let guarantor_emails: Option<Vec<Email>> = reader.check_all(parse_email_list(
            fields::GUARANTOR_EMAILS,
            raw.get(fields::GUARANTOR_EMAILS),
        ));

        match (
            lot_reference,
            start_date,
            duration_months,
            rent,
            charges,
            deposit,
            payment_frequency,
            tenant_emails,
            guarantor_emails,
        ) {
            (
                Some(lot_reference),
                Some(start_date),
                Some(duration_months),
                Some(rent),
                Some(charges),
                Some(deposit),
                Some(payment_frequency),
                Some(tenant_emails),
                Some(guarantor_emails),
            ) if reader.is_clean() => Ok(Self {
                line: raw.line,
                title: reader
                    .optional(fields::TITLE)
                    .unwrap_or_else(|| format!("Bail {lot_reference} ({start_date})")),
                building_name: reader.optional(fields::BUILDING_NAME),
                lot_reference,
                start_date,
                duration_months,
                rent,
                charges,
                deposit,
                payment_frequency,
                tenant_emails,
                guarantor_emails,
            }),
            _ => Err(reader.into_errors()),
        }
    }

    /// The natural key of the leased lot.
    ///
    /// Only unambiguous once `building_name` has been filled in by reference
    /// resolution for lots that belong to a building.
    #[must_use]
    pub fn lot_key(&self) -> NaturalKey {
        NaturalKey::lot(&self.lot_reference, self.building_name.as_deref())
    }

    #[must_use]
    pub fn natural_key(&self) -> NaturalKey {
        NaturalKey::contract(&self.lot_key(), self.start_date)
    }

    /// The last day covered by the lease.
    #[must_use]
    pub fn end_date(&self) -> Date {
        let after: Date = add_months(self.start_date, self.duration_months);
        after.previous_day().unwrap_or(after)
    }
}

/// A typed row of any import phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "entity", rename_all = "snake_case")]
pub enum ImportRecord {
    Company(CompanyRecord),
    Contact(ContactRecord),
    Building(BuildingRecord),
    Lot(LotRecord),
    Contract(ContractRecord),
}

impl ImportRecord {
    #[must_use]
    pub const fn entity(&self) -> EntityKind {
        match self {
            Self::Company(_) => EntityKind::Company,
            Self::Contact(_) => EntityKind::Contact,
            Self::Building(_) => EntityKind::Building,
            Self::Lot(_) => EntityKind::Lot,
            Self::Contract(_) => EntityKind::Contract,
        }
    }

    /// The sheet the record was read from.
    #[must_use]
    pub const fn sheet(&self) -> SheetKind {
        self.entity().sheet()
    }

    /// The 1-based spreadsheet line the record was read from.
    #[must_use]
    pub const fn line(&self) -> usize {
        match self {
            Self::Company(r) => r.line,
            Self::Contact(r) => r.line,
            Self::Building(r) => r.line,
            Self::Lot(r) => r.line,
            Self::Contract(r) => r.line,
        }
    }
}
