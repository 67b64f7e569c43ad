// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod columns;
mod error;
mod keys;
mod parsed;
mod records;
mod sheet;
mod stats;
mod validation_error;
mod values;

#[cfg(test)]
mod tests;

pub use columns::{Column, columns, fields, fold_label, map_header, normalize_header};
pub use error::DomainError;
pub use keys::NaturalKey;
pub use parsed::{ParseResult, ParsedSheet, RawRecord};
pub use records::{
    BuildingRecord, CompanyRecord, ContactRecord, ContractRecord, ImportRecord, LotRecord,
    MAX_DURATION_MONTHS,
};
pub use sheet::{EntityKind, SheetKind};
pub use stats::ImportStats;
pub use validation_error::ValidationError;
pub use values::{
    ContactRole, Email, LotCategory, Money, PaymentFrequency, add_months, normalize_key,
    parse_date,
};
