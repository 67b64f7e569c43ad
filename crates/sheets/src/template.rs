// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rust_xlsxwriter::{Format, Workbook, Worksheet};
use seido_import_domain::{SheetKind, columns, fields};
use serde::{Deserialize, Serialize};

use crate::error::TemplateError;

/// File name offered for template downloads.
pub const TEMPLATE_FILE_NAME: &str = "seido-import-template.xlsx";

/// Which template workbook to generate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    /// Headers plus one example row per sheet.
    #[default]
    Full,
    /// Headers only.
    Blank,
}

fn example_value(sheet: SheetKind, field: &str) -> Option<&'static str> {
    let value: &'static str = match (sheet, field) {
        (SheetKind::Buildings, fields::NAME)
        | (SheetKind::Lots | SheetKind::Contracts, fields::BUILDING_NAME) => "Résidence Les Lilas",
        (SheetKind::Buildings, fields::ADDRESS) => "Rue de la Loi 16",
        (SheetKind::Buildings, fields::POSTAL_CODE) => "1000",
        (SheetKind::Buildings, fields::CITY) => "Bruxelles",
        (SheetKind::Buildings, fields::COUNTRY) => "Belgique",
        (SheetKind::Lots, fields::REFERENCE) | (SheetKind::Contracts, fields::LOT_REFERENCE) => {
            "A1"
        }
        (SheetKind::Lots, fields::INDEPENDENT) => "non",
        (SheetKind::Lots, fields::CATEGORY) => "appartement",
        (SheetKind::Lots, fields::FLOOR) => "1",
        (SheetKind::Lots, fields::DOOR_NUMBER) => "1A",
        (SheetKind::Contacts, fields::FIRST_NAME) => "Jean",
        (SheetKind::Contacts, fields::LAST_NAME) => "Dupont",
        (SheetKind::Contacts, fields::EMAIL) | (SheetKind::Contracts, fields::TENANT_EMAILS) => {
            "jean.dupont@example.be"
        }
        (SheetKind::Contacts, fields::PHONE) => "+32 470 12 34 56",
        (SheetKind::Contacts, fields::ROLE) => "locataire",
        (SheetKind::Contracts, fields::TITLE) => "Bail A1",
        (SheetKind::Contracts, fields::START_DATE) => "2025-01-01",
        (SheetKind::Contracts, fields::DURATION_MONTHS) => "12",
        (SheetKind::Contracts, fields::RENT) => "850",
        (SheetKind::Contracts, fields::CHARGES) => "75",
        (SheetKind::Contracts, fields::DEPOSIT) => "1700",
        (SheetKind::Contracts, fields::PAYMENT_FREQUENCY) => "mensuel",
        _ => return None,
    };
    Some(value)
}

/// Generates the import template as `.xlsx` bytes.
///
/// # Errors
///
/// Returns `TemplateError::Xlsx` if the workbook writer fails.
pub fn build_template(kind: TemplateKind) -> Result<Vec<u8>, TemplateError> {
    let mut workbook: Workbook = Workbook::new();
    let header_format: Format = Format::new().set_bold();

    for sheet in SheetKind::ALL {
        let worksheet: &mut Worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet.template_name())?;

        for (col, column) in (0u16..).zip(columns(sheet)) {
            worksheet.write_string_with_format(0, col, column.header_label(), &header_format)?;
            worksheet.set_column_width(col, 22)?;
            if kind == TemplateKind::Full
                && let Some(value) = example_value(sheet, column.key)
            {
                worksheet.write_string(1, col, value)?;
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}
