// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use calamine::Data;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, Worksheet};
use seido_import_domain::{ImportStats, Money, ParseResult, SheetKind};
use time::macros::date;

use super::helpers::{minimal_workbook, workbook_bytes};
use crate::{ImportFile, ParseError, cell_text, excel_serial_date, parse, parse_workbook};

#[test]
fn test_rows_are_keyed_by_field_with_spreadsheet_lines() {
    let bytes: Vec<u8> = workbook_bytes(&[
        (
            "Buildings",
            &[
                &["name", "address"],
                &["Alpha", "Rue Haute 1"],
                &["Beta", ""],
            ],
        ),
        (
            "Lots",
            &[
                &["reference", "building_name"],
                &["A1", "Alpha"],
                &["A2", "Alpha"],
                &["A3", "Alpha"],
            ],
        ),
        ("Contacts", &[&["name"]]),
        ("Contracts", &[&["lot_reference"]]),
    ]);

    let parsed: ParseResult = parse_workbook(&bytes).unwrap();

    assert_eq!(parsed.stats(), ImportStats::new(2, 3, 0, 0));
    let lines: Vec<usize> = parsed.buildings.rows.iter().map(|r| r.line).collect();
    assert_eq!(lines, vec![2, 3]);
    assert_eq!(parsed.buildings.rows[0].get("address"), Some("Rue Haute 1"));
    assert_eq!(parsed.buildings.rows[1].get("address"), None);
    assert_eq!(parsed.lots.rows[2].get("reference"), Some("A3"));
    assert_eq!(parsed.buildings.headers, vec!["name", "address"]);
}

#[test]
fn test_localized_sheet_names_and_headers() {
    let bytes: Vec<u8> = workbook_bytes(&[
        ("Immeubles", &[&["Nom *", "Adresse *", "Code postal"], &["Alpha", "Rue 1", "1000"]]),
        ("Lots", &[&["Référence", "Nom immeuble"]]),
        ("Contacts", &[&["Prénom", "Nom", "E-mail"], &["Jean", "Dupont", "jean@x.be"]]),
        ("Contrats", &[&["Référence lot"]]),
    ]);

    let parsed: ParseResult = parse_workbook(&bytes).unwrap();

    assert_eq!(parsed.buildings.rows[0].get("postal_code"), Some("1000"));
    assert_eq!(parsed.contacts.rows[0].get("first_name"), Some("Jean"));
    assert_eq!(parsed.contacts.rows[0].get("last_name"), Some("Dupont"));
    assert_eq!(parsed.contacts.rows[0].get("email"), Some("jean@x.be"));
}

#[test]
fn test_missing_sheets_are_all_reported() {
    let bytes: Vec<u8> = workbook_bytes(&[
        ("Buildings", &[&["name"]]),
        ("Contacts", &[&["name"]]),
        ("Notes", &[&["whatever"]]),
    ]);

    let err: ParseError = parse_workbook(&bytes).unwrap_err();
    match err {
        ParseError::MissingSheets(missing) => {
            assert_eq!(missing, vec![SheetKind::Lots, SheetKind::Contracts]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_sheet_message_names_sheet() {
    let err: ParseError = ParseError::MissingSheets(vec![SheetKind::Contracts]);
    assert_eq!(err.to_string(), "Workbook is missing required sheets: Contracts");
}

#[test]
fn test_corrupt_workbook_is_rejected() {
    let file: ImportFile =
        ImportFile::new("broken.xlsx", b"definitely not a zip".to_vec()).unwrap();
    let err: ParseError = parse(&file).unwrap_err();
    assert!(matches!(err, ParseError::Workbook(_)));
}

#[test]
fn test_blank_rows_are_skipped_but_lines_kept() {
    let bytes: Vec<u8> = minimal_workbook(&[
        &["name", "address"],
        &["Alpha", "Rue 1"],
        &["", ""],
        &["Gamma", "Rue 3"],
    ]);

    let parsed: ParseResult = parse_workbook(&bytes).unwrap();

    let lines: Vec<usize> = parsed.buildings.rows.iter().map(|r| r.line).collect();
    assert_eq!(lines, vec![2, 4]);
}

#[test]
fn test_unmapped_columns_are_ignored() {
    let bytes: Vec<u8> = minimal_workbook(&[
        &["name", "Commentaire interne", "address"],
        &["Alpha", "à ignorer", "Rue 1"],
    ]);

    let parsed: ParseResult = parse_workbook(&bytes).unwrap();

    let fields: Vec<(&str, &str)> = parsed.buildings.rows[0].iter().collect();
    assert_eq!(fields, vec![("address", "Rue 1"), ("name", "Alpha")]);
}

#[test]
fn test_empty_sheet_yields_no_rows() {
    let bytes: Vec<u8> = minimal_workbook(&[]);
    let parsed: ParseResult = parse_workbook(&bytes).unwrap();
    assert!(parsed.buildings.is_empty());
    assert!(parsed.buildings.headers.is_empty());
}

#[test]
fn test_typed_cells_render_as_text() {
    let mut workbook: Workbook = Workbook::new();
    for sheet in SheetKind::ALL {
        let worksheet: &mut Worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet.as_str()).unwrap();
        if sheet == SheetKind::Contracts {
            let date_format: Format = Format::new().set_num_format("yyyy-mm-dd");
            worksheet.write_string(0, 0, "lot_reference").unwrap();
            worksheet.write_string(0, 1, "start_date").unwrap();
            worksheet.write_string(0, 2, "duration_months").unwrap();
            worksheet.write_string(0, 3, "rent").unwrap();
            worksheet.write_string(1, 0, "A1").unwrap();
            let start: ExcelDateTime = ExcelDateTime::from_ymd(2025, 1, 1).unwrap();
            worksheet
                .write_datetime_with_format(1, 1, &start, &date_format)
                .unwrap();
            worksheet.write_number(1, 2, 12.0).unwrap();
            worksheet.write_number(1, 3, 850.5).unwrap();
        }
    }
    let bytes: Vec<u8> = workbook.save_to_buffer().unwrap();

    let parsed: ParseResult = parse_workbook(&bytes).unwrap();
    let row = &parsed.contracts.rows[0];

    assert_eq!(row.get("start_date"), Some("2025-01-01"));
    assert_eq!(row.get("duration_months"), Some("12"));
    assert_eq!(row.get("rent"), Some("850.5"));
}

#[test]
fn test_numeric_cells_keep_their_decimal_value() {
    assert_eq!(cell_text(&Data::Float(850.5)), "850.5");
    assert_eq!(cell_text(&Data::Float(850.25)), "850.25");
    assert_eq!(cell_text(&Data::Float(1234.567)), "1234.5670");
    assert_eq!(cell_text(&Data::Float(0.1)), "0.1");

    let rent: Money = Money::parse("rent", &cell_text(&Data::Float(1234.567))).unwrap();
    assert_eq!(rent.cents(), 123_457);
    let charges: Money = Money::parse("charges", &cell_text(&Data::Float(75.125))).unwrap();
    assert_eq!(charges.cents(), 7_513);
}

#[test]
fn test_excel_serial_dates() {
    assert_eq!(excel_serial_date(45_658.0), Some(date!(2025 - 01 - 01)));
    assert_eq!(excel_serial_date(45_658.75), Some(date!(2025 - 01 - 01)));
    assert_eq!(excel_serial_date(0.5), None);
    assert_eq!(excel_serial_date(f64::NAN), None);
}
