// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rust_xlsxwriter::{Workbook, Worksheet};

/// Writes a workbook whose sheets hold the given rows of text cells.
pub fn workbook_bytes(sheets: &[(&str, &[&[&str]])]) -> Vec<u8> {
    let mut workbook: Workbook = Workbook::new();
    for (name, rows) in sheets {
        let worksheet: &mut Worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).unwrap();
        for (row, cells) in (0u32..).zip(rows.iter()) {
            for (col, cell) in (0u16..).zip(cells.iter()) {
                if !cell.is_empty() {
                    worksheet.write_string(row, col, *cell).unwrap();
                }
            }
        }
    }
    workbook.save_to_buffer().unwrap()
}

/// A four-sheet workbook with headers only on every sheet but Buildings.
pub fn minimal_workbook(buildings: &[&[&str]]) -> Vec<u8> {
    workbook_bytes(&[
        ("Buildings", buildings),
        ("Lots", &[&["reference", "building_name"]]),
        ("Contacts", &[&["name", "email"]]),
        ("Contracts", &[&["lot_reference", "start_date"]]),
    ])
}
