// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use rust_xlsxwriter::{Workbook, Worksheet};
use seido_import::ImportMode;
use seido_import_persistence::Persistence;

use crate::{SessionRegistry, SessionSnapshot, SetFileRequest, create_session, set_file};

/// Writes a workbook whose sheets hold the given string cells.
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

/// A four-sheet workbook whose contract names the given lot reference.
pub fn workbook_with_contract_lot(lot_reference: &str) -> Vec<u8> {
    workbook_bytes(&[
        (
            "Immeubles",
            &[
                &["Nom *", "Adresse *", "Code postal", "Ville"],
                &["Résidence Les Lilas", "Rue de la Loi 16", "1000", "Bruxelles"],
            ],
        ),
        (
            "Lots",
            &[
                &["Référence *", "Immeuble", "Catégorie"],
                &["A1", "Résidence Les Lilas", "appartement"],
                &["B2", "Résidence Les Lilas", "garage"],
            ],
        ),
        (
            "Contacts",
            &[
                &["Nom complet", "Email", "Rôle", "Société"],
                &["Jean Dupont", "jean.dupont@example.be", "locataire", "Immo Lilas SPRL"],
                &["Marie Martin", "", "proprietaire", ""],
            ],
        ),
        (
            "Contrats",
            &[
                &["Référence lot", "Date de début", "Durée (mois)", "Loyer", "Locataires"],
                &[lot_reference, "2025-01-01", "12", "850", "jean.dupont@example.be"],
            ],
        ),
    ])
}

/// A complete, valid workbook.
pub fn valid_workbook() -> Vec<u8> {
    workbook_with_contract_lot("A1")
}

/// A workbook whose only contract points at a lot that does not exist.
pub fn workbook_with_unknown_lot() -> Vec<u8> {
    workbook_with_contract_lot("Z9")
}

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory persistence")
}

pub fn create_test_registry() -> SessionRegistry {
    SessionRegistry::new(ImportMode::Transactional)
}

/// Opens a session and hands it `bytes` as `name`.
pub fn session_with_file(sessions: &mut SessionRegistry, name: &str, bytes: Vec<u8>) -> String {
    let id: String = create_session(sessions).session_id;
    let snapshot: SessionSnapshot = set_file(
        sessions,
        &id,
        SetFileRequest {
            name: String::from(name),
            bytes,
        },
    )
    .unwrap();
    assert!(snapshot.state.file.is_some());
    id
}
