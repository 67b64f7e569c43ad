// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use rust_xlsxwriter::{Workbook, Worksheet};
use seido_import::ImportMode;
use seido_import_persistence::Persistence;
use serde::de::DeserializeOwned;
use tower::ServiceExt;

use crate::AppState;

/// Helper to create test app state with in-memory persistence.
pub fn create_test_app_state() -> AppState {
    let persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    AppState::new(persistence, ImportMode::Transactional)
}

/// Sends one request and returns its status and raw body.
pub async fn send(app: &Router, method: &str, uri: &str, body: Body) -> (StatusCode, Vec<u8>) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(body)
                .unwrap(),
        )
        .await
        .unwrap();
    let status: StatusCode = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

/// Sends a bodiless request and decodes the JSON response.
pub async fn send_json<T: DeserializeOwned>(
    app: &Router,
    method: &str,
    uri: &str,
) -> (StatusCode, T) {
    let (status, body): (StatusCode, Vec<u8>) = send(app, method, uri, Body::empty()).await;
    (status, serde_json::from_slice(&body).unwrap())
}

/// Sends a JSON body and decodes the JSON response.
pub async fn send_json_body<T: DeserializeOwned>(
    app: &Router,
    method: &str,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, T) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status: StatusCode = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

/// A four-sheet workbook whose contract names the given lot reference.
pub fn workbook_with_contract_lot(lot_reference: &str) -> Vec<u8> {
    let sheets: [(&str, &[&[&str]]); 4] = [
        (
            "Immeubles",
            &[
                &["Nom *", "Adresse *", "Ville"],
                &["Résidence Les Lilas", "Rue de la Loi 16", "Bruxelles"],
            ],
        ),
        (
            "Lots",
            &[&["Référence *", "Immeuble"], &["A1", "Résidence Les Lilas"]],
        ),
        (
            "Contacts",
            &[
                &["Nom complet", "Email"],
                &["Jean Dupont", "jean.dupont@example.be"],
            ],
        ),
        (
            "Contrats",
            &[
                &["Référence lot", "Date de début", "Durée (mois)", "Loyer", "Locataires"],
                &[lot_reference, "2025-01-01", "12", "850", "jean.dupont@example.be"],
            ],
        ),
    ];

    let mut workbook: Workbook = Workbook::new();
    for (name, rows) in sheets {
        let worksheet: &mut Worksheet = workbook.add_worksheet();
        worksheet.set_name(name).unwrap();
        for (row, cells) in (0u32..).zip(rows.iter()) {
            for (col, cell) in (0u16..).zip(cells.iter()) {
                worksheet.write_string(row, col, *cell).unwrap();
            }
        }
    }
    workbook.save_to_buffer().unwrap()
}

/// Creates a session and returns its id.
pub async fn create_session(app: &Router) -> String {
    let (status, snapshot): (StatusCode, serde_json::Value) =
        send_json(app, "POST", "/api/import/sessions").await;
    assert_eq!(status, StatusCode::CREATED);
    snapshot["session_id"].as_str().unwrap().to_string()
}

/// Uploads `bytes` as `name` to session `id`.
pub async fn upload(app: &Router, id: &str, name: &str, bytes: Vec<u8>) -> (StatusCode, Vec<u8>) {
    send(
        app,
        "POST",
        &format!("/api/import/sessions/{id}/file?name={name}"),
        Body::from(bytes),
    )
    .await
}
