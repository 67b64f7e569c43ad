// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::{Router, http::StatusCode};
use tokio::sync::broadcast;

use crate::{AppState, ErrorResponse, build_router, live::LiveEvent};

use super::helpers::{
    create_session, create_test_app_state, send_json, send_json_body, upload,
    workbook_with_contract_lot,
};

/// Uploads and parses a workbook, returning the session id.
async fn parsed_session(app: &Router, lot_reference: &str) -> String {
    let id: String = create_session(app).await;
    let bytes: Vec<u8> = workbook_with_contract_lot(lot_reference);
    let (status, _) = upload(app, &id, "import.xlsx", bytes).await;
    assert_eq!(status, StatusCode::OK);
    let (status, snapshot): (StatusCode, serde_json::Value) =
        send_json(app, "POST", &format!("/api/import/sessions/{id}/parse")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["state"]["step"], "preview");
    id
}

#[tokio::test]
async fn test_full_import_flow() {
    let app_state: AppState = create_test_app_state();
    let app: Router = build_router(app_state.clone());
    let mut events: broadcast::Receiver<LiveEvent> = app_state.live.subscribe();

    let id: String = parsed_session(&app, "A1").await;

    let (status, preview): (StatusCode, serde_json::Value) =
        send_json(&app, "GET", &format!("/api/import/sessions/{id}/preview")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(preview["error_count"], 0);
    assert_eq!(preview["sheets"].as_array().unwrap().len(), 4);
    assert_eq!(preview["stats"]["total"], 4);

    let (status, snapshot): (StatusCode, serde_json::Value) =
        send_json(&app, "POST", &format!("/api/import/sessions/{id}/confirm")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["state"]["step"], "confirm");

    let (status, executed): (StatusCode, serde_json::Value) =
        send_json(&app, "POST", &format!("/api/import/sessions/{id}/execute")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(executed["result"]["success"], true);
    assert_eq!(executed["result"]["summary"]["lots"]["created"], 1);
    assert_eq!(executed["session"]["state"]["step"], "result");
    assert_eq!(executed["session"]["progress"]["total_progress"], 100);

    let (status, runs): (StatusCode, serde_json::Value) =
        send_json(&app, "GET", "/api/import/runs").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(runs["runs"][0]["file_name"], "import.xlsx");
    assert_eq!(runs["runs"][0]["run_id"], executed["run_id"]);

    let mut received: Vec<LiveEvent> = Vec::new();
    while let Ok(event) = events.try_recv() {
        received.push(event);
    }
    assert!(matches!(received.first(), Some(LiveEvent::ImportStarted { .. })));
    assert!(matches!(
        received.last(),
        Some(LiveEvent::ImportFinished { success: true, .. })
    ));
    let phases: usize = received
        .iter()
        .filter(|event| matches!(event, LiveEvent::Progress { .. }))
        .count();
    assert_eq!(phases, 6);
}

#[tokio::test]
async fn test_confirm_with_validation_errors_is_conflict() {
    let app: Router = build_router(create_test_app_state());
    let id: String = parsed_session(&app, "Z9").await;

    let (status, _): (StatusCode, ErrorResponse) =
        send_json(&app, "POST", &format!("/api/import/sessions/{id}/confirm")).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, preview): (StatusCode, serde_json::Value) =
        send_json(&app, "GET", &format!("/api/import/sessions/{id}/preview")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(preview["error_count"], 1);
    assert_eq!(preview["sheets"][3]["invalid_count"], 1);
}

#[tokio::test]
async fn test_invitations_after_import() {
    let app: Router = build_router(create_test_app_state());
    let id: String = parsed_session(&app, "A1").await;
    for action in ["confirm", "execute"] {
        let uri: String = format!("/api/import/sessions/{id}/{action}");
        send_json::<serde_json::Value>(&app, "POST", &uri).await;
    }

    let (status, snapshot): (StatusCode, serde_json::Value) =
        send_json(&app, "POST", &format!("/api/import/sessions/{id}/invitations")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["state"]["step"], "invite");

    let (status, snapshot): (StatusCode, serde_json::Value) = send_json_body(
        &app,
        "PUT",
        &format!("/api/import/sessions/{id}/invitations"),
        &serde_json::json!({ "contacts": [] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        snapshot["state"]["import_result"]["created_contacts"]
            .as_array()
            .unwrap()
            .len(),
        0
    );
}

#[tokio::test]
async fn test_set_created_contacts_outside_result_is_conflict() {
    let app: Router = build_router(create_test_app_state());
    let id: String = create_session(&app).await;

    let (status, _): (StatusCode, ErrorResponse) = send_json_body(
        &app,
        "PUT",
        &format!("/api/import/sessions/{id}/invitations"),
        &serde_json::json!({ "contacts": [] }),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_reset_returns_to_upload() {
    let app: Router = build_router(create_test_app_state());
    let id: String = parsed_session(&app, "A1").await;

    let (status, snapshot): (StatusCode, serde_json::Value) =
        send_json(&app, "POST", &format!("/api/import/sessions/{id}/reset")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(snapshot["state"]["step"], "upload");
    assert!(snapshot["state"]["file"].is_null());
}
