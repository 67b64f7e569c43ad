// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::{Router, body::Body, http::StatusCode};

use crate::{ErrorResponse, build_router};

use super::helpers::{create_session, create_test_app_state, send, send_json, upload};

#[tokio::test]
async fn test_create_session_returns_upload_snapshot() {
    let app: Router = build_router(create_test_app_state());

    let (status, snapshot): (StatusCode, serde_json::Value) =
        send_json(&app, "POST", "/api/import/sessions").await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(snapshot["state"]["step"], "upload");
    assert_eq!(snapshot["can_proceed"], false);
    assert_eq!(snapshot["mode"], "transactional");
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let app: Router = build_router(create_test_app_state());

    let (status, body): (StatusCode, ErrorResponse) =
        send_json(&app, "GET", "/api/import/sessions/import_missing").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.error);
    assert!(body.message.contains("import_missing"));
}

#[tokio::test]
async fn test_delete_session() {
    let app: Router = build_router(create_test_app_state());
    let id: String = create_session(&app).await;

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/import/sessions/{id}"),
        Body::empty(),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/import/sessions/{id}"),
        Body::empty(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_with_unsupported_extension_is_bad_request() {
    let app: Router = build_router(create_test_app_state());
    let id: String = create_session(&app).await;

    let (status, body) = upload(&app, &id, "import.pdf", b"%PDF-1.7".to_vec()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorResponse = serde_json::from_slice(&body).unwrap();
    assert!(error.message.contains("import.pdf"));
}

#[tokio::test]
async fn test_upload_without_name_is_bad_request() {
    let app: Router = build_router(create_test_app_state());
    let id: String = create_session(&app).await;

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/import/sessions/{id}/file"),
        Body::from("nom,adresse\n"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_execute_in_upload_step_is_conflict() {
    let app: Router = build_router(create_test_app_state());
    let id: String = create_session(&app).await;

    let (status, body): (StatusCode, ErrorResponse) =
        send_json(&app, "POST", &format!("/api/import/sessions/{id}/execute")).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        body.message,
        "Cannot execute the import while in the upload step"
    );
}

#[tokio::test]
async fn test_preview_before_parse_is_conflict() {
    let app: Router = build_router(create_test_app_state());
    let id: String = create_session(&app).await;

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/import/sessions/{id}/preview"),
        Body::empty(),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_back_from_upload_does_not_move() {
    let app: Router = build_router(create_test_app_state());
    let id: String = create_session(&app).await;

    let (status, body): (StatusCode, serde_json::Value) =
        send_json(&app, "POST", &format!("/api/import/sessions/{id}/back")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["moved"], false);
    assert_eq!(body["session"]["state"]["step"], "upload");
}

#[tokio::test]
async fn test_template_download() {
    let app: Router = build_router(create_test_app_state());

    let response = tower::ServiceExt::oneshot(
        app,
        axum::http::Request::builder()
            .uri("/api/import/template?type=blank")
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert!(
        response.headers()["content-disposition"]
            .to_str()
            .unwrap()
            .contains(".xlsx")
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(bytes.starts_with(b"PK"));
}

#[tokio::test]
async fn test_unknown_template_type_is_bad_request() {
    let app: Router = build_router(create_test_app_state());

    let (status, _) = send(
        &app,
        "GET",
        "/api/import/template?type=partial",
        Body::empty(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_runs_starts_empty() {
    let app: Router = build_router(create_test_app_state());

    let (status, body): (StatusCode, serde_json::Value) =
        send_json(&app, "GET", "/api/import/runs").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["runs"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_list_runs_rejects_zero_limit() {
    let app: Router = build_router(create_test_app_state());

    let (status, _) = send(&app, "GET", "/api/import/runs?limit=0", Body::empty()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
