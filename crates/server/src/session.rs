// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session extraction for the server.
//!
//! Resolves the `{id}` path segment of a session route and rejects unknown
//! sessions before the handler runs.

use axum::{
    Json,
    extract::{FromRequestParts, Path},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::{AppState, ErrorResponse};

/// Extractor for the id of an existing import session.
///
/// # Usage
///
/// ```ignore
/// async fn my_handler(
///     SessionId(id): SessionId,
/// ) -> Result<Json<SessionSnapshot>, HttpError> {
///     // `id` names a session present in the registry
/// }
/// ```
///
/// # Errors
///
/// Returns HTTP 400 when the path carries no session id and HTTP 404 when
/// the session does not exist.
pub struct SessionId(pub String);

impl FromRequestParts<AppState> for SessionId {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Path(id): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|e| SessionError::InvalidSessionId(e.body_text()))?;

        if !state.sessions.lock().await.contains(&id) {
            debug!(session_id = %id, "Unknown import session");
            return Err(SessionError::UnknownSession(id));
        }
        Ok(Self(id))
    }
}

/// Session extraction errors.
#[derive(Debug)]
pub enum SessionError {
    /// The path segment could not be read.
    InvalidSessionId(String),
    /// No session has this id.
    UnknownSession(String),
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let (status, message): (StatusCode, String) = match self {
            Self::InvalidSessionId(reason) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid session id: {reason}"),
            ),
            Self::UnknownSession(id) => (
                StatusCode::NOT_FOUND,
                format!("Import session not found: No import session with id '{id}'"),
            ),
        };
        (
            status,
            Json(ErrorResponse {
                error: true,
                message,
            }),
        )
            .into_response()
    }
}
