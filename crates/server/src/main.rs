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
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod live;
mod session;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, FromRef, Query, State as AxumState},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

use seido_import::ImportMode;
use seido_import_api::{
    ApiError, ExecuteImportResponse, GoBackResponse, ListImportRunsRequest,
    ListImportRunsResponse, PreviewResponse, SessionRegistry, SessionSnapshot,
    SetCreatedContactsRequest, SetFileRequest, TemplateResponse,
};
use seido_import_persistence::Persistence;
use seido_import_sheets::{MAX_FILE_SIZE, TemplateKind};

use crate::live::{LiveEvent, LiveEventBroadcaster, LiveObserver, live_events_handler};
use crate::session::SessionId;

/// Room left in a request body above the file ceiling, so oversized files
/// reach the wizard and get a proper error instead of a bare 413.
const UPLOAD_HEADROOM: usize = 2 * 1024 * 1024;

/// Import mode accepted on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
enum ImportModeArg {
    /// Keep successful rows when others fail.
    BestEffort,
    /// Roll the whole run back when any row fails.
    #[default]
    Transactional,
}

impl From<ImportModeArg> for ImportMode {
    fn from(arg: ImportModeArg) -> Self {
        match arg {
            ImportModeArg::BestEffort => Self::BestEffort,
            ImportModeArg::Transactional => Self::Transactional,
        }
    }
}

/// SEIDO Import Server - HTTP server for the spreadsheet import wizard
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// How a run treats successful rows when another row fails
    #[arg(long, value_enum, default_value_t = ImportModeArg::Transactional)]
    import_mode: ImportModeArg,
}

/// Application state shared across handlers.
///
/// Locks are always taken in the order sessions, then persistence.
#[derive(Clone)]
struct AppState {
    /// Open wizard sessions.
    sessions: Arc<Mutex<SessionRegistry>>,
    /// The datastore imports are written to.
    persistence: Arc<Mutex<Persistence>>,
    /// Fan-out of live import progress.
    live: Arc<LiveEventBroadcaster>,
}

impl AppState {
    fn new(persistence: Persistence, mode: ImportMode) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(SessionRegistry::new(mode))),
            persistence: Arc::new(Mutex::new(persistence)),
            live: Arc::new(LiveEventBroadcaster::new()),
        }
    }
}

impl FromRef<AppState> for Arc<LiveEventBroadcaster> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.live)
    }
}

/// Query parameters for uploading a file.
#[derive(Debug, Deserialize)]
struct FileQuery {
    /// The original file name, extension included.
    name: String,
}

/// Query parameters for downloading the template.
#[derive(Debug, Default, Deserialize)]
struct TemplateQuery {
    /// `full` (default) or `blank`.
    #[serde(rename = "type", default)]
    kind: TemplateKind,
}

/// Query parameters for listing import runs.
#[derive(Debug, Deserialize)]
struct ListRunsQuery {
    /// Maximum number of runs to return.
    limit: Option<usize>,
}

/// Generic error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::InvalidTransition { .. } | ApiError::DomainRuleViolation { .. } => {
                StatusCode::CONFLICT
            }
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

/// Handler for POST `/api/import/sessions`.
async fn handle_create_session(
    AxumState(app_state): AxumState<AppState>,
) -> (StatusCode, Json<SessionSnapshot>) {
    let mut sessions = app_state.sessions.lock().await;
    let snapshot: SessionSnapshot = seido_import_api::create_session(&mut sessions);
    (StatusCode::CREATED, Json(snapshot))
}

/// Handler for GET `/api/import/sessions/{id}`.
async fn handle_get_session(
    AxumState(app_state): AxumState<AppState>,
    SessionId(id): SessionId,
) -> Result<Json<SessionSnapshot>, HttpError> {
    let sessions = app_state.sessions.lock().await;
    Ok(Json(seido_import_api::get_session(&sessions, &id)?))
}

/// Handler for DELETE `/api/import/sessions/{id}`.
async fn handle_delete_session(
    AxumState(app_state): AxumState<AppState>,
    SessionId(id): SessionId,
) -> Result<StatusCode, HttpError> {
    let mut sessions = app_state.sessions.lock().await;
    seido_import_api::delete_session(&mut sessions, &id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for POST `/api/import/sessions/{id}/file?name=…`.
///
/// The request body is the raw file content.
async fn handle_set_file(
    AxumState(app_state): AxumState<AppState>,
    SessionId(id): SessionId,
    Query(query): Query<FileQuery>,
    body: Bytes,
) -> Result<Json<SessionSnapshot>, HttpError> {
    let request: SetFileRequest = SetFileRequest {
        name: query.name,
        bytes: body.to_vec(),
    };
    let mut sessions = app_state.sessions.lock().await;
    Ok(Json(seido_import_api::set_file(&mut sessions, &id, request)?))
}

/// Handler for DELETE `/api/import/sessions/{id}/file`.
async fn handle_clear_file(
    AxumState(app_state): AxumState<AppState>,
    SessionId(id): SessionId,
) -> Result<Json<SessionSnapshot>, HttpError> {
    let mut sessions = app_state.sessions.lock().await;
    Ok(Json(seido_import_api::clear_file(&mut sessions, &id)?))
}

/// Handler for POST `/api/import/sessions/{id}/parse`.
async fn handle_parse_file(
    AxumState(app_state): AxumState<AppState>,
    SessionId(id): SessionId,
) -> Result<Json<SessionSnapshot>, HttpError> {
    let mut sessions = app_state.sessions.lock().await;
    Ok(Json(seido_import_api::parse_file(&mut sessions, &id)?))
}

/// Handler for POST `/api/import/sessions/{id}/validate`.
async fn handle_validate_data(
    AxumState(app_state): AxumState<AppState>,
    SessionId(id): SessionId,
) -> Result<Json<SessionSnapshot>, HttpError> {
    let mut sessions = app_state.sessions.lock().await;
    Ok(Json(seido_import_api::validate_data(&mut sessions, &id)?))
}

/// Handler for GET `/api/import/sessions/{id}/preview`.
async fn handle_preview(
    AxumState(app_state): AxumState<AppState>,
    SessionId(id): SessionId,
) -> Result<Json<PreviewResponse>, HttpError> {
    let sessions = app_state.sessions.lock().await;
    Ok(Json(seido_import_api::preview(&sessions, &id)?))
}

/// Handler for POST `/api/import/sessions/{id}/confirm`.
async fn handle_confirm(
    AxumState(app_state): AxumState<AppState>,
    SessionId(id): SessionId,
) -> Result<Json<SessionSnapshot>, HttpError> {
    let mut sessions = app_state.sessions.lock().await;
    Ok(Json(seido_import_api::confirm(&mut sessions, &id)?))
}

/// Handler for POST `/api/import/sessions/{id}/execute`.
///
/// Progress is streamed to live clients while the run executes.
async fn handle_execute_import(
    AxumState(app_state): AxumState<AppState>,
    SessionId(id): SessionId,
) -> Result<Json<ExecuteImportResponse>, HttpError> {
    let mut sessions = app_state.sessions.lock().await;
    let mut persistence = app_state.persistence.lock().await;

    let file_name: String = sessions
        .get(&id)?
        .wizard
        .state()
        .file
        .as_ref()
        .map(|file| file.name.clone())
        .unwrap_or_default();
    app_state.live.broadcast(&LiveEvent::ImportStarted {
        session_id: id.clone(),
        file_name,
    });

    let mut observer: LiveObserver<'_> = app_state.live.observer(&id);
    let response: ExecuteImportResponse =
        seido_import_api::execute_import(&mut sessions, &id, &mut persistence, &mut observer)?;
    drop(persistence);
    drop(sessions);

    app_state.live.broadcast(&LiveEvent::ImportFinished {
        session_id: id.clone(),
        success: response.result.success,
        rolled_back: response.result.rolled_back,
        run_id: response.run_id,
    });
    Ok(Json(response))
}

/// Handler for POST `/api/import/sessions/{id}/back`.
async fn handle_go_back(
    AxumState(app_state): AxumState<AppState>,
    SessionId(id): SessionId,
) -> Result<Json<GoBackResponse>, HttpError> {
    let mut sessions = app_state.sessions.lock().await;
    Ok(Json(seido_import_api::go_back(&mut sessions, &id)?))
}

/// Handler for POST `/api/import/sessions/{id}/reset`.
async fn handle_reset(
    AxumState(app_state): AxumState<AppState>,
    SessionId(id): SessionId,
) -> Result<Json<SessionSnapshot>, HttpError> {
    let mut sessions = app_state.sessions.lock().await;
    Ok(Json(seido_import_api::reset(&mut sessions, &id)?))
}

/// Handler for POST `/api/import/sessions/{id}/invitations`.
async fn handle_go_to_invitations(
    AxumState(app_state): AxumState<AppState>,
    SessionId(id): SessionId,
) -> Result<Json<SessionSnapshot>, HttpError> {
    let mut sessions = app_state.sessions.lock().await;
    Ok(Json(seido_import_api::go_to_invitation_step(&mut sessions, &id)?))
}

/// Handler for PUT `/api/import/sessions/{id}/invitations`.
async fn handle_set_created_contacts(
    AxumState(app_state): AxumState<AppState>,
    SessionId(id): SessionId,
    Json(request): Json<SetCreatedContactsRequest>,
) -> Result<Json<SessionSnapshot>, HttpError> {
    let mut sessions = app_state.sessions.lock().await;
    Ok(Json(seido_import_api::set_created_contacts(
        &mut sessions,
        &id,
        request,
    )?))
}

/// Handler for GET `/api/import/template?type=full|blank`.
#[allow(clippy::unused_async)]
async fn handle_download_template(
    Query(query): Query<TemplateQuery>,
) -> Result<Response, HttpError> {
    info!(kind = ?query.kind, "Handling template download");
    let template: TemplateResponse = seido_import_api::download_template(query.kind)?;
    let disposition: String = format!("attachment; filename=\"{}\"", template.file_name);
    Ok((
        [
            (
                header::CONTENT_TYPE,
                String::from("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        template.bytes,
    )
        .into_response())
}

/// Handler for GET `/api/import/runs`.
async fn handle_list_runs(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ListRunsQuery>,
) -> Result<Json<ListImportRunsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let request: ListImportRunsRequest = ListImportRunsRequest { limit: query.limit };
    Ok(Json(seido_import_api::list_import_runs(
        &mut persistence,
        request,
    )?))
}

fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/import/sessions", post(handle_create_session))
        .route(
            "/api/import/sessions/{id}",
            get(handle_get_session).delete(handle_delete_session),
        )
        .route(
            "/api/import/sessions/{id}/file",
            post(handle_set_file).delete(handle_clear_file),
        )
        .route("/api/import/sessions/{id}/parse", post(handle_parse_file))
        .route(
            "/api/import/sessions/{id}/validate",
            post(handle_validate_data),
        )
        .route("/api/import/sessions/{id}/preview", get(handle_preview))
        .route("/api/import/sessions/{id}/confirm", post(handle_confirm))
        .route(
            "/api/import/sessions/{id}/execute",
            post(handle_execute_import),
        )
        .route("/api/import/sessions/{id}/back", post(handle_go_back))
        .route("/api/import/sessions/{id}/reset", post(handle_reset))
        .route(
            "/api/import/sessions/{id}/invitations",
            post(handle_go_to_invitations).put(handle_set_created_contacts),
        )
        .route("/api/import/template", get(handle_download_template))
        .route("/api/import/runs", get(handle_list_runs))
        .route("/api/import/live", get(live_events_handler))
        .layer(DefaultBodyLimit::max(MAX_FILE_SIZE + UPLOAD_HEADROOM))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing SEIDO Import Server");

    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let mode: ImportMode = ImportMode::from(args.import_mode);
    info!(%mode, "Import mode");
    let app: Router = build_router(AppState::new(persistence, mode));

    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests;
