// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! One function per wizard action.
//!
//! Handlers are transport independent: they take the session registry and,
//! where needed, the persistence layer, and return DTOs or an `ApiError`.

use num_traits::ToPrimitive;
use seido_import::{FileUpload, ImportObserver, ImportResult, ImportWizard};
use seido_import_domain::ParseResult;
use seido_import_persistence::{ImportRunData, Persistence};
use seido_import_sheets::{TEMPLATE_FILE_NAME, TemplateKind, build_template};
use tracing::{error, info};

use crate::error::ApiError;
use crate::preview::{PreviewResponse, build_preview};
use crate::request_response::{
    ExecuteImportResponse, GoBackResponse, ListImportRunsRequest, ListImportRunsResponse,
    SessionSnapshot, SetCreatedContactsRequest, SetFileRequest, TemplateResponse,
};
use crate::sessions::{ImportSession, SessionRegistry};

/// Number of runs returned when a history request names no limit.
pub const DEFAULT_RUN_LIMIT: usize = 50;

/// Applies `action` to the wizard of session `id` and snapshots the result.
fn with_wizard<F>(
    sessions: &mut SessionRegistry,
    id: &str,
    action: F,
) -> Result<SessionSnapshot, ApiError>
where
    F: FnOnce(&mut ImportWizard) -> Result<(), ApiError>,
{
    let session: &mut ImportSession = sessions.get_mut(id)?;
    action(&mut session.wizard)?;
    Ok(SessionSnapshot::of(session))
}

/// Opens a new wizard session.
pub fn create_session(sessions: &mut SessionRegistry) -> SessionSnapshot {
    SessionSnapshot::of(sessions.create())
}

/// Returns the current state of a session.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` for an unknown session.
pub fn get_session(sessions: &SessionRegistry, id: &str) -> Result<SessionSnapshot, ApiError> {
    sessions.get(id).map(SessionSnapshot::of)
}

/// Drops a session and its wizard.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` for an unknown session.
pub fn delete_session(sessions: &mut SessionRegistry, id: &str) -> Result<(), ApiError> {
    sessions.remove(id).map(|_| ())
}

/// Hands a file to the wizard of a session.
///
/// # Errors
///
/// Returns an error if:
/// - The session does not exist
/// - The wizard is not in the `upload` step
/// - The file has an unsupported extension or exceeds the size ceiling
pub fn set_file(
    sessions: &mut SessionRegistry,
    id: &str,
    request: SetFileRequest,
) -> Result<SessionSnapshot, ApiError> {
    info!(
        session_id = %id,
        file_name = %request.name,
        size = request.bytes.len(),
        "Handling set_file request"
    );
    if request.name.trim().is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("name"),
            message: String::from("File name must not be empty"),
        });
    }
    with_wizard(sessions, id, |wizard| {
        wizard
            .set_file(Some(FileUpload::new(request.name, request.bytes)))
            .map_err(ApiError::from)
    })
}

/// Clears the selected file of a session.
///
/// # Errors
///
/// Returns an error if the session does not exist or is past `upload`.
pub fn clear_file(sessions: &mut SessionRegistry, id: &str) -> Result<SessionSnapshot, ApiError> {
    with_wizard(sessions, id, |wizard| wizard.set_file(None).map_err(ApiError::from))
}

/// Parses the selected file and validates its rows.
///
/// # Errors
///
/// Returns an error if:
/// - The session does not exist
/// - The wizard is not in the `upload` step or has no file
/// - The file cannot be parsed
pub fn parse_file(sessions: &mut SessionRegistry, id: &str) -> Result<SessionSnapshot, ApiError> {
    info!(session_id = %id, "Handling parse_file request");
    with_wizard(sessions, id, |wizard| wizard.parse_file().map_err(ApiError::from))
}

/// Re-runs validation on the parsed file.
///
/// # Errors
///
/// Returns an error if the session does not exist or is not in `preview`.
pub fn validate_data(
    sessions: &mut SessionRegistry,
    id: &str,
) -> Result<SessionSnapshot, ApiError> {
    with_wizard(sessions, id, |wizard| {
        wizard.validate_data().map(|_| ()).map_err(ApiError::from)
    })
}

/// Builds the per-sheet row preview of the parsed file.
///
/// # Errors
///
/// Returns an error if the session does not exist or has no parsed file.
pub fn preview(sessions: &SessionRegistry, id: &str) -> Result<PreviewResponse, ApiError> {
    let session: &ImportSession = sessions.get(id)?;
    let parsed: &ParseResult =
        session
            .wizard
            .state()
            .parse_result
            .as_ref()
            .ok_or_else(|| ApiError::InvalidTransition {
                message: format!(
                    "Cannot preview the data while in the {} step",
                    session.wizard.state().step
                ),
            })?;

    Ok(PreviewResponse {
        session_id: session.id.clone(),
        stats: parsed.stats(),
        sheets: build_preview(parsed, session.wizard.errors()),
        error_count: session.wizard.errors().len(),
        can_proceed: session.wizard.can_proceed(),
    })
}

/// Moves a session from `preview` to `confirm`.
///
/// # Errors
///
/// Returns an error if the session does not exist, is not in `preview`, or
/// still has blocking errors.
pub fn confirm(sessions: &mut SessionRegistry, id: &str) -> Result<SessionSnapshot, ApiError> {
    info!(session_id = %id, "Handling confirm request");
    with_wizard(sessions, id, |wizard| wizard.proceed().map_err(ApiError::from))
}

/// Executes the confirmed import and records it in the import history.
///
/// A history write failure is logged and reported as a missing `run_id`;
/// the import itself has already finished by then.
///
/// # Errors
///
/// Returns an error if the session does not exist, is not in `confirm`, or
/// its batch still has validation errors.
pub fn execute_import<O>(
    sessions: &mut SessionRegistry,
    id: &str,
    persistence: &mut Persistence,
    observer: &mut O,
) -> Result<ExecuteImportResponse, ApiError>
where
    O: ImportObserver + ?Sized,
{
    info!(session_id = %id, "Handling execute_import request");
    let session: &mut ImportSession = sessions.get_mut(id)?;
    let file_name: String = session
        .wizard
        .file()
        .map(|file| file.name().to_string())
        .unwrap_or_default();

    let result: ImportResult = session
        .wizard
        .execute_import(persistence, observer)?
        .clone();

    let run_id: Option<i64> = match persistence.record_import_run(&file_name, &result) {
        Ok(run_id) => Some(run_id),
        Err(e) => {
            error!(session_id = %id, error = %e, "Could not record import run");
            None
        }
    };

    info!(
        session_id = %id,
        success = result.success,
        rolled_back = result.rolled_back,
        run_id = ?run_id,
        "Import executed"
    );
    Ok(ExecuteImportResponse {
        result,
        run_id,
        session: SessionSnapshot::of(session),
    })
}

/// Steps a session back one step.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` for an unknown session.
pub fn go_back(sessions: &mut SessionRegistry, id: &str) -> Result<GoBackResponse, ApiError> {
    let session: &mut ImportSession = sessions.get_mut(id)?;
    let moved: bool = session.wizard.go_back();
    Ok(GoBackResponse {
        moved,
        session: SessionSnapshot::of(session),
    })
}

/// Returns a session to a fresh `upload` step.
///
/// # Errors
///
/// Returns `ApiError::ResourceNotFound` for an unknown session.
pub fn reset(sessions: &mut SessionRegistry, id: &str) -> Result<SessionSnapshot, ApiError> {
    with_wizard(sessions, id, |wizard| {
        wizard.reset();
        Ok(())
    })
}

/// Moves a session from `result` to `invite`.
///
/// # Errors
///
/// Returns an error if the session does not exist, is not in `result`, or no
/// created contact has an email address.
pub fn go_to_invitation_step(
    sessions: &mut SessionRegistry,
    id: &str,
) -> Result<SessionSnapshot, ApiError> {
    with_wizard(sessions, id, |wizard| {
        wizard.go_to_invitation_step().map_err(ApiError::from)
    })
}

/// Replaces the contacts offered for invitation.
///
/// # Errors
///
/// Returns an error if the session does not exist or is not in `result` or
/// `invite`.
pub fn set_created_contacts(
    sessions: &mut SessionRegistry,
    id: &str,
    request: SetCreatedContactsRequest,
) -> Result<SessionSnapshot, ApiError> {
    with_wizard(sessions, id, |wizard| {
        wizard
            .set_created_contacts(request.contacts)
            .map_err(ApiError::from)
    })
}

/// Generates the template workbook.
///
/// # Errors
///
/// Returns `ApiError::Internal` if the workbook cannot be written.
pub fn download_template(kind: TemplateKind) -> Result<TemplateResponse, ApiError> {
    let bytes: Vec<u8> = build_template(kind)?;
    Ok(TemplateResponse {
        file_name: String::from(TEMPLATE_FILE_NAME),
        bytes,
    })
}

/// Lists recorded import runs, newest first.
///
/// # Errors
///
/// Returns an error if:
/// - The limit is zero or too large
/// - The history cannot be read
pub fn list_import_runs(
    persistence: &mut Persistence,
    request: ListImportRunsRequest,
) -> Result<ListImportRunsResponse, ApiError> {
    let limit: i64 = request
        .limit
        .unwrap_or(DEFAULT_RUN_LIMIT)
        .to_i64()
        .filter(|limit| *limit > 0)
        .ok_or_else(|| ApiError::InvalidInput {
            field: String::from("limit"),
            message: String::from("Limit must be a positive number"),
        })?;
    let runs: Vec<ImportRunData> = persistence.list_import_runs(limit)?;
    Ok(ListImportRunsResponse { runs })
}
