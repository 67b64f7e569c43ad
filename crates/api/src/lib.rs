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
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

//! Transport-independent boundary of the import wizard.
//!
//! Callers hold a [`SessionRegistry`] and a [`Persistence`] and invoke one
//! handler per wizard action. Every handler returns a serializable DTO or an
//! [`ApiError`].
//!
//! [`Persistence`]: seido_import_persistence::Persistence

mod error;
mod handlers;
mod preview;
mod request_response;
mod sessions;

#[cfg(test)]
mod tests;

pub use error::ApiError;
pub use handlers::{
    DEFAULT_RUN_LIMIT, clear_file, confirm, create_session, delete_session, download_template,
    execute_import, get_session, go_back, go_to_invitation_step, list_import_runs, parse_file,
    preview, reset, set_created_contacts, set_file, validate_data,
};
pub use preview::{
    PreviewResponse, RowPreview, RowPreviewStatus, SheetPreview, build_preview,
};
pub use request_response::{
    ExecuteImportResponse, GoBackResponse, ListImportRunsRequest, ListImportRunsResponse,
    SessionSnapshot, SetCreatedContactsRequest, SetFileRequest, TemplateResponse,
};
pub use sessions::{ImportSession, SESSION_IDLE_TIMEOUT, SessionRegistry};
