// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! In-memory registry of import wizard sessions.
//!
//! Each session owns one `ImportWizard`. Sessions live until they are
//! deleted, sit idle longer than the registry's timeout, or the process
//! exits. Nothing is persisted.

use std::collections::HashMap;

use seido_import::{ImportMode, ImportWizard};
use time::{Duration, OffsetDateTime};
use tracing::{debug, info};

use crate::error::ApiError;

/// One wizard and its identity.
#[derive(Debug, Clone)]
pub struct ImportSession {
    pub id: String,
    pub wizard: ImportWizard,
    pub created_at: OffsetDateTime,
    /// Last time the wizard was looked up for modification.
    pub last_active: OffsetDateTime,
}

impl ImportSession {
    /// Returns `true` when the session has been idle longer than `timeout`.
    #[must_use]
    pub fn is_idle(&self, now: OffsetDateTime, timeout: Duration) -> bool {
        now - self.last_active > timeout
    }
}

/// How long an untouched session keeps its uploaded file in memory.
pub const SESSION_IDLE_TIMEOUT: Duration = Duration::hours(1);

/// Open wizard sessions, keyed by session id.
#[derive(Debug)]
pub struct SessionRegistry {
    sessions: HashMap<String, ImportSession>,
    mode: ImportMode,
    idle_timeout: Duration,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(ImportMode::default())
    }
}

impl SessionRegistry {
    /// Creates an empty registry whose new wizards run in `mode`.
    #[must_use]
    pub fn new(mode: ImportMode) -> Self {
        Self::with_idle_timeout(mode, SESSION_IDLE_TIMEOUT)
    }

    /// Creates an empty registry that evicts sessions idle for `idle_timeout`.
    #[must_use]
    pub fn with_idle_timeout(mode: ImportMode, idle_timeout: Duration) -> Self {
        Self {
            sessions: HashMap::new(),
            mode,
            idle_timeout,
        }
    }

    /// The import mode given to new wizards.
    #[must_use]
    pub const fn mode(&self) -> ImportMode {
        self.mode
    }

    /// Opens a new session in the `upload` step, evicting idle ones first.
    pub fn create(&mut self) -> &ImportSession {
        let now: OffsetDateTime = OffsetDateTime::now_utc();
        self.evict_idle(now);

        let mut id: String = generate_session_id();
        while self.sessions.contains_key(&id) {
            id = generate_session_id();
        }
        info!(session_id = %id, mode = %self.mode, "Import session created");
        self.sessions.entry(id.clone()).or_insert(ImportSession {
            id,
            wizard: ImportWizard::new(self.mode),
            created_at: now,
            last_active: now,
        })
    }

    /// Drops every session idle for longer than the timeout at `now`.
    /// Returns how many were dropped.
    pub fn evict_idle(&mut self, now: OffsetDateTime) -> usize {
        let timeout: Duration = self.idle_timeout;
        let before: usize = self.sessions.len();
        self.sessions.retain(|id, session| {
            let idle: bool = session.is_idle(now, timeout);
            if idle {
                info!(
                    session_id = %id,
                    step = %session.wizard.state().step,
                    created_at = %session.created_at,
                    "Evicting idle import session"
                );
            }
            !idle
        });
        before - self.sessions.len()
    }

    /// Looks up a session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::ResourceNotFound` for an unknown id.
    pub fn get(&self, id: &str) -> Result<&ImportSession, ApiError> {
        self.sessions.get(id).ok_or_else(|| not_found(id))
    }

    /// Looks up a session for modification.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::ResourceNotFound` for an unknown id.
    pub fn get_mut(&mut self, id: &str) -> Result<&mut ImportSession, ApiError> {
        let session: &mut ImportSession = self.sessions.get_mut(id).ok_or_else(|| not_found(id))?;
        session.last_active = OffsetDateTime::now_utc();
        Ok(session)
    }

    /// Drops a session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::ResourceNotFound` for an unknown id.
    pub fn remove(&mut self, id: &str) -> Result<ImportSession, ApiError> {
        let session: ImportSession = self.sessions.remove(id).ok_or_else(|| not_found(id))?;
        info!(session_id = %id, "Import session deleted");
        Ok(session)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.sessions.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

fn not_found(id: &str) -> ApiError {
    debug!(session_id = %id, "Unknown import session");
    ApiError::ResourceNotFound {
        resource_type: String::from("Import session"),
        message: format!("No import session with id '{id}'"),
    }
}

fn generate_session_id() -> String {
    let timestamp: i128 = OffsetDateTime::now_utc().unix_timestamp_nanos();
    format!("import_{timestamp}_{:016x}", rand::random::<u64>())
}
