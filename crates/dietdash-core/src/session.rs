//! Session model and store for `DietDash`.
//!
//! A session is the triple the dashboard keeps per login (`token`, `userId`,
//! `role`) plus a fixed expiry window. It is the sole source of truth for
//! "is a request authenticated": token absent or expired means the request
//! goes out unauthenticated.
//!
//! The store is an explicit context object handed to the HTTP client at
//! construction time. There is no ambient global session.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::info;

use crate::error::SessionError;

/// Fixed session validity window. Logins are good for a week.
pub const SESSION_TTL_DAYS: i64 = 7;

/// File name for the persisted session, under the session directory.
const SESSION_FILE: &str = "session.json";

/// Directory under the user's home for `DietDash` state.
const SESSION_DIR: &str = ".dietdash";

/// An authenticated session, created at login and cleared at logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Bearer token issued by the login endpoint.
    pub token: String,
    /// Id of the logged-in user.
    pub user_id: String,
    /// Role of the logged-in user (e.g. `Admin`, `Patient`).
    pub role: String,
    /// When the session stops being valid.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Create a session expiring [`SESSION_TTL_DAYS`] from now.
    #[must_use]
    pub fn new(token: String, user_id: String, role: String) -> Self {
        Self {
            token,
            user_id,
            role,
            expires_at: Utc::now() + Duration::days(SESSION_TTL_DAYS),
        }
    }

    /// Whether the validity window has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Shared, cheaply cloneable session store.
///
/// Clones share the same interior state, so a login through one handle is
/// visible to every client holding another.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<Option<Session>>>,
}

impl SessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with a session.
    #[must_use]
    pub fn with_session(session: Session) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(session))),
        }
    }

    /// Replace the current session (login).
    pub async fn set(&self, session: Session) {
        info!(user_id = %session.user_id, role = %session.role, "session established");
        *self.inner.write().await = Some(session);
    }

    /// The current session, if present and not expired.
    pub async fn get(&self) -> Option<Session> {
        let guard = self.inner.read().await;
        guard.as_ref().filter(|s| !s.is_expired()).cloned()
    }

    /// The current bearer token, if the session is live.
    pub async fn token(&self) -> Option<String> {
        self.get().await.map(|s| s.token)
    }

    /// The current user id, if the session is live.
    pub async fn user_id(&self) -> Option<String> {
        self.get().await.map(|s| s.user_id)
    }

    /// The current role, if the session is live.
    pub async fn role(&self) -> Option<String> {
        self.get().await.map(|s| s.role)
    }

    /// Whether a live session exists.
    pub async fn is_authenticated(&self) -> bool {
        self.get().await.is_some()
    }

    /// Drop the current session (logout).
    pub async fn clear(&self) {
        let mut guard = self.inner.write().await;
        if guard.take().is_some() {
            info!("session cleared");
        }
    }
}

// ── File persistence ─────────────────────────────────────────────────
//
// The session survives process restarts as a single JSON file with 0600
// permissions, so a user stays logged in between runs.

/// Resolve the session directory under the user's home.
fn session_dir() -> Result<PathBuf, SessionError> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| SessionError::NoHomeDir)?;
    Ok(PathBuf::from(home).join(SESSION_DIR))
}

/// Write a session file into `dir`, creating the directory if needed.
///
/// # Errors
///
/// Returns [`SessionError::Io`] if the directory or file cannot be written.
pub fn persist_session_in(dir: &Path, session: &Session) -> Result<PathBuf, SessionError> {
    if !dir.exists() {
        std::fs::create_dir_all(dir).map_err(|e| SessionError::Io {
            path: dir.display().to_string(),
            source: e,
        })?;
    }
    let path = dir.join(SESSION_FILE);
    let json = serde_json::to_string_pretty(session).map_err(|e| SessionError::Corrupt {
        reason: format!("serialization failed: {e}"),
    })?;
    std::fs::write(&path, json).map_err(|e| SessionError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    // Token material: restrict permissions on Unix.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        let _ = std::fs::set_permissions(&path, perms);
    }

    Ok(path)
}

/// Load a session file from `dir`.
///
/// Returns `None` when the file is missing or the session has expired.
///
/// # Errors
///
/// Returns [`SessionError::Io`] if the file cannot be read, or
/// [`SessionError::Corrupt`] if it does not parse.
pub fn load_persisted_session_in(dir: &Path) -> Result<Option<Session>, SessionError> {
    let path = dir.join(SESSION_FILE);
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(&path).map_err(|e| SessionError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let session: Session = serde_json::from_str(&content).map_err(|e| SessionError::Corrupt {
        reason: e.to_string(),
    })?;
    if session.is_expired() {
        return Ok(None);
    }
    Ok(Some(session))
}

/// Remove the session file from `dir`, if present.
///
/// # Errors
///
/// Returns [`SessionError::Io`] if removal fails for a reason other than
/// the file being absent.
pub fn clear_persisted_session_in(dir: &Path) -> Result<(), SessionError> {
    let path = dir.join(SESSION_FILE);
    match std::fs::remove_file(&path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(SessionError::Io {
            path: path.display().to_string(),
            source: e,
        }),
    }
}

/// Write the session file under `~/.dietdash/`.
///
/// # Errors
///
/// See [`persist_session_in`]; also fails if no home directory resolves.
pub fn persist_session(session: &Session) -> Result<PathBuf, SessionError> {
    persist_session_in(&session_dir()?, session)
}

/// Load the session file from `~/.dietdash/`.
///
/// # Errors
///
/// See [`load_persisted_session_in`]; also fails if no home directory
/// resolves.
pub fn load_persisted_session() -> Result<Option<Session>, SessionError> {
    load_persisted_session_in(&session_dir()?)
}

/// Remove the session file from `~/.dietdash/`, if present.
///
/// # Errors
///
/// See [`clear_persisted_session_in`]; also fails if no home directory
/// resolves.
pub fn clear_persisted_session() -> Result<(), SessionError> {
    clear_persisted_session_in(&session_dir()?)
}
