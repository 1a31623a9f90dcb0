//! Sign-in, registration and the local session file

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::NotesApi;
use crate::core::error::{NotesError, Result};

const SESSION_FILE: &str = "session.json";

/// Registration form
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
}

/// Signed-in user, persisted between runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    pub logged_in_at: DateTime<Utc>,
}

impl Session {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            logged_in_at: Utc::now(),
        }
    }
}

pub fn session_path(state_dir: &Path) -> PathBuf {
    state_dir.join(SESSION_FILE)
}

pub async fn save_session(state_dir: &Path, session: &Session) -> Result<PathBuf> {
    tokio::fs::create_dir_all(state_dir).await?;
    let path = session_path(state_dir);
    tokio::fs::write(&path, serde_json::to_string_pretty(session)?).await?;
    Ok(path)
}

/// Stored session, `None` when nobody is signed in
pub async fn load_session(state_dir: &Path) -> Result<Option<Session>> {
    let content = match tokio::fs::read_to_string(session_path(state_dir)).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(serde_json::from_str(&content)?))
}

/// Sign in and remember the user. Returns the server's message.
pub async fn login<A: NotesApi>(
    api: &A,
    state_dir: &Path,
    username: &str,
    password: &str,
) -> Result<String> {
    if username.trim().is_empty() || password.is_empty() {
        return Err(NotesError::InvalidInput(
            "Username and password are required".to_string(),
        ));
    }
    let message = api.login(username, password).await?;
    let path = save_session(state_dir, &Session::new(username)).await?;
    tracing::info!(username, session = %path.display(), "signed in");
    Ok(message)
}

pub async fn register<A: NotesApi>(api: &A, registration: &Registration) -> Result<String> {
    if registration.username.trim().is_empty() || registration.password.is_empty() {
        return Err(NotesError::InvalidInput(
            "Username and password are required".to_string(),
        ));
    }
    api.register(registration).await
}

/// Forget the stored session. Returns whether one existed.
pub async fn logout(state_dir: &Path) -> Result<bool> {
    match tokio::fs::remove_file(session_path(state_dir)).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

pub async fn whoami(state_dir: &Path) -> Result<Option<String>> {
    Ok(load_session(state_dir).await?.map(|s| s.username))
}
