use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{debug, instrument, warn};

/// On-disk record of who is currently signed in: a login flag and the user's
/// IIN. Deliberately kept outside the relational store so it survives a
/// database reset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SessionRecord {
    logged_in: bool,
    user_iin: Option<String>,
}

/// Durable single-user session state. Construct one explicitly and hand it
/// to whoever needs current-user context; reads before any write report the
/// logged-out default.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Conventional location under the platform data directory.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("campus-tracker")
            .join("session.json")
    }

    /// Marks `iin` as the signed-in user. Idempotent.
    #[instrument(skip(self))]
    pub fn save_session(&self, iin: &str) -> Result<(), AppError> {
        let record = SessionRecord {
            logged_in: true,
            user_iin: Some(iin.to_string()),
        };
        self.write(&record)?;
        debug!("Session saved");
        Ok(())
    }

    /// Returns to the logged-out state. Idempotent when already cleared.
    #[instrument(skip(self))]
    pub fn clear_session(&self) -> Result<(), AppError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Session(format!(
                "failed to clear session file: {}",
                e
            ))),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.read().logged_in
    }

    pub fn current_user(&self) -> Option<String> {
        let record = self.read();
        if record.logged_in { record.user_iin } else { None }
    }

    fn read(&self) -> SessionRecord {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return SessionRecord::default(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Session file unreadable, treating as logged out");
                return SessionRecord::default();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(record) => record,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Session file corrupt, treating as logged out");
                SessionRecord::default()
            }
        }
    }

    fn write(&self, record: &SessionRecord) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::Session(format!("failed to create session directory: {}", e))
            })?;
        }

        let json = serde_json::to_string_pretty(record)
            .map_err(|e| AppError::Session(format!("failed to encode session record: {}", e)))?;

        fs::write(&self.path, json)
            .map_err(|e| AppError::Session(format!("failed to write session file: {}", e)))
    }
}
