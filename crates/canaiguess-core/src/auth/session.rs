use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::AuthResponse;

/// Session file name in the data directory
const SESSION_FILE: &str = "session.json";

/// Role value granting access to the admin screens. Compared exactly.
pub const ADMIN_ROLE: &str = "ADMIN";

/// The persisted client state: `token`, `username` and `role`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl SessionData {
    /// A token counts as present only when stored and non-empty.
    pub fn has_token(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some(ADMIN_ROLE)
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }
}

/// Single owner of the session state. Guards and the API client read from
/// here instead of touching the session file themselves.
pub struct SessionStore {
    path: PathBuf,
    data: SessionData,
}

impl SessionStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(SESSION_FILE),
            data: SessionData::default(),
        }
    }

    /// Load the session from disk. Returns whether a token was found.
    pub fn load(&mut self) -> Result<bool> {
        if self.path.exists() {
            let contents = std::fs::read_to_string(&self.path)
                .context("Failed to read session file")?;
            self.data = serde_json::from_str(&contents)
                .context("Failed to parse session file")?;
            debug!(user = ?self.data.username, "Session loaded");
        }
        Ok(self.data.has_token())
    }

    /// Save the session to disk
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(&self.data)?;
        std::fs::write(&self.path, contents).context("Failed to write session file")?;
        Ok(())
    }

    /// Replace the session with a fresh login and persist it.
    pub fn update(&mut self, auth: &AuthResponse) -> Result<()> {
        self.data = SessionData {
            token: Some(auth.token.clone()),
            username: Some(auth.username.clone()),
            role: auth.role.clone(),
        };
        self.save()
    }

    /// Forget the session in memory and on disk.
    pub fn clear(&mut self) -> Result<()> {
        self.data = SessionData::default();
        if self.path.exists() {
            std::fs::remove_file(&self.path).context("Failed to remove session file")?;
        }
        Ok(())
    }

    pub fn data(&self) -> &SessionData {
        &self.data
    }

    pub fn token(&self) -> Option<&str> {
        self.data.token()
    }

    pub fn username(&self) -> Option<&str> {
        self.data.username()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth(role: Option<&str>) -> AuthResponse {
        AuthResponse {
            token: "tok".to_string(),
            username: "alice".to_string(),
            role: role.map(str::to_string),
        }
    }

    #[test]
    fn test_has_token_requires_non_empty() {
        let mut data = SessionData::default();
        assert!(!data.has_token());
        data.token = Some(String::new());
        assert!(!data.has_token());
        assert!(data.token().is_none());
        data.token = Some("t".into());
        assert!(data.has_token());
    }

    #[test]
    fn test_is_admin_is_exact() {
        let mut data = SessionData::default();
        for role in ["", "admin", "Admin", "USER", "ADMIN "] {
            data.role = Some(role.to_string());
            assert!(!data.is_admin(), "role {:?} must not be admin", role);
        }
        data.role = Some("ADMIN".into());
        assert!(data.is_admin());
    }

    #[test]
    fn test_update_persists_and_reloads() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SessionStore::new(dir.path());
        store.update(&auth(Some("ADMIN"))).unwrap();

        let mut reloaded = SessionStore::new(dir.path());
        assert!(reloaded.load().unwrap());
        assert_eq!(reloaded.username(), Some("alice"));
        assert_eq!(reloaded.token(), Some("tok"));
        assert!(reloaded.data().is_admin());
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SessionStore::new(dir.path());
        store.update(&auth(None)).unwrap();
        assert!(dir.path().join(SESSION_FILE).exists());

        store.clear().unwrap();
        assert!(!dir.path().join(SESSION_FILE).exists());
        assert_eq!(store.data(), &SessionData::default());

        let mut reloaded = SessionStore::new(dir.path());
        assert!(!reloaded.load().unwrap());
    }

    #[test]
    fn test_load_missing_file_is_empty_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SessionStore::new(dir.path());
        assert!(!store.load().unwrap());
        assert!(store.username().is_none());
    }
}
