//! Session Store: the authentication token and user descriptor set at login.
//!
//! Views receive the store through `AppState` and never touch storage directly.
//! The persisted layout is a flat string key-value map with two keys:
//! `access_token` (raw token) and `user` (JSON-serialized `UserDescriptor`).
//! There is no expiry and no server-side validation on read.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};

use crate::errors::PortalError;
use crate::models::user::{SessionUser, UserDescriptor};

pub const TOKEN_KEY: &str = "access_token";
pub const USER_KEY: &str = "user";

pub trait SessionStore: Send + Sync {
    fn token(&self) -> Option<String>;
    fn user(&self) -> Option<UserDescriptor>;
    fn set_session(&self, token: &str, user: &UserDescriptor) -> Result<(), PortalError>;
    fn clear_session(&self) -> Result<(), PortalError>;

    /// Both halves of the session, or `None` when logged out.
    /// A token without a readable descriptor counts as a non-admin user.
    fn session_user(&self) -> Option<SessionUser> {
        let token = self.token()?;
        Some(SessionUser {
            token,
            user: self.user().unwrap_or_default(),
        })
    }
}

/// Key-value session storage, optionally persisted to a JSON file.
pub struct LocalSessionStore {
    path: Option<PathBuf>,
    entries: RwLock<BTreeMap<String, String>>,
}

impl LocalSessionStore {
    /// Opens (or lazily creates) the store at `path`, loading any saved session.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PortalError> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&raw)?
            }
        } else {
            BTreeMap::new()
        };
        debug!("Session store opened at {}", path.display());
        Ok(Self {
            path: Some(path),
            entries: RwLock::new(entries),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            path: None,
            entries: RwLock::new(BTreeMap::new()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, String>> {
        self.entries.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, String>> {
        self.entries.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), PortalError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }
}

impl SessionStore for LocalSessionStore {
    fn token(&self) -> Option<String> {
        self.read().get(TOKEN_KEY).filter(|t| !t.is_empty()).cloned()
    }

    fn user(&self) -> Option<UserDescriptor> {
        let raw = self.read().get(USER_KEY).cloned()?;
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("Stored user descriptor is unreadable: {e}");
                None
            }
        }
    }

    fn set_session(&self, token: &str, user: &UserDescriptor) -> Result<(), PortalError> {
        let mut entries = self.write();
        entries.insert(TOKEN_KEY.to_string(), token.to_string());
        entries.insert(USER_KEY.to_string(), serde_json::to_string(user)?);
        self.persist(&entries)?;
        info!("Session stored (admin: {})", user.is_admin);
        Ok(())
    }

    fn clear_session(&self) -> Result<(), PortalError> {
        let mut entries = self.write();
        entries.remove(TOKEN_KEY);
        entries.remove(USER_KEY);
        self.persist(&entries)?;
        info!("Session cleared");
        Ok(())
    }
}
