use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::model::{CachedProfile, Session};
use crate::constants::SESSION_FILE_NAME;
use crate::utils::{Result, ShelterError};

/// Durable key-value persistence of session credentials
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Last persisted session, or an empty one. Read failures count as empty.
    async fn get(&self) -> Session;

    /// Overwrite the persisted session. Durable once this returns `Ok`.
    async fn set(&self, session: &Session) -> Result<()>;

    /// Remove the persisted session together with the cached profile
    async fn clear(&self) -> Result<()>;

    /// Cached profile fields, if any were stored
    async fn profile(&self) -> Option<CachedProfile>;

    /// Store profile fields next to the current session
    async fn set_profile(&self, profile: &CachedProfile) -> Result<()>;
}

/// On-disk layout of `session.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct SessionFile {
    #[serde(rename = "userId", default, skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    profile: Option<CachedProfile>,
}

impl SessionFile {
    fn session(&self) -> Session {
        Session::new(self.user_id.clone(), self.token.clone())
    }

    /// Replace the credentials, keeping the profile only for the same user
    fn with_session(self, session: &Session) -> Self {
        let same_user = self.user_id.is_some() && self.user_id == session.user_id;
        Self {
            user_id: session.user_id.clone(),
            token: session.token.clone(),
            profile: if same_user { self.profile } else { None },
        }
    }
}

/// Session store backed by a TOML file in the data directory
pub struct FileSessionStore {
    path: PathBuf,
    write_lock: tokio::sync::Mutex<()>,
}

impl FileSessionStore {
    /// Create a store that keeps `session.toml` inside `dir`
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(SESSION_FILE_NAME),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Path of the session file
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_file(&self) -> Result<Option<SessionFile>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => toml::from_str(&content).map(Some).map_err(|e| {
                ShelterError::Storage(format!("{} is unreadable: {}", self.path.display(), e))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ShelterError::Storage(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    /// Write through a temporary file and rename it over the old one
    async fn write_file(&self, file: &SessionFile) -> Result<()> {
        let content = toml::to_string_pretty(file)
            .map_err(|e| ShelterError::Storage(format!("Failed to encode session: {}", e)))?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                ShelterError::Storage(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        let tmp = self.path.with_extension("toml.tmp");
        write_private(&tmp, content.as_bytes()).await.map_err(|e| {
            ShelterError::Storage(format!("Failed to write {}: {}", tmp.display(), e))
        })?;
        tokio::fs::rename(&tmp, &self.path).await.map_err(|e| {
            ShelterError::Storage(format!("Failed to replace {}: {}", self.path.display(), e))
        })?;

        debug!(path = %self.path.display(), "session file written");
        Ok(())
    }
}

/// Write a file only the current user can read; it holds the bearer token
async fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    // a leftover temp file keeps its old mode
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))
            .await?;
    }
    file.write_all(content).await?;
    file.sync_all().await
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn get(&self) -> Session {
        match self.read_file().await {
            Ok(Some(file)) => file.session(),
            Ok(None) => Session::default(),
            Err(e) => {
                warn!("Treating session as empty: {}", e);
                Session::default()
            }
        }
    }

    async fn set(&self, session: &Session) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        // An unreadable file is replaced rather than blocking a fresh login
        let current = self.read_file().await.unwrap_or_default().unwrap_or_default();
        self.write_file(&current.with_session(session)).await
    }

    async fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "session file removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ShelterError::Storage(format!(
                "Failed to remove {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    async fn profile(&self) -> Option<CachedProfile> {
        match self.read_file().await {
            Ok(file) => file.and_then(|f| f.profile),
            Err(e) => {
                warn!("Ignoring cached profile: {}", e);
                None
            }
        }
    }

    async fn set_profile(&self, profile: &CachedProfile) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut file = self.read_file().await?.ok_or_else(|| {
            ShelterError::Session("cannot cache a profile without a session".to_string())
        })?;
        file.profile = Some(profile.clone());
        self.write_file(&file).await
    }
}

/// In-process session store, lost when the process exits
#[derive(Default)]
pub struct MemorySessionStore {
    inner: Mutex<SessionFile>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an already persisted session
    pub fn with_session(session: Session) -> Self {
        let store = Self::default();
        *store.inner.lock() = SessionFile::default().with_session(&session);
        store
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self) -> Session {
        self.inner.lock().session()
    }

    async fn set(&self, session: &Session) -> Result<()> {
        let mut inner = self.inner.lock();
        *inner = std::mem::take(&mut *inner).with_session(session);
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.inner.lock() = SessionFile::default();
        Ok(())
    }

    async fn profile(&self) -> Option<CachedProfile> {
        self.inner.lock().profile.clone()
    }

    async fn set_profile(&self, profile: &CachedProfile) -> Result<()> {
        let mut inner = self.inner.lock();
        if !inner.session().is_present() {
            return Err(ShelterError::Session(
                "cannot cache a profile without a session".to_string(),
            ));
        }
        inner.profile = Some(profile.clone());
        Ok(())
    }
}
