//! Usage: Persisted connector settings (credential record + read/write helpers).

use crate::domain::credential::OAuthCredential;
use crate::shared::error::AppResult;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::{Duration, Instant};

const CACHE_TTL: Duration = Duration::from_secs(5);

/// Persistent store for the connector credential record.
///
/// The OAuth flow consumes this as an injected dependency; handlers never
/// reach for process-wide state.
pub trait SettingsStore: Send + Sync {
    fn read(&self) -> AppResult<OAuthCredential>;
    fn write(&self, credential: &OAuthCredential) -> AppResult<OAuthCredential>;
}

#[derive(Clone)]
struct CachedCredential {
    data: OAuthCredential,
    last_updated: Instant,
}

/// JSON-file-backed store with a short-lived in-process cache.
pub struct FileSettingsStore {
    path: PathBuf,
    cache: RwLock<Option<CachedCredential>>,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: RwLock::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn cache_put(&self, credential: &OAuthCredential) {
        if let Ok(mut guard) = self.cache.write() {
            *guard = Some(CachedCredential {
                data: credential.clone(),
                last_updated: Instant::now(),
            });
        }
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("settings.json"));
    name.push(suffix);
    path.with_file_name(name)
}

impl SettingsStore for FileSettingsStore {
    fn read(&self) -> AppResult<OAuthCredential> {
        if let Ok(guard) = self.cache.read() {
            if let Some(cached) = guard.as_ref() {
                if cached.last_updated.elapsed() < CACHE_TTL {
                    return Ok(cached.data.clone());
                }
            }
        }

        if !self.path.exists() {
            // First run: the record starts empty and is created on the first save.
            return Ok(OAuthCredential::default());
        }

        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| format!("SYSTEM_ERROR: failed to read settings: {e}"))?;
        let credential: OAuthCredential = serde_json::from_str(&content)
            .map_err(|e| format!("SYSTEM_ERROR: invalid settings file: {e}"))?;

        self.cache_put(&credential);
        Ok(credential)
    }

    fn write(&self, credential: &OAuthCredential) -> AppResult<OAuthCredential> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| format!("SYSTEM_ERROR: failed to create settings dir: {e}"))?;
            }
        }

        let tmp_path = sibling(&self.path, ".tmp");
        let backup_path = sibling(&self.path, ".bak");

        let content = serde_json::to_vec_pretty(credential)
            .map_err(|e| format!("SYSTEM_ERROR: failed to serialize settings: {e}"))?;

        std::fs::write(&tmp_path, content)
            .map_err(|e| format!("SYSTEM_ERROR: failed to write temp settings file: {e}"))?;

        if backup_path.exists() {
            let _ = std::fs::remove_file(&backup_path);
        }

        if self.path.exists() {
            std::fs::rename(&self.path, &backup_path)
                .map_err(|e| format!("SYSTEM_ERROR: failed to create settings backup: {e}"))?;
        }

        if let Err(e) = std::fs::rename(&tmp_path, &self.path) {
            let _ = std::fs::rename(&backup_path, &self.path);
            return Err(format!("SYSTEM_ERROR: failed to finalize settings: {e}").into());
        }

        if backup_path.exists() {
            let _ = std::fs::remove_file(&backup_path);
        }

        self.cache_put(credential);
        Ok(credential.clone())
    }
}
