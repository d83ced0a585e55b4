//! Settings store implementations.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use crate::types::{DailyStats, TimerConfig, TimerError};

use super::{Settings, SettingsFile, SettingsStore, APP_DIR_NAME, SETTINGS_FILENAME};

/// Returns the default settings path under the platform config directory.
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(SETTINGS_FILENAME))
}

// ============================================================================
// JsonSettingsStore
// ============================================================================

/// Settings stored as pretty-printed JSON in a single file.
#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
}

impl JsonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the settings file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and parses the settings file.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceFailure` if the file is missing or malformed.
    pub fn read_file(&self) -> Result<SettingsFile, TimerError> {
        let text = fs::read_to_string(&self.path).map_err(|e| {
            TimerError::PersistenceFailure(format!("{}: {}", self.path.display(), e))
        })?;
        serde_json::from_str(&text).map_err(|e| {
            TimerError::PersistenceFailure(format!("{}: {}", self.path.display(), e))
        })
    }

    fn write_file(&self, document: &SettingsFile) -> Result<(), TimerError> {
        let failure =
            |e: &dyn std::fmt::Display| TimerError::PersistenceFailure(format!("{}: {}", self.path.display(), e));

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| failure(&e))?;
        }
        let json = serde_json::to_string_pretty(document).map_err(|e| failure(&e))?;
        fs::write(&self.path, json).map_err(|e| failure(&e))
    }
}

impl SettingsStore for JsonSettingsStore {
    fn load(&self, today: NaiveDate) -> Settings {
        match self.read_file() {
            Ok(document) => document.into_settings(today),
            Err(e) => {
                if self.path.exists() {
                    tracing::warn!(error = %e, "Ignoring unreadable settings file, using defaults");
                } else {
                    tracing::debug!(path = %self.path.display(), "No settings file yet, using defaults");
                }
                Settings::defaults(today)
            }
        }
    }

    fn save(
        &self,
        config: &TimerConfig,
        stats: &DailyStats,
        today: NaiveDate,
    ) -> Result<(), TimerError> {
        self.write_file(&SettingsFile::new(config, stats, today))?;
        tracing::debug!(path = %self.path.display(), "Settings saved");
        Ok(())
    }
}

// ============================================================================
// MemorySettingsStore
// ============================================================================

#[derive(Debug, Default)]
struct MemoryInner {
    document: Option<SettingsFile>,
    save_count: usize,
    should_fail: bool,
}

/// In-memory settings store for testing.
///
/// Clones share the same document.
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    inner: Arc<Mutex<MemoryInner>>,
}

impl MemorySettingsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `document`.
    #[must_use]
    pub fn with_document(document: SettingsFile) -> Self {
        let store = Self::new();
        store.inner.lock().unwrap().document = Some(document);
        store
    }

    /// Makes every subsequent save fail.
    pub fn set_should_fail(&self, should_fail: bool) {
        self.inner.lock().unwrap().should_fail = should_fail;
    }

    /// Returns the last saved document.
    #[must_use]
    pub fn document(&self) -> Option<SettingsFile> {
        self.inner.lock().unwrap().document.clone()
    }

    /// Returns the number of successful saves.
    #[must_use]
    pub fn save_count(&self) -> usize {
        self.inner.lock().unwrap().save_count
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self, today: NaiveDate) -> Settings {
        match self.document() {
            Some(document) => document.into_settings(today),
            None => Settings::defaults(today),
        }
    }

    fn save(
        &self,
        config: &TimerConfig,
        stats: &DailyStats,
        today: NaiveDate,
    ) -> Result<(), TimerError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.should_fail {
            return Err(TimerError::PersistenceFailure("Mock failure".to_string()));
        }
        inner.document = Some(SettingsFile::new(config, stats, today));
        inner.save_count += 1;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
