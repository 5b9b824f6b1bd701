use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::{DomainError, SettingsDocument, SettingsPatch};
use crate::ports::SettingsStore;

/// JSON-backed settings store with OS-specific paths.
///
/// The document lives in a single `settings.json`; earlier releases of the
/// app wrote the same file, so the field names and format are load-compatible.
pub struct JsonSettingsStore {
    config_dir: PathBuf,
    /// Serializes read-modify-write cycles so two concurrent saves to
    /// different fields both survive the merge.
    write_lock: Mutex<()>,
}

impl JsonSettingsStore {
    /// Create a store rooted at the OS-specific config directory.
    pub fn new() -> Result<Self, DomainError> {
        let config_dir = Self::get_config_dir()?;
        std::fs::create_dir_all(&config_dir)?;

        info!(config_dir = ?config_dir, "Settings store initialized");

        Ok(Self {
            config_dir,
            write_lock: Mutex::new(()),
        })
    }

    /// Create a store rooted at an explicit directory.
    pub fn with_dir(config_dir: PathBuf) -> Self {
        Self {
            config_dir,
            write_lock: Mutex::new(()),
        }
    }

    /// OS-specific config directory.
    /// - macOS: ~/Library/Application Support/inkdesk/
    /// - Windows: %APPDATA%\inkdesk\
    /// - Linux: ~/.config/inkdesk/
    fn get_config_dir() -> Result<PathBuf, DomainError> {
        #[cfg(target_os = "macos")]
        let dir = dirs::data_dir();

        #[cfg(not(target_os = "macos"))]
        let dir = dirs::config_dir();

        dir.map(|p| p.join("inkdesk")).ok_or_else(|| {
            DomainError::Persistence("Could not find application config directory".to_string())
        })
    }

    /// Logs directory, kept next to the settings file.
    pub fn logs_dir(&self) -> PathBuf {
        self.config_dir.join("logs")
    }

    async fn read_document(&self) -> Result<SettingsDocument, DomainError> {
        let path = self.settings_path();
        match fs::read_to_string(&path).await {
            Ok(content) => {
                debug!(path = ?path, "Settings loaded");
                Ok(serde_json::from_str(&content)?)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = ?path, "No settings file, starting from empty document");
                Ok(SettingsDocument::default())
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl SettingsStore for JsonSettingsStore {
    async fn load(&self) -> Result<SettingsDocument, DomainError> {
        self.read_document().await
    }

    async fn save(&self, patch: SettingsPatch) -> Result<(), DomainError> {
        let _guard = self.write_lock.lock().await;

        // An unreadable document must not block the user's save; the
        // earlier app behaved the same way.
        let mut document = match self.read_document().await {
            Ok(document) => document,
            Err(err) => {
                warn!(error = %err, "Existing settings unreadable, rewriting from empty document");
                SettingsDocument::default()
            }
        };
        document.apply(patch);

        let path = self.settings_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, serde_json::to_string_pretty(&document)?).await?;

        info!(path = ?path, "Settings saved");
        Ok(())
    }

    fn settings_path(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}
