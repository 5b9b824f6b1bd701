use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::{DomainError, SettingsDocument, SettingsPatch};

/// Settings persistence port.
///
/// `save` is a field-level merge: fields absent from the patch keep their
/// persisted value, so independent surfaces (path pickers, connection form,
/// profile editor) can each write a narrow slice of the same document.
/// Concurrent saves to the same field race arbitrarily; saves to different
/// fields must both survive.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Load the settings document. A missing document is not an error;
    /// it loads as the zero-valued document.
    async fn load(&self) -> Result<SettingsDocument, DomainError>;

    /// Merge a partial update into the persisted document.
    async fn save(&self, patch: SettingsPatch) -> Result<(), DomainError>;

    /// Path of the backing settings file.
    fn settings_path(&self) -> PathBuf;
}
