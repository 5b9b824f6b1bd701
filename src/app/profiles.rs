use std::sync::Arc;

use tracing::info;

use crate::domain::settings::Patch;
use crate::domain::{DomainError, Profile, SettingsDocument, SettingsPatch};
use crate::ports::SettingsStore;

/// Name given to the profile synthesized from the legacy connection block.
pub const LEGACY_PROFILE_NAME: &str = "Default";

/// CRUD over named connection profiles, built on the settings store.
///
/// Owns the read-time migration from the legacy single-connection format:
/// when no profiles are stored but a kept legacy connection exists, `list`
/// presents it as an implicit profile. Migration never writes; the legacy
/// fields stay the source of truth until the user saves a real profile.
#[derive(Clone)]
pub struct ProfileRegistry {
    store: Arc<dyn SettingsStore>,
}

impl ProfileRegistry {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// Profiles as presented to the selection screen and settings UI,
    /// including the synthesized legacy profile when applicable.
    pub async fn list(&self) -> Result<Vec<Profile>, DomainError> {
        let document = self.store.load().await?;
        Ok(Self::present_profiles(&document))
    }

    /// Save a profile. Replaces any existing profile with the same name,
    /// otherwise appends. Editing a profile's name therefore creates a new
    /// entry and leaves the old one behind; that matches the long-standing
    /// app behavior and is deliberate.
    pub async fn upsert(&self, mut profile: Profile) -> Result<(), DomainError> {
        if profile.name.trim().is_empty() {
            return Err(DomainError::EmptyName);
        }
        if profile.created_at.is_none() {
            profile.created_at = Some(chrono::Utc::now().to_rfc3339());
        }

        let document = self.store.load().await?;
        let mut profiles = document.profiles;
        match profiles.iter_mut().find(|p| p.name == profile.name) {
            Some(existing) => {
                // Keep the original creation stamp on replace.
                if existing.created_at.is_some() {
                    profile.created_at = existing.created_at.clone();
                }
                *existing = profile.clone();
            }
            None => profiles.push(profile.clone()),
        }

        self.store
            .save(SettingsPatch::with_profiles(profiles))
            .await?;
        info!(profile = %profile.name, "Profile saved");
        Ok(())
    }

    /// Delete a profile by name. Deleting a name that does not exist is a
    /// no-op. If the deleted profile is the current one, the pointer is
    /// cleared in the same store write so it never dangles.
    pub async fn delete(&self, name: &str) -> Result<(), DomainError> {
        let document = self.store.load().await?;
        let mut profiles = document.profiles;
        let before = profiles.len();
        profiles.retain(|p| p.name != name);
        if profiles.len() == before && document.current_profile.as_deref() != Some(name) {
            return Ok(());
        }

        let mut patch = SettingsPatch::with_profiles(profiles);
        if document.current_profile.as_deref() == Some(name) {
            patch.current_profile = Patch::Clear;
        }
        self.store.save(patch).await?;
        info!(profile = %name, "Profile deleted");
        Ok(())
    }

    /// Resolve the current-profile pointer. A stale pointer is treated as
    /// absent, never as an error.
    pub async fn get_current(&self) -> Result<Option<Profile>, DomainError> {
        let document = self.store.load().await?;
        let Some(name) = document.current_profile.clone() else {
            return Ok(None);
        };
        Ok(Self::present_profiles(&document)
            .into_iter()
            .find(|p| p.name == name))
    }

    /// Point the document at a stored profile. The synthesized legacy
    /// profile is not accepted here: persisting a pointer to a profile that
    /// only exists at read time would leave it dangling.
    pub async fn set_current(&self, name: &str) -> Result<(), DomainError> {
        let document = self.store.load().await?;
        if document.profile(name).is_none() {
            return Err(DomainError::NotFound(name.to_string()));
        }
        self.store
            .save(SettingsPatch::with_current_profile(Some(name.to_string())))
            .await?;
        info!(profile = %name, "Current profile set");
        Ok(())
    }

    fn present_profiles(document: &SettingsDocument) -> Vec<Profile> {
        if !document.profiles.is_empty() {
            return document.profiles.clone();
        }
        if document.has_persisted_legacy() {
            if let Some(connection) = document.database_connection.clone() {
                return vec![Profile {
                    name: LEGACY_PROFILE_NAME.to_string(),
                    database_connection: connection,
                    blog_images_path: document.blog_images_path.clone(),
                    blog_folder_path: document.blog_folder_path.clone(),
                    created_at: None,
                }];
            }
        }
        Vec::new()
    }
}
