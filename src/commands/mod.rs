use tauri::State;

use crate::app::{AppController, BootstrapScreen};
use crate::domain::{ManualConnection, Profile, SessionSnapshot, SettingsDocument, SettingsPatch};

// ==================== Settings Commands ====================

/// Load the full settings document.
#[tauri::command]
pub async fn load_settings(
    controller: State<'_, AppController>,
) -> Result<SettingsDocument, String> {
    controller.store().load().await.map_err(|e| e.to_string())
}

/// Merge a partial update into the settings document. Fields absent from
/// the payload keep their stored value.
#[tauri::command]
pub async fn save_settings(
    controller: State<'_, AppController>,
    settings: SettingsPatch,
) -> Result<(), String> {
    controller
        .store()
        .save(settings)
        .await
        .map_err(|e| e.to_string())
}

/// Application paths information.
#[derive(serde::Serialize)]
pub struct AppPaths {
    pub settings_path: String,
    pub logs_dir: String,
}

/// Get application paths information.
#[tauri::command]
pub fn get_paths(controller: State<'_, AppController>) -> AppPaths {
    AppPaths {
        settings_path: controller.settings_path(),
        logs_dir: controller.logs_dir(),
    }
}

// ==================== Profile Commands ====================

/// List connection profiles (including the synthesized legacy one).
#[tauri::command]
pub async fn get_profiles(controller: State<'_, AppController>) -> Result<Vec<Profile>, String> {
    controller.registry().list().await.map_err(|e| e.to_string())
}

/// Resolve the current profile, if any.
#[tauri::command]
pub async fn get_current_profile(
    controller: State<'_, AppController>,
) -> Result<Option<Profile>, String> {
    controller
        .registry()
        .get_current()
        .await
        .map_err(|e| e.to_string())
}

/// Create or replace a profile (identity is the name).
#[tauri::command]
pub async fn save_profile(
    controller: State<'_, AppController>,
    profile: Profile,
) -> Result<(), String> {
    controller
        .registry()
        .upsert(profile)
        .await
        .map_err(|e| e.to_string())
}

/// Delete a profile by name. Deleting a missing name is a no-op.
#[tauri::command]
pub async fn delete_profile(
    controller: State<'_, AppController>,
    profile_name: String,
) -> Result<(), String> {
    controller
        .registry()
        .delete(&profile_name)
        .await
        .map_err(|e| e.to_string())
}

/// Point the document at an existing profile.
#[tauri::command]
pub async fn set_current_profile(
    controller: State<'_, AppController>,
    profile_name: String,
) -> Result<(), String> {
    controller
        .registry()
        .set_current(&profile_name)
        .await
        .map_err(|e| e.to_string())
}

// ==================== Bootstrap Commands ====================

/// Which screen the shell should present. Runs the entry decision on
/// first call after launch or logout.
#[tauri::command]
pub async fn bootstrap_screen(
    controller: State<'_, AppController>,
) -> Result<BootstrapScreen, String> {
    let orchestrator = controller.orchestrator();
    match orchestrator.screen() {
        BootstrapScreen::Init => Ok(orchestrator.initialize().await),
        screen => Ok(screen),
    }
}

/// Current session state snapshot.
#[tauri::command]
pub fn session_state(controller: State<'_, AppController>) -> SessionSnapshot {
    controller.orchestrator().session()
}

/// Switch to the manual-entry form.
#[tauri::command]
pub fn request_manual_entry(controller: State<'_, AppController>) -> BootstrapScreen {
    controller.orchestrator().request_manual_entry()
}

/// Drop the kept legacy connection and show manual entry.
#[tauri::command]
pub async fn forget_legacy_connection(
    controller: State<'_, AppController>,
) -> Result<BootstrapScreen, String> {
    controller
        .orchestrator()
        .forget_legacy()
        .await
        .map_err(|e| e.to_string())
}

// ==================== Connection Commands ====================

/// Connect using a saved profile.
#[tauri::command]
pub async fn connect_with_profile(
    controller: State<'_, AppController>,
    profile_name: String,
) -> Result<(), String> {
    controller
        .orchestrator()
        .connect_with_profile(&profile_name)
        .await
        .map_err(|e| e.to_string())
}

/// Connect using the manual-entry form.
#[tauri::command]
pub async fn connect_manual(
    controller: State<'_, AppController>,
    form: ManualConnection,
) -> Result<(), String> {
    controller
        .orchestrator()
        .connect_manual(form)
        .await
        .map_err(|e| e.to_string())
}

/// Connect using the kept legacy connection.
#[tauri::command]
pub async fn confirm_auto_connect(controller: State<'_, AppController>) -> Result<(), String> {
    controller
        .orchestrator()
        .confirm_auto_connect()
        .await
        .map_err(|e| e.to_string())
}

/// Reconnect under a different profile, releasing the current session first.
#[tauri::command]
pub async fn switch_profile(
    controller: State<'_, AppController>,
    profile_name: String,
) -> Result<(), String> {
    controller
        .orchestrator()
        .switch_profile(&profile_name)
        .await
        .map_err(|e| e.to_string())
}

/// Probe whether the backend session is still usable.
#[tauri::command]
pub async fn check_db_connection(controller: State<'_, AppController>) -> Result<bool, String> {
    Ok(controller.orchestrator().check_connection().await)
}

/// Release the session and return to the entry decision.
#[tauri::command]
pub async fn logout(controller: State<'_, AppController>) -> Result<BootstrapScreen, String> {
    Ok(controller.orchestrator().logout().await)
}
