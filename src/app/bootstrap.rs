use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::app::profiles::ProfileRegistry;
use crate::domain::settings::Patch;
use crate::domain::{
    ConnectSource, ConnectionDescriptor, ConnectionSession, DomainError, ManualConnection, Profile,
    SessionSnapshot, SettingsDocument, SettingsPatch,
};
use crate::ports::{ConnectionGateway, SettingsStore};

/// Gateway dials are bounded; a hung backend surfaces as a plain failure
/// the user can retry instead of a spinner that never resolves.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// What the shell should present.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum BootstrapScreen {
    /// Launch state, before the settings reads complete.
    Init,
    /// Saved profiles exist; let the user pick one.
    ProfileSelection { error: Option<String> },
    /// No profiles, but a kept legacy connection is ready to go.
    AutoConnectReady { connection: ConnectionDescriptor },
    /// Nothing usable saved, or explicitly requested. The form is carried
    /// here so a failed attempt re-renders without losing what was typed.
    ManualEntry {
        form: ManualConnection,
        error: Option<String>,
    },
    Connecting,
    Connected { profile: Option<String> },
}

impl BootstrapScreen {
    fn manual_default() -> Self {
        BootstrapScreen::ManualEntry {
            form: ManualConnection {
                connection: ConnectionDescriptor::form_defaults(),
                save_as_profile: None,
                remember_connection: false,
            },
            error: None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            BootstrapScreen::Init => "init",
            BootstrapScreen::ProfileSelection { .. } => "profile_selection",
            BootstrapScreen::AutoConnectReady { .. } => "auto_connect_ready",
            BootstrapScreen::ManualEntry { .. } => "manual_entry",
            BootstrapScreen::Connecting => "connecting",
            BootstrapScreen::Connected { .. } => "connected",
        }
    }
}

/// Signals consumed by the navigation shell.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ShellSignal {
    /// Fired exactly once per successful connect transition.
    Connected { profile: Option<String> },
    /// The session was released (logout or profile switch).
    Disconnected,
}

struct State {
    screen: BootstrapScreen,
    session: ConnectionSession,
}

/// Launch state machine: decides the entry screen, drives connection
/// attempts through the gateway, and owns the single live session.
///
/// No other component may open or close a backend session. Re-entrant
/// connect attempts are refused here, in the machine, so the invariant
/// holds even if the UI fails to disable its button.
pub struct BootstrapOrchestrator {
    store: Arc<dyn SettingsStore>,
    registry: ProfileRegistry,
    gateway: Arc<dyn ConnectionGateway>,
    state: RwLock<State>,
    events: broadcast::Sender<ShellSignal>,
    connect_timeout: Duration,
}

impl BootstrapOrchestrator {
    pub fn new(
        store: Arc<dyn SettingsStore>,
        registry: ProfileRegistry,
        gateway: Arc<dyn ConnectionGateway>,
    ) -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            store,
            registry,
            gateway,
            state: RwLock::new(State {
                screen: BootstrapScreen::Init,
                session: ConnectionSession::Idle,
            }),
            events,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    #[cfg(test)]
    fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ShellSignal> {
        self.events.subscribe()
    }

    pub fn screen(&self) -> BootstrapScreen {
        self.state.read().screen.clone()
    }

    pub fn session(&self) -> SessionSnapshot {
        SessionSnapshot::from(&self.state.read().session)
    }

    /// Decide the entry screen. Both startup reads (the raw document and
    /// the derived profile list) complete before anything is decided; an
    /// unreadable document fails open to manual entry.
    pub async fn initialize(&self) -> BootstrapScreen {
        let (document, profiles) = tokio::join!(self.store.load(), self.registry.list());

        let document = match document {
            Ok(document) => document,
            Err(err) => {
                warn!(error = %err, "Settings unreadable, continuing without saved state");
                SettingsDocument::default()
            }
        };
        let presented = profiles.map(|p| p.len()).unwrap_or(0);

        let screen = if !document.profiles.is_empty() {
            BootstrapScreen::ProfileSelection { error: None }
        } else {
            match document.database_connection.clone() {
                Some(connection) if document.save_database_connection.unwrap_or(false) => {
                    BootstrapScreen::AutoConnectReady { connection }
                }
                _ => BootstrapScreen::manual_default(),
            }
        };

        info!(
            screen = screen.name(),
            profiles = presented,
            "Bootstrap entry decided"
        );
        self.state.write().screen = screen.clone();
        screen
    }

    /// Switch to the manual-entry form from either entry screen.
    pub fn request_manual_entry(&self) -> BootstrapScreen {
        let mut state = self.state.write();
        if state.session.is_connecting() {
            return state.screen.clone();
        }
        state.screen = BootstrapScreen::manual_default();
        state.screen.clone()
    }

    /// Drop the kept legacy connection and fall through to manual entry.
    /// Profiles and global paths are untouched.
    pub async fn forget_legacy(&self) -> Result<BootstrapScreen, DomainError> {
        self.store
            .save(SettingsPatch {
                database_connection: Patch::Clear,
                save_database_connection: Patch::Clear,
                ..SettingsPatch::default()
            })
            .await?;
        info!("Legacy connection forgotten");

        let mut state = self.state.write();
        state.screen = BootstrapScreen::manual_default();
        Ok(state.screen.clone())
    }

    /// Connect with a saved (or the synthesized legacy) profile.
    pub async fn connect_with_profile(&self, name: &str) -> Result<(), DomainError> {
        let profiles = self.registry.list().await?;
        let profile = profiles
            .into_iter()
            .find(|p| p.name == name)
            .ok_or_else(|| DomainError::NotFound(name.to_string()))?;
        self.attempt(ConnectSource::Profile(profile)).await
    }

    /// Connect with the kept legacy connection (auto-connect confirmation).
    pub async fn confirm_auto_connect(&self) -> Result<(), DomainError> {
        let document = self.store.load().await?;
        let connection = document
            .database_connection
            .clone()
            .filter(|_| document.has_persisted_legacy())
            .ok_or(DomainError::IncompleteDescriptor {
                missing: "saved connection",
            })?;
        self.attempt(ConnectSource::Legacy(connection)).await
    }

    /// Connect with the manual-entry form.
    pub async fn connect_manual(&self, form: ManualConnection) -> Result<(), DomainError> {
        self.attempt(ConnectSource::Manual(form)).await
    }

    /// Reconnect under a different profile. The existing session is
    /// released before the new dial; two sessions never coexist.
    pub async fn switch_profile(&self, name: &str) -> Result<(), DomainError> {
        let was_connected = {
            let mut state = self.state.write();
            if state.session.is_connecting() {
                return Err(DomainError::SessionActive);
            }
            let was = state.session.is_connected();
            state.session = ConnectionSession::Idle;
            was
        };

        if was_connected {
            self.gateway.disconnect().await;
            let _ = self.events.send(ShellSignal::Disconnected);
        }
        self.connect_with_profile(name).await
    }

    /// Shell-invoked logout: release the session, return to the entry
    /// decision. Persisted profiles and settings are untouched.
    pub async fn logout(&self) -> BootstrapScreen {
        self.gateway.disconnect().await;

        let was_connected = {
            let mut state = self.state.write();
            let was = state.session.is_connected();
            state.session = ConnectionSession::Idle;
            state.screen = BootstrapScreen::Init;
            was
        };
        if was_connected {
            let _ = self.events.send(ShellSignal::Disconnected);
        }

        info!("Logged out");
        self.initialize().await
    }

    /// Probe the live session.
    pub async fn check_connection(&self) -> bool {
        self.gateway.check().await
    }

    async fn attempt(&self, source: ConnectSource) -> Result<(), DomainError> {
        // Fail fast on incomplete descriptors; the gateway is never called
        // and no state changes.
        source.descriptor().validate()?;

        {
            let mut state = self.state.write();
            if !state.session.can_connect() {
                return Err(DomainError::SessionActive);
            }
            state.session = ConnectionSession::Connecting(source.clone());
            state.screen = BootstrapScreen::Connecting;
        }

        let dsn = source.descriptor().dsn();
        let result = match tokio::time::timeout(self.connect_timeout, self.gateway.connect(&dsn))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(DomainError::Gateway(
                "connection attempt timed out".to_string(),
            )),
        };

        if let Err(err) = result {
            let reason = err.to_string();
            warn!(error = %reason, "Connection attempt failed");
            let mut state = self.state.write();
            state.session = ConnectionSession::Failed {
                reason: reason.clone(),
            };
            state.screen = Self::failure_screen(&source, reason);
            return Err(err);
        }

        let profile_name = match &source {
            ConnectSource::Profile(profile) => Some(profile.name.clone()),
            ConnectSource::Manual(form) => form
                .save_as_profile
                .as_ref()
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty()),
            ConnectSource::Legacy(_) => None,
        };

        // The session is live from here on. A persistence failure below is
        // surfaced to the caller but does not tear the session down.
        let persisted = self.persist_outcome(&source, profile_name.clone()).await;

        {
            let mut state = self.state.write();
            state.session = ConnectionSession::Connected {
                profile: profile_name.clone(),
            };
            state.screen = BootstrapScreen::Connected {
                profile: profile_name.clone(),
            };
        }
        info!(profile = ?profile_name, "Connected");
        let _ = self.events.send(ShellSignal::Connected {
            profile: profile_name,
        });

        persisted
    }

    async fn persist_outcome(
        &self,
        source: &ConnectSource,
        profile_name: Option<String>,
    ) -> Result<(), DomainError> {
        match source {
            ConnectSource::Profile(profile) => {
                match self.registry.set_current(&profile.name).await {
                    // The synthesized legacy profile is not stored;
                    // there is nothing to point at.
                    Err(DomainError::NotFound(_)) => Ok(()),
                    other => other,
                }
            }
            ConnectSource::Manual(form) => {
                if let Some(name) = profile_name {
                    let profile = Profile {
                        name: name.clone(),
                        database_connection: form.connection.clone(),
                        blog_images_path: None,
                        blog_folder_path: None,
                        created_at: None,
                    };
                    self.registry.upsert(profile).await?;
                    self.registry.set_current(&name).await
                } else if form.remember_connection {
                    self.store
                        .save(SettingsPatch {
                            database_connection: Patch::Set(form.connection.clone()),
                            save_database_connection: Patch::Set(true),
                            ..SettingsPatch::default()
                        })
                        .await
                } else {
                    // Declining the save must not leave a stale credential
                    // behind from an earlier run.
                    self.store
                        .save(SettingsPatch {
                            database_connection: Patch::Clear,
                            save_database_connection: Patch::Set(false),
                            ..SettingsPatch::default()
                        })
                        .await
                }
            }
            ConnectSource::Legacy(_) => Ok(()),
        }
    }

    fn failure_screen(source: &ConnectSource, reason: String) -> BootstrapScreen {
        match source {
            ConnectSource::Profile(_) => BootstrapScreen::ProfileSelection {
                error: Some(reason),
            },
            ConnectSource::Manual(form) => BootstrapScreen::ManualEntry {
                form: form.clone(),
                error: Some(reason),
            },
            // A refused auto-connect drops into the manual form pre-filled
            // with the saved connection so the user can correct it.
            ConnectSource::Legacy(descriptor) => BootstrapScreen::ManualEntry {
                form: ManualConnection {
                    connection: descriptor.clone(),
                    save_as_profile: None,
                    remember_connection: true,
                },
                error: Some(reason),
            },
        }
    }
}
