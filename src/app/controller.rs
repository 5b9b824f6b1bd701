use std::sync::Arc;

use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

use crate::adapters::{JsonSettingsStore, PostgresGateway};
use crate::app::bootstrap::BootstrapOrchestrator;
use crate::app::profiles::ProfileRegistry;
use crate::domain::DomainError;
use crate::infrastructure::init_logging;
use crate::ports::{ConnectionGateway, SettingsStore};

/// Application controller: wires the settings store, logging, profile
/// registry and bootstrap orchestrator together and holds global state
/// for the Tauri layer.
pub struct AppController {
    store: Arc<JsonSettingsStore>,
    registry: ProfileRegistry,
    orchestrator: Arc<BootstrapOrchestrator>,
    _log_guard: Option<WorkerGuard>,
}

impl AppController {
    pub fn new() -> Result<Self, DomainError> {
        let store = Arc::new(JsonSettingsStore::new()?);
        let log_guard = init_logging(&store.logs_dir())?;

        info!("inkdesk starting up");

        let registry = ProfileRegistry::new(store.clone());
        let gateway: Arc<dyn ConnectionGateway> = Arc::new(PostgresGateway::new());
        let orchestrator = Arc::new(BootstrapOrchestrator::new(
            store.clone(),
            registry.clone(),
            gateway,
        ));

        info!(settings = ?store.settings_path(), "AppController initialized");

        Ok(Self {
            store,
            registry,
            orchestrator,
            _log_guard: log_guard,
        })
    }

    pub fn store(&self) -> Arc<dyn SettingsStore> {
        self.store.clone()
    }

    pub fn registry(&self) -> &ProfileRegistry {
        &self.registry
    }

    pub fn orchestrator(&self) -> Arc<BootstrapOrchestrator> {
        self.orchestrator.clone()
    }

    pub fn settings_path(&self) -> String {
        self.store.settings_path().to_string_lossy().to_string()
    }

    pub fn logs_dir(&self) -> String {
        self.store.logs_dir().to_string_lossy().to_string()
    }
}
