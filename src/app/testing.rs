//! In-memory port implementations for unit tests.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::{DomainError, SettingsDocument, SettingsPatch};
use crate::ports::{ConnectionGateway, SettingsStore};

/// Settings store backed by a plain in-memory document.
#[derive(Default)]
pub struct MemorySettingsStore {
    document: Mutex<SettingsDocument>,
    saves: AtomicUsize,
    pub fail_loads: AtomicBool,
    pub fail_saves: AtomicBool,
}

impl MemorySettingsStore {
    pub fn document(&self) -> SettingsDocument {
        self.document.lock().clone()
    }

    pub fn mutate(&self, f: impl FnOnce(&mut SettingsDocument)) {
        f(&mut self.document.lock());
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn load(&self) -> Result<SettingsDocument, DomainError> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(DomainError::Persistence("load failed".to_string()));
        }
        Ok(self.document.lock().clone())
    }

    async fn save(&self, patch: SettingsPatch) -> Result<(), DomainError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(DomainError::Persistence("save failed".to_string()));
        }
        self.document.lock().apply(patch);
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn settings_path(&self) -> PathBuf {
        PathBuf::from("<memory>")
    }
}

/// Gateway that records calls and answers from a configurable script.
#[derive(Default)]
pub struct RecordingGateway {
    connect_calls: AtomicUsize,
    disconnect_calls: AtomicUsize,
    connected: AtomicBool,
    pub fail_with: Mutex<Option<String>>,
    pub last_dsn: Mutex<Option<String>>,
    /// When set, `connect` sleeps first; used to hold an attempt in flight.
    pub delay: Mutex<Option<Duration>>,
}

impl RecordingGateway {
    pub fn failing(message: &str) -> Self {
        let gateway = Self::default();
        *gateway.fail_with.lock() = Some(message.to_string());
        gateway
    }

    pub fn connect_calls(&self) -> usize {
        self.connect_calls.load(Ordering::SeqCst)
    }

    pub fn disconnect_calls(&self) -> usize {
        self.disconnect_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConnectionGateway for RecordingGateway {
    async fn connect(&self, dsn: &str) -> Result<(), DomainError> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_dsn.lock() = Some(dsn.to_string());

        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let failure = self.fail_with.lock().clone();
        match failure {
            Some(message) => Err(DomainError::Gateway(message)),
            None => {
                self.connected.store(true, Ordering::SeqCst);
                Ok(())
            }
        }
    }

    async fn disconnect(&self) {
        self.disconnect_calls.fetch_add(1, Ordering::SeqCst);
        self.connected.store(false, Ordering::SeqCst);
    }

    async fn check(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}
