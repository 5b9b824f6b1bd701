use async_trait::async_trait;

use crate::domain::DomainError;

/// Backend dial port. The wire protocol behind it is opaque to the core;
/// the orchestrator only ever sees ok-or-message.
///
/// Implementations hold at most one open session. `connect` while a session
/// is open replaces nothing on its own — the orchestrator is responsible for
/// calling `disconnect` first, so two sessions are never held concurrently.
#[async_trait]
pub trait ConnectionGateway: Send + Sync {
    /// Open a session against the given DSN.
    async fn connect(&self, dsn: &str) -> Result<(), DomainError>;

    /// Release the current session, if any. Idempotent.
    async fn disconnect(&self);

    /// Probe whether the current session is still usable.
    async fn check(&self) -> bool;
}
