use serde::{Deserialize, Serialize};

use crate::domain::settings::{ConnectionDescriptor, Profile};

/// Where a connection attempt originated. Determines what gets persisted
/// on success and which screen an attempt falls back to on failure.
#[derive(Clone, Debug, PartialEq)]
pub enum ConnectSource {
    /// A saved profile picked from the selection screen.
    Profile(Profile),
    /// The legacy single-connection block (auto-connect path).
    Legacy(ConnectionDescriptor),
    /// The manual-entry form.
    Manual(ManualConnection),
}

impl ConnectSource {
    pub fn descriptor(&self) -> &ConnectionDescriptor {
        match self {
            ConnectSource::Profile(profile) => &profile.database_connection,
            ConnectSource::Legacy(descriptor) => descriptor,
            ConnectSource::Manual(form) => &form.connection,
        }
    }
}

/// Payload submitted from the manual-entry form. Also serialized back to
/// the shell so a failed attempt re-renders with the form intact.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ManualConnection {
    pub connection: ConnectionDescriptor,
    /// When set, save the connection as a named profile on success.
    #[serde(default)]
    pub save_as_profile: Option<String>,
    /// Legacy "save connection" toggle. On success, `true` persists the
    /// legacy block; `false` explicitly clears any stale stored credential.
    #[serde(default)]
    pub remember_connection: bool,
}

/// The single live backend session, owned exclusively by the orchestrator.
///
/// Transitions:
/// - Idle -> Connecting (user-triggered attempt)
/// - Connecting -> Connected (gateway success)
/// - Connecting -> Failed (gateway failure, reason kept for display)
/// - Failed -> Connecting (retry)
/// - Connected | Connecting | Failed -> Idle (logout / teardown)
///
/// At most one session may be Connecting or Connected at any time; a new
/// attempt while one is in flight is refused in the machine itself, not
/// just by disabling the button.
#[derive(Clone, Debug, PartialEq)]
pub enum ConnectionSession {
    Idle,
    Connecting(ConnectSource),
    Connected { profile: Option<String> },
    Failed { reason: String },
}

impl ConnectionSession {
    /// Whether a new connection attempt may be started from this state.
    #[must_use]
    pub fn can_connect(&self) -> bool {
        matches!(self, ConnectionSession::Idle | ConnectionSession::Failed { .. })
    }

    /// Whether a live session exists that must be torn down before dialing
    /// somewhere else.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionSession::Connected { .. })
    }

    #[must_use]
    pub fn is_connecting(&self) -> bool {
        matches!(self, ConnectionSession::Connecting(_))
    }
}

impl Default for ConnectionSession {
    fn default() -> Self {
        ConnectionSession::Idle
    }
}

/// Serializable snapshot of the session for the shell/UI.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionSnapshot {
    Idle,
    Connecting,
    Connected { profile: Option<String> },
    Failed { reason: String },
}

impl From<&ConnectionSession> for SessionSnapshot {
    fn from(session: &ConnectionSession) -> Self {
        match session {
            ConnectionSession::Idle => SessionSnapshot::Idle,
            ConnectionSession::Connecting(_) => SessionSnapshot::Connecting,
            ConnectionSession::Connected { profile } => SessionSnapshot::Connected {
                profile: profile.clone(),
            },
            ConnectionSession::Failed { reason } => SessionSnapshot::Failed {
                reason: reason.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> ConnectionDescriptor {
        ConnectionDescriptor {
            host: "localhost".to_string(),
            port: "5432".to_string(),
            database: "blog".to_string(),
            username: "postgres".to_string(),
            password: String::new(),
        }
    }

    #[test]
    fn test_can_connect_only_when_no_session_in_flight() {
        assert!(ConnectionSession::Idle.can_connect());
        assert!(ConnectionSession::Failed {
            reason: "auth error".to_string()
        }
        .can_connect());

        assert!(!ConnectionSession::Connecting(ConnectSource::Legacy(descriptor())).can_connect());
        assert!(!ConnectionSession::Connected { profile: None }.can_connect());
    }

    #[test]
    fn test_connected_requires_teardown() {
        let session = ConnectionSession::Connected {
            profile: Some("Home".to_string()),
        };
        assert!(session.is_connected());
        assert!(!session.can_connect());
    }

    #[test]
    fn test_source_descriptor_resolution() {
        let manual = ConnectSource::Manual(ManualConnection {
            connection: descriptor(),
            save_as_profile: None,
            remember_connection: false,
        });
        assert_eq!(manual.descriptor().host, "localhost");

        let legacy = ConnectSource::Legacy(descriptor());
        assert_eq!(legacy.descriptor().database, "blog");
    }

    #[test]
    fn test_snapshot_hides_source_payload() {
        let session = ConnectionSession::Connecting(ConnectSource::Legacy(descriptor()));
        assert_eq!(SessionSnapshot::from(&session), SessionSnapshot::Connecting);
    }
}
