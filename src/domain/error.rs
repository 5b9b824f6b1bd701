use thiserror::Error;

/// Domain-level errors for inkdesk.
///
/// Validation errors (`EmptyName`, `NotFound`, `IncompleteDescriptor`,
/// `SessionActive`) are resolved inside the core and never reach the
/// connection gateway. Only `Gateway` and `Persistence` cross to the
/// user-visible layer, always with a plain message.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Profile name must not be empty")]
    EmptyName,

    #[error("No profile named \"{0}\"")]
    NotFound(String),

    #[error("Connection details incomplete: missing {missing}")]
    IncompleteDescriptor { missing: &'static str },

    #[error("{0}")]
    Gateway(String),

    #[error("Settings storage error: {0}")]
    Persistence(String),

    #[error("A connection attempt is already in progress")]
    SessionActive,
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Persistence(err.to_string())
    }
}
