pub mod error;
pub mod session;
pub mod settings;

pub use error::DomainError;
pub use session::{ConnectSource, ConnectionSession, ManualConnection, SessionSnapshot};
pub use settings::{ConnectionDescriptor, Patch, Profile, SettingsDocument, SettingsPatch};
