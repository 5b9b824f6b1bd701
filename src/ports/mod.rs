pub mod gateway;
pub mod settings_store;

pub use gateway::ConnectionGateway;
pub use settings_store::SettingsStore;
