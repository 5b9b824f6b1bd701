pub mod postgres_gateway;
pub mod settings_store;

pub use postgres_gateway::PostgresGateway;
pub use settings_store::JsonSettingsStore;
