pub mod bootstrap;
pub mod controller;
pub mod profiles;
#[cfg(test)]
pub(crate) mod testing;

pub use bootstrap::{BootstrapOrchestrator, BootstrapScreen, ShellSignal};
pub use controller::AppController;
pub use profiles::ProfileRegistry;
