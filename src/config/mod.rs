pub mod database;
pub mod env_provider;
pub mod errors;
pub mod logging;
pub mod settings;

pub use env_provider::{EnvironmentProvider, MapEnvironment, SystemEnvironment};
pub use errors::ConfigError;
pub use logging::init_logging;
pub use settings::AppSettings;
