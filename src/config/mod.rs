//! Configuration subsystem.

pub mod loader;
pub mod schema;

pub use loader::{load_config, ConfigError};
pub use schema::{ClientConfig, Config, ServerConfig};
