pub mod config;
pub mod store;

pub use config::{AppConfig, ConfigError, LogFormat, StoreBackend};
pub use store::{InMemoryJobStore, MongoJobStore};
