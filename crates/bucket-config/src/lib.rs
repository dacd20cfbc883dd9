//! bucket-config
//!
//! Persistent engine preferences: currency, rounding unit and the leftover
//! slush policy. Owns the Config data structure plus disk persistence helpers.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::Config;
