use bucket_config::ConfigError;
use bucket_core::TimelineError;
use bucket_domain::DomainError;
use thiserror::Error;

/// Error type covering everything the facade can fail on.
#[derive(Debug, Error)]
pub enum BudgetError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Timeline error: {0}")]
    Timeline(#[from] TimelineError),
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
