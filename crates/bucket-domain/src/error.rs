use thiserror::Error;

use crate::category::Category;

/// Structural failures raised while building registry-bound data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("unknown category `{0}`")]
    UnknownCategory(Category),
    #[error("missing entry for category `{0}`")]
    MissingCategory(Category),
    #[error("duplicate category `{0}`")]
    DuplicateCategory(Category),
    #[error("per-category data does not belong to this registry")]
    RegistryMismatch,
    #[error("invalid month key `{0}`")]
    InvalidMonth(String),
}
