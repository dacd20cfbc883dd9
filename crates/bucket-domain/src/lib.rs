//! bucket-domain
//!
//! Pure domain models for bucket budgeting (categories, bucket snapshots, change sets).
//! No I/O, no engine logic. Only data types, registry-bound maps, and core enums.

pub mod bucket;
pub mod category;
pub mod change_set;
pub mod column;
pub mod common;
pub mod currency;
pub mod error;

pub use bucket::*;
pub use category::*;
pub use change_set::*;
pub use column::*;
pub use common::*;
pub use currency::*;
pub use error::DomainError;
