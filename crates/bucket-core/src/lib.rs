//! bucket-core
//!
//! The monthly bucket-allocation engine: transactions, overflow extraction,
//! critical refill, proportional non-critical refill, and month transitions.
//! Depends on bucket-domain. No CLI, no terminal I/O, no storage.

pub mod allocation;
pub mod critical_fill;
pub mod error;
pub mod month;
pub mod non_critical_scale;
pub mod overflow;
pub mod settings;
pub mod summary_service;
pub mod timeline;
pub mod transaction_stage;
pub mod transition;

pub use allocation::{largest_remainder, AllocationError};
pub use critical_fill::*;
pub use error::{CoreError, Stage, StageContext, TimelineError};
pub use month::*;
pub use non_critical_scale::*;
pub use overflow::*;
pub use settings::EngineSettings;
pub use summary_service::*;
pub use timeline::*;
pub use transaction_stage::*;
pub use transition::*;

#[cfg(test)]
mod tests;
