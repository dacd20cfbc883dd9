#![doc(test(attr(deny(warnings))))]

//! Bucket Budget runs a month-by-month bucket allocation over a fixed set of
//! categories: overflow becomes slush, slush refills critical buckets first,
//! then the rest in proportion to their headroom.

pub mod engine;
pub mod errors;
pub mod scenarios;
pub mod utils;

use std::sync::Once;

pub use bucket_config::{Config, ConfigError, ConfigManager};
pub use bucket_core::{
    BudgetTimeline, CoreError, EngineSettings, MonthInput, MonthResult, Stage, SummaryService,
    TimelineError, TransitionFull,
};
pub use bucket_domain::{
    Bucket, BucketState, Category, CategoryRegistry, ChangeSet, Column, DomainError, MonthKey,
    SlushPolicy,
};
pub use engine::{settings_from_config, BudgetEngine};
pub use errors::BudgetError;
pub use scenarios::{run_scenarios, Scenario, ScenarioOutcome};

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Bucket Budget tracing initialized.");
    });
}
