//! Config-driven entry point over the timeline builder.

use bucket_config::{Config, ConfigManager};
use bucket_core::{BudgetTimeline, EngineSettings, MonthInput, SummaryService, TimelineSummary};
use bucket_domain::BucketState;
use tracing::info;

use crate::errors::BudgetError;

/// Engine settings derived from stored preferences.
pub fn settings_from_config(config: &Config) -> EngineSettings {
    EngineSettings {
        minor_unit: config.minor_unit(),
        leftover_slush: config.leftover_slush,
    }
}

/// Runs timelines with one fixed set of settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetEngine {
    settings: EngineSettings,
}

impl Default for BudgetEngine {
    fn default() -> Self {
        Self::new(EngineSettings::default())
    }
}

impl BudgetEngine {
    pub fn new(settings: EngineSettings) -> Self {
        Self { settings }
    }

    pub fn from_config(config: &Config) -> Result<Self, BudgetError> {
        config.validate()?;
        Ok(Self::new(settings_from_config(config)))
    }

    /// Loads the stored config (defaults when nothing was saved yet).
    pub fn load(manager: &ConfigManager) -> Result<Self, BudgetError> {
        let config = manager.load()?;
        info!(
            "loaded engine config from {}: currency {}, leftover slush {}",
            manager.config_path().display(),
            config.currency,
            config.leftover_slush
        );
        Self::from_config(&config)
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn run(&self, initial: BucketState, inputs: &[MonthInput]) -> Result<BudgetTimeline, BudgetError> {
        Ok(BudgetTimeline::build(initial, inputs, self.settings)?)
    }

    pub fn summarize(&self, timeline: &BudgetTimeline) -> TimelineSummary {
        SummaryService::summarize(timeline)
    }

    pub fn to_json(&self, timeline: &BudgetTimeline) -> Result<String, BudgetError> {
        Ok(serde_json::to_string_pretty(timeline)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bucket_domain::SlushPolicy;
    use rust_decimal_macros::dec;

    #[test]
    fn settings_follow_config() {
        let config = Config {
            currency: "KWD".into(),
            minor_units: None,
            leftover_slush: SlushPolicy::CarryForward,
        };
        let settings = settings_from_config(&config);
        assert_eq!(settings.minor_unit, dec!(0.001));
        assert_eq!(settings.leftover_slush, SlushPolicy::CarryForward);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = Config {
            currency: "US".into(),
            ..Config::default()
        };
        assert!(matches!(
            BudgetEngine::from_config(&config),
            Err(BudgetError::Config(_))
        ));
    }

    #[test]
    fn minor_units_beyond_the_cap_are_rejected() {
        let too_fine = Config {
            minor_units: Some(28),
            ..Config::default()
        };
        assert!(matches!(
            BudgetEngine::from_config(&too_fine),
            Err(BudgetError::Config(_))
        ));

        let finest = Config {
            minor_units: Some(8),
            ..Config::default()
        };
        let engine = BudgetEngine::from_config(&finest).unwrap();
        assert_eq!(engine.settings().minor_unit, dec!(0.00000001));
    }
}
