use bucket_domain::{minor_unit, CurrencyCode, SlushPolicy};
use rust_decimal::Decimal;
use serde::Serialize;

/// Knobs the engine reads while running a timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EngineSettings {
    /// Smallest currency amount the proportional split rounds to.
    pub minor_unit: Decimal,
    pub leftover_slush: SlushPolicy,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::for_currency(&CurrencyCode::default())
    }
}

impl EngineSettings {
    pub fn for_currency(code: &CurrencyCode) -> Self {
        Self {
            minor_unit: code.minor_unit(),
            leftover_slush: SlushPolicy::default(),
        }
    }

    pub fn with_minor_units(mut self, units: u8) -> Self {
        self.minor_unit = minor_unit(units);
        self
    }

    pub fn with_slush_policy(mut self, policy: SlushPolicy) -> Self {
        self.leftover_slush = policy;
        self
    }
}
