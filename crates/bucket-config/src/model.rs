use bucket_domain::{minor_unit, CurrencyCode, SlushPolicy, MAX_MINOR_UNITS};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Stores the preferences the engine runs with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "Config::default_currency")]
    pub currency: String,
    /// Overrides the currency's own number of decimal places.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minor_units: Option<u8>,
    #[serde(default)]
    pub leftover_slush: SlushPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: Self::default_currency(),
            minor_units: None,
            leftover_slush: SlushPolicy::default(),
        }
    }
}

impl Config {
    pub fn default_currency() -> String {
        "USD".into()
    }

    pub fn currency_code(&self) -> CurrencyCode {
        CurrencyCode::new(self.currency.trim())
    }

    pub fn resolved_minor_units(&self) -> u8 {
        self.minor_units
            .unwrap_or_else(|| self.currency_code().minor_units())
    }

    /// Rounding unit for proportional fills, e.g. `0.01` for USD.
    pub fn minor_unit(&self) -> Decimal {
        minor_unit(self.resolved_minor_units())
    }

    /// Parses and validates a stored config document.
    pub fn from_json(data: &str) -> Result<Self, ConfigError> {
        let config: Config =
            serde_json::from_str(data).map_err(|err| ConfigError::Serde(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates, then renders the document written to disk.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        self.validate()?;
        serde_json::to_string_pretty(self).map_err(|err| ConfigError::Serde(err.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let code = self.currency.trim();
        if code.len() != 3 || !code.chars().all(|ch| ch.is_ascii_alphabetic()) {
            return Err(ConfigError::Invalid(format!(
                "currency `{}` is not a three-letter ISO 4217 code",
                self.currency
            )));
        }
        if let Some(units) = self.minor_units {
            if units > MAX_MINOR_UNITS {
                return Err(ConfigError::Invalid(format!(
                    "minor units {} exceed the maximum of {}",
                    units, MAX_MINOR_UNITS
                )));
            }
        }
        Ok(())
    }
}
