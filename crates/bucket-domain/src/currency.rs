use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn minor_units(&self) -> u8 {
        minor_units_for(self.as_str())
    }

    /// Smallest representable amount, e.g. `0.01` for USD.
    pub fn minor_unit(&self) -> Decimal {
        minor_unit(self.minor_units())
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("USD")
    }
}

pub fn minor_units_for(code: &str) -> u8 {
    match code {
        "JPY" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

/// Largest number of decimal places a minor unit can have. Keeps
/// `amount / unit` representable for amounts up to about `7.9e20`.
pub const MAX_MINOR_UNITS: u8 = 8;

/// `10^-units`, with `units` capped at [`MAX_MINOR_UNITS`].
pub fn minor_unit(units: u8) -> Decimal {
    Decimal::new(1, u32::from(units.min(MAX_MINOR_UNITS)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn minor_units_follow_currency() {
        assert_eq!(CurrencyCode::new("usd").minor_unit(), dec!(0.01));
        assert_eq!(CurrencyCode::new("JPY").minor_unit(), dec!(1));
        assert_eq!(CurrencyCode::new("kwd").minor_unit(), dec!(0.001));
    }

    #[test]
    fn minor_unit_is_capped() {
        assert_eq!(minor_unit(8), dec!(0.00000001));
        assert_eq!(minor_unit(28), dec!(0.00000001));
    }
}
