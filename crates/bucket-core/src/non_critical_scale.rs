//! Spreads the slush left after critical refill across non-critical buckets.

use bucket_domain::CategoryMap;
use rust_decimal::Decimal;
use tracing::debug;

use crate::{
    allocation::largest_remainder,
    error::{CoreError, Stage, StageContext},
};

#[derive(Debug, Clone, PartialEq)]
pub struct NonCriticalOutcome {
    pub nc_to_fill: CategoryMap<Decimal>,
    /// `min(1, remaining / Σ NCToFill)`, or 1 when nothing is needed.
    pub scale_factor: Decimal,
    /// `NCToFill × f` before rounding.
    pub pre_scale: CategoryMap<Decimal>,
    pub scaled: CategoryMap<Decimal>,
    pub nc_filled: CategoryMap<Decimal>,
    pub unfilled: CategoryMap<Decimal>,
    /// Slush still unspent once every bucket is full.
    pub leftover_slush: Decimal,
}

pub struct NonCriticalScaler;

impl NonCriticalScaler {
    pub fn scale(
        s_cap_diff: &CategoryMap<Decimal>,
        is_crit: &CategoryMap<bool>,
        crit_filled: &CategoryMap<Decimal>,
        remaining_slush: Decimal,
        unit: Decimal,
    ) -> Result<NonCriticalOutcome, CoreError> {
        let stage = Stage::NonCriticalScale;
        let nc_to_fill = s_cap_diff
            .zip_with(is_crit, |headroom, critical| {
                if *critical {
                    Decimal::ZERO
                } else {
                    *headroom
                }
            })
            .at(stage)?;

        let need = nc_to_fill.total();
        let scale_factor = if need.is_zero() {
            Decimal::ONE
        } else {
            // Overflow only happens when the ratio is far above one.
            remaining_slush
                .checked_div(need)
                .map_or(Decimal::ONE, |ratio| ratio.min(Decimal::ONE))
        };
        let pre_scale = nc_to_fill.map(|headroom| headroom * scale_factor);

        let budget = remaining_slush.min(need);
        let shares = largest_remainder(budget, nc_to_fill.values(), unit)
            .map_err(|source| CoreError::Allocation { stage, source })?;
        let scaled = CategoryMap::from_values(nc_to_fill.registry(), shares).at(stage)?;

        let allocated = scaled.total();
        if allocated != budget {
            return Err(CoreError::ConservationViolation {
                stage,
                expected: budget,
                actual: allocated,
            });
        }

        let nc_filled = crit_filled
            .zip_with(&scaled, |value, grant| value + grant)
            .at(stage)?;
        let unfilled = nc_to_fill
            .zip_with(&scaled, |headroom, grant| headroom - grant)
            .at(stage)?;
        let leftover_slush = remaining_slush - budget;

        debug!(
            "non-critical need {}, factor {}, allocated {}",
            need, scale_factor, allocated
        );
        Ok(NonCriticalOutcome {
            nc_to_fill,
            scale_factor,
            pre_scale,
            scaled,
            nc_filled,
            unfilled,
            leftover_slush,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bucket_domain::CategoryRegistry;
    use rust_decimal_macros::dec;

    #[test]
    fn halves_fill_when_slush_covers_half_the_need() {
        let registry = CategoryRegistry::shared(["X", "Y"]).unwrap();
        let crit_filled = CategoryMap::from_values(&registry, vec![dec!(40), dec!(150)]).unwrap();
        let s_cap_diff = CategoryMap::from_values(&registry, vec![dec!(10), dec!(50)]).unwrap();
        let is_crit = CategoryMap::filled(&registry, false);

        let outcome =
            NonCriticalScaler::scale(&s_cap_diff, &is_crit, &crit_filled, dec!(30), dec!(0.01))
                .unwrap();
        assert_eq!(outcome.scale_factor, dec!(0.5));
        assert_eq!(outcome.pre_scale.values(), &[dec!(5), dec!(25)]);
        assert_eq!(outcome.scaled.values(), &[dec!(5), dec!(25)]);
        assert_eq!(outcome.nc_filled.values(), &[dec!(45), dec!(175)]);
        assert_eq!(outcome.unfilled.values(), &[dec!(5), dec!(25)]);
        assert_eq!(outcome.leftover_slush, dec!(0));
    }

    #[test]
    fn surplus_slush_is_left_over() {
        let registry = CategoryRegistry::shared(["Rent", "Fun"]).unwrap();
        let crit_filled = CategoryMap::from_values(&registry, vec![dec!(100), dec!(90)]).unwrap();
        let s_cap_diff = CategoryMap::from_values(&registry, vec![dec!(0), dec!(10)]).unwrap();
        let is_crit = CategoryMap::from_values(&registry, vec![true, false]).unwrap();

        let outcome =
            NonCriticalScaler::scale(&s_cap_diff, &is_crit, &crit_filled, dec!(25), dec!(0.01))
                .unwrap();
        assert_eq!(outcome.scale_factor, dec!(1));
        assert_eq!(outcome.scaled.values(), &[dec!(0), dec!(10)]);
        assert_eq!(outcome.nc_filled.values(), &[dec!(100), dec!(100)]);
        assert_eq!(outcome.leftover_slush, dec!(15));
    }

    #[test]
    fn zero_need_uses_unit_factor() {
        let registry = CategoryRegistry::shared(["Fun"]).unwrap();
        let crit_filled = CategoryMap::from_values(&registry, vec![dec!(100)]).unwrap();
        let s_cap_diff = CategoryMap::zeros(&registry);
        let is_crit = CategoryMap::filled(&registry, false);

        let outcome =
            NonCriticalScaler::scale(&s_cap_diff, &is_crit, &crit_filled, dec!(40), dec!(0.01))
                .unwrap();
        assert_eq!(outcome.scale_factor, Decimal::ONE);
        assert_eq!(outcome.scaled.total(), dec!(0));
        assert_eq!(outcome.leftover_slush, dec!(40));
    }
}
