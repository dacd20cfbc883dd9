//! Spends the slush fund on critical buckets before anything else.

use bucket_domain::CategoryMap;
use rust_decimal::Decimal;
use tracing::debug;

use crate::{
    allocation::largest_remainder,
    error::{CoreError, Stage, StageContext},
};

#[derive(Debug, Clone, PartialEq)]
pub struct CriticalFillOutcome {
    /// `Capacity − BeforeFill`, never negative.
    pub s_cap_diff: CategoryMap<Decimal>,
    pub crit_to_fill: CategoryMap<Decimal>,
    pub crit_filled: CategoryMap<Decimal>,
    /// Slush handed to each critical bucket.
    pub granted: CategoryMap<Decimal>,
    /// Slush still available for non-critical buckets.
    pub remaining_slush: Decimal,
}

impl CriticalFillOutcome {
    /// Critical headroom the slush fund could not cover.
    pub fn shortfall(&self) -> Decimal {
        self.crit_to_fill.total() - self.granted.total()
    }
}

pub struct CriticalFiller;

impl CriticalFiller {
    /// Fills critical buckets to capacity, or shares the slush proportionally
    /// to each bucket's headroom when it cannot cover them all.
    pub fn fill(
        before_fill: &CategoryMap<Decimal>,
        capacity: &CategoryMap<Decimal>,
        is_crit: &CategoryMap<bool>,
        slush: Decimal,
        unit: Decimal,
    ) -> Result<CriticalFillOutcome, CoreError> {
        let stage = Stage::CriticalFill;
        let s_cap_diff = capacity
            .zip_with(before_fill, |capacity, value| capacity - value)
            .at(stage)?;
        let crit_to_fill = s_cap_diff
            .zip_with(is_crit, |headroom, critical| {
                if *critical {
                    *headroom
                } else {
                    Decimal::ZERO
                }
            })
            .at(stage)?;

        let need = crit_to_fill.total();
        let (granted, remaining_slush) = if slush >= need {
            (crit_to_fill.clone(), slush - need)
        } else {
            let shares = largest_remainder(slush, crit_to_fill.values(), unit)
                .map_err(|source| CoreError::Allocation { stage, source })?;
            debug!("critical need {} exceeds slush {}, sharing proportionally", need, slush);
            (
                CategoryMap::from_values(before_fill.registry(), shares).at(stage)?,
                Decimal::ZERO,
            )
        };

        let crit_filled = before_fill
            .zip_with(&granted, |value, grant| value + grant)
            .at(stage)?;
        debug!(
            "critical fill spent {}, {} slush remaining",
            granted.total(),
            remaining_slush
        );
        Ok(CriticalFillOutcome {
            s_cap_diff,
            crit_to_fill,
            crit_filled,
            granted,
            remaining_slush,
        })
    }
}
