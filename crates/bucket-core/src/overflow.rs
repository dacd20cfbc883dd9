//! Clips buckets to capacity and pools the excess into the slush fund.

use bucket_domain::CategoryMap;
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{CoreError, Stage, StageContext};

#[derive(Debug, Clone, PartialEq)]
pub struct OverflowOutcome {
    /// `Capacity − AfterT`; negative where a bucket overflowed.
    pub cap_diff: CategoryMap<Decimal>,
    pub before_fill: CategoryMap<Decimal>,
    pub slush: Decimal,
}

pub struct OverflowExtractor;

impl OverflowExtractor {
    pub fn extract(
        after_t: &CategoryMap<Decimal>,
        capacity: &CategoryMap<Decimal>,
    ) -> Result<OverflowOutcome, CoreError> {
        let stage = Stage::OverflowExtraction;
        check_capacities(capacity, stage)?;

        let cap_diff = capacity
            .zip_with(after_t, |capacity, value| capacity - value)
            .at(stage)?;
        // Only the upper bound is clipped; negative balances stay negative.
        let before_fill = after_t
            .zip_with(capacity, |value, capacity| (*value).min(*capacity))
            .at(stage)?;
        let slush = cap_diff
            .values()
            .iter()
            .map(|diff| (-*diff).max(Decimal::ZERO))
            .sum::<Decimal>();

        let expected = after_t.total();
        let actual = before_fill.total() + slush;
        if actual != expected {
            return Err(CoreError::ConservationViolation {
                stage,
                expected,
                actual,
            });
        }

        debug!("extracted {} into the slush fund", slush);
        Ok(OverflowOutcome {
            cap_diff,
            before_fill,
            slush,
        })
    }
}

/// Rejects any negative capacity, naming the first offending category.
pub fn check_capacities(capacity: &CategoryMap<Decimal>, stage: Stage) -> Result<(), CoreError> {
    match capacity.iter().find(|(_, amount)| **amount < Decimal::ZERO) {
        Some((category, amount)) => Err(CoreError::NegativeCapacity {
            category: category.clone(),
            capacity: *amount,
            stage,
        }),
        None => Ok(()),
    }
}
