//! Month boundary: carries final state forward with manual overrides.

use bucket_domain::{BucketState, CategoryChange, CategoryMap, ChangeSet, DomainError};
use serde::Serialize;
use tracing::debug;

use crate::{
    error::{CoreError, Stage, StageContext},
    overflow::check_capacities,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionFull {
    pub end_previous: BucketState,
    pub changes: ChangeSet,
    pub start_next: BucketState,
}

impl TransitionFull {
    /// The change set laid out per category, empty where nothing changed.
    pub fn dense_changes(&self) -> Result<CategoryMap<CategoryChange>, DomainError> {
        self.changes.dense(self.end_previous.registry())
    }
}

pub struct TransitionBuilder;

impl TransitionBuilder {
    pub fn build(end_previous: BucketState, changes: ChangeSet) -> Result<TransitionFull, CoreError> {
        let stage = Stage::Transition;
        let dense = changes.dense(end_previous.registry()).at(stage)?;
        let buckets = end_previous
            .buckets()
            .zip_with(&dense, |bucket, change| change.apply(bucket))
            .at(stage)?;
        let start_next = BucketState::new(buckets);
        check_capacities(&start_next.capacities(), stage)?;

        debug!(
            "transition applied {} change(s), value {} -> {}",
            changes.len(),
            end_previous.total_value(),
            start_next.total_value()
        );
        Ok(TransitionFull {
            end_previous,
            changes,
            start_next,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bucket_domain::{Bucket, CategoryRegistry};
    use rust_decimal_macros::dec;

    fn end_state() -> BucketState {
        let registry = CategoryRegistry::shared(["Rent", "Fun"]).unwrap();
        BucketState::from_entries(
            &registry,
            [
                ("Rent", Bucket::new(dec!(1000), dec!(1000)).critical()),
                ("Fun", Bucket::new(dec!(40), dec!(100))),
            ],
        )
        .unwrap()
    }

    #[test]
    fn empty_change_set_passes_state_through() {
        let transition = TransitionBuilder::build(end_state(), ChangeSet::new()).unwrap();
        assert_eq!(transition.start_next, transition.end_previous);
    }

    #[test]
    fn applies_deltas_sets_and_flags() {
        let changes = ChangeSet::new()
            .with_value_delta("Fun", dec!(15))
            .with_capacity_set("Fun", dec!(250))
            .with_capacity_delta("Rent", dec!(50))
            .with_critical("Rent", false);
        let transition = TransitionBuilder::build(end_state(), changes).unwrap();

        let rent = transition.start_next.get(&"Rent".into()).unwrap();
        assert_eq!(*rent, Bucket::new(dec!(1000), dec!(1050)));
        let fun = transition.start_next.get(&"Fun".into()).unwrap();
        assert_eq!(*fun, Bucket::new(dec!(55), dec!(250)));
    }

    #[test]
    fn rejects_unknown_category() {
        let changes = ChangeSet::new().with_value_set("Boat", dec!(1));
        let err = TransitionBuilder::build(end_state(), changes).expect_err("unknown");
        assert_eq!(
            err,
            CoreError::UnknownCategory {
                category: "Boat".into(),
                stage: Stage::Transition,
            }
        );
    }

    #[test]
    fn rejects_negative_resulting_capacity() {
        let changes = ChangeSet::new().with_capacity_delta("Fun", dec!(-100.01));
        let err = TransitionBuilder::build(end_state(), changes).expect_err("negative capacity");
        assert_eq!(
            err,
            CoreError::NegativeCapacity {
                category: "Fun".into(),
                capacity: dec!(-0.01),
                stage: Stage::Transition,
            }
        );
    }
}
