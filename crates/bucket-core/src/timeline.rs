//! Multi-month ledger: months and the transitions between them.

use std::sync::Arc;

use bucket_domain::{
    BucketState, Category, CategoryRegistry, ChangeSet, MonthKey, SlushPolicy, TransitionKey,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    error::{CoreError, Stage, StageContext, TimelineError},
    month::{MonthPipeline, MonthResult},
    overflow::check_capacities,
    settings::EngineSettings,
    transaction_stage::TransactionTotals,
    transition::{TransitionBuilder, TransitionFull},
};

/// Inputs for one month: its transaction totals and the changes applied on
/// the way out of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthInput {
    pub month: MonthKey,
    #[serde(default)]
    pub transactions: TransactionTotals,
    #[serde(default)]
    pub changes: ChangeSet,
}

impl MonthInput {
    pub fn new(month: MonthKey) -> Self {
        Self {
            month,
            transactions: TransactionTotals::new(),
            changes: ChangeSet::new(),
        }
    }

    /// Adds to any amount already recorded for the category.
    pub fn with_transaction(mut self, category: impl Into<Category>, amount: Decimal) -> Self {
        *self
            .transactions
            .entry(category.into())
            .or_insert(Decimal::ZERO) += amount;
        self
    }

    pub fn with_changes(mut self, changes: ChangeSet) -> Self {
        self.changes = changes;
        self
    }
}

/// The completed month/transition sequence.
///
/// Built by folding month inputs left to right; never mutated afterwards.
/// `transitions[i]` connects `months[i]` and `months[i + 1]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetTimeline {
    #[serde(skip)]
    registry: Arc<CategoryRegistry>,
    settings: EngineSettings,
    initial: BucketState,
    months: Vec<(MonthKey, MonthResult)>,
    transitions: Vec<(TransitionKey, TransitionFull)>,
    pending_changes: ChangeSet,
}

impl BudgetTimeline {
    /// A timeline with no months yet.
    pub fn empty(initial: BucketState, settings: EngineSettings) -> Result<Self, TimelineError> {
        check_capacities(&initial.capacities(), Stage::Initial)
            .map_err(|source| TimelineError::Initial { source })?;
        Ok(Self {
            registry: Arc::clone(initial.registry()),
            settings,
            initial,
            months: Vec::new(),
            transitions: Vec::new(),
            pending_changes: ChangeSet::new(),
        })
    }

    /// Runs every month in order, stopping at the first failure.
    pub fn build(
        initial: BucketState,
        inputs: &[MonthInput],
        settings: EngineSettings,
    ) -> Result<Self, TimelineError> {
        let timeline = inputs
            .iter()
            .try_fold(Self::empty(initial, settings)?, |timeline, input| {
                timeline.append(input)
            })?;
        info!(
            "built timeline with {} month(s) over {} bucket(s)",
            timeline.months.len(),
            timeline.registry.len()
        );
        Ok(timeline)
    }

    /// Returns a new timeline extended by one month.
    ///
    /// The previous month's pending changes become the transition into
    /// `input.month`, which must come strictly after the last month.
    pub fn append(mut self, input: &MonthInput) -> Result<Self, TimelineError> {
        let index = self.months.len();
        let start = match self.months.last() {
            Some((previous, result)) => {
                let previous = *previous;
                if input.month <= previous {
                    return Err(TimelineError::MonthOrder {
                        index,
                        month: input.month,
                        previous,
                    });
                }
                let key = TransitionKey::new(previous, input.month);
                let transition = Self::transition_after(result, &self.pending_changes).map_err(
                    |source| TimelineError::Transition {
                        index: index - 1,
                        key,
                        source,
                    },
                )?;
                let start = transition.start_next.clone();
                self.transitions.push((key, transition));
                start
            }
            None => self.initial.clone(),
        };

        let month_error = |source: CoreError| TimelineError::Month {
            index,
            month: input.month,
            source,
        };
        let result = MonthPipeline::run(&start, &input.transactions, self.carried_slush(), &self.settings)
            .map_err(month_error)?;
        input
            .changes
            .validate(&self.registry)
            .at(Stage::Transition)
            .map_err(month_error)?;

        debug!("month {} computed, final total {}", input.month, result.final_values.total());
        self.months.push((input.month, result));
        self.pending_changes = input.changes.clone();
        Ok(self)
    }

    fn transition_after(result: &MonthResult, changes: &ChangeSet) -> Result<TransitionFull, CoreError> {
        let end_previous = result.end_state().at(Stage::Transition)?;
        TransitionBuilder::build(end_previous, changes.clone())
    }

    /// Slush the next month starts with under the configured policy.
    fn carried_slush(&self) -> Decimal {
        match (self.settings.leftover_slush, self.months.last()) {
            (SlushPolicy::CarryForward, Some((_, result))) => result.leftover_slush,
            _ => Decimal::ZERO,
        }
    }

    pub fn registry(&self) -> &Arc<CategoryRegistry> {
        &self.registry
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn initial(&self) -> &BucketState {
        &self.initial
    }

    pub fn months(&self) -> &[(MonthKey, MonthResult)] {
        &self.months
    }

    pub fn month(&self, key: MonthKey) -> Option<&MonthResult> {
        self.months
            .iter()
            .find(|(month, _)| *month == key)
            .map(|(_, result)| result)
    }

    pub fn transitions(&self) -> &[(TransitionKey, TransitionFull)] {
        &self.transitions
    }

    /// Changes supplied with the last month, not yet applied to any transition.
    pub fn pending_changes(&self) -> &ChangeSet {
        &self.pending_changes
    }

    pub fn final_state(&self) -> Option<Result<BucketState, CoreError>> {
        self.months
            .last()
            .map(|(_, result)| result.end_state().at(Stage::Transition))
    }

    /// The transition a following month would start from, using the pending changes.
    pub fn projected_start(&self) -> Option<Result<TransitionFull, CoreError>> {
        self.months
            .last()
            .map(|(_, result)| Self::transition_after(result, &self.pending_changes))
    }
}
