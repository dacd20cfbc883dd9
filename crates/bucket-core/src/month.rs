//! One month of the bucket cycle and the record it leaves behind.

use bucket_domain::{BucketState, CategoryMap, Column, DomainError};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    critical_fill::CriticalFiller,
    error::{CoreError, Stage},
    non_critical_scale::NonCriticalScaler,
    overflow::OverflowExtractor,
    settings::EngineSettings,
    transaction_stage::{TransactionStage, TransactionTotals},
};

/// Every intermediate column computed for a month, in pipeline order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthResult {
    pub start: CategoryMap<Decimal>,
    pub transactions: CategoryMap<Decimal>,
    pub after_t: CategoryMap<Decimal>,
    pub capacity: CategoryMap<Decimal>,
    pub cap_diff: CategoryMap<Decimal>,
    /// Pooled slush: overflow extracted this month plus anything carried in.
    pub slush: Decimal,
    pub before_fill: CategoryMap<Decimal>,
    pub s_cap_diff: CategoryMap<Decimal>,
    pub is_crit: CategoryMap<bool>,
    pub crit_to_fill: CategoryMap<Decimal>,
    pub crit_filled: CategoryMap<Decimal>,
    pub nc_to_fill: CategoryMap<Decimal>,
    pub pre_scale: CategoryMap<Decimal>,
    pub scaled: CategoryMap<Decimal>,
    pub nc_filled: CategoryMap<Decimal>,
    #[serde(rename = "final")]
    pub final_values: CategoryMap<Decimal>,
    pub unfilled: CategoryMap<Decimal>,
    pub extracted_slush: Decimal,
    pub carried_in: Decimal,
    pub scale_factor: Decimal,
    pub leftover_slush: Decimal,
}

/// Borrowed view of a single month column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnView<'a> {
    Amounts(&'a CategoryMap<Decimal>),
    Flags(&'a CategoryMap<bool>),
    Scalar(Decimal),
}

impl MonthResult {
    pub fn column(&self, column: Column) -> ColumnView<'_> {
        match column {
            Column::Start => ColumnView::Amounts(&self.start),
            Column::Transactions => ColumnView::Amounts(&self.transactions),
            Column::AfterT => ColumnView::Amounts(&self.after_t),
            Column::Capacity => ColumnView::Amounts(&self.capacity),
            Column::CapDiff => ColumnView::Amounts(&self.cap_diff),
            Column::Slush => ColumnView::Scalar(self.slush),
            Column::BeforeFill => ColumnView::Amounts(&self.before_fill),
            Column::SCapDiff => ColumnView::Amounts(&self.s_cap_diff),
            Column::IsCrit => ColumnView::Flags(&self.is_crit),
            Column::CritToFill => ColumnView::Amounts(&self.crit_to_fill),
            Column::CritFilled => ColumnView::Amounts(&self.crit_filled),
            Column::NCToFill => ColumnView::Amounts(&self.nc_to_fill),
            Column::PreScale => ColumnView::Amounts(&self.pre_scale),
            Column::Scaled => ColumnView::Amounts(&self.scaled),
            Column::NCFilled => ColumnView::Amounts(&self.nc_filled),
            Column::Final => ColumnView::Amounts(&self.final_values),
            Column::Unfilled => ColumnView::Amounts(&self.unfilled),
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = (Column, ColumnView<'_>)> {
        Column::ALL
            .into_iter()
            .map(move |column| (column, self.column(column)))
    }

    /// Final values with this month's capacity and criticality.
    pub fn end_state(&self) -> Result<BucketState, DomainError> {
        BucketState::from_columns(&self.final_values, &self.capacity, &self.is_crit)
    }

    /// Slush the critical buckets received.
    pub fn critical_granted(&self) -> Decimal {
        self.crit_filled.total() - self.before_fill.total()
    }

    /// Critical headroom left unfunded.
    pub fn critical_shortfall(&self) -> Decimal {
        self.crit_to_fill.total() - self.critical_granted()
    }
}

pub struct MonthPipeline;

impl MonthPipeline {
    /// Runs transactions, overflow extraction, critical fill, and non-critical
    /// scaling against `start`.
    pub fn run(
        start: &BucketState,
        totals: &TransactionTotals,
        carried_in: Decimal,
        settings: &EngineSettings,
    ) -> Result<MonthResult, CoreError> {
        let start_values = start.values();
        let capacity = start.capacities();
        let is_crit = start.criticality();

        let transactions = TransactionStage::apply(&start_values, totals)?;
        let overflow = OverflowExtractor::extract(&transactions.after_t, &capacity)?;
        let slush = overflow.slush + carried_in;
        let critical = CriticalFiller::fill(
            &overflow.before_fill,
            &capacity,
            &is_crit,
            slush,
            settings.minor_unit,
        )?;
        let non_critical = NonCriticalScaler::scale(
            &critical.s_cap_diff,
            &is_crit,
            &critical.crit_filled,
            critical.remaining_slush,
            settings.minor_unit,
        )?;

        let final_values = non_critical.nc_filled.clone();
        let expected = overflow.before_fill.total() + slush;
        let actual = final_values.total() + non_critical.leftover_slush;
        if actual != expected {
            return Err(CoreError::ConservationViolation {
                stage: Stage::NonCriticalScale,
                expected,
                actual,
            });
        }

        if non_critical.leftover_slush > Decimal::ZERO {
            warn!(
                "{} slush left unassigned after filling every bucket",
                non_critical.leftover_slush
            );
        }
        debug!(
            "month closed at {} across {} bucket(s)",
            final_values.total(),
            final_values.len()
        );

        Ok(MonthResult {
            start: start_values,
            transactions: transactions.transactions,
            after_t: transactions.after_t,
            capacity,
            cap_diff: overflow.cap_diff,
            slush,
            before_fill: overflow.before_fill,
            s_cap_diff: critical.s_cap_diff,
            is_crit,
            crit_to_fill: critical.crit_to_fill,
            crit_filled: critical.crit_filled,
            nc_to_fill: non_critical.nc_to_fill,
            pre_scale: non_critical.pre_scale,
            scaled: non_critical.scaled,
            nc_filled: non_critical.nc_filled,
            final_values,
            unfilled: non_critical.unfilled,
            extracted_slush: overflow.slush,
            carried_in,
            scale_factor: non_critical.scale_factor,
            leftover_slush: non_critical.leftover_slush,
        })
    }
}
