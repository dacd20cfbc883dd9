//! Per-month and whole-timeline totals for overview tables.

use bucket_domain::{Category, MonthKey};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{month::MonthResult, timeline::BudgetTimeline};

/// Totals across all buckets for a single month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthTotals {
    pub start: Decimal,
    pub transactions: Decimal,
    pub slush: Decimal,
    pub critical_need: Decimal,
    pub critical_shortfall: Decimal,
    pub scaled: Decimal,
    pub unfilled: Decimal,
    pub leftover_slush: Decimal,
    #[serde(rename = "final")]
    pub final_total: Decimal,
}

/// Aggregate row covering every month of a timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimelineTotals {
    pub months: usize,
    pub opening: Decimal,
    pub closing: Decimal,
    pub transactions: Decimal,
    pub slush: Decimal,
    pub critical_shortfall: Decimal,
    pub unfilled: Decimal,
    pub leftover_slush: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineSummary {
    pub months: Vec<(MonthKey, MonthTotals)>,
    pub total: TimelineTotals,
}

pub struct SummaryService;

impl SummaryService {
    pub fn month_totals(result: &MonthResult) -> MonthTotals {
        MonthTotals {
            start: result.start.total(),
            transactions: result.transactions.total(),
            slush: result.slush,
            critical_need: result.crit_to_fill.total(),
            critical_shortfall: result.critical_shortfall(),
            scaled: result.scaled.total(),
            unfilled: result.unfilled.total(),
            leftover_slush: result.leftover_slush,
            final_total: result.final_values.total(),
        }
    }

    pub fn summarize(timeline: &BudgetTimeline) -> TimelineSummary {
        let months: Vec<(MonthKey, MonthTotals)> = timeline
            .months()
            .iter()
            .map(|(key, result)| (*key, Self::month_totals(result)))
            .collect();

        let sum = |field: fn(&MonthTotals) -> Decimal| -> Decimal {
            months.iter().map(|(_, totals)| field(totals)).sum()
        };
        let total = TimelineTotals {
            months: months.len(),
            opening: timeline.initial().total_value(),
            closing: months
                .last()
                .map(|(_, totals)| totals.final_total)
                .unwrap_or_else(|| timeline.initial().total_value()),
            transactions: sum(|totals| totals.transactions),
            slush: sum(|totals| totals.slush),
            critical_shortfall: sum(|totals| totals.critical_shortfall),
            unfilled: sum(|totals| totals.unfilled),
            leftover_slush: sum(|totals| totals.leftover_slush),
        };
        TimelineSummary { months, total }
    }

    /// Final value of one bucket at the end of each month.
    pub fn category_history(
        timeline: &BudgetTimeline,
        category: &Category,
    ) -> Option<Vec<(MonthKey, Decimal)>> {
        if !timeline.registry().contains(category) {
            return None;
        }
        timeline
            .months()
            .iter()
            .map(|(key, result)| result.final_values.get(category).map(|value| (*key, *value)))
            .collect()
    }
}
