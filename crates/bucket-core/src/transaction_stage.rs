//! Applies a month's net transactions to the starting bucket values.

use std::collections::BTreeMap;

use bucket_domain::{Category, CategoryMap};
use rust_decimal::Decimal;
use tracing::debug;

use crate::error::{CoreError, Stage, StageContext};

/// Net transaction amount per category, as produced by categorization.
/// Categories without an entry had no activity.
pub type TransactionTotals = BTreeMap<Category, Decimal>;

#[derive(Debug, Clone, PartialEq)]
pub struct TransactionOutcome {
    pub transactions: CategoryMap<Decimal>,
    pub after_t: CategoryMap<Decimal>,
}

pub struct TransactionStage;

impl TransactionStage {
    /// `AfterT = Start + Transactions`, with no clamping.
    pub fn apply(
        start: &CategoryMap<Decimal>,
        totals: &TransactionTotals,
    ) -> Result<TransactionOutcome, CoreError> {
        let transactions = CategoryMap::from_sparse(
            start.registry(),
            totals.iter().map(|(category, amount)| (category.clone(), *amount)),
        )
        .at(Stage::Transactions)?;
        let after_t = start
            .zip_with(&transactions, |value, delta| value + delta)
            .at(Stage::Transactions)?;
        debug!(
            "applied {} transaction total(s), net {}",
            totals.len(),
            transactions.total()
        );
        Ok(TransactionOutcome {
            transactions,
            after_t,
        })
    }
}
