//! Bucket snapshots: value, capacity ceiling, and criticality per category.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    category::{Category, CategoryMap, CategoryRegistry},
    error::DomainError,
};

/// A single bucket at a point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bucket {
    pub value: Decimal,
    pub capacity: Decimal,
    #[serde(default)]
    pub is_critical: bool,
}

impl Bucket {
    pub fn new(value: Decimal, capacity: Decimal) -> Self {
        Self {
            value,
            capacity,
            is_critical: false,
        }
    }

    pub fn critical(mut self) -> Self {
        self.is_critical = true;
        self
    }
}

/// Immutable per-category snapshot of every bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BucketState {
    buckets: CategoryMap<Bucket>,
}

impl BucketState {
    pub fn new(buckets: CategoryMap<Bucket>) -> Self {
        Self { buckets }
    }

    /// Builds a snapshot that names every registered category exactly once.
    pub fn from_entries<I, C>(registry: &Arc<CategoryRegistry>, entries: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = (C, Bucket)>,
        C: Into<Category>,
    {
        let entries = entries
            .into_iter()
            .map(|(category, bucket)| (category.into(), bucket));
        CategoryMap::try_from_entries(registry, entries).map(Self::new)
    }

    /// Reassembles a snapshot from the value, capacity, and criticality columns.
    pub fn from_columns(
        values: &CategoryMap<Decimal>,
        capacities: &CategoryMap<Decimal>,
        critical: &CategoryMap<bool>,
    ) -> Result<Self, DomainError> {
        let partial = values.zip_with(capacities, |value, capacity| Bucket::new(*value, *capacity))?;
        let buckets = partial.zip_with(critical, |bucket, is_critical| Bucket {
            is_critical: *is_critical,
            ..*bucket
        })?;
        Ok(Self::new(buckets))
    }

    pub fn registry(&self) -> &Arc<CategoryRegistry> {
        self.buckets.registry()
    }

    pub fn buckets(&self) -> &CategoryMap<Bucket> {
        &self.buckets
    }

    pub fn get(&self, category: &Category) -> Option<&Bucket> {
        self.buckets.get(category)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Category, &Bucket)> {
        self.buckets.iter()
    }

    pub fn values(&self) -> CategoryMap<Decimal> {
        self.buckets.map(|bucket| bucket.value)
    }

    pub fn capacities(&self) -> CategoryMap<Decimal> {
        self.buckets.map(|bucket| bucket.capacity)
    }

    pub fn criticality(&self) -> CategoryMap<bool> {
        self.buckets.map(|bucket| bucket.is_critical)
    }

    pub fn total_value(&self) -> Decimal {
        self.buckets.values().iter().map(|bucket| bucket.value).sum()
    }
}
