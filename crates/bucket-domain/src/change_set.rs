//! Manual month-boundary overrides.

use std::{collections::BTreeMap, sync::Arc};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    bucket::Bucket,
    category::{Category, CategoryMap, CategoryRegistry},
    error::DomainError,
};

/// A delta and/or an absolute override for one amount.
///
/// When both are present the absolute `set` wins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Adjustment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set: Option<Decimal>,
}

impl Adjustment {
    pub fn delta(amount: Decimal) -> Self {
        Self {
            delta: Some(amount),
            set: None,
        }
    }

    pub fn set(amount: Decimal) -> Self {
        Self {
            delta: None,
            set: Some(amount),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.delta.is_none() && self.set.is_none()
    }

    pub fn apply(&self, base: Decimal) -> Decimal {
        match self.set {
            Some(value) => value,
            None => base + self.delta.unwrap_or(Decimal::ZERO),
        }
    }
}

/// Every override a change set may hold for a single category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryChange {
    #[serde(default, skip_serializing_if = "Adjustment::is_empty")]
    pub value: Adjustment,
    #[serde(default, skip_serializing_if = "Adjustment::is_empty")]
    pub capacity: Adjustment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical: Option<bool>,
}

impl CategoryChange {
    pub fn is_empty(&self) -> bool {
        self.value.is_empty() && self.capacity.is_empty() && self.critical.is_none()
    }

    pub fn apply(&self, bucket: &Bucket) -> Bucket {
        Bucket {
            value: self.value.apply(bucket.value),
            capacity: self.capacity.apply(bucket.capacity),
            is_critical: self.critical.unwrap_or(bucket.is_critical),
        }
    }
}

/// Sparse per-category overrides applied between two months.
///
/// Categories without an entry pass through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeSet {
    entries: BTreeMap<Category, CategoryChange>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(CategoryChange::is_empty)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, category: &Category) -> Option<&CategoryChange> {
        self.entries.get(category)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Category, &CategoryChange)> {
        self.entries.iter()
    }

    pub fn insert(&mut self, category: impl Into<Category>, change: CategoryChange) {
        self.entries.insert(category.into(), change);
    }

    pub fn entry_mut(&mut self, category: impl Into<Category>) -> &mut CategoryChange {
        self.entries.entry(category.into()).or_default()
    }

    /// Adds to any delta already recorded for the category.
    pub fn with_value_delta(mut self, category: impl Into<Category>, amount: Decimal) -> Self {
        let value = &mut self.entry_mut(category).value;
        value.delta = Some(value.delta.unwrap_or(Decimal::ZERO) + amount);
        self
    }

    pub fn with_value_set(mut self, category: impl Into<Category>, amount: Decimal) -> Self {
        self.entry_mut(category).value.set = Some(amount);
        self
    }

    /// Adds to any delta already recorded for the category.
    pub fn with_capacity_delta(mut self, category: impl Into<Category>, amount: Decimal) -> Self {
        let capacity = &mut self.entry_mut(category).capacity;
        capacity.delta = Some(capacity.delta.unwrap_or(Decimal::ZERO) + amount);
        self
    }

    pub fn with_capacity_set(mut self, category: impl Into<Category>, amount: Decimal) -> Self {
        self.entry_mut(category).capacity.set = Some(amount);
        self
    }

    pub fn with_critical(mut self, category: impl Into<Category>, is_critical: bool) -> Self {
        self.entry_mut(category).critical = Some(is_critical);
        self
    }

    /// Checks that every entry names a registered category.
    pub fn validate(&self, registry: &CategoryRegistry) -> Result<(), DomainError> {
        for category in self.entries.keys() {
            registry.require(category)?;
        }
        Ok(())
    }

    /// Expands the sparse entries into one (possibly empty) change per category.
    pub fn dense(&self, registry: &Arc<CategoryRegistry>) -> Result<CategoryMap<CategoryChange>, DomainError> {
        CategoryMap::from_sparse(
            registry,
            self.entries
                .iter()
                .map(|(category, change)| (category.clone(), *change)),
        )
    }
}
