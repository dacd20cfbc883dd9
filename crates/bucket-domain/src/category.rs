//! Category identifiers, the ordered registry, and maps keyed by it.

use std::{collections::HashMap, fmt, sync::Arc};

use rust_decimal::Decimal;
use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};

use crate::error::DomainError;

/// Opaque identifier for a budget bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The fixed, ordered set of categories every per-category map is keyed by.
///
/// Registries are immutable once built and are shared through an [`Arc`], so
/// maps created from the same registry can be combined position by position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Category>", into = "Vec<Category>")]
pub struct CategoryRegistry {
    categories: Vec<Category>,
    positions: HashMap<Category, usize>,
}

impl CategoryRegistry {
    /// Builds a registry, rejecting repeated identifiers.
    pub fn new<I, C>(categories: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = C>,
        C: Into<Category>,
    {
        let mut ordered = Vec::new();
        let mut positions = HashMap::new();
        for category in categories {
            let category = category.into();
            if positions.contains_key(&category) {
                return Err(DomainError::DuplicateCategory(category));
            }
            positions.insert(category.clone(), ordered.len());
            ordered.push(category);
        }
        Ok(Self {
            categories: ordered,
            positions,
        })
    }

    /// Convenience wrapper returning a shareable handle.
    pub fn shared<I, C>(categories: I) -> Result<Arc<Self>, DomainError>
    where
        I: IntoIterator<Item = C>,
        C: Into<Category>,
    {
        Self::new(categories).map(Arc::new)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn contains(&self, category: &Category) -> bool {
        self.positions.contains_key(category)
    }

    /// Registry position of `category`, if registered.
    pub fn position(&self, category: &Category) -> Option<usize> {
        self.positions.get(category).copied()
    }

    /// Resolves a category to its position or reports it as unknown.
    pub fn require(&self, category: &Category) -> Result<usize, DomainError> {
        self.position(category)
            .ok_or_else(|| DomainError::UnknownCategory(category.clone()))
    }
}

impl TryFrom<Vec<Category>> for CategoryRegistry {
    type Error = DomainError;

    fn try_from(value: Vec<Category>) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CategoryRegistry> for Vec<Category> {
    fn from(value: CategoryRegistry) -> Self {
        value.categories
    }
}

/// A dense mapping holding exactly one value per registered category.
///
/// Values are stored in registry order. Construction fails on keys outside
/// the registry, so the key set always equals the registry.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryMap<T> {
    registry: Arc<CategoryRegistry>,
    values: Vec<T>,
}

impl<T> CategoryMap<T> {
    pub fn from_fn(registry: &Arc<CategoryRegistry>, f: impl FnMut(&Category) -> T) -> Self {
        Self {
            registry: Arc::clone(registry),
            values: registry.iter().map(f).collect(),
        }
    }

    pub fn filled(registry: &Arc<CategoryRegistry>, value: T) -> Self
    where
        T: Clone,
    {
        Self::from_fn(registry, |_| value.clone())
    }

    /// Wraps values already laid out in registry order.
    pub fn from_values(registry: &Arc<CategoryRegistry>, values: Vec<T>) -> Result<Self, DomainError> {
        if values.len() != registry.len() {
            return Err(DomainError::RegistryMismatch);
        }
        Ok(Self {
            registry: Arc::clone(registry),
            values,
        })
    }

    /// Builds a map that must name every registered category exactly once.
    pub fn try_from_entries<I>(registry: &Arc<CategoryRegistry>, entries: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = (Category, T)>,
    {
        let mut slots: Vec<Option<T>> = registry.iter().map(|_| None).collect();
        for (category, value) in entries {
            let position = registry.require(&category)?;
            if slots[position].is_some() {
                return Err(DomainError::DuplicateCategory(category));
            }
            slots[position] = Some(value);
        }
        let mut values = Vec::with_capacity(slots.len());
        for (category, slot) in registry.iter().zip(slots) {
            match slot {
                Some(value) => values.push(value),
                None => return Err(DomainError::MissingCategory(category.clone())),
            }
        }
        Ok(Self {
            registry: Arc::clone(registry),
            values,
        })
    }

    /// Builds a map from sparse entries; unnamed categories take `T::default()`.
    pub fn from_sparse<I>(registry: &Arc<CategoryRegistry>, entries: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = (Category, T)>,
        T: Default,
    {
        let mut slots: Vec<Option<T>> = registry.iter().map(|_| None).collect();
        for (category, value) in entries {
            let position = registry.require(&category)?;
            if slots[position].is_some() {
                return Err(DomainError::DuplicateCategory(category));
            }
            slots[position] = Some(value);
        }
        Ok(Self {
            registry: Arc::clone(registry),
            values: slots.into_iter().map(Option::unwrap_or_default).collect(),
        })
    }

    pub fn registry(&self) -> &Arc<CategoryRegistry> {
        &self.registry
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, category: &Category) -> Option<&T> {
        self.registry
            .position(category)
            .and_then(|position| self.values.get(position))
    }

    /// Values in registry order.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Category, &T)> {
        self.registry.iter().zip(self.values.iter())
    }

    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> CategoryMap<U> {
        CategoryMap {
            registry: Arc::clone(&self.registry),
            values: self.values.iter().map(f).collect(),
        }
    }

    /// Returns `true` when both maps are keyed by the same registry.
    pub fn same_keys<U>(&self, other: &CategoryMap<U>) -> bool {
        Arc::ptr_eq(&self.registry, &other.registry) || self.registry == other.registry
    }

    /// Combines two maps category by category.
    pub fn zip_with<U, V>(
        &self,
        other: &CategoryMap<U>,
        mut f: impl FnMut(&T, &U) -> V,
    ) -> Result<CategoryMap<V>, DomainError> {
        if !self.same_keys(other) {
            return Err(DomainError::RegistryMismatch);
        }
        Ok(CategoryMap {
            registry: Arc::clone(&self.registry),
            values: self
                .values
                .iter()
                .zip(other.values.iter())
                .map(|(left, right)| f(left, right))
                .collect(),
        })
    }
}

impl CategoryMap<Decimal> {
    pub fn zeros(registry: &Arc<CategoryRegistry>) -> Self {
        Self::filled(registry, Decimal::ZERO)
    }

    /// Sum across every category.
    pub fn total(&self) -> Decimal {
        self.values.iter().copied().sum()
    }
}

impl<T: Serialize> Serialize for CategoryMap<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (category, value) in self.iter() {
            map.serialize_entry(category, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn registry() -> Arc<CategoryRegistry> {
        CategoryRegistry::shared(["Rent", "Food", "Fun"]).expect("valid registry")
    }

    #[test]
    fn registry_rejects_duplicates() {
        let err = CategoryRegistry::new(["Rent", "Rent"]).expect_err("duplicate");
        assert_eq!(err, DomainError::DuplicateCategory(Category::from("Rent")));
    }

    #[test]
    fn registry_keeps_declared_order() {
        let registry = registry();
        let names: Vec<&str> = registry.iter().map(Category::as_str).collect();
        assert_eq!(names, ["Rent", "Food", "Fun"]);
        assert_eq!(registry.position(&"Fun".into()), Some(2));
    }

    #[test]
    fn sparse_map_defaults_missing_and_rejects_unknown() {
        let registry = registry();
        let map = CategoryMap::from_sparse(&registry, [(Category::from("Food"), dec!(12.50))])
            .expect("known key");
        assert_eq!(map.values(), &[dec!(0), dec!(12.50), dec!(0)]);

        let err = CategoryMap::from_sparse(&registry, [(Category::from("Pets"), dec!(1))])
            .expect_err("unknown key");
        assert_eq!(err, DomainError::UnknownCategory("Pets".into()));
    }

    #[test]
    fn exact_entries_require_every_category() {
        let registry = registry();
        let err = CategoryMap::try_from_entries(
            &registry,
            [(Category::from("Rent"), 1), (Category::from("Fun"), 3)],
        )
        .expect_err("Food missing");
        assert_eq!(err, DomainError::MissingCategory("Food".into()));
    }

    #[test]
    fn zip_with_refuses_foreign_registry() {
        let left = CategoryMap::zeros(&registry());
        let other = CategoryRegistry::shared(["Rent"]).expect("valid registry");
        let right = CategoryMap::zeros(&other);
        assert_eq!(
            left.zip_with(&right, |a, b| a + b).expect_err("mismatch"),
            DomainError::RegistryMismatch
        );
    }

    #[test]
    fn serializes_in_registry_order() {
        let registry = registry();
        let map = CategoryMap::from_fn(&registry, |category| category.as_str().len());
        let json = serde_json::to_string(&map).expect("serialize");
        assert_eq!(json, r#"{"Rent":4,"Food":4,"Fun":3}"#);
    }
}
