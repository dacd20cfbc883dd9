//! Column catalog describing what a month or transition record exposes.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{bucket::Bucket, change_set::CategoryChange};

/// Shape of the data held by a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    /// One amount per category.
    Amount,
    /// One flag per category.
    Flag,
    /// A single pooled amount.
    Scalar,
}

/// Month record columns, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    Start,
    Transactions,
    AfterT,
    Capacity,
    CapDiff,
    Slush,
    BeforeFill,
    SCapDiff,
    IsCrit,
    CritToFill,
    CritFilled,
    NCToFill,
    PreScale,
    Scaled,
    NCFilled,
    Final,
    Unfilled,
}

impl Column {
    pub const ALL: [Column; 17] = [
        Column::Start,
        Column::Transactions,
        Column::AfterT,
        Column::Capacity,
        Column::CapDiff,
        Column::Slush,
        Column::BeforeFill,
        Column::SCapDiff,
        Column::IsCrit,
        Column::CritToFill,
        Column::CritFilled,
        Column::NCToFill,
        Column::PreScale,
        Column::Scaled,
        Column::NCFilled,
        Column::Final,
        Column::Unfilled,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Column::Start => "Start",
            Column::Transactions => "Transactions",
            Column::AfterT => "After T",
            Column::Capacity => "Capacity",
            Column::CapDiff => "Cap Diff",
            Column::Slush => "Slush",
            Column::BeforeFill => "Before Fill",
            Column::SCapDiff => "S Cap Diff",
            Column::IsCrit => "Is Crit",
            Column::CritToFill => "Crit To Fill",
            Column::CritFilled => "Crit Filled",
            Column::NCToFill => "NC To Fill",
            Column::PreScale => "Pre Scale",
            Column::Scaled => "Scaled",
            Column::NCFilled => "NC Filled",
            Column::Final => "Final",
            Column::Unfilled => "Unfilled",
        }
    }

    /// One-line explanation suitable for a header tooltip.
    pub fn description(self) -> &'static str {
        match self {
            Column::Start => "Bucket value at the start of the month",
            Column::Transactions => "Net transactions for the month",
            Column::AfterT => "Bucket value after transactions",
            Column::Capacity => "Bucket capacity",
            Column::CapDiff => "Capacity minus the value after transactions",
            Column::Slush => "Overflow pooled from buckets above capacity",
            Column::BeforeFill => "Bucket value after overflow moves to the slush fund",
            Column::SCapDiff => "Headroom left once overflow is removed",
            Column::IsCrit => "Critical buckets are refilled first",
            Column::CritToFill => "Amount needed to fill critical buckets",
            Column::CritFilled => "Bucket value after refilling critical buckets",
            Column::NCToFill => "Amount needed to fill non-critical buckets",
            Column::PreScale => "Non-critical fill scaled to the slush fund, before rounding",
            Column::Scaled => "Non-critical fill after rounding-safe allocation",
            Column::NCFilled => "Bucket value after refilling non-critical buckets",
            Column::Final => "Final bucket value",
            Column::Unfilled => "Non-critical headroom left unfunded",
        }
    }

    pub fn kind(self) -> ColumnKind {
        match self {
            Column::Slush => ColumnKind::Scalar,
            Column::IsCrit => ColumnKind::Flag,
            _ => ColumnKind::Amount,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One table cell of a snapshot or change-set row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Amount(Decimal),
    Flag(bool),
    Empty,
}

impl From<Option<Decimal>> for Cell {
    fn from(value: Option<Decimal>) -> Self {
        value.map_or(Cell::Empty, Cell::Amount)
    }
}

/// Columns of a bucket snapshot (transition endpoints and the initial state).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SnapshotColumn {
    Value,
    Capacity,
    IsCrit,
}

impl SnapshotColumn {
    pub const ALL: [SnapshotColumn; 3] = [
        SnapshotColumn::Value,
        SnapshotColumn::Capacity,
        SnapshotColumn::IsCrit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SnapshotColumn::Value => "Value",
            SnapshotColumn::Capacity => "Capacity",
            SnapshotColumn::IsCrit => "Is Crit",
        }
    }

    pub fn cell(self, bucket: &Bucket) -> Cell {
        match self {
            SnapshotColumn::Value => Cell::Amount(bucket.value),
            SnapshotColumn::Capacity => Cell::Amount(bucket.capacity),
            SnapshotColumn::IsCrit => Cell::Flag(bucket.is_critical),
        }
    }
}

/// Columns of a change set laid out per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeColumn {
    ValueDelta,
    ValueSet,
    CapacityDelta,
    CapacitySet,
    CritSet,
}

impl ChangeColumn {
    pub const ALL: [ChangeColumn; 5] = [
        ChangeColumn::ValueDelta,
        ChangeColumn::ValueSet,
        ChangeColumn::CapacityDelta,
        ChangeColumn::CapacitySet,
        ChangeColumn::CritSet,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ChangeColumn::ValueDelta => "Val Diff",
            ChangeColumn::ValueSet => "Set Val",
            ChangeColumn::CapacityDelta => "Cap Diff",
            ChangeColumn::CapacitySet => "Set Cap",
            ChangeColumn::CritSet => "Is Crit",
        }
    }

    /// The override this column shows; `Empty` when the category has none.
    pub fn cell(self, change: &CategoryChange) -> Cell {
        match self {
            ChangeColumn::ValueDelta => change.value.delta.into(),
            ChangeColumn::ValueSet => change.value.set.into(),
            ChangeColumn::CapacityDelta => change.capacity.delta.into(),
            ChangeColumn::CapacitySet => change.capacity.set.into(),
            ChangeColumn::CritSet => change.critical.map_or(Cell::Empty, Cell::Flag),
        }
    }
}
