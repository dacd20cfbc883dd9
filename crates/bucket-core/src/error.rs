use std::fmt;

use bucket_domain::{Category, DomainError, MonthKey, TransitionKey};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

use crate::allocation::AllocationError;

/// Pipeline step an error was raised in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Initial,
    Transactions,
    OverflowExtraction,
    CriticalFill,
    NonCriticalScale,
    Transition,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::Initial => "initial state",
            Stage::Transactions => "transactions",
            Stage::OverflowExtraction => "overflow extraction",
            Stage::CriticalFill => "critical fill",
            Stage::NonCriticalScale => "non-critical scale",
            Stage::Transition => "transition",
        };
        f.write_str(label)
    }
}

/// Failures raised by a single pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("unknown category `{category}` during {stage}")]
    UnknownCategory { category: Category, stage: Stage },
    #[error("negative capacity {capacity} for `{category}` during {stage}")]
    NegativeCapacity {
        category: Category,
        capacity: Decimal,
        stage: Stage,
    },
    #[error("conservation violated during {stage}: expected {expected}, found {actual}")]
    ConservationViolation {
        stage: Stage,
        expected: Decimal,
        actual: Decimal,
    },
    #[error("allocation failed during {stage}: {source}")]
    Allocation {
        stage: Stage,
        #[source]
        source: AllocationError,
    },
    #[error("{stage}: {source}")]
    Domain {
        stage: Stage,
        #[source]
        source: DomainError,
    },
}

impl CoreError {
    /// Attaches a stage to a domain failure, surfacing unknown keys as their own kind.
    pub fn from_domain(stage: Stage, err: DomainError) -> Self {
        match err {
            DomainError::UnknownCategory(category) => CoreError::UnknownCategory { category, stage },
            source => CoreError::Domain { stage, source },
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            CoreError::UnknownCategory { stage, .. }
            | CoreError::NegativeCapacity { stage, .. }
            | CoreError::ConservationViolation { stage, .. }
            | CoreError::Allocation { stage, .. }
            | CoreError::Domain { stage, .. } => *stage,
        }
    }

    /// The offending category, when the failure is tied to one.
    pub fn category(&self) -> Option<&Category> {
        match self {
            CoreError::UnknownCategory { category, .. }
            | CoreError::NegativeCapacity { category, .. } => Some(category),
            CoreError::Domain {
                source:
                    DomainError::MissingCategory(category) | DomainError::DuplicateCategory(category),
                ..
            } => Some(category),
            _ => None,
        }
    }
}

/// Tags domain results with the stage they were produced in.
pub trait StageContext<T> {
    fn at(self, stage: Stage) -> Result<T, CoreError>;
}

impl<T> StageContext<T> for Result<T, DomainError> {
    fn at(self, stage: Stage) -> Result<T, CoreError> {
        self.map_err(|err| CoreError::from_domain(stage, err))
    }
}

/// A stage failure located within a timeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimelineError {
    #[error("initial state rejected: {source}")]
    Initial {
        #[source]
        source: CoreError,
    },
    #[error("computation failed for month {index} ({month}): {source}")]
    Month {
        index: usize,
        month: MonthKey,
        #[source]
        source: CoreError,
    },
    #[error("transition {index} ({key}) failed: {source}")]
    Transition {
        index: usize,
        key: TransitionKey,
        #[source]
        source: CoreError,
    },
    #[error("month {month} at position {index} does not follow {previous}")]
    MonthOrder {
        index: usize,
        month: MonthKey,
        previous: MonthKey,
    },
}

impl TimelineError {
    pub fn core(&self) -> Option<&CoreError> {
        match self {
            TimelineError::Initial { source }
            | TimelineError::Month { source, .. }
            | TimelineError::Transition { source, .. } => Some(source),
            TimelineError::MonthOrder { .. } => None,
        }
    }

    /// Zero-based position of the month (or the month a transition leaves).
    pub fn month_index(&self) -> Option<usize> {
        match self {
            TimelineError::Initial { .. } => None,
            TimelineError::Month { index, .. }
            | TimelineError::Transition { index, .. }
            | TimelineError::MonthOrder { index, .. } => Some(*index),
        }
    }
}
