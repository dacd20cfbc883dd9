//! Independent what-if timelines computed side by side.

use bucket_core::{BudgetTimeline, EngineSettings, MonthInput, TimelineError};
use bucket_domain::BucketState;
use rayon::prelude::*;
use tracing::{info, warn};

/// One named starting state plus the months to run from it.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub initial: BucketState,
    pub inputs: Vec<MonthInput>,
}

impl Scenario {
    pub fn new(name: impl Into<String>, initial: BucketState, inputs: Vec<MonthInput>) -> Self {
        Self {
            name: name.into(),
            initial,
            inputs,
        }
    }
}

#[derive(Debug)]
pub struct ScenarioOutcome {
    pub name: String,
    pub result: Result<BudgetTimeline, TimelineError>,
}

/// Builds every scenario in parallel. Outcomes keep the input order; one
/// failing scenario does not affect the others.
pub fn run_scenarios(scenarios: &[Scenario], settings: EngineSettings) -> Vec<ScenarioOutcome> {
    let outcomes: Vec<ScenarioOutcome> = scenarios
        .par_iter()
        .map(|scenario| {
            let result =
                BudgetTimeline::build(scenario.initial.clone(), &scenario.inputs, settings);
            if let Err(err) = &result {
                warn!("scenario `{}` failed: {}", scenario.name, err);
            }
            ScenarioOutcome {
                name: scenario.name.clone(),
                result,
            }
        })
        .collect();

    let failed = outcomes.iter().filter(|outcome| outcome.result.is_err()).count();
    info!(
        "ran {} scenario(s), {} failed",
        outcomes.len(),
        failed
    );
    outcomes
}
