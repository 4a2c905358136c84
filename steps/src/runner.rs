use crate::context::StepContext;
use crate::feature::{Feature, Scenario, Step};
use crate::registry::StepRegistry;
use std::fmt::{Display, Formatter};
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    Passed,
    /// The step returned an error, with its message and causes.
    Failed(String),
    /// No registered pattern matches the step text.
    Undefined,
    /// An earlier step of the scenario did not pass.
    Skipped,
}

impl Display for StepStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StepStatus::Passed => write!(f, "passed"),
            StepStatus::Failed(_) => write!(f, "failed"),
            StepStatus::Undefined => write!(f, "undefined"),
            StepStatus::Skipped => write!(f, "skipped"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub step: Step,
    pub status: StepStatus,
}

#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    pub feature: String,
    pub scenario: String,
    pub steps: Vec<StepOutcome>,
}

impl ScenarioOutcome {
    pub fn passed(&self) -> bool {
        self.steps.iter().all(|s| s.status == StepStatus::Passed)
    }

    pub fn has_undefined_steps(&self) -> bool {
        self.steps.iter().any(|s| s.status == StepStatus::Undefined)
    }

    /// The first step that did not pass.
    pub fn first_problem(&self) -> Option<&StepOutcome> {
        self.steps.iter().find(|s| s.status != StepStatus::Passed)
    }

    fn status(&self) -> &'static str {
        if self.passed() {
            "passed"
        } else if self.has_undefined_steps() {
            "undefined"
        } else {
            "failed"
        }
    }
}

/// Run the steps of one scenario, background steps first, in the given context.
///
/// Once a step fails or cannot be matched, the remaining steps are skipped.
pub fn run_scenario(
    registry: &StepRegistry,
    feature: &Feature,
    scenario: &Scenario,
    ctx: &mut StepContext,
) -> ScenarioOutcome {
    log::info!("Scenario: {}", scenario.name);

    let mut failed = false;
    let steps = feature
        .background
        .iter()
        .chain(scenario.steps.iter())
        .map(|step| {
            let status = if failed {
                StepStatus::Skipped
            } else {
                match registry.find(step.kind, &step.text) {
                    None => {
                        log::error!(
                            "Undefined step at line {}: {} {}",
                            step.line,
                            step.keyword,
                            step.text
                        );
                        StepStatus::Undefined
                    }
                    Some((definition, args)) => match (definition.handler)(&mut *ctx, &args) {
                        Ok(()) => {
                            log::info!("  {} {} ... passed", step.keyword, step.text);
                            StepStatus::Passed
                        }
                        Err(e) => {
                            log::error!("  {} {} ... failed: {e:?}", step.keyword, step.text);
                            StepStatus::Failed(format!("{e:#}"))
                        }
                    },
                }
            };
            failed |= status != StepStatus::Passed;

            StepOutcome {
                step: step.clone(),
                status,
            }
        })
        .collect();

    ScenarioOutcome {
        feature: feature.name.clone(),
        scenario: scenario.name.clone(),
        steps,
    }
}

/// Run every scenario of a feature, each with a fresh context from `new_context`.
pub fn run_feature(
    registry: &StepRegistry,
    feature: &Feature,
    new_context: impl Fn() -> StepContext,
) -> Vec<ScenarioOutcome> {
    log::info!("Feature: {}", feature.name);

    feature
        .scenarios
        .iter()
        .map(|scenario| {
            let mut ctx = new_context();
            run_scenario(registry, feature, scenario, &mut ctx)
        })
        .collect()
}

#[derive(Debug, Clone, Tabled)]
struct ScenarioRow {
    feature: String,
    scenario: String,
    steps_passed: String,
    status: &'static str,
    problem: String,
}

fn scenario_rows(outcomes: &[ScenarioOutcome]) -> Vec<ScenarioRow> {
    outcomes
        .iter()
        .map(|outcome| ScenarioRow {
            feature: outcome.feature.clone(),
            scenario: outcome.scenario.clone(),
            steps_passed: format!(
                "{}/{}",
                outcome.steps.iter().filter(|s| s.status == StepStatus::Passed).count(),
                outcome.steps.len()
            ),
            status: outcome.status(),
            problem: outcome
                .first_problem()
                .map(|s| match &s.status {
                    StepStatus::Failed(msg) => format!("line {}: {msg}", s.step.line),
                    other => format!("line {}: {other}", s.step.line),
                })
                .unwrap_or_default(),
        })
        .collect()
}

/// Print one row per scenario with its status and the first step that did not pass.
pub fn print_scenario_results(outcomes: &[ScenarioOutcome]) {
    let mut table = Table::new(scenario_rows(outcomes));
    table.with(Style::modern());

    let passed = outcomes.iter().filter(|o| o.passed()).count();
    println!("\nScenario results");
    println!("{table}");
    println!("{passed} of {} scenario(s) passed", outcomes.len());
}
