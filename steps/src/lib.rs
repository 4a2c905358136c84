mod attribute_checks;
mod config;
mod context;
mod error;
mod feature;
mod json_utils;
mod parsing;
mod registry;
mod runner;
pub mod steps;

/// What every step handler returns. Failures are [StepError]s or errors from the API client,
/// wrapped in `anyhow`.
pub type StepResult = anyhow::Result<()>;

pub mod prelude {
    pub use crate::attribute_checks::{
        check_array, check_attribute_presence, check_cve_value, check_first_value,
        check_string_attribute, score_text,
    };
    pub use crate::config::{HarnessConfig, ResolvedConfig};
    pub use crate::context::{StepContext, StepSettings};
    pub use crate::error::StepError;
    pub use crate::feature::{
        load_feature, parse_feature, Feature, FeatureParseError, Scenario, Step,
    };
    pub use crate::json_utils::get_value_using_path;
    pub use crate::parsing::{parse_token_clause, split_comma_separated_list};
    pub use crate::registry::{
        compile_pattern, default_registry, StepArgs, StepDefinition, StepFn, StepKind, StepRegistry,
    };
    pub use crate::runner::{
        print_scenario_results, run_feature, run_scenario, ScenarioOutcome, StepOutcome, StepStatus,
    };
    pub use crate::StepResult;
}
