//! The step functions. Each takes the scenario context and the values captured from the step
//! text, and either performs a request and stores the response or checks the stored response.

mod analysis;
mod report;
mod search;
mod service;

pub use analysis::{
    check_component_analysis_duration_in_minutes, check_component_analysis_duration_in_seconds,
    finish_analysis_for_component, look_at_component_analysis_duration,
    look_at_recent_component_analysis, read_analysis_for_component, start_analysis_for_component,
};
pub use report::{
    check_analyzed_component, check_analyzed_cve, check_analyzed_no_recommendation,
    check_analyzed_packages, check_analyzed_packages_count, check_analyzed_recommendation_version,
};
pub use search::{
    check_component_analysis_existence, check_component_analysis_nonexistence_in_any_ecosystem,
    check_component_analysis_nonexistence_in_ecosystem, check_components,
    search_for_component,
};
pub use service::running_component_search_api;
