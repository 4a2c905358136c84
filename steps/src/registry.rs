use crate::context::StepContext;
use crate::parsing::{parse_token_clause, split_comma_separated_list};
use crate::steps;
use crate::StepResult;
use anyhow::Context;
use regex::Regex;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The keyword a step is registered under. `And` and `But` take the kind of the step before them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    Given,
    When,
    Then,
}

impl Display for StepKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StepKind::Given => write!(f, "Given"),
            StepKind::When => write!(f, "When"),
            StepKind::Then => write!(f, "Then"),
        }
    }
}

/// Values captured from the step text by the placeholders of its pattern.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StepArgs {
    values: HashMap<String, String>,
}

impl StepArgs {
    pub fn get(&self, name: &str) -> anyhow::Result<&str> {
        self.values
            .get(name)
            .map(String::as_str)
            .with_context(|| format!("Step has no '{name}' placeholder"))
    }

    /// The captured value, or `default` if the pattern has no such placeholder.
    pub fn get_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.values.get(name).map(String::as_str).unwrap_or(default)
    }

    pub fn int<T>(&self, name: &str) -> anyhow::Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        let value = self.get(name)?;
        value
            .parse()
            .with_context(|| format!("'{value}' is not a valid value for '{name}'"))
    }

    pub fn int_or<T>(&self, name: &str, default: T) -> anyhow::Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        if self.values.contains_key(name) {
            self.int(name)
        } else {
            Ok(default)
        }
    }

    /// The `{token}` clause, or "without" when the pattern has none.
    pub fn use_token(&self) -> anyhow::Result<bool> {
        Ok(parse_token_clause(self.get_or("token", "without"))?)
    }
}

pub type StepFn = fn(&mut StepContext, &StepArgs) -> StepResult;

/// One registered step: its kind, the pattern as written and the handler.
pub struct StepDefinition {
    pub kind: StepKind,
    pub pattern: String,
    regex: Regex,
    pub handler: StepFn,
}

impl StepDefinition {
    fn captures(&self, text: &str) -> Option<StepArgs> {
        let captures = self.regex.captures(text)?;
        let values = self
            .regex
            .capture_names()
            .flatten()
            .filter_map(|name| {
                captures
                    .name(name)
                    .map(|m| (name.to_string(), m.as_str().to_string()))
            })
            .collect();

        Some(StepArgs { values })
    }
}

/// Turn a step pattern into an anchored regular expression.
///
/// `{name}` matches any text, as little as possible, and `{name:d}` matches an integer. Everything
/// else matches literally.
pub fn compile_pattern(pattern: &str) -> anyhow::Result<Regex> {
    let mut expr = String::from("^");
    let mut rest = pattern;

    while let Some(open) = rest.find('{') {
        expr.push_str(&regex::escape(&rest[..open]));
        let close = rest[open..]
            .find('}')
            .map(|i| open + i)
            .with_context(|| format!("Unclosed placeholder in step pattern '{pattern}'"))?;

        let placeholder = &rest[open + 1..close];
        match placeholder.split_once(':') {
            Some((name, "d")) => expr.push_str(&format!(r"(?P<{name}>-?\d+)")),
            Some((_, format)) => {
                anyhow::bail!(
                    "Unsupported placeholder format '{format}' in step pattern '{pattern}'"
                )
            }
            None => expr.push_str(&format!("(?P<{placeholder}>.+?)")),
        }

        rest = &rest[close + 1..];
    }
    expr.push_str(&regex::escape(rest));
    expr.push('$');

    Regex::new(&expr).with_context(|| format!("Invalid step pattern '{pattern}'"))
}

/// Step patterns and their handlers, tried in registration order.
#[derive(Default)]
pub struct StepRegistry {
    definitions: Vec<StepDefinition>,
}

impl StepRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        kind: StepKind,
        pattern: &str,
        handler: StepFn,
    ) -> anyhow::Result<()> {
        self.definitions.push(StepDefinition {
            kind,
            pattern: pattern.to_string(),
            regex: compile_pattern(pattern)?,
            handler,
        });
        Ok(())
    }

    /// Find the first definition of `kind` matching `text`.
    pub fn find(&self, kind: StepKind, text: &str) -> Option<(&StepDefinition, StepArgs)> {
        self.definitions
            .iter()
            .filter(|d| d.kind == kind)
            .find_map(|d| d.captures(text).map(|args| (d, args)))
    }

    pub fn definitions(&self) -> &[StepDefinition] {
        &self.definitions
    }
}

/// The registry with every step of the component analysis and search features.
pub fn default_registry() -> anyhow::Result<StepRegistry> {
    use StepKind::{Given, Then, When};

    let mut registry = StepRegistry::new();

    registry.register(Given, "Component search service is running", |ctx, _| {
        steps::running_component_search_api(ctx)
    })?;

    registry.register(
        When,
        "I search for component {component} without authorization token",
        |ctx, args| steps::search_for_component(ctx, args.get("component")?, false),
    )?;
    registry.register(
        When,
        "I search for component {component} with authorization token",
        |ctx, args| steps::search_for_component(ctx, args.get("component")?, true),
    )?;

    for pattern in [
        "I read {ecosystem}/{component}/{version} component analysis",
        "I read {ecosystem}/{component}/{version} component analysis {token} authorization token",
    ] {
        registry.register(When, pattern, |ctx, args| {
            steps::read_analysis_for_component(
                ctx,
                args.get("ecosystem")?,
                args.get("component")?,
                args.get("version")?,
                args.use_token()?,
            )
        })?;
    }

    for pattern in [
        "I start analysis for component {ecosystem}/{component}/{version}",
        "I start analysis for component {ecosystem}/{component}/{version} {token} authorization token",
    ] {
        registry.register(When, pattern, |ctx, args| {
            steps::start_analysis_for_component(
                ctx,
                args.get("ecosystem")?,
                args.get("component")?,
                args.get("version")?,
                args.use_token()?,
            )
        })?;
    }

    for pattern in [
        "I wait for {ecosystem}/{component}/{version} component analysis to finish",
        "I wait for {ecosystem}/{component}/{version} component analysis to finish {token} authorization token",
    ] {
        registry.register(When, pattern, |ctx, args| {
            steps::finish_analysis_for_component(
                ctx,
                args.get("ecosystem")?,
                args.get("component")?,
                args.get("version")?,
                args.use_token()?,
            )
        })?;
    }

    registry.register(When, "I look at recent component analysis", |ctx, _| {
        steps::look_at_recent_component_analysis(ctx)
    })?;
    registry.register(When, "I look at the component analysis duration", |ctx, _| {
        steps::look_at_component_analysis_duration(ctx)
    })?;

    for pattern in [
        "I should see that the component analysis duration is less than {duration:d} second",
        "I should see that the component analysis duration is less than {duration:d} seconds",
    ] {
        registry.register(Then, pattern, |ctx, args| {
            steps::check_component_analysis_duration_in_seconds(ctx, args.int("duration")?)
        })?;
    }
    for pattern in [
        "I should see that the duration is less than {duration:d} minute",
        "I should see that the duration is less than {duration:d} minutes",
    ] {
        registry.register(Then, pattern, |ctx, args| {
            steps::check_component_analysis_duration_in_minutes(ctx, args.int("duration")?)
        })?;
    }

    registry.register(
        Then,
        "I should find no recommendations in the component analysis",
        |ctx, _| steps::check_analyzed_no_recommendation(ctx),
    )?;
    registry.register(
        Then,
        "I should find recommendation to change to version {version} in the component analysis",
        |ctx, args| steps::check_analyzed_recommendation_version(ctx, args.get("version")?),
    )?;
    registry.register(
        Then,
        "I should find CVE report {cve} with score {score} in the component analysis",
        |ctx, args| steps::check_analyzed_cve(ctx, args.get("cve")?, args.get("score")?),
    )?;

    for pattern in [
        "I should find one analyzed package in the component analysis",
        "I should find {num:d} analyzed packages in the component analysis",
    ] {
        registry.register(Then, pattern, |ctx, args| {
            steps::check_analyzed_packages_count(ctx, args.int_or("num", 1)?)
        })?;
    }

    registry.register(
        Then,
        "I should find the package {package} from {ecosystem} ecosystem in the component analysis",
        |ctx, args| {
            steps::check_analyzed_packages(ctx, args.get("package")?, args.get("ecosystem")?)
        },
    )?;
    registry.register(
        Then,
        "I should find the component {package} version {version} from {ecosystem} ecosystem in the component analysis",
        |ctx, args| {
            steps::check_analyzed_component(
                ctx,
                args.get("package")?,
                args.get("version")?,
                args.get("ecosystem")?,
            )
        },
    )?;

    for pattern in [
        "I should find {num:d} components ({components}), all from {ecosystem} ecosystem",
        "I should see 0 components",
        "I should see {num:d} components ({components}), all from {ecosystem} ecosystem",
    ] {
        registry.register(Then, pattern, |ctx, args| {
            let components = split_comma_separated_list(args.get_or("components", ""));
            steps::check_components(
                ctx,
                args.int_or("num", 0)?,
                &components,
                args.get_or("ecosystem", ""),
            )
        })?;
    }

    registry.register(
        Then,
        "I should find the analysis for the component {component} from ecosystem {ecosystem}",
        |ctx, args| {
            steps::check_component_analysis_existence(
                ctx,
                args.get("component")?,
                args.get("ecosystem")?,
            )
        },
    )?;
    registry.register(
        Then,
        "I should not find the analysis for the {component} from ecosystem {ecosystem}",
        |ctx, args| {
            steps::check_component_analysis_nonexistence_in_ecosystem(
                ctx,
                args.get("component")?,
                args.get("ecosystem")?,
            )
        },
    )?;
    registry.register(
        Then,
        "I should not find the analysis for the {component} in any ecosystem",
        |ctx, args| {
            steps::check_component_analysis_nonexistence_in_any_ecosystem(
                ctx,
                args.get("component")?,
            )
        },
    )?;

    Ok(registry)
}
