//! A parser for the subset of Gherkin used by the feature files: `Feature`, `Background` and
//! `Scenario` sections with `Given`/`When`/`Then`/`And`/`But` steps, `#` comments and `@tags`.

use crate::registry::StepKind;
use anyhow::Context;
use std::path::Path;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("line {line}: {message}")]
pub struct FeatureParseError {
    pub line: usize,
    pub message: String,
}

impl FeatureParseError {
    fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// The keyword as written, `And` and `But` included.
    pub keyword: String,
    /// The resolved kind, inherited from the previous step for `And` and `But`.
    pub kind: StepKind,
    pub text: String,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub name: String,
    pub tags: Vec<String>,
    pub steps: Vec<Step>,
    pub line: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Feature {
    pub name: String,
    pub tags: Vec<String>,
    pub background: Vec<Step>,
    pub scenarios: Vec<Scenario>,
}

enum Section {
    Preamble,
    Feature,
    Background,
    Scenario,
}

const UNSUPPORTED_SECTIONS: [&str; 4] = [
    "Scenario Outline:",
    "Scenario Template:",
    "Examples:",
    "Rule:",
];

fn step_keyword(line: &str) -> Option<(&str, &str)> {
    ["Given", "When", "Then", "And", "But"]
        .into_iter()
        .find_map(|keyword| {
            line.strip_prefix(keyword)
                .and_then(|rest| rest.strip_prefix(' '))
                .map(|text| (keyword, text.trim()))
        })
}

/// Parse the text of a feature file.
pub fn parse_feature(source: &str) -> Result<Feature, FeatureParseError> {
    let mut feature = Feature::default();
    let mut section = Section::Preamble;
    let mut pending_tags = Vec::new();
    let mut previous_kind: Option<StepKind> = None;
    let mut seen_feature = false;

    for (index, raw) in source.lines().enumerate() {
        let line_number = index + 1;
        let line = raw.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('@') {
            pending_tags.extend(line.split_whitespace().map(str::to_string));
            continue;
        }

        if let Some(section_name) = UNSUPPORTED_SECTIONS.iter().find(|s| line.starts_with(**s)) {
            return Err(FeatureParseError::new(
                line_number,
                format!("'{section_name}' sections are not supported"),
            ));
        }
        if line.starts_with('|') {
            return Err(FeatureParseError::new(line_number, "Data tables are not supported"));
        }
        if line.starts_with("\"\"\"") || line.starts_with("```") {
            return Err(FeatureParseError::new(line_number, "Doc strings are not supported"));
        }

        if let Some(name) = line.strip_prefix("Feature:") {
            if seen_feature {
                return Err(FeatureParseError::new(
                    line_number,
                    "Only one feature per file is supported",
                ));
            }
            seen_feature = true;
            feature.name = name.trim().to_string();
            feature.tags = std::mem::take(&mut pending_tags);
            section = Section::Feature;
            continue;
        }

        if !seen_feature {
            return Err(FeatureParseError::new(line_number, "Expected 'Feature:' first"));
        }

        if line.starts_with("Background:") {
            if !feature.scenarios.is_empty() || !feature.background.is_empty() {
                return Err(FeatureParseError::new(
                    line_number,
                    "Background must come once, before the first scenario",
                ));
            }
            section = Section::Background;
            previous_kind = None;
            continue;
        }

        if let Some(name) = line.strip_prefix("Scenario:") {
            feature.scenarios.push(Scenario {
                name: name.trim().to_string(),
                tags: std::mem::take(&mut pending_tags),
                steps: Vec::new(),
                line: line_number,
            });
            section = Section::Scenario;
            previous_kind = None;
            continue;
        }

        let steps = match section {
            Section::Background => &mut feature.background,
            Section::Scenario => match feature.scenarios.last_mut() {
                Some(scenario) => &mut scenario.steps,
                None => {
                    return Err(FeatureParseError::new(
                        line_number,
                        "Step outside of a scenario",
                    ))
                }
            },
            // free text after `Feature:` is the feature description
            Section::Feature | Section::Preamble => continue,
        };

        let Some((keyword, text)) = step_keyword(line) else {
            if steps.is_empty() {
                // description of the scenario or background
                continue;
            }
            return Err(FeatureParseError::new(line_number, format!("Unexpected line '{line}'")));
        };

        let kind = match keyword {
            "Given" => StepKind::Given,
            "When" => StepKind::When,
            "Then" => StepKind::Then,
            _ => previous_kind.ok_or_else(|| {
                FeatureParseError::new(line_number, format!("'{keyword}' cannot start a scenario"))
            })?,
        };
        previous_kind = Some(kind);

        steps.push(Step {
            keyword: keyword.to_string(),
            kind,
            text: text.to_string(),
            line: line_number,
        });
    }

    if !seen_feature {
        return Err(FeatureParseError::new(source.lines().count(), "No 'Feature:' found"));
    }

    Ok(feature)
}

/// Read and parse a feature file.
pub fn load_feature(path: &Path) -> anyhow::Result<Feature> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read feature file {}", path.display()))?;

    parse_feature(&source)
        .with_context(|| format!("Failed to parse feature file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const FEATURE: &str = r#"
@smoke
Feature: Component analysis
  Checks of the component analysis API

  Background:
    Given Component search service is running

  # a comment
  @slow
  Scenario: Read a known component
    When I read pypi/six/1.0 component analysis
    Then I should find one analyzed package in the component analysis
    And I should find the package six from pypi ecosystem in the component analysis
    But I should find no recommendations in the component analysis

  Scenario: Search
    When I search for component six without authorization token
    Then I should see 0 components
"#;

    #[test]
    fn parse_sections_and_steps() {
        let feature = parse_feature(FEATURE).unwrap();

        assert_eq!("Component analysis", feature.name);
        assert_eq!(vec!["@smoke"], feature.tags);
        assert_eq!(1, feature.background.len());
        assert_eq!(StepKind::Given, feature.background[0].kind);
        assert_eq!(2, feature.scenarios.len());

        let scenario = &feature.scenarios[0];
        assert_eq!("Read a known component", scenario.name);
        assert_eq!(vec!["@slow"], scenario.tags);
        assert_eq!(
            vec![StepKind::When, StepKind::Then, StepKind::Then, StepKind::Then],
            scenario.steps.iter().map(|s| s.kind).collect::<Vec<_>>()
        );
        assert_eq!("And", scenario.steps[2].keyword);
        assert_eq!(
            "I should find the package six from pypi ecosystem in the component analysis",
            scenario.steps[2].text
        );
        assert_eq!(12, scenario.steps[0].line);

        assert!(feature.scenarios[1].tags.is_empty());
    }

    #[test]
    fn and_cannot_start_a_scenario() {
        let err = parse_feature("Feature: x\nScenario: y\n  And something\n").unwrap_err();

        assert_eq!(3, err.line);
    }

    #[test]
    fn unsupported_constructs_are_rejected() {
        let outline = "Feature: x\nScenario Outline: y\n  Given a <thing>\n";
        assert!(parse_feature(outline).unwrap_err().message.contains("Scenario Outline"));

        let table = "Feature: x\nScenario: y\n  Given things\n    | a | b |\n";
        assert_eq!(4, parse_feature(table).unwrap_err().line);

        let doc_string = "Feature: x\nScenario: y\n  Given text\n    \"\"\"\n";
        assert_eq!(4, parse_feature(doc_string).unwrap_err().line);
    }

    #[test]
    fn feature_header_is_required() {
        assert!(parse_feature("Scenario: y\n").is_err());
        assert!(parse_feature("# only a comment\n").is_err());
        assert!(parse_feature("Feature: a\nFeature: b\n").is_err());
    }

    #[test]
    fn background_after_scenario_is_rejected() {
        let source = "Feature: x\nScenario: y\n  Given a\nBackground:\n  Given b\n";

        assert_eq!(4, parse_feature(source).unwrap_err().line);
    }
}
