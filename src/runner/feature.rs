// src/runner/feature.rs
// Gherkin subset parser: Feature, Background, Scenario, steps, tags, comments

use crate::error::{HarnessError, Result};
use std::path::{Path, PathBuf};

/// A step line, keyword stripped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub keyword: String,
    pub text: String,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub name: String,
    pub tags: Vec<String>,
    pub line: usize,
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.trim_start_matches('@');
        self.tags.iter().any(|t| t == tag)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    pub name: String,
    pub description: String,
    pub path: Option<PathBuf>,
    pub tags: Vec<String>,
    pub background: Vec<Step>,
    pub scenarios: Vec<Scenario>,
}

impl Feature {
    /// Scenario steps with the background prepended
    pub fn steps_for<'a>(&'a self, scenario: &'a Scenario) -> impl Iterator<Item = &'a Step> {
        self.background.iter().chain(scenario.steps.iter())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        let mut feature = parse(&source).map_err(|e| match e {
            HarnessError::Parse(msg) => HarnessError::Parse(format!("{}: {}", path.display(), msg)),
            other => other,
        })?;
        feature.path = Some(path.to_path_buf());
        Ok(feature)
    }
}

const STEP_KEYWORDS: [&str; 6] = ["Given", "When", "Then", "And", "But", "*"];

enum Section {
    None,
    Feature,
    Background,
    Scenario,
}

fn parse_error(line: usize, msg: impl std::fmt::Display) -> HarnessError {
    HarnessError::Parse(format!("line {}: {}", line, msg))
}

fn split_step(line: &str) -> Option<(&str, &str)> {
    STEP_KEYWORDS.iter().find_map(|kw| {
        let rest = line.strip_prefix(kw)?;
        if *kw == "*" || rest.starts_with(char::is_whitespace) {
            Some((*kw, rest.trim()))
        } else {
            None
        }
    })
}

/// Parse feature source text
pub fn parse(source: &str) -> Result<Feature> {
    let mut feature: Option<Feature> = None;
    let mut section = Section::None;
    let mut pending_tags: Vec<String> = Vec::new();

    for (idx, raw) in source.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('@') {
            for tag in line.split_whitespace() {
                match tag.strip_prefix('@') {
                    Some(t) if !t.is_empty() => pending_tags.push(t.to_string()),
                    _ => return Err(parse_error(line_no, format!("malformed tag '{}'", tag))),
                }
            }
            continue;
        }

        if let Some(name) = line.strip_prefix("Feature:") {
            if feature.is_some() {
                return Err(parse_error(line_no, "only one Feature per file"));
            }
            feature = Some(Feature {
                name: name.trim().to_string(),
                description: String::new(),
                path: None,
                tags: std::mem::take(&mut pending_tags),
                background: Vec::new(),
                scenarios: Vec::new(),
            });
            section = Section::Feature;
            continue;
        }

        let Some(current) = feature.as_mut() else {
            return Err(parse_error(line_no, "expected 'Feature:'"));
        };

        if line.starts_with("Background:") {
            if !current.scenarios.is_empty() || !current.background.is_empty() {
                return Err(parse_error(line_no, "Background must come once, before any Scenario"));
            }
            section = Section::Background;
            continue;
        }

        if let Some(name) = line.strip_prefix("Scenario:") {
            current.scenarios.push(Scenario {
                name: name.trim().to_string(),
                tags: std::mem::take(&mut pending_tags),
                line: line_no,
                steps: Vec::new(),
            });
            section = Section::Scenario;
            continue;
        }

        if let Some((keyword, text)) = split_step(line) {
            if text.is_empty() {
                return Err(parse_error(line_no, format!("'{}' without step text", keyword)));
            }
            let step = Step {
                keyword: keyword.to_string(),
                text: text.to_string(),
                line: line_no,
            };
            match section {
                Section::Background => current.background.push(step),
                Section::Scenario => {
                    if let Some(scenario) = current.scenarios.last_mut() {
                        scenario.steps.push(step);
                    }
                }
                Section::Feature | Section::None => {
                    return Err(parse_error(line_no, "step outside of Scenario or Background"));
                }
            }
            continue;
        }

        match section {
            Section::Feature => {
                if !current.description.is_empty() {
                    current.description.push('\n');
                }
                current.description.push_str(line);
            }
            _ => return Err(parse_error(line_no, format!("unexpected line '{}'", line))),
        }
    }

    if !pending_tags.is_empty() {
        return Err(parse_error(source.lines().count(), "tags not followed by a Scenario"));
    }

    feature.ok_or_else(|| HarnessError::Parse("no Feature found".to_string()))
}
