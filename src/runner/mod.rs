// src/runner/mod.rs
// Sequential scenario executor binding feature files to harness steps

pub mod feature;
pub mod report;
pub mod vocabulary;

pub use feature::{Feature, Scenario, Step};
pub use report::{Outcome, RunReport, ScenarioReport, StepReport, StepStatus};
pub use vocabulary::{MatchedStep, StepKind, match_step};

use crate::error::Result;
use crate::steps::{HarnessContext, Steps};
use anyhow::Context;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, instrument};
use walkdir::WalkDir;

/// Extension of feature files picked up from directories
pub const FEATURE_EXTENSION: &str = "feature";

/// Scenario selection
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Run scenarios carrying any of these tags (scenario or feature level)
    pub tags: Vec<String>,
    /// Run scenarios whose name contains this text
    pub name_filter: Option<String>,
}

impl RunOptions {
    fn selects(&self, feature: &Feature, scenario: &Scenario) -> bool {
        let tagged = self.tags.is_empty()
            || self.tags.iter().any(|t| {
                let t = t.trim_start_matches('@');
                scenario.has_tag(t) || feature.tags.iter().any(|ft| ft == t)
            });
        let named = self
            .name_filter
            .as_deref()
            .is_none_or(|n| scenario.name.contains(n));
        tagged && named
    }
}

/// Expand files and directories into a sorted list of feature files
pub fn discover_features(paths: &[PathBuf]) -> anyhow::Result<Vec<PathBuf>> {
    let mut found = Vec::new();

    for path in paths {
        if path.is_file() {
            found.push(path.clone());
            continue;
        }
        if !path.exists() {
            anyhow::bail!("feature path {} does not exist", path.display());
        }
        for entry in WalkDir::new(path).follow_links(true) {
            let entry = entry.with_context(|| format!("walking {}", path.display()))?;
            let p = entry.path();
            if entry.file_type().is_file()
                && p.extension().and_then(|e| e.to_str()) == Some(FEATURE_EXTENSION)
            {
                found.push(p.to_path_buf());
            }
        }
    }

    found.sort();
    found.dedup();
    Ok(found)
}

async fn dispatch(steps: &mut Steps, matched: &MatchedStep) -> Result<()> {
    let arg = matched.arg.as_deref().unwrap_or_default();
    match matched.kind {
        StepKind::Connect => steps.connect(arg).await,
        StepKind::AddVc => steps.add_vc(arg).await.map(|_| ()),
        StepKind::TreeGrowth => steps.check_tree_growth(arg).await,
        StepKind::Consistency => steps.check_consistency().await,
        StepKind::Entries => steps.check_entries(arg).await,
        StepKind::AuditProof => steps.check_audit_proof(arg).await,
    }
}

pub struct Runner {
    ctx: HarnessContext,
    options: RunOptions,
}

impl Runner {
    pub fn new(ctx: HarnessContext, options: RunOptions) -> Self {
        Self { ctx, options }
    }

    /// Run one scenario with fresh harness state; stop at the first step
    /// that does not pass.
    #[instrument(skip_all, fields(scenario = %scenario.name))]
    pub async fn run_scenario(&self, feature: &Feature, scenario: &Scenario) -> ScenarioReport {
        let started = Instant::now();
        let mut steps = Steps::new(self.ctx.clone());
        let mut reports = Vec::new();
        let mut halted = false;

        for step in feature.steps_for(scenario) {
            let step_started = Instant::now();
            let status = if halted {
                StepStatus::Skipped
            } else {
                match match_step(&step.text) {
                    None => {
                        error!(line = step.line, text = %step.text, "Undefined step");
                        halted = true;
                        StepStatus::Undefined
                    }
                    Some(matched) => match dispatch(&mut steps, &matched).await {
                        Ok(()) => StepStatus::Passed,
                        Err(e) => {
                            error!(line = step.line, text = %step.text, error = %e, "Step failed");
                            halted = true;
                            StepStatus::Failed(e.to_string())
                        }
                    },
                }
            };

            reports.push(StepReport {
                keyword: step.keyword.clone(),
                text: step.text.clone(),
                line: step.line,
                status,
                elapsed: step_started.elapsed(),
            });
        }

        ScenarioReport {
            feature: feature.name.clone(),
            name: scenario.name.clone(),
            line: scenario.line,
            steps: reports,
            elapsed: started.elapsed(),
        }
    }

    pub async fn run_feature(&self, feature: &Feature) -> RunReport {
        let started = Instant::now();
        let mut report = RunReport::default();

        for scenario in &feature.scenarios {
            if !self.options.selects(feature, scenario) {
                continue;
            }
            let scenario_report = self.run_scenario(feature, scenario).await;
            info!(
                scenario = %scenario.name,
                outcome = ?scenario_report.outcome(),
                "Scenario finished"
            );
            report.scenarios.push(scenario_report);
        }

        report.elapsed = started.elapsed();
        report
    }

    pub async fn run_file(&self, path: &Path) -> anyhow::Result<RunReport> {
        let feature = Feature::load(path).with_context(|| format!("loading {}", path.display()))?;
        info!(feature = %feature.name, path = %path.display(), "Running feature");
        Ok(self.run_feature(&feature).await)
    }

    /// Discover and run every feature under `paths`, in path order
    pub async fn run_paths(&self, paths: &[PathBuf]) -> anyhow::Result<RunReport> {
        let files = discover_features(paths)?;
        if files.is_empty() {
            anyhow::bail!("no .{} files found", FEATURE_EXTENSION);
        }

        let mut report = RunReport::default();
        for file in &files {
            report.extend(self.run_file(file).await?);
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature() -> Feature {
        feature::parse(
            r#"
@log
Feature: f
  @smoke
  Scenario: first add
    Given x
  Scenario: second
    Given y
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_select_all_by_default() {
        let f = feature();
        let options = RunOptions::default();
        assert!(f.scenarios.iter().all(|s| options.selects(&f, s)));
    }

    #[test]
    fn test_select_by_tag() {
        let f = feature();
        let options = RunOptions {
            tags: vec!["@smoke".to_string()],
            name_filter: None,
        };
        assert!(options.selects(&f, &f.scenarios[0]));
        assert!(!options.selects(&f, &f.scenarios[1]));

        // feature tags apply to every scenario
        let options = RunOptions {
            tags: vec!["log".to_string()],
            name_filter: None,
        };
        assert!(options.selects(&f, &f.scenarios[1]));
    }

    #[test]
    fn test_select_by_name() {
        let f = feature();
        let options = RunOptions {
            tags: Vec::new(),
            name_filter: Some("add".to_string()),
        };
        assert!(options.selects(&f, &f.scenarios[0]));
        assert!(!options.selects(&f, &f.scenarios[1]));
    }

    #[test]
    fn test_discover_features() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("b.feature"), "Feature: b").unwrap();
        std::fs::write(dir.path().join("nested/a.feature"), "Feature: a").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let found = discover_features(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|p| p.extension().unwrap() == "feature"));

        let single = discover_features(&[dir.path().join("b.feature")]).unwrap();
        assert_eq!(single.len(), 1);

        assert!(discover_features(&[dir.path().join("missing")]).is_err());
    }
}
