// src/runner/report.rs
// Scenario outcomes and run summary

use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepStatus {
    Passed,
    Failed(String),
    /// No pattern in the vocabulary matched the step text
    Undefined,
    /// Not run because an earlier step did not pass
    Skipped,
}

#[derive(Debug, Clone)]
pub struct StepReport {
    pub keyword: String,
    pub text: String,
    pub line: usize,
    pub status: StepStatus,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed,
    Undefined,
}

#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub feature: String,
    pub name: String,
    pub line: usize,
    pub steps: Vec<StepReport>,
    pub elapsed: Duration,
}

impl ScenarioReport {
    pub fn outcome(&self) -> Outcome {
        let mut outcome = Outcome::Passed;
        for step in &self.steps {
            match step.status {
                StepStatus::Failed(_) => return Outcome::Failed,
                StepStatus::Undefined => outcome = Outcome::Undefined,
                StepStatus::Passed | StepStatus::Skipped => {}
            }
        }
        outcome
    }

    /// The step that stopped the scenario, if any
    pub fn failing_step(&self) -> Option<&StepReport> {
        self.steps
            .iter()
            .find(|s| matches!(s.status, StepStatus::Failed(_) | StepStatus::Undefined))
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub scenarios: Vec<ScenarioReport>,
    pub elapsed: Duration,
}

impl RunReport {
    fn count(&self, outcome: Outcome) -> usize {
        self.scenarios.iter().filter(|s| s.outcome() == outcome).count()
    }

    pub fn passed(&self) -> usize {
        self.count(Outcome::Passed)
    }

    pub fn failed(&self) -> usize {
        self.count(Outcome::Failed)
    }

    pub fn undefined(&self) -> usize {
        self.count(Outcome::Undefined)
    }

    pub fn is_success(&self) -> bool {
        self.failed() == 0 && self.undefined() == 0
    }

    pub fn extend(&mut self, other: RunReport) {
        self.scenarios.extend(other.scenarios);
        self.elapsed += other.elapsed;
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for scenario in &self.scenarios {
            let mark = match scenario.outcome() {
                Outcome::Passed => "ok",
                Outcome::Failed => "FAILED",
                Outcome::Undefined => "UNDEFINED",
            };
            writeln!(
                f,
                "{} :: {} ... {} ({:.1}s)",
                scenario.feature,
                scenario.name,
                mark,
                scenario.elapsed.as_secs_f64()
            )?;

            if let Some(step) = scenario.failing_step() {
                match &step.status {
                    StepStatus::Failed(err) => {
                        writeln!(f, "    line {}: {} {}", step.line, step.keyword, step.text)?;
                        writeln!(f, "      {}", err)?;
                    }
                    StepStatus::Undefined => {
                        writeln!(f, "    line {}: undefined step: {}", step.line, step.text)?;
                    }
                    _ => {}
                }
            }
        }

        write!(
            f,
            "{} scenarios ({} passed, {} failed, {} undefined) in {:.1}s",
            self.scenarios.len(),
            self.passed(),
            self.failed(),
            self.undefined(),
            self.elapsed.as_secs_f64()
        )
    }
}
