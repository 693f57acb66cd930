// src/runner/vocabulary.rs
// Step text patterns, one per harness operation

use once_cell::sync::Lazy;
use regex::Regex;

/// Harness operations a step can bind to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepKind {
    Connect,
    AddVc,
    TreeGrowth,
    Consistency,
    Entries,
    AuditProof,
}

impl StepKind {
    pub const ALL: [StepKind; 6] = [
        StepKind::Connect,
        StepKind::AddVc,
        StepKind::TreeGrowth,
        StepKind::Consistency,
        StepKind::Entries,
        StepKind::AuditProof,
    ];

    pub fn pattern(&self) -> &'static str {
        match self {
            StepKind::Connect => r#"VCT agent is running on "([^"]*)"$"#,
            StepKind::AddVc => r#"Add verifiable credential "([^"]*)" to Log$"#,
            StepKind::TreeGrowth => {
                r#"Retrieve latest signed tree head and check that tree_size is "([^"]*)"$"#
            }
            StepKind::Consistency => {
                r"Retrieve merkle consistency proof between signed tree heads$"
            }
            StepKind::Entries => r#"Retrieve entries from log and check that len is "([^"]*)"$"#,
            StepKind::AuditProof => {
                r#"Retrieve merkle audit proof from log by leaf hash for entry "([^"]*)"$"#
            }
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            StepKind::Connect => "connect to the log and record the baseline tree head",
            StepKind::AddVc => "submit a fixture credential",
            StepKind::TreeGrowth => "poll until the tree grew by the given number of leaves",
            StepKind::Consistency => {
                "poll until the consistency proof from the baseline is well-formed"
            }
            StepKind::Entries => "poll until the new entries number exactly the given count",
            StepKind::AuditProof => "poll until the indexed entry has a non-empty audit path",
        }
    }
}

/// Step text bound to an operation, with its quoted argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedStep {
    pub kind: StepKind,
    pub arg: Option<String>,
}

static VOCABULARY: Lazy<Vec<(StepKind, Regex)>> = Lazy::new(|| {
    StepKind::ALL
        .iter()
        .map(|kind| (*kind, Regex::new(kind.pattern()).expect("valid step pattern")))
        .collect()
});

/// Bind step text (keyword already stripped) to an operation
pub fn match_step(text: &str) -> Option<MatchedStep> {
    let text = text.trim();
    VOCABULARY.iter().find_map(|(kind, re)| {
        re.captures(text).map(|caps| MatchedStep {
            kind: *kind,
            arg: caps.get(1).map(|m| m.as_str().to_string()),
        })
    })
}
