use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::metrics::FileMetrics;
use crate::mutants::{Mutant, MutantStatus};

pub const COVERAGE_RATIO_PARAM: &str = "coverageRatio";
pub const DEFAULT_COVERAGE_RATIO: i64 = 50;

/// Rules this crate knows how to evaluate. The kebab-case keys are stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleId {
    SurvivedMutant,
    InsufficientMutationCoverage,
}

impl RuleId {
    pub const ALL: [RuleId; 2] = [RuleId::SurvivedMutant, RuleId::InsufficientMutationCoverage];

    pub fn key(&self) -> &'static str {
        match self {
            RuleId::SurvivedMutant => "survived-mutant",
            RuleId::InsufficientMutationCoverage => "insufficient-mutation-coverage",
        }
    }

    pub fn from_key(key: &str) -> Option<RuleId> {
        RuleId::ALL.into_iter().find(|rule| rule.key() == key)
    }

    pub fn description(&self) -> &'static str {
        match self {
            RuleId::SurvivedMutant => "Raise one issue per mutant that no test detected",
            RuleId::InsufficientMutationCoverage => {
                "Raise one issue per file whose kill ratio is below the threshold"
            }
        }
    }

    /// Parameter names and their defaults.
    pub fn parameters(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            RuleId::SurvivedMutant => &[],
            RuleId::InsufficientMutationCoverage => &[(COVERAGE_RATIO_PARAM, "50")],
        }
    }
}

/// Read-only view of the active quality profile.
pub trait RuleConfig {
    fn is_active(&self, rule: RuleId) -> bool;
    fn parameter(&self, rule: RuleId, name: &str) -> Option<String>;
}

/// In-memory rule configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActiveRules {
    rules: BTreeMap<RuleId, BTreeMap<String, String>>,
}

impl ActiveRules {
    /// No rule active.
    pub fn new() -> Self {
        ActiveRules::default()
    }

    /// Every rule active with default parameters.
    pub fn all() -> Self {
        RuleId::ALL
            .into_iter()
            .fold(ActiveRules::new(), |rules, rule| rules.activate(rule))
    }

    pub fn activate(mut self, rule: RuleId) -> Self {
        self.rules.entry(rule).or_default();
        self
    }

    /// Set a parameter, activating the rule if needed.
    pub fn with_param(mut self, rule: RuleId, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.rules.entry(rule).or_default().insert(name.into(), value.into());
        self
    }

    pub fn active(&self) -> impl Iterator<Item = RuleId> + '_ {
        self.rules.keys().copied()
    }
}

impl RuleConfig for ActiveRules {
    fn is_active(&self, rule: RuleId) -> bool {
        self.rules.contains_key(&rule)
    }

    fn parameter(&self, rule: RuleId, name: &str) -> Option<String> {
        self.rules.get(&rule)?.get(name).cloned()
    }
}

/// A rule violation attributed to a file, and to a line or class when known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub rule: RuleId,
    pub file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    pub message: String,
}

/// Evaluate every active rule against one file.
///
/// Survived-mutant issues come first, in record order, followed by at most
/// one coverage issue.
pub fn evaluate<C>(file: &str, metrics: &FileMetrics, mutants: &[Mutant], config: &C) -> Vec<Issue>
where
    C: RuleConfig + ?Sized,
{
    let mut issues = Vec::new();

    if config.is_active(RuleId::SurvivedMutant) {
        issues.extend(survived_mutant_issues(file, mutants));
    }

    if config.is_active(RuleId::InsufficientMutationCoverage) {
        let threshold = coverage_threshold(config);
        issues.extend(coverage_issue(file, metrics, threshold));
    }

    issues
}

pub fn survived_mutant_issues(file: &str, mutants: &[Mutant]) -> Vec<Issue> {
    mutants
        .iter()
        .filter(|m| m.status == MutantStatus::Survived)
        .map(|m| {
            if m.detection_disagrees() {
                tracing::debug!(file, line = ?m.line, "survived mutant reported as detected");
            }
            Issue {
                rule: RuleId::SurvivedMutant,
                file: file.to_string(),
                line: m.line,
                class_name: m.class_name.clone(),
                message: survived_message(m),
            }
        })
        .collect()
}

/// The configured threshold, or the default when unset or not an integer.
pub fn coverage_threshold<C>(config: &C) -> i64
where
    C: RuleConfig + ?Sized,
{
    match config.parameter(RuleId::InsufficientMutationCoverage, COVERAGE_RATIO_PARAM) {
        None => DEFAULT_COVERAGE_RATIO,
        Some(raw) => parse_threshold(&raw).unwrap_or_else(|| {
            tracing::warn!(
                value = %raw,
                default = DEFAULT_COVERAGE_RATIO,
                "invalid {COVERAGE_RATIO_PARAM}, using default"
            );
            DEFAULT_COVERAGE_RATIO
        }),
    }
}

pub fn parse_threshold(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

/// One file-level issue when the kill ratio is strictly below `threshold`.
pub fn coverage_issue(file: &str, metrics: &FileMetrics, threshold: i64) -> Option<Issue> {
    let ratio = metrics.kill_ratio()? as i64;
    if ratio >= threshold {
        return None;
    }

    let message = if threshold > 100 {
        // Unreachable even with every mutant killed; no count to report.
        format!(
            "Mutation coverage of {ratio}% is below the minimum threshold of {threshold}%"
        )
    } else {
        let generated = metrics.generated as i64;
        let needed = (threshold * generated + 99) / 100;
        let missing = needed - metrics.killed as i64;
        format!(
            "{} more mutant{} need{} to be killed to reach the minimum threshold of {}% mutant coverage (currently {}%)",
            missing,
            if missing == 1 { "" } else { "s" },
            if missing == 1 { "s" } else { "" },
            threshold,
            ratio,
        )
    };
    tracing::debug!(file, ratio, threshold, "mutation coverage below threshold");

    Some(Issue {
        rule: RuleId::InsufficientMutationCoverage,
        file: file.to_string(),
        line: None,
        class_name: None,
        message,
    })
}

fn survived_message(mutant: &Mutant) -> String {
    let mut message = String::from("Survived mutant");

    match (&mutant.class_name, &mutant.method) {
        (Some(class), Some(method)) => message.push_str(&format!(" in {class}.{method}")),
        (Some(class), None) => message.push_str(&format!(" in {class}")),
        (None, Some(method)) => message.push_str(&format!(" in {method}")),
        (None, None) => {}
    }
    if let Some(line) = mutant.line {
        message.push_str(&format!(" at line {line}"));
    }
    if let Some(detail) = mutant.description.as_ref().or(mutant.mutator.as_ref()) {
        message.push_str(&format!(": {detail}"));
    }

    message
}
