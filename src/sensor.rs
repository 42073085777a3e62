use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::aggregate::{self, FileResolver};
use crate::metrics::{self, FileMetrics, Measure};
use crate::mutants::Mutant;
use crate::rules::{self, Issue, RuleConfig, RuleId};

/// Combined output of one analysis pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub metrics: BTreeMap<String, FileMetrics>,
    pub measures: Vec<Measure>,
    pub issues: Vec<Issue>,
}

impl Analysis {
    /// Result of a pass that was skipped or had no report to read.
    pub fn empty() -> Self {
        Analysis::default()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty() && self.issues.is_empty()
    }

    /// Counters summed over every file.
    pub fn totals(&self) -> FileMetrics {
        self.metrics
            .values()
            .fold(FileMetrics::default(), |acc, m| acc + *m)
    }

    pub fn issues_for(&self, rule: RuleId) -> impl Iterator<Item = &Issue> {
        self.issues.iter().filter(move |issue| issue.rule == rule)
    }

    pub fn measures_for<'a>(&'a self, component: &'a str) -> impl Iterator<Item = &'a Measure> {
        self.measures
            .iter()
            .filter(move |measure| measure.component == component)
    }
}

/// Run one pass over a batch: group, measure every file, then apply active rules.
///
/// Groups are keyed by `source_file` as supplied. Two keys that resolve to the
/// same component each contribute their own measures to it, with a warning.
pub fn analyze<R, C>(mutants: &[Mutant], resolver: &R, config: &C) -> Analysis
where
    R: FileResolver + ?Sized,
    C: RuleConfig + ?Sized,
{
    let groups = aggregate::group_by_file(mutants, resolver);
    let mut analysis = Analysis::empty();
    let mut components = BTreeSet::new();

    for (file, group) in &groups {
        if !components.insert(group.handle.component.as_str()) {
            tracing::warn!(
                file = %file,
                component = %group.handle.component,
                "component already measured under another source file"
            );
        }

        let file_metrics = metrics::compute_metrics(&group.mutants);
        tracing::debug!(
            file = %file,
            generated = file_metrics.generated,
            killed = file_metrics.killed,
            survived = file_metrics.survived,
            "computed mutation metrics"
        );

        analysis.measures.extend(metrics::file_measures(
            &group.handle.component,
            &file_metrics,
            &group.mutants,
        ));
        analysis
            .issues
            .extend(rules::evaluate(file, &file_metrics, &group.mutants, config));
        analysis.metrics.insert(file.clone(), file_metrics);
    }

    tracing::info!(
        files = analysis.metrics.len(),
        mutants = mutants.len(),
        issues = analysis.issues.len(),
        "mutation analysis complete"
    );

    analysis
}
