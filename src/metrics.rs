use std::ops::Add;

use serde::{Deserialize, Serialize};

use crate::mutants::{Mutant, MutantStatus};

/// Per-file mutation counters.
///
/// `generated == killed + survived + not_covered + error + unknown` always holds
/// for values produced by [`compute_metrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetrics {
    pub generated: usize,
    pub killed: usize,
    pub survived: usize,
    pub not_covered: usize,
    pub error: usize,
    pub unknown: usize,
}

impl FileMetrics {
    /// Truncated integer kill percentage, `None` when nothing was generated.
    pub fn kill_ratio(&self) -> Option<usize> {
        if self.generated == 0 {
            return None;
        }
        Some(self.killed * 100 / self.generated)
    }

    pub fn is_consistent(&self) -> bool {
        self.generated == self.killed + self.survived + self.not_covered + self.error + self.unknown
    }

    /// The six counters as named measures, in a fixed order.
    pub fn counters(&self) -> [(Metric, usize); 6] {
        [
            (Metric::Generated, self.generated),
            (Metric::Killed, self.killed),
            (Metric::Survived, self.survived),
            (Metric::NotCovered, self.not_covered),
            (Metric::Error, self.error),
            (Metric::Unknown, self.unknown),
        ]
    }
}

impl Add for FileMetrics {
    type Output = FileMetrics;

    fn add(self, other: FileMetrics) -> FileMetrics {
        FileMetrics {
            generated: self.generated + other.generated,
            killed: self.killed + other.killed,
            survived: self.survived + other.survived,
            not_covered: self.not_covered + other.not_covered,
            error: self.error + other.error,
            unknown: self.unknown + other.unknown,
        }
    }
}

pub fn compute_metrics(mutants: &[Mutant]) -> FileMetrics {
    let mut metrics = FileMetrics {
        generated: mutants.len(),
        ..FileMetrics::default()
    };

    for mutant in mutants {
        match mutant.status {
            MutantStatus::Killed => metrics.killed += 1,
            MutantStatus::Survived => metrics.survived += 1,
            MutantStatus::NoCoverage => metrics.not_covered += 1,
            MutantStatus::MemoryError | MutantStatus::TimedOut | MutantStatus::RunError => {
                metrics.error += 1
            }
            MutantStatus::NonViable | MutantStatus::Unknown => metrics.unknown += 1,
        }
    }

    metrics
}

/// Measure keys published for every analyzed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    #[serde(rename = "mutations_generated")]
    Generated,
    #[serde(rename = "mutations_killed")]
    Killed,
    #[serde(rename = "mutations_survived")]
    Survived,
    #[serde(rename = "mutations_not_covered")]
    NotCovered,
    #[serde(rename = "mutations_error")]
    Error,
    #[serde(rename = "mutations_unknown")]
    Unknown,
    #[serde(rename = "mutations_data")]
    Data,
}

impl Metric {
    pub fn key(&self) -> &'static str {
        match self {
            Metric::Generated => "mutations_generated",
            Metric::Killed => "mutations_killed",
            Metric::Survived => "mutations_survived",
            Metric::NotCovered => "mutations_not_covered",
            Metric::Error => "mutations_error",
            Metric::Unknown => "mutations_unknown",
            Metric::Data => "mutations_data",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MeasureValue {
    Count(usize),
    Data(String),
}

/// A named value attached to a host component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    pub component: String,
    pub metric: Metric,
    pub value: MeasureValue,
}

#[derive(Serialize)]
struct MutantSummary<'a> {
    status: &'static str,
    detected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mutator: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
}

/// All measures for one file: the six counters followed by the `mutations_data` blob.
pub fn file_measures(component: &str, metrics: &FileMetrics, mutants: &[Mutant]) -> Vec<Measure> {
    let mut measures: Vec<Measure> = metrics
        .counters()
        .into_iter()
        .map(|(metric, count)| Measure {
            component: component.to_string(),
            metric,
            value: MeasureValue::Count(count),
        })
        .collect();

    measures.push(Measure {
        component: component.to_string(),
        metric: Metric::Data,
        value: MeasureValue::Data(mutations_data(mutants)),
    });

    measures
}

fn mutations_data(mutants: &[Mutant]) -> String {
    let summary: Vec<MutantSummary> = mutants
        .iter()
        .map(|m| MutantSummary {
            status: m.status.as_str(),
            detected: m.detected,
            line: m.line,
            mutator: m.mutator.as_deref(),
            description: m.description.as_deref(),
        })
        .collect();
    serde_json::to_string(&summary).unwrap_or_else(|_| "[]".to_string())
}
