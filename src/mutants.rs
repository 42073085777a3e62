use serde::{Deserialize, Deserializer, Serialize};

/// Outcome of a single mutation as reported by the mutation-testing engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", from = "String")]
pub enum MutantStatus {
    Killed,
    Survived,
    NoCoverage,
    MemoryError,
    TimedOut,
    RunError,
    NonViable,
    #[default]
    Unknown,
}

impl MutantStatus {
    /// Map a raw engine status onto the fixed set. Anything unrecognized is `Unknown`.
    pub fn from_raw(raw: &str) -> Self {
        let normalized = raw.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "KILLED" => MutantStatus::Killed,
            "SURVIVED" | "LIVED" => MutantStatus::Survived,
            "NO_COVERAGE" | "NOCOVERAGE" | "NOT_COVERED" => MutantStatus::NoCoverage,
            "MEMORY_ERROR" => MutantStatus::MemoryError,
            "TIMED_OUT" | "TIMEOUT" => MutantStatus::TimedOut,
            "RUN_ERROR" => MutantStatus::RunError,
            "NON_VIABLE" | "NONVIABLE" | "UNVIABLE" => MutantStatus::NonViable,
            _ => MutantStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MutantStatus::Killed => "KILLED",
            MutantStatus::Survived => "SURVIVED",
            MutantStatus::NoCoverage => "NO_COVERAGE",
            MutantStatus::MemoryError => "MEMORY_ERROR",
            MutantStatus::TimedOut => "TIMED_OUT",
            MutantStatus::RunError => "RUN_ERROR",
            MutantStatus::NonViable => "NON_VIABLE",
            MutantStatus::Unknown => "UNKNOWN",
        }
    }
}

impl From<String> for MutantStatus {
    fn from(raw: String) -> Self {
        MutantStatus::from_raw(&raw)
    }
}

/// One mutation outcome, tagged with the source file it mutates.
///
/// `detected` is carried as reported. Bucketing and the kill ratio are driven
/// by `status` alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawMutant")]
pub struct Mutant {
    pub source_file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mutator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: MutantStatus,
    pub detected: bool,
}

/// Wire shape of a record. Missing files become empty paths (dropped during
/// grouping), missing or non-string statuses become `Unknown`, and a missing
/// `detected` follows the status.
#[derive(Deserialize)]
struct RawMutant {
    #[serde(default)]
    source_file: String,
    #[serde(default)]
    class_name: Option<String>,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    line: Option<u32>,
    #[serde(default)]
    mutator: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, deserialize_with = "lenient_status")]
    status: MutantStatus,
    #[serde(default)]
    detected: Option<bool>,
}

impl From<RawMutant> for Mutant {
    fn from(raw: RawMutant) -> Self {
        Mutant {
            source_file: raw.source_file,
            class_name: raw.class_name,
            method: raw.method,
            line: raw.line,
            mutator: raw.mutator,
            description: raw.description,
            status: raw.status,
            detected: raw.detected.unwrap_or(raw.status == MutantStatus::Killed),
        }
    }
}

fn lenient_status<'de, D>(deserializer: D) -> Result<MutantStatus, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(raw) => MutantStatus::from_raw(&raw),
        _ => MutantStatus::Unknown,
    })
}

impl Mutant {
    /// A bare record; `detected` defaults to `status == Killed`.
    pub fn new(source_file: impl Into<String>, status: MutantStatus) -> Self {
        Mutant {
            source_file: source_file.into(),
            class_name: None,
            method: None,
            line: None,
            mutator: None,
            description: None,
            status,
            detected: status == MutantStatus::Killed,
        }
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_mutator(mut self, mutator: impl Into<String>) -> Self {
        self.mutator = Some(mutator.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_detected(mut self, detected: bool) -> Self {
        self.detected = detected;
        self
    }

    /// True when the engine's `detected` flag contradicts `status`.
    pub fn detection_disagrees(&self) -> bool {
        self.detected != (self.status == MutantStatus::Killed)
    }
}
