pub mod aggregate;
pub mod error;
pub mod metrics;
pub mod mutants;
pub mod output;
pub mod profile;
pub mod report;
pub mod rules;
pub mod sensor;

pub use error::{MutsenseError, Result};
pub use metrics::FileMetrics;
pub use mutants::{Mutant, MutantStatus};
pub use rules::{ActiveRules, Issue, RuleConfig, RuleId};
pub use sensor::{Analysis, analyze};
