use camino::Utf8Path;
use serde::de::Error as _;

use crate::error::{MutsenseError, Result};
use crate::mutants::Mutant;
use crate::sensor::Analysis;

/// Parse a JSON mutation report: either an array of mutants or `{"mutations": [...]}`.
///
/// Only a malformed document is an error. Records that cannot be read are
/// skipped with a warning and the rest of the batch is kept.
pub fn parse_report(json: &str) -> serde_json::Result<Vec<Mutant>> {
    let document: serde_json::Value = serde_json::from_str(json)?;
    let records = match document {
        serde_json::Value::Array(records) => records,
        serde_json::Value::Object(mut map) => match map.remove("mutations") {
            Some(serde_json::Value::Array(records)) => records,
            _ => {
                return Err(serde_json::Error::custom(
                    "expected a `mutations` array in the report object",
                ));
            }
        },
        _ => {
            return Err(serde_json::Error::custom(
                "expected an array of mutants or an object with `mutations`",
            ));
        }
    };

    let mut mutants = Vec::with_capacity(records.len());
    let mut skipped = 0usize;
    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<Mutant>(record) {
            Ok(mutant) => mutants.push(mutant),
            Err(e) => {
                tracing::debug!(index, error = %e, "unreadable mutant record");
                skipped += 1;
            }
        }
    }
    if skipped > 0 {
        tracing::warn!(skipped, "mutant records skipped: not readable");
    }

    Ok(mutants)
}

pub fn load_report(path: &Utf8Path) -> Result<Vec<Mutant>> {
    let data = std::fs::read_to_string(path).map_err(|source| MutsenseError::Io {
        path: path.to_owned(),
        source,
    })?;
    parse_report(&data).map_err(|source| MutsenseError::Json {
        path: path.to_owned(),
        source,
    })
}

pub fn save_analysis(analysis: &Analysis, path: &Utf8Path) -> Result<()> {
    let json = serde_json::to_string_pretty(analysis).map_err(|source| MutsenseError::Json {
        path: path.to_owned(),
        source,
    })?;
    std::fs::write(path, json).map_err(|source| MutsenseError::Io {
        path: path.to_owned(),
        source,
    })
}
