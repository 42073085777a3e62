use std::collections::BTreeMap;

use camino::Utf8Path;
use serde::Deserialize;

use crate::error::{MutsenseError, Result};
use crate::rules::{ActiveRules, RuleId};

/// A quality profile read from TOML.
///
/// ```toml
/// [rules.survived-mutant]
///
/// [rules.insufficient-mutation-coverage]
/// coverageRatio = 70
/// ```
///
/// A rule is active when its table is present.
#[derive(Debug, Default, Deserialize)]
pub struct RulesProfile {
    #[serde(default)]
    pub rules: BTreeMap<String, BTreeMap<String, toml::Value>>,
}

impl RulesProfile {
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|source| MutsenseError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::parse(&data).map_err(|source| MutsenseError::Toml {
            path: path.to_owned(),
            source,
        })
    }

    pub fn parse(data: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(data)
    }

    /// Unknown rule keys and non-scalar parameters are skipped with a warning.
    pub fn active_rules(&self) -> ActiveRules {
        let mut active = ActiveRules::new();

        for (key, params) in &self.rules {
            let Some(rule) = RuleId::from_key(key) else {
                tracing::warn!(rule = %key, "unknown rule in profile, ignoring");
                continue;
            };

            active = active.activate(rule);
            for (name, value) in params {
                match scalar_to_string(value) {
                    Some(value) => active = active.with_param(rule, name.as_str(), value),
                    None => tracing::warn!(rule = %key, param = %name, "parameter is not a scalar, ignoring"),
                }
            }
        }

        active
    }
}

fn scalar_to_string(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}
