//! Feature gate configuration loaded from YAML
//!
//! Reads the `featureGates` mapping of a configuration document:
//!
//! ```yaml
//! featureGates:
//!   BlockVolume: true
//!   CSIPersistentVolume: false
//! ```
//!
//! Gate values take YAML booleans or the same spellings as the override
//! string (`1`, `t`, `False`, ...). An absent or empty `featureGates` key
//! means defaults. Layering is defaults, then the document, then an optional
//! `Name=bool,...` override string.

use yaml_rust2::{Yaml, YamlLoader};

use crate::features::parse_bool;
use crate::{Error, Feature, FeatureGates, Result};

const FEATURE_GATES_KEY: &str = "featureGates";

/// Gate configuration document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GateConfig {
    /// Explicit feature gate settings
    pub feature_gates: FeatureGates,
}

impl GateConfig {
    /// Parse a YAML configuration document
    ///
    /// An empty document yields the defaults. For multi-document input only
    /// the first document is read; keys other than `featureGates` are ignored.
    pub fn from_yaml(input: &str) -> Result<Self> {
        let docs =
            YamlLoader::load_from_str(input).map_err(|e| Error::config_from("yaml", e.to_string()))?;
        let feature_gates = match docs.first() {
            None | Some(Yaml::Null) => FeatureGates::new(),
            Some(doc @ Yaml::Hash(_)) => gates_from_yaml(&doc[FEATURE_GATES_KEY])?,
            Some(_) => return Err(Error::config_from("yaml", "document must be a mapping")),
        };
        Ok(Self { feature_gates })
    }

    /// Apply a `Name=bool,...` override string on top of this config
    pub fn with_overrides(mut self, overrides: &str) -> Result<Self> {
        let overrides: FeatureGates = overrides.parse()?;
        self.feature_gates.extend(&overrides);
        Ok(self)
    }

    /// The effective gates
    pub fn into_gates(self) -> FeatureGates {
        self.feature_gates
    }
}

// A missing key indexes to BadValue; `featureGates:` with no value is Null.
fn gates_from_yaml(node: &Yaml) -> Result<FeatureGates> {
    let entries = match node {
        Yaml::BadValue | Yaml::Null => return Ok(FeatureGates::new()),
        Yaml::Hash(entries) => entries,
        _ => {
            return Err(Error::config_from(
                "yaml",
                format!("{FEATURE_GATES_KEY} must be a mapping"),
            ))
        }
    };

    let mut gates = FeatureGates::new();
    for (name, value) in entries {
        let name = name
            .as_str()
            .ok_or_else(|| Error::config_from("yaml", "feature gate names must be strings"))?;
        let feature = name.parse::<Feature>()?;
        gates.set(feature, gate_value(name, value)?);
    }
    Ok(gates)
}

fn gate_value(name: &str, value: &Yaml) -> Result<bool> {
    let (text, enabled) = match value {
        Yaml::Boolean(b) => return Ok(*b),
        Yaml::Integer(i) => {
            let text = i.to_string();
            let enabled = parse_bool(&text);
            (text, enabled)
        }
        Yaml::String(s) => (s.clone(), parse_bool(s)),
        Yaml::Real(s) => (s.clone(), None),
        other => (format!("{other:?}"), None),
    };
    enabled.ok_or_else(|| Error::invalid_gate_value(name, text, "expected a boolean"))
}
