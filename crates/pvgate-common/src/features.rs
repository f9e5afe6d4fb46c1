//! Feature gates for optional PersistentVolume capabilities
//!
//! A [`FeatureGates`] value is an immutable snapshot of which capabilities are
//! turned on. It is built once (defaults, then configuration, then overrides)
//! and passed by reference into every pruning call, so concurrent admissions
//! can share a single instance and no call ever sees a gate flip mid-way.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

/// A named optional capability that guards one or more PersistentVolume fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Feature {
    /// CSI-backed persistent volume sources (`spec.csi`)
    CSIPersistentVolume,
    /// Raw block volume mode (`spec.volumeMode`)
    BlockVolume,
    /// Local persistent volumes (`spec.local`)
    PersistentLocalVolumes,
}

impl Feature {
    /// Every feature known to this build
    pub const ALL: [Feature; 3] = [
        Feature::CSIPersistentVolume,
        Feature::BlockVolume,
        Feature::PersistentLocalVolumes,
    ];

    /// Canonical gate name, as written in override strings and config files
    pub fn as_str(&self) -> &'static str {
        match self {
            Feature::CSIPersistentVolume => "CSIPersistentVolume",
            Feature::BlockVolume => "BlockVolume",
            Feature::PersistentLocalVolumes => "PersistentLocalVolumes",
        }
    }

    /// Whether the gate is on when nothing overrides it
    ///
    /// Beta features default on, alpha features default off.
    pub fn default_enabled(&self) -> bool {
        match self {
            Feature::CSIPersistentVolume => true,
            Feature::BlockVolume => false,
            Feature::PersistentLocalVolumes => true,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Feature::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| Error::unknown_feature(s))
    }
}

/// Read-only capability lookup consulted by the field droppers
pub trait FeatureLookup {
    /// Whether `feature` is enabled
    fn enabled(&self, feature: Feature) -> bool;
}

impl<T: FeatureLookup + ?Sized> FeatureLookup for &T {
    fn enabled(&self, feature: Feature) -> bool {
        (**self).enabled(feature)
    }
}

impl<T: FeatureLookup + ?Sized> FeatureLookup for Arc<T> {
    fn enabled(&self, feature: Feature) -> bool {
        (**self).enabled(feature)
    }
}

/// Feature gate state: defaults plus explicit overrides
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, bool>",
    into = "BTreeMap<String, bool>"
)]
pub struct FeatureGates {
    overrides: BTreeMap<Feature, bool>,
}

impl FeatureGates {
    /// Gates with every feature at its default
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`FeatureGates::set`]
    pub fn with(mut self, feature: Feature, enabled: bool) -> Self {
        self.set(feature, enabled);
        self
    }

    /// Override a single feature
    pub fn set(&mut self, feature: Feature, enabled: bool) {
        debug!(feature = %feature, enabled, "feature gate override");
        self.overrides.insert(feature, enabled);
    }

    /// Apply every override from `other` on top of this set
    pub fn extend(&mut self, other: &FeatureGates) {
        for (feature, enabled) in &other.overrides {
            self.set(*feature, *enabled);
        }
    }

    /// Effective state of `feature`
    pub fn is_enabled(&self, feature: Feature) -> bool {
        self.overrides
            .get(&feature)
            .copied()
            .unwrap_or_else(|| feature.default_enabled())
    }

    /// Effective state of a gate given by name, `None` for unknown names
    pub fn enabled_by_name(&self, name: &str) -> Option<bool> {
        name.parse::<Feature>().ok().map(|f| self.is_enabled(f))
    }

    /// Explicit overrides, without defaults
    pub fn overrides(&self) -> &BTreeMap<Feature, bool> {
        &self.overrides
    }

    /// Build from a `{name: enabled}` map, rejecting unknown names
    pub fn from_map<I, K>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, bool)>,
        K: AsRef<str>,
    {
        let mut gates = Self::new();
        for (name, enabled) in entries {
            let feature = name.as_ref().parse::<Feature>()?;
            gates.set(feature, enabled);
        }
        Ok(gates)
    }
}

impl FeatureLookup for FeatureGates {
    fn enabled(&self, feature: Feature) -> bool {
        self.is_enabled(feature)
    }
}

/// Parses the `Name=bool,Name=bool` override form
///
/// Blank entries are ignored, so an empty string yields the defaults.
impl FromStr for FeatureGates {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut gates = Self::new();
        for entry in s.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (name, value) = entry.split_once('=').ok_or_else(|| {
                Error::config_from(
                    "overrides",
                    format!("missing bool value for {}", entry),
                )
            })?;
            let name = name.trim();
            let value = value.trim();
            let feature = name.parse::<Feature>()?;
            let enabled = parse_bool(value).ok_or_else(|| {
                Error::invalid_gate_value(name, value, "expected a boolean")
            })?;
            gates.set(feature, enabled);
        }
        Ok(gates)
    }
}

impl TryFrom<BTreeMap<String, bool>> for FeatureGates {
    type Error = Error;

    fn try_from(map: BTreeMap<String, bool>) -> Result<Self> {
        Self::from_map(map)
    }
}

impl From<FeatureGates> for BTreeMap<String, bool> {
    fn from(gates: FeatureGates) -> Self {
        gates
            .overrides
            .into_iter()
            .map(|(f, enabled)| (f.as_str().to_string(), enabled))
            .collect()
    }
}

/// Accepts the same spellings as the control plane's flag parser
pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}
