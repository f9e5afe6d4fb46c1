//! Error types for pvgate
//!
//! Field pruning itself cannot fail. Errors only come from the layers around
//! it: parsing feature gate overrides, loading gate configuration and
//! serializing admission patches.

use thiserror::Error;

/// Main error type for pvgate operations
#[derive(Debug, Error)]
pub enum Error {
    /// A feature gate name that is not known to this build
    #[error("unrecognized feature gate: {name}")]
    UnknownFeature {
        /// The name as it was supplied
        name: String,
    },

    /// A feature gate override whose value is not a boolean
    #[error("invalid value of {name}={value}, err: {message}")]
    InvalidGateValue {
        /// Feature gate name
        name: String,
        /// The rejected value
        value: String,
        /// Why the value was rejected
        message: String,
    },

    /// Malformed gate configuration document or override string
    #[error("config error [{source_name}]: {message}")]
    Config {
        /// Where the configuration came from (e.g., "yaml", "overrides")
        source_name: String,
        /// Description of what's wrong
        message: String,
    },

    /// Serialization/deserialization error
    #[error("serialization error [{kind}]: {message}")]
    Serialization {
        /// Description of what failed
        message: String,
        /// The resource kind being serialized (e.g., "PersistentVolume")
        kind: String,
    },
}

impl Error {
    /// Create an unknown feature error
    pub fn unknown_feature(name: impl Into<String>) -> Self {
        Self::UnknownFeature { name: name.into() }
    }

    /// Create an invalid gate value error
    pub fn invalid_gate_value(
        name: impl Into<String>,
        value: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        Self::InvalidGateValue {
            name: name.into(),
            value: value.into(),
            message: msg.into(),
        }
    }

    /// Create a config error naming where the configuration came from
    pub fn config_from(source_name: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Config {
            source_name: source_name.into(),
            message: msg.into(),
        }
    }

    /// Create a serialization error with resource kind context
    pub fn serialization_for_kind(kind: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Serialization {
            message: msg.into(),
            kind: kind.into(),
        }
    }
}
