//! Common types for pvgate: feature gates, gate configuration and errors

#![deny(missing_docs)]

pub mod config;
pub mod error;
pub mod features;

pub use error::Error;
pub use features::{Feature, FeatureGates, FeatureLookup};

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;
