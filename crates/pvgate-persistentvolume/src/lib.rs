//! Feature-gated field pruning for PersistentVolume admission
//!
//! Fields backed by optional capabilities are cleared from incoming objects
//! while their feature gate is off, unless the stored object already used
//! them. The pruning is pure and infallible; the [`admission`] module turns
//! its result into an AdmissionResponse patch.

#![deny(missing_docs)]

pub mod admission;
pub mod dropper;
pub mod fields;
pub mod strategy;

pub use dropper::{drop_disabled_fields, drop_disabled_pv_fields, drop_field};
pub use fields::GuardedField;
pub use strategy::PersistentVolumeStrategy;
