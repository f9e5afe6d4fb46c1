//! Create/update preparation for PersistentVolumes
//!
//! Runs both droppers in the order the admission path needs them: spec-level
//! fields first, then fields that are evaluated against the whole object.

use k8s_openapi::api::core::v1::PersistentVolume;
use pvgate_common::FeatureLookup;

use crate::dropper::{drop_disabled_fields, drop_disabled_pv_fields};

/// Prepares incoming PersistentVolumes against a set of feature gates
#[derive(Debug, Clone)]
pub struct PersistentVolumeStrategy<G> {
    gates: G,
}

impl<G: FeatureLookup> PersistentVolumeStrategy<G> {
    /// Create a strategy consulting `gates`
    pub fn new(gates: G) -> Self {
        Self { gates }
    }

    /// The gates this strategy consults
    pub fn gates(&self) -> &G {
        &self.gates
    }

    /// Drop disabled fields from a PersistentVolume being created
    ///
    /// Returns the paths that were cleared.
    pub fn prepare_for_create(&self, pv: &mut PersistentVolume) -> Vec<&'static str> {
        self.prepare(pv, None)
    }

    /// Drop disabled fields from an update, keeping those the stored object
    /// already used
    ///
    /// Returns the paths that were cleared.
    pub fn prepare_for_update(
        &self,
        new: &mut PersistentVolume,
        old: &PersistentVolume,
    ) -> Vec<&'static str> {
        self.prepare(new, Some(old))
    }

    fn prepare(
        &self,
        new: &mut PersistentVolume,
        old: Option<&PersistentVolume>,
    ) -> Vec<&'static str> {
        let mut dropped = drop_disabled_fields(
            new.spec.as_mut(),
            old.and_then(|pv| pv.spec.as_ref()),
            &self.gates,
        );
        dropped.extend(drop_disabled_pv_fields(Some(new), old, &self.gates));
        dropped
    }
}
