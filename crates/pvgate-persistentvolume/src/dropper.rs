//! Dropping disabled fields from incoming PersistentVolumes
//!
//! A field is cleared from the new snapshot only when its feature is off, the
//! old snapshot did not already use it, and the new snapshot does. The old
//! snapshot is only ever borrowed immutably.

use k8s_openapi::api::core::v1::{PersistentVolume, PersistentVolumeSpec};
use pvgate_common::FeatureLookup;
use tracing::debug;

use crate::fields::{GuardedField, PV_FIELDS, SPEC_FIELDS};

/// Apply one guarded field's policy to `new`
///
/// `old` is `None` on creation. Returns true if the field was cleared.
pub fn drop_field<T, G>(field: &GuardedField<T>, gates: &G, new: &mut T, old: Option<&T>) -> bool
where
    G: FeatureLookup + ?Sized,
{
    if gates.enabled(field.feature) {
        return false;
    }
    if old.is_some_and(field.is_used) {
        return false;
    }
    if !(field.is_used)(new) {
        return false;
    }

    (field.clear)(new);
    debug!(
        field = field.path,
        feature = %field.feature,
        "dropped field guarded by disabled feature"
    );
    true
}

fn drop_all<T, G>(
    fields: &[GuardedField<T>],
    gates: &G,
    new: &mut T,
    old: Option<&T>,
) -> Vec<&'static str>
where
    G: FeatureLookup + ?Sized,
{
    fields
        .iter()
        .filter(|field| drop_field(field, gates, new, old))
        .map(|field| field.path)
        .collect()
}

/// Drop spec-level fields (`spec.csi`, `spec.volumeMode`) whose feature is disabled
///
/// A missing `new_spec` is a no-op. Returns the paths that were cleared.
pub fn drop_disabled_fields<G>(
    new_spec: Option<&mut PersistentVolumeSpec>,
    old_spec: Option<&PersistentVolumeSpec>,
    gates: &G,
) -> Vec<&'static str>
where
    G: FeatureLookup + ?Sized,
{
    match new_spec {
        Some(new_spec) => drop_all(SPEC_FIELDS, gates, new_spec, old_spec),
        None => Vec::new(),
    }
}

/// Drop object-level fields (`spec.local`) whose feature is disabled
///
/// A missing `new_pv` is a no-op; a missing `old_pv` uses nothing. Returns the
/// paths that were cleared.
pub fn drop_disabled_pv_fields<G>(
    new_pv: Option<&mut PersistentVolume>,
    old_pv: Option<&PersistentVolume>,
    gates: &G,
) -> Vec<&'static str>
where
    G: FeatureLookup + ?Sized,
{
    match new_pv {
        Some(new_pv) => drop_all(PV_FIELDS, gates, new_pv, old_pv),
        None => Vec::new(),
    }
}
