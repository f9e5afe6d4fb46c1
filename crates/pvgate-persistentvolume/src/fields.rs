//! Guarded PersistentVolume fields
//!
//! Each guarded field is a table entry pairing the feature that gates it with
//! two plain functions: one reporting whether a snapshot sets the field, one
//! resetting it to its zero value. Accessors only look at their own field, so
//! clearing one never changes what another reports.

use std::fmt;

use k8s_openapi::api::core::v1::{PersistentVolume, PersistentVolumeSpec};
use pvgate_common::Feature;

/// `spec.volumeMode` value for raw block devices
pub const VOLUME_MODE_BLOCK: &str = "Block";

/// `spec.volumeMode` value for a mounted filesystem
pub const VOLUME_MODE_FILESYSTEM: &str = "Filesystem";

/// An optional field whose use is gated by a feature
pub struct GuardedField<T> {
    /// Field path, used in logs and admission results (e.g., "spec.csi")
    pub path: &'static str,
    /// Feature that must be enabled for new uses of the field
    pub feature: Feature,
    /// Whether a snapshot sets the field to a non-zero value
    pub is_used: fn(&T) -> bool,
    /// Reset the field to its zero value; idempotent
    pub clear: fn(&mut T),
}

impl<T> fmt::Debug for GuardedField<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuardedField")
            .field("path", &self.path)
            .field("feature", &self.feature)
            .finish()
    }
}

/// CSI volume source, gated by `CSIPersistentVolume`
pub const CSI_SOURCE: GuardedField<PersistentVolumeSpec> = GuardedField {
    path: "spec.csi",
    feature: Feature::CSIPersistentVolume,
    is_used: csi_in_use,
    clear: clear_csi,
};

/// Volume mode, gated by `BlockVolume`
pub const VOLUME_MODE: GuardedField<PersistentVolumeSpec> = GuardedField {
    path: "spec.volumeMode",
    feature: Feature::BlockVolume,
    is_used: volume_mode_in_use,
    clear: clear_volume_mode,
};

/// Local volume source, gated by `PersistentLocalVolumes`
///
/// Evaluated against the whole object rather than the bare spec.
pub const LOCAL_SOURCE: GuardedField<PersistentVolume> = GuardedField {
    path: "spec.local",
    feature: Feature::PersistentLocalVolumes,
    is_used: local_in_use,
    clear: clear_local,
};

/// Fields pruned at the spec level
pub const SPEC_FIELDS: &[GuardedField<PersistentVolumeSpec>] = &[CSI_SOURCE, VOLUME_MODE];

/// Fields pruned at the object level
pub const PV_FIELDS: &[GuardedField<PersistentVolume>] = &[LOCAL_SOURCE];

fn csi_in_use(spec: &PersistentVolumeSpec) -> bool {
    spec.csi.is_some()
}

fn clear_csi(spec: &mut PersistentVolumeSpec) {
    spec.csi = None;
}

// Any concrete mode counts, including Filesystem: the field itself is gated.
fn volume_mode_in_use(spec: &PersistentVolumeSpec) -> bool {
    spec.volume_mode.is_some()
}

fn clear_volume_mode(spec: &mut PersistentVolumeSpec) {
    spec.volume_mode = None;
}

fn local_in_use(pv: &PersistentVolume) -> bool {
    pv.spec.as_ref().is_some_and(|spec| spec.local.is_some())
}

fn clear_local(pv: &mut PersistentVolume) {
    if let Some(spec) = pv.spec.as_mut() {
        spec.local = None;
    }
}
