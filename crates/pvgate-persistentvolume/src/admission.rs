//! PersistentVolume admission mutation
//!
//! Turns an AdmissionRequest for a PersistentVolume into an AdmissionResponse
//! that carries a JSON patch removing fields whose feature is disabled.
//! Serving the review over HTTP is left to the caller.

use json_patch::Patch;
use k8s_openapi::api::core::v1::PersistentVolume;
use kube::core::{
    admission::{AdmissionRequest, AdmissionResponse, AdmissionReview, Operation},
    DynamicObject,
};
use pvgate_common::{Error, FeatureLookup, Result};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::strategy::PersistentVolumeStrategy;

/// Handle a full AdmissionReview for a PersistentVolume
///
/// Malformed reviews get an `invalid` response rather than an error.
pub fn review<G: FeatureLookup>(
    strategy: &PersistentVolumeStrategy<G>,
    body: AdmissionReview<PersistentVolume>,
) -> AdmissionReview<DynamicObject> {
    let req: AdmissionRequest<PersistentVolume> = match body.try_into() {
        Ok(req) => req,
        Err(e) => {
            error!(error = %e, "Failed to parse admission request");
            return AdmissionResponse::invalid(e.to_string()).into_review();
        }
    };

    mutate(strategy, &req).into_review()
}

/// Process a single PersistentVolume admission request
///
/// CREATE and UPDATE are pruned; every other operation is allowed unchanged.
/// An UPDATE without an old object is treated as a creation.
pub fn mutate<G: FeatureLookup>(
    strategy: &PersistentVolumeStrategy<G>,
    request: &AdmissionRequest<PersistentVolume>,
) -> AdmissionResponse {
    let uid = &request.uid;

    let original = match &request.object {
        Some(pv) => pv,
        None => {
            debug!(uid = %uid, "No persistent volume in request, allowing unchanged");
            return AdmissionResponse::from(request);
        }
    };

    let mut pruned = original.clone();
    let dropped = match request.operation {
        Operation::Create => strategy.prepare_for_create(&mut pruned),
        Operation::Update => match &request.old_object {
            Some(old) => strategy.prepare_for_update(&mut pruned, old),
            None => {
                warn!(uid = %uid, "Update without old object, pruning as create");
                strategy.prepare_for_create(&mut pruned)
            }
        },
        _ => return AdmissionResponse::from(request),
    };

    if dropped.is_empty() {
        return AdmissionResponse::from(request);
    }

    info!(
        uid = %uid,
        volume = %request.name,
        fields = ?dropped,
        "Dropping fields guarded by disabled features"
    );

    let patch = match build_patch(original, &pruned) {
        Ok(patch) => patch,
        Err(e) => {
            error!(uid = %uid, error = %e, "Failed to build patch");
            return AdmissionResponse::from(request).deny(e.to_string());
        }
    };

    match AdmissionResponse::from(request).with_patch(patch) {
        Ok(response) => response,
        Err(e) => {
            error!(uid = %uid, error = %e, "Failed to serialize patch");
            AdmissionResponse::from(request).deny(format!("patch serialization error: {e}"))
        }
    }
}

/// Kind reported on patch serialization failures
const PERSISTENT_VOLUME_KIND: &str = "PersistentVolume";

/// JSON patch taking `original` to `pruned`
pub fn build_patch(original: &PersistentVolume, pruned: &PersistentVolume) -> Result<Patch> {
    let before = to_json(original)?;
    let after = to_json(pruned)?;
    Ok(json_patch::diff(&before, &after))
}

fn to_json<T: Serialize>(value: &T) -> Result<serde_json::Value> {
    serde_json::to_value(value)
        .map_err(|e| Error::serialization_for_kind(PERSISTENT_VOLUME_KIND, e.to_string()))
}
