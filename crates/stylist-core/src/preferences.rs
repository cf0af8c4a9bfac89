//! Preference merging and per-identity upsert.
//!
//! A [`PreferenceRecord`] accumulates the deltas extracted from every
//! utterance of one identity. Merging is a field-wise patch: fields present
//! in the delta overwrite, absent fields keep their stored value.
//!
//! [`upsert`] is a read-modify-write over a [`PreferenceStore`]. It is not
//! atomic against concurrent upserts for the same identity; callers that
//! need strict consistency serialize per identity.

use anyhow::Result;
use tracing::{debug, info};

use crate::models::{Identity, PreferenceDelta, PreferenceRecord};
use crate::store::PreferenceStore;

/// Overlay the present fields of `patch` onto `base`.
pub fn merge(base: &PreferenceDelta, patch: &PreferenceDelta) -> PreferenceDelta {
    fn pick<T: Clone>(base: &Option<T>, patch: &Option<T>) -> Option<T> {
        patch.clone().or_else(|| base.clone())
    }

    PreferenceDelta {
        search_term: pick(&base.search_term, &patch.search_term),
        category: pick(&base.category, &patch.category),
        style: pick(&base.style, &patch.style),
        face_shape: pick(&base.face_shape, &patch.face_shape),
        color_preference: pick(&base.color_preference, &patch.color_preference),
        keywords: if patch.keywords.is_empty() {
            base.keywords.clone()
        } else {
            patch.keywords.clone()
        },
        price_min: pick(&base.price_min, &patch.price_min),
        price_max: pick(&base.price_max, &patch.price_max),
    }
}

/// Merge `delta` into the record for `identity` and persist it.
///
/// - No record: a new one is created from the delta with `created_at = now`.
/// - Existing record: present fields overwrite and `updated_at = now`.
/// - Empty delta: nothing is written and the existing record (if any) is
///   returned unchanged.
///
/// Performs exactly one `save_preference` call when `delta` is non-empty.
pub async fn upsert<S: PreferenceStore + ?Sized>(
    store: &S,
    identity: &Identity,
    delta: &PreferenceDelta,
) -> Result<Option<PreferenceRecord>> {
    let existing = store.find_preference(identity).await?;

    if delta.is_empty() {
        debug!(%identity, "empty delta, preference record unchanged");
        return Ok(existing);
    }

    let now = chrono::Utc::now().timestamp();
    let record = match existing {
        Some(mut record) => {
            record.preferences = merge(&record.preferences, delta);
            record.updated_at = Some(now);
            record
        }
        None => PreferenceRecord {
            identity: identity.clone(),
            preferences: delta.clone(),
            created_at: now,
            updated_at: None,
        },
    };

    store.save_preference(&record).await?;
    info!(
        %identity,
        fields = delta.field_count(),
        created = record.updated_at.is_none(),
        "saved preferences"
    );
    Ok(Some(record))
}
