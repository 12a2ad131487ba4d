//! Persisted snapshot format.
//!
//! The snapshot is the whitelist projection of [`PipelineState`] written to
//! local storage after every mutation. It deliberately excludes everything
//! ephemeral: loading state, progress values, and in-flight guard flags.
//!
//! The session id is persisted as a raw string and validated during merge,
//! so a corrupt value can be discarded instead of failing deserialization.
//! Array fields carry `#[serde(default)]` so missing or null fields coerce
//! to empty vectors when an old or damaged snapshot is loaded.
//!
//! [`PipelineState`]: crate::state_models::PipelineState

use crate::stage_models::PipelineStage;
use crate::state_models::{InventoryItem, MealPlan};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Current snapshot format version.
///
/// Bump on any incompatible change to [`PersistedSnapshot`]. Snapshots with
/// a different version are discarded on load.
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// The durable subset of the pipeline state.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct PersistedSnapshot {
    /// Format version; see [`SNAPSHOT_SCHEMA_VERSION`].
    #[serde(default)]
    pub schema_version: u32,

    /// Stage that was displayed when the snapshot was written.
    ///
    /// Advisory only: the merge step re-derives the stage from the shape of
    /// the persisted data, so a stale value cannot restore the UI into a
    /// dead-end state.
    pub current_stage: PipelineStage,

    /// Whether the run had produced data beyond the entry stage.
    #[serde(default)]
    pub is_active: bool,

    /// Raw session id string; validated as a UUID (versions 1-5) on merge.
    #[serde(default)]
    pub session_id: Option<String>,

    #[serde(default)]
    pub raw_detected_items: Vec<InventoryItem>,

    #[serde(default)]
    pub suggested_items: Vec<InventoryItem>,

    #[serde(default)]
    pub user_edited_inventory: Vec<InventoryItem>,

    #[serde(default)]
    pub meal_plan: Option<MealPlan>,

    /// Progress value at write time. Recomputed from the stage registry on
    /// merge; persisted only so external inspectors see a plausible value.
    #[serde(default)]
    pub seed_progress: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_arrays_coerce_to_empty() {
        // Snapshot written before the suggested_items field existed.
        let json = r#"{
            "schema_version": 1,
            "current_stage": "photo",
            "session_id": null
        }"#;

        let snapshot: PersistedSnapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.raw_detected_items.is_empty());
        assert!(snapshot.suggested_items.is_empty());
        assert!(snapshot.user_edited_inventory.is_empty());
        assert!(snapshot.meal_plan.is_none());
        assert_eq!(snapshot.seed_progress, 0.0);
    }

    #[test]
    fn test_round_trip_preserves_session_id_string() {
        let snapshot = PersistedSnapshot {
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            current_stage: PipelineStage::Validate,
            is_active: true,
            session_id: Some("not-validated-here".to_string()),
            raw_detected_items: Vec::new(),
            suggested_items: Vec::new(),
            user_edited_inventory: Vec::new(),
            meal_plan: None,
            seed_progress: 100.0,
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: PersistedSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
