//! Runtime pipeline state and domain types.
//!
//! This module defines the single mutable aggregate for one scan workflow
//! run, plus the domain entities that flow through it (detected inventory
//! items, generated recipes, meal plans, backend session rows).

use crate::stage_models::PipelineStage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// The network operation currently in flight, independent of the stage.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoadingState {
    /// No remote call in flight.
    #[default]
    Idle,

    /// Photos are being uploaded.
    Uploading,

    /// The inventory detector is analyzing photos.
    Analyzing,

    /// Recipes/meal plan are being generated.
    Generating,

    /// The session is being saved to the backend.
    Saving,
}

/// One inventory item, either detected by analysis or entered by the user.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct InventoryItem {
    /// Stable identifier, assigned when the item first appears.
    #[ts(type = "string")]
    pub id: Uuid,

    /// Display name, e.g. "tomato".
    pub name: String,

    /// Quantity in `unit`.
    pub quantity: f32,

    /// Unit of measure, e.g. "pcs" or "g".
    pub unit: String,

    /// Coarse category, e.g. "vegetable" or "dairy".
    pub category: String,

    /// Detector confidence in [0, 1]; user-entered items carry 1.0.
    pub confidence: f32,
}

/// One generated recipe candidate.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct RecipeCandidate {
    #[ts(type = "string")]
    pub id: Uuid,

    pub title: String,

    pub description: String,

    /// Ingredient display lines, already quantified.
    pub ingredients: Vec<String>,

    /// Estimated preparation time in minutes.
    pub prep_time_min: u32,
}

/// A generated meal plan built from recipe candidates.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct MealPlan {
    #[ts(type = "string")]
    pub id: Uuid,

    pub title: String,

    /// The recipes scheduled by this plan, in serving order.
    pub recipes: Vec<RecipeCandidate>,
}

/// Lifecycle status of a backend session row.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionStatus {
    /// The scan is still in progress.
    InProgress,

    /// The scan completed and its artifacts were saved.
    Completed,

    /// The scan was abandoned before completion.
    Abandoned,
}

/// A scan session row as stored by the backend.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct ScanSession {
    #[ts(type = "string")]
    pub id: Uuid,

    /// Creation time; recent-session queries order by this, newest first.
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,

    pub status: SessionStatus,
}

/// The single mutable aggregate for one scan workflow run.
///
/// Created empty at startup, populated incrementally by the store's action
/// groups, selectively persisted after every mutation, and rehydrated with
/// repair at the next start.
///
/// `loading`, `overall_progress`, and `generation_in_flight` are ephemeral:
/// they never survive rehydration and are reset to their idle/zero values
/// immediately after a snapshot is merged.
#[derive(Serialize, Debug, Clone, PartialEq, TS)]
pub struct PipelineState {
    /// The stage currently displayed; drives which view renders.
    pub current_stage: PipelineStage,

    /// True once any stage beyond the entry stage has produced data.
    pub is_active: bool,

    /// Server-recognized session identifier correlating this run with
    /// backend records. None until a session has been saved.
    #[ts(type = "string | null")]
    pub session_id: Option<Uuid>,

    /// Opaque image references, in capture order.
    pub captured_photos: Vec<String>,

    /// Inventory items as returned by the analysis call.
    pub raw_detected_items: Vec<InventoryItem>,

    /// Staple suggestions produced alongside a sparse detection result.
    pub suggested_items: Vec<InventoryItem>,

    /// User-corrected inventory. Once populated it takes precedence over
    /// `raw_detected_items` for every downstream step.
    pub user_edited_inventory: Vec<InventoryItem>,

    /// Generated recipe candidates; empty until generation completes.
    pub recipe_candidates: Vec<RecipeCandidate>,

    /// Generated meal plan; None until generation completes.
    pub meal_plan: Option<MealPlan>,

    /// The remote operation currently in flight. Ephemeral.
    pub loading: LoadingState,

    /// Displayed progress value. Ephemeral; reseeded from the stage
    /// registry on rehydration.
    pub overall_progress: f32,

    /// Guard flag: a remote analysis/generation call is in flight and a
    /// second one must be rejected. Ephemeral.
    pub generation_in_flight: bool,
}

impl Default for PipelineState {
    fn default() -> Self {
        Self {
            current_stage: PipelineStage::Photo,
            is_active: false,
            session_id: None,
            captured_photos: Vec::new(),
            raw_detected_items: Vec::new(),
            suggested_items: Vec::new(),
            user_edited_inventory: Vec::new(),
            recipe_candidates: Vec::new(),
            meal_plan: None,
            loading: LoadingState::default(),
            overall_progress: 0.0,
            generation_in_flight: false,
        }
    }
}

impl PipelineState {
    /// The inventory downstream steps should consume: the user-edited list
    /// once it exists, otherwise the raw detection result.
    pub fn effective_inventory(&self) -> &[InventoryItem] {
        if self.user_edited_inventory.is_empty() {
            &self.raw_detected_items
        } else {
            &self.user_edited_inventory
        }
    }
}
