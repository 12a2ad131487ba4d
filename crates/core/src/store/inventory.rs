//! Inventory action group: detected, suggested, and user-edited items.

use crate::providers::AnalysisOutcome;
use crate::store::{PipelineStore, StoreError, StoreResult};
use sf_protocol::ipc::Event;
use sf_protocol::stage_models::PipelineStage;
use sf_protocol::state_models::{InventoryItem, LoadingState};
use tracing::debug;
use uuid::Uuid;

/// Below this raw-item count, a detection result with suggestions routes
/// the pipeline through the Complement stage instead of straight to
/// Validate.
pub const COMPLEMENT_RAW_ITEM_THRESHOLD: usize = 5;

impl PipelineStore {
    /// Mark the remote analysis call as started.
    ///
    /// Rejected while another remote call is in flight, or when there is
    /// nothing to analyze.
    pub async fn begin_analysis(&mut self) -> StoreResult<()> {
        if self.state().captured_photos.is_empty() {
            return Err(StoreError::NoPhotos);
        }
        self.begin_remote(LoadingState::Analyzing).await
    }

    /// Record the result of an analysis call.
    ///
    /// Routes to Complement when the detector produced suggestions for a
    /// sparse inventory, otherwise to Validate.
    pub async fn record_analysis(&mut self, outcome: AnalysisOutcome) -> StoreResult<()> {
        let raw_before = self.state().raw_detected_items.len();
        {
            let state = self.state_mut();
            state.raw_detected_items = outcome.detected;
            state.suggested_items = outcome.suggested;
        }

        let raw_count = self.state().raw_detected_items.len();
        let suggested_count = self.state().suggested_items.len();
        debug!(raw_before, raw_count, suggested_count, "analysis recorded");

        let next = if suggested_count > 0 && raw_count < COMPLEMENT_RAW_ITEM_THRESHOLD {
            PipelineStage::Complement
        } else {
            PipelineStage::Validate
        };
        self.transition(next).await?;

        self.emit_inventory_counts().await;
        Ok(())
    }

    /// Replace the user-corrected inventory and move to Validate.
    ///
    /// Once populated, the edited list takes precedence over the raw
    /// detection result for every downstream step.
    pub async fn set_edited_inventory(&mut self, items: Vec<InventoryItem>) -> StoreResult<()> {
        let before = self.state().user_edited_inventory.len();
        self.state_mut().user_edited_inventory = items;
        let after = self.state().user_edited_inventory.len();
        debug!(before, after, "edited inventory replaced");

        self.transition(PipelineStage::Validate).await?;
        self.emit_inventory_counts().await;
        Ok(())
    }

    /// Move the named suggestions into the user-corrected inventory.
    ///
    /// When the edited list is still empty it is seeded from the raw
    /// detection result first, so accepting a suggestion never drops the
    /// detected items. Unknown ids are ignored.
    pub async fn accept_suggested_items(&mut self, ids: Vec<Uuid>) -> StoreResult<()> {
        let before = self.state().user_edited_inventory.len();
        {
            let state = self.state_mut();
            if state.user_edited_inventory.is_empty() {
                state.user_edited_inventory = state.raw_detected_items.clone();
            }
            let mut accepted: Vec<InventoryItem> = Vec::new();
            state.suggested_items.retain(|item| {
                if ids.contains(&item.id) {
                    accepted.push(item.clone());
                    false
                } else {
                    true
                }
            });
            state.user_edited_inventory.extend(accepted);
        }
        let after = self.state().user_edited_inventory.len();
        debug!(before, after, "suggestions accepted");

        self.transition(PipelineStage::Validate).await?;
        self.emit_inventory_counts().await;
        Ok(())
    }

    async fn emit_inventory_counts(&self) {
        let state = self.state();
        self.emit(Event::InventoryUpdated {
            raw_count: state.raw_detected_items.len(),
            suggested_count: state.suggested_items.len(),
            edited_count: state.user_edited_inventory.len(),
        })
        .await;
    }
}
