//! Recipe action group: generated recipes and meal plan.

use crate::providers::GenerationOutcome;
use crate::store::{PipelineStore, StoreError, StoreResult};
use sf_protocol::ipc::Event;
use sf_protocol::stage_models::PipelineStage;
use sf_protocol::state_models::LoadingState;
use tracing::debug;

impl PipelineStore {
    /// Mark the remote generation call as started and move to Generate.
    ///
    /// Rejected while another remote call is in flight, or when the
    /// effective inventory is empty.
    pub async fn begin_generation(&mut self) -> StoreResult<()> {
        if self.state().effective_inventory().is_empty() {
            return Err(StoreError::EmptyInventory);
        }
        self.begin_remote(LoadingState::Generating).await?;

        if let Err(e) = self.transition(PipelineStage::Generate).await {
            // Roll the guard back so a rejected transition does not leave
            // the store refusing all future remote calls.
            self.end_remote().await;
            return Err(e);
        }
        Ok(())
    }

    /// Record the result of a generation call and move to Results.
    pub async fn record_generation(&mut self, outcome: GenerationOutcome) -> StoreResult<()> {
        let count = outcome.recipes.len();
        let has_meal_plan = outcome.meal_plan.is_some();
        {
            let state = self.state_mut();
            state.recipe_candidates = outcome.recipes;
            state.meal_plan = outcome.meal_plan;
        }
        debug!(count, has_meal_plan, "generation recorded");

        self.transition(PipelineStage::Results).await?;
        self.emit(Event::RecipesReady {
            count,
            has_meal_plan,
        })
        .await;
        Ok(())
    }
}
