//! The pipeline store: one state aggregate, mutated by action groups.
//!
//! The store owns the [`PipelineState`] for the current run and the event
//! channel back to the UI. Mutations are grouped by the entity they touch:
//!
//! - [`photos`]: captured photo references
//! - [`inventory`]: detected/suggested/edited inventory items
//! - [`recipes`]: generated recipes and meal plan
//! - [`session`]: session bookkeeping and reset
//!
//! Every stage move goes through [`PipelineStore::transition`], which
//! enforces the transition table and reseeds the displayed progress from
//! the stage registry. Nothing outside the dispatcher should hold a store
//! reference; views talk to the pipeline exclusively through `Op` commands.

pub mod error;
mod inventory;
mod photos;
mod recipes;
mod session;

pub use error::{StoreError, StoreResult};
pub use inventory::COMPLEMENT_RAW_ITEM_THRESHOLD;

use sf_protocol::ipc::Event;
use sf_protocol::stage_models::{can_transition, descriptor, PipelineStage};
use sf_protocol::state_models::{LoadingState, PipelineState};
use tokio::sync::mpsc::Sender;
use tracing::debug;

/// Owns the pipeline state for one run and emits events on change.
pub struct PipelineStore {
    state: PipelineState,
    events_tx: Sender<Event>,
}

impl PipelineStore {
    /// Create a store with an empty state at the entry stage.
    pub fn new(events_tx: Sender<Event>) -> Self {
        Self {
            state: PipelineState::default(),
            events_tx,
        }
    }

    /// Create a store from a rehydrated state.
    pub fn from_state(state: PipelineState, events_tx: Sender<Event>) -> Self {
        Self { state, events_tx }
    }

    /// Read access to the current state.
    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// Mutable access for action groups within this module tree.
    pub(crate) fn state_mut(&mut self) -> &mut PipelineState {
        &mut self.state
    }

    /// Move the pipeline to `to`, enforcing the transition table.
    ///
    /// Seeds the displayed progress from the target stage's registry
    /// checkpoint and emits [`Event::StageChanged`]. A transition to the
    /// current stage is a no-op that emits nothing.
    pub async fn transition(&mut self, to: PipelineStage) -> StoreResult<()> {
        let from = self.state.current_stage;
        if from == to {
            return Ok(());
        }
        if !can_transition(from, to) {
            return Err(StoreError::IllegalStage { from, to });
        }

        let progress = descriptor(to).start_progress;
        self.state.current_stage = to;
        self.state.overall_progress = progress;
        debug!(?from, ?to, progress, "stage transition");

        let _ = self
            .events_tx
            .send(Event::StageChanged {
                stage: to,
                progress,
            })
            .await;
        Ok(())
    }

    /// Mark a remote call as started: reject if one is already in flight,
    /// then record the loading state.
    pub async fn begin_remote(&mut self, loading: LoadingState) -> StoreResult<()> {
        if self.state.generation_in_flight {
            return Err(StoreError::RemoteCallInFlight);
        }
        self.state.generation_in_flight = true;
        self.set_loading(loading).await;
        Ok(())
    }

    /// Mark the in-flight remote call as finished.
    ///
    /// Called on success and on failure, so the loading indicator can never
    /// get stuck on a rejected call.
    pub async fn end_remote(&mut self) {
        self.state.generation_in_flight = false;
        self.set_loading(LoadingState::Idle).await;
    }

    /// Set the loading state and emit [`Event::LoadingChanged`] on change.
    pub async fn set_loading(&mut self, loading: LoadingState) {
        if self.state.loading == loading {
            return;
        }
        self.state.loading = loading;
        let _ = self.events_tx.send(Event::LoadingChanged { loading }).await;
    }

    pub(crate) async fn emit(&self, event: Event) {
        let _ = self.events_tx.send(event).await;
    }
}
