//! Command/event protocol between the UI and the pipeline core.
//!
//! All state mutation is funneled through this protocol: the UI sends `Op`
//! commands over a channel, the dispatcher applies them to the store, and
//! status changes come back as `Event`s. Views never mutate the store
//! directly, so ordering and persistence hooks live in exactly one place.
//!
//! Both enums use tagged serialization for TypeScript compatibility:
//! ```json
//! {
//!   "type": "addCapturedPhotos",
//!   "payload": { "references": ["photo-1.jpg"] }
//! }
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::stage_models::PipelineStage;
use crate::state_models::{InventoryItem, LoadingState, ScanSession};

/// Commands sent from the UI to the pipeline core.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Op {
    /// Append captured photo references to the run.
    ///
    /// Marks the run active and moves the pipeline to the Analyze stage.
    AddCapturedPhotos { references: Vec<String> },

    /// Remove the photo at `index`.
    ///
    /// An out-of-range index leaves the list unchanged.
    RemoveCapturedPhoto { index: usize },

    /// Run the remote inventory analysis over the captured photos.
    ///
    /// Rejected with a `PipelineError` event while another remote call is
    /// in flight.
    AnalyzePhotos,

    /// Replace the user-corrected inventory.
    ///
    /// Moves the pipeline to the Validate stage.
    SetEditedInventory { items: Vec<InventoryItem> },

    /// Move the named suggestions into the user-corrected inventory.
    AcceptSuggestedItems {
        #[ts(type = "string[]")]
        ids: Vec<Uuid>,
    },

    /// Generate recipes and a meal plan from the effective inventory.
    ///
    /// Rejected with a `PipelineError` event while another remote call is
    /// in flight.
    GenerateRecipes,

    /// Save the current run as a session on the backend.
    SaveSession,

    /// Fetch the most recent sessions from the backend.
    LoadRecentSessions,

    /// Abandon the run: abort in-flight work, clear state and snapshot.
    ResetPipeline,

    /// Drain and exit the dispatcher.
    Shutdown,
}

/// Status updates sent from the pipeline core to the UI.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum Event {
    /// The pipeline moved to a new stage.
    StageChanged {
        stage: PipelineStage,
        /// Progress value seeded from the stage's registry checkpoint.
        progress: f32,
    },

    /// The in-flight network operation changed.
    LoadingChanged { loading: LoadingState },

    /// The captured photo list changed.
    PhotosUpdated { count: usize },

    /// Detected/suggested/edited inventory counts changed.
    InventoryUpdated {
        raw_count: usize,
        suggested_count: usize,
        edited_count: usize,
    },

    /// Recipe generation completed.
    RecipesReady { count: usize, has_meal_plan: bool },

    /// The run was saved as a backend session.
    SessionSaved {
        #[ts(type = "string")]
        session_id: Uuid,
    },

    /// Result of a recent-sessions query.
    RecentSessions { sessions: Vec<ScanSession> },

    /// Emitted once after startup rehydration.
    ///
    /// `corrected` is true when the merge performed a destructive repair
    /// (discarded session id or incompatible snapshot), so the UI can tell
    /// the user their in-progress scan was lost.
    StateRestored { stage: PipelineStage, corrected: bool },

    /// The run was abandoned and the state cleared.
    PipelineReset,

    /// An operation failed; `operation` names the originating `Op`.
    PipelineError { operation: String, error: String },
}
