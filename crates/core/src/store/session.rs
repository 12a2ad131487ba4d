//! Session action group: backend correlation and run reset.

use crate::store::PipelineStore;
use sf_protocol::ipc::Event;
use sf_protocol::state_models::{PipelineState, ScanSession, SessionStatus};
use sf_protocol::stage_models::PipelineStage;
use tracing::{debug, info};
use uuid::Uuid;

impl PipelineStore {
    /// Record the backend session id for this run.
    pub async fn assign_session(&mut self, session_id: Uuid) {
        self.state_mut().session_id = Some(session_id);
        debug!(%session_id, "session assigned");
        self.emit(Event::SessionSaved { session_id }).await;
    }

    /// Build the session row describing the current run.
    ///
    /// Reuses the existing session id when the run was saved before, so a
    /// re-save updates the same row instead of creating a new one.
    pub fn session_row(&self) -> ScanSession {
        let state = self.state();
        ScanSession {
            id: state.session_id.unwrap_or_else(Uuid::new_v4),
            created_at: chrono::Utc::now(),
            status: if state.current_stage == PipelineStage::Results {
                SessionStatus::Completed
            } else {
                SessionStatus::InProgress
            },
        }
    }

    /// Abandon the run: clear every field back to the empty entry state.
    pub async fn reset(&mut self) {
        let photos = self.state().captured_photos.len();
        let raw = self.state().raw_detected_items.len();
        *self.state_mut() = PipelineState::default();
        info!(photos, raw, "pipeline reset");
        self.emit(Event::PipelineReset).await;
    }
}
