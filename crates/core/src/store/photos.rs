//! Photo action group: captured photo references.

use crate::store::{PipelineStore, StoreResult};
use sf_protocol::ipc::Event;
use sf_protocol::stage_models::PipelineStage;
use tracing::{debug, warn};

impl PipelineStore {
    /// Append captured photo references to the run.
    ///
    /// Marks the run active and, from the entry stage, moves the pipeline
    /// to Analyze (seeding its progress checkpoint). An empty input is a
    /// no-op.
    pub async fn add_captured_photos(&mut self, references: Vec<String>) -> StoreResult<()> {
        if references.is_empty() {
            return Ok(());
        }

        let before = self.state().captured_photos.len();
        {
            let state = self.state_mut();
            state.captured_photos.extend(references);
            state.is_active = true;
        }
        let after = self.state().captured_photos.len();
        debug!(before, after, "captured photos appended");

        if self.state().current_stage == PipelineStage::Photo {
            self.transition(PipelineStage::Analyze).await?;
        }

        self.emit(Event::PhotosUpdated { count: after }).await;
        Ok(())
    }

    /// Remove the photo at `index`.
    ///
    /// An out-of-range index leaves the list unchanged; removal never
    /// fails. Removing the last photo rolls the pipeline back to the entry
    /// stage so the user can capture again.
    pub async fn remove_captured_photo(&mut self, index: usize) {
        let before = self.state().captured_photos.len();
        if index >= before {
            warn!(index, len = before, "photo removal index out of range, ignoring");
            return;
        }

        self.state_mut().captured_photos.remove(index);
        let after = self.state().captured_photos.len();
        debug!(before, after, index, "captured photo removed");

        if after == 0 && self.state().current_stage == PipelineStage::Analyze {
            // Analyze -> Photo is in the transition table for exactly this.
            let _ = self.transition(PipelineStage::Photo).await;
            self.state_mut().is_active = false;
        }

        self.emit(Event::PhotosUpdated { count: after }).await;
    }
}
