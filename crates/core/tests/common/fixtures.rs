//! Test fixtures for settings, sample data, and a running dispatcher.

use sf_core::dispatch::PipelineDispatcher;
use sf_core::providers::{InventoryAnalyzer, RecipeGenerator};
use sf_core::sessions::SessionBackend;
use sf_protocol::config_models::StoreSettings;
use sf_protocol::ipc::{Event, Op};
use sf_protocol::snapshot_models::{PersistedSnapshot, SNAPSHOT_SCHEMA_VERSION};
use sf_protocol::stage_models::PipelineStage;
use sf_protocol::state_models::InventoryItem;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Settings pointing the snapshot into a temp directory, with a fast
/// simulator tick so tests stay quick.
#[allow(dead_code)]
pub fn test_settings(dir: &TempDir) -> StoreSettings {
    StoreSettings {
        snapshot_path: dir.path().join("snapshot.json"),
        recent_sessions_limit: 10,
        tick_interval_ms: 10,
    }
}

/// A sample inventory item.
#[allow(dead_code)]
pub fn item(name: &str) -> InventoryItem {
    InventoryItem {
        id: Uuid::new_v4(),
        name: name.to_string(),
        quantity: 1.0,
        unit: "pcs".to_string(),
        category: "vegetable".to_string(),
        confidence: 0.9,
    }
}

/// An empty, current-version snapshot to build test cases from.
#[allow(dead_code)]
pub fn empty_snapshot() -> PersistedSnapshot {
    PersistedSnapshot {
        schema_version: SNAPSHOT_SCHEMA_VERSION,
        current_stage: PipelineStage::Photo,
        is_active: false,
        session_id: None,
        raw_detected_items: Vec::new(),
        suggested_items: Vec::new(),
        user_edited_inventory: Vec::new(),
        meal_plan: None,
        seed_progress: 0.0,
    }
}

/// Spawn a dispatcher over the given collaborators.
///
/// The backend is taken as an `Arc` so the test can keep a handle and
/// inspect it after the run. Returns the command sender, the event
/// receiver, and the dispatcher task handle.
#[allow(dead_code)]
pub fn spawn_pipeline<A, G, B>(
    analyzer: A,
    generator: G,
    backend: Arc<B>,
    settings: StoreSettings,
) -> (
    mpsc::Sender<Op>,
    mpsc::Receiver<Event>,
    JoinHandle<anyhow::Result<()>>,
)
where
    A: InventoryAnalyzer + 'static,
    G: RecipeGenerator + 'static,
    B: SessionBackend + 'static,
{
    let (ops_tx, ops_rx) = mpsc::channel(32);
    let (events_tx, events_rx) = mpsc::channel(256);
    let dispatcher = PipelineDispatcher::new(
        settings,
        Arc::new(analyzer),
        Arc::new(generator),
        backend,
        ops_rx,
        events_tx,
    );
    let handle = tokio::spawn(dispatcher.run());
    (ops_tx, events_rx, handle)
}
