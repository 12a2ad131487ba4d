//! End-to-end tests for the command dispatcher.
//!
//! These drive a full pipeline over the Op/Event channels with mock
//! collaborators and verify:
//! - The complete scan-to-save happy path
//! - Reset cancelling an in-flight remote call
//! - The in-flight guard rejecting concurrent remote calls
//! - Failure paths clearing the loading indicator
//! - Soft degradation when the sessions table is missing

mod common;

use common::assertions::*;
use common::fixtures::*;
use common::mock_providers::FailingProvider;
use sf_core::providers::MockProvider;
use sf_core::sessions::MemoryBackend;
use sf_protocol::ipc::{Event, Op};
use sf_protocol::stage_models::PipelineStage;
use sf_protocol::state_models::LoadingState;
use std::sync::Arc;
use std::time::Duration;

#[tokio::test]
async fn test_full_scan_flow_from_photos_to_saved_session() {
    let dir = tempfile::tempdir().unwrap();
    let settings = test_settings(&dir);
    let snapshot_path = settings.snapshot_path.clone();
    let backend = Arc::new(MemoryBackend::new());
    let (ops_tx, mut events_rx, handle) = spawn_pipeline(
        MockProvider::new(),
        MockProvider::new(),
        Arc::clone(&backend),
        settings,
    );

    let restored = events_rx.recv().await.unwrap();
    assert!(matches!(
        restored,
        Event::StateRestored {
            stage: PipelineStage::Photo,
            corrected: false,
        }
    ));

    // Capture two photos: the pipeline enters Analyze.
    ops_tx
        .send(Op::AddCapturedPhotos {
            references: vec!["fridge.jpg".to_string(), "pantry.jpg".to_string()],
        })
        .await
        .unwrap();
    let staged = wait_for_event(&mut events_rx, |e| {
        matches!(e, Event::StageChanged { .. })
    })
    .await;
    assert!(matches!(
        staged,
        Event::StageChanged {
            stage: PipelineStage::Analyze,
            progress,
        } if progress == 33.0
    ));

    // Analyze: two detected items plus suggestions is a sparse result, so
    // the pipeline routes through Complement.
    ops_tx.send(Op::AnalyzePhotos).await.unwrap();
    let updated = wait_for_event(&mut events_rx, |e| {
        matches!(e, Event::InventoryUpdated { .. })
    })
    .await;
    assert!(matches!(
        updated,
        Event::InventoryUpdated {
            raw_count: 2,
            suggested_count: 2,
            edited_count: 0,
        }
    ));
    wait_for_event(&mut events_rx, |e| {
        matches!(
            e,
            Event::LoadingChanged {
                loading: LoadingState::Idle
            }
        )
    })
    .await;

    // The user corrects the inventory, then generates.
    ops_tx
        .send(Op::SetEditedInventory {
            items: vec![item("tomato"), item("milk"), item("basil")],
        })
        .await
        .unwrap();
    ops_tx.send(Op::GenerateRecipes).await.unwrap();

    let ready = wait_for_event(&mut events_rx, |e| {
        matches!(e, Event::RecipesReady { .. })
    })
    .await;
    assert!(matches!(
        ready,
        Event::RecipesReady {
            count: 3,
            has_meal_plan: true,
        }
    ));

    // Save and list.
    ops_tx.send(Op::SaveSession).await.unwrap();
    let saved = wait_for_event(&mut events_rx, |e| {
        matches!(e, Event::SessionSaved { .. })
    })
    .await;
    let Event::SessionSaved { session_id } = saved else {
        unreachable!()
    };
    assert!(backend.contains(session_id).await);

    ops_tx.send(Op::LoadRecentSessions).await.unwrap();
    let listed = wait_for_event(&mut events_rx, |e| {
        matches!(e, Event::RecentSessions { .. })
    })
    .await;
    let Event::RecentSessions { sessions } = listed else {
        unreachable!()
    };
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].id, session_id);

    assert!(snapshot_path.exists());

    ops_tx.send(Op::Shutdown).await.unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_reset_cancels_inflight_analysis() {
    let dir = tempfile::tempdir().unwrap();
    let settings = test_settings(&dir);
    let snapshot_path = settings.snapshot_path.clone();
    let (ops_tx, mut events_rx, handle) = spawn_pipeline(
        MockProvider::with_delay(Duration::from_millis(300)),
        MockProvider::new(),
        Arc::new(MemoryBackend::new()),
        settings,
    );

    ops_tx
        .send(Op::AddCapturedPhotos {
            references: vec!["fridge.jpg".to_string()],
        })
        .await
        .unwrap();
    ops_tx.send(Op::AnalyzePhotos).await.unwrap();
    ops_tx.send(Op::ResetPipeline).await.unwrap();

    wait_for_event(&mut events_rx, |e| matches!(e, Event::PipelineReset)).await;

    // Wait well past the provider delay: the aborted call must not land.
    let late = collect_events_for(&mut events_rx, Duration::from_millis(600)).await;
    assert_no_inventory_update(&late);
    assert!(
        !late.iter().any(|e| matches!(e, Event::StageChanged { .. })),
        "stage changed after reset: {late:?}"
    );
    assert!(!snapshot_path.exists(), "snapshot survived the reset");

    ops_tx.send(Op::Shutdown).await.unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_concurrent_remote_call_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (ops_tx, mut events_rx, handle) = spawn_pipeline(
        MockProvider::with_delay(Duration::from_millis(300)),
        MockProvider::new(),
        Arc::new(MemoryBackend::new()),
        test_settings(&dir),
    );

    ops_tx
        .send(Op::AddCapturedPhotos {
            references: vec!["fridge.jpg".to_string()],
        })
        .await
        .unwrap();
    ops_tx.send(Op::AnalyzePhotos).await.unwrap();
    ops_tx.send(Op::AnalyzePhotos).await.unwrap();

    let error = wait_for_event(&mut events_rx, |e| {
        matches!(e, Event::PipelineError { .. })
    })
    .await;
    assert!(matches!(
        error,
        Event::PipelineError { operation, .. } if operation == "analyzePhotos"
    ));

    // The first call still completes normally.
    wait_for_event(&mut events_rx, |e| {
        matches!(e, Event::InventoryUpdated { .. })
    })
    .await;

    ops_tx.send(Op::Shutdown).await.unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_failed_analysis_clears_loading_and_reports() {
    let dir = tempfile::tempdir().unwrap();
    let (ops_tx, mut events_rx, handle) = spawn_pipeline(
        FailingProvider::new("vision model unavailable"),
        FailingProvider::new("vision model unavailable"),
        Arc::new(MemoryBackend::new()),
        test_settings(&dir),
    );

    ops_tx
        .send(Op::AddCapturedPhotos {
            references: vec!["fridge.jpg".to_string()],
        })
        .await
        .unwrap();
    ops_tx.send(Op::AnalyzePhotos).await.unwrap();

    let error = wait_for_event(&mut events_rx, |e| {
        matches!(e, Event::PipelineError { .. })
    })
    .await;
    assert!(matches!(
        error,
        Event::PipelineError { operation, error }
            if operation == "analyzePhotos" && error.contains("vision model unavailable")
    ));

    // The guard was released: a retry starts a new call instead of being
    // rejected as concurrent.
    ops_tx.send(Op::AnalyzePhotos).await.unwrap();
    let loading = wait_for_event(&mut events_rx, |e| {
        matches!(e, Event::LoadingChanged { .. })
    })
    .await;
    assert!(matches!(
        loading,
        Event::LoadingChanged {
            loading: LoadingState::Analyzing
        }
    ));

    ops_tx.send(Op::Shutdown).await.unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_missing_sessions_table_degrades_softly() {
    let dir = tempfile::tempdir().unwrap();
    let (ops_tx, mut events_rx, handle) = spawn_pipeline(
        MockProvider::new(),
        MockProvider::new(),
        Arc::new(MemoryBackend::with_missing_table()),
        test_settings(&dir),
    );

    ops_tx.send(Op::SaveSession).await.unwrap();
    ops_tx.send(Op::LoadRecentSessions).await.unwrap();

    let listed = wait_for_event(&mut events_rx, |e| {
        matches!(e, Event::RecentSessions { .. })
    })
    .await;
    let Event::RecentSessions { sessions } = listed else {
        unreachable!()
    };
    assert!(sessions.is_empty());

    // The failed save surfaced as neither a saved session nor an error.
    let rest = collect_events_for(&mut events_rx, Duration::from_millis(200)).await;
    assert!(!rest.iter().any(|e| matches!(e, Event::SessionSaved { .. })));
    assert!(!rest
        .iter()
        .any(|e| matches!(e, Event::PipelineError { .. })));

    ops_tx.send(Op::Shutdown).await.unwrap();
    handle.await.unwrap().unwrap();
}
