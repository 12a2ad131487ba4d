//! Command dispatcher: the single mutation funnel for the pipeline.
//!
//! The dispatcher owns the store, the progress simulator, and the
//! persister, consumes `Op` commands from one channel, and runs remote
//! calls as background tasks reporting into an internal outcome channel.
//! Because every mutation passes through here, persistence happens in
//! exactly one place: after each successful mutation.
//!
//! Remote-call lifecycle:
//! 1. `begin_*` on the store (guard + loading state), simulator started
//!    over the stage's checkpoint range.
//! 2. The provider call runs in a spawned task tagged with the current
//!    epoch.
//! 3. The outcome is reconciled here: simulator finished or rolled back,
//!    loading cleared on success and on failure, result recorded,
//!    snapshot persisted.
//!
//! A reset aborts the in-flight task and bumps the epoch; outcomes tagged
//! with an older epoch are dropped, so a late completion can never write
//! into a freshly reset run.

use crate::persist::{merge, partialize, Persister};
use crate::progress::{analysis_steps, generation_steps, ProgressRange, ProgressSimulator};
use crate::providers::{
    AnalysisOutcome, GenerationOutcome, InventoryAnalyzer, ProviderError, RecipeGenerator,
};
use crate::sessions::{BackendError, SessionBackend};
use crate::store::PipelineStore;
use anyhow::Result;
use sf_protocol::config_models::StoreSettings;
use sf_protocol::ipc::{Event, Op};
use sf_protocol::stage_models::{descriptor, PipelineStage};
use sf_protocol::state_models::{LoadingState, PipelineState, ScanSession};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Completion report from a spawned remote call.
enum TaskOutcome {
    Analysis {
        epoch: u64,
        result: Result<AnalysisOutcome, ProviderError>,
    },
    Generation {
        epoch: u64,
        result: Result<GenerationOutcome, ProviderError>,
    },
    Save {
        epoch: u64,
        result: Result<ScanSession, BackendError>,
    },
}

impl TaskOutcome {
    fn epoch(&self) -> u64 {
        match self {
            TaskOutcome::Analysis { epoch, .. }
            | TaskOutcome::Generation { epoch, .. }
            | TaskOutcome::Save { epoch, .. } => *epoch,
        }
    }
}

/// Owns the pipeline and applies commands in arrival order.
pub struct PipelineDispatcher<A, G, B> {
    store: PipelineStore,
    analyzer: Arc<A>,
    generator: Arc<G>,
    backend: Arc<B>,
    simulator: ProgressSimulator,
    persister: Persister,
    settings: StoreSettings,
    ops_rx: mpsc::Receiver<Op>,
    events_tx: mpsc::Sender<Event>,
    outcome_tx: mpsc::Sender<TaskOutcome>,
    outcome_rx: mpsc::Receiver<TaskOutcome>,
    epoch: u64,
    inflight: Option<JoinHandle<()>>,
}

impl<A, G, B> PipelineDispatcher<A, G, B>
where
    A: InventoryAnalyzer + 'static,
    G: RecipeGenerator + 'static,
    B: SessionBackend + 'static,
{
    /// Create a dispatcher wired to the given collaborators and channels.
    pub fn new(
        settings: StoreSettings,
        analyzer: Arc<A>,
        generator: Arc<G>,
        backend: Arc<B>,
        ops_rx: mpsc::Receiver<Op>,
        events_tx: mpsc::Sender<Event>,
    ) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::channel(16);
        let simulator = ProgressSimulator::new(Duration::from_millis(settings.tick_interval_ms));
        let persister = Persister::new(settings.snapshot_path.clone());

        Self {
            store: PipelineStore::new(events_tx.clone()),
            analyzer,
            generator,
            backend,
            simulator,
            persister,
            settings,
            ops_rx,
            events_tx,
            outcome_tx,
            outcome_rx,
            epoch: 0,
            inflight: None,
        }
    }

    /// Subscribe to the simulated progress value.
    pub fn progress(&self) -> watch::Receiver<f32> {
        self.simulator.subscribe()
    }

    /// Rehydrate, then apply commands until `Shutdown` or channel close.
    pub async fn run(mut self) -> Result<()> {
        self.rehydrate().await;

        loop {
            tokio::select! {
                maybe_op = self.ops_rx.recv() => match maybe_op {
                    Some(op) => {
                        if !self.handle_op(op).await {
                            break;
                        }
                    }
                    None => break,
                },
                Some(outcome) = self.outcome_rx.recv() => {
                    self.handle_outcome(outcome).await;
                }
            }
        }

        if let Some(handle) = self.inflight.take() {
            handle.abort();
        }
        info!("dispatcher stopped");
        Ok(())
    }

    /// Load and repair the persisted snapshot, then announce the result.
    async fn rehydrate(&mut self) {
        let (state, corrected) = match self.persister.load() {
            Ok(Some(snapshot)) => {
                let restored = merge(snapshot);
                (restored.state, restored.corrected)
            }
            Ok(None) => (PipelineState::default(), false),
            Err(e) => {
                warn!(error = %e, "snapshot unreadable, starting fresh");
                (PipelineState::default(), true)
            }
        };

        let stage = state.current_stage;
        self.simulator.seed(state.overall_progress);
        self.store = PipelineStore::from_state(state, self.events_tx.clone());
        debug!(?stage, corrected, "rehydrated");

        let _ = self
            .events_tx
            .send(Event::StateRestored { stage, corrected })
            .await;
    }

    /// Apply one command. Returns false on `Shutdown`.
    async fn handle_op(&mut self, op: Op) -> bool {
        match op {
            Op::AddCapturedPhotos { references } => {
                match self.store.add_captured_photos(references).await {
                    Ok(()) => {
                        // While a remote call is in flight the simulator owns
                        // the displayed value; reseeding here would snap it
                        // backwards to the stage checkpoint.
                        if !self.store.state().generation_in_flight {
                            self.simulator.seed(self.store.state().overall_progress);
                        }
                        self.persist();
                    }
                    Err(e) => self.report_error("addCapturedPhotos", &e).await,
                }
            }
            Op::RemoveCapturedPhoto { index } => {
                self.store.remove_captured_photo(index).await;
                if !self.store.state().generation_in_flight {
                    self.simulator.seed(self.store.state().overall_progress);
                }
                self.persist();
            }
            Op::AnalyzePhotos => match self.store.begin_analysis().await {
                Ok(()) => {
                    self.simulator.start(
                        analysis_steps(),
                        ProgressRange::new(
                            descriptor(PipelineStage::Analyze).start_progress,
                            descriptor(PipelineStage::Complement).start_progress,
                        ),
                    );
                    let analyzer = Arc::clone(&self.analyzer);
                    let photos = self.store.state().captured_photos.clone();
                    let tx = self.outcome_tx.clone();
                    let epoch = self.epoch;
                    self.inflight = Some(tokio::spawn(async move {
                        let result = analyzer.analyze(&photos).await;
                        let _ = tx.send(TaskOutcome::Analysis { epoch, result }).await;
                    }));
                }
                Err(e) => self.report_error("analyzePhotos", &e).await,
            },
            Op::SetEditedInventory { items } => {
                match self.store.set_edited_inventory(items).await {
                    Ok(()) => self.persist(),
                    Err(e) => self.report_error("setEditedInventory", &e).await,
                }
            }
            Op::AcceptSuggestedItems { ids } => {
                match self.store.accept_suggested_items(ids).await {
                    Ok(()) => self.persist(),
                    Err(e) => self.report_error("acceptSuggestedItems", &e).await,
                }
            }
            Op::GenerateRecipes => match self.store.begin_generation().await {
                Ok(()) => {
                    self.persist();
                    self.simulator.start(
                        generation_steps(),
                        ProgressRange::new(
                            descriptor(PipelineStage::Generate).start_progress,
                            descriptor(PipelineStage::Results).start_progress,
                        ),
                    );
                    let generator = Arc::clone(&self.generator);
                    let inventory = self.store.state().effective_inventory().to_vec();
                    let tx = self.outcome_tx.clone();
                    let epoch = self.epoch;
                    self.inflight = Some(tokio::spawn(async move {
                        let result = generator.generate(&inventory).await;
                        let _ = tx.send(TaskOutcome::Generation { epoch, result }).await;
                    }));
                }
                Err(e) => self.report_error("generateRecipes", &e).await,
            },
            Op::SaveSession => match self.store.begin_remote(LoadingState::Saving).await {
                Ok(()) => {
                    let backend = Arc::clone(&self.backend);
                    let session = self.store.session_row();
                    let tx = self.outcome_tx.clone();
                    let epoch = self.epoch;
                    self.inflight = Some(tokio::spawn(async move {
                        let result = backend
                            .save_session(&session)
                            .await
                            .map(|()| session);
                        let _ = tx.send(TaskOutcome::Save { epoch, result }).await;
                    }));
                }
                Err(e) => self.report_error("saveSession", &e).await,
            },
            Op::LoadRecentSessions => {
                let limit = self.settings.recent_sessions_limit;
                match self.backend.recent_sessions(limit).await {
                    Ok(sessions) => {
                        let _ = self.events_tx.send(Event::RecentSessions { sessions }).await;
                    }
                    Err(BackendError::TableNotFound { table }) => {
                        warn!(table, "sessions table missing, returning empty list");
                        let _ = self
                            .events_tx
                            .send(Event::RecentSessions {
                                sessions: Vec::new(),
                            })
                            .await;
                    }
                    Err(e) => {
                        error!(error = %e, "recent-sessions query failed");
                        self.report_error("loadRecentSessions", &e).await;
                    }
                }
            }
            Op::ResetPipeline => {
                if let Some(handle) = self.inflight.take() {
                    handle.abort();
                }
                self.epoch += 1;
                self.simulator.seed(0.0);
                self.store.end_remote().await;
                self.store.reset().await;
                if let Err(e) = self.persister.clear() {
                    warn!(error = %e, "failed to clear snapshot");
                }
            }
            Op::Shutdown => return false,
        }
        true
    }

    /// Reconcile a remote-call completion with the store and simulator.
    async fn handle_outcome(&mut self, outcome: TaskOutcome) {
        if outcome.epoch() != self.epoch {
            debug!("stale task outcome ignored");
            return;
        }
        self.inflight = None;

        match outcome {
            TaskOutcome::Analysis { result, .. } => {
                match result {
                    Ok(analysis) => {
                        if let Err(e) = self.store.record_analysis(analysis).await {
                            self.report_error("analyzePhotos", &e).await;
                        }
                        // The transition reseeded the stored progress; snap
                        // the simulated value to match.
                        self.simulator.finish(self.store.state().overall_progress);
                        self.store.end_remote().await;
                        self.persist();
                    }
                    Err(e) => {
                        self.simulator.seed(self.store.state().overall_progress);
                        self.store.end_remote().await;
                        self.report_error("analyzePhotos", &e).await;
                    }
                }
            }
            TaskOutcome::Generation { result, .. } => match result {
                Ok(generation) => {
                    if let Err(e) = self.store.record_generation(generation).await {
                        self.report_error("generateRecipes", &e).await;
                    }
                    self.simulator.finish(self.store.state().overall_progress);
                    self.store.end_remote().await;
                    self.persist();
                }
                Err(e) => {
                    self.simulator.seed(self.store.state().overall_progress);
                    self.store.end_remote().await;
                    self.report_error("generateRecipes", &e).await;
                }
            },
            TaskOutcome::Save { result, .. } => match result {
                Ok(session) => {
                    self.store.assign_session(session.id).await;
                    self.store.end_remote().await;
                    self.persist();
                }
                Err(BackendError::TableNotFound { table }) => {
                    // Soft: the backend is not provisioned yet. The run
                    // simply stays unsaved.
                    warn!(table, "sessions table missing, session not saved");
                    self.store.end_remote().await;
                }
                Err(e) => {
                    self.store.end_remote().await;
                    self.report_error("saveSession", &e).await;
                }
            },
        }
    }

    /// Persist the current state; persistence failures degrade to a log
    /// line rather than failing the triggering operation.
    fn persist(&self) {
        let snapshot = partialize(self.store.state());
        if let Err(e) = self.persister.save(&snapshot) {
            warn!(error = %e, "snapshot persist failed");
        }
    }

    // `Sync` keeps the run future spawnable; the reference is held across
    // the event send.
    async fn report_error(&self, operation: &str, error: &(dyn std::fmt::Display + Sync)) {
        warn!(operation, %error, "operation rejected");
        let _ = self
            .events_tx
            .send(Event::PipelineError {
                operation: operation.to_string(),
                error: error.to_string(),
            })
            .await;
    }
}
