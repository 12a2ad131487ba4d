//! Snapshot persistence: partialize, merge, and the file adapter.
//!
//! A whitelist projection of the pipeline state is written after every
//! mutation and rehydrated at the next start. The merge step never trusts
//! the persisted stage verbatim: it re-derives the stage from the shape of
//! the surviving data, repairs structural damage, and reports whether a
//! destructive correction happened so the UI can tell the user.
//!
//! Repair order (fixed):
//! 1. Schema version check: a mismatch discards the snapshot.
//! 2. Array coercion, handled by serde defaults at parse time.
//! 3. Session id validation: a non-UUID value discards the snapshot
//!    (the id is the only link to the backend record; without it the run
//!    cannot be resumed meaningfully).
//! 4. Stage and `is_active` derivation from data shape.
//! 5. Ephemeral reset and progress reseed from the stage registry.

use crate::store::COMPLEMENT_RAW_ITEM_THRESHOLD;
use sf_protocol::snapshot_models::{PersistedSnapshot, SNAPSHOT_SCHEMA_VERSION};
use sf_protocol::stage_models::{descriptor, PipelineStage};
use sf_protocol::state_models::PipelineState;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

/// Errors that can occur reading or writing the snapshot file.
#[derive(Error, Debug)]
pub enum PersistError {
    /// Failed to read or write the snapshot file.
    #[error("Failed to access snapshot at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The snapshot file contains unparseable JSON.
    #[error("Failed to parse snapshot at {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Type alias for Result with PersistError.
pub type PersistResult<T> = Result<T, PersistError>;

/// A state reconstructed from a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Restored {
    pub state: PipelineState,

    /// True when the merge performed a destructive correction: an
    /// incompatible schema version or a discarded session id.
    pub corrected: bool,
}

/// Project the durable subset of the state into a snapshot.
pub fn partialize(state: &PipelineState) -> PersistedSnapshot {
    PersistedSnapshot {
        schema_version: SNAPSHOT_SCHEMA_VERSION,
        current_stage: state.current_stage,
        is_active: state.is_active,
        session_id: state.session_id.map(|id| id.to_string()),
        raw_detected_items: state.raw_detected_items.clone(),
        suggested_items: state.suggested_items.clone(),
        user_edited_inventory: state.user_edited_inventory.clone(),
        meal_plan: state.meal_plan.clone(),
        seed_progress: descriptor(state.current_stage).start_progress,
    }
}

/// Reconstruct a consistent state from a (possibly partial or stale)
/// snapshot.
pub fn merge(snapshot: PersistedSnapshot) -> Restored {
    if snapshot.schema_version != SNAPSHOT_SCHEMA_VERSION {
        warn!(
            found = snapshot.schema_version,
            expected = SNAPSHOT_SCHEMA_VERSION,
            "incompatible snapshot version, discarding"
        );
        return Restored {
            state: PipelineState::default(),
            corrected: true,
        };
    }

    // A malformed session id means the link to the backend record is gone;
    // the rest of the snapshot cannot be trusted to belong to a resumable
    // run, so the whole state is discarded.
    let session_id = match snapshot.session_id.as_deref() {
        None => None,
        Some(raw) => match parse_session_id(raw) {
            Some(id) => Some(id),
            None => {
                warn!(raw, "corrupt session id in snapshot, discarding state");
                return Restored {
                    state: PipelineState::default(),
                    corrected: true,
                };
            }
        },
    };

    let stage = derive_stage(&snapshot);
    let is_active = !snapshot.raw_detected_items.is_empty()
        || !snapshot.suggested_items.is_empty()
        || !snapshot.user_edited_inventory.is_empty()
        || snapshot.meal_plan.is_some();

    debug!(?stage, is_active, "snapshot merged");

    let state = PipelineState {
        current_stage: stage,
        is_active,
        session_id,
        // Photo references are not persisted; a resumed run re-enters at
        // the stage its inventory data supports.
        captured_photos: Vec::new(),
        raw_detected_items: snapshot.raw_detected_items,
        suggested_items: snapshot.suggested_items,
        user_edited_inventory: snapshot.user_edited_inventory,
        recipe_candidates: Vec::new(),
        meal_plan: snapshot.meal_plan,
        // Ephemerals reset unconditionally; progress reseeded from the
        // registry checkpoint of the derived stage.
        loading: Default::default(),
        overall_progress: descriptor(stage).start_progress,
        generation_in_flight: false,
    };

    Restored {
        state,
        corrected: false,
    }
}

/// Accepts canonical UUIDs of versions 1-5 only.
fn parse_session_id(raw: &str) -> Option<Uuid> {
    let id = Uuid::parse_str(raw).ok()?;
    if (1..=5).contains(&id.get_version_num()) {
        Some(id)
    } else {
        None
    }
}

/// Derive the stage to restore into from which data survived, in fixed
/// priority order. The persisted stage itself is advisory only.
fn derive_stage(snapshot: &PersistedSnapshot) -> PipelineStage {
    if !snapshot.user_edited_inventory.is_empty() {
        PipelineStage::Validate
    } else if !snapshot.suggested_items.is_empty()
        && snapshot.raw_detected_items.len() < COMPLEMENT_RAW_ITEM_THRESHOLD
    {
        PipelineStage::Complement
    } else if !snapshot.raw_detected_items.is_empty() {
        PipelineStage::Validate
    } else {
        PipelineStage::Photo
    }
}

/// Reads and writes the snapshot file.
pub struct Persister {
    path: PathBuf,
}

impl Persister {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the snapshot, going through a temp file and a rename so a
    /// crash mid-write cannot leave a truncated snapshot behind.
    pub fn save(&self, snapshot: &PersistedSnapshot) -> PersistResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| PersistError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let json = serde_json::to_vec_pretty(snapshot).map_err(|source| PersistError::Json {
            path: self.path.clone(),
            source,
        })?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(|source| PersistError::Io {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|source| PersistError::Io {
            path: self.path.clone(),
            source,
        })
    }

    /// Load the snapshot; a missing file is `None`, unparseable JSON is an
    /// error for the caller to decide on.
    pub fn load(&self) -> PersistResult<Option<PersistedSnapshot>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(PersistError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let snapshot =
            serde_json::from_str(&content).map_err(|source| PersistError::Json {
                path: self.path.clone(),
                source,
            })?;
        Ok(Some(snapshot))
    }

    /// Delete the snapshot; a missing file is not an error.
    pub fn clear(&self) -> PersistResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(PersistError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}
