//! Error types for pipeline store mutations.

use sf_protocol::stage_models::PipelineStage;
use thiserror::Error;

/// Errors that can occur while mutating the pipeline store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The requested stage move is not in the transition table.
    #[error("Illegal stage transition: {from:?} -> {to:?}")]
    IllegalStage {
        from: PipelineStage,
        to: PipelineStage,
    },

    /// A remote analysis/generation/save call is already in flight.
    #[error("A remote call is already in flight")]
    RemoteCallInFlight,

    /// Analysis was requested without any captured photos.
    #[error("Cannot analyze: no photos captured")]
    NoPhotos,

    /// Generation was requested with an empty effective inventory.
    #[error("Cannot generate: inventory is empty")]
    EmptyInventory,
}

/// Type alias for Result with StoreError.
pub type StoreResult<T> = Result<T, StoreError>;
