//! # sf-protocol
//!
//! Core protocol definitions and data models for scanflow.
//!
//! This crate defines all shared data structures used for:
//! - Runtime pipeline state and domain entities
//! - The persisted snapshot format
//! - The stage registry and transition rules
//! - The Op/Event dispatch protocol between UI and core
//! - Settings parsed from `.scanflow/config.toml`
//!
//! ## Modules
//!
//! - [`stage_models`]: Stage enum, descriptor registry, transition table
//! - [`state_models`]: Pipeline state aggregate and domain types
//! - [`snapshot_models`]: Durable snapshot projection
//! - [`ipc`]: Operations and Events for UI-core communication
//! - [`config_models`]: Engine settings from config.toml
//!
//! ## Design Principles
//!
//! - Minimal dependencies: serde, ts-rs, uuid, chrono
//! - TypeScript generation: All types derive `TS` for client compatibility
//! - Independent compilation: No dependencies on other scanflow crates

pub mod config_models;
pub mod ipc;
pub mod snapshot_models;
pub mod stage_models;
pub mod state_models;

// Re-export all public types for convenience
pub use config_models::*;
pub use ipc::*;
pub use snapshot_models::*;
pub use stage_models::*;
pub use state_models::*;
