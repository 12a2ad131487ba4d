//! # sf-core
//!
//! Core pipeline engine for scanflow.
//!
//! This crate provides:
//! - Configuration loading from `.scanflow/` directory
//! - The pipeline store: staged state and its mutation surface
//! - The command dispatcher: the single mutation funnel
//! - Provider abstraction for analysis and generation backends
//! - Snapshot persistence with repair on rehydration
//! - Simulated progress for remote calls with no streaming
//!
//! ## Modules
//!
//! - [`config`]: Settings loading
//! - [`dispatch`]: Command dispatcher and remote-call reconciliation
//! - [`persist`]: Snapshot save, load, and merge
//! - [`progress`]: Fake progress simulation
//! - [`providers`]: Analysis and generation collaborator traits
//! - [`sessions`]: Session history backend
//! - [`store`]: Pipeline state and action groups

pub mod config;
pub mod dispatch;
pub mod persist;
pub mod progress;
pub mod providers;
pub mod sessions;
pub mod store;
