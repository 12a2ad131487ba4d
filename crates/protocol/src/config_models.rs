//! Settings models for `.scanflow/config.toml`.
//!
//! This module defines the structure of the settings file that controls
//! engine-wide behavior: where the snapshot lives, how many recent sessions
//! to fetch, and how fast the progress simulator ticks.

use serde::Deserialize;
use serde::Serialize;
use std::path::PathBuf;
use ts_rs::TS;

/// Engine settings from `.scanflow/config.toml`.
///
/// Every field has a default so a missing file or a partial file both work.
///
/// # Example
///
/// ```toml
/// # .scanflow/config.toml
/// snapshot-path = ".scanflow/snapshot.json"
/// recent-sessions-limit = 10
/// tick-interval-ms = 100
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "kebab-case")]
pub struct StoreSettings {
    /// Path of the persisted snapshot file.
    #[serde(default = "default_snapshot_path")]
    #[ts(type = "string")]
    pub snapshot_path: PathBuf,

    /// Maximum number of rows returned by recent-session queries.
    #[serde(default = "default_recent_sessions_limit")]
    pub recent_sessions_limit: usize,

    /// Progress simulator tick interval in milliseconds.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

fn default_snapshot_path() -> PathBuf {
    PathBuf::from(".scanflow/snapshot.json")
}

fn default_recent_sessions_limit() -> usize {
    10
}

fn default_tick_interval_ms() -> u64 {
    100
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
            recent_sessions_limit: default_recent_sessions_limit(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}
