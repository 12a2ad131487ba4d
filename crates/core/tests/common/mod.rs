//! Common test utilities shared across the integration tests.
//!
//! This module provides:
//! - Test fixtures (settings, inventory items, snapshots, a dispatcher harness)
//! - Custom assertions and event-channel helpers
//! - Mock providers for failure paths

pub mod assertions;
pub mod fixtures;
pub mod mock_providers;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use mock_providers::*;
