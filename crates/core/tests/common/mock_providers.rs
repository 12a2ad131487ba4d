//! Mock providers for deterministic failure-path testing.
//!
//! The happy path uses `sf_core::providers::MockProvider`; these cover the
//! paths it cannot.

use async_trait::async_trait;
use sf_core::providers::{
    AnalysisOutcome, GenerationOutcome, InventoryAnalyzer, ProviderError, RecipeGenerator,
};
use sf_protocol::state_models::InventoryItem;

/// A provider whose every call fails with a remote error.
#[allow(dead_code)]
pub struct FailingProvider {
    pub message: String,
}

impl FailingProvider {
    #[allow(dead_code)]
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[async_trait]
impl InventoryAnalyzer for FailingProvider {
    async fn analyze(&self, _photos: &[String]) -> Result<AnalysisOutcome, ProviderError> {
        Err(ProviderError::Remote(self.message.clone()))
    }
}

#[async_trait]
impl RecipeGenerator for FailingProvider {
    async fn generate(
        &self,
        _inventory: &[InventoryItem],
    ) -> Result<GenerationOutcome, ProviderError> {
        Err(ProviderError::Remote(self.message.clone()))
    }
}
