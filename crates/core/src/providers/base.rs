//! Collaborator traits for the remote AI calls.
//!
//! Both collaborators are opaque final-result calls: they return one
//! artifact with no intermediate progress events, which is why the
//! progress simulator exists as a UX substitute.

use async_trait::async_trait;
use sf_protocol::state_models::{InventoryItem, MealPlan, RecipeCandidate};
use thiserror::Error;

/// Result of one inventory analysis call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalysisOutcome {
    /// Items detected in the captured photos.
    pub detected: Vec<InventoryItem>,

    /// Staple suggestions for complementing a sparse detection result.
    pub suggested: Vec<InventoryItem>,
}

/// Result of one recipe generation call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GenerationOutcome {
    /// Generated recipe candidates.
    pub recipes: Vec<RecipeCandidate>,

    /// Optional meal plan assembled from the candidates.
    pub meal_plan: Option<MealPlan>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("Provider not available: {0}")]
    Unavailable(String),
    #[error("Remote call failed: {0}")]
    Remote(String),
    #[error("Provider returned an invalid response: {0}")]
    InvalidResponse(String),
}

/// Detects inventory items in captured photos.
#[async_trait]
pub trait InventoryAnalyzer: Send + Sync {
    async fn analyze(&self, photos: &[String]) -> Result<AnalysisOutcome, ProviderError>;
}

/// Generates recipes and a meal plan from an inventory.
#[async_trait]
pub trait RecipeGenerator: Send + Sync {
    async fn generate(&self, inventory: &[InventoryItem])
        -> Result<GenerationOutcome, ProviderError>;
}
