//! Remote collaborator seams: inventory analysis and recipe generation.

pub mod base;
pub mod mock;

pub use base::{
    AnalysisOutcome, GenerationOutcome, InventoryAnalyzer, ProviderError, RecipeGenerator,
};
pub use mock::MockProvider;
