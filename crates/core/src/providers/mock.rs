//! Deterministic mock provider for tests and offline runs.

use crate::providers::base::{
    AnalysisOutcome, GenerationOutcome, InventoryAnalyzer, ProviderError, RecipeGenerator,
};
use async_trait::async_trait;
use sf_protocol::state_models::{InventoryItem, MealPlan, RecipeCandidate};
use std::time::Duration;
use uuid::Uuid;

/// A provider that derives its output mechanically from its input.
///
/// Analysis yields one detected item per photo plus a fixed pair of staple
/// suggestions; generation yields one recipe per inventory item and a meal
/// plan covering them. An optional delay approximates remote latency.
pub struct MockProvider {
    delay: Duration,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            delay: Duration::ZERO,
        }
    }

    /// Sleep for `delay` before answering, to exercise in-flight guards.
    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }

    fn item(name: &str, confidence: f32) -> InventoryItem {
        InventoryItem {
            id: Uuid::new_v4(),
            name: name.to_string(),
            quantity: 1.0,
            unit: "pcs".to_string(),
            category: "staple".to_string(),
            confidence,
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InventoryAnalyzer for MockProvider {
    async fn analyze(&self, photos: &[String]) -> Result<AnalysisOutcome, ProviderError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if photos.is_empty() {
            return Err(ProviderError::InvalidResponse(
                "no photos to analyze".to_string(),
            ));
        }

        let detected = photos
            .iter()
            .enumerate()
            .map(|(i, photo)| Self::item(&format!("item-from-{photo}"), 0.5 + 0.1 * i as f32))
            .collect();
        let suggested = vec![Self::item("salt", 1.0), Self::item("olive oil", 1.0)];

        Ok(AnalysisOutcome {
            detected,
            suggested,
        })
    }
}

#[async_trait]
impl RecipeGenerator for MockProvider {
    async fn generate(
        &self,
        inventory: &[InventoryItem],
    ) -> Result<GenerationOutcome, ProviderError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if inventory.is_empty() {
            return Err(ProviderError::InvalidResponse(
                "no inventory to cook from".to_string(),
            ));
        }

        let recipes: Vec<RecipeCandidate> = inventory
            .iter()
            .map(|item| RecipeCandidate {
                id: Uuid::new_v4(),
                title: format!("Simple {}", item.name),
                description: format!("A quick dish built around {}", item.name),
                ingredients: vec![format!("{} {} {}", item.quantity, item.unit, item.name)],
                prep_time_min: 20,
            })
            .collect();

        let meal_plan = Some(MealPlan {
            id: Uuid::new_v4(),
            title: "Plan from your fridge".to_string(),
            recipes: recipes.clone(),
        });

        Ok(GenerationOutcome { recipes, meal_plan })
    }
}
