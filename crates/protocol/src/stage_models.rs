//! Pipeline stage registry and transition rules.
//!
//! The scan pipeline is a fixed, ordered sequence of stages. Each stage has
//! a display descriptor (title, icon, color) and a progress checkpoint used
//! to seed the progress bar when the stage begins and to restore a plausible
//! progress value after rehydration.
//!
//! Transitions are explicit: every mutation that moves the pipeline forward
//! or backward must pass `can_transition`, so stage order is enforced rather
//! than being a convention scattered across action groups.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One stage of the guided scan workflow.
///
/// Normal forward order:
/// Photo -> Analyze -> (Complement) -> Validate -> Generate -> Results
///
/// Complement is only visited when the analysis produced suggestions for a
/// sparse inventory; otherwise the pipeline goes straight to Validate.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, TS)]
#[serde(rename_all = "camelCase")]
pub enum PipelineStage {
    /// Entry stage: the user is capturing photos.
    Photo,

    /// Photos are being analyzed by the remote inventory detector.
    Analyze,

    /// The user is complementing a sparse detected inventory with
    /// suggested items.
    Complement,

    /// The user is reviewing and correcting the detected inventory.
    Validate,

    /// Recipes and the meal plan are being generated.
    Generate,

    /// Generated artifacts are displayed; the run is complete.
    Results,
}

impl PipelineStage {
    /// Stages this stage may legally transition to.
    ///
    /// The reset operation is the only way back to `Photo` from later
    /// stages and is handled separately by the dispatcher.
    pub fn allowed_next(self) -> &'static [PipelineStage] {
        match self {
            PipelineStage::Photo => &[PipelineStage::Analyze],
            // Analyze -> Photo covers the user removing their last photo.
            PipelineStage::Analyze => &[
                PipelineStage::Complement,
                PipelineStage::Validate,
                PipelineStage::Photo,
            ],
            PipelineStage::Complement => &[PipelineStage::Validate],
            PipelineStage::Validate => &[PipelineStage::Complement, PipelineStage::Generate],
            PipelineStage::Generate => &[PipelineStage::Results],
            PipelineStage::Results => &[],
        }
    }
}

/// Returns true if moving from `from` to `to` is a legal stage transition.
///
/// A transition to the current stage is always allowed (idempotent moves
/// happen when an action re-asserts the stage it already established).
pub fn can_transition(from: PipelineStage, to: PipelineStage) -> bool {
    from == to || from.allowed_next().contains(&to)
}

/// Display and progress metadata for one pipeline stage.
#[derive(Serialize, Debug, Clone, TS)]
pub struct StageDescriptor {
    /// The stage this descriptor belongs to.
    pub stage: PipelineStage,

    /// Short display title.
    pub title: &'static str,

    /// One-line explanation shown under the title.
    pub subtitle: &'static str,

    /// Icon name resolved by the consuming UI.
    pub icon: &'static str,

    /// Accent color token resolved by the consuming UI.
    pub color: &'static str,

    /// Progress checkpoint seeded when this stage begins.
    ///
    /// Checkpoints are designer-chosen and deliberately uneven; values
    /// above 100 are valid (the bar renders multi-phase runs past the
    /// first full sweep).
    pub start_progress: f32,
}

/// The stage registry, in pipeline order.
pub static STAGES: [StageDescriptor; 6] = [
    StageDescriptor {
        stage: PipelineStage::Photo,
        title: "Capture",
        subtitle: "Photograph the contents of your fridge",
        icon: "camera",
        color: "teal",
        start_progress: 0.0,
    },
    StageDescriptor {
        stage: PipelineStage::Analyze,
        title: "Analysis",
        subtitle: "Detecting items in your photos",
        icon: "scan",
        color: "blue",
        start_progress: 33.0,
    },
    StageDescriptor {
        stage: PipelineStage::Complement,
        title: "Complement",
        subtitle: "Add staples we could not see",
        icon: "plus-circle",
        color: "violet",
        start_progress: 66.0,
    },
    StageDescriptor {
        stage: PipelineStage::Validate,
        title: "Review",
        subtitle: "Correct the detected inventory",
        icon: "check-square",
        color: "amber",
        start_progress: 100.0,
    },
    StageDescriptor {
        stage: PipelineStage::Generate,
        title: "Generation",
        subtitle: "Creating recipes from your inventory",
        icon: "sparkles",
        color: "orange",
        start_progress: 120.0,
    },
    StageDescriptor {
        stage: PipelineStage::Results,
        title: "Results",
        subtitle: "Your recipes and meal plan",
        icon: "book-open",
        color: "green",
        start_progress: 140.0,
    },
];

/// Look up the registry descriptor for a stage.
pub fn descriptor(stage: PipelineStage) -> &'static StageDescriptor {
    // STAGES covers every variant, so the lookup always succeeds.
    STAGES
        .iter()
        .find(|d| d.stage == stage)
        .unwrap_or(&STAGES[0])
}
