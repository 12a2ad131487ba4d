//! Progress simulation for remote calls with no real progress events.
//!
//! The analysis and generation collaborators return one final artifact, so
//! the UI has nothing to animate while they run. The simulator drives a
//! smoothly interpolated percentage through an ordered list of fake steps,
//! mapped into the global checkpoint range of the stage in flight.
//!
//! The simulated value has no relation to actual backend completion. The
//! dispatcher reconciles manually when the real call resolves: `finish`
//! snaps to the end of the range, `stop` leaves the value where it was.
//!
//! At most one driver task is alive at a time; starting a new simulation
//! always aborts the previous one first.

use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

/// One synthetic, time-boxed progress phase.
#[derive(Debug, Clone)]
pub struct FakeStep {
    /// Status message shown while this phase runs.
    pub message: String,

    /// How long the phase takes to sweep its share of the range.
    pub duration: Duration,

    /// Icon name resolved by the consuming UI.
    pub icon: String,
}

impl FakeStep {
    pub fn new(message: &str, duration: Duration, icon: &str) -> Self {
        Self {
            message: message.to_string(),
            duration,
            icon: icon.to_string(),
        }
    }
}

/// The global progress range a simulation sweeps, in checkpoint units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressRange {
    pub start: f32,
    pub end: f32,
}

impl ProgressRange {
    pub fn new(start: f32, end: f32) -> Self {
        Self { start, end }
    }
}

/// Drives a fake, monotonically increasing progress value on a timer.
pub struct ProgressSimulator {
    value_tx: watch::Sender<f32>,
    tick: Duration,
    driver: Option<JoinHandle<()>>,
}

impl ProgressSimulator {
    /// Create a simulator ticking at `tick` (100 ms in production).
    pub fn new(tick: Duration) -> Self {
        let (value_tx, _) = watch::channel(0.0);
        Self {
            value_tx,
            tick,
            driver: None,
        }
    }

    /// Subscribe to the simulated value.
    pub fn subscribe(&self) -> watch::Receiver<f32> {
        self.value_tx.subscribe()
    }

    /// The current simulated value.
    pub fn value(&self) -> f32 {
        *self.value_tx.borrow()
    }

    /// True while a driver task is alive.
    pub fn is_running(&self) -> bool {
        self.driver.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Start a simulation over `range`, aborting any previous one.
    ///
    /// Each fake step sweeps an equal share of the range; within a step the
    /// value advances proportionally to elapsed time over the step's
    /// duration, clamped so it never runs ahead of the step's share. After
    /// the last step the value snaps exactly to `range.end`.
    pub fn start(&mut self, steps: Vec<FakeStep>, range: ProgressRange) {
        self.stop();
        self.value_tx.send_replace(range.start);

        if steps.is_empty() {
            self.value_tx.send_replace(range.end);
            return;
        }

        let value_tx = self.value_tx.clone();
        let tick = self.tick;
        self.driver = Some(tokio::spawn(async move {
            let span = (range.end - range.start) / steps.len() as f32;
            let mut interval = tokio::time::interval(tick);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            for (index, step) in steps.iter().enumerate() {
                debug!(message = %step.message, icon = %step.icon, "progress step");
                let step_start = range.start + span * index as f32;
                let started = Instant::now();

                loop {
                    interval.tick().await;
                    let fraction = if step.duration.is_zero() {
                        1.0
                    } else {
                        (started.elapsed().as_secs_f32() / step.duration.as_secs_f32()).min(1.0)
                    };
                    let value = step_start + span * fraction;
                    // Monotonic within a run.
                    value_tx.send_modify(|current| {
                        if value > *current {
                            *current = value;
                        }
                    });
                    if fraction >= 1.0 {
                        break;
                    }
                }
            }

            value_tx.send_replace(range.end);
        }));
    }

    /// Abort the driver, leaving the value where it was.
    pub fn stop(&mut self) {
        if let Some(handle) = self.driver.take() {
            handle.abort();
        }
    }

    /// Abort the driver and snap to `end`, the manual reconciliation when
    /// the real call resolves.
    pub fn finish(&mut self, end: f32) {
        self.stop();
        self.value_tx.send_replace(end);
    }

    /// Abort the driver and reset the value, e.g. after a failed call or a
    /// pipeline reset.
    pub fn seed(&mut self, value: f32) {
        self.stop();
        self.value_tx.send_replace(value);
    }
}

impl Drop for ProgressSimulator {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Fake steps displayed while the inventory analysis runs.
pub fn analysis_steps() -> Vec<FakeStep> {
    vec![
        FakeStep::new("Uploading photos", Duration::from_millis(1500), "upload"),
        FakeStep::new("Detecting items", Duration::from_millis(2500), "scan"),
        FakeStep::new("Classifying produce", Duration::from_millis(2000), "tag"),
    ]
}

/// Fake steps displayed while recipe generation runs.
pub fn generation_steps() -> Vec<FakeStep> {
    vec![
        FakeStep::new("Matching recipes", Duration::from_millis(2000), "book-open"),
        FakeStep::new("Balancing the plan", Duration::from_millis(2500), "scale"),
        FakeStep::new("Writing it up", Duration::from_millis(1500), "pen"),
    ]
}
