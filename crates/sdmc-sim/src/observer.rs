//! Episode observer trait for progress reporting and data collection.

use sdmc_core::{Epoch, EpochInfo};
use sdmc_graph::{GraphSolution, PlanOutcome};

use crate::{EpisodeSummary, StepOutcome};

/// Callbacks invoked by [`EpisodeRunner::run`][crate::EpisodeRunner::run]
/// at key points of the plan–act loop.  `S` is the dynamics state type.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example — hop counter
///
/// ```rust,ignore
/// struct Hops(u32);
///
/// impl<S> EpisodeObserver<S> for Hops {
///     fn on_step(&mut self, outcome: &StepOutcome<S>) {
///         if outcome.state.on_car() { self.0 += 1; }
///     }
/// }
/// ```
pub trait EpisodeObserver<S> {
    /// Called before planning, with the ground truth the graph has absorbed.
    fn on_epoch_start(&mut self, _epoch: Epoch, _info: &EpochInfo) {}

    /// Called after each plan with read access to the graph it was made on.
    fn on_plan(&mut self, _epoch: Epoch, _plan: &PlanOutcome, _graph: &GraphSolution) {}

    /// Called after the simulator stepped.
    fn on_step(&mut self, _outcome: &StepOutcome<S>) {}

    /// Called once when the episode ends, however it ended.
    fn on_episode_end(&mut self, _summary: &EpisodeSummary) {}
}

/// An [`EpisodeObserver`] that does nothing.
pub struct NoopObserver;

impl<S> EpisodeObserver<S> for NoopObserver {}
