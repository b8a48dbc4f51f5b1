//! Fluent builder for constructing an [`SdmcSimulator`].

use sdmc_core::{Epoch, EpisodeConfig, EpisodeRng, ExecutionLimits, Point};

use crate::{DynamicsModel, EpisodeStore, SdmcSimulator, SdmcState, SimError, SimResult};

/// Fluent builder for [`SdmcSimulator<D>`].
///
/// # Optional inputs (have defaults)
///
/// | Method               | Default                                     |
/// |----------------------|---------------------------------------------|
/// | `.config(&c)`        | limits and seed of `EpisodeConfig::default` |
/// | `.limits(l)`         | from the config                             |
/// | `.rng(r)`            | `EpisodeRng::new(config.seed)`              |
/// | `.initial_state(s)`  | flying, at rest at `start`                  |
///
/// # Example
///
/// ```rust,ignore
/// let sim = SimulatorBuilder::new(store, PointMass::new(1.0, 2.0, 1.0), start, goal)
///     .config(&config)
///     .build()?;
/// ```
pub struct SimulatorBuilder<D: DynamicsModel> {
    store:    EpisodeStore,
    dynamics: D,
    start:    Point,
    goal:     Point,
    limits:   ExecutionLimits,
    seed:     u64,
    rng:      Option<EpisodeRng>,
    state:    Option<SdmcState<D::State>>,
}

impl<D: DynamicsModel> SimulatorBuilder<D> {
    pub fn new(store: EpisodeStore, dynamics: D, start: Point, goal: Point) -> Self {
        let config = EpisodeConfig::default();
        Self {
            store,
            dynamics,
            start,
            goal,
            limits: config.limits(),
            seed:   config.seed,
            rng:    None,
            state:  None,
        }
    }

    /// Take execution limits and the RNG seed from `config`.
    pub fn config(mut self, config: &EpisodeConfig) -> Self {
        self.limits = config.limits();
        self.seed = config.seed;
        self
    }

    pub fn limits(mut self, limits: ExecutionLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Supply the episode RNG directly instead of seeding from the config.
    pub fn rng(mut self, rng: EpisodeRng) -> Self {
        self.rng = Some(rng);
        self
    }

    /// Start in a given state instead of hovering at `start`.
    pub fn initial_state(mut self, state: SdmcState<D::State>) -> Self {
        self.state = Some(state);
        self
    }

    pub fn build(self) -> SimResult<SdmcSimulator<D>> {
        if self.store.is_empty() {
            return Err(SimError::Config("episode store holds no epochs".into()));
        }
        if self.limits.max_epochs == 0 {
            return Err(SimError::Config("max_epochs must be at least 1".into()));
        }
        let state = match self.state {
            Some(s) => s,
            None => SdmcState::flying(self.dynamics.state_at_rest(self.start)),
        };
        Ok(SdmcSimulator {
            store:    self.store,
            state,
            goal:     self.goal,
            epoch:    Epoch::ZERO,
            rng:      self.rng.unwrap_or_else(|| EpisodeRng::new(self.seed)),
            limits:   self.limits,
            dynamics: self.dynamics,
        })
    }
}
