//! The per-epoch execution state machine.
//!
//! # Transitions
//!
//! | Mode          | Action        | Legal when                               | Result                          |
//! |---------------|---------------|------------------------------------------|---------------------------------|
//! | `Flying`      | `Dynamics(a)` | always                                   | dynamics advanced under `a`     |
//! | `Flying`      | `HopOn(c)`    | slow enough and close to `c` (see below) | at rest on `c`, `Riding(c)`     |
//! | `Riding(c)`   | `Stay`        | always                                   | at rest on `c`                  |
//! | `Riding(c)`   | `HopOff`      | always                                   | at rest on `c`, `Flying`        |
//! | anything else |               | never                                    | penalty, state unchanged        |
//!
//! A hop-on needs the drone's speed below the speed threshold and its
//! position within the hop distance of the car's position at the previous,
//! current or next epoch; a car sampled once per epoch may pass the drone
//! between samples.
//!
//! "On `c`" means the car's position at the epoch the step moves into.  If
//! the ridden car stops being reported with a route, the drone is set down
//! at rest where the car was last seen and flies on, without a penalty.
//!
//! Every step costs `time_cost_per_epoch`; dynamics steps add the model's
//! transition cost and invalid actions add `invalid_action_penalty`.  Rewards
//! are the negated sum.

use tracing::{debug, trace};

use sdmc_core::{CarId, Epoch, EpisodeRng, EpochInfo, ExecutionLimits, Point};

use crate::{DynamicsModel, EpisodeStore, SdmcAction, SdmcState, SimError, SimResult};

/// Result of one [`SdmcSimulator::step`].
#[derive(Clone, Debug)]
pub struct StepOutcome<S> {
    pub state:          SdmcState<S>,
    pub reward:         f64,
    /// The drone is at the goal, slow enough to stop.
    pub terminal:       bool,
    /// No further step is possible: the last stored epoch or the configured
    /// epoch cap was reached.
    pub truncated:      bool,
    pub invalid_action: bool,
    /// The epoch this step moved into.
    pub epoch:          Epoch,
    /// Ground truth of `epoch`, for the graph builder to absorb.
    pub epoch_info:     EpochInfo,
}

/// Execution context for one episode.  Create via
/// [`SimulatorBuilder`][crate::SimulatorBuilder].
pub struct SdmcSimulator<D: DynamicsModel> {
    pub(crate) store:    EpisodeStore,
    pub(crate) dynamics: D,
    pub(crate) state:    SdmcState<D::State>,
    pub(crate) goal:     Point,
    pub(crate) epoch:    Epoch,
    pub(crate) rng:      EpisodeRng,
    pub(crate) limits:   ExecutionLimits,
}

impl<D: DynamicsModel> SdmcSimulator<D> {
    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn state(&self) -> &SdmcState<D::State> {
        &self.state
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn goal(&self) -> Point {
        self.goal
    }

    pub fn dynamics(&self) -> &D {
        &self.dynamics
    }

    pub fn limits(&self) -> &ExecutionLimits {
        &self.limits
    }

    pub fn store(&self) -> &EpisodeStore {
        &self.store
    }

    /// Ground truth of the current epoch.
    pub fn current_epoch_info(&self) -> Option<&EpochInfo> {
        self.store.get(self.epoch)
    }

    /// `true` if another [`step`](Self::step) is possible.
    pub fn can_step(&self) -> bool {
        self.epoch.index() + 1 < self.store.len() && self.epoch.0 < self.limits.max_epochs
    }

    /// `true` if `state` satisfies the goal condition.
    pub fn at_goal(&self, state: &SdmcState<D::State>) -> bool {
        state.position().distance(self.goal) <= self.limits.goal_distance_threshold
            && state.speed() < self.limits.speed_threshold
    }

    /// Would `HopOn(car)` succeed right now?
    pub fn can_hop_on(&self, car: &CarId) -> bool {
        if self.state.on_car() || !(self.state.speed() < self.limits.speed_threshold) {
            return false;
        }
        let next = self.epoch.next();
        if !self.store.get(next).is_some_and(|info| info.is_active(car)) {
            return false;
        }
        let position = self.state.position();
        let around = [self.epoch.prev(), Some(self.epoch), Some(next)];
        around
            .into_iter()
            .flatten()
            .filter_map(|e| self.store.car_position(e, car))
            .any(|p| p.distance(position) <= self.limits.hop_distance_threshold)
    }

    // ── Step ──────────────────────────────────────────────────────────────

    /// Advance exactly one epoch.
    ///
    /// Invalid actions are not errors: they cost the penalty and leave the
    /// state unchanged.  Stepping past the last stored epoch (or the epoch
    /// cap) is [`SimError::EpochsExhausted`].
    pub fn step(&mut self, action: SdmcAction<D::Action>) -> SimResult<StepOutcome<D::State>> {
        if !self.can_step() {
            return Err(SimError::EpochsExhausted { epoch: self.epoch, available: self.store.len() });
        }
        let next = self.epoch.next();

        let mut cost = self.limits.time_cost_per_epoch;
        let mut invalid = false;
        let new_state = match (&action, self.state.car_id()) {
            (SdmcAction::Dynamics(a), None) => {
                let physical = self.dynamics.advance(&self.state.physical, a, &mut self.rng);
                cost += self.dynamics.transition_cost(&self.state.physical, &physical);
                Some(SdmcState::flying(physical))
            }
            (SdmcAction::HopOn(car), None) if self.can_hop_on(car) => {
                debug!(%car, epoch = %next, "hop on");
                Some(SdmcState::riding(self.rest_on(car, next), car.clone()))
            }
            (SdmcAction::Stay, Some(car)) => Some(SdmcState::riding(self.rest_on(car, next), car.clone())),
            (SdmcAction::HopOff, Some(car)) => {
                debug!(%car, epoch = %next, "hop off");
                Some(SdmcState::flying(self.rest_on(car, next)))
            }
            _ => None,
        };
        let mut state = match new_state {
            Some(s) => s,
            None => {
                debug!(action = action.label(), epoch = %self.epoch, "invalid action");
                invalid = true;
                cost += self.limits.invalid_action_penalty;
                self.state.clone()
            }
        };

        let epoch_info = match self.store.get(next) {
            Some(info) => info.clone(),
            None => return Err(SimError::EpochsExhausted { epoch: self.epoch, available: self.store.len() }),
        };

        // A car that left the tracked set cannot be ridden any more.
        if let Some(car) = state.car_id().filter(|c| !epoch_info.is_active(c)).cloned() {
            debug!(%car, epoch = %next, "ridden car no longer tracked; drone set down");
            let physical = self.rest_on(&car, next);
            state = SdmcState::flying(physical);
        }

        self.state = state;
        self.epoch = next;
        let terminal = self.at_goal(&self.state);
        let truncated = !terminal && !self.can_step();
        trace!(epoch = %next, reward = -cost, terminal, truncated, "step");

        Ok(StepOutcome {
            state: self.state.clone(),
            reward: -cost,
            terminal,
            truncated,
            invalid_action: invalid,
            epoch: next,
            epoch_info,
        })
    }

    /// At rest at `car`'s position in `epoch`, falling back to the latest
    /// earlier sighting and finally to the drone's own position.
    fn rest_on(&self, car: &CarId, epoch: Epoch) -> D::State {
        let position = self
            .store
            .car_position(epoch, car)
            .or_else(|| self.store.car_position(self.epoch, car))
            .unwrap_or_else(|| self.state.position());
        self.dynamics.state_at_rest(position)
    }
}

impl<D: DynamicsModel + std::fmt::Debug> std::fmt::Debug for SdmcSimulator<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SdmcSimulator")
            .field("dynamics", &self.dynamics)
            .field("state", &self.state)
            .field("epoch", &self.epoch)
            .field("goal", &self.goal)
            .field("epochs", &self.store.len())
            .finish()
    }
}
