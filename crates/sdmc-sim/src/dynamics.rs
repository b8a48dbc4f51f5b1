//! The vehicle-dynamics capability and a point-mass reference model.
//!
//! The state machine treats dynamics as opaque: it only needs to put the
//! drone at rest somewhere, advance it one epoch under an action, price that
//! transition, and read back position and speed.

use std::fmt;

use sdmc_core::{EpisodeRng, Point};

// ── Capability traits ─────────────────────────────────────────────────────────

/// What the state machine needs to read from a physical state.
pub trait DynamicsState: Clone + fmt::Debug {
    fn position(&self) -> Point;
    fn speed(&self) -> f64;
}

/// Pluggable vehicle dynamics.
///
/// `advance` is the only stochastic operation; all randomness comes from the
/// episode's [`EpisodeRng`], so a fixed seed replays an episode exactly.
pub trait DynamicsModel: Send + Sync {
    type State: DynamicsState + Send;
    type Action: Clone + fmt::Debug + Send;

    /// The state of a drone hovering at `position`.
    fn state_at_rest(&self, position: Point) -> Self::State;

    /// The state one epoch after applying `action` in `state`.
    fn advance(&self, state: &Self::State, action: &Self::Action, rng: &mut EpisodeRng) -> Self::State;

    /// Non-negative cost of moving from `before` to `after`.
    fn transition_cost(&self, before: &Self::State, after: &Self::State) -> f64;
}

/// Turns "go to this point" into a dynamics action.
///
/// Steering toward the current position brakes to a hover.
pub trait Controller<D: DynamicsModel>: Send + Sync {
    fn steer(&self, model: &D, state: &D::State, target: Point) -> D::Action;
}

// ── PointMass ─────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct PointMassState {
    pub position: Point,
    pub velocity: Point,
}

impl DynamicsState for PointMassState {
    fn position(&self) -> Point {
        self.position
    }

    fn speed(&self) -> f64 {
        self.velocity.norm()
    }
}

/// Commanded velocity (m/s) for one epoch.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VelocityCommand(pub Point);

/// Planar point mass with speed and acceleration limits.
///
/// Each epoch the velocity moves toward the command by at most
/// `max_accel * dt`, is perturbed by uniform noise of half-width `noise`, is
/// clamped to `max_speed`, and is then integrated over `dt`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointMass {
    /// Epoch length (s).
    pub dt:               f64,
    pub max_speed:        f64,
    pub max_accel:        f64,
    /// Per-component velocity noise (m/s).  Zero makes the model deterministic.
    pub noise:            f64,
    /// Cost per metre travelled under own power.
    pub energy_per_metre: f64,
}

impl PointMass {
    pub fn new(dt: f64, max_speed: f64, max_accel: f64) -> Self {
        Self { dt, max_speed, max_accel, noise: 0.0, energy_per_metre: 0.0 }
    }

    pub fn with_noise(mut self, noise: f64) -> Self {
        self.noise = noise;
        self
    }

    pub fn with_energy_cost(mut self, energy_per_metre: f64) -> Self {
        self.energy_per_metre = energy_per_metre;
        self
    }
}

impl DynamicsModel for PointMass {
    type State = PointMassState;
    type Action = VelocityCommand;

    fn state_at_rest(&self, position: Point) -> PointMassState {
        PointMassState { position, velocity: Point::ORIGIN }
    }

    fn advance(&self, state: &PointMassState, action: &VelocityCommand, rng: &mut EpisodeRng) -> PointMassState {
        let target = action.0.clamp_norm(self.max_speed);
        let dv = (target - state.velocity).clamp_norm(self.max_accel * self.dt);
        let velocity = (state.velocity + dv + rng.jitter(self.noise)).clamp_norm(self.max_speed);
        PointMassState {
            position: state.position + velocity * self.dt,
            velocity,
        }
    }

    fn transition_cost(&self, before: &PointMassState, after: &PointMassState) -> f64 {
        self.energy_per_metre * before.position.distance(after.position)
    }
}

// ── PointMassController ───────────────────────────────────────────────────────

/// Go-to-point controller for [`PointMass`].
///
/// Commands the largest speed toward the target that still allows stopping
/// on it, so the drone arrives at rest.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PointMassController {
    /// Fraction of `max_speed` used while cruising.
    pub cruise_fraction: f64,
}

impl Default for PointMassController {
    fn default() -> Self {
        Self { cruise_fraction: 1.0 }
    }
}

impl Controller<PointMass> for PointMassController {
    fn steer(&self, model: &PointMass, state: &PointMassState, target: Point) -> VelocityCommand {
        let offset = target - state.position;
        let distance = offset.norm();
        if distance == 0.0 || !(model.dt > 0.0) {
            return VelocityCommand(Point::ORIGIN);
        }
        let braking = (2.0 * model.max_accel * distance).sqrt();
        let speed = (model.max_speed * self.cruise_fraction)
            .min(distance / model.dt)
            .min(braking);
        VelocityCommand(offset.normalized() * speed)
    }
}
