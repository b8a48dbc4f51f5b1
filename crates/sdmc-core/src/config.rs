//! Episode configuration.
//!
//! Typically loaded from a TOML/JSON file by the application (with the
//! `serde` feature) and passed to the graph and simulator constructors.  The
//! execution and cost crates only see the narrow views
//! [`ExecutionLimits`] and [`CostWeights`].

use crate::{CoreError, CoreResult};

/// Top-level configuration of one episode.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EpisodeConfig {
    /// Seconds per epoch.
    pub epoch_duration: f64,

    /// Hard cap on the number of epochs an episode may run.
    pub max_epochs: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Maximum distance (m) between drone and car for a hop-on to succeed.
    pub hop_distance_threshold: f64,

    /// Maximum drone speed (m/s) for a hop-on, and for the goal to count as
    /// reached.
    pub speed_threshold: f64,

    /// Maximum distance (m) from the goal for the episode to terminate.
    pub goal_distance_threshold: f64,

    /// Cost charged for every epoch, regardless of action.
    pub time_cost_per_epoch: f64,

    /// Cost charged for an illegal mode-transition action.
    pub invalid_action_penalty: f64,

    /// How far (s) a vertex time stamp may drift before cached flight costs
    /// touching it are recomputed.
    pub time_drift_threshold: f64,

    /// Passenger capacity assumed for every car.
    pub car_capacity: u32,

    /// Cost per second of elapsed time, on every edge kind.
    pub time_weight: f64,

    /// Cost per metre flown under the drone's own power.
    pub flight_energy_weight: f64,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            epoch_duration:          1.0,
            max_epochs:              1_000,
            seed:                    42,
            hop_distance_threshold:  0.5,
            speed_threshold:         0.1,
            goal_distance_threshold: 0.5,
            time_cost_per_epoch:     1.0,
            invalid_action_penalty:  10.0,
            time_drift_threshold:    1.0,
            car_capacity:            1,
            time_weight:             1.0,
            flight_energy_weight:    0.1,
        }
    }
}

impl EpisodeConfig {
    /// Reject settings the planner and simulator cannot work with.
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.epoch_duration > 0.0) {
            return Err(CoreError::Config(format!(
                "epoch_duration must be positive, got {}",
                self.epoch_duration
            )));
        }
        if self.max_epochs == 0 {
            return Err(CoreError::Config("max_epochs must be at least 1".into()));
        }
        let non_negative = [
            ("hop_distance_threshold", self.hop_distance_threshold),
            ("speed_threshold", self.speed_threshold),
            ("goal_distance_threshold", self.goal_distance_threshold),
            ("time_cost_per_epoch", self.time_cost_per_epoch),
            ("invalid_action_penalty", self.invalid_action_penalty),
            ("time_drift_threshold", self.time_drift_threshold),
            ("time_weight", self.time_weight),
            ("flight_energy_weight", self.flight_energy_weight),
        ];
        for (name, value) in non_negative {
            if !(value >= 0.0) {
                return Err(CoreError::Config(format!("{name} must be non-negative, got {value}")));
            }
        }
        if self.car_capacity == 0 {
            return Err(CoreError::Config("car_capacity must be at least 1".into()));
        }
        Ok(())
    }

    pub fn limits(&self) -> ExecutionLimits {
        ExecutionLimits {
            hop_distance_threshold:  self.hop_distance_threshold,
            speed_threshold:         self.speed_threshold,
            goal_distance_threshold: self.goal_distance_threshold,
            time_cost_per_epoch:     self.time_cost_per_epoch,
            invalid_action_penalty:  self.invalid_action_penalty,
            max_epochs:              self.max_epochs,
        }
    }

    pub fn cost_weights(&self) -> CostWeights {
        CostWeights {
            time_weight:          self.time_weight,
            flight_energy_weight: self.flight_energy_weight,
        }
    }
}

/// Thresholds and charges used by the execution state machine.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExecutionLimits {
    pub hop_distance_threshold:  f64,
    pub speed_threshold:         f64,
    pub goal_distance_threshold: f64,
    pub time_cost_per_epoch:     f64,
    pub invalid_action_penalty:  f64,
    pub max_epochs:              u64,
}

impl Default for ExecutionLimits {
    fn default() -> Self {
        EpisodeConfig::default().limits()
    }
}

/// Weights turning elapsed time and flown distance into a scalar edge cost.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CostWeights {
    pub time_weight:          f64,
    pub flight_energy_weight: f64,
}

impl Default for CostWeights {
    fn default() -> Self {
        EpisodeConfig::default().cost_weights()
    }
}
