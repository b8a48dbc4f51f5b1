//! The plan–act loop: absorb, plan, act, repeat.
//!
//! ```text
//! until terminal or truncated:
//!   ① Root     — flying: new drone vertex at the drone's position and time
//!                riding: the ridden car's next waypoint vertex
//!   ② Plan     — A* from the root to the goal
//!   ③ Act      — first hop of the plan → action (see `choose_action`)
//!   ④ Step     — simulator advances one epoch
//!   ⑤ Absorb   — graph folds in the epoch the simulator moved into
//!   ⑥ Riders   — car boarding bookkeeping follows the drone's mode
//! ```

use tracing::{debug, trace};

use sdmc_core::{Epoch, EpisodeConfig, Point};
use sdmc_graph::{Drone, FlightCost, GraphSolution, PlanOutcome, Planner};

use crate::{
    Controller, DynamicsModel, EpisodeObserver, EpisodeStore, NoopObserver, SdmcAction, SdmcSimulator, SimError,
    SimResult, SimulatorBuilder,
};

/// What the drone has to do in an episode.
#[derive(Clone, Debug, PartialEq)]
pub struct Mission {
    pub drone:     Drone,
    pub start:     Point,
    pub goal:      Point,
    /// Latest useful arrival time; `f64::INFINITY` for no deadline.
    pub goal_time: f64,
}

/// How an episode went.
#[derive(Clone, Debug, PartialEq)]
pub struct EpisodeSummary {
    pub epochs:            u64,
    pub total_reward:      f64,
    pub reached_goal:      bool,
    /// Ended by running out of epochs.
    pub truncated:         bool,
    /// Successful hop-ons.
    pub hops:              u32,
    pub invalid_actions:   u32,
    /// Epochs in which no path to the goal existed.
    pub unreachable_plans: u32,
    pub final_position:    Point,
}

/// One episode's graph, planner and simulator, wired together.
pub struct EpisodeRunner<D: DynamicsModel, C, F> {
    graph:      GraphSolution,
    planner:    Planner,
    sim:        SdmcSimulator<D>,
    controller: C,
    flight:     F,
}

impl<D, C, F> EpisodeRunner<D, C, F>
where
    D: DynamicsModel,
    C: Controller<D>,
    F: FlightCost,
{
    /// Build the graph from the store's first epoch and a simulator hovering
    /// at the mission start.
    pub fn new(
        config:     &EpisodeConfig,
        mission:    Mission,
        store:      EpisodeStore,
        dynamics:   D,
        controller: C,
        flight:     F,
    ) -> SimResult<Self> {
        let first = store
            .get(Epoch::ZERO)
            .ok_or_else(|| SimError::Config("episode store holds no epochs".into()))?;
        let graph = GraphSolution::initialize(
            mission.drone,
            mission.start,
            mission.goal,
            first,
            first.time,
            mission.goal_time,
            config,
        )?;
        let sim = SimulatorBuilder::new(store, dynamics, mission.start, mission.goal)
            .config(config)
            .build()?;
        Ok(Self::from_parts(graph, sim, controller, flight))
    }

    /// Assemble from an already built graph and simulator.
    pub fn from_parts(graph: GraphSolution, sim: SdmcSimulator<D>, controller: C, flight: F) -> Self {
        Self { graph, planner: Planner::new(), sim, controller, flight }
    }

    pub fn graph(&self) -> &GraphSolution {
        &self.graph
    }

    pub fn simulator(&self) -> &SdmcSimulator<D> {
        &self.sim
    }

    /// Run until the goal is reached or no epoch is left.
    ///
    /// Graph errors end the episode with `Err`; invalid actions and an
    /// unreachable goal do not.
    pub fn run<O: EpisodeObserver<D::State>>(&mut self, observer: &mut O) -> SimResult<EpisodeSummary> {
        let drone = self.graph.drone().id;
        let mut summary = EpisodeSummary {
            epochs:            0,
            total_reward:      0.0,
            reached_goal:      self.sim.at_goal(self.sim.state()),
            truncated:         false,
            hops:              0,
            invalid_actions:   0,
            unreachable_plans: 0,
            final_position:    self.sim.state().position(),
        };

        while !summary.reached_goal && self.sim.can_step() {
            let epoch = self.sim.epoch();
            if let Some(info) = self.sim.current_epoch_info() {
                observer.on_epoch_start(epoch, info);
            }

            // ① + ②
            self.set_root()?;
            let plan = self.planner.plan(&mut self.graph, &self.flight)?;
            if plan == PlanOutcome::Unreachable {
                summary.unreachable_plans += 1;
            }
            observer.on_plan(epoch, &plan, &self.graph);

            // ③ + ④
            let action = self.choose_action();
            trace!(%epoch, action = action.label(), "acting");
            let before = self.sim.state().car_id().cloned();
            let outcome = self.sim.step(action)?;

            // ⑤ + ⑥
            self.graph.absorb_epoch(&outcome.epoch_info)?;
            match (before, outcome.state.car_id()) {
                (None, Some(car)) => {
                    self.graph.board(car, drone)?;
                    summary.hops += 1;
                }
                (Some(prev), None) => {
                    self.graph.alight(&prev, drone)?;
                }
                _ => {}
            }

            summary.epochs += 1;
            summary.total_reward += outcome.reward;
            summary.invalid_actions += u32::from(outcome.invalid_action);
            summary.reached_goal = outcome.terminal;
            observer.on_step(&outcome);
        }

        summary.truncated = !summary.reached_goal;
        summary.final_position = self.sim.state().position();
        debug!(
            epochs = summary.epochs,
            reward = summary.total_reward,
            reached_goal = summary.reached_goal,
            hops = summary.hops,
            "episode finished"
        );
        observer.on_episode_end(&summary);
        Ok(summary)
    }

    /// Point the planning root at where the drone actually is.
    fn set_root(&mut self) -> SimResult<()> {
        let state = self.sim.state();
        let now = self
            .sim
            .current_epoch_info()
            .map_or(self.graph.current_time(), |info| info.time);
        let riding = state
            .car_id()
            .and_then(|car| self.graph.car(car))
            .and_then(|car| car.route);
        match riding {
            Some(range) => self.graph.set_next_start_vertex(range.first)?,
            None => {
                self.graph.set_next_start(state.position(), now);
            }
        }
        Ok(())
    }

    /// Turn the first hop of the best path into an action.
    ///
    /// - riding, next hop on the same car (or no plan): `Stay`
    /// - riding, next hop elsewhere: `HopOff`
    /// - flying, next hop on a car that is within reach now: `HopOn`
    /// - flying otherwise: steer toward the next hop (or hover without a plan)
    fn choose_action(&self) -> SdmcAction<D::Action> {
        let state = self.sim.state();
        let next = self.graph.next_hop().and_then(|w| self.graph.vertex(w));

        if let Some(car) = state.car_id() {
            return match next {
                Some(v) if v.car.as_ref() != Some(car) => SdmcAction::HopOff,
                _ => SdmcAction::Stay,
            };
        }

        let target = match next {
            Some(v) => {
                if let Some(car) = &v.car {
                    if self.sim.can_hop_on(car) {
                        return SdmcAction::HopOn(car.clone());
                    }
                }
                v.pos
            }
            None => state.position(),
        };
        SdmcAction::Dynamics(self.controller.steer(self.sim.dynamics(), &state.physical, target))
    }
}

/// Run `episodes` independent episodes built by `make(k)`.
///
/// Results are returned in episode order.  With the `parallel` feature the
/// episodes run on Rayon's thread pool; each worker owns its runner, so
/// nothing is shared between episodes.
pub fn run_batch<D, C, F, M>(episodes: u64, make: M) -> Vec<SimResult<EpisodeSummary>>
where
    D: DynamicsModel,
    C: Controller<D>,
    F: FlightCost,
    M: Fn(u64) -> SimResult<EpisodeRunner<D, C, F>> + Send + Sync,
{
    let run_one = |k: u64| -> SimResult<EpisodeSummary> {
        let mut runner = make(k)?;
        runner.run(&mut NoopObserver)
    };

    #[cfg(not(feature = "parallel"))]
    {
        (0..episodes).map(run_one).collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        (0..episodes).into_par_iter().map(run_one).collect()
    }
}
