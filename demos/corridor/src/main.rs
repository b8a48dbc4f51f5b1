//! corridor — smallest end-to-end run of the sdmc drone planner.
//!
//! A drone with a 2 m flight range has to cross a 25 m corridor.  Two cars
//! drive through it: a shuttle that runs the first 10 m and then leaves the
//! tracked set, and a relay that waits at the shuttle's last stop before
//! driving on to the far end.  The drone can only make it by riding both.
//!
//! The episode is rendered to CSV in memory and read back through the same
//! loader used for recorded episodes.  Set `RUST_LOG=debug` to see hops,
//! replans and cache activity.

use std::fmt::Write as _;
use std::io::Cursor;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sdmc_core::{DroneId, EpisodeConfig, Epoch, EpochInfo, Point};
use sdmc_graph::{Drone, GraphSolution, NominalFlightCost, PlanOutcome};
use sdmc_sim::{
    load_episode_reader, run_batch, EpisodeObserver, EpisodeRunner, EpisodeStore, EpisodeSummary, Mission,
    PointMass, PointMassController, PointMassState, StepOutcome,
};

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:            u64 = 42;
const EPOCHS:          u64 = 40;
const BATCH_EPISODES:  u64 = 4;
const BATCH_NOISE:     f64 = 0.05;

const DRONE_SPEED:     f64 = 1.5;
const DRONE_RANGE:     f64 = 2.0;
const DRONE_ACCEL:     f64 = 2.0;

const START: Point = Point { x: 0.0, y: 0.0 };
const GOAL:  Point = Point { x: 25.0, y: 0.4 };

// ── Scripted traffic ──────────────────────────────────────────────────────────

/// A car driving through timed waypoints, tracked until `retire_at`.
struct ScriptedCar {
    id:        &'static str,
    waypoints: Vec<(Point, f64)>,
    retire_at: f64,
}

impl ScriptedCar {
    /// Runs x = 0..=10 along y = 0 at 1 m/s, then leaves.
    fn shuttle() -> Self {
        let waypoints = (0..=10).map(|j| (Point::new(j as f64, 0.0), j as f64)).collect();
        Self { id: "shuttle", waypoints, retire_at: 11.0 }
    }

    /// Waits at (10, 0.4) until t = 12, then drives to x = 25.
    fn relay() -> Self {
        let waypoints = (0..=27)
            .map(|j| {
                let x = 10.0 + (j as f64 - 12.0).max(0.0);
                (Point::new(x, 0.4), j as f64)
            })
            .collect();
        Self { id: "relay", waypoints, retire_at: f64::INFINITY }
    }

    fn position(&self, t: f64) -> Point {
        let mut prev = self.waypoints[0];
        for &(p, time) in &self.waypoints {
            if time >= t {
                let span = time - prev.1;
                let frac = if span > 0.0 { (t - prev.1) / span } else { 1.0 };
                return Point::lerp(prev.0, p, frac.clamp(0.0, 1.0));
            }
            prev = (p, time);
        }
        prev.0
    }

    /// CSV rows for this car at time `t`.
    fn rows(&self, out: &mut String, epoch: u64, t: f64) {
        let pos = self.position(t);
        let upcoming: Vec<_> = self
            .waypoints
            .iter()
            .enumerate()
            .filter(|(_, (_, time))| *time >= t)
            .collect();
        if t >= self.retire_at || upcoming.is_empty() {
            let _ = writeln!(out, "{epoch},{t},{},{},{},,,,", self.id, pos.x, pos.y);
            return;
        }
        for (j, (wp, time)) in upcoming {
            let _ = writeln!(out, "{epoch},{t},{},{},{},wp{j},{},{},{time}", self.id, pos.x, pos.y, wp.x, wp.y);
        }
    }
}

fn episode_csv() -> String {
    let cars = [ScriptedCar::shuttle(), ScriptedCar::relay()];
    let mut csv = String::from("epoch,time,car_id,car_x,car_y,waypoint_id,waypoint_x,waypoint_y,waypoint_time\n");
    for epoch in 0..EPOCHS {
        let t = epoch as f64;
        for car in &cars {
            car.rows(&mut csv, epoch, t);
        }
    }
    csv
}

// ── Observer ──────────────────────────────────────────────────────────────────

/// Prints one line per epoch: what the plan looked like and what happened.
#[derive(Default)]
struct EpochLog {
    plan: String,
}

impl EpisodeObserver<PointMassState> for EpochLog {
    fn on_plan(&mut self, _epoch: Epoch, plan: &PlanOutcome, _graph: &GraphSolution) {
        self.plan = match plan {
            PlanOutcome::Found { path, cost } => format!("{:>2} hops, cost {cost:>6.2}", path.len() - 1),
            PlanOutcome::Unreachable => "unreachable".to_string(),
        };
    }

    fn on_step(&mut self, outcome: &StepOutcome<PointMassState>) {
        let mode = match outcome.state.car_id() {
            Some(car) => format!("riding {car}"),
            None => "flying".to_string(),
        };
        let pos = outcome.state.position();
        println!(
            "  {:>4}  ({:>6.2}, {:>5.2})  {:<15} plan: {}{}",
            outcome.epoch.to_string(),
            pos.x,
            pos.y,
            mode,
            self.plan,
            if outcome.invalid_action { "  [invalid]" } else { "" },
        );
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) {
        info!(epochs = summary.epochs, reached_goal = summary.reached_goal, "episode done");
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn runner(
    config: &EpisodeConfig,
    store:  EpisodeStore,
    noise:  f64,
) -> sdmc_sim::SimResult<EpisodeRunner<PointMass, PointMassController, NominalFlightCost>> {
    EpisodeRunner::new(
        config,
        Mission {
            drone:     Drone::new(DroneId(0), DRONE_SPEED, DRONE_RANGE, 100.0),
            start:     START,
            goal:      GOAL,
            goal_time: f64::INFINITY,
        },
        store,
        PointMass::new(config.epoch_duration, DRONE_SPEED, DRONE_ACCEL).with_noise(noise),
        PointMassController::default(),
        NominalFlightCost::new(config.cost_weights()),
    )
}

fn print_summary(label: &str, s: &EpisodeSummary) {
    println!(
        "{label:<10} epochs {:>3}  reward {:>7.2}  goal {:<5}  hops {}  invalid {}  unreachable {}  final ({:.2}, {:.2})",
        s.epochs,
        s.total_reward,
        s.reached_goal,
        s.hops,
        s.invalid_actions,
        s.unreachable_plans,
        s.final_position.x,
        s.final_position.y,
    );
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    println!("=== corridor — sdmc drone planner ===");

    let csv = episode_csv();
    let store = load_episode_reader(Cursor::new(csv.as_bytes()))?;
    let cars: usize = store.iter().map(|e: &EpochInfo| e.cars.len()).max().unwrap_or(0);
    println!("episode: {} epochs, {} cars, goal at ({}, {})", store.len(), cars, GOAL.x, GOAL.y);

    let config = EpisodeConfig { seed: SEED, ..EpisodeConfig::default() };
    config.validate()?;

    // ── Single deterministic episode ──────────────────────────────────────
    println!("\nepoch  position          mode");
    let mut single = runner(&config, store.clone(), 0.0)?;
    let summary = single.run(&mut EpochLog::default())?;
    let stats = single.graph().cache().stats();
    println!();
    print_summary("nominal", &summary);
    println!(
        "graph: {} vertices, cache {} entries ({} hits / {} misses / {} recomputes)",
        single.graph().vertex_count(),
        single.graph().cache().len(),
        stats.hits,
        stats.misses,
        stats.recomputes,
    );

    // ── Noisy batch ───────────────────────────────────────────────────────
    println!("\nbatch of {BATCH_EPISODES} with actuation noise {BATCH_NOISE}:");
    let results = run_batch(BATCH_EPISODES, |k| {
        let config = EpisodeConfig { seed: SEED + k, ..config.clone() };
        runner(&config, store.clone(), BATCH_NOISE)
    });
    for (k, result) in results.into_iter().enumerate() {
        print_summary(&format!("seed {}", SEED + k as u64), &result?);
    }

    Ok(())
}
