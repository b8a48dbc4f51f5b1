//! `sdmc-sim` — episode execution for the sdmc drone planner.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                        |
//! |---------------|-----------------------------------------------------------------|
//! | [`dynamics`]  | `DynamicsModel`, `DynamicsState`, `Controller`, `PointMass`     |
//! | [`state`]     | `SdmcState`, `DroneMode`, `SdmcAction`                          |
//! | [`simulator`] | `SdmcSimulator::step` — the per-epoch state machine             |
//! | [`builder`]   | `SimulatorBuilder`                                              |
//! | [`episode`]   | `EpisodeStore` — epoch-indexed ground truth                     |
//! | [`loader`]    | `load_episode_csv`, `load_episode_reader`                       |
//! | [`runner`]    | `EpisodeRunner`, `EpisodeSummary`, `run_batch`                  |
//! | [`observer`]  | `EpisodeObserver`, `NoopObserver`                               |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | `run_batch` runs episodes on Rayon's thread pool.      |
//! | `serde`    | Serde derives on the core and graph types.             |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use sdmc_graph::NominalFlightCost;
//! use sdmc_sim::{load_episode_csv, EpisodeRunner, Mission, NoopObserver, PointMass, PointMassController};
//!
//! let store = load_episode_csv(Path::new("episode.csv"))?;
//! let mut runner = EpisodeRunner::new(
//!     &config,
//!     mission,
//!     store,
//!     PointMass::new(config.epoch_duration, 2.0, 1.0),
//!     PointMassController::default(),
//!     NominalFlightCost::new(config.cost_weights()),
//! )?;
//! let summary = runner.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod dynamics;
pub mod episode;
pub mod error;
pub mod loader;
pub mod observer;
pub mod runner;
pub mod simulator;
pub mod state;


pub use builder::SimulatorBuilder;
pub use dynamics::{
    Controller, DynamicsModel, DynamicsState, PointMass, PointMassController, PointMassState, VelocityCommand,
};
pub use episode::EpisodeStore;
pub use error::{SimError, SimResult};
pub use loader::{load_episode_csv, load_episode_reader};
pub use observer::{EpisodeObserver, NoopObserver};
pub use runner::{run_batch, EpisodeRunner, EpisodeSummary, Mission};
pub use simulator::{SdmcSimulator, StepOutcome};
pub use state::{DroneMode, SdmcAction, SdmcState};
