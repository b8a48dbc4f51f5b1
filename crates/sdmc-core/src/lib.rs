//! `sdmc-core` — foundational types for the `sdmc` drone planner.
//!
//! This crate is a dependency of every other `sdmc-*` crate.  It has no
//! `sdmc-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ids`]     | `VertexId`, `DroneId`, `WaypointId`, `CarId`              |
//! | [`geo`]     | `Point` — planar position with distance and interpolation |
//! | [`time`]    | `Epoch`                                                   |
//! | [`epoch`]   | `EpochInfo`, `CarObservation`, `RouteWaypoint`            |
//! | [`config`]  | `EpisodeConfig`, `ExecutionLimits`, `CostWeights`         |
//! | [`rng`]     | `EpisodeRng` (one per episode)                            |
//! | [`error`]   | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod epoch;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{CostWeights, EpisodeConfig, ExecutionLimits};
pub use epoch::{CarObservation, EpochInfo, RouteWaypoint};
pub use error::{CoreError, CoreResult};
pub use geo::Point;
pub use ids::{CarId, DroneId, VertexId, WaypointId};
pub use rng::EpisodeRng;
pub use time::Epoch;
