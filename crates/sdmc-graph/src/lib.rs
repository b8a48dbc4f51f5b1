//! `sdmc-graph` — the time-extended waypoint graph the drone plans over.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`vertex`]   | `Vertex`, `VertexStore` (append-only arena)                  |
//! | [`car`]      | `Car`, `RouteRange`, `Drone`                                 |
//! | [`solution`] | `GraphSolution` — the graph model and its accessors          |
//! | [`builder`]  | `initialize`, `absorb_epoch`, `EpochDelta`                   |
//! | [`cost`]     | `FlightCost`, `NominalFlightCost`, `EdgeKind`, `EdgeCostCache` |
//! | [`planner`]  | `Planner`, `PlanOutcome` — A* over the graph                 |
//! | [`error`]    | `GraphError`, `GraphResult<T>`                               |
//!
//! # Data layout
//!
//! Vertices live in one arena addressed by [`VertexId`](sdmc_core::VertexId).
//! Cars never hold references into it; a car's upcoming route is the
//! contiguous index range `[first, last]` of the vertices created for it.
//! Vertices are never removed, so every index ever handed out stays valid
//! for the whole episode.

pub mod builder;
pub mod car;
pub mod cost;
pub mod error;
pub mod planner;
pub mod solution;
pub mod vertex;

#[cfg(test)]
mod tests;

pub use builder::EpochDelta;
pub use car::{Car, Drone, RouteRange};
pub use cost::{CacheEntry, CacheStats, EdgeCostCache, EdgeKind, FlightCost, NominalFlightCost};
pub use error::{GraphError, GraphResult};
pub use planner::{PlanOutcome, Planner};
pub use solution::GraphSolution;
pub use vertex::{Vertex, VertexStore};
