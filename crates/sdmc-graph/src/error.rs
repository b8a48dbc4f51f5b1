//! Graph-subsystem error type.
//!
//! Every variant except `Search` means the graph and the environment's
//! ground truth have desynchronized; the graph can no longer be trusted for
//! planning and the episode should stop.

use thiserror::Error;

use sdmc_core::{CarId, CoreError, VertexId, WaypointId};
use sdmc_search::SearchError;

/// Errors produced by `sdmc-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("car {car} reported waypoint {waypoint} that is not in the graph")]
    UnknownWaypoint { car: CarId, waypoint: WaypointId },

    #[error("car {car} reported waypoint {waypoint} more than once in one epoch")]
    DuplicateWaypoint { car: CarId, waypoint: WaypointId },

    #[error("car {car} route times decrease at waypoint {waypoint}")]
    NonMonotonicRoute { car: CarId, waypoint: WaypointId },

    #[error("car {car} route moved backwards from {from} to {to}")]
    RouteRegressed { car: CarId, from: VertexId, to: VertexId },

    #[error("car {0} not found")]
    UnknownCar(CarId),

    #[error("vertex {0} not found in graph")]
    UnknownVertex(VertexId),

    #[error("car {0} is at capacity")]
    CarFull(CarId),

    #[error("graph invariant violated: {0}")]
    Invariant(String),

    #[error("search failed: {0}")]
    Search(#[from] SearchError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type GraphResult<T> = Result<T, GraphError>;
