//! Per-epoch ground-truth snapshots.
//!
//! One [`EpochInfo`] is produced by the environment for every epoch.  It is
//! the only channel through which car routes reach the planner: the graph
//! builder absorbs it, and the execution state machine reads car positions
//! from it when validating hops.

use std::collections::BTreeMap;

use crate::{CarId, Point, WaypointId};

/// One upcoming waypoint of a car route with its estimated arrival time.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteWaypoint {
    pub id:       WaypointId,
    pub position: Point,
    /// Expected arrival time (episode seconds).  Revised from epoch to epoch.
    pub time:     f64,
}

impl RouteWaypoint {
    pub fn new(id: WaypointId, position: Point, time: f64) -> Self {
        Self { id, position, time }
    }
}

/// What the environment reports about one car in one epoch.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CarObservation {
    pub position: Point,
    /// Near-future route, or `None` when the car is no longer tracked.
    pub route:    Option<Vec<RouteWaypoint>>,
}

impl CarObservation {
    pub fn active(position: Point, route: Vec<RouteWaypoint>) -> Self {
        Self { position, route: Some(route) }
    }

    pub fn inactive(position: Point) -> Self {
        Self { position, route: None }
    }

    /// `true` if the car reported a non-empty route.
    #[inline]
    pub fn has_route(&self) -> bool {
        self.route.as_ref().is_some_and(|r| !r.is_empty())
    }
}

/// Ground truth for one epoch.
///
/// Cars are keyed in a `BTreeMap` so every consumer iterates them in the same
/// order, which keeps vertex numbering reproducible.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EpochInfo {
    /// Episode time (seconds) at which this snapshot was taken.
    pub time: f64,
    pub cars: BTreeMap<CarId, CarObservation>,
}

impl EpochInfo {
    pub fn new(time: f64) -> Self {
        Self { time, cars: BTreeMap::new() }
    }

    /// Builder-style insertion, mostly for fixtures.
    pub fn with_car(mut self, id: impl Into<CarId>, obs: CarObservation) -> Self {
        self.cars.insert(id.into(), obs);
        self
    }

    /// Current position of `car`, if it is reported this epoch.
    pub fn car_position(&self, car: &CarId) -> Option<Point> {
        self.cars.get(car).map(|obs| obs.position)
    }

    /// `true` if `car` is reported with a route this epoch.
    pub fn is_active(&self, car: &CarId) -> bool {
        self.cars.get(car).is_some_and(CarObservation::has_route)
    }
}
