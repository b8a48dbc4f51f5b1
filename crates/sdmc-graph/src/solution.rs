//! `GraphSolution` — the time-extended graph and the best plan found on it.
//!
//! Construction and per-epoch mutation live in [`builder`](crate::builder);
//! search lives in [`planner`](crate::planner).  This module holds the data,
//! read accessors, car boarding, edge pricing and the invariant checker.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use sdmc_core::{CarId, CostWeights, DroneId, VertexId, WaypointId};

use crate::cost::{self, EdgeCostCache, EdgeKind, FlightCost};
use crate::{Car, Drone, GraphError, GraphResult, Vertex, VertexStore};

/// The graph a drone plans over, mutated in place once per epoch.
pub struct GraphSolution {
    pub(crate) cars:           BTreeMap<CarId, Car>,
    pub(crate) drone:          Drone,
    /// Fastest car speed (m/s) implied by any pair of consecutive waypoints.
    pub(crate) max_car_speed:  f64,
    pub(crate) goal:           VertexId,
    /// Current planning root.
    pub(crate) next_start:     VertexId,
    pub(crate) current_time:   f64,
    pub(crate) vertices:       VertexStore,
    pub(crate) waypoint_index: FxHashMap<(CarId, WaypointId), VertexId>,
    pub(crate) cache:          EdgeCostCache,
    pub(crate) weights:        CostWeights,
    pub(crate) car_capacity:   u32,
    pub(crate) best_path:      Vec<VertexId>,
    pub(crate) best_cost:      f64,
}

impl GraphSolution {
    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn drone(&self) -> &Drone {
        &self.drone
    }

    pub fn cars(&self) -> impl Iterator<Item = &Car> + '_ {
        self.cars.values()
    }

    pub fn car(&self, id: &CarId) -> Option<&Car> {
        self.cars.get(id)
    }

    pub fn active_cars(&self) -> impl Iterator<Item = &Car> + '_ {
        self.cars.values().filter(|c| c.active)
    }

    pub fn max_car_speed(&self) -> f64 {
        self.max_car_speed
    }

    pub fn goal(&self) -> VertexId {
        self.goal
    }

    pub fn next_start(&self) -> VertexId {
        self.next_start
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn vertices(&self) -> &VertexStore {
        &self.vertices
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Vertex created for waypoint `waypoint` of `car`.
    pub fn waypoint_vertex(&self, car: &CarId, waypoint: WaypointId) -> Option<VertexId> {
        // Keyed by owned ids; a lookup costs one `CarId` clone.
        self.waypoint_index.get(&(car.clone(), waypoint)).copied()
    }

    pub fn cache(&self) -> &EdgeCostCache {
        &self.cache
    }

    pub fn weights(&self) -> &CostWeights {
        &self.weights
    }

    /// Best path found by the last successful plan, root first.  Empty if
    /// nothing was planned yet or the goal was unreachable.
    pub fn best_path(&self) -> &[VertexId] {
        &self.best_path
    }

    /// Cost of [`best_path`](Self::best_path); `f64::INFINITY` when empty.
    pub fn best_cost(&self) -> f64 {
        self.best_cost
    }

    /// The vertex right after the root on the best path.
    pub fn next_hop(&self) -> Option<VertexId> {
        self.best_path.get(1).copied()
    }

    /// The car `drone` is aboard, if any.
    pub fn riding_car(&self, drone: DroneId) -> Option<&CarId> {
        self.cars.values().find(|c| c.is_riding(drone)).map(|c| &c.id)
    }

    // ── Planning root ─────────────────────────────────────────────────────

    /// Root the next plan at an existing vertex (e.g. the next waypoint of
    /// the car the drone is riding).
    pub fn set_next_start_vertex(&mut self, v: VertexId) -> GraphResult<()> {
        if !self.vertices.contains(v) {
            return Err(GraphError::UnknownVertex(v));
        }
        self.next_start = v;
        Ok(())
    }

    // ── Boarding ──────────────────────────────────────────────────────────

    /// Record `drone` as riding `car`.
    pub fn board(&mut self, car: &CarId, drone: DroneId) -> GraphResult<()> {
        let entry = self.cars.get_mut(car).ok_or_else(|| GraphError::UnknownCar(car.clone()))?;
        if entry.board(drone) { Ok(()) } else { Err(GraphError::CarFull(car.clone())) }
    }

    /// Remove `drone` from `car`.  Returns `false` if it was not aboard.
    pub fn alight(&mut self, car: &CarId, drone: DroneId) -> GraphResult<bool> {
        let entry = self.cars.get_mut(car).ok_or_else(|| GraphError::UnknownCar(car.clone()))?;
        Ok(entry.alight(drone))
    }

    // ── Edge pricing ──────────────────────────────────────────────────────

    pub fn edge_kind(&self, from: VertexId, to: VertexId) -> GraphResult<EdgeKind> {
        let u = self.vertices.get(from).ok_or(GraphError::UnknownVertex(from))?;
        let v = self.vertices.get(to).ok_or(GraphError::UnknownVertex(to))?;
        Ok(cost::edge_kind(u, v, self.goal))
    }

    /// Cost of the edge `from → to`, using and filling the flight-cost cache.
    pub fn edge_cost<F: FlightCost + ?Sized>(
        &mut self,
        from:   VertexId,
        to:     VertexId,
        flight: &F,
    ) -> GraphResult<f64> {
        for v in [from, to] {
            if !self.vertices.contains(v) {
                return Err(GraphError::UnknownVertex(v));
            }
        }
        Ok(cost::edge_cost(
            &self.vertices,
            &mut self.cache,
            &self.drone,
            &self.weights,
            self.goal,
            from,
            to,
            flight,
        ))
    }

    /// Admissible estimate of the remaining cost from `v` to the goal: the
    /// straight-line distance covered at the fastest speed available.
    pub fn heuristic(&self, v: VertexId) -> f64 {
        heuristic(&self.vertices, self.goal, self.max_car_speed, &self.drone, &self.weights, v)
    }

    // ── Invariants ────────────────────────────────────────────────────────

    /// Check the structural invariants of the graph.
    ///
    /// - every vertex id equals its arena index;
    /// - `goal` and `next_start` exist;
    /// - every car route range lies inside the arena, belongs to that car,
    ///   and is non-decreasing in time;
    /// - no car carries more riders than its capacity;
    /// - the waypoint index points at matching vertices.
    pub fn validate(&self) -> GraphResult<()> {
        for (i, v) in self.vertices.iter().enumerate() {
            if v.id.index() != i {
                return Err(GraphError::Invariant(format!("vertex at slot {i} carries id {}", v.id)));
            }
        }
        for (name, v) in [("goal", self.goal), ("next_start", self.next_start)] {
            if !self.vertices.contains(v) {
                return Err(GraphError::Invariant(format!("{name} {v} is not in the graph")));
            }
        }

        for car in self.cars.values() {
            if car.riders.len() > car.capacity as usize {
                return Err(GraphError::Invariant(format!(
                    "car {} carries {} riders with capacity {}",
                    car.id,
                    car.riders.len(),
                    car.capacity
                )));
            }
            let Some(range) = car.route else { continue };
            if range.first > range.last || !self.vertices.contains(range.last) {
                return Err(GraphError::Invariant(format!(
                    "car {} has invalid range [{}, {}]",
                    car.id, range.first, range.last
                )));
            }
            let mut prev = f64::NEG_INFINITY;
            for id in range.iter() {
                let v = &self.vertices[id];
                if v.car.as_ref() != Some(&car.id) {
                    return Err(GraphError::Invariant(format!("{id} in the range of car {} belongs elsewhere", car.id)));
                }
                if v.time < prev {
                    return Err(GraphError::Invariant(format!("car {} route times decrease at {id}", car.id)));
                }
                prev = v.time;
            }
        }

        for ((car, waypoint), &id) in &self.waypoint_index {
            let matches = self
                .vertices
                .get(id)
                .is_some_and(|v| v.car.as_ref() == Some(car) && v.waypoint == Some(*waypoint));
            if !matches {
                return Err(GraphError::Invariant(format!("waypoint {waypoint} of car {car} maps to {id}")));
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for GraphSolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphSolution")
            .field("vertices", &self.vertices.len())
            .field("cars", &self.cars.len())
            .field("goal", &self.goal)
            .field("next_start", &self.next_start)
            .field("current_time", &self.current_time)
            .field("best_cost", &self.best_cost)
            .finish()
    }
}

/// Free-standing heuristic so the planner can evaluate it while the cache is
/// mutably borrowed.
pub(crate) fn heuristic(
    vertices:      &VertexStore,
    goal:          VertexId,
    max_car_speed: f64,
    drone:         &Drone,
    weights:       &CostWeights,
    v:             VertexId,
) -> f64 {
    let top_speed = max_car_speed.max(drone.max_speed);
    if !(top_speed > 0.0) {
        return 0.0;
    }
    weights.time_weight * vertices[v].pos.distance(vertices[goal].pos) / top_speed
}
