//! A* planning over a [`GraphSolution`].
//!
//! Successors of a popped vertex `u`:
//!
//! 1. **coast** to the next vertex of `u`'s car, if that car is active;
//! 2. **flight** to every vertex `w` of every *other* active car's upcoming
//!    route with `|u w| <= max_flight_distance` and `u.time + |u w| / max_speed <= w.time`
//!    (the drone must be there before the car);
//! 3. **flight** to the goal when it lies within range.
//!
//! The search stops as soon as the goal is popped.

use std::collections::BTreeMap;

use tracing::debug;

use sdmc_core::{CarId, VertexId};
use sdmc_search::{AstarSearch, AstarVisitor, Include};

use crate::cost::{self, FlightCost};
use crate::solution::heuristic;
use crate::{Car, Drone, GraphResult, GraphSolution, VertexStore};

/// Result of one [`Planner::plan`] call.
#[derive(Clone, Debug, PartialEq)]
pub enum PlanOutcome {
    Found { path: Vec<VertexId>, cost: f64 },
    /// The goal was never closed; the previous best path is cleared.
    Unreachable,
}

impl PlanOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, PlanOutcome::Found { .. })
    }
}

/// Reusable planner; keeps the search arrays alive between epochs.
#[derive(Default)]
pub struct Planner {
    search: AstarSearch,
}

impl Planner {
    pub fn new() -> Self {
        Self::default()
    }

    /// The search tree of the last plan.
    pub fn search(&self) -> &AstarSearch {
        &self.search
    }

    /// Plan from `graph.next_start()` to the goal and store the result as
    /// the graph's best path.
    pub fn plan<F: FlightCost + ?Sized>(
        &mut self,
        graph:  &mut GraphSolution,
        flight: &F,
    ) -> GraphResult<PlanOutcome> {
        let source = graph.next_start;
        let goal = graph.goal;

        let vertices = &graph.vertices;
        let drone = &graph.drone;
        let weights = &graph.weights;
        let max_car_speed = graph.max_car_speed;
        let cache = &mut graph.cache;

        let mut visitor = SuccessorVisitor { vertices, cars: &graph.cars, drone, goal };
        let outcome = self.search.run(
            source,
            |u, v| cost::edge_cost(vertices, cache, drone, weights, goal, u, v, flight),
            |v| heuristic(vertices, goal, max_car_speed, drone, weights, v),
            &mut visitor,
        )?;

        let plan = match (self.search.is_closed(goal), self.search.path_to(goal), self.search.dist(goal)) {
            (true, Some(path), Some(cost)) => {
                debug!(%source, hops = path.len() - 1, cost, closed = outcome.closed, "plan found");
                PlanOutcome::Found { path, cost }
            }
            _ => {
                debug!(%source, closed = outcome.closed, "goal unreachable");
                PlanOutcome::Unreachable
            }
        };

        match &plan {
            PlanOutcome::Found { path, cost } => {
                graph.best_path.clone_from(path);
                graph.best_cost = *cost;
            }
            PlanOutcome::Unreachable => {
                graph.best_path.clear();
                graph.best_cost = f64::INFINITY;
            }
        }
        Ok(plan)
    }
}

// ── SuccessorVisitor ──────────────────────────────────────────────────────────

struct SuccessorVisitor<'a> {
    vertices: &'a VertexStore,
    cars:     &'a BTreeMap<CarId, Car>,
    drone:    &'a Drone,
    goal:     VertexId,
}

impl AstarVisitor for SuccessorVisitor<'_> {
    fn include(
        &mut self,
        _parent:       Option<VertexId>,
        vertex:        VertexId,
        _dist:         f64,
        out_neighbors: &mut Vec<VertexId>,
    ) -> Include {
        if vertex == self.goal {
            return Include::Stop;
        }
        let u = &self.vertices[vertex];

        // Coast.
        let own = u.car.as_ref().and_then(|id| self.cars.get(id));
        if let Some(car) = own.filter(|c| c.active) {
            if let Some(next) = car.route.and_then(|r| r.next_after(vertex)) {
                out_neighbors.push(next);
            }
        }

        // Flights to other cars.
        let reach = self.drone.max_flight_distance();
        for car in self.cars.values().filter(|c| c.active) {
            if u.car.as_ref() == Some(&car.id) {
                continue;
            }
            let Some(range) = car.route else { continue };
            for w in range.iter() {
                let target = &self.vertices[w];
                let distance = u.pos.distance(target.pos);
                if distance <= reach
                    && u.time + self.drone.min_flight_time(distance) <= target.time
                {
                    out_neighbors.push(w);
                }
            }
        }

        // Flight to the goal.
        if u.pos.distance(self.vertices[self.goal].pos) <= reach {
            out_neighbors.push(self.goal);
        }
        Include::Expand
    }
}
