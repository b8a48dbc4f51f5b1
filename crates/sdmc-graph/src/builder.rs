//! Incremental graph construction from epoch snapshots.
//!
//! # Per-car transitions in [`GraphSolution::absorb_epoch`]
//!
//! | Known? | State        | Reported     | Effect                                  |
//! |--------|--------------|--------------|-----------------------------------------|
//! | no     | —            | route        | vertices appended, car registered       |
//! | no     | —            | no route     | recorded inactive, never routed         |
//! | yes    | never routed | route        | vertices appended, car activated        |
//! | yes    | active       | route        | times revised in place, range advanced  |
//! | yes    | active       | no route     | deactivated, range frozen               |
//! | yes    | deactivated  | route        | ignored with a warning                  |
//! | yes    | any          | missing      | unchanged                               |
//!
//! Within one car, every waypoint is resolved before anything is mutated, so
//! a rejected route leaves that car untouched.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use tracing::{debug, trace, warn};

use sdmc_core::{CarId, CarObservation, EpisodeConfig, EpochInfo, Point, RouteWaypoint, VertexId};

use crate::{Car, Drone, EdgeCostCache, GraphError, GraphResult, GraphSolution, RouteRange, VertexStore};

/// What one call to [`GraphSolution::absorb_epoch`] changed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct EpochDelta {
    pub vertices_added: usize,
    /// Existing vertices whose time stamp was revised.
    pub times_updated:  usize,
    pub activated:      usize,
    pub deactivated:    usize,
    /// Cars whose nearest upcoming waypoint moved forward.
    pub advanced:       usize,
}

impl EpochDelta {
    /// `true` if the epoch left the graph exactly as it was.
    pub fn is_unchanged(&self) -> bool {
        *self == EpochDelta::default()
    }
}

impl GraphSolution {
    /// Build the graph from the first epoch.
    ///
    /// Creates the start vertex (`VertexId(0)`, the initial planning root)
    /// and the goal vertex (`VertexId(1)`; `goal_time` may be
    /// `f64::INFINITY`), then one vertex per route waypoint of every car in
    /// car-id order.  Cars reported without a route are recorded inactive.
    pub fn initialize(
        drone:       Drone,
        start_pos:   Point,
        goal_pos:    Point,
        first_epoch: &EpochInfo,
        start_time:  f64,
        goal_time:   f64,
        config:      &EpisodeConfig,
    ) -> GraphResult<Self> {
        config.validate()?;

        let mut vertices = VertexStore::new();
        let start = vertices.push(start_pos, start_time, None, None);
        let goal = vertices.push(goal_pos, goal_time, None, None);

        let mut graph = GraphSolution {
            cars:           BTreeMap::new(),
            drone,
            max_car_speed:  0.0,
            goal,
            next_start:     start,
            current_time:   first_epoch.time,
            vertices,
            waypoint_index: FxHashMap::default(),
            cache:          EdgeCostCache::new(config.time_drift_threshold),
            weights:        config.cost_weights(),
            car_capacity:   config.car_capacity,
            best_path:      Vec::new(),
            best_cost:      f64::INFINITY,
        };

        for (id, obs) in &first_epoch.cars {
            match obs.route.as_deref() {
                Some(route) if !route.is_empty() => {
                    graph.add_car_route(id, route)?;
                }
                _ => {
                    warn!(car = %id, "car reported without a route in the first epoch; recorded inactive");
                    graph.cars.insert(id.clone(), Car::inactive(id.clone(), graph.car_capacity));
                }
            }
        }

        debug!(
            vertices = graph.vertices.len(),
            cars = graph.cars.len(),
            "graph initialized"
        );
        Ok(graph)
    }

    /// Fold one epoch snapshot into the graph.
    ///
    /// Errors mean the graph and the environment disagree about a route; the
    /// graph should not be planned on afterwards.
    pub fn absorb_epoch(&mut self, epoch: &EpochInfo) -> GraphResult<EpochDelta> {
        self.current_time = epoch.time;
        let mut delta = EpochDelta::default();

        for (id, obs) in &epoch.cars {
            self.absorb_car(id, obs, &mut delta)?;
        }

        trace!(time = epoch.time, ?delta, "epoch absorbed");
        Ok(delta)
    }

    /// Append a drone-only waypoint and return its id.
    pub fn add_drone_vertex(&mut self, pos: Point, time: f64) -> VertexId {
        self.vertices.push(pos, time, None, None)
    }

    /// Append a drone-only waypoint at the drone's actual position and make
    /// it the planning root.
    pub fn set_next_start(&mut self, pos: Point, time: f64) -> VertexId {
        let v = self.add_drone_vertex(pos, time);
        self.next_start = v;
        v
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn absorb_car(&mut self, id: &CarId, obs: &CarObservation, delta: &mut EpochDelta) -> GraphResult<()> {
        let route = obs.route.as_deref().filter(|r| !r.is_empty());

        let Some(car) = self.cars.get(id) else {
            match route {
                Some(route) => {
                    delta.vertices_added += self.add_car_route(id, route)?;
                    delta.activated += 1;
                    debug!(car = %id, "new car registered");
                }
                None => {
                    self.cars.insert(id.clone(), Car::inactive(id.clone(), self.car_capacity));
                }
            }
            return Ok(());
        };

        match (car.route, car.active, route) {
            (None, _, Some(route)) => {
                delta.vertices_added += self.add_car_route(id, route)?;
                delta.activated += 1;
                debug!(car = %id, "car activated");
            }
            (Some(range), true, Some(route)) => {
                self.update_car_route(id, range, route, delta)?;
            }
            (Some(_), true, None) => {
                if let Some(car) = self.cars.get_mut(id) {
                    car.active = false;
                }
                delta.deactivated += 1;
                debug!(car = %id, "car deactivated; route frozen");
            }
            (Some(_), false, Some(_)) => {
                warn!(car = %id, "route reported for a deactivated car; ignored");
            }
            (_, _, None) => {}
        }
        Ok(())
    }

    /// Append one vertex per waypoint and (re)register the car as active.
    /// Returns the number of vertices added.
    fn add_car_route(&mut self, id: &CarId, route: &[RouteWaypoint]) -> GraphResult<usize> {
        let sorted = sorted_route(id, route)?;

        let first = VertexId(self.vertices.len() as u32);
        for wp in &sorted {
            let v = self.vertices.push(wp.position, wp.time, Some(id.clone()), Some(wp.id));
            self.waypoint_index.insert((id.clone(), wp.id), v);
        }
        let last = VertexId(self.vertices.len() as u32 - 1);
        let range = RouteRange { first, last };
        self.observe_car_speed(range);

        let capacity = self.car_capacity;
        let car = self
            .cars
            .entry(id.clone())
            .or_insert_with(|| Car::inactive(id.clone(), capacity));
        car.route = Some(range);
        car.next_waypoint = Some(sorted[0].id);
        car.active = true;
        Ok(sorted.len())
    }

    /// Revise the times of an active car's existing vertices and advance its
    /// range to the nearest reported waypoint.
    ///
    /// Vertices still in the range but absent from this epoch's report keep
    /// their time, clamped between their reported neighbours so the range
    /// stays ordered in time.
    fn update_car_route(
        &mut self,
        id:    &CarId,
        range: RouteRange,
        route: &[RouteWaypoint],
        delta: &mut EpochDelta,
    ) -> GraphResult<()> {
        let sorted = sorted_route(id, route)?;

        let mut key = (id.clone(), sorted[0].id);
        let mut reported = Vec::with_capacity(sorted.len());
        for wp in &sorted {
            key.1 = wp.id;
            let v = self
                .waypoint_index
                .get(&key)
                .copied()
                .ok_or_else(|| GraphError::UnknownWaypoint { car: id.clone(), waypoint: wp.id })?;
            reported.push((v, wp.time));
        }

        let first = reported[0].0;
        if first < range.first {
            return Err(GraphError::RouteRegressed { car: id.clone(), from: range.first, to: first });
        }
        let range = RouteRange { first, last: range.last };

        let mut pending = reported.iter().peekable();
        let mut prev = f64::NEG_INFINITY;
        for v in range.iter() {
            let time = match pending.peek() {
                Some(&&(rv, t)) if rv == v => {
                    pending.next();
                    t
                }
                next => {
                    let ceiling = next.map_or(f64::INFINITY, |&&(_, t)| t);
                    self.vertices[v].time.max(prev).min(ceiling)
                }
            };
            let vertex = &mut self.vertices[v];
            if vertex.time != time {
                vertex.time = time;
                delta.times_updated += 1;
            }
            prev = time;
        }
        self.observe_car_speed(range);

        let next_waypoint = Some(sorted[0].id);
        if let Some(car) = self.cars.get_mut(id) {
            if car.next_waypoint != next_waypoint {
                delta.advanced += 1;
                debug!(car = %id, from = ?car.next_waypoint, to = %sorted[0].id, "car advanced along its route");
            }
            car.route = Some(range);
            car.next_waypoint = next_waypoint;
        }
        Ok(())
    }

    /// Raise `max_car_speed` to the fastest leg within `range`.
    ///
    /// A leg that moves in zero time coasts for free, so no finite speed
    /// bounds it and `max_car_speed` becomes infinite.
    fn observe_car_speed(&mut self, range: RouteRange) {
        let mut prev: Option<(Point, f64)> = None;
        for v in range.iter() {
            let vertex = &self.vertices[v];
            if let Some((pos, time)) = prev {
                let dt = vertex.time - time;
                let dist = pos.distance(vertex.pos);
                if dt > 0.0 && dt.is_finite() {
                    self.max_car_speed = self.max_car_speed.max(dist / dt);
                } else if dt == 0.0 && dist > 0.0 && self.max_car_speed.is_finite() {
                    debug!(vertex = %v, "zero-time car leg; heuristic disabled");
                    self.max_car_speed = f64::INFINITY;
                }
            }
            prev = Some((vertex.pos, vertex.time));
        }
    }
}

/// Sort a reported route by waypoint id and check it is well formed.
fn sorted_route<'a>(id: &CarId, route: &'a [RouteWaypoint]) -> GraphResult<Vec<&'a RouteWaypoint>> {
    let mut sorted: Vec<&RouteWaypoint> = route.iter().collect();
    sorted.sort_by_key(|wp| wp.id);
    for pair in sorted.windows(2) {
        if pair[0].id == pair[1].id {
            return Err(GraphError::DuplicateWaypoint { car: id.clone(), waypoint: pair[1].id });
        }
        if pair[1].time < pair[0].time {
            return Err(GraphError::NonMonotonicRoute { car: id.clone(), waypoint: pair[1].id });
        }
    }
    Ok(sorted)
}
