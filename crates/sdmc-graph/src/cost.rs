//! Edge-cost oracle.
//!
//! # Edge kinds
//!
//! | Kind            | When                                   | Cached? |
//! |-----------------|----------------------------------------|---------|
//! | `Coast`         | both ends on the same car, `to` later  | never   |
//! | `NominalFlight` | `to` is a drone-only auxiliary vertex  | never   |
//! | `CachedFlight`  | `to` is a car vertex or the goal       | yes     |
//!
//! Coast costs follow schedule revisions immediately.  Cached flight costs
//! come from a possibly expensive [`FlightCost`] and are recomputed only when
//! an endpoint's time stamp drifted past the configured threshold since the
//! entry was written.
//!
//! # Cost units
//!
//! Costs are `time_weight` per elapsed second plus `flight_energy_weight` per
//! metre flown (see [`CostWeights`]).

use rustc_hash::FxHashMap;

use sdmc_core::{CostWeights, VertexId};

use crate::{Drone, Vertex, VertexStore};

// ── FlightCost ────────────────────────────────────────────────────────────────

/// Pluggable cost of flying from one waypoint to another.
///
/// Implemented by [`NominalFlightCost`] and by any
/// `Fn(&Vertex, &Vertex, &Drone) -> f64` closure, so a learned value function
/// can be dropped in without touching the planner.  `f64::INFINITY` marks a
/// flight as infeasible; the planner then never takes it.
pub trait FlightCost {
    fn flight_cost(&self, from: &Vertex, to: &Vertex, drone: &Drone) -> f64;
}

impl<F> FlightCost for F
where
    F: Fn(&Vertex, &Vertex, &Drone) -> f64,
{
    fn flight_cost(&self, from: &Vertex, to: &Vertex, drone: &Drone) -> f64 {
        self(from, to, drone)
    }
}

/// Dynamics-agnostic flight cost: fly at top speed, then hover until the
/// destination's scheduled time.
///
/// With an unbounded destination time (the goal) no hover time is charged.
#[derive(Copy, Clone, Debug, Default)]
pub struct NominalFlightCost {
    pub weights: CostWeights,
}

impl NominalFlightCost {
    pub fn new(weights: CostWeights) -> Self {
        Self { weights }
    }
}

impl FlightCost for NominalFlightCost {
    fn flight_cost(&self, from: &Vertex, to: &Vertex, drone: &Drone) -> f64 {
        let distance = from.pos.distance(to.pos);
        let mut elapsed = drone.min_flight_time(distance);
        if from.time.is_finite() && to.time.is_finite() {
            elapsed = elapsed.max(to.time - from.time);
        }
        self.weights.time_weight * elapsed + self.weights.flight_energy_weight * distance
    }
}

// ── Edge classification ───────────────────────────────────────────────────────

/// How an edge is priced.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EdgeKind {
    Coast,
    NominalFlight,
    CachedFlight,
}

/// Classify the edge `from → to`.  `goal` is treated as a committed target.
pub fn edge_kind(from: &Vertex, to: &Vertex, goal: VertexId) -> EdgeKind {
    if from.same_car(to) && to.id > from.id {
        EdgeKind::Coast
    } else if !to.is_car_vertex() && to.id != goal {
        EdgeKind::NominalFlight
    } else {
        EdgeKind::CachedFlight
    }
}

/// Cost of riding a car from `from` to `to`: the scheduled elapsed time.
#[inline]
pub fn coast_cost(from: &Vertex, to: &Vertex, weights: &CostWeights) -> f64 {
    weights.time_weight * (to.time - from.time).max(0.0)
}

/// Closed-form flight estimate used for uncommitted destinations.
#[inline]
pub fn nominal_flight_cost(from: &Vertex, to: &Vertex, drone: &Drone, weights: &CostWeights) -> f64 {
    let distance = from.pos.distance(to.pos);
    weights.time_weight * drone.min_flight_time(distance) + weights.flight_energy_weight * distance
}

/// Price the edge `from → to`, consulting `cache` for committed flights.
#[allow(clippy::too_many_arguments)]
pub fn edge_cost<F: FlightCost + ?Sized>(
    vertices: &VertexStore,
    cache:    &mut EdgeCostCache,
    drone:    &Drone,
    weights:  &CostWeights,
    goal:     VertexId,
    from:     VertexId,
    to:       VertexId,
    flight:   &F,
) -> f64 {
    let (u, v) = (&vertices[from], &vertices[to]);
    match edge_kind(u, v, goal) {
        EdgeKind::Coast         => coast_cost(u, v, weights),
        EdgeKind::NominalFlight => nominal_flight_cost(u, v, drone, weights),
        EdgeKind::CachedFlight  => cache.get_or_compute(u, v, || flight.flight_cost(u, v, drone)),
    }
}

// ── EdgeCostCache ─────────────────────────────────────────────────────────────

/// A cached flight cost plus the endpoint time stamps it was computed for.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CacheEntry {
    pub cost:      f64,
    pub from_time: f64,
    pub to_time:   f64,
}

/// Counters for cache behaviour; useful in tests and profiling.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits:       u64,
    pub misses:     u64,
    pub recomputes: u64,
}

/// Memoized flight costs keyed by the ordered pair `(from, to)`.
#[derive(Clone, Debug, Default)]
pub struct EdgeCostCache {
    entries:         FxHashMap<(VertexId, VertexId), CacheEntry>,
    drift_threshold: f64,
    stats:           CacheStats,
}

impl EdgeCostCache {
    pub fn new(drift_threshold: f64) -> Self {
        Self { drift_threshold, ..Self::default() }
    }

    /// Return the cached cost for `from → to`, computing it with `compute`
    /// on a miss or when either endpoint drifted past the threshold.
    pub fn get_or_compute(
        &mut self,
        from:    &Vertex,
        to:      &Vertex,
        compute: impl FnOnce() -> f64,
    ) -> f64 {
        let key = (from.id, to.id);
        if let Some(entry) = self.entries.get_mut(&key) {
            if !drifted(entry.from_time, from.time, self.drift_threshold)
                && !drifted(entry.to_time, to.time, self.drift_threshold)
            {
                self.stats.hits += 1;
                return entry.cost;
            }
            let cost = compute();
            *entry = CacheEntry { cost, from_time: from.time, to_time: to.time };
            self.stats.recomputes += 1;
            return cost;
        }

        let cost = compute();
        self.entries.insert(key, CacheEntry { cost, from_time: from.time, to_time: to.time });
        self.stats.misses += 1;
        cost
    }

    pub fn get(&self, from: VertexId, to: VertexId) -> Option<&CacheEntry> {
        self.entries.get(&(from, to))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn drift_threshold(&self) -> f64 {
        self.drift_threshold
    }
}

/// `true` if a time stamp moved by more than `threshold`.  Equal infinite
/// stamps (an unbounded goal) never drift.
#[inline]
fn drifted(recorded: f64, live: f64, threshold: f64) -> bool {
    recorded != live && !((live - recorded).abs() <= threshold)
}
