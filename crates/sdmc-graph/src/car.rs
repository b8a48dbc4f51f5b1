//! Cars, their route ranges, and the drone envelope.

use sdmc_core::{CarId, DroneId, VertexId, WaypointId};

/// Inclusive, contiguous range of vertex indices forming a car's upcoming route.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteRange {
    pub first: VertexId,
    pub last:  VertexId,
}

impl RouteRange {
    #[inline]
    pub fn contains(&self, v: VertexId) -> bool {
        self.first <= v && v <= self.last
    }

    /// Number of vertices in the range.
    #[inline]
    pub fn len(&self) -> usize {
        self.last.index() + 1 - self.first.index()
    }

    /// Ranges are never empty; present for API symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = VertexId> + use<> {
        (self.first.0..=self.last.0).map(VertexId)
    }

    /// The vertex after `v` on this route, if any.
    #[inline]
    pub fn next_after(&self, v: VertexId) -> Option<VertexId> {
        (self.contains(v) && v < self.last).then(|| VertexId(v.0 + 1))
    }
}

/// A ground vehicle the drone may ride.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Car {
    pub id:            CarId,
    /// Upcoming route, or `None` if the car never reported one.
    pub route:         Option<RouteRange>,
    /// Nearest upcoming waypoint as of the last absorbed epoch.
    pub next_waypoint: Option<WaypointId>,
    /// Drones currently aboard.
    pub riders:        Vec<DroneId>,
    pub capacity:      u32,
    /// `false` once the environment stops reporting a route for this car.
    pub active:        bool,
}

impl Car {
    pub(crate) fn inactive(id: CarId, capacity: u32) -> Self {
        Self {
            id,
            route: None,
            next_waypoint: None,
            riders: Vec::new(),
            capacity,
            active: false,
        }
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.riders.len() >= self.capacity as usize
    }

    #[inline]
    pub fn is_riding(&self, drone: DroneId) -> bool {
        self.riders.contains(&drone)
    }

    /// Add `drone` to the riders.  Returns `false` if the car is full;
    /// boarding twice is a no-op that returns `true`.
    pub fn board(&mut self, drone: DroneId) -> bool {
        if self.is_riding(drone) {
            return true;
        }
        if self.is_full() {
            return false;
        }
        self.riders.push(drone);
        true
    }

    /// Remove `drone` from the riders.  Returns `false` if it was not aboard.
    pub fn alight(&mut self, drone: DroneId) -> bool {
        let before = self.riders.len();
        self.riders.retain(|&d| d != drone);
        self.riders.len() != before
    }
}

/// Static physical envelope of the drone.  Immutable for the episode.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Drone {
    pub id:         DroneId,
    /// Maximum flight speed (m/s).
    pub max_speed:  f64,
    /// Maximum distance (m) of a single flight leg.
    pub max_range:  f64,
    /// Energy budget of a single flight leg, one unit per metre flown.
    pub max_energy: f64,
}

impl Drone {
    pub fn new(id: DroneId, max_speed: f64, max_range: f64, max_energy: f64) -> Self {
        Self { id, max_speed, max_range, max_energy }
    }

    /// Longest single flight leg (m): the tighter of range and energy.
    #[inline]
    pub fn max_flight_distance(&self) -> f64 {
        self.max_range.min(self.max_energy)
    }

    /// Shortest time (s) to fly `distance` metres.
    #[inline]
    pub fn min_flight_time(&self, distance: f64) -> f64 {
        if self.max_speed > 0.0 { distance / self.max_speed } else { f64::INFINITY }
    }
}
