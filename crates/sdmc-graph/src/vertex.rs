//! Space-time waypoints and their arena.

use std::ops::{Index, IndexMut};

use sdmc_core::{CarId, Point, VertexId, WaypointId};

/// A space-time waypoint.
///
/// Identity (`id`, `car`, `waypoint`) is fixed at creation; only the time
/// stamp is revised as car schedules drift.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vertex {
    pub id:       VertexId,
    pub pos:      Point,
    /// Expected arrival time (episode seconds).  `f64::INFINITY` for an
    /// unbounded goal.
    pub time:     f64,
    /// Owning car for route vertices; `None` for drone-only waypoints.
    pub car:      Option<CarId>,
    /// Car-local waypoint number for route vertices.
    pub waypoint: Option<WaypointId>,
}

impl Vertex {
    /// `true` if the vertex lies on a car's route.
    #[inline]
    pub fn is_car_vertex(&self) -> bool {
        self.car.is_some()
    }

    /// `true` if both vertices lie on the route of the same car.
    #[inline]
    pub fn same_car(&self, other: &Vertex) -> bool {
        matches!((&self.car, &other.car), (Some(a), Some(b)) if a == b)
    }
}

/// Append-only vertex arena.  `VertexId(i)` is the `i`-th vertex ever pushed.
#[derive(Clone, Debug, Default)]
pub struct VertexStore {
    vertices: Vec<Vertex>,
}

impl VertexStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a vertex and return its freshly issued id.
    pub fn push(
        &mut self,
        pos:      Point,
        time:     f64,
        car:      Option<CarId>,
        waypoint: Option<WaypointId>,
    ) -> VertexId {
        let id = VertexId(self.vertices.len() as u32);
        self.vertices.push(Vertex { id, pos, time, car, waypoint });
        id
    }

    pub fn get(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(id.index())
    }

    pub fn get_mut(&mut self, id: VertexId) -> Option<&mut Vertex> {
        self.vertices.get_mut(id.index())
    }

    #[inline]
    pub fn contains(&self, id: VertexId) -> bool {
        id.index() < self.vertices.len()
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Vertex> + '_ {
        self.vertices.iter()
    }
}

impl Index<VertexId> for VertexStore {
    type Output = Vertex;
    #[inline]
    fn index(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.index()]
    }
}

impl IndexMut<VertexId> for VertexStore {
    #[inline]
    fn index_mut(&mut self, id: VertexId) -> &mut Vertex {
        &mut self.vertices[id.index()]
    }
}
