//! Visitor hooks that steer and observe an A* search.

use sdmc_core::VertexId;

/// What the engine should do with a vertex it has just popped.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Include {
    /// Close the vertex and relax the successors written to `out_neighbors`.
    Expand,
    /// Close the vertex without expanding it.
    Prune,
    /// Close the vertex and end the search (typically: the goal was popped).
    Stop,
}

/// Pluggable search behaviour.
///
/// Only [`include`][Self::include] is required; the observation hooks have
/// no-op defaults.
///
/// # Example — goal-terminating visitor over a fixed adjacency list
///
/// ```rust,ignore
/// struct ToGoal<'a> { adj: &'a [Vec<VertexId>], goal: VertexId }
///
/// impl AstarVisitor for ToGoal<'_> {
///     fn include(&mut self, _p: Option<VertexId>, v: VertexId, _d: f64, out: &mut Vec<VertexId>) -> Include {
///         if v == self.goal { return Include::Stop; }
///         out.extend_from_slice(&self.adj[v.index()]);
///         Include::Expand
///     }
/// }
/// ```
pub trait AstarVisitor {
    /// Called when `vertex` is popped with its final distance `dist`.
    ///
    /// Push the successors to relax into `out_neighbors` (it arrives empty).
    fn include(
        &mut self,
        parent:        Option<VertexId>,
        vertex:        VertexId,
        dist:          f64,
        out_neighbors: &mut Vec<VertexId>,
    ) -> Include;

    /// A vertex was reached for the first time.  `parent` is `None` for the source.
    fn discover(&mut self, _parent: Option<VertexId>, _vertex: VertexId, _dist: f64) {}

    /// An open vertex received a shorter tentative distance via `parent`.
    fn update(&mut self, _parent: VertexId, _vertex: VertexId, _dist: f64) {}

    /// A vertex was closed; its distance is final.
    fn close(&mut self, _vertex: VertexId) {}
}

impl<V: AstarVisitor + ?Sized> AstarVisitor for &mut V {
    fn include(
        &mut self,
        parent:        Option<VertexId>,
        vertex:        VertexId,
        dist:          f64,
        out_neighbors: &mut Vec<VertexId>,
    ) -> Include {
        (**self).include(parent, vertex, dist, out_neighbors)
    }

    fn discover(&mut self, parent: Option<VertexId>, vertex: VertexId, dist: f64) {
        (**self).discover(parent, vertex, dist)
    }

    fn update(&mut self, parent: VertexId, vertex: VertexId, dist: f64) {
        (**self).update(parent, vertex, dist)
    }

    fn close(&mut self, vertex: VertexId) {
        (**self).close(vertex)
    }
}

// ── AdjacencyVisitor ──────────────────────────────────────────────────────────

/// Expands vertices from an explicit adjacency list, stopping at `goal`.
///
/// Vertices past the end of `adjacency` have no successors.
pub struct AdjacencyVisitor<'a> {
    pub adjacency: &'a [Vec<VertexId>],
    pub goal:      Option<VertexId>,
}

impl<'a> AdjacencyVisitor<'a> {
    pub fn new(adjacency: &'a [Vec<VertexId>], goal: Option<VertexId>) -> Self {
        Self { adjacency, goal }
    }
}

impl AstarVisitor for AdjacencyVisitor<'_> {
    fn include(
        &mut self,
        _parent:       Option<VertexId>,
        vertex:        VertexId,
        _dist:         f64,
        out_neighbors: &mut Vec<VertexId>,
    ) -> Include {
        if Some(vertex) == self.goal {
            return Include::Stop;
        }
        if let Some(succ) = self.adjacency.get(vertex.index()) {
            out_neighbors.extend_from_slice(succ);
        }
        Include::Expand
    }
}

// ── CountingVisitor ───────────────────────────────────────────────────────────

/// Instrumentation wrapper: forwards every hook to `inner` and counts it.
pub struct CountingVisitor<V> {
    pub inner:      V,
    pub included:   usize,
    pub discovered: usize,
    pub updated:    usize,
    pub closed:     usize,
}

impl<V: AstarVisitor> CountingVisitor<V> {
    pub fn new(inner: V) -> Self {
        Self { inner, included: 0, discovered: 0, updated: 0, closed: 0 }
    }
}

impl<V: AstarVisitor> AstarVisitor for CountingVisitor<V> {
    fn include(
        &mut self,
        parent:        Option<VertexId>,
        vertex:        VertexId,
        dist:          f64,
        out_neighbors: &mut Vec<VertexId>,
    ) -> Include {
        self.included += 1;
        self.inner.include(parent, vertex, dist, out_neighbors)
    }

    fn discover(&mut self, parent: Option<VertexId>, vertex: VertexId, dist: f64) {
        self.discovered += 1;
        self.inner.discover(parent, vertex, dist);
    }

    fn update(&mut self, parent: VertexId, vertex: VertexId, dist: f64) {
        self.updated += 1;
        self.inner.update(parent, vertex, dist);
    }

    fn close(&mut self, vertex: VertexId) {
        self.closed += 1;
        self.inner.close(vertex);
    }
}
