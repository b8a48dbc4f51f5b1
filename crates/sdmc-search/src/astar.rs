//! A* over an implicit graph addressed by [`VertexId`].
//!
//! # Queue discipline
//!
//! The open set is a `BinaryHeap` keyed on `f = g + h`.  Decrease-key is done
//! through a per-vertex *handle*: every push stamps the entry with the
//! vertex's current handle, an improvement bumps the handle and pushes a new
//! entry, and popped entries whose handle no longer matches are discarded as
//! stale.  Equal `f` values pop in ascending vertex index, so results are
//! reproducible.
//!
//! Closed vertices are never reopened; the heuristic is assumed consistent.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use sdmc_core::VertexId;

use crate::{AstarVisitor, Include, SearchError, SearchResult};

// ── Per-vertex state ──────────────────────────────────────────────────────────

/// Search colour of a vertex.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum Color {
    /// Never reached.
    #[default]
    White,
    /// Reached and waiting in the open set.
    Gray,
    /// Popped; distance is final.
    Black,
}

/// Why a search returned.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SearchStatus {
    /// The visitor returned [`Include::Stop`].
    Terminated,
    /// The open set ran empty.
    Exhausted,
}

/// Summary of one [`AstarSearch::run`] call.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct SearchOutcome {
    pub status:     SearchStatus,
    /// Vertex at which the visitor stopped the search, if it did.
    pub stopped_at: Option<VertexId>,
    /// Number of vertices closed.
    pub closed:     usize,
}

// ── Queue entry ───────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug)]
struct QueueEntry {
    f:      f64,
    vertex: VertexId,
    handle: u32,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f
            .total_cmp(&other.f)
            .then_with(|| self.vertex.cmp(&other.vertex))
            .then_with(|| self.handle.cmp(&other.handle))
    }
}

// ── AstarSearch ───────────────────────────────────────────────────────────────

/// Reusable A* engine.
///
/// Keep one instance around and call [`run`](Self::run) repeatedly: the
/// per-vertex arrays are reset but their allocations are reused.  After a
/// run, the accessors report the search tree rooted at the last source.
#[derive(Default)]
pub struct AstarSearch {
    color:     Vec<Color>,
    dist:      Vec<f64>,
    parent:    Vec<VertexId>,
    handle:    Vec<u32>,
    heap:      BinaryHeap<Reverse<QueueEntry>>,
    neighbors: Vec<VertexId>,
}

impl AstarSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size the per-vertex arrays for `vertices` entries.
    pub fn with_capacity(vertices: usize) -> Self {
        let mut search = Self::new();
        search.ensure(vertices);
        search
    }

    /// Run A* from `source`.
    ///
    /// - `cost(u, v)`: weight of the edge `u → v`; must be `>= 0`.
    ///   `f64::INFINITY` marks an infeasible edge, which is skipped.
    /// - `heuristic(v)`: admissible, consistent estimate of the remaining
    ///   cost from `v`.
    /// - `visitor`: supplies successors and decides when to stop.
    ///
    /// Returns `Ok` both when the visitor stops the search and when the open
    /// set runs dry; check [`is_closed`](Self::is_closed) on the target to
    /// tell the two apart from the caller's point of view.
    pub fn run<C, H, V>(
        &mut self,
        source:      VertexId,
        mut cost:    C,
        heuristic:   H,
        visitor:     &mut V,
    ) -> SearchResult<SearchOutcome>
    where
        C: FnMut(VertexId, VertexId) -> f64,
        H: Fn(VertexId) -> f64,
        V: AstarVisitor + ?Sized,
    {
        if source == VertexId::INVALID {
            return Err(SearchError::InvalidSource);
        }
        self.reset();
        self.ensure(source.index() + 1);

        let h = checked_heuristic(&heuristic, source)?;
        self.dist[source.index()] = 0.0;
        self.color[source.index()] = Color::Gray;
        self.heap.push(Reverse(QueueEntry { f: h, vertex: source, handle: 0 }));
        visitor.discover(None, source, 0.0);

        let mut closed = 0usize;
        let mut scratch = std::mem::take(&mut self.neighbors);

        while let Some(Reverse(entry)) = self.heap.pop() {
            let u = entry.vertex;
            // Skip stale heap entries.
            if self.color[u.index()] != Color::Gray || entry.handle != self.handle[u.index()] {
                continue;
            }

            let g_u = self.dist[u.index()];
            scratch.clear();
            let decision = visitor.include(self.parent(u), u, g_u, &mut scratch);

            self.color[u.index()] = Color::Black;
            closed += 1;
            visitor.close(u);

            match decision {
                Include::Stop => {
                    self.neighbors = scratch;
                    return Ok(SearchOutcome {
                        status:     SearchStatus::Terminated,
                        stopped_at: Some(u),
                        closed,
                    });
                }
                Include::Prune => continue,
                Include::Expand => {}
            }

            if let Err(e) = self.relax(u, g_u, &scratch, &mut cost, &heuristic, visitor) {
                self.neighbors = scratch;
                return Err(e);
            }
        }

        self.neighbors = scratch;
        Ok(SearchOutcome { status: SearchStatus::Exhausted, stopped_at: None, closed })
    }

    // ── Result accessors ──────────────────────────────────────────────────

    pub fn color(&self, v: VertexId) -> Color {
        self.color.get(v.index()).copied().unwrap_or_default()
    }

    /// `true` once `v`'s distance is final.
    pub fn is_closed(&self, v: VertexId) -> bool {
        self.color(v) == Color::Black
    }

    /// Best known distance from the source, or `None` if `v` was never reached.
    pub fn dist(&self, v: VertexId) -> Option<f64> {
        match self.color(v) {
            Color::White => None,
            _ => Some(self.dist[v.index()]),
        }
    }

    /// Search-tree parent of `v` (`None` for the source and unreached vertices).
    pub fn parent(&self, v: VertexId) -> Option<VertexId> {
        self.parent
            .get(v.index())
            .copied()
            .filter(|&p| p != VertexId::INVALID)
    }

    /// Source-to-`target` vertex sequence along the search tree.
    ///
    /// Returns `None` if `target` was never reached.  The path of a vertex
    /// that is still open is the best one found so far, not necessarily optimal.
    pub fn path_to(&self, target: VertexId) -> Option<Vec<VertexId>> {
        if self.color(target) == Color::White {
            return None;
        }
        let mut path = vec![target];
        let mut cur = target;
        while let Some(p) = self.parent(cur) {
            path.push(p);
            cur = p;
        }
        path.reverse();
        Some(path)
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// Relax every edge `u → v` for `v` in `successors`.
    fn relax<C, H, V>(
        &mut self,
        u:          VertexId,
        g_u:        f64,
        successors: &[VertexId],
        cost:       &mut C,
        heuristic:  &H,
        visitor:    &mut V,
    ) -> SearchResult<()>
    where
        C: FnMut(VertexId, VertexId) -> f64,
        H: Fn(VertexId) -> f64,
        V: AstarVisitor + ?Sized,
    {
        for &v in successors {
            self.ensure(v.index() + 1);
            let vi = v.index();
            if self.color[vi] == Color::Black {
                continue;
            }

            let w = cost(u, v);
            if w == f64::INFINITY {
                // Infeasible edge.
                continue;
            }
            if !(w >= 0.0) {
                return Err(SearchError::InvalidCost { from: u, to: v, cost: w });
            }
            let g = g_u + w;

            match self.color[vi] {
                Color::White => {
                    let h = checked_heuristic(heuristic, v)?;
                    self.dist[vi] = g;
                    self.parent[vi] = u;
                    self.color[vi] = Color::Gray;
                    self.heap.push(Reverse(QueueEntry { f: g + h, vertex: v, handle: self.handle[vi] }));
                    visitor.discover(Some(u), v, g);
                }
                Color::Gray if g < self.dist[vi] => {
                    let h = checked_heuristic(heuristic, v)?;
                    self.dist[vi] = g;
                    self.parent[vi] = u;
                    self.handle[vi] = self.handle[vi].wrapping_add(1);
                    let f = g + h;
                    self.heap.push(Reverse(QueueEntry { f, vertex: v, handle: self.handle[vi] }));
                    visitor.update(u, v, g);
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.color.fill(Color::White);
        self.dist.fill(f64::INFINITY);
        self.parent.fill(VertexId::INVALID);
        self.handle.fill(0);
        self.heap.clear();
    }

    fn ensure(&mut self, len: usize) {
        if self.color.len() < len {
            self.color.resize(len, Color::White);
            self.dist.resize(len, f64::INFINITY);
            self.parent.resize(len, VertexId::INVALID);
            self.handle.resize(len, 0);
        }
    }
}

fn checked_heuristic<H: Fn(VertexId) -> f64>(heuristic: &H, v: VertexId) -> SearchResult<f64> {
    let h = heuristic(v);
    if h.is_nan() {
        return Err(SearchError::InvalidHeuristic { vertex: v });
    }
    Ok(h)
}
