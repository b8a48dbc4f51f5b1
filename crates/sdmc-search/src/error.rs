//! Search error type.

use thiserror::Error;

use sdmc_core::VertexId;

/// Errors produced by `sdmc-search`.
///
/// An unreachable target is *not* an error: the search simply exhausts its
/// open set and the caller checks [`AstarSearch::is_closed`](crate::AstarSearch::is_closed).
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("edge {from} -> {to} has invalid cost {cost} (must be non-negative or +inf)")]
    InvalidCost { from: VertexId, to: VertexId, cost: f64 },

    #[error("heuristic for {vertex} is NaN")]
    InvalidHeuristic { vertex: VertexId },

    #[error("source vertex is the INVALID sentinel")]
    InvalidSource,
}

pub type SearchResult<T> = Result<T, SearchError>;
