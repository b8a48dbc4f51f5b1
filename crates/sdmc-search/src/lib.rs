//! `sdmc-search` — best-first search over implicit, index-addressed graphs.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                      |
//! |-------------|---------------------------------------------------------------|
//! | [`astar`]   | `AstarSearch` engine, `Color`, `SearchOutcome`                |
//! | [`visitor`] | `AstarVisitor` trait, `Include`, `AdjacencyVisitor`, `CountingVisitor` |
//! | [`error`]   | `SearchError`, `SearchResult<T>`                              |
//!
//! # Implicit graphs
//!
//! The engine never sees an adjacency structure.  Successors of a vertex are
//! produced on demand by the visitor's [`include`](AstarVisitor::include)
//! hook when the vertex is popped, which lets the caller prune, terminate, or
//! generate edges against a graph that keeps growing between searches.
//! Per-vertex bookkeeping arrays grow to fit whatever indices the visitor
//! hands back.

pub mod astar;
pub mod error;
pub mod visitor;


pub use astar::{AstarSearch, Color, SearchOutcome, SearchStatus};
pub use error::{SearchError, SearchResult};
pub use visitor::{AdjacencyVisitor, AstarVisitor, CountingVisitor, Include};
