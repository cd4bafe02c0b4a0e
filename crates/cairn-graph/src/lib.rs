//! # cairn-graph
//!
//! In-memory dependency/lineage graph of the database catalog (`petgraph`).
//! Built wholesale from an `ICatalogSource`, published as an immutable
//! `Arc` snapshot, and queried with bounded breadth-first traversals.

pub mod engine;
pub mod graph;
pub mod scheduler;
pub mod traversal;

pub use engine::GraphStore;
pub use graph::{CatalogGraph, GraphManager};
pub use traversal::{TraversalConfig, TraversalEngine};
