//! Graph storage: arena graph, builder and snapshot manager.

pub mod arena;
pub mod builder;
pub mod manager;

pub use arena::CatalogGraph;
pub use builder::{build_from_source, BuildReport};
pub use manager::GraphManager;
