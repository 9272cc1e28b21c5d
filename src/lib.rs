// #![warn(missing_docs)]

//! # planar_grid_drawing
//!
//! Straight-line grid drawings of biconnected planar graphs, following
//! Harel and Sardas, "An Algorithm for Straight-Line Drawing of Planar
//! Graphs" (1995), extended to NIC-planar graphs whose crossing edge pairs
//! were taken out before ordering and are drawn back with a crossing point
//! and two bend points afterwards.
//!
//! The pipeline is
//! 1. build an [`EmbeddedGraph`] (by hand, from a rotation system, from a
//!    straight-line drawing or with [`input::from_str`]),
//! 2. optionally complete the kites around crossing vertices and remove them
//!    with [`insert_empty_kites`] and [`remove_crossings`],
//! 3. compute a [`CanonicalOrder`] with the [`CanonicalOrderer`],
//! 4. place the vertices step by step with the [`IncrementalPlacer`] and
//!    reinsert the crossings.
//!
//! Graph views for drawing are produced with [`petgraph`](https://docs.rs/petgraph).

pub mod canonical_order;
pub mod canonical_order_blocks;
pub mod debugging;
pub mod embedded_graph;
pub mod embedded_graph_blocks;
pub mod error;
pub mod input;
pub mod placement;
pub mod placement_blocks;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use canonical_order::{CanonicalOrder, CanonicalOrderer};
pub use canonical_order_blocks::quadrangles::RepairCases;
pub use embedded_graph::EmbeddedGraph;
pub use embedded_graph_blocks::crossings::{insert_empty_kites, mark_crossings, remove_crossings};
pub use error::{GraphError, PlacerError};
pub use placement::{IncrementalPlacer, PlacerState};
pub use placement_blocks::layout_view::LayoutNode;
pub use placement_blocks::reinsert::{ReinsertedCrossing, ReinsertionCase};
pub use types::{EdgeId, FaceId, GridPoint, RemovedCrossing, SplitEdge, VertexId, VertexKind};
