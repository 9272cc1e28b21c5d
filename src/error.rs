use thiserror::Error;

use crate::types::{EdgeId, VertexId};

/// Recoverable failures of topology-changing operations on an
/// [`EmbeddedGraph`](crate::EmbeddedGraph).
///
/// Callers such as the quadrangle repair may react to these by choosing a
/// different strategy. Broken preconditions of the algorithms are not
/// reported here, they panic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("vertex {0} is already present")]
    DuplicateVertex(VertexId),

    #[error("vertex {0} is not part of the graph")]
    UnknownVertex(VertexId),

    #[error("edge {0} is not part of the graph")]
    UnknownEdge(EdgeId),

    #[error("edge {edge} cannot be inserted between {v1} and {v2}: {reason}")]
    InvalidInsertion {
        edge: EdgeId,
        v1: VertexId,
        v2: VertexId,
        reason: &'static str,
    },

    /// The two insertion positions do not lie in the same face.
    #[error("edge {edge} between {v1} and {v2} would not lie inside a single face")]
    InconsistentEmbedding {
        edge: EdgeId,
        v1: VertexId,
        v2: VertexId,
    },

    #[error("vertex {0} must be isolated to split an edge through it")]
    NonIsolatedSplitVertex(VertexId),
}

/// Misuse of the step-wise [`IncrementalPlacer`](crate::IncrementalPlacer).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacerError {
    #[error("placer was not initialized")]
    Uninitialized,

    #[error("every vertex of the canonical order is already placed")]
    AlreadyDone,

    #[error("crossings can only be reinserted once the drawing is done")]
    NotDone,

    #[error(transparent)]
    Graph(#[from] GraphError),
}
