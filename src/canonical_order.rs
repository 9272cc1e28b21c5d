use hashbrown::HashMap;
use tracing::{debug, trace};

use crate::{
    EmbeddedGraph,
    canonical_order_blocks::{
        bookkeeping::Bookkeeping,
        quadrangles::{QuadrangleRepair, RepairCases},
    },
    types::{EdgeId, RemovedCrossing, SplitEdge, Side, VertexId},
};

/// Computes a biconnected canonical ordering (Harel and Sardas) of an
/// embedded biconnected graph.
///
/// If removed crossings are registered, the ordering repairs the empty and
/// divided quadrangles they leave behind, which inserts dummy edges, shift
/// vertices and bend points into the graph.
#[derive(Clone, Debug, Default)]
pub struct CanonicalOrderer {
    removed_crossings: Vec<RemovedCrossing>,
}

/// Result of [`CanonicalOrderer::compute`].
#[derive(Clone, Debug, Default)]
pub struct CanonicalOrder {
    order: Vec<VertexId>,
    positions: HashMap<VertexId, usize>,
    split_edges: HashMap<EdgeId, SplitEdge>,
    dummy_edges: Vec<EdgeId>,
    inserted_vertices: Vec<VertexId>,
    repairs: RepairCases,
}

impl CanonicalOrder {
    pub fn vertices(&self) -> &[VertexId] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The `i`-th vertex, 0-based.
    pub fn get(&self, i: usize) -> Option<VertexId> {
        self.order.get(i).copied()
    }

    /// Inverse of [`CanonicalOrder::get`].
    pub fn position(&self, v: VertexId) -> Option<usize> {
        self.positions.get(&v).copied()
    }

    /// Edges replaced by a bend point while repairing quadrangles, with the
    /// path replacing each of them.
    pub fn split_edges(&self) -> &HashMap<EdgeId, SplitEdge> {
        &self.split_edges
    }

    /// Edges that exist only to make the graph drawable.
    pub fn dummy_edges(&self) -> &[EdgeId] {
        &self.dummy_edges
    }

    /// Shift vertices and bend points added to the graph while ordering.
    pub fn inserted_vertices(&self) -> &[VertexId] {
        &self.inserted_vertices
    }

    pub fn repairs(&self) -> RepairCases {
        self.repairs
    }
}

impl CanonicalOrderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers crossing edge pairs that were removed from the graph.
    pub fn with_removed_crossings(mut self, removed: Vec<RemovedCrossing>) -> Self {
        self.removed_crossings = removed;
        self
    }

    pub fn removed_crossings(&self) -> &[RemovedCrossing] {
        &self.removed_crossings
    }

    /// Orders all vertices of `graph`. The first two vertices are the head and
    /// the tail of the first entry on the outer face walk.
    ///
    /// Panics if the graph is not biconnected or has fewer than three vertices.
    pub fn compute(&self, graph: &mut EmbeddedGraph) -> CanonicalOrder {
        assert!(
            graph.vertex_count() >= 3,
            "Graph must have at least 3 vertices, has {}",
            graph.vertex_count()
        );
        let first = match graph.face(graph.outer_face()).and_then(|f| f.first()) {
            Some(entry) => *entry,
            None => panic!("Graph has no embedding, its outer face is empty"),
        };

        let mut book = Bookkeeping::new(graph);
        let (v1, v2) = (first.head(), first.tail());
        let inner = graph.faces_of(first.edge).map(|(left, right)| match first.side {
            Side::Left => right,
            Side::Right => left,
        });
        book.order.extend([v1, v2]);
        book.update_neighbors(graph, v1);
        book.update_neighbors(graph, v2);
        if let Some(inner) = inner {
            book.a.insert(inner, 1);
            if let Some(face) = graph.face(inner).filter(|f| f.len() == 3) {
                for v in face.vertices() {
                    if v != v1 && v != v2 {
                        book.f.insert(v, 1);
                    }
                }
            }
        }

        let mut repair =
            (!self.removed_crossings.is_empty()).then(|| QuadrangleRepair::new(&self.removed_crossings));

        let mut k = 1;
        while k <= graph.vertex_count() {
            let v_k = if k < 3 {
                let v = book.order[k - 1];
                book.mark_placed(v);
                v
            } else {
                let v = match select_next(graph, &book) {
                    Some(v) => v,
                    None => panic!("No vertex can be ordered in step {}, the graph is not biconnected", k),
                };
                book.order.push(v);
                book.mark_placed(v);
                book.update_neighbors(graph, v);
                book.update_faces(graph, v);
                v
            };
            trace!(step = k, vertex = %v_k, "ordered vertex");

            if let Some(repair) = repair.as_mut() {
                k = repair.handle(graph, &mut book, k, v_k);
            }
            k += 1;
        }

        let positions = book.order.iter().enumerate().map(|(i, &v)| (v, i)).collect();
        let mut result = CanonicalOrder {
            order: book.order,
            positions,
            ..Default::default()
        };
        if let Some(repair) = repair {
            debug!(cases = ?repair.cases, "quadrangle repair finished");
            result.split_edges = repair.split_edges;
            result.dummy_edges = repair.dummy_edges;
            result.inserted_vertices = repair.inserted_vertices;
            result.repairs = repair.cases;
        }
        result
    }
}

/// First unordered vertex, in handle order, that satisfies rule a, else the
/// first one satisfying rule b.
fn select_next(graph: &EmbeddedGraph, book: &Bookkeeping) -> Option<VertexId> {
    let unordered: Vec<VertexId> = graph.vertices().filter(|&v| !book.is_placed(v)).collect();
    let good = unordered.iter().copied().find(|&v| book.is_good(v));
    good.or_else(|| unordered.iter().copied().find(|&v| book.has_legal_support(graph, v)))
}
