use fixedbitset::FixedBitSet;
use hashbrown::{HashMap, HashSet};

use crate::{
    EmbeddedGraph,
    types::{FaceId, VertexId},
};

/// Counters of the biconnected canonical ordering, named as in the
/// Harel-Sardas paper.
///
/// - `a[f]`: number of edges of face `f` inside `G_{k-1}`,
/// - `n[v]`: number of neighbors of `v` inside `G_{k-1}`,
/// - `f[v]`: number of ready faces having `v` as their only vertex outside `G_{k-1}`.
#[derive(Debug, Default)]
pub(crate) struct Bookkeeping {
    pub a: HashMap<FaceId, usize>,
    pub n: HashMap<VertexId, usize>,
    pub f: HashMap<VertexId, usize>,
    pub order: Vec<VertexId>,
    placed: FixedBitSet,
}

impl Bookkeeping {
    pub fn new(graph: &EmbeddedGraph) -> Self {
        let mut book = Bookkeeping {
            placed: FixedBitSet::with_capacity(graph.next_vertex_id().index()),
            order: Vec::with_capacity(graph.vertex_count()),
            ..Default::default()
        };
        for f in graph.all_faces() {
            book.a.insert(f, 0);
        }
        for v in graph.vertices() {
            book.n.insert(v, 0);
            book.f.insert(v, 0);
        }
        book
    }

    pub fn is_placed(&self, v: VertexId) -> bool {
        self.placed.contains(v.index())
    }

    pub fn mark_placed(&mut self, v: VertexId) {
        if v.index() >= self.placed.len() {
            self.placed.grow(v.index() + 1);
        }
        self.placed.insert(v.index());
    }

    pub fn position(&self, v: VertexId) -> Option<usize> {
        self.order.iter().position(|&w| w == v)
    }

    pub fn n(&self, v: VertexId) -> usize {
        self.n.get(&v).copied().unwrap_or(0)
    }

    pub fn f(&self, v: VertexId) -> usize {
        self.f.get(&v).copied().unwrap_or(0)
    }

    /// Rule a: at least two placed neighbors forming a single interval of the contour.
    pub fn is_good(&self, v: VertexId) -> bool {
        self.n(v) >= 2 && self.n(v) == self.f(v) + 1
    }

    /// Rule b: exactly one placed neighbor, at which `v` has legal support.
    pub fn has_legal_support(&self, graph: &EmbeddedGraph, v: VertexId) -> bool {
        if self.n(v) != 1 {
            return false;
        }
        graph.neighbors(v).any(|u| {
            self.is_placed(u)
                && ((self.has_support(graph, v, u, 1) && Some(&u) != self.order.first())
                    || (self.has_support(graph, v, u, graph.degree(u) - 1) && Some(&u) != self.order.get(1)))
        })
    }

    /// Whether the neighbor `offset` places after `v` in the rotation of `u` is placed.
    /// Offset 1 checks left support, `degree - 1` right support.
    fn has_support(&self, graph: &EmbeddedGraph, v: VertexId, u: VertexId, offset: usize) -> bool {
        let rotation = graph.rotation(u);
        match graph.neighbor_index(v, u) {
            Some(idx) => self.is_placed(rotation[(idx + offset) % rotation.len()].0),
            None => false,
        }
    }

    pub fn update_neighbors(&mut self, graph: &EmbeddedGraph, v_k: VertexId) {
        for w in graph.neighbors(v_k) {
            *self.n.entry(w).or_insert(0) += 1;
        }
    }

    /// Counts the edges from `v_k` into `G_{k-1}` for both of their faces,
    /// then lets every non-outer face that became ready raise `F` of its
    /// last outside vertex.
    pub fn update_faces(&mut self, graph: &EmbeddedGraph, v_k: VertexId) {
        let mut affected = Vec::new();
        let mut seen = HashSet::new();
        for &(w, e) in graph.rotation(v_k) {
            if !self.is_placed(w) {
                continue;
            }
            if let Some((left, right)) = graph.faces_of(e) {
                for face in [left, right] {
                    *self.a.entry(face).or_insert(0) += 1;
                    if seen.insert(face) {
                        affected.push(face);
                    }
                }
            }
        }

        for face in affected {
            let size = graph.face(face).map_or(0, |f| f.len());
            let a = self.a.get(&face).copied().unwrap_or(0);
            if a + 2 == size && face != graph.outer_face() {
                self.update_ready_face(graph, face);
            }
        }
    }

    fn update_ready_face(&mut self, graph: &EmbeddedGraph, face: FaceId) {
        let mut outside = None;
        if let Some(walk) = graph.face(face) {
            for entry in walk.iter() {
                for v in [entry.endpoints.0, entry.endpoints.1] {
                    if !self.is_placed(v) {
                        assert!(
                            outside.is_none() || outside == Some(v),
                            "Face {} is not ready, more than one of its vertices is outside G_k",
                            face
                        );
                        outside = Some(v);
                    }
                }
            }
        }
        match outside {
            Some(v) => *self.f.entry(v).or_insert(0) += 1,
            None => panic!("Face {} is not ready, all of its vertices are inside G_k", face),
        }
    }
}
