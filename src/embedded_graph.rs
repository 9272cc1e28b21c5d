use fixedbitset::FixedBitSet;
use tracing::trace;

use crate::{
    embedded_graph_blocks::{
        face::{Face, FaceEntry},
        structures::{EdgeData, Slots, VertexData},
    },
    error::GraphError,
    types::{EdgeId, FaceId, Side, SplitEdge, VertexId, VertexKind},
};

/// Undirected graph together with a combinatorial embedding.
///
/// Every vertex keeps a circular rotation of its incident edges, every edge
/// knows the face on each of its sides, and every face keeps its boundary
/// walk. All topology-changing operations keep these three views consistent,
/// so faces are never recomputed from scratch.
///
/// "Left" and "right" are relative to the vertex one stands at: the left
/// face of `e` at `v` is the face in the angle following `e` in the rotation
/// of `v`, the right face is the one in the angle preceding it.
#[derive(Clone, Debug)]
pub struct EmbeddedGraph {
    pub(crate) vertices: Slots<VertexData>,
    pub(crate) edges: Slots<EdgeData>,
    pub(crate) faces: Slots<Face>,
    pub(crate) outer_face: FaceId,
}

impl Default for EmbeddedGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl EmbeddedGraph {
    pub fn new() -> Self {
        let mut faces = Slots::default();
        let outer = faces.push(Face::new());
        EmbeddedGraph {
            vertices: Slots::default(),
            edges: Slots::default(),
            faces,
            outer_face: FaceId(outer as u32),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains_vertex(&self, v: VertexId) -> bool {
        self.vertices.contains(v.index())
    }

    pub fn contains_edge(&self, e: EdgeId) -> bool {
        self.edges.contains(e.index())
    }

    /// Vertices in increasing handle order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices.indices().map(|i| VertexId(i as u32))
    }

    /// Edges in increasing handle order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.indices().map(|i| EdgeId(i as u32))
    }

    /// A handle no vertex has used so far.
    pub fn next_vertex_id(&self) -> VertexId {
        VertexId(self.vertices.capacity_hint() as u32)
    }

    /// A handle no edge has used so far.
    pub fn next_edge_id(&self) -> EdgeId {
        EdgeId(self.edges.capacity_hint() as u32)
    }

    pub fn add_vertex(&mut self, v: VertexId) -> Result<(), GraphError> {
        self.add_vertex_with_kind(v, VertexKind::Regular)
    }

    pub fn add_vertex_with_kind(&mut self, v: VertexId, kind: VertexKind) -> Result<(), GraphError> {
        if !self.vertices.insert(v.index(), VertexData::new(kind)) {
            return Err(GraphError::DuplicateVertex(v));
        }
        Ok(())
    }

    /// Adds an isolated vertex under a fresh handle.
    pub fn add_vertex_of_kind(&mut self, kind: VertexKind) -> VertexId {
        VertexId(self.vertices.push(VertexData::new(kind)) as u32)
    }

    pub fn vertex_kind(&self, v: VertexId) -> Option<VertexKind> {
        self.vertices.get(v.index()).map(|d| d.kind)
    }

    pub fn set_vertex_kind(&mut self, v: VertexId, kind: VertexKind) -> Result<(), GraphError> {
        let data = self
            .vertices
            .get_mut(v.index())
            .ok_or(GraphError::UnknownVertex(v))?;
        data.kind = kind;
        Ok(())
    }

    /// Zero for unknown vertices.
    pub fn degree(&self, v: VertexId) -> usize {
        self.rotation(v).len()
    }

    /// Incident `(neighbor, edge)` pairs in rotation order. Empty for unknown vertices.
    pub fn rotation(&self, v: VertexId) -> &[(VertexId, EdgeId)] {
        self.vertices
            .get(v.index())
            .map(|d| d.rotation.as_slice())
            .unwrap_or(&[])
    }

    pub fn neighbors(&self, v: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.rotation(v).iter().map(|&(w, _)| w)
    }

    pub fn incident_edges(&self, v: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.rotation(v).iter().map(|&(_, e)| e)
    }

    pub fn endpoints(&self, e: EdgeId) -> Option<(VertexId, VertexId)> {
        self.edges.get(e.index()).map(|d| d.endpoints)
    }

    pub fn opposite(&self, v: VertexId, e: EdgeId) -> Option<VertexId> {
        let (a, b) = self.endpoints(e)?;
        if a == v {
            Some(b)
        } else if b == v {
            Some(a)
        } else {
            None
        }
    }

    pub fn find_edge(&self, v1: VertexId, v2: VertexId) -> Option<EdgeId> {
        self.rotation(v1)
            .iter()
            .find(|&&(w, _)| w == v2)
            .map(|&(_, e)| e)
    }

    pub fn is_neighbor(&self, v1: VertexId, v2: VertexId) -> bool {
        self.find_edge(v1, v2).is_some()
    }

    /// Position of `neighbor` in the rotation of `at`.
    pub fn neighbor_index(&self, neighbor: VertexId, at: VertexId) -> Option<usize> {
        self.rotation(at).iter().position(|&(w, _)| w == neighbor)
    }

    /// Position of `edge` in the rotation of `at`.
    pub fn edge_index(&self, edge: EdgeId, at: VertexId) -> Option<usize> {
        self.rotation(at).iter().position(|&(_, e)| e == edge)
    }

    /// Position in the rotation of `at` of the first edge whose right face is
    /// `face`. Inserting an edge before that position puts it inside `face`.
    pub fn face_index_at(&self, face: FaceId, at: VertexId) -> Option<usize> {
        self.rotation(at)
            .iter()
            .position(|&(_, e)| self.right_face(e, at) == Some(face))
    }

    /// True if `successor` directly follows `predecessor` in the rotation of `at`.
    pub fn is_direct_predecessor(&self, predecessor: VertexId, successor: VertexId, at: VertexId) -> bool {
        let deg = self.degree(at);
        match (
            self.neighbor_index(predecessor, at),
            self.neighbor_index(successor, at),
        ) {
            (Some(p), Some(s)) => (p + 1) % deg == s,
            _ => false,
        }
    }

    /// For two neighbors of `at` that are consecutive in its rotation, the
    /// position of the later one. They bound a common face there.
    pub fn index_of_later_bounding_neighbor(&self, n0: VertexId, n1: VertexId, at: VertexId) -> Option<usize> {
        let deg = self.degree(at);
        let i0 = self.neighbor_index(n0, at)?;
        let i1 = self.neighbor_index(n1, at)?;
        if (i1 + 1) % deg == i0 {
            Some(i0)
        } else if (i0 + 1) % deg == i1 {
            Some(i1)
        } else {
            None
        }
    }

    /// Face in the angle at `at` spanned by two rotation-consecutive neighbors.
    pub fn face_between(&self, n0: VertexId, n1: VertexId, at: VertexId) -> Option<FaceId> {
        let idx = self.index_of_later_bounding_neighbor(n0, n1, at)?;
        let (_, e) = self.rotation(at)[idx];
        self.right_face(e, at)
    }

    /// Left face, then right face, relative to the stored quasi-direction.
    pub fn faces_of(&self, e: EdgeId) -> Option<(FaceId, FaceId)> {
        self.edges
            .get(e.index())
            .map(|d| (d.faces[0], d.faces[1]))
    }

    pub fn left_incident_face(&self, e: EdgeId) -> Option<FaceId> {
        self.faces_of(e).map(|(l, _)| l)
    }

    pub fn right_incident_face(&self, e: EdgeId) -> Option<FaceId> {
        self.faces_of(e).map(|(_, r)| r)
    }

    /// Face left of `e` when standing at `at` and looking along `e`.
    pub fn left_face(&self, e: EdgeId, at: VertexId) -> Option<FaceId> {
        let data = self.edges.get(e.index())?;
        let side = side_of_left_face(data.endpoints, at)?;
        Some(data.faces[side.index()])
    }

    /// Face right of `e` when standing at `at` and looking along `e`.
    pub fn right_face(&self, e: EdgeId, at: VertexId) -> Option<FaceId> {
        let data = self.edges.get(e.index())?;
        let side = side_of_left_face(data.endpoints, at)?.flip();
        Some(data.faces[side.index()])
    }

    pub fn face(&self, f: FaceId) -> Option<&Face> {
        self.faces.get(f.index())
    }

    pub fn outer_face(&self) -> FaceId {
        self.outer_face
    }

    /// Panics if `f` is not a face of this graph.
    pub fn set_outer_face(&mut self, f: FaceId) {
        assert!(
            self.faces.contains(f.index()),
            "Face {} does not exist, it cannot become the outer face",
            f
        );
        self.outer_face = f;
    }

    /// Every face bounded by at least one edge, in order of first appearance
    /// along the edges.
    pub fn all_faces(&self) -> Vec<FaceId> {
        let mut seen = FixedBitSet::with_capacity(self.faces.capacity_hint());
        let mut result = Vec::new();
        for e in self.edges.indices() {
            if let Some(data) = self.edges.get(e) {
                for f in data.faces {
                    if !seen.put(f.index()) {
                        result.push(f);
                    }
                }
            }
        }
        result
    }

    /// Inserts `edge` between `v1` and `v2`, before rotation position `pos1`
    /// at `v1` and before `pos2` at `v2` (positions range over `0..=degree`).
    ///
    /// If the insertion splits the outer face, the half left of `v1 → v2`
    /// stays the outer face; swap the endpoints to keep the other half.
    pub fn add_edge(
        &mut self,
        edge: EdgeId,
        v1: VertexId,
        pos1: usize,
        v2: VertexId,
        pos2: usize,
    ) -> Result<(), GraphError> {
        let invalid = |reason| GraphError::InvalidInsertion {
            edge,
            v1,
            v2,
            reason,
        };

        for v in [v1, v2] {
            if !self.contains_vertex(v) {
                return Err(GraphError::UnknownVertex(v));
            }
        }
        if v1 == v2 {
            return Err(invalid("self-loops are not supported"));
        }
        if self.contains_edge(edge) {
            return Err(invalid("edge handle is already in use"));
        }
        let d1 = self.degree(v1);
        let d2 = self.degree(v2);
        if pos1 > d1 || pos2 > d2 {
            return Err(invalid("rotation position out of range"));
        }
        if self.is_neighbor(v1, v2) {
            return Err(invalid("vertices are already adjacent"));
        }

        if self.edge_count() == 0 {
            self.seed_outer_face(edge, v1, v2);
            return Ok(());
        }
        if d1 == 0 && d2 == 0 {
            return Err(invalid("both endpoints are isolated"));
        }

        if d1 == 0 {
            self.insert_pendant_edge(edge, (v1, v2), v1, v2, pos2);
        } else if d2 == 0 {
            self.insert_pendant_edge(edge, (v1, v2), v2, v1, pos1);
        } else {
            let prev1 = self.rotation(v1)[(pos1 + d1 - 1) % d1];
            let prev2 = self.rotation(v2)[(pos2 + d2 - 1) % d2];
            let face = self.left_face(prev1.1, v1);
            if face.is_none() || face != self.left_face(prev2.1, v2) {
                return Err(GraphError::InconsistentEmbedding { edge, v1, v2 });
            }
            let face = face.unwrap_or(self.outer_face);

            self.edges.insert(
                edge.index(),
                EdgeData {
                    endpoints: (v1, v2),
                    faces: [face, face],
                },
            );
            self.split_face(face, edge, (v1, prev1.1), (v2, prev2.1));
            self.rotation_mut(v1).insert(pos1, (v2, edge));
            self.rotation_mut(v2).insert(pos2, (v1, edge));
        }

        Ok(())
    }

    /// Removes `edge`, uniting its two faces if they differ.
    pub fn remove_edge(&mut self, edge: EdgeId) -> Result<(), GraphError> {
        let data = self
            .edges
            .get(edge.index())
            .cloned()
            .ok_or(GraphError::UnknownEdge(edge))?;
        let [left, right] = data.faces;

        if left != right {
            self.unite_faces(left, right, edge);
        } else if let Some(face) = self.faces.get_mut(left.index()) {
            face.remove_edge(edge);
        }

        self.edges.remove(edge.index());
        let (a, b) = data.endpoints;
        for v in [a, b] {
            self.rotation_mut(v).retain(|&(_, e)| e != edge);
        }
        Ok(())
    }

    /// Removes `v` after removing all of its edges.
    pub fn remove_vertex(&mut self, v: VertexId) -> Result<(), GraphError> {
        if !self.contains_vertex(v) {
            return Err(GraphError::UnknownVertex(v));
        }
        let incident: Vec<EdgeId> = self.incident_edges(v).collect();
        for e in incident.into_iter().rev() {
            self.remove_edge(e)?;
        }
        self.vertices.remove(v.index());
        Ok(())
    }

    /// Replaces `edge` by the path `first_half`, `via`, `second_half` along
    /// the same two faces. `via` is created as a bend point if it does not
    /// exist and must be isolated otherwise.
    pub fn split_edge(
        &mut self,
        edge: EdgeId,
        via: VertexId,
        first_half: EdgeId,
        second_half: EdgeId,
    ) -> Result<SplitEdge, GraphError> {
        let (v0, v1) = self.endpoints(edge).ok_or(GraphError::UnknownEdge(edge))?;
        let created = !self.contains_vertex(via);
        if created {
            self.add_vertex_with_kind(via, VertexKind::BendPoint)?;
        } else if self.degree(via) != 0 {
            return Err(GraphError::NonIsolatedSplitVertex(via));
        }

        let d0 = self.degree(v0);
        let at_v0 = self.edge_index(edge, v0).map(|i| (i + 1) % d0).unwrap_or(0);
        let at_v1 = self.edge_index(edge, v1).unwrap_or(0);
        let outer_on_left = self.left_face(edge, v0) == Some(self.outer_face);
        let outer_on_right = self.right_face(edge, v0) == Some(self.outer_face);

        let mut attached = self.add_edge(first_half, v0, at_v0, via, 0);
        if attached.is_ok() {
            attached = self.add_edge(second_half, via, 1, v1, at_v1);
            if attached.is_err() {
                self.remove_edge(first_half)?;
            }
        }
        if let Err(err) = attached {
            if created {
                self.remove_vertex(via)?;
            }
            return Err(err);
        }
        self.remove_edge(edge)?;

        if outer_on_left {
            if let Some(f) = self.left_face(first_half, v0) {
                self.outer_face = f;
            }
        }
        if outer_on_right {
            if let Some(f) = self.right_face(first_half, v0) {
                self.outer_face = f;
            }
        }
        trace!(%edge, %via, %first_half, %second_half, "split edge");

        Ok(SplitEdge {
            first_half,
            via,
            second_half,
        })
    }

    fn rotation_mut(&mut self, v: VertexId) -> &mut Vec<(VertexId, EdgeId)> {
        match self.vertices.get_mut(v.index()) {
            Some(data) => &mut data.rotation,
            None => panic!("Vertex {} vanished while its rotation was updated", v),
        }
    }

    fn face_mut(&mut self, f: FaceId) -> &mut Face {
        match self.faces.get_mut(f.index()) {
            Some(face) => face,
            None => panic!("Face {} is referenced by an edge but does not exist", f),
        }
    }

    /// The very first edge turns the outer face into a walk of its two sides.
    fn seed_outer_face(&mut self, edge: EdgeId, v1: VertexId, v2: VertexId) {
        let outer = self.outer_face;
        let endpoints = (v1, v2);
        self.edges.insert(
            edge.index(),
            EdgeData {
                endpoints,
                faces: [outer, outer],
            },
        );
        let face = self.face_mut(outer);
        face.clear();
        face.push(FaceEntry::leaving(edge, endpoints, v1));
        face.push(FaceEntry::leaving(edge, endpoints, v2));
        self.rotation_mut(v1).push((v2, edge));
        self.rotation_mut(v2).push((v1, edge));
    }

    /// Adds an edge from the isolated vertex `lone` into the face at `other`
    /// preceding rotation position `pos`. No face is created.
    fn insert_pendant_edge(
        &mut self,
        edge: EdgeId,
        endpoints: (VertexId, VertexId),
        lone: VertexId,
        other: VertexId,
        pos: usize,
    ) {
        let deg = self.degree(other);
        let (_, prev) = self.rotation(other)[(pos + deg - 1) % deg];
        let prev_endpoints = self.endpoints(prev).unwrap_or(endpoints);
        let face_id = self.left_face(prev, other).unwrap_or(self.outer_face);

        self.edges.insert(
            edge.index(),
            EdgeData {
                endpoints,
                faces: [face_id, face_id],
            },
        );

        let towards_other = FaceEntry::leaving(edge, endpoints, lone);
        let towards_lone = FaceEntry::leaving(edge, endpoints, other);
        let anchor = FaceEntry::leaving(prev, prev_endpoints, other);
        let face = self.face_mut(face_id);
        let inserted = face.insert_before(towards_other, &anchor)
            && face.insert_before(towards_lone, &towards_other);
        assert!(
            inserted,
            "Face {} does not contain the edge {} it was reached from",
            face_id, prev
        );

        self.rotation_mut(lone).push((other, edge));
        self.rotation_mut(other).insert(pos, (lone, edge));
    }

    /// Splits `face` along the freshly stored `edge` running from `a.0` to
    /// `b.0`. `a.1` and `b.1` are the edges preceding the insertion
    /// positions at those vertices.
    fn split_face(&mut self, face: FaceId, edge: EdgeId, a: (VertexId, EdgeId), b: (VertexId, EdgeId)) {
        let old = match self.faces.remove(face.index()) {
            Some(old) => old,
            None => panic!("Face {} to be split does not exist", face),
        };
        let endpoints = (a.0, b.0);
        let entry_at = |(v, e): (VertexId, EdgeId), g: &EmbeddedGraph| {
            let ends = g.endpoints(e).unwrap_or(endpoints);
            FaceEntry::leaving(e, ends, v)
        };
        let idx_a = old.position(&entry_at(a, &*self));
        let idx_b = old.position(&entry_at(b, &*self));
        let (idx_a, idx_b) = match (idx_a, idx_b) {
            (Some(x), Some(y)) if x != y => (x, y),
            _ => panic!(
                "Face {} does not hold both insertion angles of edge {} separately",
                face, edge
            ),
        };

        // halves[0] continues behind a's preceding edge, halves[1] behind b's
        let forward = FaceEntry::leaving(edge, endpoints, a.0);
        let backward = FaceEntry::leaving(edge, endpoints, b.0);
        let mut halves = [Face::new(), Face::new()];
        let mut current = if idx_a < idx_b { 1 } else { 0 };
        for (i, entry) in old.iter().enumerate() {
            if i == idx_a {
                halves[current].push(forward);
                current = 0;
            }
            if i == idx_b {
                halves[current].push(backward);
                current = 1;
            }
            halves[current].push(*entry);
        }

        let [at_a, at_b] = halves;
        let ids = [
            FaceId(self.faces.push(at_a) as u32),
            FaceId(self.faces.push(at_b) as u32),
        ];
        for id in ids {
            self.claim_entries(id);
        }
        if self.outer_face == face {
            self.outer_face = ids[1];
        }
        trace!(%face, left = %ids[1], right = %ids[0], %edge, "split face");
    }

    /// Merges the faces on both sides of `edge` into one, dropping both sides of `edge`.
    fn unite_faces(&mut self, f0: FaceId, f1: FaceId, edge: EdgeId) {
        let (face0, face1) = match (self.faces.remove(f0.index()), self.faces.remove(f1.index())) {
            (Some(x), Some(y)) => (x, y),
            _ => panic!("Faces {} and {} of edge {} must both exist", f0, f1, edge),
        };
        let (i0, i1) = match (face0.position_of_edge(edge), face1.position_of_edge(edge)) {
            (Some(x), Some(y)) => (x, y),
            _ => panic!("Edge {} is missing from the walk of one of its faces", edge),
        };

        let e0 = face0.entries();
        let e1 = face1.entries();
        let mut united = Vec::with_capacity(e0.len() + e1.len() - 2);
        united.extend_from_slice(&e0[..i0]);
        united.extend_from_slice(&e1[i1 + 1..]);
        united.extend_from_slice(&e1[..i1]);
        united.extend_from_slice(&e0[i0 + 1..]);

        let id = FaceId(self.faces.push(Face::from_entries(united)) as u32);
        self.claim_entries(id);
        if self.outer_face == f0 || self.outer_face == f1 {
            self.outer_face = id;
        }
        trace!(%f0, %f1, united = %id, %edge, "united faces");
    }

    /// Points the face slot of every edge side on the walk of `f` to `f`.
    fn claim_entries(&mut self, f: FaceId) {
        let entries: Vec<FaceEntry> = match self.faces.get(f.index()) {
            Some(face) => face.entries().to_vec(),
            None => return,
        };
        for entry in entries {
            if let Some(data) = self.edges.get_mut(entry.edge.index()) {
                data.faces[entry.side.index()] = f;
            }
        }
    }
}

/// Which stored side is on the left when walking along `endpoints` from `at`.
fn side_of_left_face(endpoints: (VertexId, VertexId), at: VertexId) -> Option<Side> {
    if endpoints.0 == at {
        Some(Side::Left)
    } else if endpoints.1 == at {
        Some(Side::Right)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::graphs::{cycle, stacked_triangles, triangle};

    fn v(i: u32) -> VertexId {
        VertexId(i)
    }

    fn e(i: u32) -> EdgeId {
        EdgeId(i)
    }

    fn assert_consistent(g: &EmbeddedGraph) {
        let defects = g.embedding_defects();
        assert!(defects.is_empty(), "embedding defects: {:?}", defects);
    }

    #[test]
    fn test_duplicate_and_unknown_vertex() {
        let mut g = EmbeddedGraph::new();
        g.add_vertex(v(0)).unwrap();
        assert_eq!(g.add_vertex(v(0)), Err(GraphError::DuplicateVertex(v(0))));
        assert_eq!(g.remove_vertex(v(3)), Err(GraphError::UnknownVertex(v(3))));
        assert_eq!(
            g.add_edge(e(0), v(0), 0, v(9), 0),
            Err(GraphError::UnknownVertex(v(9)))
        );
    }

    #[test]
    fn test_first_edge_seeds_two_sided_outer_face() {
        let mut g = EmbeddedGraph::new();
        g.add_vertex(v(0)).unwrap();
        g.add_vertex(v(1)).unwrap();
        g.add_edge(e(0), v(0), 0, v(1), 0).unwrap();

        let outer = g.outer_face();
        assert_eq!(g.faces_of(e(0)), Some((outer, outer)));
        assert_eq!(g.face(outer).unwrap().len(), 2);
        assert_eq!(g.all_faces(), vec![outer]);
        assert_consistent(&g);
    }

    #[test]
    fn test_rejected_insertions() {
        let mut g = EmbeddedGraph::new();
        for i in 0..4 {
            g.add_vertex(v(i)).unwrap();
        }
        g.add_edge(e(0), v(0), 0, v(1), 0).unwrap();

        assert!(matches!(
            g.add_edge(e(1), v(0), 2, v(2), 0),
            Err(GraphError::InvalidInsertion { .. })
        ));
        assert!(matches!(
            g.add_edge(e(1), v(1), 0, v(0), 0),
            Err(GraphError::InvalidInsertion { .. })
        ));
        assert!(matches!(
            g.add_edge(e(0), v(1), 0, v(2), 0),
            Err(GraphError::InvalidInsertion { .. })
        ));
        assert!(matches!(
            g.add_edge(e(1), v(2), 0, v(3), 0),
            Err(GraphError::InvalidInsertion { .. })
        ));
        assert!(matches!(
            g.add_edge(e(1), v(2), 0, v(2), 0),
            Err(GraphError::InvalidInsertion { .. })
        ));
        assert_eq!(g.edge_count(), 1);
        assert_consistent(&g);
    }

    #[test]
    fn test_pendant_edge_grows_face_in_place() {
        let mut g = EmbeddedGraph::new();
        for i in 0..3 {
            g.add_vertex(v(i)).unwrap();
        }
        g.add_edge(e(0), v(0), 0, v(1), 0).unwrap();
        let outer = g.outer_face();
        g.add_edge(e(1), v(1), 0, v(2), 0).unwrap();

        assert_eq!(g.outer_face(), outer);
        assert_eq!(g.face(outer).unwrap().len(), 4);
        assert_eq!(g.faces_of(e(1)), Some((outer, outer)));
        assert_eq!(g.neighbors(v(1)).collect::<Vec<_>>(), vec![v(2), v(0)]);
        assert_consistent(&g);
    }

    #[test]
    fn test_closing_a_cycle_splits_the_outer_face() {
        let g = cycle(8);
        assert_eq!(g.vertex_count(), 8);
        assert_eq!(g.edge_count(), 8);
        let faces = g.all_faces();
        assert_eq!(faces.len(), 2);
        for f in faces {
            assert_eq!(g.face(f).unwrap().len(), 8);
        }
        assert_consistent(&g);
    }

    #[test]
    fn test_inconsistent_positions_are_rejected() {
        // square 0-1-2-3 with one diagonal 0-2, then try 1-3 across it
        let mut g = cycle(4);
        let inner = g.left_face(e(0), v(0)).unwrap();
        assert_ne!(inner, g.outer_face());
        let at0 = g.face_index_at(inner, v(0)).unwrap();
        let at2 = g.face_index_at(inner, v(2)).unwrap();
        let d = g.next_edge_id();
        g.add_edge(d, v(0), at0, v(2), at2).unwrap();
        assert_consistent(&g);

        let inner_at_1 = g.left_face(e(1), v(1)).unwrap();
        let inner_at_3 = g.right_face(e(2), v(3)).unwrap();
        assert_ne!(inner_at_1, inner_at_3);
        let p1 = g.face_index_at(inner_at_1, v(1)).unwrap();
        let p3 = g.face_index_at(inner_at_3, v(3)).unwrap();
        let bad = g.next_edge_id();
        assert_eq!(
            g.add_edge(bad, v(1), p1, v(3), p3),
            Err(GraphError::InconsistentEmbedding {
                edge: bad,
                v1: v(1),
                v2: v(3)
            })
        );
        assert_consistent(&g);
    }

    #[test]
    fn test_remove_edge_unites_adjacent_inner_faces() {
        let g0 = stacked_triangles(2);
        let mut g = g0.clone();
        // the edge between the two tops' regions is 0-2 (v0 - first top)
        let shared = g.find_edge(v(0), v(2)).unwrap();
        let (l, r) = g.faces_of(shared).unwrap();
        assert_ne!(l, r);
        assert_ne!(l, g.outer_face());
        assert_ne!(r, g.outer_face());
        let expected = g.face(l).unwrap().len() + g.face(r).unwrap().len() - 2;

        g.remove_edge(shared).unwrap();
        let united = g.left_face(g.find_edge(v(0), v(1)).unwrap(), v(0)).unwrap();
        let sizes: Vec<usize> = g
            .all_faces()
            .iter()
            .map(|&f| g.face(f).unwrap().len())
            .collect();
        assert!(sizes.contains(&expected));
        assert_eq!(g.all_faces().len(), g0.all_faces().len() - 1);
        assert!(g.face(united).is_some());
        assert_consistent(&g);
    }

    #[test]
    fn test_insert_then_remove_restores_the_face() {
        let mut g = cycle(6);
        let inner = g.left_face(e(0), v(0)).unwrap();
        let before = g.face(inner).unwrap().clone();
        let outer = g.outer_face();
        let outer_before = g.face(outer).unwrap().clone();

        let p0 = g.face_index_at(inner, v(0)).unwrap();
        let p3 = g.face_index_at(inner, v(3)).unwrap();
        let d = g.next_edge_id();
        g.add_edge(d, v(0), p0, v(3), p3).unwrap();
        assert_eq!(g.all_faces().len(), 3);
        assert_consistent(&g);

        g.remove_edge(d).unwrap();
        assert_consistent(&g);
        let restored = g.left_face(e(0), v(0)).unwrap();
        assert_eq!(g.face(restored).unwrap(), &before);
        assert_eq!(g.face(g.outer_face()).unwrap(), &outer_before);
    }

    #[test]
    fn test_splitting_the_outer_face_keeps_left_half_outer() {
        let mut g = cycle(4);
        let outer = g.outer_face();
        let p0 = g.face_index_at(outer, v(0)).unwrap();
        let p2 = g.face_index_at(outer, v(2)).unwrap();
        let d = g.next_edge_id();
        g.add_edge(d, v(0), p0, v(2), p2).unwrap();
        assert_eq!(Some(g.outer_face()), g.left_face(d, v(0)));
        assert_consistent(&g);
    }

    #[test]
    fn test_remove_vertex_cascades() {
        let mut g = stacked_triangles(3);
        let edges_before = g.edge_count();
        let deg = g.degree(v(4));
        g.remove_vertex(v(4)).unwrap();
        assert!(!g.contains_vertex(v(4)));
        assert_eq!(g.edge_count(), edges_before - deg);
        assert_consistent(&g);
    }

    #[test]
    fn test_split_edge_preserves_faces() {
        let mut g = triangle();
        let (l, r) = g.faces_of(e(0)).unwrap();
        let left_len = g.face(l).unwrap().len();
        let right_len = g.face(r).unwrap().len();
        let outer_was_left = g.outer_face() == l;

        let via = g.next_vertex_id();
        let split = g.split_edge(e(0), via, e(10), e(11)).unwrap();
        assert_eq!(split.via, via);
        assert!(!g.contains_edge(e(0)));
        assert_eq!(g.vertex_kind(via), Some(VertexKind::BendPoint));
        assert_eq!(g.degree(via), 2);
        assert_eq!(g.all_faces().len(), 2);

        let (v0, _) = g.endpoints(e(10)).unwrap();
        let new_left = g.left_face(e(10), v0).unwrap();
        let new_right = g.right_face(e(10), v0).unwrap();
        assert_eq!(g.face(new_left).unwrap().len(), left_len + 1);
        assert_eq!(g.face(new_right).unwrap().len(), right_len + 1);
        assert_eq!(g.outer_face() == new_left, outer_was_left);
        assert_consistent(&g);

        let busy = v(1);
        assert_eq!(
            g.split_edge(e(10), busy, e(12), e(13)),
            Err(GraphError::NonIsolatedSplitVertex(busy))
        );
    }

    #[test]
    fn test_failed_split_leaves_graph_unchanged() {
        let mut g = triangle();
        let faces = g.all_faces().len();
        let via = g.next_vertex_id();

        // first half reuses a live edge handle
        assert!(matches!(
            g.split_edge(e(0), via, e(1), e(10)),
            Err(GraphError::InvalidInsertion { .. })
        ));
        assert!(!g.contains_vertex(via));
        assert_eq!(g.vertex_count(), 3);
        assert!(g.contains_edge(e(0)));
        assert_eq!(g.all_faces().len(), faces);
        assert_consistent(&g);

        // second half reuses a live edge handle
        assert!(g.split_edge(e(0), via, e(10), e(2)).is_err());
        assert!(!g.contains_vertex(via));
        assert!(!g.contains_edge(e(10)));
        assert_eq!(g.edge_count(), 3);
        assert_consistent(&g);

        // the same handles work once they are free
        assert!(g.split_edge(e(0), via, e(10), e(11)).is_ok());
    }

    #[test]
    fn test_rotation_queries() {
        let g = stacked_triangles(2);
        // v0 sees v1 first, then the tops in insertion order
        assert_eq!(
            g.neighbors(v(0)).collect::<Vec<_>>(),
            vec![v(1), v(2), v(3)]
        );
        assert_eq!(g.neighbor_index(v(3), v(0)), Some(2));
        assert!(g.is_direct_predecessor(v(1), v(2), v(0)));
        assert!(g.is_direct_predecessor(v(3), v(1), v(0)));
        assert!(!g.is_direct_predecessor(v(2), v(1), v(0)));
        assert_eq!(g.index_of_later_bounding_neighbor(v(1), v(2), v(0)), Some(1));
        assert_eq!(g.index_of_later_bounding_neighbor(v(1), v(3), v(0)), Some(0));
        let f = g.face_between(v(1), v(2), v(0)).unwrap();
        assert!(g.face(f).unwrap().contains_vertex(v(2)));
        assert_eq!(g.opposite(v(0), g.find_edge(v(0), v(2)).unwrap()), Some(v(2)));
    }
}
