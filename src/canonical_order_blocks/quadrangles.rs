//! Repair of empty and divided quadrangles while ordering a NIC-planar
//! graph whose crossing edge pairs were removed.
//!
//! Every removed crossing leaves a quadrangle `v_k, side, opposite, side`.
//! The first of its corners to be ordered reinserts one diagonal as a dummy
//! edge. The last corner checks whether the opposite corner is covered and
//! either inserts a shift vertex or splits a quadrangle edge, so that the
//! placer later finds room for the crossing.

use hashbrown::HashMap;
use tracing::debug;

use crate::{
    EmbeddedGraph,
    canonical_order_blocks::bookkeeping::Bookkeeping,
    types::{EdgeId, FaceId, RemovedCrossing, SplitEdge, VertexId, VertexKind},
};

/// Which repairs fired while ordering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RepairCases {
    /// An empty quadrangle was divided by a dummy diagonal.
    pub quadrangle_divided: bool,
    /// The opposite corner was covered, a shift vertex was inserted.
    pub shift_vertex_inserted: bool,
    /// The opposite corner was not covered, a quadrangle edge was split.
    pub edge_split: bool,
    /// The last corner found the quadrangle already drawable.
    pub already_consistent: bool,
}

impl RepairCases {
    /// All three cases a last corner can run into appeared. Meant for cases
    /// merged over many runs with `|=`.
    pub fn all_last_corner_cases(&self) -> bool {
        self.shift_vertex_inserted && self.edge_split && self.already_consistent
    }
}

impl std::ops::BitOrAssign for RepairCases {
    fn bitor_assign(&mut self, other: RepairCases) {
        self.quadrangle_divided |= other.quadrangle_divided;
        self.shift_vertex_inserted |= other.shift_vertex_inserted;
        self.edge_split |= other.edge_split;
        self.already_consistent |= other.already_consistent;
    }
}

/// `covered` is directly covered by its neighbor `covering` if it was ordered
/// earlier and both of its rotation neighbors at `covering` were ordered
/// before `covering`.
///
/// `position` maps a vertex to its index in the order, `None` if unordered.
pub fn is_directly_covered_by<P>(graph: &EmbeddedGraph, covered: VertexId, covering: VertexId, position: P) -> bool
where
    P: Fn(VertexId) -> Option<usize>,
{
    assert!(
        graph.is_neighbor(covered, covering),
        "{} and {} must be adjacent",
        covered,
        covering
    );
    let at_covering = position(covering).unwrap_or(usize::MAX);
    let at_covered = position(covered).unwrap_or(usize::MAX);
    if at_covered >= at_covering {
        return false;
    }

    let rotation = graph.rotation(covering);
    let deg = rotation.len();
    let Some(idx) = graph.neighbor_index(covered, covering) else {
        return false;
    };
    let before = rotation[(idx + deg - 1) % deg].0;
    let after = rotation[(idx + 1) % deg].0;
    [before, after]
        .iter()
        .all(|&w| position(w).is_some_and(|p| p < at_covering))
}

/// Shape of one quadrangle as seen from the vertex just ordered.
struct QuadrangleView {
    is_first: bool,
    is_last: bool,
    opposite: VertexId,
    sides: (VertexId, VertexId),
    lowest_index: usize,
}

impl QuadrangleView {
    fn new(book: &Bookkeeping, crossing: &RemovedCrossing, v_k: VertexId, k: usize) -> Self {
        let mut view = QuadrangleView {
            is_first: true,
            is_last: true,
            opposite: v_k,
            sides: (v_k, v_k),
            lowest_index: k - 1,
        };
        for (a, b) in crossing.edges() {
            for v in [a, b] {
                if v == v_k {
                    continue;
                }
                if book.is_placed(v) {
                    view.is_first = false;
                    if let Some(p) = book.position(v) {
                        view.lowest_index = view.lowest_index.min(p);
                    }
                } else {
                    view.is_last = false;
                }
                if a == v_k || b == v_k {
                    view.opposite = v;
                } else {
                    view.sides = (a, b);
                }
            }
        }
        view
    }
}

/// Repair state carried through one ordering run.
#[derive(Debug, Default)]
pub(crate) struct QuadrangleRepair {
    by_vertex: HashMap<VertexId, Vec<RemovedCrossing>>,
    pub split_edges: HashMap<EdgeId, SplitEdge>,
    pub dummy_edges: Vec<EdgeId>,
    pub inserted_vertices: Vec<VertexId>,
    pub cases: RepairCases,
}

impl QuadrangleRepair {
    pub fn new(removed: &[RemovedCrossing]) -> Self {
        let mut by_vertex: HashMap<VertexId, Vec<RemovedCrossing>> = HashMap::new();
        for crossing in removed {
            for v in crossing.corners() {
                by_vertex.entry(v).or_default().push(*crossing);
            }
        }
        QuadrangleRepair {
            by_vertex,
            ..Default::default()
        }
    }

    /// Handles every quadrangle at `v_k`, the `k`-th vertex (1-based) of
    /// the order. Returns the possibly advanced `k`.
    pub fn handle(&mut self, graph: &mut EmbeddedGraph, book: &mut Bookkeeping, mut k: usize, v_k: VertexId) -> usize {
        let Some(quadrangles) = self.by_vertex.get(&v_k).cloned() else {
            return k;
        };

        for crossing in quadrangles {
            let view = QuadrangleView::new(book, &crossing, v_k, k);
            let opposite = view.opposite;

            if view.is_first {
                self.divide_empty_quadrangle(graph, book, &crossing, v_k, opposite);
            }

            if !view.is_last {
                continue;
            }
            let opposite_index = book.position(opposite).unwrap_or(usize::MAX);
            if view.lowest_index < opposite_index {
                let (s0, s1) = view.sides;
                let position = |v| book.position(v);
                let covered = is_directly_covered_by(graph, opposite, s0, position)
                    || is_directly_covered_by(graph, opposite, s1, position);
                if covered {
                    self.insert_shift_vertex(graph, book, v_k, view.sides);
                } else {
                    self.split_quadrangle_edge(graph, book, v_k, opposite, view.sides);
                }
                k += 1;
            } else {
                debug!(vertex = %v_k, %opposite, "quadrangle already drawable");
                self.cases.already_consistent = true;
            }
        }
        k
    }

    /// Inserts the diagonal `v_k - opposite` through the empty quadrangle face.
    fn divide_empty_quadrangle(
        &mut self,
        graph: &mut EmbeddedGraph,
        book: &mut Bookkeeping,
        crossing: &RemovedCrossing,
        v_k: VertexId,
        opposite: VertexId,
    ) {
        let face = match empty_quadrangle_face(graph, crossing) {
            Some(face) => face,
            None => panic!("Quadrangle of {:?} is not an empty inner face", crossing),
        };
        let at_v_k = face_position(graph, face, v_k);
        let at_opposite = face_position(graph, face, opposite);
        let dummy = graph.next_edge_id();
        if let Err(err) = graph.add_edge(dummy, v_k, at_v_k, opposite, at_opposite) {
            panic!("Dummy diagonal of {:?} cannot be inserted: {}", crossing, err);
        }

        book.a.remove(&face);
        if let Some((left, right)) = graph.faces_of(dummy) {
            book.a.insert(left, 0);
            book.a.insert(right, 0);
        }
        *book.n.entry(opposite).or_insert(0) += 1;

        debug!(vertex = %v_k, %opposite, edge = %dummy, "divided empty quadrangle");
        self.dummy_edges.push(dummy);
        self.cases.quadrangle_divided = true;
    }

    /// Puts a degree-2 shift vertex between the two side corners, inside the
    /// face left of `v_k -> left side`, and orders it right before `v_k`.
    fn insert_shift_vertex(
        &mut self,
        graph: &mut EmbeddedGraph,
        book: &mut Bookkeeping,
        v_k: VertexId,
        (s0, s1): (VertexId, VertexId),
    ) {
        let (left, right) = if graph.is_direct_predecessor(s0, s1, v_k) {
            (s0, s1)
        } else {
            (s1, s0)
        };
        let to_left = edge_between(graph, v_k, left);
        let face_for_insertion = graph.left_face(to_left, v_k);

        let shift = graph.add_vertex_of_kind(VertexKind::ShiftVertex);
        let at_left = rotation_position(graph, v_k, left);
        let to_shift_left = graph.next_edge_id();
        if let Err(err) = graph.add_edge(to_shift_left, shift, 0, left, at_left) {
            panic!("Shift vertex cannot be attached to {}: {}", left, err);
        }
        let at_right = rotation_position(graph, v_k, right) + 1;
        let to_shift_right = graph.next_edge_id();
        if let Err(err) = graph.add_edge(to_shift_right, shift, 0, right, at_right) {
            panic!("Shift vertex cannot be attached to {}: {}", right, err);
        }

        if let Some(face) = face_for_insertion {
            book.a.remove(&face);
        }
        if let Some(triangle) = graph.right_face(to_shift_left, left) {
            book.a.insert(triangle, 3);
        }
        if let Some(quadrangle) = graph.left_face(to_shift_left, left) {
            book.a.insert(quadrangle, 4);
        }
        book.n.insert(shift, 2);

        let at = book.position(v_k).unwrap_or(book.order.len());
        book.order.insert(at, shift);
        book.mark_placed(shift);

        debug!(vertex = %v_k, %shift, %left, %right, "inserted shift vertex");
        self.dummy_edges.extend([to_shift_left, to_shift_right]);
        self.inserted_vertices.push(shift);
        self.cases.shift_vertex_inserted = true;
    }

    /// Splits the edge from the lower ordered side corner to `opposite` by a
    /// bend point ordered right before `opposite`, then bridges the bend by a
    /// dummy edge.
    fn split_quadrangle_edge(
        &mut self,
        graph: &mut EmbeddedGraph,
        book: &mut Bookkeeping,
        v_k: VertexId,
        opposite: VertexId,
        (s0, s1): (VertexId, VertexId),
    ) {
        let position = |v| book.position(v).unwrap_or(usize::MAX);
        let (lowest, second) = if position(s0) < position(s1) {
            (s0, s1)
        } else {
            (s1, s0)
        };

        let edge = edge_between(graph, lowest, opposite);
        let old_left = graph.left_face(edge, lowest);
        let old_right = graph.right_face(edge, lowest);
        let a_left = old_left.and_then(|f| book.a.remove(&f)).unwrap_or(0);
        let a_right = old_right.and_then(|f| book.a.remove(&f)).unwrap_or(0);

        let bend = graph.next_vertex_id();
        let first_half = graph.next_edge_id();
        let second_half = EdgeId(first_half.0 + 1);
        let split = match graph.split_edge(edge, bend, first_half, second_half) {
            Ok(split) => split,
            Err(err) => panic!("Quadrangle edge {} cannot be split: {}", edge, err),
        };
        self.split_edges.insert(edge, split);

        let at_lowest = match graph.endpoints(first_half) {
            Some((a, b)) if a == lowest || b == lowest => first_half,
            _ => second_half,
        };
        if let Some(f) = graph.left_face(at_lowest, lowest) {
            book.a.insert(f, a_left + 1);
        }
        if let Some(f) = graph.right_face(at_lowest, lowest) {
            book.a.insert(f, a_right + 1);
        }
        book.n.insert(bend, 2);
        let at = book.position(opposite).unwrap_or(book.order.len());
        book.order.insert(at, bend);
        book.mark_placed(bend);

        let stale = graph.face_between(second, bend, lowest);
        let at_lowest = later_bounding(graph, second, bend, lowest);
        let at_opposite = later_bounding(graph, second, bend, opposite);
        let dummy = graph.next_edge_id();
        if let Err(err) = graph.add_edge(dummy, lowest, at_lowest, opposite, at_opposite) {
            panic!("Edge split at {} cannot be bridged: {}", bend, err);
        }
        if let Some(face) = stale {
            book.a.remove(&face);
        }
        if let Some((left, right)) = graph.faces_of(dummy) {
            book.a.insert(left, 3);
            book.a.insert(right, 3);
        }

        debug!(vertex = %v_k, %edge, %bend, %lowest, %opposite, "split quadrangle edge");
        self.dummy_edges.push(dummy);
        self.inserted_vertices.push(bend);
        self.cases.edge_split = true;
    }
}

/// The inner face of size 4 bounded by all four sides of the quadrangle.
fn empty_quadrangle_face(graph: &EmbeddedGraph, crossing: &RemovedCrossing) -> Option<FaceId> {
    let (f0, f1) = crossing.first;
    let (s0, s1) = crossing.second;
    let cycle = [s1, f0, s0, f1, s1];

    let mut occurrences: Vec<(FaceId, usize)> = Vec::new();
    for pair in cycle.windows(2) {
        let edge = graph.find_edge(pair[0], pair[1])?;
        let (left, right) = graph.faces_of(edge)?;
        for face in [left, right] {
            match occurrences.iter_mut().find(|(f, _)| *f == face) {
                Some((_, count)) => *count += 1,
                None => occurrences.push((face, 1)),
            }
        }
    }

    occurrences
        .into_iter()
        .find(|&(face, count)| {
            count == 4 && face != graph.outer_face() && graph.face(face).is_some_and(|f| f.len() == 4)
        })
        .map(|(face, _)| face)
}

fn edge_between(graph: &EmbeddedGraph, a: VertexId, b: VertexId) -> EdgeId {
    match graph.find_edge(a, b) {
        Some(e) => e,
        None => panic!("Quadrangle corners {} and {} must be adjacent", a, b),
    }
}

fn face_position(graph: &EmbeddedGraph, face: FaceId, at: VertexId) -> usize {
    match graph.face_index_at(face, at) {
        Some(idx) => idx,
        None => panic!("{} does not lie on face {}", at, face),
    }
}

fn rotation_position(graph: &EmbeddedGraph, neighbor: VertexId, at: VertexId) -> usize {
    match graph.neighbor_index(neighbor, at) {
        Some(idx) => idx,
        None => panic!("{} must be adjacent to {}", neighbor, at),
    }
}

fn later_bounding(graph: &EmbeddedGraph, n0: VertexId, n1: VertexId, at: VertexId) -> usize {
    match graph.index_of_later_bounding_neighbor(n0, n1, at) {
        Some(idx) => idx,
        None => panic!("{} and {} are not consecutive around {}", n0, n1, at),
    }
}
