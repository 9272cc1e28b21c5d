//! Conversions between crossing vertices and removed crossings.
//!
//! A NIC-planar drawing is usually handed over planarized: every crossing
//! is a degree-4 vertex of kind [`VertexKind::CrossingPoint`]. Before
//! ordering, the kite around each crossing is completed and the crossing is
//! taken out again, leaving a quadrangle whose diagonals are remembered as
//! a [`RemovedCrossing`].

use tracing::debug;

use crate::{
    EmbeddedGraph,
    error::GraphError,
    types::{EdgeId, RemovedCrossing, VertexId, VertexKind},
};

/// Removes every crossing vertex and returns the two edges that crossed in
/// it: the neighbors at rotation positions 0 and 2, then 1 and 3.
///
/// Panics if a crossing vertex does not have degree 4.
pub fn remove_crossings(
    graph: &mut EmbeddedGraph,
    crossing_vertices: &[VertexId],
) -> Result<Vec<RemovedCrossing>, GraphError> {
    let mut removed = Vec::with_capacity(crossing_vertices.len());
    for &c in crossing_vertices {
        let r: Vec<VertexId> = graph.neighbors(c).collect();
        assert!(r.len() == 4, "Crossing vertex {} must have degree 4, has {}", c, r.len());
        let crossing = RemovedCrossing::new((r[0], r[2]), (r[1], r[3]));
        graph.remove_vertex(c)?;
        debug!(vertex = %c, ?crossing, "removed crossing");
        removed.push(crossing);
    }
    Ok(removed)
}

/// Surrounds every crossing vertex by the four kite edges joining its
/// rotation-consecutive neighbors. Existing edges in the right place are
/// kept, misplaced ones are subdivided by a bend point so that the kite
/// edge can be drawn next to the crossing. Kite triangles never end up as
/// the outer face.
///
/// Returns the inserted edges.
pub fn insert_empty_kites(
    graph: &mut EmbeddedGraph,
    crossing_vertices: &[VertexId],
) -> Result<Vec<EdgeId>, GraphError> {
    let mut inserted = Vec::new();
    for &c in crossing_vertices {
        let corners: Vec<VertexId> = graph.neighbors(c).collect();
        assert!(
            corners.len() == 4,
            "Crossing vertex {} must have degree 4, has {}",
            c,
            corners.len()
        );

        for i in 0..4 {
            let vi = corners[i];
            let vj = corners[(i + 1) % 4];
            if let Some(existing) = graph.find_edge(vi, vj) {
                if kite_edge_in_place(graph, c, vi, vj) {
                    continue;
                }
                let via = graph.next_vertex_id();
                let first = graph.next_edge_id();
                let second = EdgeId(first.0 + 1);
                graph.split_edge(existing, via, first, second)?;
                debug!(edge = %existing, bend = %via, "moved misplaced kite edge out of the way");
            }

            let at_i = index_of(graph, c, vi);
            let at_j = index_of(graph, c, vj) + 1;
            let dummy = graph.next_edge_id();
            graph.add_edge(dummy, vi, at_i, vj, at_j)?;
            inserted.push(dummy);

            let outer = graph.outer_face();
            if graph.face(outer).is_some_and(|f| f.contains_vertex(c)) {
                if let Some(other) = graph.right_face(dummy, vi) {
                    graph.set_outer_face(other);
                }
            }
        }
    }
    Ok(inserted)
}

/// An existing edge `vi - vj` bounds the kite triangle iff `vj` directly
/// precedes `c` around `vi` and `vi` directly follows `c` around `vj`.
fn kite_edge_in_place(graph: &EmbeddedGraph, c: VertexId, vi: VertexId, vj: VertexId) -> bool {
    let di = graph.degree(vi);
    let dj = graph.degree(vj);
    let before_c = (index_of(graph, vj, vi) + 1) % di == index_of(graph, c, vi);
    let after_c = index_of(graph, vi, vj) == (index_of(graph, c, vj) + 1) % dj;
    before_c && after_c
}

fn index_of(graph: &EmbeddedGraph, neighbor: VertexId, at: VertexId) -> usize {
    match graph.neighbor_index(neighbor, at) {
        Some(idx) => idx,
        None => panic!("{} must be adjacent to {}", neighbor, at),
    }
}

/// Marks the given vertices as crossing points.
pub fn mark_crossings(graph: &mut EmbeddedGraph, crossing_vertices: &[VertexId]) -> Result<(), GraphError> {
    for &c in crossing_vertices {
        graph.set_vertex_kind(c, VertexKind::CrossingPoint)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GridPoint;

    /// Star of four corners around a center drawn at (1, 1).
    fn star() -> EmbeddedGraph {
        let points = vec![
            GridPoint::new(0, 0),
            GridPoint::new(2, 0),
            GridPoint::new(2, 2),
            GridPoint::new(0, 2),
            GridPoint::new(1, 1),
        ];
        let edges = vec![(4, 0), (4, 1), (4, 2), (4, 3)];
        EmbeddedGraph::from_straight_line_drawing(&points, &edges).unwrap()
    }

    #[test]
    fn test_kites_around_a_star() {
        let mut g = star();
        let c = VertexId(4);
        mark_crossings(&mut g, &[c]).unwrap();
        let dummies = insert_empty_kites(&mut g, &[c]).unwrap();
        assert_eq!(dummies.len(), 4);
        assert!(g.embedding_defects().is_empty());
        assert_eq!(g.all_faces().len(), 5);

        let outer = g.face(g.outer_face()).unwrap();
        assert_eq!(outer.len(), 4);
        assert!(!outer.contains_vertex(c));
        for f in g.all_faces() {
            if f != g.outer_face() {
                assert_eq!(g.face(f).unwrap().len(), 3);
            }
        }

        // a second pass finds every kite edge in place
        assert!(insert_empty_kites(&mut g, &[c]).unwrap().is_empty());
    }

    #[test]
    fn test_removing_the_crossing_leaves_a_quadrangle() {
        let mut g = star();
        let c = VertexId(4);
        insert_empty_kites(&mut g, &[c]).unwrap();
        let rotation: Vec<VertexId> = g.neighbors(c).collect();

        let removed = remove_crossings(&mut g, &[c]).unwrap();
        assert_eq!(
            removed,
            vec![RemovedCrossing::new(
                (rotation[0], rotation[2]),
                (rotation[1], rotation[3])
            )]
        );
        assert!(!g.contains_vertex(c));
        assert!(g.embedding_defects().is_empty());
        assert_eq!(g.all_faces().len(), 2);
        for f in g.all_faces() {
            assert_eq!(g.face(f).unwrap().len(), 4);
        }
        assert!(!g.is_neighbor(VertexId(0), VertexId(2)));
    }

    #[test]
    #[should_panic]
    fn test_crossing_must_have_degree_four() {
        let mut g = star();
        let _ = remove_crossings(&mut g, &[VertexId(0)]);
    }
}
