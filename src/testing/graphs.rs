use petgraph::{algo::connected_components, graph::UnGraph};

use crate::{
    EmbeddedGraph,
    types::{EdgeId, GridPoint, VertexId, VertexKind},
};

fn add_vertices(graph: &mut EmbeddedGraph, n: usize) {
    for i in 0..n {
        graph.add_vertex(VertexId(i as u32)).unwrap();
    }
}

/// Cycle `0 - 1 - ... - (n-1) - 0`. Edge `i` joins `i` and `i + 1`, the
/// closing edge `n - 1` joins `0` and `n - 1`. The outer face starts with
/// the dart `0 -> n-1`.
#[allow(dead_code)]
pub fn cycle(n: usize) -> EmbeddedGraph {
    assert!(n >= 3, "A cycle needs at least 3 vertices");
    let mut graph = EmbeddedGraph::new();
    add_vertices(&mut graph, n);
    for i in 1..n {
        let e = EdgeId(i as u32 - 1);
        graph
            .add_edge(e, VertexId(i as u32 - 1), 0, VertexId(i as u32), 0)
            .unwrap();
    }
    graph
        .add_edge(EdgeId(n as u32 - 1), VertexId(0), 0, VertexId(n as u32 - 1), 0)
        .unwrap();
    graph
}

/// Base edge `0 - 1` with `k` tops `2..k+2` stacked on top of each other,
/// every top adjacent to both base vertices. Top `2` is innermost.
#[allow(dead_code)]
pub fn stacked_triangles(k: usize) -> EmbeddedGraph {
    assert!(k >= 1, "At least one top is needed");
    let mut graph = EmbeddedGraph::new();
    add_vertices(&mut graph, k + 2);
    let (v0, v1) = (VertexId(0), VertexId(1));
    graph.add_edge(EdgeId(0), v0, 0, v1, 0).unwrap();
    for t in 2..k + 2 {
        let top = VertexId(t as u32);
        let to_base = graph.next_edge_id();
        graph.add_edge(to_base, v0, graph.degree(v0), top, 0).unwrap();
        let closing = graph.next_edge_id();
        graph.add_edge(closing, top, 1, v1, 0).unwrap();
    }
    graph
}

/// Triangle `0, 1, 2` whose inner face walks `0 -> 1 -> 2`.
#[allow(dead_code)]
pub fn triangle() -> EmbeddedGraph {
    stacked_triangles(1)
}

/// Connects a fresh vertex to all three corners of the inner triangular face
/// left of `a -> b`. Returns the new vertex.
#[allow(dead_code)]
pub fn stack_into_face(graph: &mut EmbeddedGraph, a: VertexId, b: VertexId) -> VertexId {
    let edge = graph.find_edge(a, b).unwrap();
    let face = graph.left_face(edge, a).unwrap();
    let corners = graph.face(face).unwrap().vertices();
    assert_eq!(corners.len(), 3, "Only triangular faces can be stacked into");

    let w = graph.next_vertex_id();
    graph.add_vertex(w).unwrap();
    let mut current = face;
    for (i, &corner) in corners.iter().enumerate() {
        let at_corner = graph.face_index_at(current, corner).unwrap();
        let at_w = if i == 0 {
            0
        } else {
            graph.face_index_at(current, w).unwrap()
        };
        let e = graph.next_edge_id();
        graph.add_edge(e, corner, at_corner, w, at_w).unwrap();
        // continue in the face that still holds the remaining corners
        if let Some(&next_corner) = corners.get(i + 1) {
            current = [graph.left_face(e, corner), graph.right_face(e, corner)]
                .into_iter()
                .flatten()
                .find(|&f| graph.face(f).unwrap().contains_vertex(next_corner))
                .unwrap();
        }
    }
    w
}

/// Square `0, 1, 2, 3` whose diagonals cross in vertex `4`, with vertex `5`
/// below the bottom side `0 - 1`. All kite edges around `4` are in place.
#[allow(dead_code)]
pub fn crossed_square() -> EmbeddedGraph {
    let points = [(0, 0), (4, 0), (4, 4), (0, 4), (2, 2), (2, -2)].map(|(x, y)| GridPoint::new(x, y));
    let edges = [
        (0, 1),
        (1, 2),
        (2, 3),
        (3, 0),
        (0, 5),
        (5, 1),
        (4, 0),
        (4, 1),
        (4, 2),
        (4, 3),
    ];
    let mut graph = EmbeddedGraph::from_straight_line_drawing(&points, &edges).unwrap();
    graph.set_vertex_kind(VertexId(4), VertexKind::CrossingPoint).unwrap();
    graph
}

/// A square `0, 1, 2, 3` whose diagonals cross in vertex 4, inside the
/// triangle `5, 6, 7`, triangulated. Vertex `i` of that drawing gets the
/// handle `labels[i]`. Returns the graph and the crossing vertex.
pub fn kite_in_triangle(labels: &[u32; 8]) -> (EmbeddedGraph, VertexId) {
    let points = [(0, 0), (4, 0), (4, 4), (0, 4), (2, 2), (-6, -4), (10, -4), (2, 12)];
    let edges = [
        (0, 1),
        (1, 2),
        (2, 3),
        (3, 0),
        (4, 0),
        (4, 1),
        (4, 2),
        (4, 3),
        (5, 6),
        (6, 7),
        (7, 5),
        (5, 0),
        (5, 1),
        (6, 1),
        (6, 2),
        (7, 2),
        (7, 3),
        (5, 3),
    ];
    let mut relabeled = [GridPoint::default(); 8];
    for (i, &(x, y)) in points.iter().enumerate() {
        relabeled[labels[i] as usize] = GridPoint::new(x, y);
    }
    let edges: Vec<(usize, usize)> = edges
        .iter()
        .map(|&(a, b)| (labels[a] as usize, labels[b] as usize))
        .collect();

    let mut graph = EmbeddedGraph::from_straight_line_drawing(&relabeled, &edges).unwrap();
    let crossing = VertexId(labels[4]);
    graph.set_vertex_kind(crossing, VertexKind::CrossingPoint).unwrap();
    (graph, crossing)
}

/// Projection onto a petgraph graph, for running petgraph algorithms in tests.
#[allow(dead_code)]
pub fn to_petgraph(graph: &EmbeddedGraph) -> UnGraph<VertexId, EdgeId> {
    let mut result = UnGraph::new_undirected();
    let mut nodes = hashbrown::HashMap::new();
    for v in graph.vertices() {
        nodes.insert(v, result.add_node(v));
    }
    for e in graph.edges() {
        let (a, b) = graph.endpoints(e).unwrap();
        result.add_edge(nodes[&a], nodes[&b], e);
    }
    result
}

/// Connected and stays connected after removing any single vertex.
#[allow(dead_code)]
pub fn is_biconnected(graph: &EmbeddedGraph) -> bool {
    let pg = to_petgraph(graph);
    if connected_components(&pg) != 1 {
        return false;
    }
    pg.node_indices().all(|cut| {
        let mut without = pg.clone();
        without.remove_node(cut);
        without.node_count() == 0 || connected_components(&without) == 1
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generators_are_biconnected() {
        assert!(is_biconnected(&cycle(5)));
        assert!(is_biconnected(&stacked_triangles(4)));
        assert!(is_biconnected(&triangle()));

        let mut path = cycle(4);
        path.remove_edge(EdgeId(3)).unwrap();
        assert!(!is_biconnected(&path));
    }

    #[test]
    fn test_stacking_into_a_triangle() {
        let mut g = triangle();
        let w = stack_into_face(&mut g, VertexId(0), VertexId(1));
        assert_eq!(g.degree(w), 3);
        assert_eq!(g.all_faces().len(), 4);
        for f in g.all_faces() {
            assert_eq!(g.face(f).unwrap().len(), 3);
        }
        assert!(g.embedding_defects().is_empty());
        assert!(is_biconnected(&g));
    }
}
