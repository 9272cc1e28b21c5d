use hashbrown::HashMap;

use crate::{
    EmbeddedGraph, GridPoint, VertexId,
    placement_blocks::geometry::{do_segments_intersect, strictly_inside},
};

/// Panics if two edges without a common endpoint touch, or if a vertex lies
/// on an edge it does not belong to. Only edges whose endpoints both have a
/// position are considered.
pub fn check_intersections(graph: &EmbeddedGraph, coordinates: &HashMap<VertexId, GridPoint>) {
    let edges: Vec<(VertexId, VertexId)> = graph
        .edges()
        .filter_map(|e| graph.endpoints(e))
        .filter(|(a, b)| coordinates.contains_key(a) && coordinates.contains_key(b))
        .collect();

    for i in 0..edges.len() {
        for j in i + 1..edges.len() {
            let (u1, v1) = edges[i];
            let (u2, v2) = edges[j];
            if u1 == u2 || u1 == v2 || v1 == u2 || v1 == v2 {
                continue;
            }
            let (p1, p2) = (coordinates[&u1], coordinates[&v1]);
            let (p3, p4) = (coordinates[&u2], coordinates[&v2]);
            if do_segments_intersect(p1, p2, p3, p4) {
                panic!(
                    "Disjoint edges interact! {:?} {:?} at coords {} {} {} {}",
                    edges[i], edges[j], p1, p2, p3, p4
                );
            }
        }
    }

    for (&w, &pw) in coordinates.iter() {
        for &(u, v) in &edges {
            if w == u || w == v {
                continue;
            }
            let (pu, pv) = (coordinates[&u], coordinates[&v]);
            if strictly_inside(pu, pv, pw) {
                panic!("Vertex {} at {} lies on edge {}-{}", w, pw, u, v);
            }
        }
    }
}

/// Panics if two vertices share a position.
pub fn check_distinct(coordinates: &HashMap<VertexId, GridPoint>) {
    let mut seen = HashMap::new();
    for (&v, &p) in coordinates.iter() {
        if let Some(other) = seen.insert(p, v) {
            panic!("Vertices {} and {} are both placed at {}", v, other, p);
        }
    }
}
