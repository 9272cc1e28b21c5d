use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::{EmbeddedGraph, testing::graphs::{stack_into_face, triangle}};

/// Maximal planar graph on `n` vertices, built by stacking vertices into
/// randomly chosen inner faces of a triangle.
#[allow(dead_code)]
pub fn random_stacked_triangulation(n: usize, seed: usize) -> EmbeddedGraph {
    assert!(n >= 3);
    let mut rng = StdRng::seed_from_u64(seed as u64);
    let mut graph = triangle();

    for _ in 3..n {
        let inner: Vec<_> = graph
            .all_faces()
            .into_iter()
            .filter(|&f| f != graph.outer_face())
            .collect();
        let face = inner[rng.random_range(0..inner.len())];
        let entry = *graph.face(face).unwrap().first().unwrap();
        stack_into_face(&mut graph, entry.tail(), entry.head());
    }

    graph
}

/// Random stacked triangulation with some inner edges removed again, as
/// long as the graph stays biconnected.
#[allow(dead_code)]
pub fn random_biconnected_graph(n: usize, removals: usize, seed: usize) -> EmbeddedGraph {
    let mut rng = StdRng::seed_from_u64(seed as u64 ^ 0x5eed);
    let mut graph = random_stacked_triangulation(n, seed);

    for _ in 0..removals {
        let candidates: Vec<_> = graph
            .edges()
            .filter(|&e| {
                let (l, r) = graph.faces_of(e).unwrap();
                l != graph.outer_face() && r != graph.outer_face()
            })
            .collect();
        if candidates.is_empty() {
            break;
        }
        let e = candidates[rng.random_range(0..candidates.len())];
        let mut attempt = graph.clone();
        attempt.remove_edge(e).unwrap();
        if crate::testing::graphs::is_biconnected(&attempt) {
            graph = attempt;
        }
    }

    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::graphs::is_biconnected;

    #[test]
    fn test_random_triangulations() {
        for seed in 0..10 {
            let g = random_stacked_triangulation(12, seed);
            assert_eq!(g.vertex_count(), 12);
            assert_eq!(g.edge_count(), 3 * 12 - 6);
            assert!(g.embedding_defects().is_empty());
            for f in g.all_faces() {
                assert_eq!(g.face(f).unwrap().len(), 3);
            }
        }
    }

    #[test]
    fn test_random_biconnected_graphs() {
        for seed in 0..5 {
            let g = random_biconnected_graph(10, 6, seed);
            assert!(is_biconnected(&g));
            assert!(g.embedding_defects().is_empty());
            assert!(g.is_planar_embedding());
        }
    }
}
