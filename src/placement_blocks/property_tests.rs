//! Property tests for drawing crossings back into a placement.

use proptest::prelude::*;

use crate::{
    IncrementalPlacer, VertexKind, remove_crossings,
    testing::{
        geometry::{check_distinct, check_intersections},
        graphs::kite_in_triangle,
    },
};

fn check_drawing(placer: &IncrementalPlacer) {
    assert_eq!(placer.coordinates().len(), placer.graph().vertex_count());
    check_distinct(placer.coordinates());
    check_intersections(placer.graph(), placer.coordinates());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// However the kite vertices are numbered, the reinserted crossing keeps
    /// the drawing free of crossings and of shared points.
    #[test]
    fn kite_is_drawn_back_under_any_labeling(labels in Just((0..8u32).collect::<Vec<u32>>()).prop_shuffle()) {
        let labels: [u32; 8] = labels.try_into().unwrap();
        let (mut graph, crossing) = kite_in_triangle(&labels);
        let removed = remove_crossings(&mut graph, &[crossing]).unwrap();
        let mut placer = IncrementalPlacer::new(graph).with_removed_crossings(removed);
        placer.run().unwrap();
        check_drawing(&placer);

        let reinserted = placer.reinsert_crossings().unwrap().to_vec();
        prop_assert_eq!(reinserted.len(), 1);
        let graph = placer.graph();
        prop_assert_eq!(graph.degree(reinserted[0].crossing_point), 4);
        prop_assert_eq!(graph.vertex_kind(reinserted[0].crossing_point), Some(VertexKind::CrossingPoint));
        prop_assert!(graph.vertices().all(|v| graph.vertex_kind(v) != Some(VertexKind::ShiftVertex)));
        prop_assert!(graph.embedding_defects().is_empty());
        check_drawing(&placer);
    }
}
