//! Draws a square whose diagonals cross, first without the crossing pair and
//! then with the crossing drawn back using a crossing point and two bends.

use planar_grid_drawing::{EmbeddedGraph, GridPoint, IncrementalPlacer, VertexId, mark_crossings, remove_crossings};

fn main() {
    // the crossing of the two diagonals is given as vertex 4
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
    let mut graph = EmbeddedGraph::from_straight_line_drawing(&points, &edges).expect("drawing is planar");
    let crossings = [VertexId(4)];
    mark_crossings(&mut graph, &crossings).expect("vertex 4 exists");
    let removed = remove_crossings(&mut graph, &crossings).expect("vertex 4 is a crossing of degree 4");
    for crossing in &removed {
        println!("removed crossing {:?}", crossing);
    }

    let mut placer = IncrementalPlacer::new(graph).with_removed_crossings(removed);
    placer.run().expect("graph is biconnected");
    println!("repairs: {:?}", placer.order().repairs());
    print_coordinates(&placer);

    let reinserted = placer.reinsert_crossings().expect("placement is done").to_vec();
    for crossing in &reinserted {
        println!(
            "{:?}: crossing point {} bends {} {}",
            crossing.case, crossing.crossing_point, crossing.bend_points[0], crossing.bend_points[1]
        );
        if crossing.on_diagonal {
            println!("  placed on the diagonal, drawing scaled by {}", crossing.scale);
        }
    }
    print_coordinates(&placer);

    let view = placer.layout_view();
    println!("layout: {} nodes, {} edges", view.node_count(), view.edge_count());
}

fn print_coordinates(placer: &IncrementalPlacer) {
    let mut vertices: Vec<VertexId> = placer.graph().vertices().collect();
    vertices.sort();
    for v in vertices {
        let kind = placer.graph().vertex_kind(v).unwrap_or_default();
        match placer.position(v) {
            Some(point) => println!("  {} ({}) at {}", v, kind, point),
            None => println!("  {} ({}) not placed", v, kind),
        }
    }
}
