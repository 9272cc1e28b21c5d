//! Draws a cycle step by step and prints the grid point of every vertex as
//! it gets placed.

use planar_grid_drawing::{EmbeddedGraph, IncrementalPlacer, VertexId};

fn main() {
    let n: u32 = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(8);
    if n < 3 {
        eprintln!("A cycle needs at least 3 vertices");
        return;
    }

    let rotations: Vec<(VertexId, Vec<VertexId>)> = (0..n)
        .map(|i| (VertexId(i), vec![VertexId((i + 1) % n), VertexId((i + n - 1) % n)]))
        .collect();
    let graph = EmbeddedGraph::from_rotation_system(&rotations, None).expect("a cycle is a valid embedding");

    let mut placer = IncrementalPlacer::new(graph);
    placer.initialize();
    println!("order: {:?}", placer.order().vertices());
    while !placer.done() {
        let k = placer.iteration();
        placer.step().expect("placer is stepping");
        let v = placer.order().vertices()[k];
        let point = placer.position(v).expect("placed vertex has a position");
        println!("step {:>3}: {} at {}", k, v, point);
    }
}
