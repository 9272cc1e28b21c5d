use hashbrown::HashMap;
use petgraph::graph::{NodeIndex, UnGraph};

use crate::{
    EmbeddedGraph,
    types::{EdgeId, GridPoint, VertexId, VertexKind},
};

/// A visible vertex of the drawing with floating-point coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutNode {
    pub vertex: VertexId,
    pub kind: VertexKind,
    pub x: f64,
    pub y: f64,
}

/// Builds the drawn part of `graph` as a petgraph graph. Vertices without a
/// position are drawn at the origin. Edges are kept only if they and both of
/// their endpoints are visible.
pub(crate) fn build_layout_view<V, E>(
    graph: &EmbeddedGraph,
    coordinates: &HashMap<VertexId, GridPoint>,
    vertex_visible: V,
    edge_visible: E,
) -> UnGraph<LayoutNode, EdgeId>
where
    V: Fn(VertexId) -> bool,
    E: Fn(EdgeId) -> bool,
{
    let mut view = UnGraph::with_capacity(graph.vertex_count(), graph.edge_count());
    let mut nodes: HashMap<VertexId, NodeIndex> = HashMap::new();

    for v in graph.vertices().filter(|&v| vertex_visible(v)) {
        let (x, y) = coordinates.get(&v).copied().unwrap_or_default().to_f64();
        let node = view.add_node(LayoutNode {
            vertex: v,
            kind: graph.vertex_kind(v).unwrap_or_default(),
            x,
            y,
        });
        nodes.insert(v, node);
    }

    for e in graph.edges().filter(|&e| edge_visible(e)) {
        let Some((a, b)) = graph.endpoints(e) else {
            continue;
        };
        if let (Some(&na), Some(&nb)) = (nodes.get(&a), nodes.get(&b)) {
            view.add_edge(na, nb, e);
        }
    }

    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::graphs::triangle;

    #[test]
    fn test_hidden_elements_are_filtered() {
        let g = triangle();
        let coordinates: HashMap<_, _> = [
            (VertexId(0), GridPoint::new(0, 0)),
            (VertexId(1), GridPoint::new(2, 0)),
        ]
        .into_iter()
        .collect();

        let view = build_layout_view(&g, &coordinates, |v| v != VertexId(2), |_| true);
        assert_eq!(view.node_count(), 2);
        assert_eq!(view.edge_count(), 1);
        let right = view.node_weights().find(|n| n.vertex == VertexId(1)).unwrap();
        assert_eq!((right.x, right.y), (2.0, 0.0));
        assert_eq!(right.kind, VertexKind::Regular);

        let view = build_layout_view(&g, &coordinates, |_| true, |_| false);
        assert_eq!(view.node_count(), 3);
        assert_eq!(view.edge_count(), 0);
        let top = view.node_weights().find(|n| n.vertex == VertexId(2)).unwrap();
        assert_eq!((top.x, top.y), (0.0, 0.0));
    }
}
