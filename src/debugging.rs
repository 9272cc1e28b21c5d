use dot::{Edges, GraphWalk, Labeller, Nodes};

use crate::{
    EmbeddedGraph,
    types::{EdgeId, VertexId},
};

type Node = VertexId;

#[derive(Debug, Clone)]
struct Edge {
    id: EdgeId,
    source: Node,
    target: Node,
}

struct Graph<'a> {
    graph: &'a EmbeddedGraph,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
}

impl<'a> Labeller<'a, Node, Edge> for Graph<'a> {
    fn graph_id(&self) -> dot::Id<'_> {
        dot::Id::new("G").unwrap()
    }

    fn node_id(&self, n: &Node) -> dot::Id<'_> {
        dot::Id::new(format!("N{}", n.0)).unwrap()
    }

    fn node_label(&self, n: &Node) -> dot::LabelText<'a> {
        let rotation: Vec<String> = self.graph.neighbors(*n).map(|w| w.to_string()).collect();
        dot::LabelText::label(format!(
            "{}\n{}\nrot: {}",
            n,
            self.graph.vertex_kind(*n).unwrap_or_default(),
            rotation.join(" ")
        ))
    }

    fn edge_label(&self, e: &Edge) -> dot::LabelText<'a> {
        let faces = match self.graph.faces_of(e.id) {
            Some((left, right)) => format!("L:{} R:{}", left, right),
            None => "no faces".to_string(),
        };
        dot::LabelText::label(format!("{} {}", e.id, faces))
    }
}

impl<'a> GraphWalk<'a, Node, Edge> for Graph<'a> {
    fn nodes(&self) -> Nodes<'_, Node> {
        self.nodes.iter().cloned().collect()
    }

    fn edges(&self) -> Edges<'_, Edge> {
        self.edges.as_slice().into()
    }

    fn source(&self, e: &Edge) -> Node {
        e.source
    }

    fn target(&self, e: &Edge) -> Node {
        e.target
    }
}

/// Renders the embedding in DOT format. Vertices are labelled with their
/// kind and rotation, edges with the faces on their left and right side
/// (seen from the first endpoint).
pub fn render_embedding(graph: &EmbeddedGraph) -> String {
    let walk = Graph {
        graph,
        nodes: graph.vertices().collect(),
        edges: graph
            .edges()
            .filter_map(|id| {
                graph.endpoints(id).map(|(source, target)| Edge { id, source, target })
            })
            .collect(),
    };

    let mut buffer = std::io::Cursor::new(Vec::new());
    dot::render(&walk, &mut buffer).unwrap();
    String::from_utf8(buffer.into_inner()).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::graphs::triangle;

    #[test]
    fn test_render_triangle() {
        let dot = render_embedding(&triangle());
        assert!(dot.contains("G {"));
        assert!(dot.contains("N0"));
        assert!(dot.contains("N2"));
        assert_eq!(dot.matches(" -> ").count() + dot.matches(" -- ").count(), 3);
        assert!(dot.contains("rot: "));
    }
}
