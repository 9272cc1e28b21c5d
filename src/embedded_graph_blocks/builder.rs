use std::cmp::Ordering;

use fixedbitset::FixedBitSet;
use hashbrown::HashMap;

use crate::{
    EmbeddedGraph,
    embedded_graph_blocks::{
        face::{Face, FaceEntry},
        structures::EdgeData,
    },
    error::GraphError,
    types::{EdgeId, FaceId, GridPoint, VertexId},
};

impl EmbeddedGraph {
    /// Builds a graph from a rotation system: for every vertex the list of
    /// its neighbors in rotation order. Faces are traced from the rotations.
    ///
    /// Edges get handles in order of first appearance. The face left of
    /// `outer_dart` becomes the outer face and its walk starts with that dart;
    /// without one the face left of the first listed dart is used.
    pub fn from_rotation_system(
        rotations: &[(VertexId, Vec<VertexId>)],
        outer_dart: Option<(VertexId, VertexId)>,
    ) -> Result<EmbeddedGraph, GraphError> {
        let mut graph = EmbeddedGraph::new();
        for (v, _) in rotations {
            graph.add_vertex(*v)?;
        }

        let mut pending: HashMap<(VertexId, VertexId), EdgeId> = HashMap::new();
        let mut next_edge = 0u32;
        for (v, neighbors) in rotations {
            for &w in neighbors {
                if !graph.contains_vertex(w) {
                    return Err(GraphError::UnknownVertex(w));
                }
                let edge = match pending.remove(&(w, *v)) {
                    Some(edge) => edge,
                    None => {
                        let edge = EdgeId(next_edge);
                        next_edge += 1;
                        if w == *v || pending.insert((*v, w), edge).is_some() {
                            return Err(GraphError::InvalidInsertion {
                                edge,
                                v1: *v,
                                v2: w,
                                reason: "self-loops and parallel edges are not supported",
                            });
                        }
                        graph.edges.insert(
                            edge.index(),
                            EdgeData {
                                endpoints: (*v, w),
                                faces: [graph.outer_face; 2],
                            },
                        );
                        edge
                    }
                };
                if let Some(data) = graph.vertices.get_mut(v.index()) {
                    data.rotation.push((w, edge));
                }
            }
        }
        if let Some((&(v1, v2), &edge)) = pending.iter().next() {
            return Err(GraphError::InvalidInsertion {
                edge,
                v1,
                v2,
                reason: "rotation system is not symmetric",
            });
        }

        let start = match outer_dart {
            Some((a, b)) => {
                let edge = graph.find_edge(a, b).ok_or(GraphError::UnknownVertex(b))?;
                Some((a, edge))
            }
            None => rotations
                .iter()
                .find_map(|(v, _)| graph.rotation(*v).first().map(|&(_, e)| (*v, e))),
        };
        if let Some(start) = start {
            graph.trace_faces(start);
        }
        Ok(graph)
    }

    /// Builds a graph from a straight-line drawing. Vertex `i` sits at
    /// `points[i]`, edge `i` joins `edges[i]`. Rotations are sorted
    /// counter-clockwise by angle; the outer face is found at the lowest,
    /// then leftmost, vertex.
    pub fn from_straight_line_drawing(
        points: &[GridPoint],
        edges: &[(usize, usize)],
    ) -> Result<EmbeddedGraph, GraphError> {
        let mut neighbors = vec![Vec::new(); points.len()];
        for &(a, b) in edges {
            for x in [a, b] {
                if x >= points.len() {
                    return Err(GraphError::UnknownVertex(VertexId(x as u32)));
                }
            }
            neighbors[a].push(b);
            neighbors[b].push(a);
        }
        for (v, list) in neighbors.iter_mut().enumerate() {
            let origin = points[v];
            list.sort_by(|&p, &q| by_angle(&origin, &points[p], &points[q]));
        }

        let rotations: Vec<(VertexId, Vec<VertexId>)> = neighbors
            .iter()
            .enumerate()
            .map(|(v, list)| {
                (
                    VertexId(v as u32),
                    list.iter().map(|&w| VertexId(w as u32)).collect(),
                )
            })
            .collect();

        let lowest = (0..points.len())
            .filter(|&v| !neighbors[v].is_empty())
            .min_by_key(|&v| (points[v].y, points[v].x));
        let outer_dart = lowest.and_then(|v| {
            neighbors[v]
                .last()
                .map(|&w| (VertexId(v as u32), VertexId(w as u32)))
        });

        let mut graph = Self::from_rotation_system(&rotations, outer_dart)?;
        // keep edge handles aligned with the input order
        graph.renumber_edges(edges);
        Ok(graph)
    }

    /// Replaces every face by walks traced from the rotations, starting with
    /// the face left of `start` which becomes the outer face.
    fn trace_faces(&mut self, start: (VertexId, EdgeId)) {
        let darts = 2 * self.edges.capacity_hint();
        let mut visited = FixedBitSet::with_capacity(darts);
        self.faces = Default::default();

        let mut starts = vec![start];
        for v in self.vertices.indices() {
            let v = VertexId(v as u32);
            starts.extend(self.rotation(v).iter().map(|&(_, e)| (v, e)));
        }

        let mut first = true;
        for (tail, edge) in starts {
            let Some(endpoints) = self.endpoints(edge) else {
                continue;
            };
            let dart = FaceEntry::leaving(edge, endpoints, tail);
            if visited.contains(dart_index(&dart)) {
                continue;
            }
            let mut walk = Vec::new();
            let mut current = dart;
            while !visited.put(dart_index(&current)) {
                walk.push(current);
                current = self.next_on_face(&current);
            }
            let id = FaceId(self.faces.push(Face::from_entries(walk)) as u32);
            if first {
                self.outer_face = id;
                first = false;
            }
            let entries = self.faces.get(id.index()).map(|f| f.entries().to_vec());
            for entry in entries.unwrap_or_default() {
                if let Some(data) = self.edges.get_mut(entry.edge.index()) {
                    data.faces[entry.side.index()] = id;
                }
            }
        }
        if first {
            let id = self.faces.push(Face::new());
            self.outer_face = FaceId(id as u32);
        }
    }

    /// The entry following `entry` on its face: leave the head through the
    /// edge preceding `entry.edge` in the head's rotation.
    pub(crate) fn next_on_face(&self, entry: &FaceEntry) -> FaceEntry {
        let head = entry.head();
        let rotation = self.rotation(head);
        let idx = self.edge_index(entry.edge, head).unwrap_or(0);
        let (_, prev) = rotation[(idx + rotation.len() - 1) % rotation.len()];
        let endpoints = self.endpoints(prev).unwrap_or(entry.endpoints);
        FaceEntry::leaving(prev, endpoints, head)
    }

    /// Relabels edges so that the edge joining `order[i]` gets handle `i`.
    fn renumber_edges(&mut self, order: &[(usize, usize)]) {
        let mut mapping = HashMap::new();
        for (i, &(a, b)) in order.iter().enumerate() {
            if let Some(old) = self.find_edge(VertexId(a as u32), VertexId(b as u32)) {
                mapping.insert(old, EdgeId(i as u32));
            }
        }
        let relabel = |e: EdgeId| mapping.get(&e).copied().unwrap_or(e);

        let mut edges = crate::embedded_graph_blocks::structures::Slots::default();
        for old in self.edges.indices().collect::<Vec<_>>() {
            if let Some(mut data) = self.edges.remove(old) {
                let new = relabel(EdgeId(old as u32));
                let (a, b) = data.endpoints;
                if (a.index(), b.index()) != order[new.index()] {
                    data.endpoints = (b, a);
                    data.faces.swap(0, 1);
                }
                edges.insert(new.index(), data);
            }
        }
        self.edges = edges;

        for v in self.vertices.indices().collect::<Vec<_>>() {
            if let Some(data) = self.vertices.get_mut(v) {
                for entry in data.rotation.iter_mut() {
                    entry.1 = relabel(entry.1);
                }
            }
        }
        for f in self.faces.indices().collect::<Vec<_>>() {
            let Some(face) = self.faces.get(f) else {
                continue;
            };
            let entries = face
                .iter()
                .map(|entry| {
                    let edge = relabel(entry.edge);
                    let endpoints = self.endpoints(edge).unwrap_or(entry.endpoints);
                    FaceEntry::leaving(edge, endpoints, entry.tail())
                })
                .collect();
            self.faces.remove(f);
            self.faces.insert(f, Face::from_entries(entries));
        }
    }
}

fn dart_index(entry: &FaceEntry) -> usize {
    2 * entry.edge.index() + entry.side.index()
}

/// Upper half-plane, including the positive x-axis, comes first.
fn half(p: &GridPoint) -> bool {
    p.y < 0 || (p.y == 0 && p.x < 0)
}

/// Counter-clockwise angular order around `origin`, starting at the positive x-axis.
fn by_angle(origin: &GridPoint, p: &GridPoint, q: &GridPoint) -> Ordering {
    let a = GridPoint::new(p.x - origin.x, p.y - origin.y);
    let b = GridPoint::new(q.x - origin.x, q.y - origin.y);
    half(&a)
        .cmp(&half(&b))
        .then_with(|| 0.cmp(&(a.x * b.y - a.y * b.x)))
}
