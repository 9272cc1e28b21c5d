use hashbrown::HashMap;

use crate::{
    EmbeddedGraph,
    types::{EdgeId, FaceId, Side},
};

impl EmbeddedGraph {
    /// Lists every violated consistency rule between rotations, edges and
    /// faces. An empty list means the embedding is consistent.
    pub fn embedding_defects(&self) -> Vec<String> {
        let mut defects = Vec::new();

        for v in self.vertices() {
            for &(w, e) in self.rotation(v) {
                match self.endpoints(e) {
                    None => defects.push(format!("rotation of {} lists unknown edge {}", v, e)),
                    Some((a, b)) if !((a == v && b == w) || (a == w && b == v)) => defects.push(
                        format!("rotation of {} pairs {} with {}, but it joins {} and {}", v, w, e, a, b),
                    ),
                    _ => {}
                }
                if self.rotation(v).iter().filter(|&&(_, x)| x == e).count() != 1 {
                    defects.push(format!("edge {} appears more than once around {}", e, v));
                }
            }
        }

        for e in self.edges() {
            let Some((a, b)) = self.endpoints(e) else {
                continue;
            };
            for x in [a, b] {
                if self.edge_index(e, x).is_none() {
                    defects.push(format!("edge {} is missing from the rotation of {}", e, x));
                }
            }
        }

        let mut seen: HashMap<(EdgeId, Side), FaceId> = HashMap::new();
        for f in self.faces.indices() {
            let id = FaceId(f as u32);
            let Some(face) = self.face(id) else {
                continue;
            };
            if face.is_empty() && (id != self.outer_face || self.edge_count() > 0) {
                defects.push(format!("face {} has an empty walk", id));
            }
            for (i, entry) in face.iter().enumerate() {
                let Some(data) = self.edges.get(entry.edge.index()) else {
                    defects.push(format!("face {} walks along unknown edge {}", id, entry.edge));
                    continue;
                };
                if data.endpoints != entry.endpoints {
                    defects.push(format!("face {} holds stale endpoints of {}", id, entry.edge));
                }
                if data.faces[entry.side.index()] != id {
                    defects.push(format!(
                        "side {:?} of {} is on face {} but points to {}",
                        entry.side,
                        entry.edge,
                        id,
                        data.faces[entry.side.index()]
                    ));
                }
                if let Some(other) = seen.insert((entry.edge, entry.side), id) {
                    defects.push(format!(
                        "side {:?} of {} is on faces {} and {}",
                        entry.side, entry.edge, other, id
                    ));
                }

                let next = face.entries()[(i + 1) % face.len()];
                if self.edge_index(entry.edge, entry.head()).is_some() && next != self.next_on_face(entry) {
                    defects.push(format!(
                        "face {} jumps from {} to {} at {}",
                        id,
                        entry.edge,
                        next.edge,
                        entry.head()
                    ));
                }
            }
        }

        for e in self.edges() {
            for side in [Side::Left, Side::Right] {
                if !seen.contains_key(&(e, side)) {
                    defects.push(format!("side {:?} of {} is on no face", side, e));
                }
            }
        }

        if !self.faces.contains(self.outer_face.index()) {
            defects.push(format!("outer face {} does not exist", self.outer_face));
        }

        defects
    }

    /// Euler characteristic check for connected graphs: `V - E + F = 2`.
    pub fn is_planar_embedding(&self) -> bool {
        let isolated = self.vertices().filter(|&v| self.degree(v) == 0).count();
        let v = (self.vertex_count() - isolated) as i64;
        let e = self.edge_count() as i64;
        let f = self.all_faces().len() as i64;
        e == 0 || v - e + f == 2
    }
}
