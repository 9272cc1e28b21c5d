use hashbrown::HashMap;

use crate::types::{GridPoint, VertexId};

/// Outer boundary of the drawn prefix `G_k`, from the first to the second
/// vertex of the order, together with the set of vertices each contour vertex
/// drags along when it is shifted (`L(v)` in the paper).
#[derive(Clone, Debug, Default)]
pub(crate) struct Contour {
    vertices: Vec<VertexId>,
    shift_sets: HashMap<VertexId, Vec<VertexId>>,
}

impl Contour {
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.shift_sets.clear();
    }

    pub fn vertices(&self) -> &[VertexId] {
        &self.vertices
    }

    pub fn index_of(&self, v: VertexId) -> Option<usize> {
        self.vertices.iter().position(|&w| w == v)
    }

    pub fn get(&self, i: usize) -> Option<VertexId> {
        self.vertices.get(i).copied()
    }

    pub fn shift_set(&self, v: VertexId) -> &[VertexId] {
        self.shift_sets.get(&v).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Inserts one of the bootstrap vertices with `L(v) = {v}`.
    pub fn seed(&mut self, v: VertexId, at: usize) {
        self.vertices.insert(at, v);
        self.shift_sets.insert(v, vec![v]);
    }

    /// Places `v_k` above the contour interval `w_p ..= w_q`.
    ///
    /// Vertices strictly between `w_p` and `w_q` move one unit right and
    /// leave the contour, their sets join `L(v_k)`. Everything from `w_q` on
    /// moves two units right. Returns the new position of `v_k`, at the
    /// intersection of the +1 slope line through `w_p` and the -1 slope line
    /// through `w_q`.
    pub fn cover(
        &mut self,
        v_k: VertexId,
        w_p: VertexId,
        w_q: VertexId,
        coordinates: &mut HashMap<VertexId, GridPoint>,
    ) -> GridPoint {
        let mut kept = Vec::with_capacity(self.vertices.len() + 1);
        let mut covered = Vec::new();
        let mut insertion_index = 0;
        let (mut first_reached, mut last_reached) = (false, false);

        for &c in &self.vertices {
            if c == w_q {
                last_reached = true;
            }

            if last_reached {
                shift(coordinates, self.shift_set(c), 2);
                kept.push(c);
            } else if first_reached {
                shift(coordinates, self.shift_set(c), 1);
                covered.push(c);
            } else {
                insertion_index += 1;
                kept.push(c);
            }

            if c == w_p {
                first_reached = true;
            }
        }

        let mut set = Vec::new();
        for c in covered {
            if let Some(s) = self.shift_sets.remove(&c) {
                set.extend(s);
            }
        }
        set.push(v_k);

        let p = position_of(coordinates, w_p);
        let q = position_of(coordinates, w_q);
        let point = GridPoint::new((p.x - p.y + q.x + q.y) / 2, (-p.x + p.y + q.x + q.y) / 2);

        kept.insert(insertion_index, v_k);
        self.vertices = kept;
        self.shift_sets.insert(v_k, set);
        point
    }
}

fn shift(coordinates: &mut HashMap<VertexId, GridPoint>, set: &[VertexId], dx: i64) {
    for v in set {
        if let Some(p) = coordinates.get_mut(v) {
            p.x += dx;
        }
    }
}

fn position_of(coordinates: &HashMap<VertexId, GridPoint>, v: VertexId) -> GridPoint {
    match coordinates.get(&v) {
        Some(p) => *p,
        None => panic!("Contour vertex {} has no position yet", v),
    }
}
