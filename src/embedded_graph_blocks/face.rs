use crate::types::{EdgeId, Side, VertexId};

/// One edge side on the boundary walk of a face.
///
/// The walk traverses `edge` from [`FaceEntry::tail`] to [`FaceEntry::head`]
/// with the face on its left.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FaceEntry {
    pub edge: EdgeId,
    pub side: Side,
    pub endpoints: (VertexId, VertexId),
}

impl FaceEntry {
    /// Entry for walking `edge` away from `tail`.
    pub fn leaving(edge: EdgeId, endpoints: (VertexId, VertexId), tail: VertexId) -> Self {
        let side = if endpoints.0 == tail {
            Side::Left
        } else {
            Side::Right
        };
        FaceEntry {
            edge,
            side,
            endpoints,
        }
    }

    pub fn tail(&self) -> VertexId {
        match self.side {
            Side::Left => self.endpoints.0,
            Side::Right => self.endpoints.1,
        }
    }

    pub fn head(&self) -> VertexId {
        match self.side {
            Side::Left => self.endpoints.1,
            Side::Right => self.endpoints.0,
        }
    }
}

/// Closed boundary walk of one region of the embedding.
#[derive(Clone, Debug, Default)]
pub struct Face {
    entries: Vec<FaceEntry>,
}

impl Face {
    pub fn new() -> Self {
        Face {
            entries: Vec::new(),
        }
    }

    pub fn from_entries(entries: Vec<FaceEntry>) -> Self {
        Face { entries }
    }

    /// Number of edge sides on the walk.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[FaceEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &FaceEntry> {
        self.entries.iter()
    }

    pub fn first(&self) -> Option<&FaceEntry> {
        self.entries.first()
    }

    /// Vertices of the walk in order (the tail of every entry).
    pub fn vertices(&self) -> Vec<VertexId> {
        self.entries.iter().map(|e| e.tail()).collect()
    }

    pub fn position(&self, entry: &FaceEntry) -> Option<usize> {
        self.entries.iter().position(|e| e == entry)
    }

    /// Index of the first entry on `edge`, whichever side.
    pub fn position_of_edge(&self, edge: EdgeId) -> Option<usize> {
        self.entries.iter().position(|e| e.edge == edge)
    }

    pub fn contains_edge(&self, edge: EdgeId) -> bool {
        self.position_of_edge(edge).is_some()
    }

    pub fn contains_vertex(&self, v: VertexId) -> bool {
        self.entries
            .iter()
            .any(|e| e.endpoints.0 == v || e.endpoints.1 == v)
    }

    pub(crate) fn push(&mut self, entry: FaceEntry) {
        self.entries.push(entry);
    }

    /// Returns false if `before` is not on the walk.
    pub(crate) fn insert_before(&mut self, entry: FaceEntry, before: &FaceEntry) -> bool {
        match self.position(before) {
            Some(idx) => {
                self.entries.insert(idx, entry);
                true
            }
            None => false,
        }
    }

    /// Removes every entry on `edge`.
    pub(crate) fn remove_edge(&mut self, edge: EdgeId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.edge != edge);
        before != self.entries.len()
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Two faces are equal iff one walk is a cyclic rotation of the other.
impl PartialEq for Face {
    fn eq(&self, other: &Self) -> bool {
        let n = self.entries.len();
        if n != other.entries.len() {
            return false;
        }
        if n == 0 {
            return true;
        }
        let first = &self.entries[0];
        other
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| *e == first)
            .any(|(offset, _)| (0..n).all(|i| self.entries[i] == other.entries[(offset + i) % n]))
    }
}

impl Eq for Face {}
