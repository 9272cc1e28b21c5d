use crate::types::{EdgeId, FaceId, VertexId, VertexKind};

#[derive(Clone, Debug)]
pub(crate) struct VertexData {
    pub kind: VertexKind,
    /// Circular rotation of incident edges, together with the vertex on the other end.
    pub rotation: Vec<(VertexId, EdgeId)>,
}

impl VertexData {
    pub fn new(kind: VertexKind) -> Self {
        VertexData {
            kind,
            rotation: Vec::new(),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct EdgeData {
    /// Quasi-direction used to name the two sides, first towards second.
    pub endpoints: (VertexId, VertexId),
    /// Left face, then right face.
    pub faces: [FaceId; 2],
}

/// Slot table keyed by a dense handle. Removed slots stay empty, so a stale
/// handle never aliases a newer element.
#[derive(Clone, Debug)]
pub(crate) struct Slots<T> {
    slots: Vec<Option<T>>,
    len: usize,
}

impl<T> Default for Slots<T> {
    fn default() -> Self {
        Slots {
            slots: Vec::new(),
            len: 0,
        }
    }
}

impl<T> Slots<T> {
    pub fn len(&self) -> usize {
        self.len
    }

    /// One past the highest slot ever used.
    pub fn capacity_hint(&self) -> usize {
        self.slots.len()
    }

    pub fn get(&self, idx: usize) -> Option<&T> {
        self.slots.get(idx).and_then(|s| s.as_ref())
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut T> {
        self.slots.get_mut(idx).and_then(|s| s.as_mut())
    }

    pub fn contains(&self, idx: usize) -> bool {
        self.get(idx).is_some()
    }

    /// Returns false if the slot is occupied.
    pub fn insert(&mut self, idx: usize, val: T) -> bool {
        if idx >= self.slots.len() {
            self.slots.resize_with(idx + 1, || None);
        }
        if self.slots[idx].is_some() {
            return false;
        }
        self.slots[idx] = Some(val);
        self.len += 1;
        true
    }

    pub fn push(&mut self, val: T) -> usize {
        let idx = self.slots.len();
        self.slots.push(Some(val));
        self.len += 1;
        idx
    }

    pub fn remove(&mut self, idx: usize) -> Option<T> {
        let val = self.slots.get_mut(idx).and_then(|s| s.take());
        if val.is_some() {
            self.len -= 1;
        }
        val
    }

    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_some())
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slots_keep_handles_stable() {
        let mut slots = Slots::default();
        assert!(slots.insert(3, 'a'));
        assert!(!slots.insert(3, 'b'));
        assert_eq!(slots.push('c'), 4);
        assert_eq!(slots.len(), 2);
        assert_eq!(slots.remove(3), Some('a'));
        assert_eq!(slots.remove(3), None);
        assert_eq!(slots.indices().collect::<Vec<_>>(), vec![4]);
        assert_eq!(slots.capacity_hint(), 5);
    }
}
