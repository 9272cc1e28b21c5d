/// Handle of a vertex inside an [`EmbeddedGraph`](crate::EmbeddedGraph).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct VertexId(pub u32);

/// Handle of an edge inside an [`EmbeddedGraph`](crate::EmbeddedGraph).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct EdgeId(pub u32);

/// Handle of a face. Faces are created and destroyed by the graph itself,
/// so callers only ever receive these, never make them up.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct FaceId(pub(crate) u32);

impl VertexId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl EdgeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl FaceId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for VertexId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "e{}", self.0)
    }
}

impl std::fmt::Display for FaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "f{}", self.0)
    }
}

/// Side of an edge, relative to its stored quasi-direction (first endpoint
/// towards second endpoint).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn flip(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }
}

/// Enum representing the role of a vertex in a drawing.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum VertexKind {
    #[default]
    Regular,
    /// Subdivides an edge, drawn as a bend of that edge.
    BendPoint,
    /// Stands for the crossing of two edges.
    CrossingPoint,
    /// Inserted only to repair a canonical order; removed before edges are reinserted.
    ShiftVertex,
}

impl std::fmt::Display for VertexKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VertexKind::Regular => write!(f, "Regular"),
            VertexKind::BendPoint => write!(f, "BendPoint"),
            VertexKind::CrossingPoint => write!(f, "CrossingPoint"),
            VertexKind::ShiftVertex => write!(f, "ShiftVertex"),
        }
    }
}

/// A point with integer coordinates.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct GridPoint {
    pub x: i64,
    pub y: i64,
}

impl GridPoint {
    pub fn new(x: i64, y: i64) -> Self {
        GridPoint { x, y }
    }

    pub fn shifted(&self, dx: i64, dy: i64) -> GridPoint {
        GridPoint::new(self.x + dx, self.y + dy)
    }

    pub fn to_f64(&self) -> (f64, f64) {
        (self.x as f64, self.y as f64)
    }
}

impl std::fmt::Display for GridPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A pair of crossing edges that was removed from the graph, given by the
/// endpoints of both edges. The four endpoints span a quadrangle in the
/// remaining embedding.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct RemovedCrossing {
    pub first: (VertexId, VertexId),
    pub second: (VertexId, VertexId),
}

impl RemovedCrossing {
    pub fn new(first: (VertexId, VertexId), second: (VertexId, VertexId)) -> Self {
        RemovedCrossing { first, second }
    }

    pub fn edges(&self) -> [(VertexId, VertexId); 2] {
        [self.first, self.second]
    }

    /// All four corners, in the order first.0, first.1, second.0, second.1.
    pub fn corners(&self) -> [VertexId; 4] {
        [self.first.0, self.first.1, self.second.0, self.second.1]
    }

    pub fn contains(&self, v: VertexId) -> bool {
        self.corners().contains(&v)
    }
}

/// Result of splitting an edge: the two halves and the vertex between them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SplitEdge {
    pub first_half: EdgeId,
    pub via: VertexId,
    pub second_half: EdgeId,
}
