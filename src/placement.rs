use hashbrown::HashMap;
use petgraph::graph::UnGraph;
use tracing::debug;

use crate::{
    EmbeddedGraph,
    canonical_order::{CanonicalOrder, CanonicalOrderer},
    error::PlacerError,
    placement_blocks::{
        contour::Contour,
        layout_view::{LayoutNode, build_layout_view},
        reinsert::{ReinsertedCrossing, reinsert_crossing, remove_shift_vertices},
    },
    types::{EdgeId, GridPoint, RemovedCrossing, VertexId},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacerState {
    Uninitialized,
    Stepping,
    Done,
}

/// Straight-line grid placement after Harel and Sardas, one vertex of the
/// canonical order per [`step`](IncrementalPlacer::step).
///
/// The placer owns the graph, since ordering may insert dummy edges, shift
/// vertices and bend points, and reinserting crossings changes it again.
/// The graph as handed over is kept aside, every
/// [`initialize`](IncrementalPlacer::initialize) starts from a fresh copy.
///
/// ```
/// use planar_grid_drawing::{EmbeddedGraph, GridPoint, IncrementalPlacer};
///
/// let points = [GridPoint::new(0, 0), GridPoint::new(4, 0), GridPoint::new(2, 3)];
/// let graph = EmbeddedGraph::from_straight_line_drawing(&points, &[(0, 1), (1, 2), (2, 0)]).unwrap();
///
/// let mut placer = IncrementalPlacer::new(graph);
/// placer.run().unwrap();
/// assert!(placer.done());
/// assert_eq!(placer.coordinates().len(), 3);
/// ```
#[derive(Clone, Debug)]
pub struct IncrementalPlacer {
    input: EmbeddedGraph,
    graph: EmbeddedGraph,
    orderer: CanonicalOrderer,
    order: CanonicalOrder,
    state: PlacerState,
    iteration: usize,
    contour: Contour,
    coordinates: HashMap<VertexId, GridPoint>,
    vertex_visible: HashMap<VertexId, bool>,
    edge_visible: HashMap<EdgeId, bool>,
    reinserted: Vec<ReinsertedCrossing>,
}

impl IncrementalPlacer {
    pub fn new(graph: EmbeddedGraph) -> Self {
        IncrementalPlacer {
            input: graph.clone(),
            graph,
            orderer: CanonicalOrderer::new(),
            order: CanonicalOrder::default(),
            state: PlacerState::Uninitialized,
            iteration: 0,
            contour: Contour::default(),
            coordinates: HashMap::new(),
            vertex_visible: HashMap::new(),
            edge_visible: HashMap::new(),
            reinserted: Vec::new(),
        }
    }

    /// Registers crossings removed from the graph before it was handed over.
    /// Takes effect on the next [`initialize`](IncrementalPlacer::initialize).
    pub fn with_removed_crossings(mut self, removed: Vec<RemovedCrossing>) -> Self {
        self.orderer = self.orderer.with_removed_crossings(removed);
        self
    }

    /// Restores the graph as handed over, computes the canonical order and
    /// resets the drawing. Every vertex and edge, including those inserted
    /// while ordering, starts invisible.
    pub fn initialize(&mut self) {
        self.graph.clone_from(&self.input);
        self.iteration = 0;
        self.contour.clear();
        self.coordinates.clear();
        self.reinserted.clear();

        self.order = self.orderer.compute(&mut self.graph);
        self.reset_visibility();
        self.state = if self.order.is_empty() {
            PlacerState::Done
        } else {
            PlacerState::Stepping
        };
        debug!(vertices = self.order.len(), "placer initialized");
    }

    fn reset_visibility(&mut self) {
        self.vertex_visible = self.graph.vertices().map(|v| (v, false)).collect();
        self.edge_visible = self.graph.edges().map(|e| (e, false)).collect();
    }

    /// Places the next vertex of the canonical order and makes it visible
    /// together with its edges to already placed vertices.
    pub fn step(&mut self) -> Result<(), PlacerError> {
        match self.state {
            PlacerState::Uninitialized => return Err(PlacerError::Uninitialized),
            PlacerState::Done => return Err(PlacerError::AlreadyDone),
            PlacerState::Stepping => {}
        }

        let k = self.iteration;
        let v_k = match self.order.get(k) {
            Some(v) => v,
            None => return Err(PlacerError::AlreadyDone),
        };

        let point = match k {
            0 => {
                self.contour.seed(v_k, 0);
                GridPoint::new(0, 0)
            }
            1 => {
                self.contour.seed(v_k, 1);
                GridPoint::new(2, 0)
            }
            2 => {
                self.contour.seed(v_k, 1);
                GridPoint::new(1, 1)
            }
            _ => {
                let (w_p, w_q) = self.outermost_earlier_neighbors(v_k, k);
                self.contour.cover(v_k, w_p, w_q, &mut self.coordinates)
            }
        };
        self.coordinates.insert(v_k, point);
        debug!(step = k, vertex = %v_k, x = point.x, y = point.y, "placed vertex");

        self.vertex_visible.insert(v_k, true);
        for &(w, e) in self.graph.rotation(v_k) {
            if self.order.position(w).is_some_and(|p| p < k) {
                self.edge_visible.insert(e, true);
            }
        }

        self.iteration += 1;
        if self.iteration >= self.order.len() {
            self.state = PlacerState::Done;
        }
        Ok(())
    }

    /// Leftmost and rightmost neighbor of `v_k` on the contour of `G_{k-1}`.
    /// A vertex with a single earlier neighbor is attached to the interval
    /// between that neighbor and its contour predecessor (left support) or
    /// successor (right support).
    fn outermost_earlier_neighbors(&self, v_k: VertexId, k: usize) -> (VertexId, VertexId) {
        let mut earlier: Vec<VertexId> = self
            .graph
            .neighbors(v_k)
            .filter(|&w| self.order.position(w).is_some_and(|p| p < k))
            .collect();
        radsort::sort_by_key(&mut earlier, |&w| self.contour.index_of(w).unwrap_or(usize::MAX));

        let (Some(&first), Some(&last)) = (earlier.first(), earlier.last()) else {
            panic!("{} has no earlier neighbor, the order is not canonical", v_k);
        };
        if earlier.len() > 1 {
            return (first, last);
        }

        let only = first;
        let Some(at_contour) = self.contour.index_of(only) else {
            panic!("Only earlier neighbor {} of {} is not on the contour", only, v_k);
        };
        let rotation = self.graph.rotation(only);
        let successor = self
            .graph
            .neighbor_index(v_k, only)
            .map(|idx| rotation[(idx + 1) % rotation.len()].0);
        let left_support =
            at_contour != 0 && successor.and_then(|s| self.order.position(s)).is_some_and(|p| p < k);

        let neighbor_at = |i: usize| match self.contour.get(i) {
            Some(w) => w,
            None => panic!("{} has no contour neighbor to lean on at {}", v_k, i),
        };
        if left_support {
            (neighbor_at(at_contour - 1), only)
        } else {
            (only, neighbor_at(at_contour + 1))
        }
    }

    /// Initializes if needed and steps until every vertex is placed.
    pub fn run(&mut self) -> Result<(), PlacerError> {
        if self.state == PlacerState::Uninitialized {
            self.initialize();
        }
        while !self.done() {
            self.step()?;
        }
        Ok(())
    }

    pub fn done(&self) -> bool {
        self.state == PlacerState::Done
    }

    pub fn state(&self) -> PlacerState {
        self.state
    }

    /// Number of vertices placed so far.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn position(&self, v: VertexId) -> Option<GridPoint> {
        self.coordinates.get(&v).copied()
    }

    pub fn coordinates(&self) -> &HashMap<VertexId, GridPoint> {
        &self.coordinates
    }

    /// Vertices of the graph the placer does not track are visible.
    pub fn is_vertex_visible(&self, v: VertexId) -> bool {
        self.graph.contains_vertex(v) && self.vertex_visible.get(&v).copied().unwrap_or(true)
    }

    pub fn is_edge_visible(&self, e: EdgeId) -> bool {
        self.graph.contains_edge(e) && self.edge_visible.get(&e).copied().unwrap_or(true)
    }

    pub fn order(&self) -> &CanonicalOrder {
        &self.order
    }

    pub fn graph(&self) -> &EmbeddedGraph {
        &self.graph
    }

    pub fn into_graph(self) -> EmbeddedGraph {
        self.graph
    }

    /// Crossings drawn back by [`reinsert_crossings`](IncrementalPlacer::reinsert_crossings).
    pub fn reinserted_crossings(&self) -> &[ReinsertedCrossing] {
        &self.reinserted
    }

    /// Removes the shift vertices and draws every registered crossing as a
    /// crossing point with two bend points. Can be called once, after the
    /// drawing is done.
    pub fn reinsert_crossings(&mut self) -> Result<&[ReinsertedCrossing], PlacerError> {
        if !self.done() {
            return Err(PlacerError::NotDone);
        }
        if !self.reinserted.is_empty() {
            return Ok(&self.reinserted);
        }

        for shift in remove_shift_vertices(&mut self.graph)? {
            self.coordinates.remove(&shift);
            self.vertex_visible.remove(&shift);
        }
        self.edge_visible.retain(|e, _| self.graph.contains_edge(*e));

        let crossings = self.orderer.removed_crossings().to_vec();
        for crossing in &crossings {
            let reinserted = reinsert_crossing(&mut self.graph, &self.order, &mut self.coordinates, crossing)?;
            for e in &reinserted.removed_edges {
                self.edge_visible.remove(e);
            }
            for &v in reinserted.bend_points.iter().chain([&reinserted.crossing_point]) {
                self.vertex_visible.insert(v, true);
            }
            for &e in &reinserted.edges {
                self.edge_visible.insert(e, true);
            }
            self.reinserted.push(reinserted);
        }
        Ok(&self.reinserted)
    }

    /// The visible part of the drawing as a petgraph graph with
    /// floating-point coordinates.
    pub fn layout_view(&self) -> UnGraph<LayoutNode, EdgeId> {
        build_layout_view(
            &self.graph,
            &self.coordinates,
            |v| self.is_vertex_visible(v),
            |e| self.is_edge_visible(e),
        )
    }
}
