//! Drawing removed crossings back into a finished placement.
//!
//! Every removed crossing `A-C` / `B-D` spans a quadrangle. After placement
//! the dummy diagonal `A-C` is replaced by a path `A, bend, crossing, C` (in
//! some order) and `B-D` by a path through the same crossing point and a
//! second bend point. The corners are named so that `A` is the earlier
//! endpoint of the diagonal that is still present and `B`, `D` follow and
//! precede `A` around `C`.

use std::cmp::Ordering;

use hashbrown::HashMap;
use tracing::debug;

use crate::{
    EmbeddedGraph,
    canonical_order::CanonicalOrder,
    canonical_order_blocks::quadrangles::is_directly_covered_by,
    error::GraphError,
    placement_blocks::geometry::{segments_conflict, strictly_inside},
    types::{EdgeId, GridPoint, RemovedCrossing, VertexId, VertexKind},
};

/// How the crossing point of a reinserted crossing was positioned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReinsertionCase {
    /// `C` was ordered after `B` and `D`. The crossing lies straight above `A`.
    LastCorner,
    /// The lower of `B` and `D` is directly covered by `C`. The crossing lies
    /// on the contour slope below `C`.
    CoveredCorner,
    /// The crossing lies straight below `C`, the dummy edge from `A` to the
    /// lower of `B` and `D` is removed.
    UncoveredCorner,
}

/// Elements created for one reinserted crossing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReinsertedCrossing {
    pub crossing: RemovedCrossing,
    pub case: ReinsertionCase,
    pub crossing_point: VertexId,
    /// Bend on the `A-C` path, then the bend on the `B-D` path.
    pub bend_points: [VertexId; 2],
    /// The three edges of the `A-C` path followed by the three of `B-D`.
    pub edges: Vec<EdgeId>,
    pub removed_edges: Vec<EdgeId>,
    /// The formula of the case did not fit and the crossing point was put
    /// on the drawn diagonal instead.
    pub on_diagonal: bool,
    /// Factor all coordinates were multiplied by to make room, 1 if none.
    pub scale: i64,
}

/// Removes every vertex of kind [`VertexKind::ShiftVertex`] together with
/// its edges. Returns the removed vertices.
pub(crate) fn remove_shift_vertices(graph: &mut EmbeddedGraph) -> Result<Vec<VertexId>, GraphError> {
    let shifts: Vec<VertexId> = graph
        .vertices()
        .filter(|&v| graph.vertex_kind(v) == Some(VertexKind::ShiftVertex))
        .collect();
    for &v in &shifts {
        graph.remove_vertex(v)?;
    }
    Ok(shifts)
}

pub(crate) fn reinsert_crossing(
    graph: &mut EmbeddedGraph,
    order: &CanonicalOrder,
    coordinates: &mut HashMap<VertexId, GridPoint>,
    crossing: &RemovedCrossing,
) -> Result<ReinsertedCrossing, GraphError> {
    let index = |v: VertexId| order.position(v);

    let (x, y) = if graph.is_neighbor(crossing.first.0, crossing.first.1) {
        crossing.first
    } else {
        crossing.second
    };
    let (va, vc) = if index(x) < index(y) { (x, y) } else { (y, x) };

    let deg_c = graph.degree(vc);
    let idx_a_at_c = neighbor_index(graph, va, vc);
    let vd = graph.rotation(vc)[(idx_a_at_c + deg_c - 1) % deg_c].0;
    let vb = graph.rotation(vc)[(idx_a_at_c + 1) % deg_c].0;
    let corners = Corners {
        a: at(coordinates, va),
        b: at(coordinates, vb),
        c: at(coordinates, vc),
        d: at(coordinates, vd),
    };

    let diagonal = match graph.find_edge(va, vc) {
        Some(e) => e,
        None => panic!("Diagonal {}-{} of {:?} is missing", va, vc, crossing),
    };
    let c_last = index(vc) > index(vb) && index(vc) > index(vd);

    // the lower of B and D decides the formula, a tie is tried both ways
    let lower_choices: &[bool] = match corners.b.y.cmp(&corners.d.y) {
        Ordering::Less => &[true],
        Ordering::Greater => &[false],
        Ordering::Equal => &[false, true],
    };
    let mut plans = Vec::with_capacity(lower_choices.len());
    for &lower_is_b in lower_choices {
        let v_lower = if lower_is_b { vb } else { vd };
        let case = if c_last {
            ReinsertionCase::LastCorner
        } else if is_directly_covered_by(graph, v_lower, vc, index) {
            ReinsertionCase::CoveredCorner
        } else {
            ReinsertionCase::UncoveredCorner
        };
        // only the dummy edge bridging a split quadrangle edge is dropped
        let bridge = match case {
            ReinsertionCase::UncoveredCorner => graph
                .find_edge(va, v_lower)
                .filter(|e| order.dummy_edges().contains(e)),
            _ => None,
        };
        plans.push(Plan {
            lower_is_b,
            case,
            bridge,
        });
    }

    let mut chosen = None;
    for plan in &plans {
        let drawing = Drawing::collect(graph, coordinates, &[Some(diagonal), plan.bridge]);
        if let Some(points) = plan.case_formula(&corners) {
            if drawing.accepts(&plan.segments(&corners, &points)) {
                chosen = Some((*plan, points, 1, false));
                break;
            }
        }
    }
    let (plan, points, scale, on_diagonal) = match chosen {
        Some(found) => found,
        None => {
            let plan = plans[0];
            let drawing = Drawing::collect(graph, coordinates, &[Some(diagonal), plan.bridge]);
            let (scale, points) = plan.on_diagonal(&corners, &drawing);
            (plan, points, scale, true)
        }
    };
    if scale > 1 {
        for p in coordinates.values_mut() {
            *p = GridPoint::new(p.x * scale, p.y * scale);
        }
    }

    let mut removed_edges = vec![diagonal];
    graph.remove_edge(diagonal)?;

    let bend_ac = graph.add_vertex_of_kind(VertexKind::BendPoint);
    let bend_bd = graph.add_vertex_of_kind(VertexKind::BendPoint);
    let cross = graph.add_vertex_of_kind(VertexKind::CrossingPoint);
    coordinates.insert(cross, points.crossing);
    coordinates.insert(bend_ac, points.bend_ac);
    coordinates.insert(bend_bd, points.bend_bd);

    let idx_a = if graph.is_neighbor(va, vb) {
        neighbor_index(graph, vb, va) + 1
    } else {
        neighbor_index(graph, vd, va)
    };
    let idx_b = neighbor_index(graph, vc, vb) + 1;
    let idx_c = neighbor_index(graph, vb, vc);
    let idx_d = neighbor_index(graph, vc, vd);

    let mut edges = Vec::with_capacity(6);
    if plan.case == ReinsertionCase::LastCorner {
        link(graph, &mut edges, va, idx_a, cross, 0)?;
        link(graph, &mut edges, cross, 1, bend_ac, 0)?;
        link(graph, &mut edges, bend_ac, 1, vc, idx_c)?;
    } else {
        link(graph, &mut edges, va, idx_a, bend_ac, 0)?;
        link(graph, &mut edges, bend_ac, 1, cross, 0)?;
        link(graph, &mut edges, cross, 1, vc, idx_c)?;
    }
    if plan.lower_is_b {
        link(graph, &mut edges, vb, idx_b, cross, 1)?;
        link(graph, &mut edges, cross, 3, bend_bd, 0)?;
        link(graph, &mut edges, bend_bd, 1, vd, idx_d)?;
    } else {
        link(graph, &mut edges, vb, idx_b, bend_bd, 0)?;
        link(graph, &mut edges, bend_bd, 1, cross, 1)?;
        link(graph, &mut edges, cross, 3, vd, idx_d)?;
    }

    if let Some(bridge) = plan.bridge {
        graph.remove_edge(bridge)?;
        removed_edges.push(bridge);
    }

    debug!(
        case = ?plan.case,
        on_diagonal,
        scale,
        a = %va,
        b = %vb,
        c = %vc,
        d = %vd,
        crossing = %cross,
        at = %points.crossing,
        "reinserted crossing"
    );
    Ok(ReinsertedCrossing {
        crossing: *crossing,
        case: plan.case,
        crossing_point: cross,
        bend_points: [bend_ac, bend_bd],
        edges,
        removed_edges,
        on_diagonal,
        scale,
    })
}

fn at(coordinates: &HashMap<VertexId, GridPoint>, v: VertexId) -> GridPoint {
    coordinates.get(&v).copied().unwrap_or_default()
}

#[derive(Clone, Copy, Debug)]
struct Corners {
    a: GridPoint,
    b: GridPoint,
    c: GridPoint,
    d: GridPoint,
}

impl Corners {
    fn scaled(&self, s: i64) -> Corners {
        let scale = |p: GridPoint| GridPoint::new(p.x * s, p.y * s);
        Corners {
            a: scale(self.a),
            b: scale(self.b),
            c: scale(self.c),
            d: scale(self.d),
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Points {
    crossing: GridPoint,
    bend_ac: GridPoint,
    bend_bd: GridPoint,
}

/// Lower corner, case and the dummy edge dropped with it.
#[derive(Clone, Copy, Debug)]
struct Plan {
    lower_is_b: bool,
    case: ReinsertionCase,
    bridge: Option<EdgeId>,
}

impl Plan {
    fn lower(&self, corners: &Corners) -> GridPoint {
        if self.lower_is_b { corners.b } else { corners.d }
    }

    /// Crossing and bend points by the formula of the case, `None` if the
    /// formula leaves the grid.
    fn case_formula(&self, corners: &Corners) -> Option<Points> {
        let Corners { a, b, c, d } = *corners;
        let l = self.lower(corners);
        let dx = if self.lower_is_b { -1 } else { 1 };
        let points = match self.case {
            ReinsertionCase::LastCorner => Points {
                crossing: GridPoint::new(a.x, l.y),
                bend_ac: GridPoint::new(a.x, l.y + 1),
                bend_bd: GridPoint::new(a.x + dx, l.y),
            },
            ReinsertionCase::CoveredCorner => {
                // intersection of the contour slopes through C and the lower corner
                let (sx, sy) = if self.lower_is_b {
                    (c.x - c.y + l.x + l.y, -c.x + c.y + l.x + l.y)
                } else {
                    (c.x + c.y + l.x - l.y, c.x + c.y - l.x + l.y)
                };
                if sx.rem_euclid(2) != 0 || sy.rem_euclid(2) != 0 {
                    return None;
                }
                let crossing = GridPoint::new(sx / 2, sy / 2);
                Points {
                    crossing,
                    bend_ac: crossing.shifted(dx, -1),
                    bend_bd: crossing.shifted(dx, 1),
                }
            }
            ReinsertionCase::UncoveredCorner => {
                let x = if self.lower_is_b {
                    c.x - (c.y - b.y)
                } else {
                    c.x + (c.y - d.y)
                };
                Points {
                    crossing: GridPoint::new(c.x, l.y),
                    bend_ac: GridPoint::new(c.x, l.y - 1),
                    bend_bd: GridPoint::new(x, l.y),
                }
            }
        };
        Some(points)
    }

    /// The six segments of both paths, wired as [`reinsert_crossing`] links them.
    fn segments(&self, corners: &Corners, p: &Points) -> [(GridPoint, GridPoint); 6] {
        let Corners { a, b, c, d } = *corners;
        let (ac0, ac1, ac2) = if self.case == ReinsertionCase::LastCorner {
            ((a, p.crossing), (p.crossing, p.bend_ac), (p.bend_ac, c))
        } else {
            ((a, p.bend_ac), (p.bend_ac, p.crossing), (p.crossing, c))
        };
        let (bd0, bd1, bd2) = if self.lower_is_b {
            ((b, p.crossing), (p.crossing, p.bend_bd), (p.bend_bd, d))
        } else {
            ((b, p.bend_bd), (p.bend_bd, p.crossing), (p.crossing, d))
        };
        [ac0, ac1, ac2, bd0, bd1, bd2]
    }

    /// Puts the crossing point on the drawn diagonal `A-C` and both bends on
    /// the straight lines of their paths. The triangles `A, B, C` and
    /// `A, C, D` are empty faces, so such points always fit once the grid is
    /// fine enough. Returns the factor the drawing has to be scaled by.
    fn on_diagonal(&self, corners: &Corners, drawing: &Drawing) -> (i64, Points) {
        for scale in 1..=MAX_SCALE {
            let q = corners.scaled(scale);
            let scaled = drawing.scaled(scale);
            let (step, steps) = lattice_step(q.a, q.c);
            let mut ts: Vec<i64> = (1..steps).collect();
            radsort::sort_by_key(&mut ts, |&t| (2 * t - steps).unsigned_abs());
            for t in ts {
                if let Some(points) = self.on_diagonal_at(&q, step, t, steps) {
                    if scaled.accepts(&self.segments(&q, &points)) {
                        return (scale, points);
                    }
                }
            }
        }
        // the midpoint construction on the finest grid
        let q = corners.scaled(MAX_SCALE);
        let (step, steps) = lattice_step(q.a, q.c);
        match self.on_diagonal_at(&q, step, steps / 2, steps) {
            Some(points) => (MAX_SCALE, points),
            None => panic!("Diagonal {} - {} has no room for a crossing", corners.a, corners.c),
        }
    }

    fn on_diagonal_at(&self, q: &Corners, step: (i64, i64), t: i64, steps: i64) -> Option<Points> {
        let along = |k: i64| q.a.shifted(k * step.0, k * step.1);
        let crossing = along(t);
        let bend_ac = if self.case == ReinsertionCase::LastCorner {
            (t + 1 < steps).then(|| along(t + 1))?
        } else {
            (t >= 2).then(|| along(t - 1))?
        };
        let (from, to) = if self.lower_is_b { (crossing, q.d) } else { (q.b, crossing) };
        let ((sx, sy), n) = lattice_step(from, to);
        let bend_bd = (n >= 2).then(|| from.shifted(sx, sy))?;
        Some(Points {
            crossing,
            bend_ac,
            bend_bd,
        })
    }
}

/// Largest factor the drawing is scaled by to make room for a crossing.
const MAX_SCALE: i64 = 4;

/// Primitive lattice step from `from` towards `to` and how many of them
/// reach `to`.
fn lattice_step(from: GridPoint, to: GridPoint) -> ((i64, i64), i64) {
    let (dx, dy) = (to.x - from.x, to.y - from.y);
    let g = gcd(dx.abs(), dy.abs()).max(1);
    ((dx / g, dy / g), g)
}

fn gcd(a: i64, b: i64) -> i64 {
    if b == 0 { a } else { gcd(b, a % b) }
}

/// The segments and points a reinserted crossing must stay clear of.
struct Drawing {
    points: Vec<GridPoint>,
    segments: Vec<(GridPoint, GridPoint)>,
}

impl Drawing {
    fn collect(graph: &EmbeddedGraph, coordinates: &HashMap<VertexId, GridPoint>, skip: &[Option<EdgeId>]) -> Self {
        let points = graph.vertices().filter_map(|v| coordinates.get(&v).copied()).collect();
        let segments = graph
            .edges()
            .filter(|e| !skip.contains(&Some(*e)))
            .filter_map(|e| graph.endpoints(e))
            .filter_map(|(u, v)| Some((coordinates.get(&u).copied()?, coordinates.get(&v).copied()?)))
            .collect();
        Drawing { points, segments }
    }

    fn scaled(&self, s: i64) -> Drawing {
        let scale = |p: GridPoint| GridPoint::new(p.x * s, p.y * s);
        Drawing {
            points: self.points.iter().map(|&p| scale(p)).collect(),
            segments: self.segments.iter().map(|&(p, q)| (scale(p), scale(q))).collect(),
        }
    }

    /// The new segments, whose first and last points are corners, keep the
    /// drawing planar and their inner points are free grid points.
    fn accepts(&self, new: &[(GridPoint, GridPoint)]) -> bool {
        let mut fresh: Vec<GridPoint> = Vec::with_capacity(3);
        for &(p, q) in new {
            for r in [p, q] {
                if !self.points.contains(&r) && !fresh.contains(&r) {
                    fresh.push(r);
                }
            }
        }
        if fresh.len() != 3 {
            return false;
        }

        let clear_of_points = new
            .iter()
            .all(|&(p, q)| !self.points.iter().any(|&r| strictly_inside(p, q, r)));
        let clear_of_segments = new
            .iter()
            .all(|&s| !self.segments.iter().any(|&t| segments_conflict(s, t)));
        let clear_of_each_other = new
            .iter()
            .enumerate()
            .all(|(i, &s)| new[i + 1..].iter().all(|&t| !segments_conflict(s, t)));
        clear_of_points && clear_of_segments && clear_of_each_other
    }
}

fn link(
    graph: &mut EmbeddedGraph,
    edges: &mut Vec<EdgeId>,
    v1: VertexId,
    pos1: usize,
    v2: VertexId,
    pos2: usize,
) -> Result<(), GraphError> {
    let e = graph.next_edge_id();
    graph.add_edge(e, v1, pos1, v2, pos2)?;
    edges.push(e);
    Ok(())
}

fn neighbor_index(graph: &EmbeddedGraph, neighbor: VertexId, at: VertexId) -> usize {
    match graph.neighbor_index(neighbor, at) {
        Some(idx) => idx,
        None => panic!("Quadrangle corners {} and {} must be adjacent", neighbor, at),
    }
}
