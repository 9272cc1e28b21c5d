//! Exact predicates on grid segments.

use crate::types::GridPoint;

/// Twice the signed area of `a, b, c`, positive for a left turn.
pub(crate) fn ccw(a: GridPoint, b: GridPoint, c: GridPoint) -> i64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn in_box(a: GridPoint, b: GridPoint, c: GridPoint) -> bool {
    c.x >= a.x.min(b.x) && c.x <= a.x.max(b.x) && c.y >= a.y.min(b.y) && c.y <= a.y.max(b.y)
}

/// `c` lies on the segment `a-b`, endpoints included.
pub(crate) fn on_segment(a: GridPoint, b: GridPoint, c: GridPoint) -> bool {
    ccw(a, b, c) == 0 && in_box(a, b, c)
}

/// `c` lies on the segment `a-b` and is none of its endpoints.
pub(crate) fn strictly_inside(a: GridPoint, b: GridPoint, c: GridPoint) -> bool {
    c != a && c != b && on_segment(a, b, c)
}

/// Closed segments `p1-p2` and `p3-p4` share at least one point.
pub(crate) fn do_segments_intersect(p1: GridPoint, p2: GridPoint, p3: GridPoint, p4: GridPoint) -> bool {
    let o1 = ccw(p1, p2, p3);
    let o2 = ccw(p1, p2, p4);
    let o3 = ccw(p3, p4, p1);
    let o4 = ccw(p3, p4, p2);

    if o1.signum() * o2.signum() < 0 && o3.signum() * o4.signum() < 0 {
        return true;
    }

    (o1 == 0 && in_box(p1, p2, p3))
        || (o2 == 0 && in_box(p1, p2, p4))
        || (o3 == 0 && in_box(p3, p4, p1))
        || (o4 == 0 && in_box(p3, p4, p2))
}

/// Two segments of a drawing conflict unless they are disjoint or only meet
/// in one common endpoint.
pub(crate) fn segments_conflict(s: (GridPoint, GridPoint), t: (GridPoint, GridPoint)) -> bool {
    let ((a, b), (c, d)) = (s, t);
    let shared = [(a, c, b, d), (a, d, b, c), (b, c, a, d), (b, d, a, c)]
        .into_iter()
        .find(|(p, q, _, _)| p == q);
    match shared {
        // collinear and leaving the common endpoint in the same direction
        Some((p, _, q, r)) => ccw(p, q, r) == 0 && (q.x - p.x) * (r.x - p.x) + (q.y - p.y) * (r.y - p.y) > 0,
        None => do_segments_intersect(a, b, c, d),
    }
}
