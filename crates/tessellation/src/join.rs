use crate::geom::utils::{normalized, perpendicular};
use crate::segment::Segment;
use crate::LineJoin;

/// Below this, `d1 + d2` is considered null: the path goes back exactly the way it came.
const REVERSAL_EPSILON: f32 = 1e-6;

/// What happened at a join, mostly useful for logging and tests.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum JoinStatus {
    /// The segments are collinear, their corners already meet.
    Straight,
    /// The path turns back on itself, there is no meaningful miter.
    Reversal,
    Joined,
    /// A miter join was requested but the turn is too sharp or the segments too short.
    MiterFallback,
}

/// Joins `current` to `last` at their shared vertex.
///
/// `last.end` must be equal to `current.start`. The corners of both segments that touch the
/// shared vertex are moved so that the segments meet along the miter axis:
///
/// - with `LineJoin::Miter`, both sides are moved to the miter points,
/// - otherwise only the inner side of the turn is moved to the inner miter point, which
///   leaves a wedge on the outer side that bevel and round joins fill.
///
/// If the corners would have to move by more than a third of the shorter segment,
/// none of them is moved: a miter join becomes a bevel join and the bevel triangle pivots
/// around the shared vertex instead of the inner miter point.
///
/// The effective join, the join vertices (pivot, tip of `last`, tip of `current`) and the
/// turn direction are written on both segments.
#[cfg_attr(feature = "profiling", inline(never))]
pub(crate) fn join_segments(
    last: &mut Segment,
    current: &mut Segment,
    line_join: LineJoin,
    miter_limit: f32,
) -> JoinStatus {
    debug_assert_eq!(last.end, current.start);

    let p0 = last.start;
    let p1 = last.end;
    let p2 = current.end;

    current.join = LineJoin::None;
    current.dot = 0.0;

    let (d1, d2) = match (normalized(p2 - p1), normalized(p1 - p0)) {
        (Some(d1), Some(d2)) => (d1, d2),
        _ => return JoinStatus::Straight,
    };

    let turn_cos = d1.dot(d2);

    let sum = d1 + d2;
    if sum.square_length() < REVERSAL_EPSILON {
        return JoinStatus::Reversal;
    }
    let tangent = match normalized(sum) {
        Some(t) => t,
        None => return JoinStatus::Reversal,
    };

    let normal = current.normal;
    let dir = tangent.dot(normal);
    if dir == 0.0 {
        return JoinStatus::Straight;
    }

    let mut join = line_join;
    let mut status = JoinStatus::Joined;
    if join == LineJoin::Miter && turn_cos < -miter_limit {
        join = LineJoin::Bevel;
        status = JoinStatus::MiterFallback;
    }

    let half_thickness = last.draw_thickness.max(current.draw_thickness) * 0.5;
    let miter_axis = perpendicular(tangent);
    let miter = miter_axis * (half_thickness / miter_axis.dot(normal));

    // How far the corners move along the segments. Both ends of a segment can be moved
    // with different thicknesses, a third of the segment each keeps its quad from folding.
    let pull = miter.dot(d2).abs();
    let max_pull = (p1 - p0).length().min((p2 - p1).length()) / 3.0;
    let can_pull = pull <= max_pull;

    if !can_pull && join == LineJoin::Miter {
        join = LineJoin::Bevel;
        status = JoinStatus::MiterFallback;
    }

    let c0 = &mut last.corners;
    let c1 = &mut current.corners;

    if can_pull {
        if join == LineJoin::Miter {
            c0[2] = p1 - miter;
            c0[3] = p1 + miter;
            c1[0] = p1 + miter;
            c1[1] = p1 - miter;
        } else if dir > 0.0 {
            c0[2] = p1 - miter;
            c1[1] = p1 - miter;
        } else {
            c0[3] = p1 + miter;
            c1[0] = p1 + miter;
        }
    }

    let mut join_vertices = if dir > 0.0 {
        [c0[2], c0[3], c1[0]]
    } else {
        [c0[3], c0[2], c1[1]]
    };
    if !can_pull {
        join_vertices[0] = p1;
    }

    current.join = join;
    current.join_vertices = join_vertices;
    current.dot = dir;

    last.join = join;
    last.join_vertices = join_vertices;
    last.dot = dir;

    status
}

#[cfg(test)]
use crate::math::*;

#[cfg(test)]
fn segments(a: Point, b: Point, c: Point, width: f32) -> (Segment, Segment) {
    let mut last = Segment::new();
    let mut current = Segment::new();
    assert!(last.set(a, b, width, true));
    assert!(current.set(b, c, width, true));
    current.has_previous = true;
    (last, current)
}

#[cfg(test)]
fn assert_almost_eq(a: Point, b: Point) {
    if (a - b).square_length() > 0.00001 {
        panic!("assert almost equal: {:?} != {:?}", a, b);
    }
}

#[test]
fn right_angle_miter() {
    let (mut last, mut current) =
        segments(point(0.0, 0.0), point(10.0, 0.0), point(10.0, 10.0), 2.0);

    let status = join_segments(&mut last, &mut current, LineJoin::Miter, 0.75);

    assert_eq!(status, JoinStatus::Joined);
    assert_eq!(current.join, LineJoin::Miter);
    assert_eq!(last.join, LineJoin::Miter);
    assert!(current.dot < 0.0);

    assert_almost_eq(last.corners[3], current.corners[0]);
    assert_almost_eq(last.corners[2], current.corners[1]);
    assert_almost_eq(last.corners[3], point(9.0, 1.0));
    assert_almost_eq(last.corners[2], point(11.0, -1.0));

    // The far corners are untouched.
    assert_eq!(last.corners[0], point(0.0, 1.0));
    assert_eq!(current.corners[2], point(11.0, 10.0));
}

#[test]
fn collinear_segments() {
    let (mut last, mut current) =
        segments(point(0.0, 0.0), point(10.0, 0.0), point(20.0, 0.0), 3.0);
    let before = (last.corners, current.corners);

    let status = join_segments(&mut last, &mut current, LineJoin::Miter, 0.9);

    assert_eq!(status, JoinStatus::Straight);
    assert_eq!(current.join, LineJoin::None);
    assert_eq!((last.corners, current.corners), before);
    assert_eq!(last.corners[3], current.corners[0]);
    assert_eq!(last.corners[2], current.corners[1]);
}

#[test]
fn miter_limit_threshold() {
    // Turn cosine of the two directions is -0.74 and -0.76 respectively.
    for &(turn_cos, expected) in &[
        (-0.74, LineJoin::Miter),
        (-0.76, LineJoin::Bevel),
    ] {
        let sin = (1.0f32 - turn_cos * turn_cos).sqrt();
        let p2 = point(100.0 + turn_cos * 100.0, sin * 100.0);
        let (mut last, mut current) = segments(point(0.0, 0.0), point(100.0, 0.0), p2, 2.0);

        let status = join_segments(&mut last, &mut current, LineJoin::Miter, 0.75);

        assert_eq!(current.join, expected);
        if expected == LineJoin::Bevel {
            assert_eq!(status, JoinStatus::MiterFallback);
        } else {
            assert_eq!(status, JoinStatus::Joined);
        }
    }
}

#[test]
fn only_miter_falls_back() {
    let (mut last, mut current) = segments(point(0.0, 0.0), point(10.0, 0.0), point(1.0, 1.0), 2.0);
    let status = join_segments(&mut last, &mut current, LineJoin::Round, 0.5);
    assert_eq!(status, JoinStatus::Joined);
    assert_eq!(current.join, LineJoin::Round);
}

#[test]
fn bevel_moves_the_inner_corner_only() {
    // Turning right (clockwise with y up): the inner side is the negative side.
    let (mut last, mut current) =
        segments(point(0.0, 0.0), point(10.0, 0.0), point(10.0, -10.0), 2.0);
    let outer_last = last.corners[3];
    let outer_current = current.corners[0];

    join_segments(&mut last, &mut current, LineJoin::Bevel, 0.9);

    assert!(current.dot > 0.0);
    assert_eq!(current.join, LineJoin::Bevel);
    assert_almost_eq(last.corners[2], point(9.0, -1.0));
    assert_almost_eq(current.corners[1], point(9.0, -1.0));
    assert_eq!(last.corners[3], outer_last);
    assert_eq!(current.corners[0], outer_current);

    assert_almost_eq(current.join_vertices[0], point(9.0, -1.0));
    assert_eq!(current.join_vertices[1], point(10.0, 1.0));
    assert_eq!(current.join_vertices[2], point(11.0, 0.0));
    assert_eq!(last.join_vertices, current.join_vertices);
}

#[test]
fn bevel_turning_left() {
    let (mut last, mut current) =
        segments(point(0.0, 0.0), point(10.0, 0.0), point(10.0, 10.0), 2.0);

    join_segments(&mut last, &mut current, LineJoin::Bevel, 0.9);

    assert!(current.dot < 0.0);
    assert_almost_eq(current.join_vertices[0], point(9.0, 1.0));
    assert_eq!(current.join_vertices[1], point(10.0, -1.0));
    assert_eq!(current.join_vertices[2], point(11.0, 0.0));
}

#[test]
fn reversal() {
    let (mut last, mut current) = segments(point(0.0, 0.0), point(10.0, 0.0), point(5.0, 0.0), 2.0);
    let before = (last.corners, current.corners);

    let status = join_segments(&mut last, &mut current, LineJoin::Miter, 0.9);

    assert_eq!(status, JoinStatus::Reversal);
    assert_eq!(current.join, LineJoin::None);
    assert_eq!((last.corners, current.corners), before);
}

#[test]
fn near_reversal_keeps_the_corners() {
    let (mut last, mut current) =
        segments(point(0.0, 0.0), point(10.0, 0.0), point(0.0, 0.05), 2.0);
    let before = (last.corners, current.corners);

    let status = join_segments(&mut last, &mut current, LineJoin::Miter, 0.9);

    assert_eq!(status, JoinStatus::MiterFallback);
    assert_eq!(current.join, LineJoin::Bevel);
    assert_eq!((last.corners, current.corners), before);
    assert_eq!(current.join_vertices[0], point(10.0, 0.0));

    // The tips are the outer corners of each segment.
    let [_, tip_last, tip_current] = current.join_vertices;
    assert!((tip_last - point(10.0, 0.0)).length() <= 1.0001);
    assert!((tip_current - point(10.0, 0.0)).length() <= 2.0001);
}

#[test]
fn short_segments_limit_the_pull() {
    // A right angle normally gets a miter, but the second segment is shorter than the
    // line width.
    for &join in &[LineJoin::Miter, LineJoin::Bevel, LineJoin::Round, LineJoin::None] {
        let (mut last, mut current) =
            segments(point(0.0, 0.0), point(10.0, 0.0), point(10.0, 0.5), 2.0);
        let before = (last.corners, current.corners);

        let status = join_segments(&mut last, &mut current, join, 0.9);

        assert_eq!((last.corners, current.corners), before);
        if join == LineJoin::Miter {
            assert_eq!(status, JoinStatus::MiterFallback);
            assert_eq!(current.join, LineJoin::Bevel);
        } else {
            assert_eq!(status, JoinStatus::Joined);
            assert_eq!(current.join, join);
        }
        assert_eq!(current.join_vertices[0], point(10.0, 0.0));
    }

    // With longer segments the same turn pulls the corners.
    let (mut last, mut current) =
        segments(point(0.0, 0.0), point(10.0, 0.0), point(10.0, 4.0), 2.0);
    let status = join_segments(&mut last, &mut current, LineJoin::Miter, 0.9);
    assert_eq!(status, JoinStatus::Joined);
    assert_almost_eq(last.corners[3], point(9.0, 1.0));
}
