use crate::geom::LineSegment;
use crate::math::*;
use crate::LineJoin;

#[cfg(not(feature = "std"))]
use num_traits::Float;

/// Lines this thin or thinner are never anti-aliased when axis snapping is enabled.
pub(crate) const THIN_LINE_WIDTH: f32 = 1.5;

/// Extra width given to anti-aliased segments so that the fade has room to happen
/// outside of the visible line: a diagonal pixel plus half a pixel.
const AA_MARGIN: f32 = core::f32::consts::SQRT_2 + 0.5;

/// The width of the quad actually emitted for a segment and whether the segment is snapped.
///
/// Snapped segments keep their exact width and don't get any anti-aliasing.
pub(crate) fn draw_thickness(line: &LineSegment, line_width: f32, axis_snap: bool) -> (f32, bool) {
    let snapped = axis_snap && (line.is_axis_aligned() || line_width <= THIN_LINE_WIDTH);
    if snapped {
        (line_width, true)
    } else {
        ((line_width + AA_MARGIN).ceil(), false)
    }
}

/// One widened piece of the stroke.
///
/// The corners are ordered `[start + n, start - n, end - n, end + n]` where `n` is the
/// scaled normal of `end - start`. Joins move the corners that touch the shared vertex
/// but never change this order.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct Segment {
    pub start: Point,
    pub end: Point,
    pub normal: Vector,
    pub corners: [Point; 4],
    pub draw_thickness: f32,
    pub snapped: bool,
    /// The start edge is joined to the previous segment.
    pub has_previous: bool,
    /// The join actually used at the start of this segment.
    pub join: LineJoin,
    /// Pivot (inner miter point), tip of the previous segment, tip of this segment.
    pub join_vertices: [Point; 3],
    /// Turn direction at the start of this segment.
    pub dot: f32,
}

impl Segment {
    pub fn new() -> Self {
        Segment {
            start: Point::origin(),
            end: Point::origin(),
            normal: vector(0.0, 0.0),
            corners: [Point::origin(); 4],
            draw_thickness: 0.0,
            snapped: false,
            has_previous: false,
            join: LineJoin::None,
            join_vertices: [Point::origin(); 3],
            dot: 0.0,
        }
    }

    /// Rebuilds this segment in place.
    ///
    /// Returns false and leaves the segment untouched if `start == end`.
    pub fn set(&mut self, start: Point, end: Point, line_width: f32, axis_snap: bool) -> bool {
        let line = LineSegment { from: start, to: end };
        let normal = match line.normal() {
            Some(n) => n,
            None => return false,
        };

        let (thickness, snapped) = draw_thickness(&line, line_width, axis_snap);

        self.start = start;
        self.end = end;
        self.normal = normal;
        self.corners = line.widen(thickness, normal);
        self.draw_thickness = thickness;
        self.snapped = snapped;
        self.join = LineJoin::None;
        self.dot = 0.0;

        true
    }

    #[inline]
    pub fn to_line_segment(&self) -> LineSegment {
        LineSegment {
            from: self.start,
            to: self.end,
        }
    }
}

#[cfg(test)]
fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < 0.0001
}

#[test]
fn axis_aligned_segments_keep_their_width() {
    let mut s = Segment::new();
    assert!(s.set(point(0.0, 0.0), point(10.0, 0.0), 4.0, true));
    assert!(s.snapped);
    assert_eq!(s.draw_thickness, 4.0);
    assert_eq!(s.corners[0], point(0.0, 2.0));
    assert_eq!(s.corners[1], point(0.0, -2.0));
    assert_eq!(s.corners[2], point(10.0, -2.0));
    assert_eq!(s.corners[3], point(10.0, 2.0));

    assert!(s.set(point(3.0, 7.0), point(3.0, -1.0), 3.0, true));
    assert!(s.snapped);
    assert_eq!(s.draw_thickness, 3.0);
}

#[test]
fn diagonal_segments_are_widened() {
    let mut s = Segment::new();
    assert!(s.set(point(0.0, 0.0), point(10.0, 10.0), 4.0, true));
    assert!(!s.snapped);
    // ceil(4 + 1.414 + 0.5)
    assert_eq!(s.draw_thickness, 6.0);

    for &(corner, center) in &[
        (s.corners[0], s.start),
        (s.corners[1], s.start),
        (s.corners[2], s.end),
        (s.corners[3], s.end),
    ] {
        assert!(approx_eq((corner - center).length(), 3.0));
    }
}

#[test]
fn thin_lines_are_snapped() {
    let line = LineSegment {
        from: point(0.0, 0.0),
        to: point(3.0, 5.0),
    };
    assert_eq!(draw_thickness(&line, 1.5, true), (1.5, true));
    assert_eq!(draw_thickness(&line, 1.0, true), (1.0, true));
    assert_eq!(draw_thickness(&line, 1.6, true), (4.0, false));
    // Without axis snapping everything gets the margin.
    assert_eq!(draw_thickness(&line, 1.0, false), (3.0, false));

    let horizontal = LineSegment {
        from: point(0.0, 0.0),
        to: point(3.0, 0.0),
    };
    assert_eq!(draw_thickness(&horizontal, 2.0, false), (4.0, false));
}

#[test]
fn zero_length_segment_is_rejected() {
    let mut s = Segment::new();
    assert!(s.set(point(0.0, 0.0), point(1.0, 0.0), 1.0, true));
    let before = s;
    assert!(!s.set(point(2.0, 2.0), point(2.0, 2.0), 1.0, true));
    assert_eq!(s, before);
}
