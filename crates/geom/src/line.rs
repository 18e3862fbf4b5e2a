use crate::math::{point, Point, Vector};
use crate::utils::{normalized, perpendicular};

/// Computes the unit normal of the line going from `start` to `end`.
///
/// The normal is `(-dy, dx)` of the normalized direction, which points to the
/// left of the line in a y-up coordinate system.
///
/// Returns `None` if `start == end`, since the direction (and therefore the normal)
/// is undefined. Callers are expected to skip zero-length segments.
#[inline]
pub fn compute_normal(start: Point, end: Point) -> Option<Vector> {
    normalized(end - start).map(perpendicular)
}

/// A linear segment.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct LineSegment {
    pub from: Point,
    pub to: Point,
}

impl LineSegment {
    /// Sample the segment at t (expecting t between 0 and 1).
    #[inline]
    pub fn sample(&self, t: f32) -> Point {
        self.from.lerp(self.to, t)
    }

    #[inline]
    pub fn to_vector(&self) -> Vector {
        self.to - self.from
    }

    #[inline]
    pub fn square_length(&self) -> f32 {
        self.to_vector().square_length()
    }

    #[inline]
    pub fn is_zero_length(&self) -> bool {
        self.from == self.to
    }

    /// Returns true if the segment is exactly horizontal or vertical.
    ///
    /// A zero-length segment is considered axis-aligned.
    #[inline]
    pub fn is_axis_aligned(&self) -> bool {
        self.from.x == self.to.x || self.from.y == self.to.y
    }

    /// Returns an inverted version of this segment where the beginning and the end
    /// points are swapped.
    #[inline]
    pub fn flip(&self) -> Self {
        LineSegment {
            from: self.to,
            to: self.from,
        }
    }

    /// The unit normal of this segment, see [`compute_normal`].
    #[inline]
    pub fn normal(&self) -> Option<Vector> {
        compute_normal(self.from, self.to)
    }

    /// Computes the four corners of the quad obtained by offsetting both endpoints
    /// by `normal * width / 2` in both directions.
    ///
    /// The corners are ordered `[from + offset, from - offset, to - offset, to + offset]`.
    /// This is a pure function of its inputs, the normal is not recomputed so that
    /// callers can share a normal between operations.
    #[inline]
    pub fn widen(&self, width: f32, normal: Vector) -> [Point; 4] {
        let offset = normal * (width * 0.5);
        [
            self.from + offset,
            self.from - offset,
            self.to - offset,
            self.to + offset,
        ]
    }

    /// Returns the center of the segment.
    #[inline]
    pub fn mid_point(&self) -> Point {
        point(
            (self.from.x + self.to.x) * 0.5,
            (self.from.y + self.to.y) * 0.5,
        )
    }
}

#[cfg(test)]
use crate::math::vector;

#[cfg(test)]
fn assert_almost_eq(a: Point, b: Point) {
    if (a - b).square_length() > 0.00001 {
        panic!("assert almost equal: {:?} != {:?}", a, b);
    }
}

#[test]
fn normal_of_horizontal_and_vertical_lines() {
    assert_eq!(
        compute_normal(point(0.0, 0.0), point(10.0, 0.0)),
        Some(vector(0.0, 1.0))
    );
    assert_eq!(
        compute_normal(point(10.0, 0.0), point(10.0, 10.0)),
        Some(vector(-1.0, 0.0))
    );
    assert_eq!(
        compute_normal(point(5.0, 5.0), point(-5.0, 5.0)),
        Some(vector(0.0, -1.0))
    );
}

#[test]
fn normal_of_zero_length_segment() {
    assert_eq!(compute_normal(point(3.0, 4.0), point(3.0, 4.0)), None);

    let segment = LineSegment {
        from: point(1.0, 1.0),
        to: point(1.0, 1.0),
    };
    assert!(segment.is_zero_length());
    assert_eq!(segment.normal(), None);
}

#[test]
fn normal_is_unit_length() {
    let n = compute_normal(point(-3.0, 2.0), point(7.0, 11.5)).unwrap();
    assert!((n.square_length() - 1.0).abs() < 0.00001);
    assert!(n.dot(point(7.0, 11.5) - point(-3.0, 2.0)).abs() < 0.0001);
}

#[test]
fn widen_corner_order() {
    let segment = LineSegment {
        from: point(0.0, 0.0),
        to: point(10.0, 0.0),
    };
    let corners = segment.widen(4.0, segment.normal().unwrap());

    assert_eq!(corners[0], point(0.0, 2.0));
    assert_eq!(corners[1], point(0.0, -2.0));
    assert_eq!(corners[2], point(10.0, -2.0));
    assert_eq!(corners[3], point(10.0, 2.0));
}

#[test]
fn widen_corners_are_symmetric() {
    let segment = LineSegment {
        from: point(1.0, -2.0),
        to: point(4.0, 6.0),
    };
    let width = 3.5;
    let corners = segment.widen(width, segment.normal().unwrap());

    for &(corner, center) in &[
        (corners[0], segment.from),
        (corners[1], segment.from),
        (corners[2], segment.to),
        (corners[3], segment.to),
    ] {
        let d = (corner - center).length();
        assert!((d - width * 0.5).abs() < 0.0001);
    }

    assert_almost_eq(corners[0].lerp(corners[1], 0.5), segment.from);
    assert_almost_eq(corners[2].lerp(corners[3], 0.5), segment.to);
}

#[test]
fn axis_aligned() {
    let h = LineSegment {
        from: point(0.0, 3.0),
        to: point(10.0, 3.0),
    };
    let v = LineSegment {
        from: point(2.0, 3.0),
        to: point(2.0, -3.0),
    };
    let d = LineSegment {
        from: point(0.0, 0.0),
        to: point(1.0, 1.0),
    };

    assert!(h.is_axis_aligned());
    assert!(v.is_axis_aligned());
    assert!(!d.is_axis_aligned());
    assert!(!d.flip().is_axis_aligned());
    assert_eq!(d.flip().from, d.to);
    assert_almost_eq(h.mid_point(), point(5.0, 3.0));
    assert_almost_eq(h.sample(0.25), point(2.5, 3.0));
}
