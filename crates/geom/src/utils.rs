use crate::math::{vector, Vector};

#[cfg(not(feature = "std"))]
use num_traits::Float;

/// Rotates a vector by 90 degrees: `(x, y) -> (-y, x)`.
#[inline]
pub fn perpendicular(v: Vector) -> Vector {
    vector(-v.y, v.x)
}

/// Returns the normalized vector, or `None` if its length is zero or not a number.
///
/// The vector is divided by its largest component before squaring so that very short
/// and very long vectors don't underflow or overflow.
#[inline]
pub fn normalized(v: Vector) -> Option<Vector> {
    let scale = v.x.abs().max(v.y.abs());
    if !(scale > 0.0 && scale.is_finite()) {
        return None;
    }

    let v = v / scale;
    let len = v.square_length().sqrt();
    if len.is_finite() {
        Some(v / len)
    } else {
        None
    }
}

/// Angle of a vector relative to the positive x axis, in `[0, 2*PI]`.
#[inline]
pub fn polar_angle(v: Vector) -> f32 {
    let a = v.y.atan2(v.x);
    if a < 0.0 {
        a + core::f32::consts::PI * 2.0
    } else {
        a
    }
}

#[test]
fn test_perpendicular() {
    assert_eq!(perpendicular(vector(1.0, 0.0)), vector(0.0, 1.0));
    assert_eq!(perpendicular(vector(0.0, 1.0)), vector(-1.0, 0.0));
    assert_eq!(perpendicular(vector(3.0, -2.0)), vector(2.0, 3.0));
}

#[test]
fn test_normalized() {
    assert_eq!(normalized(vector(0.0, 0.0)), None);
    assert_eq!(normalized(vector(f32::NAN, 0.0)), None);
    assert_eq!(normalized(vector(0.0, -4.0)), Some(vector(0.0, -1.0)));
    assert_eq!(normalized(vector(f32::INFINITY, 1.0)), None);
}

#[test]
fn test_normalized_extreme_lengths() {
    fn assert_unit(v: Vector, expected: Vector) {
        let n = normalized(v).unwrap();
        assert!((n - expected).length() < 0.0001, "{:?} -> {:?}", v, n);
    }

    // The squared lengths of these underflow or overflow.
    assert_unit(vector(0.0, 1e-30), vector(0.0, 1.0));
    assert_unit(vector(3e-30, -4e-30), vector(0.6, -0.8));
    assert_unit(vector(6e19, 0.0), vector(1.0, 0.0));
    assert_unit(vector(3e30, 4e30), vector(0.6, 0.8));
    assert_unit(vector(f32::MAX, f32::MAX), vector(0.70710677, 0.70710677));
}

#[test]
fn test_polar_angle() {
    use core::f32::consts::PI;

    fn assert_angle(v: Vector, expected: f32) {
        let angle = polar_angle(v);
        assert!((angle - expected).abs() < 0.0001, "{:?}: {} != {}", v, angle, expected);
    }

    assert_angle(vector(1.0, 0.0), 0.0);
    assert_angle(vector(0.0, 1.0), PI * 0.5);
    assert_angle(vector(-1.0, 0.0), PI);
    assert_angle(vector(0.0, -1.0), PI * 1.5);
    assert_angle(vector(1.0, -1.0), PI * 1.75);
    assert_angle(vector(-3.0, 3.0), PI * 0.75);
    // Small angles keep their precision.
    assert!((polar_angle(vector(1.0, 1e-5)) - 1e-5).abs() < 1e-9);
}
