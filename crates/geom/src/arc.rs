//! Circular arcs used to approximate round joins.

use crate::math::{Point, Vector};
#[cfg(test)]
use crate::math::point;
use crate::utils::{normalized, polar_angle};

use core::f32::consts::PI;

#[cfg(not(feature = "std"))]
use num_traits::Float;

/// Sweeps smaller than this are considered flat and produce no triangles.
const MIN_SWEEP: f32 = 1e-4;

/// The shorter arc of a circle going from one point to another.
///
/// Both points are expected to be (approximately) at the same distance from the
/// center. The radius is taken from `from`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct JoinArc {
    pub center: Point,
    pub from: Point,
    pub to: Point,
    pub radius: f32,
    /// Angle of `from` around the center, in radians.
    pub start_angle: f32,
    /// Signed angle from `from` to `to`, in `(-PI, PI]`.
    pub sweep_angle: f32,
}

impl JoinArc {
    /// Returns `None` if either point coincides with the center.
    pub fn between(center: Point, from: Point, to: Point) -> Option<Self> {
        let v0 = from - center;
        let v1 = to - center;
        let d0 = normalized(v0)?;
        let d1 = normalized(v1)?;

        let start_angle = polar_angle(d0);
        let mut sweep_angle = polar_angle(d1) - start_angle;
        if sweep_angle > PI {
            sweep_angle -= PI * 2.0;
        } else if sweep_angle <= -PI {
            sweep_angle += PI * 2.0;
        }

        Some(JoinArc {
            center,
            from,
            to,
            radius: v0.length(),
            start_angle,
            sweep_angle,
        })
    }

    /// Returns true if the arc turns counter-clockwise (in a y-up coordinate system).
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.sweep_angle > 0.0
    }

    /// Number of triangles needed to cover the arc with a fan, so that no triangle
    /// spans more than `step` radians.
    pub fn num_steps(&self, step: f32) -> u32 {
        let sweep = self.sweep_angle.abs();
        if sweep < MIN_SWEEP || !(step > 0.0) {
            return 0;
        }

        // Exact multiples of the step must not get an extra sliver triangle.
        (sweep / step - 0.001).ceil().max(1.0) as u32
    }

    /// Point of the arc at the given angle, relative to the start angle.
    #[inline]
    pub fn sample_angle(&self, angle: f32) -> Point {
        let a = self.start_angle + angle;
        self.center + Vector::new(a.cos(), a.sin()) * self.radius
    }

    /// Point of the arc at t (expecting t between 0 and 1).
    #[inline]
    pub fn sample(&self, t: f32) -> Point {
        if t <= 0.0 {
            return self.from;
        }
        if t >= 1.0 {
            return self.to;
        }

        self.sample_angle(self.sweep_angle * t)
    }

    /// Calls the callback with the two outer points of each fan triangle, in order
    /// along the arc. The center of the fan is `self.center`.
    ///
    /// The first edge starts exactly at `from` and the last one ends exactly at `to`
    /// so that the fan shares its outer vertices with the adjacent geometry.
    pub fn for_each_fan_triangle<F>(&self, step: f32, callback: &mut F)
    where
        F: FnMut(Point, Point),
    {
        let n = self.num_steps(step);
        if n == 0 {
            return;
        }

        let mut prev = self.from;
        for i in 1..n {
            let next = self.sample(i as f32 / n as f32);
            callback(prev, next);
            prev = next;
        }
        callback(prev, self.to);
    }

    /// The point halfway along the arc.
    pub fn mid_point(&self) -> Point {
        self.sample_angle(self.sweep_angle * 0.5)
    }
}

#[cfg(test)]
use std::vec::Vec;

#[cfg(test)]
fn fan(arc: &JoinArc, step: f32) -> Vec<(Point, Point)> {
    let mut edges = Vec::new();
    arc.for_each_fan_triangle(step, &mut |a, b| edges.push((a, b)));
    edges
}

#[test]
fn quarter_circle() {
    let arc = JoinArc::between(point(0.0, 0.0), point(2.0, 0.0), point(0.0, 2.0)).unwrap();
    assert!((arc.radius - 2.0).abs() < 0.00001);
    assert!((arc.sweep_angle - PI * 0.5).abs() < 0.0001);
    assert!(arc.is_positive());

    // 90 degrees with a 10 degree step.
    assert_eq!(arc.num_steps(PI / 18.0), 9);

    let edges = fan(&arc, PI / 18.0);
    assert_eq!(edges.len(), 9);
    assert_eq!(edges[0].0, point(2.0, 0.0));
    assert_eq!(edges[8].1, point(0.0, 2.0));

    for i in 1..edges.len() {
        assert_eq!(edges[i - 1].1, edges[i].0);
    }

    for &(a, b) in &edges {
        assert!(((a - arc.center).length() - 2.0).abs() < 0.001);
        assert!(((b - arc.center).length() - 2.0).abs() < 0.001);
    }
}

#[test]
fn shorter_arc_across_zero_angle() {
    // From -45 degrees to +45 degrees: the short way goes through 0, not through PI.
    let arc = JoinArc::between(point(0.0, 0.0), point(1.0, -1.0), point(1.0, 1.0)).unwrap();
    assert!((arc.sweep_angle - PI * 0.5).abs() < 0.0001);

    let mid = arc.mid_point();
    assert!(mid.x > 1.0);
    assert!(mid.y.abs() < 0.0001);

    let reversed = JoinArc::between(point(0.0, 0.0), point(1.0, 1.0), point(1.0, -1.0)).unwrap();
    assert!((reversed.sweep_angle + PI * 0.5).abs() < 0.0001);
    assert!(!reversed.is_positive());
}

#[test]
fn step_size_controls_triangle_count() {
    // A bit less than 154 degrees.
    let arc = JoinArc::between(point(5.0, 5.0), point(7.0, 5.0), point(3.0, 6.0)).unwrap();

    let coarse = arc.num_steps(PI / 4.0);
    let fine = arc.num_steps(PI / 36.0);
    assert_eq!(coarse, 4);
    assert_eq!(fine, 31);
    assert_eq!(fan(&arc, PI / 36.0).len(), 31);
    assert!(fan(&arc, PI / 4.0).len() < fan(&arc, PI / 18.0).len());
}

#[test]
fn negligible_sweep() {
    let arc = JoinArc::between(point(0.0, 0.0), point(1.0, 0.0), point(1.0, 0.00001)).unwrap();
    assert_eq!(arc.num_steps(PI / 18.0), 0);
    assert!(fan(&arc, PI / 18.0).is_empty());
}

#[test]
fn degenerate_arc() {
    assert_eq!(JoinArc::between(point(1.0, 1.0), point(1.0, 1.0), point(2.0, 1.0)), None);
    assert_eq!(JoinArc::between(point(1.0, 1.0), point(2.0, 1.0), point(1.0, 1.0)), None);
}

#[test]
fn sample_endpoints() {
    let arc = JoinArc::between(point(0.0, 0.0), point(0.0, 3.0), point(-3.0, 0.0)).unwrap();
    assert_eq!(arc.sample(0.0), point(0.0, 3.0));
    assert_eq!(arc.sample(1.0), point(-3.0, 0.0));
    let p = arc.sample(0.5);
    assert!((p.x + 3.0 / 2.0f32.sqrt()).abs() < 0.001);
    assert!((p.y - 3.0 / 2.0f32.sqrt()).abs() < 0.001);
}
