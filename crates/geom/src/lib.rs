#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::float_cmp)]
#![allow(clippy::excessive_precision)]
#![no_std]

//! Simple 2D geometric primitives for stroke tessellation, on top of euclid.
//!
//! This crate is reexported in [aaline](https://docs.rs/aaline/).
//!
//! # Overview.
//!
//! This crate implements the little bit of math the stroke tessellator needs:
//!
//! - line segments, their normals and the quad obtained by widening them,
//! - the circular arcs used to approximate round joins.
//!
//! # Widening
//!
//! A segment from `a` to `b` is widened by offsetting both endpoints along the unit
//! normal of `b - a`. The four resulting corners are always produced in the same
//! order:
//!
//! ```text
//!  corners[0] = a + n * w/2 ----------------- corners[3] = b + n * w/2
//!      a  ---------------------------------------->  b
//!  corners[1] = a - n * w/2 ----------------- corners[2] = b - n * w/2
//! ```
//!
//! The tessellator relies on this order to produce consistently wound triangles.
//!
//! # Arcs
//!
//! Round joins are approximated with a fan of triangles. [`JoinArc`] walks the
//! shorter arc between two points of a circle using a fixed angular step, the
//! smaller the step, the more triangles.

#[cfg(any(test, feature = "std"))]
extern crate std;

// Reexport dependencies.
pub use euclid;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

pub mod arc;
mod line;
pub mod utils;

#[doc(inline)]
pub use crate::arc::JoinArc;
#[doc(inline)]
pub use crate::line::{compute_normal, LineSegment};

pub mod math {
    //! f32 version of the euclid types used everywhere. The other aaline crates
    //! reexport them.

    use crate::euclid;

    /// Alias for ```euclid::default::Point2D<f32>```.
    pub type Point = euclid::default::Point2D<f32>;

    /// Alias for ```euclid::default::Vector2D<f32>```.
    pub type Vector = euclid::default::Vector2D<f32>;

    /// Alias for ```euclid::default::Transform2D<f32>```
    pub type Transform = euclid::default::Transform2D<f32>;

    /// Alias for ```euclid::default::Transform3D<f32>```.
    ///
    /// This is the projection/model-view matrix handed to the renderer. The
    /// tessellator stores and forwards it but never applies it.
    pub type Projection = euclid::default::Transform3D<f32>;

    /// Alias for ```euclid::default::Box2D<f32>```
    pub type Box2D = euclid::default::Box2D<f32>;

    /// An angle in radians (f32).
    pub type Angle = euclid::Angle<f32>;

    /// Shorthand for `Vector::new(x, y)`.
    #[inline]
    pub fn vector(x: f32, y: f32) -> Vector {
        Vector::new(x, y)
    }

    /// Shorthand for `Point::new(x, y)`.
    #[inline]
    pub fn point(x: f32, y: f32) -> Point {
        Point::new(x, y)
    }
}
