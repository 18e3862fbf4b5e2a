#![deny(bare_trait_objects)]
#![deny(unconditional_recursion)]
#![allow(clippy::float_cmp)]
#![allow(clippy::too_many_arguments)]
#![no_std]

//! Tessellation of thick, anti-aliased polylines.
//!
//! This crate is reexported in [aaline](https://docs.rs/aaline/).
//!
//! ## Overview
//!
//! The most interesting types and traits of this crate are:
//!
//! * [StrokeTessellator](struct.StrokeTessellator.html) - A stateful pen that turns
//!   `move_to`/`line_to` commands into a triangle mesh.
//! * [`GeometryBuilder`](geometry_builder/trait.GeometryBuilder.html) - (See the documentation of the
//!   [geometry_builder module](geometry_builder/index.html)) which the tessellator writes into.
//!   This trait provides an interface for types that help with building and assembling the vertices
//!   and triangles that form the tessellation, usually in the form of arbitrary vertex and index
//!   buffers.
//!
//! ## The stroke pipeline
//!
//! Each line segment is widened into a quad made of two triangles. Where two segments of the
//! same sub-path meet, their corners are corrected so that they meet at the miter point, and
//! depending on the [LineJoin](enum.LineJoin.html), a bevel triangle or a fan of triangles
//! approximating an arc fills the gap on the outer side of the turn.
//!
//! Since a join modifies the far corners of the segment that precedes it, segments are emitted
//! one step behind: a segment is only written to the output once the next segment has been
//! joined to it, or when the sub-path ends.
//!
//! ### Anti-aliasing
//!
//! The tessellator does not super-sample. Instead, non-axis-aligned segments are widened by a
//! small margin and each vertex carries two parameters (see
//! [`StrokeVertex::aa_params`](struct.StrokeVertex.html#method.aa_params)) that a fragment shader
//! can use together with the texture coordinates to fade the edges of the line:
//!
//! * `e0` is the squared length of the segment scaled by the length smoothing factor, or `-1.0`
//!   on hard edges (the ends of a segment that touch a join) and on snapped segments.
//! * `e1` is the half line width scaled by the thickness smoothing factor, or `-1.0` on snapped
//!   segments.
//!
//! Segments that are horizontal or vertical (and lines thinner than 1.5 units) are "snapped" when
//! [`StrokeOptions::axis_snap`](struct.StrokeOptions.html#structfield.axis_snap) is enabled: they
//! keep their exact width and disable anti-aliasing so that they render crisp.
//!
//! ### The output: geometry builders
//!
//! The tessellator is parametrized over a type implementing the
//! [StrokeGeometryBuilder trait](geometry_builder/trait.StrokeGeometryBuilder.html).
//! This trait provides some simple methods to add vertices and triangles, without enforcing
//! any particular representation for the resulting geometry.
//!
//! The structs [VertexBuffers](geometry_builder/struct.VertexBuffers.html) and
//! [geometry_builder::BuffersBuilder](geometry_builder/struct.BuffersBuilder.html) are provided
//! for convenience.
//!
//! ## Examples
//!
//! - [Tessellating a polyline](struct.StrokeTessellator.html#examples).
//! - [Generating custom vertices](geometry_builder/index.html#generating-custom-vertices).

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

pub use aaline_geom as geom;

#[cfg(feature = "serialization")]
#[macro_use]
pub extern crate serde;

mod emit;
mod error;
pub mod geometry_builder;
mod join;
mod segment;
mod stroke;

#[cfg(test)]
mod stroke_tests;

pub use crate::geom::math;

#[doc(inline)]
pub use crate::stroke::*;

#[doc(inline)]
pub use crate::emit::{StrokeVertex, StrokeVertexKind, AA_DISABLED};

#[doc(inline)]
pub use crate::geometry_builder::{
    BuffersBuilder, GeometryBuilder, GeometryBuilderError, StrokeGeometryBuilder,
    StrokeVertexConstructor, VertexBuffers,
};

#[doc(inline)]
pub use crate::error::*;

use crate::math::Point;

/// Line join as defined by the SVG specification, plus `None`.
///
/// See: <https://svgwg.org/specs/strokes/#StrokeLinejoinProperty>
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum LineJoin {
    /// The inner corners are corrected but nothing fills the outer gap.
    None,
    /// A sharp corner is to be used to join path segments.
    Miter,
    /// A beveled corner is to be used to join path segments.
    /// The bevel shape is a triangle that fills the area between the two stroked
    /// segments.
    Bevel,
    /// A round corner is to be used to join path segments.
    Round,
}

impl LineJoin {
    /// Whether the join emits geometry of its own.
    #[inline]
    pub fn has_geometry(self) -> bool {
        matches!(self, LineJoin::Bevel | LineJoin::Round)
    }
}

/// Anti-aliasing scale factors.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Smoothing {
    /// Scales `e0`, the fade along the length of the segments.
    pub length: f32,
    /// Scales `e1`, the fade across the width of the segments.
    pub thickness: f32,
}

impl Smoothing {
    pub const DEFAULT: Self = Smoothing {
        length: 1.0,
        thickness: 0.9,
    };

    #[inline]
    pub const fn new(length: f32, thickness: f32) -> Self {
        Smoothing { length, thickness }
    }
}

impl Default for Smoothing {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A packed 8 bits per channel RGBA color.
///
/// The channels are stored in memory in `r, g, b, a` order, so that the value can be
/// uploaded as is to a normalized `u8x4` vertex attribute.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Self = Color::rgba(255, 255, 255, 255);
    pub const BLACK: Self = Color::rgba(0, 0, 0, 255);
    pub const TRANSPARENT: Self = Color::rgba(0, 0, 0, 0);

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color(u32::from_le_bytes([r, g, b, a]))
    }

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color::rgba(r, g, b, 255)
    }

    #[inline]
    pub const fn to_rgba(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }

    #[inline]
    pub const fn packed(self) -> u32 {
        self.0
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

/// Parameters for the tessellator.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[non_exhaustive]
pub struct StrokeOptions {
    /// Line width
    ///
    /// Zero means no stroke: commands are accepted but no geometry is produced.
    ///
    /// Default value: `StrokeOptions::DEFAULT_LINE_WIDTH`.
    pub line_width: f32,

    /// Default value: `LineJoin::Miter`.
    pub line_join: LineJoin,

    /// Threshold on the cosine of the turn between two segments, in `(0, 1]`.
    ///
    /// This is a dot product, not an angle or a length ratio: a miter join falls back to a
    /// bevel join when the dot product of the two segment directions is below
    /// `-miter_limit`. The closer to 1, the sharper the turns that keep a miter.
    ///
    /// Default value: `StrokeOptions::DEFAULT_MITER_LIMIT`.
    pub miter_limit: f32,

    /// Default value: `Smoothing::DEFAULT`.
    pub smoothing: Smoothing,

    /// Render horizontal, vertical and thin segments without anti-aliasing.
    ///
    /// Default value: `true`.
    pub axis_snap: bool,

    /// Snap the path's points to the pixel grid.
    ///
    /// Points land on integer coordinates for even line widths and on pixel centers
    /// for odd line widths.
    ///
    /// Default value: `false`.
    pub pixel_snap: bool,

    /// Angle in radians covered by each triangle of a round join.
    ///
    /// Default value: `StrokeOptions::DEFAULT_ROUND_JOIN_STEP`.
    pub round_join_step: f32,
}

impl StrokeOptions {
    pub const DEFAULT_LINE_WIDTH: f32 = 1.0;
    pub const DEFAULT_LINE_JOIN: LineJoin = LineJoin::Miter;
    pub const DEFAULT_MITER_LIMIT: f32 = 0.9;
    pub const DEFAULT_ROUND_JOIN_STEP: f32 = core::f32::consts::PI / 18.0;

    pub const DEFAULT: Self = StrokeOptions {
        line_width: Self::DEFAULT_LINE_WIDTH,
        line_join: Self::DEFAULT_LINE_JOIN,
        miter_limit: Self::DEFAULT_MITER_LIMIT,
        smoothing: Smoothing::DEFAULT,
        axis_snap: true,
        pixel_snap: false,
        round_join_step: Self::DEFAULT_ROUND_JOIN_STEP,
    };

    #[inline]
    pub const fn with_line_width(mut self, width: f32) -> Self {
        self.line_width = width;
        self
    }

    #[inline]
    pub const fn with_line_join(mut self, join: LineJoin) -> Self {
        self.line_join = join;
        self
    }

    #[inline]
    pub fn with_miter_limit(mut self, limit: f32) -> Self {
        assert!(limit > 0.0 && limit <= 1.0);
        self.miter_limit = limit;
        self
    }

    #[inline]
    pub const fn with_smoothing(mut self, smoothing: Smoothing) -> Self {
        self.smoothing = smoothing;
        self
    }

    #[inline]
    pub const fn with_axis_snap(mut self, snap: bool) -> Self {
        self.axis_snap = snap;
        self
    }

    #[inline]
    pub const fn with_pixel_snap(mut self, snap: bool) -> Self {
        self.pixel_snap = snap;
        self
    }

    #[inline]
    pub const fn with_round_join_step(mut self, step: f32) -> Self {
        self.round_join_step = step;
        self
    }

    /// Checks that all parameters are in their supported range.
    pub fn validate(&self) -> Result<(), UnsupportedParameter> {
        if !(self.line_width >= 0.0) || !self.line_width.is_finite() {
            return Err(UnsupportedParameter::LineWidth);
        }
        if !(self.miter_limit > 0.0 && self.miter_limit <= 1.0) {
            return Err(UnsupportedParameter::MiterLimit);
        }
        let s = self.smoothing;
        if !(s.length >= 0.0 && s.thickness >= 0.0)
            || !s.length.is_finite()
            || !s.thickness.is_finite()
        {
            return Err(UnsupportedParameter::Smoothing);
        }
        if !(self.round_join_step > 0.0) || !self.round_join_step.is_finite() {
            return Err(UnsupportedParameter::RoundJoinStep);
        }

        Ok(())
    }
}

impl Default for StrokeOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A flattened path command consumed by
/// [`StrokeTessellator::tessellate`](struct.StrokeTessellator.html#method.tessellate).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum PathEvent {
    MoveTo(Point),
    LineTo(Point),
    /// Draws a line back to the position of the last `MoveTo`.
    Close,
}

type Index = u32;

/// A virtual vertex offset in a geometry.
///
/// The `VertexId`s are only valid between `GeometryBuilder::begin_geometry` and
/// `GeometryBuilder::end_geometry`. `GeometryBuilder` implementations typically translate
/// the ids internally so that first `VertexId` after `begin_geometry` is zero.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct VertexId(pub Index);

impl VertexId {
    pub const INVALID: VertexId = VertexId(u32::MAX);

    pub fn offset(self) -> Index {
        self.0
    }

    pub fn to_usize(self) -> usize {
        self.0 as usize
    }

    pub fn from_usize(v: usize) -> Self {
        VertexId(v as Index)
    }
}

impl std::ops::Add<u32> for VertexId {
    type Output = Self;
    fn add(self, rhs: u32) -> Self {
        VertexId(self.0 + rhs)
    }
}

impl From<u16> for VertexId {
    fn from(v: u16) -> Self {
        VertexId(v as Index)
    }
}
impl From<u32> for VertexId {
    fn from(v: u32) -> Self {
        VertexId(v)
    }
}

impl From<VertexId> for u16 {
    fn from(v: VertexId) -> Self {
        v.0 as u16
    }
}
impl From<VertexId> for u32 {
    fn from(v: VertexId) -> Self {
        v.0
    }
}
impl From<VertexId> for usize {
    fn from(v: VertexId) -> Self {
        v.0 as usize
    }
}

#[test]
fn test_default_options() {
    let options = StrokeOptions::default();

    assert_eq!(options.miter_limit, 0.9);
    assert_eq!(options.line_join, LineJoin::Miter);
    assert_eq!(options.smoothing, Smoothing::new(1.0, 0.9));
    assert!(options.axis_snap);
    assert!(!options.pixel_snap);
    assert_eq!(options.validate(), Ok(()));
}

#[test]
fn test_with_miter_limit() {
    let expected_limit = 0.5;
    let stroke_options = StrokeOptions::default().with_miter_limit(expected_limit);

    assert_eq!(expected_limit, stroke_options.miter_limit);
}

#[test]
#[should_panic]
fn test_with_invalid_miter_limit() {
    let _ = StrokeOptions::default().with_miter_limit(0.0);
}

#[test]
#[should_panic]
fn test_with_miter_limit_above_one() {
    // Miter limits are dot products, not SVG length ratios.
    let _ = StrokeOptions::default().with_miter_limit(4.0);
}

#[test]
fn test_validate_options() {
    let mut options = StrokeOptions::default();
    options.line_width = -1.0;
    assert_eq!(options.validate(), Err(UnsupportedParameter::LineWidth));

    options.line_width = f32::NAN;
    assert_eq!(options.validate(), Err(UnsupportedParameter::LineWidth));

    options.line_width = 0.0;
    assert_eq!(options.validate(), Ok(()));

    options.miter_limit = 1.5;
    assert_eq!(options.validate(), Err(UnsupportedParameter::MiterLimit));
    options.miter_limit = 1.0;

    let options = options.with_smoothing(Smoothing::new(-0.5, 1.0));
    assert_eq!(options.validate(), Err(UnsupportedParameter::Smoothing));

    let options = options
        .with_smoothing(Smoothing::DEFAULT)
        .with_round_join_step(0.0);
    assert_eq!(options.validate(), Err(UnsupportedParameter::RoundJoinStep));
}

#[test]
fn test_color_packing() {
    let c = Color::rgba(1, 2, 3, 4);
    assert_eq!(c.to_rgba(), [1, 2, 3, 4]);
    assert_eq!(c.packed(), 0x04030201);
    assert_eq!(Color::default(), Color::WHITE);
    assert_eq!(Color::rgb(0, 0, 0), Color::BLACK);
}
