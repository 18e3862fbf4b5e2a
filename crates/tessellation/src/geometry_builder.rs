//! Tools to help with generating vertex and index buffers.
//!
//! ## Overview
//!
//! While it would be possible for the tessellator to manually generate vertex
//! and index buffers with a certain layout, it would mean that most code using it
//! has to copy and convert all generated vertices in order to have their own vertex
//! layout, or de-interleaved vertex formats, which is a very common use-case.
//!
//! In order to flexibly and efficiently build geometry of various flavors, this module contains
//! a number of builder interfaces centered around the idea of building vertex and index
//! buffers without having to know about the final vertex and index types.
//!
//! See:
//!
//! * [`GeometryBuilder`](trait.GeometryBuilder.html)
//! * [`StrokeGeometryBuilder`](trait.StrokeGeometryBuilder.html)
//!
//! The traits above are what the tessellator interfaces with. It is very common to push
//! vertices and indices into a pair of vectors, so to facilitate this pattern this module
//! also provides:
//!
//! * The struct [`VertexBuffers`](struct.VertexBuffers.html) is a simple pair of vectors of
//!   indices and vertices (generic parameters), plus the projection the geometry is meant to
//!   be rendered with.
//! * The struct [`BuffersBuilder`](struct.BuffersBuilder.html) which writes into a
//!   [`VertexBuffers`](struct.VertexBuffers.html) and implements the geometry builder traits.
//!   It takes care of filling the buffers while producing vertices is delegated to a vertex
//!   constructor.
//! * The trait [`StrokeVertexConstructor`](trait.StrokeVertexConstructor.html) used by
//!   [`BuffersBuilder`](struct.BuffersBuilder.html) in order to generate any vertex type. In the
//!   first example below, a struct `GpuVertexCtor` implements it in order to create vertices
//!   with the position, anti-aliasing parameters, texture coordinates and color of each
//!   `StrokeVertex`. The [`Positions`](struct.Positions.html) constructor just returns the
//!   vertex position.
//!
//! Geometry builders are a practical way to add one last step to the tessellation pipeline,
//! such as applying a transform or counting the generated primitives.
//!
//! ## The mesh sink contract
//!
//! * `begin_geometry` is called by `StrokeTessellator::begin`.
//! * Vertices are added one by one, each triangle references three vertices added since
//!   `begin_geometry`.
//! * `end_geometry` is called by `StrokeTessellator::end` once the last pending segment has been
//!   written. This is where a renderer would upload the buffers and issue its draw call.
//! * `abort_geometry` is called instead of `end_geometry` if the builder returned an error.
//! * `set_projection` hands over the transform the geometry is to be rendered with. The
//!   tessellator never applies it.
//!
//! ## Examples
//!
//! ### Generating custom vertices
//!
//! The example below implements the `StrokeVertexConstructor` trait in order to use a custom
//! vertex type `GpuVertex`, storing the tessellation in a `VertexBuffers<GpuVertex, u16>`.
//!
//! ```
//! extern crate aaline_tessellation as tess;
//! use tess::{StrokeVertexConstructor, VertexBuffers, BuffersBuilder, StrokeOptions};
//! use tess::{StrokeTessellator, StrokeVertex, Color};
//! use tess::math::point;
//!
//! // Our custom vertex.
//! #[derive(Copy, Clone, Debug)]
//! pub struct GpuVertex {
//!   position: [f32; 2],
//!   aa_params: [f32; 2],
//!   tex_coord: [f32; 2],
//!   color: u32,
//! }
//!
//! // The vertex constructor. This is the object that will be used to create the custom
//! // vertices from the information provided by the tessellator.
//! struct GpuVertexCtor;
//!
//! impl StrokeVertexConstructor<GpuVertex> for GpuVertexCtor {
//!     fn new_vertex(&mut self, vertex: StrokeVertex) -> GpuVertex {
//!         GpuVertex {
//!             position: vertex.position().to_array(),
//!             aa_params: vertex.aa_params(),
//!             tex_coord: vertex.tex_coord(),
//!             color: vertex.color().packed(),
//!         }
//!     }
//! }
//!
//! fn main() {
//!     let mut output: VertexBuffers<GpuVertex, u16> = VertexBuffers::new();
//!     {
//!         let mut tessellator = StrokeTessellator::with_options(
//!             StrokeOptions::default().with_line_width(4.0),
//!             BuffersBuilder::new(&mut output, GpuVertexCtor),
//!         );
//!
//!         tessellator.set_color(Color::rgb(255, 0, 0));
//!         tessellator.begin().unwrap();
//!         tessellator.move_to(point(0.0, 0.0)).unwrap();
//!         tessellator.line_to(point(100.0, 20.0)).unwrap();
//!         tessellator.line_to(point(100.0, 80.0)).unwrap();
//!         tessellator.end().unwrap();
//!     }
//!
//!     println!(" -- {} vertices, {} indices", output.vertices.len(), output.indices.len());
//! }
//! ```
//!
//! ### Generating a completely custom output
//!
//! Using `VertexBuffers<T>` is convenient and probably fits a lot of use cases, but
//! what if we do not want to write the geometry in a pair of vectors?
//! Perhaps we want to write the geometry in a different data structure or directly
//! into gpu-accessible buffers mapped on the CPU?
//!
//! ```
//! extern crate aaline_tessellation as tess;
//! use tess::{StrokeTessellator, GeometryBuilder, StrokeGeometryBuilder, GeometryBuilderError};
//! use tess::{StrokeVertex, VertexId};
//! use tess::math::point;
//!
//! // A geometry builder that writes the result of the tessellation to stdout instead
//! // of filling vertex and index buffers.
//! pub struct ToStdOut {
//!     vertices: u32,
//!     indices: u32,
//! }
//!
//! impl ToStdOut {
//!      pub fn new() -> Self { ToStdOut { vertices: 0, indices: 0 } }
//! }
//!
//! impl GeometryBuilder for ToStdOut {
//!     fn begin_geometry(&mut self) {
//!         // Reset the vertex in index counters.
//!         self.vertices = 0;
//!         self.indices = 0;
//!         println!(" -- begin geometry");
//!     }
//!
//!     fn add_triangle(&mut self, a: VertexId, b: VertexId, c: VertexId) {
//!         println!("triangle ({}, {}, {})", a.offset(), b.offset(), c.offset());
//!         self.indices += 3;
//!     }
//!
//!     fn abort_geometry(&mut self) {
//!         println!(" -- oops!");
//!     }
//! }
//!
//! impl StrokeGeometryBuilder for ToStdOut {
//!     fn add_stroke_vertex(
//!         &mut self,
//!         vertex: StrokeVertex,
//!     ) -> Result<VertexId, GeometryBuilderError> {
//!         println!("vertex {:?} {:?}", vertex.position(), vertex.aa_params());
//!         if self.vertices >= u32::MAX {
//!             return Err(GeometryBuilderError::TooManyVertices);
//!         }
//!         self.vertices += 1;
//!         Ok(VertexId(self.vertices as u32 - 1))
//!     }
//! }
//!
//! fn main() {
//!     let mut tessellator = StrokeTessellator::new(ToStdOut::new());
//!     tessellator.tessellate_polyline(
//!         &[point(0.0, 0.0), point(10.0, 0.0), point(5.0, 5.0)],
//!         true,
//!     ).unwrap();
//! }
//! ```
//!

pub use crate::error::GeometryBuilderError;
use crate::math::{Point, Projection};
use crate::{Index, StrokeVertex, VertexId};

use alloc::vec::Vec;
use core::convert::From;
use core::ops::Add;

/// An interface separating the tessellator from the actual vertex construction.
///
/// Types that receive the output of the stroke tessellator also have to implement
/// [`StrokeGeometryBuilder`](trait.StrokeGeometryBuilder.html), which contains the hook
/// to generate vertices.
///
/// See the [`geometry_builder`](index.html) module documentation for more detailed explanation.
pub trait GeometryBuilder {
    /// Called at the beginning of a generation.
    ///
    /// end_geometry must be called before begin_geometry is called again.
    fn begin_geometry(&mut self) {}

    /// Called at the end of a generation.
    ///
    /// This is the point at which the accumulated geometry can be flushed.
    fn end_geometry(&mut self) {}

    /// Insert a triangle made of vertices that were added after the last call to begin_geometry.
    ///
    /// This method can only be called between begin_geometry and end_geometry.
    fn add_triangle(&mut self, a: VertexId, b: VertexId, c: VertexId);

    /// abort_geometry is called instead of end_geometry if an error occurred while producing
    /// the geometry and we won't be able to finish.
    ///
    /// The implementation is expected to discard the geometry that was generated since the last
    /// time begin_geometry was called, and to remain in a usable state.
    fn abort_geometry(&mut self) {}

    /// The transform the geometry is meant to be rendered with.
    ///
    /// The tessellator stores and forwards it but never applies it to the vertices.
    fn set_projection(&mut self, _projection: &Projection) {}
}

/// A Geometry builder to interface with the [`StrokeTessellator`](../struct.StrokeTessellator.html).
///
/// Types implementing this trait must also implement the [`GeometryBuilder`](trait.GeometryBuilder.html) trait.
pub trait StrokeGeometryBuilder: GeometryBuilder {
    /// Inserts a vertex and returns its id.
    /// The id is only valid between begin_geometry and end_geometry.
    ///
    /// This method can only be called between begin_geometry and end_geometry.
    fn add_stroke_vertex(&mut self, vertex: StrokeVertex)
        -> Result<VertexId, GeometryBuilderError>;
}

impl<'l, B: GeometryBuilder + ?Sized> GeometryBuilder for &'l mut B {
    fn begin_geometry(&mut self) {
        (**self).begin_geometry();
    }

    fn end_geometry(&mut self) {
        (**self).end_geometry();
    }

    fn add_triangle(&mut self, a: VertexId, b: VertexId, c: VertexId) {
        (**self).add_triangle(a, b, c);
    }

    fn abort_geometry(&mut self) {
        (**self).abort_geometry();
    }

    fn set_projection(&mut self, projection: &Projection) {
        (**self).set_projection(projection);
    }
}

impl<'l, B: StrokeGeometryBuilder + ?Sized> StrokeGeometryBuilder for &'l mut B {
    fn add_stroke_vertex(
        &mut self,
        vertex: StrokeVertex,
    ) -> Result<VertexId, GeometryBuilderError> {
        (**self).add_stroke_vertex(vertex)
    }
}

/// Structure that holds the vertex and index data.
///
/// Usually written into though temporary `BuffersBuilder` objects.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct VertexBuffers<OutputVertex, OutputIndex> {
    pub vertices: Vec<OutputVertex>,
    pub indices: Vec<OutputIndex>,
    /// The last projection handed to the builder, identity by default.
    pub projection: Projection,
}

impl<OutputVertex, OutputIndex> VertexBuffers<OutputVertex, OutputIndex> {
    /// Constructor
    pub fn new() -> Self {
        VertexBuffers::with_capacity(512, 1024)
    }

    /// Constructor
    pub fn with_capacity(num_vertices: usize, num_indices: usize) -> Self {
        VertexBuffers {
            vertices: Vec::with_capacity(num_vertices),
            indices: Vec::with_capacity(num_indices),
            projection: Projection::identity(),
        }
    }

    /// Empty the buffers without freeing memory, for reuse without reallocation.
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }
}

impl<OutputVertex, OutputIndex> Default for VertexBuffers<OutputVertex, OutputIndex> {
    fn default() -> Self {
        VertexBuffers::with_capacity(0, 0)
    }
}

/// A temporary view on a `VertexBuffers` object which facilitate the population of vertex and index
/// data.
///
/// `BuffersBuilders` record the vertex offset from when they are created so that algorithms using
/// them don't need to worry about offsetting indices if some geometry was added beforehand. This
/// means that from the point of view of a `BuffersBuilder` user, the first added vertex is at always
/// offset at the offset 0 and `VertexBuilder` takes care of translating indices adequately.
///
/// The `StrokeVertexConstructor` does the translation from `StrokeVertex` to `OutputVertex`.
/// If you only need positions, you can use the `SimpleBuffersBuilder` convenience typedef.
pub struct BuffersBuilder<'l, OutputVertex: 'l, OutputIndex: 'l, Ctor> {
    buffers: &'l mut VertexBuffers<OutputVertex, OutputIndex>,
    first_vertex: Index,
    first_index: Index,
    vertex_offset: Index,
    vertex_constructor: Ctor,
}

impl<'l, OutputVertex: 'l, OutputIndex: 'l, Ctor>
    BuffersBuilder<'l, OutputVertex, OutputIndex, Ctor>
{
    pub fn new(buffers: &'l mut VertexBuffers<OutputVertex, OutputIndex>, ctor: Ctor) -> Self {
        let first_vertex = buffers.vertices.len() as Index;
        let first_index = buffers.indices.len() as Index;
        BuffersBuilder {
            buffers,
            first_vertex,
            first_index,
            vertex_offset: 0,
            vertex_constructor: ctor,
        }
    }

    pub fn with_vertex_offset(mut self, offset: Index) -> Self {
        self.vertex_offset = offset;

        self
    }

    /// Consumes self and returns a builder with opposite triangle face winding.
    pub fn with_inverted_winding(self) -> InvertWinding<Self> {
        InvertWinding(self)
    }

    pub fn buffers<'a, 'b: 'a>(&'b self) -> &'a VertexBuffers<OutputVertex, OutputIndex> {
        self.buffers
    }
}

/// A wrapper for stroke geometry builders that inverts the triangle face winding.
pub struct InvertWinding<B>(B);

impl<B> InvertWinding<B> {
    pub fn inner(&self) -> &B {
        &self.0
    }
}

impl<B: GeometryBuilder> GeometryBuilder for InvertWinding<B> {
    fn begin_geometry(&mut self) {
        self.0.begin_geometry();
    }

    fn end_geometry(&mut self) {
        self.0.end_geometry()
    }

    fn add_triangle(&mut self, a: VertexId, b: VertexId, c: VertexId) {
        // Invert the triangle winding by flipping b and c.
        self.0.add_triangle(a, c, b);
    }

    fn abort_geometry(&mut self) {
        self.0.abort_geometry();
    }

    fn set_projection(&mut self, projection: &Projection) {
        self.0.set_projection(projection);
    }
}

impl<B: StrokeGeometryBuilder> StrokeGeometryBuilder for InvertWinding<B> {
    #[inline]
    fn add_stroke_vertex(
        &mut self,
        vertex: StrokeVertex,
    ) -> Result<VertexId, GeometryBuilderError> {
        self.0.add_stroke_vertex(vertex)
    }
}

/// A trait specifying how to create vertex values.
pub trait StrokeVertexConstructor<OutputVertex> {
    fn new_vertex(&mut self, vertex: StrokeVertex) -> OutputVertex;
}

/// A simple vertex constructor that just takes the position.
pub struct Positions;

impl StrokeVertexConstructor<Point> for Positions {
    fn new_vertex(&mut self, vertex: StrokeVertex) -> Point {
        vertex.position()
    }
}

impl<F, OutputVertex> StrokeVertexConstructor<OutputVertex> for F
where
    F: Fn(StrokeVertex) -> OutputVertex,
{
    fn new_vertex(&mut self, vertex: StrokeVertex) -> OutputVertex {
        self(vertex)
    }
}

/// A `BuffersBuilder` that only keeps the positions.
pub type SimpleBuffersBuilder<'l> = BuffersBuilder<'l, Point, u16, Positions>;

/// Creates a `SimpleBuffersBuilder`.
pub fn simple_builder(buffers: &mut VertexBuffers<Point, u16>) -> SimpleBuffersBuilder {
    BuffersBuilder::new(buffers, Positions)
}

impl<'l, OutputVertex, OutputIndex, Ctor> GeometryBuilder
    for BuffersBuilder<'l, OutputVertex, OutputIndex, Ctor>
where
    OutputVertex: 'l,
    OutputIndex: Add + From<VertexId> + MaxIndex,
{
    fn begin_geometry(&mut self) {
        self.first_vertex = self.buffers.vertices.len() as Index;
        self.first_index = self.buffers.indices.len() as Index;
    }

    fn add_triangle(&mut self, a: VertexId, b: VertexId, c: VertexId) {
        debug_assert!(a != b);
        debug_assert!(a != c);
        debug_assert!(b != c);
        debug_assert!(a != VertexId::INVALID);
        debug_assert!(b != VertexId::INVALID);
        debug_assert!(c != VertexId::INVALID);
        self.buffers.indices.push((a + self.vertex_offset).into());
        self.buffers.indices.push((b + self.vertex_offset).into());
        self.buffers.indices.push((c + self.vertex_offset).into());
    }

    fn abort_geometry(&mut self) {
        self.buffers.vertices.truncate(self.first_vertex as usize);
        self.buffers.indices.truncate(self.first_index as usize);
    }

    fn set_projection(&mut self, projection: &Projection) {
        self.buffers.projection = *projection;
    }
}

impl<'l, OutputVertex, OutputIndex, Ctor> StrokeGeometryBuilder
    for BuffersBuilder<'l, OutputVertex, OutputIndex, Ctor>
where
    OutputVertex: 'l,
    OutputIndex: Add + From<VertexId> + MaxIndex,
    Ctor: StrokeVertexConstructor<OutputVertex>,
{
    fn add_stroke_vertex(&mut self, v: StrokeVertex) -> Result<VertexId, GeometryBuilderError> {
        self.buffers
            .vertices
            .push(self.vertex_constructor.new_vertex(v));
        let len = self.buffers.vertices.len();
        if len > OutputIndex::MAX {
            return Err(GeometryBuilderError::TooManyVertices);
        }
        Ok(VertexId((len - 1) as Index))
    }
}

/// A geometry builder that does not output any geometry.
///
/// Mostly useful for testing and benchmarking.
pub struct NoOutput {
    next_vertex: u32,
    num_triangles: u32,
}

impl NoOutput {
    pub fn new() -> Self {
        NoOutput {
            next_vertex: 0,
            num_triangles: 0,
        }
    }

    /// Number of vertices added since the last `begin_geometry`.
    pub fn num_vertices(&self) -> u32 {
        self.next_vertex
    }

    /// Number of triangles added since the last `begin_geometry`.
    pub fn num_triangles(&self) -> u32 {
        self.num_triangles
    }
}

impl Default for NoOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryBuilder for NoOutput {
    fn begin_geometry(&mut self) {
        self.next_vertex = 0;
        self.num_triangles = 0;
    }

    fn add_triangle(&mut self, a: VertexId, b: VertexId, c: VertexId) {
        debug_assert!(a != b);
        debug_assert!(a != c);
        debug_assert!(b != c);
        self.num_triangles += 1;
    }
}

impl StrokeGeometryBuilder for NoOutput {
    fn add_stroke_vertex(&mut self, _: StrokeVertex) -> Result<VertexId, GeometryBuilderError> {
        if self.next_vertex == u32::MAX {
            return Err(GeometryBuilderError::TooManyVertices);
        }
        self.next_vertex += 1;
        Ok(VertexId(self.next_vertex - 1))
    }
}

/// Provides the maximum value of an index.
///
/// This should be the maximum value representable by the index type up
/// to u32::MAX because the tessellator can't internally represent more
/// than u32::MAX indices.
pub trait MaxIndex {
    const MAX: usize;
}

impl MaxIndex for u16 {
    const MAX: usize = u16::MAX as usize;
}
impl MaxIndex for u32 {
    const MAX: usize = u32::MAX as usize;
}
// The tessellator internally uses u32 indices so we can't have more than u32::MAX
impl MaxIndex for usize {
    const MAX: usize = u32::MAX as usize;
}
