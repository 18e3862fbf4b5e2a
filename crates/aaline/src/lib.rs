#![deny(bare_trait_objects)]

//! Thick, anti-aliased polylines rendered on the GPU using tessellation.
//!
//! # Crates
//!
//! This meta-crate (`aaline`) reexports the following sub-crates for convenience:
//!
//! * **aaline_tessellation** - The stroke tessellator and the geometry builder traits.
//! * **aaline_geom** - Line segment and arc math on top of euclid.
//! * **aaline_extra** - A path syntax parser and debugging tools.
//!
//! Each `aaline_<name>` crate is reexported as a `<name>` module in `aaline`. For example:
//!
//! ```ignore
//! extern crate aaline_tessellation;
//! use aaline_tessellation::StrokeTessellator;
//! ```
//!
//! Is equivalent to:
//!
//! ```ignore
//! extern crate aaline;
//! use aaline::tessellation::StrokeTessellator;
//! ```
//!
//! # Feature flags
//!
//! serialization using serde can be enabled on each crate using the
//! `serialization` feature flag (disabled by default).
//!
//! When using the main crate `aaline`, the `aaline_extra` dependency is disabled by default.
//! It can be added with the feature flag `extra`.
//!
//! # How the lines are drawn
//!
//! Each segment of a polyline is widened into a quad. Segments that are not aligned with
//! the axes are made a bit wider than the requested line width and carry two
//! anti-aliasing parameters per vertex (`e0` along the segment, `e1` across it) that a
//! fragment shader uses to fade the extra margin out. Horizontal, vertical and thin lines
//! are snapped instead: they keep their exact width and get no fading.
//!
//! Consecutive segments are connected with miter, bevel or round joins.
//!
//! # Examples
//!
//! ## Tessellating a polyline into custom vertices
//!
//! ```
//! extern crate aaline;
//! use aaline::math::point;
//! use aaline::tessellation::*;
//!
//! fn main() {
//!     #[derive(Copy, Clone, Debug)]
//!     struct MyVertex {
//!         position: [f32; 2],
//!         aa: [f32; 2],
//!         color: u32,
//!     }
//!
//!     // Will contain the result of the tessellation.
//!     let mut geometry: VertexBuffers<MyVertex, u16> = VertexBuffers::new();
//!
//!     {
//!         let options = StrokeOptions::default()
//!             .with_line_width(4.0)
//!             .with_line_join(LineJoin::Round);
//!
//!         let mut tessellator = StrokeTessellator::with_options(
//!             options,
//!             BuffersBuilder::new(&mut geometry, |vertex: StrokeVertex| MyVertex {
//!                 position: vertex.position().to_array(),
//!                 aa: vertex.aa_params(),
//!                 color: vertex.color().packed(),
//!             }),
//!         );
//!
//!         tessellator.set_color(Color::rgb(200, 30, 30));
//!         tessellator.begin().unwrap();
//!         tessellator.move_to(point(0.0, 0.0)).unwrap();
//!         tessellator.line_to(point(100.0, 20.0)).unwrap();
//!         tessellator.line_to(point(120.0, 80.0)).unwrap();
//!         tessellator.end().unwrap();
//!     }
//!
//!     // The tessellated geometry is ready to be uploaded to the GPU.
//!     println!(" -- {} vertices {} indices",
//!         geometry.vertices.len(),
//!         geometry.indices.len()
//!     );
//! }
//! ```
//!
//! ## Rendering the tessellated geometry
//!
//! aaline does not provide any GPU abstraction or rendering backend. The vertices carry
//! everything a shader needs: the position, the texture coordinates, the `[e0, e1]`
//! anti-aliasing parameters and the packed color. The projection given to
//! `StrokeTessellator::set_projection` is forwarded to the geometry builder untouched.

pub extern crate aaline_tessellation;
#[cfg(feature = "extra")]
pub extern crate aaline_extra;

#[cfg(feature = "extra")]
pub use aaline_extra as extra;
pub use aaline_tessellation as tessellation;
pub use tessellation::geom;

pub use tessellation::math;
