#![deny(bare_trait_objects)]

//! Various optional utilities for the aaline crates.
//!
//! - [`parser`]: reads polylines written in the SVG path syntax,
//! - [`debugging`]: SVG dumps of the generated geometry and test case reduction.

pub extern crate aaline_tessellation as tessellation;

pub use tessellation::geom::euclid;
pub use tessellation::math;

pub mod debugging;
pub mod parser;
