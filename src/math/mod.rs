//! Geometry shared by the rasterizer and the diff encoder.
//!
//! - World bounds and coordinate shifting
//! - Clipping of anchored 2-D arrays into a destination frame
//! - Integer scan conversion (lines, polygons, road widths)

pub mod aligner;
pub mod bounds;
pub mod raster;

pub use self::aligner::{Fitted, Plane};
pub use self::bounds::{Bounds, Cell};
