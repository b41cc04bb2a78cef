// src/data/mod.rs
//! Input-side data for the map generator.
//!
//! - Surface/decoration palette and road widths
//! - Features documents and how several of them are layered

pub mod features;
pub mod palette;

pub use features::{Area, Building, DecorationShape, FeatureFile, FeatureSet, Highway};
pub use palette::{Decoration, Surface};
