// src/lib.rs
//! Voxel terrain map generator.
//!
//! Rasterizes a heightmap, vector features and building columns into the
//! four-layer column grid read by the game world loader, and optionally
//! records which 16x16 blocks changed against the previous map.

pub mod config;
pub mod data;
pub mod diff;
pub mod error;
pub mod math;
pub mod pipeline;
pub mod preview;
pub mod raster;
pub mod voxel;

pub use config::GenerateOptions;
pub use error::{MapGenError, Result};
pub use pipeline::{generate, Summary};
