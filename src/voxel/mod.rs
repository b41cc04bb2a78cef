//! In-memory voxel column grid and its layer encodings.

pub mod grid;
pub mod layers;

pub use self::grid::{Column, VoxelGrid, LAYER_COUNT};
pub use self::layers::{BuildingTop, Occupant};
