//! Fatal conditions of a map generation run.
//!
//! Per-feature defects (too few vertices, unknown palette names, points
//! outside the map) are logged inside the rasterizer and never surface here.

use std::fmt;

#[derive(Debug)]
pub enum MapGenError {
    /// Reading an input or writing the map failed.
    Io(std::io::Error),
    /// A features document is not valid JSON for the expected schema.
    Json(serde_json::Error),
    /// Neither a heightmap (outside flat mode) nor any features were given.
    NoInput,
    /// A bounding-box side was not given and no input declares it.
    MissingBound(&'static str),
    InvertedBounds {
        min_x: i32,
        max_x: i32,
        min_y: i32,
        max_y: i32,
    },
    /// The grid does not fit the 16-bit size fields of the map file.
    GridTooLarge { size_x: i64, size_y: i64 },
    SpawnOutsideBounds { x: i32, z: i32 },
    /// A computed height or encoded building y left its representable range.
    HeightOutOfRange {
        what: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    /// The previous map needs a newer reader than this build.
    IncompatibleVersion { supported: u8, required: u8 },
    /// A changed block does not fit its persisted 16-bit field.
    BlockOutOfRange { block_x: i64, block_z: i64 },
}

pub type Result<T> = std::result::Result<T, MapGenError>;

impl MapGenError {
    /// Range check helper for computed heights.
    pub fn check_range(what: &'static str, value: f64, min: f64, max: f64) -> Result<f64> {
        if (min..=max).contains(&value) {
            Ok(value)
        } else {
            Err(MapGenError::HeightOutOfRange {
                what,
                value,
                min,
                max,
            })
        }
    }
}

impl fmt::Display for MapGenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapGenError::Io(e) => write!(f, "I/O error: {e}"),
            MapGenError::Json(e) => write!(f, "invalid features document: {e}"),
            MapGenError::NoInput => write!(
                f,
                "at least one of a heightmap (without flat mode) or a features file is required"
            ),
            MapGenError::MissingBound(side) => {
                write!(f, "{side} is neither given nor declared by any input")
            }
            MapGenError::InvertedBounds {
                min_x,
                max_x,
                min_y,
                max_y,
            } => write!(
                f,
                "map size is invalid: from {min_x},{min_y} to {max_x},{max_y}"
            ),
            MapGenError::GridTooLarge { size_x, size_y } => write!(
                f,
                "map size {size_x}x{size_y} exceeds the 65535x65535 limit of the map format"
            ),
            MapGenError::SpawnOutsideBounds { x, z } => {
                write!(f, "offset ({x}, {z}) is located outside of map")
            }
            MapGenError::HeightOutOfRange {
                what,
                value,
                min,
                max,
            } => write!(f, "{what} {value} is outside [{min}, {max}]"),
            MapGenError::IncompatibleVersion {
                supported,
                required,
            } => write!(
                f,
                "can't add incremental map info: existing map requires reader version {required}, this build supports {supported}"
            ),
            MapGenError::BlockOutOfRange { block_x, block_z } => write!(
                f,
                "changed block ({block_x}, {block_z}) does not fit the 16-bit block field"
            ),
        }
    }
}

impl std::error::Error for MapGenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MapGenError::Io(e) => Some(e),
            MapGenError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MapGenError {
    fn from(e: std::io::Error) -> Self {
        MapGenError::Io(e)
    }
}

impl From<serde_json::Error> for MapGenError {
    fn from(e: serde_json::Error) -> Self {
        MapGenError::Json(e)
    }
}
