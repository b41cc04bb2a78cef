//! Resolved settings of one generation run, independent of the CLI.

use crate::data::features::DeclaredBounds;
use crate::error::{MapGenError, Result};
use crate::raster::RasterOptions;
use std::path::{Path, PathBuf};

pub const DEFAULT_OUTPUT: &str = "map.dat";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Terrain source.
    pub heightmap: Option<PathBuf>,
    /// Features documents, applied in order.
    pub features: Vec<PathBuf>,
    /// Binary building columns; replaces buildings from the features.
    pub buildings: Option<PathBuf>,
    pub buildings_base_height: i32,
    /// Compare against the existing output and record changed blocks.
    pub incremental: bool,
    /// World position of the spawn point, defaults to the minimum corner.
    pub spawn_x: Option<i32>,
    pub spawn_z: Option<i32>,
    /// Bounding box sides given explicitly; unset sides come from the inputs.
    pub bounds: DeclaredBounds,
    pub reduce_height: bool,
    pub flat: bool,
    pub create_images: bool,
    pub output: PathBuf,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            heightmap: None,
            features: Vec::new(),
            buildings: None,
            buildings_base_height: 0,
            incremental: false,
            spawn_x: None,
            spawn_z: None,
            bounds: DeclaredBounds::default(),
            reduce_height: true,
            flat: false,
            create_images: false,
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

impl GenerateOptions {
    /// A run needs terrain from a heightmap or at least one features file.
    pub fn validate(&self) -> Result<()> {
        let has_terrain = self.heightmap.is_some() && !self.flat;
        if !has_terrain && self.features.is_empty() {
            return Err(MapGenError::NoInput);
        }
        Ok(())
    }

    pub fn raster_options(&self) -> RasterOptions {
        RasterOptions {
            flat: self.flat,
            reduce_height: self.reduce_height,
            buildings_base_height: self.buildings_base_height,
        }
    }

    /// Directory that receives the debug layer images.
    pub fn image_dir(&self) -> &Path {
        self.output
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_requires_input() {
        let mut opts = GenerateOptions::default();
        assert!(matches!(opts.validate(), Err(MapGenError::NoInput)));

        opts.heightmap = Some("hm.dat".into());
        assert!(opts.validate().is_ok());

        // A heightmap alone gives no terrain in flat mode.
        opts.flat = true;
        assert!(matches!(opts.validate(), Err(MapGenError::NoInput)));

        opts.features.push("features.json".into());
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let opts = GenerateOptions::default();
        assert!(opts.reduce_height);
        assert_eq!(opts.output, Path::new("map.dat"));
        assert_eq!(opts.image_dir(), Path::new("."));
        assert_eq!(opts.raster_options(), RasterOptions::default());
    }

    #[test]
    fn test_image_dir_next_to_output() {
        let opts = GenerateOptions {
            output: "worlds/test/map.dat".into(),
            ..GenerateOptions::default()
        };
        assert_eq!(opts.image_dir(), Path::new("worlds/test"));
    }
}
