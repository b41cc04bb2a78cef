//! Feature rasterization onto the voxel grid.
//!
//! Stages run in a fixed order and later stages overwrite earlier ones:
//! terrain, areas, buildings, highways, decorations. Footprints of a stage
//! are computed in parallel, the grid is only touched from the calling
//! thread, in input order.

mod areas;
mod buildings;
mod decorations;
mod highways;
mod terrain;

use crate::data::features::FeatureSet;
use crate::error::Result;
use crate::math::{Bounds, Fitted};
use crate::voxel::VoxelGrid;
use log::{debug, warn};
use vmap::ColumnBuilding;

/// Ground level used when no terrain is taken from the heightmap.
pub const FLAT_HEIGHT: u8 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RasterOptions {
    /// Ignore the heightmap for terrain, keep it only to level buildings.
    pub flat: bool,
    /// Subtract the lowest heightmap value from all heights.
    pub reduce_height: bool,
    /// Subtracted from every building column z.
    pub buildings_base_height: i32,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            flat: false,
            reduce_height: true,
            buildings_base_height: 0,
        }
    }
}

pub struct Rasterizer {
    grid: VoxelGrid,
    bounds: Bounds,
    options: RasterOptions,
    /// Heightmap clipped to the bounds, in grid-local placement.
    heightmap: Option<Fitted<u8>>,
    /// Value subtracted from the heightmap by the terrain stage.
    height_sub: u8,
}

impl Rasterizer {
    pub fn new(bounds: Bounds, heightmap: Option<Fitted<u8>>, options: RasterOptions) -> Self {
        Self {
            grid: VoxelGrid::new(bounds.size_x(), bounds.size_y()),
            bounds,
            options,
            heightmap,
            height_sub: 0,
        }
    }

    /// Runs every stage and hands out the finished grid.
    ///
    /// Column buildings, when given, replace the vector buildings of
    /// `features`.
    pub fn run(mut self, features: FeatureSet, columns: Option<Vec<ColumnBuilding>>) -> Result<VoxelGrid> {
        let FeatureSet {
            areas,
            highways,
            buildings,
            decorations,
            ..
        } = features;

        self.apply_terrain();
        self.apply_areas(&areas);
        match columns {
            Some(columns) => {
                if !buildings.is_empty() {
                    debug!(
                        "{} buildings from features ignored in favour of the buildings file",
                        buildings.len()
                    );
                }
                self.apply_column_buildings(&columns)?;
            }
            None => self.apply_vector_buildings(&buildings)?,
        }
        self.apply_highways(&highways)?;
        self.apply_decorations(&decorations);

        let dangling = self.grid.dangling_tops();
        if dangling > 0 {
            warn!("{dangling} columns have a building top without a building bottom");
        }
        Ok(self.grid)
    }

    #[cfg(test)]
    pub(crate) fn grid(&self) -> &VoxelGrid {
        &self.grid
    }

    #[cfg(test)]
    pub(crate) fn height_sub(&self) -> u8 {
        self.height_sub
    }

    /// Raw heightmap value under a grid cell, if the heightmap covers it.
    fn heightmap_at(&self, x: usize, y: usize) -> Option<u8> {
        let fitted = self.heightmap.as_ref()?;
        let lx = x.checked_sub(fitted.offset_x)?;
        let ly = y.checked_sub(fitted.offset_y)?;
        (lx < fitted.plane.width() && ly < fitted.plane.height()).then(|| fitted.plane.get(lx, ly))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::features::{Area, FeatureFile};
    use crate::voxel::{BuildingTop, Occupant};

    #[test]
    fn test_heightmap_at_respects_placement() {
        let bounds = Bounds::new(0, 4, 0, 4).unwrap();
        let plane = crate::math::Plane::from_vec(2, 2, vec![1, 2, 3, 4]).unwrap();
        let fitted = plane.fit((2, 3), (0, 0), (5, 5));
        let r = Rasterizer::new(bounds, Some(fitted), RasterOptions::default());
        assert_eq!(r.heightmap_at(2, 3), Some(1));
        assert_eq!(r.heightmap_at(3, 4), Some(4));
        assert_eq!(r.heightmap_at(1, 3), None);
        assert_eq!(r.heightmap_at(4, 4), None);
    }

    #[test]
    fn test_run_orders_stages() {
        // A road across a building: the highway stage runs after buildings
        // and clears the column it crosses.
        let doc = r#"{
            "buildings": [{"x": [1, 5, 5, 1], "y": [1, 1, 5, 5], "height": 6}],
            "highways": [{"x": [0, 9], "y": [1, 1], "surface": "asphalt", "type": "path"}],
            "decorations": {"bench": [{"x": 3, "y": 5}]}
        }"#;
        let mut features = crate::data::features::FeatureSet::default();
        features.merge(FeatureFile::from_reader(doc.as_bytes()).unwrap());
        features.areas.push(Area {
            x: vec![0, 9, 9, 0],
            y: vec![0, 0, 9, 9],
            surface: "concrete".into(),
        });

        let r = test_util::flat(10, 10, 20);
        let grid = r.run(features, None).unwrap();

        assert_eq!(grid.surface(8, 8), crate::data::palette::Surface::Concrete.id());
        assert_eq!(grid.occupant(1, 1), Occupant::Empty);
        assert_eq!(grid.top(1, 1), BuildingTop::NONE);
        assert_eq!(grid.occupant(5, 4), Occupant::BuildingBottom(21));
        assert_eq!(grid.top(5, 4), BuildingTop::Wall(26));
        assert_eq!(grid.occupant(3, 5), Occupant::Decoration(24));
        assert_eq!(grid.top(3, 5), BuildingTop::NONE);
        assert_eq!(grid.dangling_tops(), 0);
    }

    #[test]
    fn test_columns_replace_vector_buildings() {
        let doc = r#"{"buildings": [{"x": [0, 3], "y": [0, 0], "height": 6}]}"#;
        let mut features = crate::data::features::FeatureSet::default();
        features.merge(FeatureFile::from_reader(doc.as_bytes()).unwrap());

        let r = test_util::flat(4, 4, 10);
        let grid = r.run(features, Some(Vec::new())).unwrap();
        assert_eq!(grid.occupant(0, 0), Occupant::Empty);
        assert_eq!(grid.height(0, 0), 10);
    }
}
