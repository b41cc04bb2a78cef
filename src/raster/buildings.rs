use super::{Rasterizer, FLAT_HEIGHT};
use crate::data::features::Building;
use crate::data::palette::Surface;
use crate::error::{MapGenError, Result};
use crate::math::raster::{line, polygon_perimeter};
use crate::math::Cell;
use crate::voxel::layers::{is_encodable_y, MAX_ENCODED_Y};
use crate::voxel::{BuildingTop, Occupant};
use log::{debug, info, warn};
use rayon::prelude::*;
use vmap::{ColumnBuilding, GroupKind};

impl Rasterizer {
    /// Building columns from the binary buildings file.
    pub(super) fn apply_column_buildings(&mut self, buildings: &[ColumnBuilding]) -> Result<()> {
        let (mut inside, mut outside, mut too_tall) = (0usize, 0usize, 0usize);

        for building in buildings {
            for group in &building.groups {
                let kind = group.kind();
                for &[x, y, z] in &group.points {
                    let Some((cx, cy)) = self.bounds.shift(x, y) else {
                        outside += 1;
                        continue;
                    };
                    inside += 1;
                    let z = self.corrected_z(cx, cy, z);
                    if !self.place_column_point(cx, cy, z, kind)? {
                        too_tall += 1;
                    }
                }
            }
        }

        if outside > 0 {
            warn!(
                "{outside}/{} building points were outside the area and skipped",
                inside + outside
            );
        }
        if too_tall > 0 {
            warn!("{too_tall} building points above y {MAX_ENCODED_Y} were skipped");
        }
        info!("{} column buildings placed ({inside} points)", buildings.len());
        Ok(())
    }

    /// Column z relative to the generated terrain.
    fn corrected_z(&self, x: usize, y: usize, z: i32) -> i64 {
        let mut z = z as i64 - self.height_sub as i64 - self.options.buildings_base_height as i64;
        if self.options.flat {
            if let Some(h) = self.heightmap_at(x, y) {
                z -= h as i64;
            }
            z += FLAT_HEIGHT as i64;
        }
        z
    }

    /// Returns `false` when a wall or roof point lies above the encodable range.
    fn place_column_point(&mut self, x: usize, y: usize, z: i64, kind: GroupKind) -> Result<bool> {
        match kind {
            GroupKind::Ground => {
                if !self.options.flat {
                    let h = MapGenError::check_range("building ground height", z as f64, 0.0, 255.0)?;
                    self.grid.set_height(x, y, h as u8);
                }
                self.grid.set_surface(x, y, Surface::BuildingGround);
            }
            GroupKind::Roof | GroupKind::Wall if z > MAX_ENCODED_Y as i64 => return Ok(false),
            GroupKind::Roof | GroupKind::Wall if z > 0 => {
                let bottom = match self.grid.occupant(x, y) {
                    Occupant::BuildingBottom(b) => z.min(b as i64),
                    _ => z,
                };
                self.grid.set_occupant(x, y, Occupant::building_bottom(bottom)?);

                let top = if kind == GroupKind::Roof {
                    BuildingTop::roof(z)?
                } else {
                    BuildingTop::wall(z)?
                };
                let merged = self.grid.top(x, y).max(top);
                self.grid.set_top(x, y, merged);
            }
            // Below the terrain.
            _ => {}
        }
        Ok(true)
    }

    /// Building outlines from the features documents.
    pub(super) fn apply_vector_buildings(&mut self, buildings: &[Building]) -> Result<()> {
        let bounds = self.bounds;

        let outlines: Vec<Option<Vec<Cell>>> = buildings
            .par_iter()
            .enumerate()
            .map(|(i, building)| {
                let vertices = bounds.shift_all(&building.x, &building.y);
                match vertices.len() {
                    0 | 1 => {
                        debug!("building {i}: {} vertices inside the map, ignored", vertices.len());
                        None
                    }
                    2 => Some(line(vertices[0], vertices[1])),
                    _ => Some(polygon_perimeter(&vertices)),
                }
            })
            .collect();

        for (i, (building, outline)) in buildings.iter().zip(outlines).enumerate() {
            if let Some(cells) = outline {
                self.raise_building(i, building, &cells)?;
            }
        }
        Ok(())
    }

    fn raise_building(&mut self, index: usize, building: &Building, cells: &[Cell]) -> Result<()> {
        let height = building.estimated_height();
        if building.is_part {
            if let Some(h) = height.filter(|&h| h < 1) {
                debug!("building {index}: part height {h} is not usable, ignored");
                return Ok(());
            }
        }
        let Some(mean) = self.grid.rounded_mean_height(cells) else {
            return Ok(());
        };

        let ground = MapGenError::check_range("building ground height", mean, 0.0, 255.0)? as i64;
        let top_y = ground + height.filter(|&h| h >= 1).unwrap_or(1) as i64;
        if !is_encodable_y(top_y) {
            warn!("building {index}: top at y {top_y} is above {MAX_ENCODED_Y}, skipped");
            return Ok(());
        }
        let bottom = Occupant::building_bottom(ground + 1)?;
        let top = BuildingTop::wall(top_y)?;
        // A part usually refines the outline it sits on, so it may lower it.
        let overwrite = building.is_part && height.is_some();

        for &(x, y) in cells {
            self.grid.set_height(x, y, ground as u8);
            self.grid.set_occupant(x, y, bottom);
            let top = if overwrite {
                top
            } else {
                self.grid.top(x, y).max(top)
            };
            self.grid.set_top(x, y, top);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::{test_util, RasterOptions};
    use super::*;
    use crate::math::{Bounds, Plane};
    use vmap::ColumnGroup;

    fn building(xs: &[i32], ys: &[i32], height: Option<i32>, is_part: bool) -> Building {
        Building {
            x: xs.to_vec(),
            y: ys.to_vec(),
            is_part,
            height,
            levels: None,
            material: None,
        }
    }

    fn column(groups: &[(&str, &[[i32; 3]])]) -> ColumnBuilding {
        ColumnBuilding {
            groups: groups
                .iter()
                .map(|(name, points)| ColumnGroup {
                    name: name.to_string(),
                    points: points.to_vec(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_outline_levels_ground_and_sets_column() {
        let mut r = test_util::with_heights(4, 1, vec![10, 11, 12, 13]);
        r.apply_vector_buildings(&[building(&[0, 3], &[0, 0], Some(8), false)])
            .unwrap();
        for x in 0..4 {
            // Mean 11.5 rounds to 12.
            assert_eq!(r.grid().height(x, 0), 12);
            assert_eq!(r.grid().occupant(x, 0), Occupant::BuildingBottom(13));
            assert_eq!(r.grid().top(x, 0), BuildingTop::Wall(20));
        }
    }

    #[test]
    fn test_part_overwrites_but_outline_only_raises() {
        let outline = [0, 3];
        let mut r = test_util::flat(4, 1, 10);
        r.apply_vector_buildings(&[
            building(&outline, &[0, 0], Some(20), false),
            building(&outline, &[0, 0], Some(5), false),
        ])
        .unwrap();
        assert_eq!(r.grid().top(1, 0), BuildingTop::Wall(30));

        r.apply_vector_buildings(&[building(&outline, &[0, 0], Some(5), true)])
            .unwrap();
        assert_eq!(r.grid().top(1, 0), BuildingTop::Wall(15));
    }

    #[test]
    fn test_levels_and_missing_height() {
        let mut r = test_util::flat(3, 3, 4);
        let mut tower = building(&[0, 2], &[0, 0], None, false);
        tower.levels = Some(3);
        r.apply_vector_buildings(&[tower, building(&[0, 2], &[2, 2], None, true)])
            .unwrap();
        assert_eq!(r.grid().top(1, 0), BuildingTop::Wall(13));
        assert_eq!(r.grid().top(1, 2), BuildingTop::Wall(5));
    }

    #[test]
    fn test_unusable_buildings_are_skipped() {
        let mut r = test_util::flat(3, 3, 4);
        r.apply_vector_buildings(&[
            building(&[0, 9], &[0, 9], Some(5), false),
            building(&[0, 2], &[1, 1], Some(0), true),
        ])
        .unwrap();
        assert!(r.grid().columns().data().iter().all(|c| *c == [4u8, 0, 0, 0]));
    }

    #[test]
    fn test_polygon_outline_is_perimeter_only() {
        let mut r = test_util::flat(5, 5, 4);
        r.apply_vector_buildings(&[building(&[0, 4, 4, 0], &[0, 0, 4, 4], Some(3), false)])
            .unwrap();
        assert!(r.grid().occupant(0, 2).is_building());
        assert!(!r.grid().occupant(2, 2).is_building());
    }

    #[test]
    fn test_zero_height_outline_still_gets_one_block() {
        let mut r = test_util::flat(2, 1, 10);
        r.apply_vector_buildings(&[building(&[0, 1], &[0, 0], Some(0), false)])
            .unwrap();
        for x in 0..2 {
            assert_eq!(r.grid().occupant(x, 0), Occupant::BuildingBottom(11));
            assert_eq!(r.grid().top(x, 0), BuildingTop::Wall(11));
        }
    }

    #[test]
    fn test_building_above_encodable_range_is_skipped() {
        let mut r = test_util::flat(2, 1, 50);
        r.apply_vector_buildings(&[
            building(&[0, 1], &[0, 0], Some(80), false),
            building(&[0, 1], &[0, 0], Some(77), false),
        ])
        .unwrap();
        // 50 + 77 is the highest top that still encodes.
        assert_eq!(r.grid().top(0, 0), BuildingTop::Wall(127));

        let mut r = test_util::flat(2, 1, 50);
        r.apply_vector_buildings(&[building(&[0, 1], &[0, 0], Some(80), false)])
            .unwrap();
        assert!(r.grid().columns().data().iter().all(|c| *c == [50u8, 0, 0, 0]));
    }

    #[test]
    fn test_column_points_above_encodable_range_are_skipped() {
        let mut r = test_util::flat(2, 1, 0);
        r.apply_column_buildings(&[column(&[
            ("wall", &[[0, 0, 128], [1, 0, 20]]),
            ("roof", &[[1, 0, 200]]),
        ])])
        .unwrap();
        assert_eq!(r.grid().occupant(0, 0), Occupant::Empty);
        assert_eq!(r.grid().top(0, 0), BuildingTop::NONE);
        assert_eq!(r.grid().occupant(1, 0), Occupant::BuildingBottom(20));
        assert_eq!(r.grid().top(1, 0), BuildingTop::Wall(20));
    }

    #[test]
    fn test_column_roof_and_walls_merge() {
        let mut r = test_util::flat(3, 1, 0);
        let b = column(&[
            ("ground", &[[0, 0, 7]]),
            ("wall", &[[1, 0, 9], [1, 0, 4], [1, 0, 0]]),
            ("roof", &[[1, 0, 6], [2, 0, 12]]),
            ("wall", &[[2, 0, 30]]),
        ]);
        r.apply_column_buildings(&[b]).unwrap();

        assert_eq!(r.grid().height(0, 0), 7);
        assert_eq!(r.grid().surface(0, 0), Surface::BuildingGround.id());
        assert_eq!(r.grid().occupant(0, 0), Occupant::Empty);

        assert_eq!(r.grid().occupant(1, 0), Occupant::BuildingBottom(4));
        assert_eq!(r.grid().top(1, 0), BuildingTop::Roof(6));
        // A roof outranks a higher wall.
        assert_eq!(r.grid().occupant(2, 0), Occupant::BuildingBottom(12));
        assert_eq!(r.grid().top(2, 0), BuildingTop::Roof(12));
    }

    #[test]
    fn test_column_points_outside_are_counted_not_fatal() {
        let mut r = test_util::flat(2, 2, 0);
        r.apply_column_buildings(&[column(&[("wall", &[[5, 5, 3], [1, 1, 3]])])])
            .unwrap();
        assert_eq!(r.grid().top(1, 1), BuildingTop::Wall(3));
    }

    #[test]
    fn test_column_ground_out_of_range_fails() {
        let mut r = test_util::flat(1, 1, 0);
        let err = r
            .apply_column_buildings(&[column(&[("ground", &[[0, 0, -2]])])])
            .unwrap_err();
        assert!(matches!(err, MapGenError::HeightOutOfRange { .. }));
    }

    #[test]
    fn test_column_z_in_flat_mode_follows_heightmap() {
        let bounds = Bounds::new(0, 1, 0, 0).unwrap();
        // Heightmap only covers x = 0.
        let fitted = Plane::from_vec(1, 1, vec![30]).unwrap().fit((0, 0), (0, 0), (2, 1));
        let options = RasterOptions {
            flat: true,
            buildings_base_height: 5,
            ..RasterOptions::default()
        };
        let mut r = Rasterizer::new(bounds, Some(fitted), options);
        r.apply_terrain();
        r.apply_column_buildings(&[column(&[
            ("wall", &[[0, 0, 40], [1, 0, 40]]),
            ("ground", &[[0, 0, 1000]]),
        ])])
        .unwrap();

        // 40 - 5 - 30 + 50
        assert_eq!(r.grid().top(0, 0), BuildingTop::Wall(55));
        // 40 - 5 + 50
        assert_eq!(r.grid().top(1, 0), BuildingTop::Wall(85));
        // Flat mode never takes ground heights from columns.
        assert_eq!(r.grid().height(0, 0), FLAT_HEIGHT);
        assert_eq!(r.grid().surface(0, 0), Surface::BuildingGround.id());
    }

    #[test]
    fn test_column_z_subtracts_height_reduction() {
        let bounds = Bounds::new(0, 0, 0, 0).unwrap();
        let fitted = Plane::from_vec(1, 1, vec![100]).unwrap().fit((0, 0), (0, 0), (1, 1));
        let mut r = Rasterizer::new(bounds, Some(fitted), RasterOptions::default());
        r.apply_terrain();
        r.apply_column_buildings(&[column(&[("roof", &[[0, 0, 110]])])])
            .unwrap();
        assert_eq!(r.grid().top(0, 0), BuildingTop::Roof(10));
    }
}
