use super::Rasterizer;
use crate::data::features::Area;
use crate::data::palette::{Decoration, Surface};
use crate::math::raster::polygon;
use crate::math::Cell;
use crate::voxel::Occupant;
use log::{debug, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

/// Share of grassy area cells that get a grass decoration.
const GRASS_DENSITY: f64 = 0.025;

/// Every grassy area restarts the generator from this seed, so identical
/// polygons always get identical grass.
const GRASS_SEED: u64 = 0;

impl Rasterizer {
    pub(super) fn apply_areas(&mut self, areas: &[Area]) {
        let bounds = self.bounds;
        let (w, h) = (self.grid.size_x(), self.grid.size_y());

        let footprints: Vec<Option<(Surface, Vec<Cell>)>> = areas
            .par_iter()
            .enumerate()
            .map(|(i, area)| {
                let vertices = bounds.shift_all(&area.x, &area.y);
                if vertices.len() < 3 {
                    debug!(
                        "area {i} ({}): {} vertices inside the map, ignored",
                        area.surface,
                        vertices.len()
                    );
                    return None;
                }
                let Some(surface) = Surface::from_name(&area.surface) else {
                    warn!("area {i}: unknown surface {:?}, ignored", area.surface);
                    return None;
                };
                Some((surface, polygon(&vertices, w, h)))
            })
            .collect();

        let mut painted = 0usize;
        for (surface, cells) in footprints.into_iter().flatten() {
            self.paint_area(surface, &cells);
            painted += 1;
        }
        debug!("{painted}/{} areas painted", areas.len());
    }

    fn paint_area(&mut self, surface: Surface, cells: &[Cell]) {
        if surface.is_flattened() {
            if let Some(level) = self.grid.rounded_mean_height(cells) {
                // Mean of u8 heights, always in range.
                let level = level as u8;
                for &(x, y) in cells {
                    self.grid.set_height(x, y, level);
                }
            }
        }

        let mut grass = surface
            .is_grassy()
            .then(|| ChaCha8Rng::seed_from_u64(GRASS_SEED));
        let grass_id = Occupant::Decoration(Decoration::Grass.id());

        for &(x, y) in cells {
            self.grid.set_surface(x, y, surface);
            match grass.as_mut() {
                Some(rng) => {
                    if rng.gen::<f64>() < GRASS_DENSITY {
                        self.grid.set_occupant(x, y, grass_id);
                    }
                }
                // Overlapping areas drop grass scattered by earlier ones.
                None => self.grid.set_occupant(x, y, Occupant::Empty),
            }
        }
    }
}
