use super::Rasterizer;
use crate::data::features::Highway;
use crate::data::palette::{highway_width, Surface};
use crate::error::{MapGenError, Result};
use crate::math::raster::{line, widen};
use crate::math::Cell;
use log::warn;
use rayon::prelude::*;

/// Blocks a road sinks per negative layer.
const BLOCKS_PER_LAYER: i64 = 3;

struct Road {
    surface: Surface,
    /// How far below the surrounding terrain the road runs.
    depth: i64,
    at_grade: bool,
    /// Widened cells of each vertex pair, in order.
    segments: Vec<Vec<Cell>>,
}

impl Rasterizer {
    pub(super) fn apply_highways(&mut self, highways: &[Highway]) -> Result<()> {
        let bounds = self.bounds;
        let (w, h) = (self.grid.size_x(), self.grid.size_y());

        let roads: Vec<Option<Road>> = highways
            .par_iter()
            .enumerate()
            .map(|(i, highway)| {
                let Some(surface) = Surface::from_name(&highway.surface) else {
                    warn!("highway {i}: unknown surface {:?}, ignored", highway.surface);
                    return None;
                };
                let width = highway_width(&highway.kind);
                let vertices = bounds.shift_all(&highway.x, &highway.y);
                let segments = vertices
                    .windows(2)
                    .map(|pair| widen(&line(pair[0], pair[1]), width, w, h))
                    .collect();
                Some(Road {
                    surface,
                    depth: if highway.layer < 0 {
                        -(highway.layer as i64) * BLOCKS_PER_LAYER
                    } else {
                        0
                    },
                    at_grade: highway.layer >= 0,
                    segments,
                })
            })
            .collect();

        for road in roads.into_iter().flatten() {
            for cells in &road.segments {
                self.pave(&road, cells)?;
            }
        }
        Ok(())
    }

    fn pave(&mut self, road: &Road, cells: &[Cell]) -> Result<()> {
        if road.depth != 0 {
            // Mean of the terrain as left by the previous segments.
            if let Some(mean) = self.grid.mean_height(cells) {
                let level = MapGenError::check_range(
                    "sunken road height",
                    mean - road.depth as f64,
                    0.0,
                    255.0,
                )?;
                let level = level.floor() as u8;
                for &(x, y) in cells {
                    self.grid.set_height(x, y, level);
                }
            }
        }

        for &(x, y) in cells {
            self.grid.set_surface(x, y, road.surface);
            if road.at_grade {
                self.grid.clear_above(x, y);
            }
        }
        Ok(())
    }
}
