use super::Rasterizer;
use crate::data::features::DecorationShape;
use crate::data::palette::{Decoration, Surface};
use crate::math::raster::line;
use crate::math::Cell;
use crate::voxel::{BuildingTop, Occupant};
use log::{debug, warn};
use std::collections::BTreeMap;

impl Rasterizer {
    /// Places decorations type by type, in ascending name order.
    pub(super) fn apply_decorations(&mut self, decorations: &BTreeMap<String, Vec<DecorationShape>>) {
        for (name, shapes) in decorations {
            let Some(deco) = Decoration::from_name(name) else {
                warn!("unknown decoration {name:?}, {} records ignored", shapes.len());
                continue;
            };
            for shape in shapes {
                self.place_shape(name, deco, shape);
            }
        }
    }

    fn place_shape(&mut self, name: &str, deco: Decoration, shape: &DecorationShape) {
        match shape {
            DecorationShape::Point { x, y } => {
                let Some(cell) = self.bounds.shift(*x, *y) else {
                    debug!("{name} at ({x}, {y}) is outside the map, ignored");
                    return;
                };
                self.place(deco, cell);
                if deco.is_plant() {
                    self.grid.set_surface(cell.0, cell.1, Surface::Dirt);
                }
            }
            DecorationShape::Line { x, y } => {
                let vertices = self.bounds.shift_all(x, y);
                if vertices.is_empty() {
                    debug!("{name} line is outside the map, ignored");
                    return;
                }
                for pair in vertices.windows(2) {
                    for cell in line(pair[0], pair[1]) {
                        self.place(deco, cell);
                    }
                }
                if deco.is_plant() {
                    for &(cx, cy) in &vertices {
                        self.grid.set_surface(cx, cy, Surface::Dirt);
                    }
                }
            }
        }
    }

    /// A decoration replaces any building column standing on the cell.
    fn place(&mut self, deco: Decoration, (x, y): Cell) {
        self.grid.set_occupant(x, y, Occupant::Decoration(deco.id()));
        self.grid.set_top(x, y, BuildingTop::NONE);
    }
}
