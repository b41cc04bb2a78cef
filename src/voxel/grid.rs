use crate::data::palette::Surface;
use crate::math::{Cell, Plane};

use super::layers::{BuildingTop, Occupant};

pub const LAYER_COUNT: usize = vmap::LAYER_COUNT as usize;

/// Raw layer bytes of one column: height, surface, occupant, building top.
pub type Column = [u8; LAYER_COUNT];

/// Dense column grid, row-major by y then x.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoxelGrid {
    columns: Plane<Column>,
}

impl VoxelGrid {
    /// Zero-initialized grid.
    pub fn new(size_x: usize, size_y: usize) -> Self {
        Self {
            columns: Plane::filled(size_x, size_y, [0; LAYER_COUNT]),
        }
    }

    /// Rebuilds a grid from raw map bytes; `None` on a length mismatch.
    pub fn from_bytes(size_x: usize, size_y: usize, bytes: &[u8]) -> Option<Self> {
        let columns: &[Column] = bytemuck::try_cast_slice(bytes).ok()?;
        Plane::from_vec(size_x, size_y, columns.to_vec()).map(|columns| Self { columns })
    }

    pub fn into_columns(self) -> Plane<Column> {
        self.columns
    }

    /// Raw bytes in map file order (y, x, layer).
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.columns.data())
    }

    #[inline]
    pub fn columns(&self) -> &Plane<Column> {
        &self.columns
    }

    #[inline]
    pub fn size_x(&self) -> usize {
        self.columns.width()
    }

    #[inline]
    pub fn size_y(&self) -> usize {
        self.columns.height()
    }

    #[inline]
    pub fn column(&self, x: usize, y: usize) -> Column {
        self.columns.get(x, y)
    }

    #[inline]
    pub fn height(&self, x: usize, y: usize) -> u8 {
        self.columns.get(x, y)[0]
    }

    #[inline]
    pub fn set_height(&mut self, x: usize, y: usize, h: u8) {
        self.columns.get_mut(x, y)[0] = h;
    }

    #[inline]
    pub fn surface(&self, x: usize, y: usize) -> u8 {
        self.columns.get(x, y)[1]
    }

    #[inline]
    pub fn set_surface(&mut self, x: usize, y: usize, surface: Surface) {
        self.columns.get_mut(x, y)[1] = surface.id();
    }

    #[inline]
    pub fn occupant(&self, x: usize, y: usize) -> Occupant {
        Occupant::from_byte(self.columns.get(x, y)[2])
    }

    #[inline]
    pub fn set_occupant(&mut self, x: usize, y: usize, occupant: Occupant) {
        self.columns.get_mut(x, y)[2] = occupant.to_byte();
    }

    #[inline]
    pub fn top(&self, x: usize, y: usize) -> BuildingTop {
        BuildingTop::from_byte(self.columns.get(x, y)[3])
    }

    #[inline]
    pub fn set_top(&mut self, x: usize, y: usize, top: BuildingTop) {
        self.columns.get_mut(x, y)[3] = top.to_byte();
    }

    /// Removes decorations and buildings above the ground block.
    #[inline]
    pub fn clear_above(&mut self, x: usize, y: usize) {
        let col = self.columns.get_mut(x, y);
        col[2] = 0;
        col[3] = 0;
    }

    pub fn fill_height(&mut self, h: u8) {
        for y in 0..self.size_y() {
            for x in 0..self.size_x() {
                self.set_height(x, y, h);
            }
        }
    }

    /// Writes `src - subtract` into the height layer with `src` starting at
    /// `(offset_x, offset_y)`; whatever falls outside the grid is ignored.
    pub fn write_heights(&mut self, src: &Plane<u8>, offset_x: usize, offset_y: usize, subtract: u8) {
        for (sy, row) in src.rows().enumerate() {
            let y = offset_y + sy;
            if y >= self.size_y() {
                break;
            }
            for (sx, &v) in row.iter().enumerate() {
                let x = offset_x + sx;
                if x >= self.size_x() {
                    break;
                }
                self.set_height(x, y, v.saturating_sub(subtract));
            }
        }
    }

    /// Arithmetic mean of the height layer over `cells`, `None` when empty.
    pub fn mean_height(&self, cells: &[Cell]) -> Option<f64> {
        if cells.is_empty() {
            return None;
        }
        let sum: u64 = cells.iter().map(|&(x, y)| self.height(x, y) as u64).sum();
        Some(sum as f64 / cells.len() as f64)
    }

    /// Mean height rounded to the nearest integer, ties to even.
    pub fn rounded_mean_height(&self, cells: &[Cell]) -> Option<f64> {
        self.mean_height(cells).map(f64::round_ties_even)
    }

    /// Number of columns holding a building top without a building bottom.
    pub fn dangling_tops(&self) -> usize {
        self.columns
            .data()
            .iter()
            .filter(|c| c[2] < super::layers::SENTINEL && c[3] != 0)
            .count()
    }
}
