//! World-frame bounding box of the generated map.

use crate::error::{MapGenError, Result};

/// Grid-local column coordinate `(x, y)`.
pub type Cell = (usize, usize);

/// Inclusive world-coordinate rectangle that defines the grid frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl Bounds {
    /// Validates orientation and that the size fits the map file's u16 fields.
    pub fn new(min_x: i32, max_x: i32, min_y: i32, max_y: i32) -> Result<Self> {
        if min_x > max_x || min_y > max_y {
            return Err(MapGenError::InvertedBounds {
                min_x,
                max_x,
                min_y,
                max_y,
            });
        }
        let size_x = max_x as i64 - min_x as i64 + 1;
        let size_y = max_y as i64 - min_y as i64 + 1;
        if size_x > u16::MAX as i64 || size_y > u16::MAX as i64 {
            return Err(MapGenError::GridTooLarge { size_x, size_y });
        }
        Ok(Self {
            min_x,
            max_x,
            min_y,
            max_y,
        })
    }

    #[inline]
    pub fn size_x(&self) -> usize {
        (self.max_x as i64 - self.min_x as i64 + 1) as usize
    }

    #[inline]
    pub fn size_y(&self) -> usize {
        (self.max_y as i64 - self.min_y as i64 + 1) as usize
    }

    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        (self.min_x..=self.max_x).contains(&x) && (self.min_y..=self.max_y).contains(&y)
    }

    /// Grid-local position of a world point, `None` outside the bounds.
    #[inline]
    pub fn shift(&self, x: i32, y: i32) -> Option<Cell> {
        if !self.contains(x, y) {
            return None;
        }
        Some((
            (x as i64 - self.min_x as i64) as usize,
            (y as i64 - self.min_y as i64) as usize,
        ))
    }

    /// Shifts a vertex sequence, silently dropping points outside the bounds.
    /// Extra coordinates of the longer slice are ignored.
    pub fn shift_all(&self, xs: &[i32], ys: &[i32]) -> Vec<Cell> {
        xs.iter()
            .zip(ys)
            .filter_map(|(&x, &y)| self.shift(x, y))
            .collect()
    }
}
