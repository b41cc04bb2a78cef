use super::{Rasterizer, FLAT_HEIGHT};
use log::info;

impl Rasterizer {
    /// Writes the ground layer: the clipped heightmap (optionally lowered by
    /// its minimum), or a flat plane at [`FLAT_HEIGHT`].
    pub(super) fn apply_terrain(&mut self) {
        match &self.heightmap {
            Some(fitted) if !self.options.flat => {
                let sub = if self.options.reduce_height {
                    fitted.plane.data().iter().copied().min().unwrap_or(0)
                } else {
                    0
                };
                self.height_sub = sub;
                self.grid
                    .write_heights(&fitted.plane, fitted.offset_x, fitted.offset_y, sub);
                info!(
                    "heightmap {}x{} placed at ({}, {}), lowered by {}",
                    fitted.plane.width(),
                    fitted.plane.height(),
                    fitted.offset_x,
                    fitted.offset_y,
                    sub
                );
            }
            _ => {
                self.height_sub = 0;
                self.grid.fill_height(FLAT_HEIGHT);
                info!("flat terrain at height {FLAT_HEIGHT}");
            }
        }
    }
}
