//! Grayscale PNG dumps of the first three layers, for eyeballing a map.

use crate::voxel::VoxelGrid;
use image::{GrayImage, Luma};
use log::{debug, info, warn};
use std::path::Path;

/// File stems of the exported layers, indexed by layer.
pub const LAYER_IMAGES: [&str; 3] = ["layer0_height", "layer1_surface", "layer2_deco"];

/// Largest raw value of `layer`, at least 1.
pub fn layer_max(grid: &VoxelGrid, layer: usize) -> u8 {
    grid.columns()
        .data()
        .iter()
        .map(|c| c[layer])
        .max()
        .unwrap_or(0)
        .max(1)
}

/// Layer stretched to the full gray range, north up (grid y flipped).
pub fn layer_image(grid: &VoxelGrid, layer: usize) -> GrayImage {
    let scale = 255 / layer_max(grid, layer) as u16;
    let (w, h) = (grid.size_x() as u32, grid.size_y() as u32);
    GrayImage::from_fn(w, h, |x, y| {
        let v = grid.column(x as usize, (h - 1 - y) as usize)[layer] as u16;
        Luma([(v * scale) as u8])
    })
}

/// Logs every layer maximum and, when `dir` is given, writes the images.
/// Failures to write are reported but never abort the run.
pub fn export_layers(grid: &VoxelGrid, dir: Option<&Path>) {
    for (layer, name) in LAYER_IMAGES.iter().enumerate() {
        debug!("{name} max value: {}", layer_max(grid, layer));
        let Some(dir) = dir else {
            continue;
        };
        if grid.size_x() == 0 || grid.size_y() == 0 {
            continue;
        }
        let path = dir.join(format!("{name}.png"));
        match layer_image(grid, layer).save(&path) {
            Ok(()) => info!("wrote {}", path.display()),
            Err(err) => warn!("failed to write {}: {err}", path.display()),
        }
    }
}
