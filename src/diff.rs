//! Changed-block list between a freshly generated grid and the map file it
//! replaces.
//!
//! Both grids are compared in the absolute (spawn-relative) frame: grid cell
//! `(x, y)` of a map with offset `(ox, oz)` sits at `(x - ox, y - oz)`. Blocks
//! are 16x16 columns aligned to that frame.

use crate::error::{MapGenError, Result};
use crate::math::Plane;
use crate::voxel::{Column, VoxelGrid, LAYER_COUNT};
use log::{debug, info};
use std::io;
use vmap::{BlockPos, MapFile, MapHeader, MAP_VERSION};

pub const BLOCK_SIZE: i64 = 16;

/// Range every persisted block coordinate must stay in.
pub const BLOCK_MIN: i64 = -16384;
pub const BLOCK_MAX: i64 = 16383;

/// Blocks of `grid` (placed at `offset`) whose content differs from `previous`.
///
/// Order is block x outer, block z inner.
pub fn changed_blocks(grid: &VoxelGrid, offset: (u16, u16), previous: &MapFile) -> Result<Vec<BlockPos>> {
    let old = previous_in_frame(previous, offset, (grid.size_x(), grid.size_y()))?;

    let (w, h) = (grid.size_x() as i64, grid.size_y() as i64);
    let (off_x, off_z) = (offset.0 as i64, offset.1 as i64);
    let first_x = (-off_x).div_euclid(BLOCK_SIZE);
    let last_x = (-off_x + w).div_euclid(BLOCK_SIZE);
    let first_z = (-off_z).div_euclid(BLOCK_SIZE);
    let last_z = (-off_z + h).div_euclid(BLOCK_SIZE);
    debug!("checking blocks from {first_x},{first_z} to {last_x},{last_z} for changes");

    let mut changed = Vec::new();
    for block_x in first_x..=last_x {
        let xs = block_span(block_x, off_x, w);
        for block_z in first_z..=last_z {
            let zs = block_span(block_z, off_z, h);
            let differs = zs.clone().any(|z| {
                xs.clone()
                    .any(|x| grid.column(x, z) != old.get(x, z))
            });
            if differs {
                changed.push(block_pos(block_x, block_z)?);
            }
        }
    }

    info!(
        "{} changed blocks{}",
        changed.len(),
        match changed.first() {
            Some(b) => format!(", first at {},{}", b.x, b.z),
            None => String::new(),
        }
    );
    Ok(changed)
}

/// Grid cells of one block along an axis, clipped to the grid.
fn block_span(block: i64, offset: i64, len: i64) -> std::ops::Range<usize> {
    let start = (block * BLOCK_SIZE + offset).clamp(0, len);
    let end = (block * BLOCK_SIZE + offset + BLOCK_SIZE).clamp(0, len);
    start as usize..end as usize
}

fn block_pos(block_x: i64, block_z: i64) -> Result<BlockPos> {
    let fits = |b: i64| (BLOCK_MIN..=BLOCK_MAX).contains(&b);
    if !fits(block_x) || !fits(block_z) {
        return Err(MapGenError::BlockOutOfRange { block_x, block_z });
    }
    Ok(BlockPos {
        x: block_x as i16,
        z: block_z as i16,
    })
}

/// Fails when the previous map needs a newer reader than this one.
pub fn check_compatible(header: &MapHeader) -> Result<()> {
    if header.min_compatible_version > MAP_VERSION {
        return Err(MapGenError::IncompatibleVersion {
            supported: MAP_VERSION,
            required: header.min_compatible_version,
        });
    }
    Ok(())
}

/// The previous map's columns re-anchored into the new grid's frame and
/// shape; cells it does not cover are zero.
fn previous_in_frame(previous: &MapFile, offset: (u16, u16), size: (usize, usize)) -> Result<Plane<Column>> {
    let header = &previous.header;
    check_compatible(header)?;
    let mismatch = || io::Error::new(io::ErrorKind::InvalidData, "previous map grid does not match its header");
    if previous.grid.len() != header.grid_len() {
        return Err(mismatch().into());
    }

    let layers = header.layer_count as usize;
    if layers != LAYER_COUNT {
        debug!("previous map has {layers} layers, padding to {LAYER_COUNT}");
    }
    let kept = layers.min(LAYER_COUNT);
    let (old_w, old_h) = (header.size_x as usize, header.size_y as usize);
    let mut bytes = vec![0u8; old_w * old_h * LAYER_COUNT];
    if kept > 0 {
        for (dst, src) in bytes.chunks_exact_mut(LAYER_COUNT).zip(previous.grid.chunks_exact(layers)) {
            dst[..kept].copy_from_slice(&src[..kept]);
        }
    }
    let old = VoxelGrid::from_bytes(old_w, old_h, &bytes)
        .ok_or_else(mismatch)?
        .into_columns();

    let fitted = old.fit(
        (-(header.offset_x as i64), -(header.offset_z as i64)),
        (-(offset.0 as i64), -(offset.1 as i64)),
        size,
    );

    let mut aligned = Plane::filled(size.0, size.1, [0u8; LAYER_COUNT]);
    for (y, row) in fitted.plane.rows().enumerate() {
        for (x, col) in row.iter().enumerate() {
            *aligned.get_mut(fitted.offset_x + x, fitted.offset_y + y) = *col;
        }
    }
    Ok(aligned)
}
