//! VMAP: compact voxel terrain map format plus the binary inputs it is built from.
//!
//! - Map file: 4 bytes per column (height, surface, deco/building bottom,
//!   building top), zlib compressed, with an optional changed-block list
//!   for incremental updates.
//! - Heightmap input: one byte per cell, zlib compressed.
//! - Building input: per building, named groups of 3-D integer points.
//!
//! Map file layout (little-endian):
//!   00  : u8   version = 1
//!   01  : u8   min_compatible_version = 1
//!   02  : u8   layer_count = 4
//!   03  : u8   height_at_spawn
//!   04  : u16  offset_x
//!   06  : u16  offset_z
//!   08  : u16  size_x
//!   0A  : u16  size_y
//!   0C  : u32  grid_len
//!   ..  : [u8; grid_len]    zlib(grid bytes, row-major y, x, layer)
//!   ..  : u32  blocks_len   (0 when not incremental)
//!   ..  : [u8; blocks_len]  zlib(repeated [i16 block_x][i16 block_z])
//!
//! Heightmap layout:
//!   i32 min_x, i32 min_y, u16 size_x, u16 size_y, zlib(size_y * size_x bytes)
//!
//! Building layout:
//!   u32 count, u8 flag (= 0), then per building repeated
//!   [u8 name_len][name][u32 pos_count][(i32 x, i32 y, i32 z) * pos_count]
//!   terminated by name_len = 0.

pub mod buildings;
pub mod heightmap;
pub mod map;

pub use buildings::{read_buildings, write_buildings, ColumnBuilding, ColumnGroup, GroupKind};
pub use heightmap::{read_heightmap, write_heightmap, Heightmap};
pub use map::{
    decode_blocks, encode_blocks, read_body, read_file, read_header, read_map, write_file, write_map,
    BlockPos, MapFile,
    MapHeader, LAYER_COUNT, MAP_MIN_COMPATIBLE_VERSION, MAP_VERSION,
};

use miniz_oxide::deflate::compress_to_vec_zlib;
use miniz_oxide::inflate::decompress_to_vec_zlib;
use std::io::{self, ErrorKind};

/// zlib level used for every compressed stream.
pub const COMPRESSION_LEVEL: u8 = 9;

#[inline]
pub(crate) fn deflate(raw: &[u8]) -> Vec<u8> {
    compress_to_vec_zlib(raw, COMPRESSION_LEVEL)
}

#[inline]
pub(crate) fn inflate(data: &[u8], what: &str) -> io::Result<Vec<u8>> {
    decompress_to_vec_zlib(data).map_err(|e| {
        io::Error::new(
            ErrorKind::InvalidData,
            format!("{} zlib inflate failed: {:?}", what, e.status),
        )
    })
}

#[inline]
pub(crate) fn invalid(msg: impl Into<String>) -> io::Error {
    io::Error::new(ErrorKind::InvalidData, msg.into())
}
