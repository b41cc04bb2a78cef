use byteorder::{LittleEndian as LE, ReadBytesExt, WriteBytesExt};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::{deflate, inflate, invalid};

pub const MAP_VERSION: u8 = 1;
pub const MAP_MIN_COMPATIBLE_VERSION: u8 = 1;
pub const LAYER_COUNT: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapHeader {
    pub version: u8,
    pub min_compatible_version: u8,
    pub layer_count: u8,
    pub height_at_spawn: u8,
    pub offset_x: u16,
    pub offset_z: u16,
    pub size_x: u16,
    pub size_y: u16,
}

impl MapHeader {
    /// Header for a file written by this crate.
    pub fn current(height_at_spawn: u8, offset: (u16, u16), size: (u16, u16)) -> Self {
        Self {
            version: MAP_VERSION,
            min_compatible_version: MAP_MIN_COMPATIBLE_VERSION,
            layer_count: LAYER_COUNT,
            height_at_spawn,
            offset_x: offset.0,
            offset_z: offset.1,
            size_x: size.0,
            size_y: size.1,
        }
    }

    #[inline]
    pub fn grid_len(&self) -> usize {
        self.size_x as usize * self.size_y as usize * self.layer_count as usize
    }
}

/// 16x16 column block, addressed relative to the spawn point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockPos {
    pub x: i16,
    pub z: i16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapFile {
    pub header: MapHeader,
    /// Uncompressed grid bytes, `size_y * size_x * layer_count`.
    pub grid: Vec<u8>,
    /// `None` for a full (non-incremental) map.
    pub changed_blocks: Option<Vec<BlockPos>>,
}

pub fn read_file<P: AsRef<Path>>(path: P) -> io::Result<MapFile> {
    let f = File::open(path)?;
    read_map(&mut BufReader::new(f))
}

pub fn write_file<P: AsRef<Path>>(path: P, map: &MapFile) -> io::Result<()> {
    let f = File::create(path)?;
    let mut w = BufWriter::new(f);
    write_map(&mut w, map)?;
    w.flush()
}

pub fn read_map<R: Read>(r: &mut R) -> io::Result<MapFile> {
    let header = read_header(r)?;
    read_body(r, header)
}

/// Fixed 12-byte header only; lets callers check versions before the
/// compressed sections are touched.
pub fn read_header<R: Read>(r: &mut R) -> io::Result<MapHeader> {
    Ok(MapHeader {
        version: r.read_u8()?,
        min_compatible_version: r.read_u8()?,
        layer_count: r.read_u8()?,
        height_at_spawn: r.read_u8()?,
        offset_x: r.read_u16::<LE>()?,
        offset_z: r.read_u16::<LE>()?,
        size_x: r.read_u16::<LE>()?,
        size_y: r.read_u16::<LE>()?,
    })
}

/// Grid and changed blocks following a header read by [`read_header`].
pub fn read_body<R: Read>(r: &mut R, header: MapHeader) -> io::Result<MapFile> {
    let grid_len = r.read_u32::<LE>()? as usize;
    let mut packed = vec![0u8; grid_len];
    r.read_exact(&mut packed)?;
    let grid = inflate(&packed, "grid")?;
    if grid.len() != header.grid_len() {
        return Err(invalid(format!(
            "grid has {} bytes, header declares {}x{}x{} = {}",
            grid.len(),
            header.size_x,
            header.size_y,
            header.layer_count,
            header.grid_len()
        )));
    }

    let blocks_len = r.read_u32::<LE>()? as usize;
    let changed_blocks = if blocks_len == 0 {
        None
    } else {
        let mut packed = vec![0u8; blocks_len];
        r.read_exact(&mut packed)?;
        Some(decode_blocks(&inflate(&packed, "changed blocks")?)?)
    };

    Ok(MapFile {
        header,
        grid,
        changed_blocks,
    })
}

pub fn write_map<W: Write>(w: &mut W, map: &MapFile) -> io::Result<()> {
    let h = &map.header;
    if map.grid.len() != h.grid_len() {
        return Err(invalid(format!(
            "grid has {} bytes, header declares {}",
            map.grid.len(),
            h.grid_len()
        )));
    }

    w.write_u8(h.version)?;
    w.write_u8(h.min_compatible_version)?;
    w.write_u8(h.layer_count)?;
    w.write_u8(h.height_at_spawn)?;
    w.write_u16::<LE>(h.offset_x)?;
    w.write_u16::<LE>(h.offset_z)?;
    w.write_u16::<LE>(h.size_x)?;
    w.write_u16::<LE>(h.size_y)?;

    let grid = deflate(&map.grid);
    w.write_u32::<LE>(grid.len() as u32)?;
    w.write_all(&grid)?;

    match map.changed_blocks.as_deref() {
        Some(blocks) => {
            let packed = deflate(&encode_blocks(blocks));
            w.write_u32::<LE>(packed.len() as u32)?;
            w.write_all(&packed)?;
        }
        None => w.write_u32::<LE>(0)?,
    }

    Ok(())
}

/// Raw (uncompressed) changed-block payload.
pub fn encode_blocks(blocks: &[BlockPos]) -> Vec<u8> {
    let mut out = Vec::with_capacity(blocks.len() * 4);
    for b in blocks {
        out.extend_from_slice(&b.x.to_le_bytes());
        out.extend_from_slice(&b.z.to_le_bytes());
    }
    out
}

pub fn decode_blocks(raw: &[u8]) -> io::Result<Vec<BlockPos>> {
    if raw.len() % 4 != 0 {
        return Err(invalid("changed block payload truncated"));
    }
    Ok(raw
        .chunks_exact(4)
        .map(|c| BlockPos {
            x: i16::from_le_bytes([c[0], c[1]]),
            z: i16::from_le_bytes([c[2], c[3]]),
        })
        .collect())
}
