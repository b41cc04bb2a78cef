use byteorder::{LittleEndian as LE, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};

use crate::{deflate, inflate, invalid};

/// Raster heightmap anchored at `(min_x, min_y)` in world coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heightmap {
    pub min_x: i32,
    pub min_y: i32,
    pub size_x: u16,
    pub size_y: u16,
    /// Row-major (y, x), one height per cell.
    pub data: Vec<u8>,
}

impl Heightmap {
    #[inline]
    pub fn max_x(&self) -> i32 {
        self.min_x + self.size_x as i32 - 1
    }

    #[inline]
    pub fn max_y(&self) -> i32 {
        self.min_y + self.size_y as i32 - 1
    }
}

/// Reads a heightmap; the compressed body runs to the end of the stream.
pub fn read_heightmap<R: Read>(r: &mut R) -> io::Result<Heightmap> {
    let min_x = r.read_i32::<LE>()?;
    let min_y = r.read_i32::<LE>()?;
    let size_x = r.read_u16::<LE>()?;
    let size_y = r.read_u16::<LE>()?;

    let mut packed = Vec::new();
    r.read_to_end(&mut packed)?;
    let data = inflate(&packed, "heightmap")?;

    let expected = size_x as usize * size_y as usize;
    if data.len() != expected {
        return Err(invalid(format!(
            "heightmap has {} cells, header declares {}x{} = {}",
            data.len(),
            size_x,
            size_y,
            expected
        )));
    }

    Ok(Heightmap {
        min_x,
        min_y,
        size_x,
        size_y,
        data,
    })
}

pub fn write_heightmap<W: Write>(w: &mut W, hm: &Heightmap) -> io::Result<()> {
    if hm.data.len() != hm.size_x as usize * hm.size_y as usize {
        return Err(invalid("heightmap data length != size_x * size_y"));
    }
    w.write_i32::<LE>(hm.min_x)?;
    w.write_i32::<LE>(hm.min_y)?;
    w.write_u16::<LE>(hm.size_x)?;
    w.write_u16::<LE>(hm.size_y)?;
    w.write_all(&deflate(&hm.data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_heightmap_read() {
        let hm = Heightmap {
            min_x: -5,
            min_y: 100,
            size_x: 3,
            size_y: 2,
            data: vec![1, 2, 3, 4, 5, 6],
        };
        let mut buf = Vec::new();
        write_heightmap(&mut buf, &hm).unwrap();
        assert_eq!(&buf[..4], &(-5i32).to_le_bytes());

        let back = read_heightmap(&mut Cursor::new(buf)).unwrap();
        assert_eq!(back, hm);
        assert_eq!(back.max_x(), -3);
        assert_eq!(back.max_y(), 101);
    }

    #[test]
    fn test_heightmap_size_mismatch() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&0i32.to_le_bytes());
        buf.extend_from_slice(&0i32.to_le_bytes());
        buf.extend_from_slice(&4u16.to_le_bytes());
        buf.extend_from_slice(&4u16.to_le_bytes());
        buf.extend_from_slice(&deflate(&[0u8; 15]));

        let err = read_heightmap(&mut Cursor::new(buf)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
