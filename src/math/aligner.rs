//! Clipping of arbitrarily anchored 2-D arrays into a destination frame.
//!
//! Used to place the heightmap into the voxel grid and to align a previously
//! written map against the current one when computing changed blocks.

/// Dense row-major 2-D array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plane<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

/// Result of [`Plane::fit`]: the overlapping part of the source and the
/// destination-local position of its first cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fitted<T> {
    pub plane: Plane<T>,
    pub offset_x: usize,
    pub offset_y: usize,
}

impl<T: Copy> Plane<T> {
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Wraps row-major data; `None` if the length does not match.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Option<Self> {
        (data.len() == width * height).then_some(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[y * self.width + x]
    }

    #[inline]
    pub fn get_mut(&mut self, x: usize, y: usize) -> &mut T {
        &mut self.data[y * self.width + x]
    }

    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        // chunks_exact panics on 0; an empty plane simply has no rows.
        self.data.chunks_exact(self.width.max(1))
    }

    /// Clips this plane, anchored at world `src_min`, to a destination of
    /// `dst_size` anchored at world `dst_min`.
    ///
    /// With no overlap the returned plane is 0x0 and the offset is clamped
    /// into the destination; callers must tolerate empty results.
    pub fn fit(&self, src_min: (i64, i64), dst_min: (i64, i64), dst_size: (usize, usize)) -> Fitted<T> {
        let (skip_x, offset_x, keep_x) = clip_axis(src_min.0, self.width, dst_min.0, dst_size.0);
        let (skip_y, offset_y, keep_y) = clip_axis(src_min.1, self.height, dst_min.1, dst_size.1);

        let (keep_x, keep_y) = if keep_x == 0 || keep_y == 0 {
            (0, 0)
        } else {
            (keep_x, keep_y)
        };

        let mut data = Vec::with_capacity(keep_x * keep_y);
        for y in skip_y..skip_y + keep_y {
            let row = y * self.width + skip_x;
            data.extend_from_slice(&self.data[row..row + keep_x]);
        }

        Fitted {
            plane: Plane {
                width: keep_x,
                height: keep_y,
                data,
            },
            offset_x,
            offset_y,
        }
    }
}

/// One axis of [`Plane::fit`]: `(source cells to skip, destination offset, cells kept)`.
fn clip_axis(src_min: i64, src_len: usize, dst_min: i64, dst_len: usize) -> (usize, usize, usize) {
    let skip = (dst_min - src_min).max(0) as usize;
    let offset = (src_min - dst_min).max(0) as usize;
    if skip >= src_len || offset >= dst_len {
        return (0, offset.min(dst_len), 0);
    }
    let keep = (src_len - skip).min(dst_len - offset);
    (skip, offset, keep)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered(w: usize, h: usize) -> Plane<u8> {
        Plane::from_vec(w, h, (0..(w * h) as u8).collect()).unwrap()
    }

    #[test]
    fn test_fit_contained_is_identity() {
        let src = numbered(3, 2);
        let fitted = src.fit((12, 7), (10, 5), (10, 10));
        assert_eq!(fitted.plane, src);
        assert_eq!((fitted.offset_x, fitted.offset_y), (2, 2));
    }

    #[test]
    fn test_fit_no_overlap_is_empty() {
        let src = numbered(3, 3);
        for src_min in [(20, 0), (-10, 0), (0, 20), (0, -10)] {
            let fitted = src.fit(src_min, (0, 0), (10, 10));
            assert!(fitted.plane.is_empty(), "{:?}", src_min);
            assert_eq!(fitted.plane.width(), 0);
            assert_eq!(fitted.plane.height(), 0);
        }
    }

    #[test]
    fn test_fit_source_extends_left_and_below() {
        // Source starts 1 left and 2 below the destination origin.
        let src = numbered(4, 4);
        let fitted = src.fit((-1, -2), (0, 0), (10, 10));
        assert_eq!((fitted.offset_x, fitted.offset_y), (0, 0));
        assert_eq!((fitted.plane.width(), fitted.plane.height()), (3, 2));
        assert_eq!(fitted.plane.data(), &[9, 10, 11, 13, 14, 15]);
    }

    #[test]
    fn test_fit_source_extends_right_and_above() {
        let src = numbered(4, 4);
        let fitted = src.fit((2, 3), (0, 0), (5, 5));
        assert_eq!((fitted.offset_x, fitted.offset_y), (2, 3));
        assert_eq!((fitted.plane.width(), fitted.plane.height()), (3, 2));
        assert_eq!(fitted.plane.data(), &[0, 1, 2, 4, 5, 6]);
    }

    #[test]
    fn test_fit_source_covers_destination() {
        let src = numbered(5, 5);
        let fitted = src.fit((0, 0), (1, 1), (2, 3));
        assert_eq!((fitted.offset_x, fitted.offset_y), (0, 0));
        assert_eq!(fitted.plane.data(), &[6, 7, 11, 12, 16, 17]);
    }

    #[test]
    fn test_rows_of_empty_plane() {
        let empty: Plane<u8> = Plane::filled(0, 0, 0);
        assert_eq!(empty.rows().count(), 0);
        assert_eq!(numbered(2, 3).rows().count(), 3);
    }
}
