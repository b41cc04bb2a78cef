//! Integer scan conversion of lines and polygons onto the column grid.
//!
//! All outputs are deterministic: cell order depends only on the input
//! vertices, never on hashing.

use super::bounds::Cell;
use std::collections::BTreeSet;

/// Cells of the segment `a -> b`, both endpoints included, walked from `a`.
///
/// Integer Bresenham over the major axis; the minor axis steps while the
/// error term is non-negative, so ties round away from `a`.
pub fn line(a: Cell, b: Cell) -> Vec<Cell> {
    let (mut r, mut c) = (a.0 as i64, a.1 as i64);
    let (r1, c1) = (b.0 as i64, b.1 as i64);

    let mut dr = (r1 - r).abs();
    let mut dc = (c1 - c).abs();
    let mut sc = if c1 - c > 0 { 1 } else { -1 };
    let mut sr = if r1 - r > 0 { 1 } else { -1 };

    let steep = dr > dc;
    if steep {
        std::mem::swap(&mut r, &mut c);
        std::mem::swap(&mut dr, &mut dc);
        std::mem::swap(&mut sr, &mut sc);
    }

    let mut d = 2 * dr - dc;
    let mut out = Vec::with_capacity(dc as usize + 1);
    for _ in 0..dc {
        let cell = if steep { (c, r) } else { (r, c) };
        out.push((cell.0 as usize, cell.1 as usize));
        while d >= 0 {
            r += sr;
            d -= 2 * dc;
        }
        c += sc;
        d += 2 * dr;
    }
    out.push(b);
    out
}

/// Cells covered by the polygon interior (even-odd rule on cell centres),
/// including cells lying exactly on an edge. Clipped to `width x height`;
/// visited row by row, then column by column.
pub fn polygon(vertices: &[Cell], width: usize, height: usize) -> Vec<Cell> {
    if vertices.len() < 3 || width == 0 || height == 0 {
        return Vec::new();
    }

    let pts: Vec<(i64, i64)> = vertices.iter().map(|&(x, y)| (x as i64, y as i64)).collect();
    let (mut xmin, mut ymin, mut xmax, mut ymax) = (i64::MAX, i64::MAX, i64::MIN, i64::MIN);
    for &(x, y) in &pts {
        xmin = xmin.min(x);
        xmax = xmax.max(x);
        ymin = ymin.min(y);
        ymax = ymax.max(y);
    }
    let xmax = xmax.min(width as i64 - 1);
    let ymax = ymax.min(height as i64 - 1);

    let mut out = Vec::new();
    for y in ymin.max(0)..=ymax {
        for x in xmin.max(0)..=xmax {
            if on_boundary(&pts, x, y) || crosses_odd(&pts, x, y) {
                out.push((x as usize, y as usize));
            }
        }
    }
    out
}

fn crosses_odd(poly: &[(i64, i64)], x: i64, y: i64) -> bool {
    let mut inside = false;
    let mut j = poly.len() - 1;
    for i in 0..poly.len() {
        let (xi, yi) = poly[i];
        let (xj, yj) = poly[j];
        if (yi > y) != (yj > y) {
            // x < xi + (xj - xi) * (y - yi) / (yj - yi), without division.
            let lhs = (x - xi) * (yj - yi);
            let rhs = (xj - xi) * (y - yi);
            let left_of_edge = if yj > yi { lhs < rhs } else { lhs > rhs };
            if left_of_edge {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

fn on_boundary(poly: &[(i64, i64)], x: i64, y: i64) -> bool {
    let mut j = poly.len() - 1;
    for i in 0..poly.len() {
        let (xi, yi) = poly[i];
        let (xj, yj) = poly[j];
        let cross = (xj - xi) * (y - yi) - (yj - yi) * (x - xi);
        if cross == 0
            && x >= xi.min(xj)
            && x <= xi.max(xj)
            && y >= yi.min(yj)
            && y <= yi.max(yj)
        {
            return true;
        }
        j = i;
    }
    false
}

/// Outline of the closed polygon through `vertices`, each cell once, in
/// drawing order.
pub fn polygon_perimeter(vertices: &[Cell]) -> Vec<Cell> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    let n = vertices.len();
    for i in 0..n {
        let a = vertices[i];
        let b = vertices[(i + 1) % n];
        for cell in line(a, b) {
            if seen.insert(cell) {
                out.push(cell);
            }
        }
    }
    out
}

// Literal road cross sections per width class. The width-6 table is
// asymmetric and repeats two offsets; keep it verbatim.
const KERNEL_3: &[(i64, i64)] = &[(0, 1), (-1, 0), (0, 0), (1, 0), (0, -1)];

#[rustfmt::skip]
const KERNEL_4: &[(i64, i64)] = &[
    (-1, 1), (0, 1), (1, 1),
    (-1, 0), (0, 0), (1, 0),
    (-1, -1), (0, -1), (1, -1),
];

#[rustfmt::skip]
const KERNEL_5: &[(i64, i64)] = &[
    (0, 2),
    (-1, 1), (0, 1), (1, 1),
    (-2, 0), (-1, 0), (0, 0), (1, 0), (2, 0),
    (-1, -1), (0, -1), (1, -1),
    (0, -2),
];

#[rustfmt::skip]
const KERNEL_6: &[(i64, i64)] = &[
    (-1, 1), (0, 2), (1, 2),
    (-2, 1), (-1, 1), (0, 1), (1, 1), (2, 1),
    (-2, 0), (-1, 0), (0, 0), (1, 0), (2, 0),
    (-2, -1), (-1, -1), (0, -1), (1, -1), (2, -1),
    (-1, -2), (0, -2), (1, 2),
];

/// Offset kernel for a road width class; widths outside 3..=6 have none.
pub fn width_kernel(width: u8) -> Option<&'static [(i64, i64)]> {
    match width {
        3 => Some(KERNEL_3),
        4 => Some(KERNEL_4),
        5 => Some(KERNEL_5),
        6 => Some(KERNEL_6),
        _ => None,
    }
}

/// Widens a centre line by the kernel for `width`, clipped to the grid.
///
/// Width 1 (or any width without a kernel) returns the centre line as is.
/// The result is sorted by `(x, y)` and free of duplicates.
pub fn widen(centre: &[Cell], width: u8, grid_w: usize, grid_h: usize) -> Vec<Cell> {
    let Some(kernel) = width_kernel(width) else {
        return centre.to_vec();
    };

    let mut cells = BTreeSet::new();
    for &(x, y) in centre {
        for &(dx, dy) in kernel {
            let (nx, ny) = (x as i64 + dx, y as i64 + dy);
            if nx >= 0 && ny >= 0 && (nx as usize) < grid_w && (ny as usize) < grid_h {
                cells.insert((nx as usize, ny as usize));
            }
        }
    }
    cells.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_endpoints_and_length() {
        let cells = line((0, 0), (4, 2));
        assert_eq!(cells.first(), Some(&(0, 0)));
        assert_eq!(cells.last(), Some(&(4, 2)));
        assert_eq!(cells.len(), 5);

        let steep = line((1, 5), (2, 0));
        assert_eq!(steep.len(), 6);
        assert_eq!(steep.first(), Some(&(1, 5)));
        assert_eq!(steep.last(), Some(&(2, 0)));
    }

    #[test]
    fn test_line_axis_aligned_and_point() {
        assert_eq!(line((3, 1), (0, 1)), vec![(3, 1), (2, 1), (1, 1), (0, 1)]);
        assert_eq!(line((2, 2), (2, 2)), vec![(2, 2)]);
    }

    #[test]
    fn test_line_is_connected() {
        let cells = line((0, 0), (7, 3));
        for w in cells.windows(2) {
            let dx = (w[0].0 as i64 - w[1].0 as i64).abs();
            let dy = (w[0].1 as i64 - w[1].1 as i64).abs();
            assert!(dx <= 1 && dy <= 1, "{:?}", w);
        }
    }

    #[test]
    fn test_polygon_square_includes_edges() {
        let square = [(1, 1), (3, 1), (3, 3), (1, 3)];
        let cells = polygon(&square, 10, 10);
        assert_eq!(cells.len(), 9);
        assert_eq!(cells.first(), Some(&(1, 1)));
        assert_eq!(cells.last(), Some(&(3, 3)));
    }

    #[test]
    fn test_polygon_triangle() {
        let tri = [(0, 0), (4, 0), (0, 4)];
        let cells = polygon(&tri, 10, 10);
        // Cells with x + y <= 4.
        assert_eq!(cells.len(), 15);
        assert!(cells.iter().all(|&(x, y)| x + y <= 4));
    }

    #[test]
    fn test_polygon_clipped_to_grid() {
        let square = [(0, 0), (9, 0), (9, 9), (0, 9)];
        let cells = polygon(&square, 4, 3);
        assert_eq!(cells.len(), 12);
    }

    #[test]
    fn test_polygon_degenerate() {
        assert!(polygon(&[(0, 0), (1, 1)], 10, 10).is_empty());
    }

    #[test]
    fn test_perimeter_unique_cells() {
        let square = [(0, 0), (2, 0), (2, 2), (0, 2)];
        let cells = polygon_perimeter(&square);
        assert_eq!(cells.len(), 8);
        assert!(!cells.contains(&(1, 1)));
    }

    #[test]
    fn test_widen_kernels() {
        assert_eq!(widen(&[(5, 5)], 3, 10, 10).len(), 5);
        assert_eq!(widen(&[(5, 5)], 4, 10, 10).len(), 9);
        assert_eq!(widen(&[(5, 5)], 5, 10, 10).len(), 13);
        // Asymmetric width-6 table: 21 offsets, 19 distinct.
        assert_eq!(widen(&[(5, 5)], 6, 10, 10).len(), 19);
        assert_eq!(widen(&[(5, 5)], 1, 10, 10), vec![(5, 5)]);
    }

    #[test]
    fn test_widen_clips_to_grid() {
        let cells = widen(&[(0, 0)], 3, 2, 2);
        assert_eq!(cells, vec![(0, 0), (0, 1), (1, 0)]);
    }
}
