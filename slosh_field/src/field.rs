//! The persistent fullness field.
//!
//! A `width × height` grid of values in 0.0–1.0, stored row-major and
//! indexed `[y][x]`.  Waves force the cells under them to 1.0; the drain
//! pulls every cell back toward 0.0 each tick.  The field is never cleared,
//! which is what gives the waves their trails.

use crate::wave::Segment;

#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    width:  usize,
    height: usize,
    cells:  Vec<f32>,
}

impl Field {
    /// An all-zero field.  Zero dimensions are bumped to 1.
    pub fn new(width: usize, height: usize) -> Self {
        let width  = width.max(1);
        let height = height.max(1);
        Field { width, height, cells: vec![0.0; width * height] }
    }

    pub fn width(&self)  -> usize { self.width }
    pub fn height(&self) -> usize { self.height }

    /// Fullness at `(x, y)`, or `None` outside the grid.
    pub fn sample(&self, x: usize, y: usize) -> Option<f32> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x])
        } else {
            None
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f32]> + '_ {
        self.cells.chunks_exact(self.width)
    }

    /// True when every cell has drained to zero.
    pub fn is_dark(&self) -> bool {
        self.cells.iter().all(|&v| v == 0.0)
    }

    /// Force the cell nearest `(x, y)` to 1.0.  Points outside the grid are
    /// clamped onto the border.
    pub fn fill_clamped(&mut self, x: i64, y: i64) {
        let cx = x.clamp(0, self.width  as i64 - 1) as usize;
        let cy = y.clamp(0, self.height as i64 - 1) as usize;
        self.cells[cy * self.width + cx] = 1.0;
    }

    /// Stamp a segment into the field.  Returns the number of line points
    /// written (before clamping merged any of them).
    pub fn rasterize(&mut self, segment: &Segment) -> usize {
        let points = line_points(
            segment.x1.round() as i64, segment.y1.round() as i64,
            segment.x2.round() as i64, segment.y2.round() as i64,
        );
        for &(x, y) in &points {
            self.fill_clamped(x, y);
        }
        points.len()
    }

    /// `v ← max(0, v − amount)` for every cell.
    pub fn drain(&mut self, amount: f32) {
        for v in &mut self.cells {
            *v = (*v - amount).max(0.0);
        }
    }
}

/// Integer points on the line from `(x0, y0)` to `(x1, y1)`, both ends
/// included (Bresenham, all octants).
pub fn line_points(mut x0: i64, mut y0: i64, x1: i64, y1: i64) -> Vec<(i64, i64)> {
    let dx =  (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut out = Vec::with_capacity((dx.max(-dy) + 1) as usize);
    loop {
        out.push((x0, y0));
        if x0 == x1 && y0 == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0  += sx;
        }
        if e2 <= dx {
            err += dx;
            y0  += sy;
        }
    }
    out
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_points_horizontal_inclusive() {
        assert_eq!(line_points(1, 2, 4, 2), vec![(1, 2), (2, 2), (3, 2), (4, 2)]);
    }

    #[test]
    fn line_points_reversed_vertical() {
        assert_eq!(line_points(0, 3, 0, 0), vec![(0, 3), (0, 2), (0, 1), (0, 0)]);
    }

    #[test]
    fn line_points_diagonal_and_shallow() {
        assert_eq!(line_points(0, 0, 3, 3), vec![(0, 0), (1, 1), (2, 2), (3, 3)]);
        assert_eq!(line_points(0, 0, 4, 2), vec![(0, 0), (1, 1), (2, 1), (3, 2), (4, 2)]);
    }

    #[test]
    fn line_points_single_point() {
        assert_eq!(line_points(5, 5, 5, 5), vec![(5, 5)]);
    }

    #[test]
    fn rasterize_in_grid_sets_exactly_line_points() {
        let mut f = Field::new(16, 8);
        // half-drained cells off the line must keep their value
        let partial = [(0, 0), (15, 7), (0, 7), (12, 1)];
        for &(x, y) in &partial {
            f.fill_clamped(x, y);
        }
        f.drain(0.5);
        let seg = Segment::new(1.0, 1.0, 9.0, 5.0);
        f.rasterize(&seg);
        let expected = line_points(1, 1, 9, 5);
        for y in 0..8 {
            for x in 0..16 {
                let p = (x as i64, y as i64);
                let want = if expected.contains(&p) {
                    1.0
                } else if partial.contains(&p) {
                    0.5
                } else {
                    0.0
                };
                assert_eq!(f.sample(x, y), Some(want), "cell ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn rasterize_clamps_off_grid_points_to_border() {
        let mut f = Field::new(16, 8);
        // The LTR spawn line: x = -1, y from -1 to 8.
        f.rasterize(&Segment::new(-1.0, -1.0, -1.0, 8.0));
        for y in 0..8 {
            assert_eq!(f.sample(0, y), Some(1.0));
            assert_eq!(f.sample(1, y), Some(0.0));
        }
    }

    #[test]
    fn drain_floors_at_zero() {
        let mut f = Field::new(4, 4);
        f.fill_clamped(1, 1);
        f.drain(0.3);
        assert!((f.sample(1, 1).unwrap() - 0.7).abs() < 1e-6);
        for _ in 0..10 { f.drain(0.3); }
        assert_eq!(f.sample(1, 1), Some(0.0));
        assert!(f.is_dark());
    }

    #[test]
    fn drain_on_dark_field_is_idempotent() {
        let mut f = Field::new(16, 8);
        for _ in 0..5 { f.drain(0.1); }
        assert!(f.is_dark());
        assert_eq!(f, Field::new(16, 8));
    }

    #[test]
    fn rows_are_indexed_by_y() {
        let mut f = Field::new(3, 2);
        f.fill_clamped(2, 1);
        let rows: Vec<&[f32]> = f.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], &[0.0_f32, 0.0, 1.0][..]);
        assert_eq!(rows[0], &[0.0_f32; 3][..]);
    }

    #[test]
    fn sample_outside_is_none() {
        let f = Field::new(3, 2);
        assert_eq!(f.sample(3, 0), None);
        assert_eq!(f.sample(0, 2), None);
    }
}
