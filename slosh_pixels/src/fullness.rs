//! Fullness → color.
//!
//! A full cell is white; below that the color steps down through four
//! shades of the installation's violet, and anything at or below the
//! lowest threshold is black.

use palette::Srgb;
use slosh_field::Field;

use crate::{Rgb, BLACK, WHITE};

/// Threshold table.  `steps` must be ordered by descending threshold.
#[derive(Clone, Debug, PartialEq)]
pub struct FullnessPalette {
    pub full:  Rgb,
    /// `(threshold, color)`: used when `v > threshold`.
    pub steps: [(f32, Rgb); 4],
    pub empty: Rgb,
}

impl FullnessPalette {
    /// `#3C2BD4` and three darker versions of it.
    pub const fn violet() -> Self {
        FullnessPalette {
            full:  WHITE,
            steps: [
                (0.8, Srgb::new(60, 43, 212)),
                (0.6, Srgb::new(39, 28, 138)),
                (0.4, Srgb::new(25, 18, 90)),
                (0.2, Srgb::new(12, 9, 43)),
            ],
            empty: BLACK,
        }
    }

    pub fn color_for(&self, v: f32) -> Rgb {
        if v >= 1.0 {
            return self.full;
        }
        self.steps
            .iter()
            .find(|(threshold, _)| v > *threshold)
            .map(|&(_, c)| c)
            .unwrap_or(self.empty)
    }
}

impl Default for FullnessPalette {
    fn default() -> Self { FullnessPalette::violet() }
}

/// Color for one fullness value with the default palette.
pub fn normal_to_pixel(v: f32) -> Rgb {
    FullnessPalette::violet().color_for(v)
}

// ════════════════════════════════════════════════════════════════════════════
// ColorGrid
// ════════════════════════════════════════════════════════════════════════════

/// Per-cell colors for the logical grid, row-major like [`Field`].
#[derive(Clone, Debug, PartialEq)]
pub struct ColorGrid {
    width:  usize,
    height: usize,
    cells:  Vec<Rgb>,
}

impl ColorGrid {
    pub fn from_field(field: &Field, palette: &FullnessPalette) -> Self {
        let cells = field
            .rows()
            .flat_map(|row| row.iter().map(|&v| palette.color_for(v)))
            .collect();
        ColorGrid { width: field.width(), height: field.height(), cells }
    }

    pub fn width(&self)  -> usize { self.width }
    pub fn height(&self) -> usize { self.height }

    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x])
        } else {
            None
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use slosh_field::Segment;

    fn brightness(c: Rgb) -> u32 {
        c.red as u32 + c.green as u32 + c.blue as u32
    }

    #[test]
    fn full_is_white_empty_is_black() {
        assert_eq!(normal_to_pixel(1.0), WHITE);
        assert_eq!(normal_to_pixel(0.0), BLACK);
    }

    #[test]
    fn bucket_edges() {
        assert_eq!(normal_to_pixel(0.95), Srgb::new(60, 43, 212));
        assert_eq!(normal_to_pixel(0.8),  Srgb::new(39, 28, 138));
        assert_eq!(normal_to_pixel(0.5),  Srgb::new(25, 18, 90));
        assert_eq!(normal_to_pixel(0.3),  Srgb::new(12, 9, 43));
        assert_eq!(normal_to_pixel(0.2),  BLACK);
    }

    #[test]
    fn brightness_is_monotonic_in_fullness() {
        let mut prev = 0;
        for i in 0..=100 {
            let b = brightness(normal_to_pixel(i as f32 / 100.0));
            assert!(b >= prev, "darker at {}", i);
            prev = b;
        }
    }

    #[test]
    fn grid_follows_field_rows() {
        let mut f = Field::new(4, 2);
        f.rasterize(&Segment::new(0.0, 1.0, 3.0, 1.0));
        let g = ColorGrid::from_field(&f, &FullnessPalette::default());
        assert_eq!((g.width(), g.height()), (4, 2));
        assert_eq!(g.get(2, 1), Some(WHITE));
        assert_eq!(g.get(2, 0), Some(BLACK));
        assert_eq!(g.get(4, 0), None);
    }
}
