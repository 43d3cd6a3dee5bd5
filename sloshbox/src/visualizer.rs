//! On-screen preview of the LED grid using `minifb`.
//!
//! Each grid cell is drawn as a square block in its rendered color, with a
//! thin outline around every physical board so a misplaced board is easy to
//! spot.  `Q` or `Escape` closes the window.

use minifb::{Key, Window, WindowOptions};
use slosh_pixels::{BoardMap, ColorGrid, Rgb};

// ════════════════════════════════════════════════════════════════════════════
// Layout constants
// ════════════════════════════════════════════════════════════════════════════

const CELL:         usize = 40;
const GAP:          usize = 4;
const MARGIN:       usize = 20;
const BG_COLOR:     u32   = 0xFF1A1A2E;
const BOARD_BORDER: u32   = 0xFF0F3460;

/// `0x00RRGGBB` as minifb expects it.
pub fn pack_rgb(c: Rgb) -> u32 {
    (c.red as u32) << 16 | (c.green as u32) << 8 | c.blue as u32
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    buf:    Vec<u32>,
    width:  usize,
    height: usize,
    boards: BoardMap,
}

impl Visualizer {
    /// A window sized for a `grid_width × grid_height` grid.
    pub fn new(grid_width: usize, grid_height: usize, boards: BoardMap) -> Result<Self, String> {
        let width  = MARGIN * 2 + grid_width  * CELL;
        let height = MARGIN * 2 + grid_height * CELL;
        let mut window = Window::new(
            "Sloshbox — grid preview",
            width, height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| e.to_string())?;

        window.limit_update_rate(Some(std::time::Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; width * height],
            width,
            height,
            boards,
        })
    }

    /// Returns false when the window should close.
    pub fn is_open(&self) -> bool {
        self.window.is_open()
            && !self.window.is_key_down(Key::Escape)
            && !self.window.is_key_down(Key::Q)
    }

    /// Draw one frame.  Returns false once the window should close.
    pub fn render(&mut self, grid: &ColorGrid) -> bool {
        self.buf.fill(BG_COLOR);

        for y in 0..grid.height() {
            for x in 0..grid.width() {
                if let Some(c) = grid.get(x, y) {
                    let (px, py) = (MARGIN + x * CELL, MARGIN + y * CELL);
                    self.fill_rect(px + GAP / 2, py + GAP / 2, CELL - GAP, CELL - GAP, pack_rgb(c));
                }
            }
        }

        let boards: Vec<_> = self.boards.boards().to_vec();
        for b in boards {
            self.draw_border(
                MARGIN + b.origin_x * CELL,
                MARGIN + b.origin_y * CELL,
                b.width * CELL,
                b.height * CELL,
                BOARD_BORDER,
            );
        }

        self.window.update_with_buffer(&self.buf, self.width, self.height).ok();
        self.is_open()
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y + h).min(self.height) {
            for col in x..(x + w).min(self.width) {
                self.buf[row * self.width + col] = color;
            }
        }
    }

    fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        if w == 0 || h == 0 { return; }
        for col in x..(x + w).min(self.width) {
            if y < self.height         { self.buf[y * self.width + col] = color; }
            if y + h - 1 < self.height { self.buf[(y + h - 1) * self.width + col] = color; }
        }
        for row in y..(y + h).min(self.height) {
            if x < self.width          { self.buf[row * self.width + x] = color; }
            if x + w - 1 < self.width  { self.buf[row * self.width + x + w - 1] = color; }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slosh_pixels::Srgb;

    #[test]
    fn packs_channels_in_rgb_order() {
        assert_eq!(pack_rgb(Srgb::new(0x12, 0x34, 0x56)), 0x0012_3456);
        assert_eq!(pack_rgb(slosh_pixels::WHITE), 0x00FF_FFFF);
    }
}
