//! # slosh_pixels
//!
//! Turns a [`slosh_field::Field`] into the flat pixel frame an LED
//! controller expects.
//!
//! * [`fullness`] — fullness value → color, via a fixed threshold table.
//! * [`board`] — which sub-rectangle of the grid each physical board shows,
//!   and in what order the boards' pixels go on the wire.
//! * [`procedural`] — the alternate cosine-wave color mode, gamma, and
//!   random noise frames.

pub mod fullness;
pub mod board;
pub mod procedural;

pub use palette::Srgb;

/// One LED's color.
pub type Rgb = Srgb<u8>;

pub const WHITE: Rgb = Srgb::new(255, 255, 255);
pub const BLACK: Rgb = Srgb::new(0, 0, 0);

pub use fullness::{normal_to_pixel, ColorGrid, FullnessPalette};
pub use board::{Board, BoardMap};
pub use procedural::{pixel_color, procedural_frame, random_frame};
