//! Procedural colors straight from coordinates and time.
//!
//! Each channel is a cosine over one spatial axis (x → red, y → green,
//! z → blue), drifting with time.  Not driven by the field at all; kept as
//! an alternate mode for checking a new layout on the real hardware.

use std::f32::consts::PI;

use palette::Srgb;
use rand::Rng;

use crate::Rgb;

/// Exponent applied on physical LEDs.
pub const LED_GAMMA: f32 = 2.2;

/// Spatial period of the cosine, in layout units.
const PERIOD: f32 = 2.0;

/// Cosine of `x` remapped from −1..1 to `min..max`.  `offset` shifts the
/// phase in whole periods.
pub fn cos_wave(x: f32, offset: f32, period: f32, min: f32, max: f32) -> f32 {
    let v = ((x / period - offset) * 2.0 * PI).cos() / 2.0 + 0.5;
    v * (max - min) + min
}

/// Power-law gamma on a 0.0–1.0 color.  Negative channels go to zero.
pub fn gamma(c: Srgb<f32>, exponent: f32) -> Srgb<f32> {
    Srgb::new(
        c.red.max(0.0).powf(exponent),
        c.green.max(0.0).powf(exponent),
        c.blue.max(0.0).powf(exponent),
    )
}

/// Color of the pixel at `coord` at time `t` (seconds).  `live` applies
/// [`LED_GAMMA`]; leave it off for on-screen simulators.
pub fn pixel_color(t: f32, coord: [f32; 3], live: bool) -> Rgb {
    let [x, y, z] = coord;
    let offset = t / 4.0;
    let mut c = Srgb::new(
        cos_wave(x, offset, PERIOD, 0.0, 1.0),
        cos_wave(y, offset, PERIOD, 0.0, 1.0),
        cos_wave(z, offset, PERIOD, 0.0, 1.0),
    );
    if live {
        c = gamma(c, LED_GAMMA);
    }
    c.into_format::<u8>()
}

/// A frame with one pixel per layout coordinate.
pub fn procedural_frame(coords: &[[f32; 3]], t: f32, time_scale: f32, live: bool) -> Vec<Rgb> {
    coords.iter().map(|&c| pixel_color(t * time_scale, c, live)).collect()
}

/// `n` uniformly random colors.
pub fn random_frame<R: Rng>(rng: &mut R, n: usize) -> Vec<Rgb> {
    (0..n).map(|_| Srgb::new(rng.gen(), rng.gen(), rng.gen())).collect()
}
