//! Acceleration samples and the tilt angles derived from them.

use std::f32::consts::PI;

/// Magnitudes at or below this are treated as zero when dividing.
pub const MAGNITUDE_EPSILON: f32 = 1e-6;

/// Factor folded into the angle denominators.
const DEG_PER_RAD: f32 = 180.0 / PI;

/// One accelerometer reading, in g.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Acceleration {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Acceleration {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Acceleration { x, y, z }
    }

    /// The same value on every axis.
    pub const fn uniform(v: f32) -> Self {
        Acceleration { x: v, y: v, z: v }
    }

    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Clamp each axis into `[-limit, limit]`.
    pub fn clamped(self, limit: f32) -> Self {
        Acceleration {
            x: self.x.clamp(-limit, limit),
            y: self.y.clamp(-limit, limit),
            z: self.z.clamp(-limit, limit),
        }
    }

    /// Roll and pitch for this sample.
    pub fn orientation(&self) -> Orientation {
        let pitch = self.y.atan2(self.z * DEG_PER_RAD);
        let roll  = (-self.x).atan2((self.y * self.y + self.z * self.z).sqrt() * DEG_PER_RAD);
        Orientation { roll, pitch }
    }
}

/// Tilt angles in radians, each in (−π, π].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Orientation {
    pub roll:  f32,
    pub pitch: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn magnitude_of_3_4_0() {
        assert!((Acceleration::new(3.0, 4.0, 0.0).magnitude() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn flat_device_has_no_tilt() {
        let o = Acceleration::new(0.0, 0.0, 1.0).orientation();
        assert_eq!(o.roll, 0.0);
        assert_eq!(o.pitch, 0.0);
    }

    #[test]
    fn pitch_uses_scaled_denominator() {
        let o = Acceleration::new(0.0, 6.0, 8.0).orientation();
        let expected = 6.0_f32.atan2(8.0 * (180.0 / PI));
        assert_eq!(o.pitch, expected);
        assert!(o.pitch > 0.0 && o.pitch < PI);
    }

    #[test]
    fn zero_sample_is_finite() {
        let a = Acceleration::default();
        let o = a.orientation();
        assert!(o.roll.is_finite() && o.pitch.is_finite());
    }

    #[test]
    fn clamped_limits_each_axis() {
        let a = Acceleration::new(20.0, -13.0, 1.0).clamped(12.0);
        assert_eq!(a, Acceleration::new(12.0, -12.0, 1.0));
    }
}
