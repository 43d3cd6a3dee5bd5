//! Tilt classifier — acceleration sample → wave spawn requests.
//!
//! Each axis (roll, pitch) can fire at most one wave per sample.  An axis
//! fires only when its angle is outside the rest band around flat *and* has
//! moved more than `angle_increment` away from the angle that fired last on
//! that axis.  A device held still at an angle therefore spawns one wave,
//! not one per sample.

use std::f32::consts::PI;

use log::{debug, trace};

use crate::accel::{Acceleration, MAGNITUDE_EPSILON};
use crate::wave::WaveType;

// ════════════════════════════════════════════════════════════════════════════
// Thresholds
// ════════════════════════════════════════════════════════════════════════════

/// Gating constants for the classifier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TiltThresholds {
    /// Acceleration (g) per axis that maps to full speed.
    pub tolerance:       f32,
    /// Rest band around flat for roll, radians.
    pub roll_threshold:  f32,
    /// Rest band around flat for pitch, radians.
    pub pitch_threshold: f32,
    /// How far an angle must move from its last trigger to fire again.
    pub angle_increment: f32,
}

impl Default for TiltThresholds {
    fn default() -> Self {
        TiltThresholds {
            tolerance:       4.0,
            roll_threshold:  PI / 36.0,
            pitch_threshold: PI / 36.0,
            angle_increment: 0.01,
        }
    }
}

/// One wave the classifier wants spawned.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveSpawnRequest {
    pub wave_type: WaveType,
    /// Normalised sample magnitude, 0.0–1.0.
    pub speed:     f32,
}

// ════════════════════════════════════════════════════════════════════════════
// TiltClassifier
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct TiltClassifier {
    thresholds:      TiltThresholds,
    last_roll_wave:  f32,
    last_pitch_wave: f32,
}

impl TiltClassifier {
    pub fn new(thresholds: TiltThresholds) -> Self {
        TiltClassifier { thresholds, last_roll_wave: 0.0, last_pitch_wave: 0.0 }
    }

    pub fn thresholds(&self) -> &TiltThresholds { &self.thresholds }

    /// Roll angle that fired the most recent roll wave.
    pub fn last_roll_wave(&self)  -> f32 { self.last_roll_wave }
    /// Pitch angle that fired the most recent pitch wave.
    pub fn last_pitch_wave(&self) -> f32 { self.last_pitch_wave }

    /// Sample magnitude relative to `(tolerance, tolerance, tolerance)`,
    /// clamped to 0.0–1.0.
    pub fn speed_for(&self, sample: &Acceleration) -> f32 {
        let max = Acceleration::uniform(self.thresholds.tolerance)
            .magnitude()
            .max(MAGNITUDE_EPSILON);
        let speed = sample.magnitude() / max;
        if speed.is_finite() { speed.clamp(0.0, 1.0) } else { 0.0 }
    }

    /// Classify one sample.  Returns the roll request (if any) first, then
    /// the pitch request.
    pub fn classify(&mut self, sample: &Acceleration) -> Vec<WaveSpawnRequest> {
        let mut out = Vec::with_capacity(2);

        let o = sample.orientation();
        if !(o.roll.is_finite() && o.pitch.is_finite()) {
            debug!("ignoring non-finite sample {:?}", sample);
            return out;
        }
        let speed = self.speed_for(sample);
        trace!("roll={:.4} pitch={:.4} speed={:.3}", o.roll, o.pitch, speed);

        let t = self.thresholds;

        if fires(o.roll, t.roll_threshold, self.last_roll_wave, t.angle_increment) {
            self.last_roll_wave = o.roll;
            let wave_type = if o.roll >= 0.0 { WaveType::TopToBottom } else { WaveType::BottomToTop };
            out.push(WaveSpawnRequest { wave_type, speed });
        }

        if fires(o.pitch, t.pitch_threshold, self.last_pitch_wave, t.angle_increment) {
            self.last_pitch_wave = o.pitch;
            let wave_type = if o.pitch >= 0.0 { WaveType::RightToLeft } else { WaveType::LeftToRight };
            out.push(WaveSpawnRequest { wave_type, speed });
        }

        out
    }
}

/// Outside the rest band and outside the hysteresis band around `last`.
fn fires(angle: f32, threshold: f32, last: f32, increment: f32) -> bool {
    let at_rest   = (-threshold..=threshold).contains(&angle);
    let unchanged = ((last - increment)..=(last + increment)).contains(&angle);
    !at_rest && !unchanged
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
