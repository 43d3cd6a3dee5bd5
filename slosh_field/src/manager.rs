//! Owner of the live waves.

use std::time::Instant;

use log::debug;

use crate::field::Field;
use crate::wave::{Wave, WaveTiming, WaveType};

/// What one [`WaveManager::tick`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Waves whose own clock ran out and that stepped.
    pub advanced: usize,
    /// Waves pruned after leaving the grid.
    pub removed:  usize,
}

/// Collection of live waves on one grid.  There is no cap on how many
/// waves can be alive at once.
#[derive(Debug)]
pub struct WaveManager {
    waves:      Vec<Wave>,
    next_index: u64,
    timing:     WaveTiming,
    width:      usize,
    height:     usize,
}

impl WaveManager {
    pub fn new(timing: WaveTiming, width: usize, height: usize) -> Self {
        WaveManager { waves: Vec::new(), next_index: 0, timing, width, height }
    }

    /// Create a wave and return a reference to it.
    pub fn spawn(&mut self, wave_type: WaveType, speed: f32, now: Instant) -> &Wave {
        let name = format!("Wave-{}", self.next_index);
        self.next_index += 1;
        let wave = Wave::new(name, wave_type, speed, &self.timing, self.width, self.height, now);
        self.waves.push(wave);
        &self.waves[self.waves.len() - 1]
    }

    /// Step every wave that is due, stamp each one into `field`, and drop
    /// the ones that have left the grid.
    pub fn tick(&mut self, now: Instant, field: &mut Field) -> TickReport {
        let mut report = TickReport::default();
        self.waves.retain_mut(|wave| {
            if wave.timer_update(now) {
                report.advanced += 1;
            }
            field.rasterize(wave.segment());
            if wave.is_deleted() {
                debug!("removing {}", wave.name());
                report.removed += 1;
                false
            } else {
                true
            }
        });
        report
    }

    pub fn len(&self)      -> usize { self.waves.len() }
    pub fn is_empty(&self) -> bool  { self.waves.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &Wave> + '_ {
        self.waves.iter()
    }

    /// Total waves ever spawned.
    pub fn spawned(&self) -> u64 { self.next_index }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const W: usize = 16;
    const H: usize = 8;

    fn manager() -> WaveManager {
        WaveManager::new(WaveTiming::default(), W, H)
    }

    #[test]
    fn names_are_monotonic() {
        let mut m = manager();
        let now = Instant::now();
        assert_eq!(m.spawn(WaveType::LeftToRight, 1.0, now).name(), "Wave-0");
        assert_eq!(m.spawn(WaveType::TopToBottom, 1.0, now).name(), "Wave-1");
        assert_eq!(m.len(), 2);
        assert_eq!(m.spawned(), 2);
    }

    #[test]
    fn ltr_wave_removed_after_width_plus_one_updates() {
        let mut m = manager();
        let mut field = Field::new(W, H);
        let mut now = Instant::now();
        let period = m.spawn(WaveType::LeftToRight, 1.0, now).update_period();

        for step in 1..=W {
            now += period;
            let r = m.tick(now, &mut field);
            assert_eq!(r.advanced, 1, "step {}", step);
            assert_eq!(m.len(), 1, "wave gone early at step {}", step);
        }
        now += period;
        let r = m.tick(now, &mut field);
        assert_eq!(r, TickReport { advanced: 1, removed: 1 });
        assert!(m.is_empty());
    }

    #[test]
    fn wave_waits_for_its_own_period() {
        let mut m = manager();
        let mut field = Field::new(W, H);
        let start = Instant::now();
        m.spawn(WaveType::LeftToRight, 0.0, start); // slowest: 1 s
        let r = m.tick(start + Duration::from_millis(500), &mut field);
        assert_eq!(r.advanced, 0);
        // Not yet moved, but its spawn line is clamped onto column 0.
        assert_eq!(field.sample(0, 3), Some(1.0));
        assert_eq!(field.sample(1, 3), Some(0.0));
    }

    #[test]
    fn tick_paints_current_segment() {
        let mut m = manager();
        let mut field = Field::new(W, H);
        let start = Instant::now();
        let period = m.spawn(WaveType::TopToBottom, 1.0, start).update_period();
        m.tick(start + period, &mut field);      // y = 0
        m.tick(start + period * 2, &mut field);  // y = 1
        for x in 0..W {
            assert_eq!(field.sample(x, 1), Some(1.0));
        }
        assert_eq!(field.sample(0, 2), Some(0.0));
    }

    #[test]
    fn removal_mid_collection_keeps_the_rest() {
        let mut m = manager();
        let mut field = Field::new(W, H);
        let start = Instant::now();
        // fast wave in the middle of two slow ones
        m.spawn(WaveType::LeftToRight, 0.0, start);
        let period = m.spawn(WaveType::RightToLeft, 1.0, start).update_period();
        m.spawn(WaveType::BottomToTop, 0.0, start);

        let mut now = start;
        let mut removed = 0;
        for _ in 0..=W {
            now += period;
            removed += m.tick(now, &mut field).removed;
        }
        assert_eq!(removed, 1);
        let names: Vec<_> = m.iter().map(|w| w.name().to_string()).collect();
        assert_eq!(names, vec!["Wave-0", "Wave-2"]);
    }
}
