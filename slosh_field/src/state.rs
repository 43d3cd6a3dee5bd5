//! `SimulationState` — everything the main loop mutates, in one place.

use std::time::{Duration, Instant};

use log::info;

use crate::accel::Acceleration;
use crate::field::Field;
use crate::gesture::{TiltClassifier, TiltThresholds, WaveSpawnRequest};
use crate::manager::{TickReport, WaveManager};
use crate::wave::{WaveTiming, WaveType};

// ════════════════════════════════════════════════════════════════════════════
// SimConfig
// ════════════════════════════════════════════════════════════════════════════

/// Simulation tweak values.
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    pub grid_width:        usize,
    pub grid_height:       usize,
    /// Subtracted from every field cell once per tick.
    pub drain_amount:      f32,
    /// Minimum time between two classifier runs.
    pub wave_spawn_period: Duration,
    pub thresholds:        TiltThresholds,
    pub timing:            WaveTiming,
    /// Start with one full-speed left-to-right wave.
    pub seed_wave:         bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            grid_width:        16,
            grid_height:       8,
            drain_amount:      0.1,
            wave_spawn_period: Duration::from_millis(100),
            thresholds:        TiltThresholds::default(),
            timing:            WaveTiming::default(),
            seed_wave:         true,
        }
    }
}

/// What one [`SimulationState::step`] did.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepReport {
    /// Requests the classifier produced this step (empty when the spawn
    /// gate was closed).
    pub spawned: Vec<WaveSpawnRequest>,
    pub waves:   TickReport,
}

// ════════════════════════════════════════════════════════════════════════════
// SimulationState
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub struct SimulationState {
    config:           SimConfig,
    field:            Field,
    waves:            WaveManager,
    classifier:       TiltClassifier,
    last_spawn_check: Instant,
}

impl SimulationState {
    pub fn new(config: SimConfig, now: Instant) -> Self {
        let field = Field::new(config.grid_width, config.grid_height);
        let mut waves = WaveManager::new(config.timing, field.width(), field.height());
        if config.seed_wave {
            waves.spawn(WaveType::LeftToRight, 1.0, now);
        }
        SimulationState {
            classifier: TiltClassifier::new(config.thresholds),
            field,
            waves,
            last_spawn_check: now,
            config,
        }
    }

    pub fn config(&self)     -> &SimConfig      { &self.config }
    pub fn field(&self)      -> &Field          { &self.field }
    pub fn waves(&self)      -> &WaveManager    { &self.waves }
    pub fn classifier(&self) -> &TiltClassifier { &self.classifier }

    /// True once `wave_spawn_period` has passed since the last spawn check.
    pub fn spawn_due(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_spawn_check) >= self.config.wave_spawn_period
    }

    /// Classify `sample` and spawn the resulting waves, regardless of the
    /// spawn gate.  Resets the gate.
    pub fn spawn_from_sample(&mut self, sample: &Acceleration, now: Instant) -> Vec<WaveSpawnRequest> {
        self.last_spawn_check = now;
        let requests = self.classifier.classify(sample);
        for req in &requests {
            let wave = self.waves.spawn(req.wave_type, req.speed, now);
            info!(
                "new {} type {} speed {:.2} period {:?}",
                wave.name(), wave.wave_type(), wave.speed(), wave.update_period()
            );
        }
        requests
    }

    /// One simulation tick.  `sample` is only called when the spawn gate is
    /// open.
    pub fn step<F>(&mut self, now: Instant, sample: F) -> StepReport
    where
        F: FnOnce() -> Acceleration,
    {
        let spawned = if self.spawn_due(now) {
            let s = sample();
            self.spawn_from_sample(&s, now)
        } else {
            Vec::new()
        };

        let waves = self.waves.tick(now, &mut self.field);
        self.field.drain(self.config.drain_amount);

        StepReport { spawned, waves }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
