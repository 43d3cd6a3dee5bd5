//! Accelerometer sources and the thread that polls them.
//!
//! The public interface is [`LatestSample`]: a non-blocking handle the main
//! loop reads once per spawn check.  It always has a value: the newest
//! sample the sensor thread published, or the last one seen if nothing new
//! arrived.  The main loop doesn't need to know whether samples come from
//! real hardware or the wobble generator.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, TrySendError};
use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use slosh_field::Acceleration;
use thiserror::Error;

/// Sensor range; synthetic samples are clamped to ±this on every axis.
pub const SENSOR_LIMIT_G: f32 = 12.0;

#[derive(Debug, Error)]
pub enum SensorError {
    #[error("I2C bus error: {0}")]
    Bus(String),

    #[error("unexpected device id {0:#04x}")]
    WrongDevice(u8),

    #[error("could not open {path}: {reason}")]
    Open { path: String, reason: String },
}

// ════════════════════════════════════════════════════════════════════════════
// AccelSource trait — unified interface for hw and synthetic
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can produce acceleration samples.
pub trait AccelSource: Send + 'static {
    fn sample(&mut self) -> Result<Acceleration, SensorError>;
}

impl AccelSource for Box<dyn AccelSource> {
    fn sample(&mut self) -> Result<Acceleration, SensorError> {
        (**self).sample()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// WobbleSampler — synthetic samples for running off the Pi
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WobbleMode {
    /// Each axis moves by a uniform random amount in `[-step, step]`.
    Random { step: f32 },
    /// Fixed drift of `(2·speed, speed, speed)` per sample.
    Drift { speed: f32 },
}

impl Default for WobbleMode {
    fn default() -> Self { WobbleMode::Random { step: 0.5 } }
}

/// Perturbs the previous sample a little on every call.
pub struct WobbleSampler {
    prev: Acceleration,
    mode: WobbleMode,
    rng:  StdRng,
}

impl WobbleSampler {
    pub fn new(start: Acceleration, mode: WobbleMode) -> Self {
        WobbleSampler::with_rng(start, mode, StdRng::from_entropy())
    }

    pub fn with_rng(start: Acceleration, mode: WobbleMode, rng: StdRng) -> Self {
        WobbleSampler { prev: start, mode, rng }
    }

    /// Next sample derived from `prev`; also becomes the new baseline.
    pub fn next_from(&mut self, prev: Acceleration) -> Acceleration {
        let next = match self.mode {
            WobbleMode::Random { step } => {
                let step = step.abs();
                let mut d = || if step > 0.0 { self.rng.gen_range(-step..=step) } else { 0.0 };
                Acceleration::new(prev.x + d(), prev.y + d(), prev.z + d())
            }
            WobbleMode::Drift { speed } =>
                Acceleration::new(prev.x + speed * 2.0, prev.y + speed, prev.z + speed),
        }
        .clamped(SENSOR_LIMIT_G);
        self.prev = next;
        next
    }
}

impl AccelSource for WobbleSampler {
    fn sample(&mut self) -> Result<Acceleration, SensorError> {
        Ok(self.next_from(self.prev))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FallbackSource — never lets a read error reach the main loop
// ════════════════════════════════════════════════════════════════════════════

/// Wraps a real sensor.  On a read error it logs and substitutes a wobble
/// of the last good sample.
pub struct FallbackSource<S: AccelSource> {
    inner:    S,
    wobble:   WobbleSampler,
    last:     Acceleration,
    failures: u64,
}

impl<S: AccelSource> FallbackSource<S> {
    pub fn new(inner: S) -> Self {
        FallbackSource {
            inner,
            wobble:   WobbleSampler::new(Acceleration::default(), WobbleMode::default()),
            last:     Acceleration::default(),
            failures: 0,
        }
    }

    pub fn failures(&self) -> u64 { self.failures }
}

impl<S: AccelSource> AccelSource for FallbackSource<S> {
    fn sample(&mut self) -> Result<Acceleration, SensorError> {
        match self.inner.sample() {
            Ok(s) => {
                self.last = s;
                Ok(s)
            }
            Err(e) => {
                self.failures += 1;
                if self.failures == 1 || self.failures % 100 == 0 {
                    warn!("sensor read failed ({} so far): {}; using synthetic sample", self.failures, e);
                }
                self.last = self.wobble.next_from(self.last);
                Ok(self.last)
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Sensor thread + single-slot hand-off
// ════════════════════════════════════════════════════════════════════════════

/// Reading end of the sensor thread.  Dropping it stops the thread.
pub struct LatestSample {
    rx:      Receiver<Acceleration>,
    last:    Acceleration,
    running: Arc<AtomicBool>,
}

impl LatestSample {
    /// The newest published sample, or the previous one if nothing new is
    /// waiting.  Never blocks.
    pub fn latest(&mut self) -> Acceleration {
        if let Ok(s) = self.rx.try_recv() {
            self.last = s;
        }
        self.last
    }
}

impl Drop for LatestSample {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
    }
}

/// Poll `source` every `period` on its own thread.  The channel holds one
/// sample; a new sample evicts an unread one.
pub fn spawn_sensor<S: AccelSource>(mut source: S, period: Duration, initial: Acceleration) -> LatestSample {
    let (tx, rx) = bounded::<Acceleration>(1);
    let evict = rx.clone();
    let running = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&running);

    thread::spawn(move || {
        while flag.load(Ordering::Relaxed) {
            match source.sample() {
                Ok(mut s) => loop {
                    match tx.try_send(s) {
                        Ok(()) => break,
                        Err(TrySendError::Full(back)) => {
                            let _ = evict.try_recv();
                            s = back;
                        }
                        Err(TrySendError::Disconnected(_)) => return,
                    }
                },
                Err(e) => warn!("sensor: {}", e),
            }
            thread::sleep(period);
        }
        debug!("sensor thread stopped");
    });

    LatestSample { rx, last: initial, running }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
