//! Top-level application: simulation, rendering and transport in one loop.
//!
//! `App` owns the `SimulationState`, the board map and the pixel transport.
//! Each call to [`App::step`] runs one simulation tick, renders a frame in
//! the configured mode and sends it.  [`run`] paces those steps at the
//! configured frame rate.

use std::thread;
use std::time::{Duration, Instant};

use clap::ValueEnum;
use log::{trace, warn};
use opc_client::Transport;
use rand::rngs::StdRng;
use rand::SeedableRng;
use slosh_field::{Acceleration, SimConfig, SimulationState};
use slosh_pixels::{procedural_frame, random_frame, BoardMap, ColorGrid, FullnessPalette, Rgb};

use crate::layout::Coordinate;
use crate::sensor::LatestSample;

/// Log the first send failure and then every this many.
const SEND_WARN_EVERY: u64 = 60;

/// Which picture goes out on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum RenderMode {
    /// The wave field, mapped through the boards.
    Field,
    /// Cosine colors from the layout coordinates.
    Procedural,
    /// Random noise, one pixel per layout coordinate.
    Random,
}

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub sim:        SimConfig,
    pub boards:     BoardMap,
    pub palette:    FullnessPalette,
    pub mode:       RenderMode,
    pub fps:        u32,
    pub channel:    u8,
    /// Apply LED gamma in procedural mode.
    pub live:       bool,
    /// Multiplier on wall-clock seconds for the procedural mode.
    pub time_scale: f32,
    pub preview:    bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            sim:        SimConfig::default(),
            boards:     BoardMap::fadecandy_pair(),
            palette:    FullnessPalette::violet(),
            mode:       RenderMode::Field,
            fps:        60,
            channel:    0,
            live:       false,
            time_scale: 0.6,
            preview:    false,
        }
    }
}

impl AppConfig {
    pub fn frame_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps.max(1) as f64)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// App
// ════════════════════════════════════════════════════════════════════════════

pub struct App<T: Transport> {
    config:      AppConfig,
    state:       SimulationState,
    transport:   T,
    coordinates: Vec<Coordinate>,
    start:       Instant,
    rng:         StdRng,

    // ── transport bookkeeping ─────────────────────────────────────────────
    frames_sent:   u64,
    send_failures: u64,
}

impl<T: Transport> App<T> {
    /// Build the app and try one connect.  A failed connect is only a
    /// warning; every send retries.
    pub fn new(config: AppConfig, coordinates: Vec<Coordinate>, mut transport: T, now: Instant) -> Self {
        if !transport.connect() {
            warn!("could not connect to the pixel server; will keep trying");
        }
        App {
            state: SimulationState::new(config.sim.clone(), now),
            config,
            transport,
            coordinates,
            start: now,
            rng: StdRng::from_entropy(),
            frames_sent: 0,
            send_failures: 0,
        }
    }

    /// One tick: simulate, render, send.  Returns the frame that was sent.
    pub fn step<F>(&mut self, now: Instant, sample: F) -> Vec<Rgb>
    where
        F: FnOnce() -> Acceleration,
    {
        let report = self.state.step(now, sample);
        trace!(
            "tick: {} spawned, {} advanced, {} removed, {} live",
            report.spawned.len(), report.waves.advanced, report.waves.removed, self.state.waves().len()
        );
        let frame = self.render(now);
        self.transmit(&frame);
        frame
    }

    /// The current frame in the configured mode.
    pub fn render(&mut self, now: Instant) -> Vec<Rgb> {
        match self.config.mode {
            RenderMode::Field => self.config.boards.flatten(&self.color_grid()),
            RenderMode::Procedural => {
                let t = now.saturating_duration_since(self.start).as_secs_f32();
                procedural_frame(&self.coordinates, t, self.config.time_scale, self.config.live)
            }
            RenderMode::Random => random_frame(&mut self.rng, self.coordinates.len()),
        }
    }

    /// The field colored with the configured palette.
    pub fn color_grid(&self) -> ColorGrid {
        ColorGrid::from_field(self.state.field(), &self.config.palette)
    }

    fn transmit(&mut self, frame: &[Rgb]) {
        match self.transport.send(frame, self.config.channel) {
            Ok(()) => self.frames_sent += 1,
            Err(e) => {
                self.send_failures += 1;
                if self.send_failures == 1 || self.send_failures % SEND_WARN_EVERY == 0 {
                    warn!("send failed ({} so far): {}", self.send_failures, e);
                }
            }
        }
    }

    pub fn config(&self)        -> &AppConfig       { &self.config }
    pub fn state(&self)         -> &SimulationState { &self.state }
    pub fn transport(&self)     -> &T               { &self.transport }
    pub fn coordinates(&self)   -> &[Coordinate]    { &self.coordinates }
    pub fn frames_sent(&self)   -> u64              { self.frames_sent }
    pub fn send_failures(&self) -> u64              { self.send_failures }
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Drive `app` at its frame rate until `on_frame` returns false.
///
/// `on_frame` sees the app and the frame just sent; the headless binary
/// passes a closure that never stops, the preview window one that stops
/// when the window closes.
pub fn run<T, F>(app: &mut App<T>, sensor: &mut LatestSample, mut on_frame: F)
where
    T: Transport,
    F: FnMut(&App<T>, &[Rgb]) -> bool,
{
    let frame_period = app.config().frame_period();
    loop {
        let t0 = Instant::now();
        let frame = app.step(t0, || sensor.latest());
        if !on_frame(&*app, &frame[..]) {
            break;
        }
        if let Some(rest) = frame_period.checked_sub(t0.elapsed()) {
            thread::sleep(rest);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::{spawn_sensor, WobbleMode, WobbleSampler};
    use opc_client::TransportError;
    use slosh_pixels::{BLACK, WHITE};

    /// Records every call; `online` decides whether connect/send succeed.
    #[derive(Default)]
    struct Recording {
        online:   bool,
        connects: usize,
        frames:   Vec<(usize, u8)>,
    }

    impl Transport for Recording {
        fn connect(&mut self) -> bool {
            self.connects += 1;
            self.online
        }

        fn send(&mut self, frame: &[Rgb], channel: u8) -> Result<(), TransportError> {
            self.frames.push((frame.len(), channel));
            if self.online {
                Ok(())
            } else {
                Err(TransportError::Resolve("offline".into()))
            }
        }

        fn is_connected(&self) -> bool { self.online }
    }

    const FLAT: Acceleration = Acceleration::new(0.0, 0.0, 1.0);

    fn coords(n: usize) -> Vec<Coordinate> {
        (0..n).map(|i| [i as f32 * 0.1, 0.0, 0.0]).collect()
    }

    #[test]
    fn offline_transport_still_gets_every_frame() {
        let start = Instant::now();
        let mut app = App::new(AppConfig::default(), coords(128), Recording::default(), start);
        for i in 1..=10 {
            app.step(start + Duration::from_millis(16 * i), || FLAT);
        }
        assert_eq!(app.transport().connects, 1);
        assert_eq!(app.transport().frames.len(), 10);
        assert_eq!(app.send_failures(), 10);
        assert_eq!(app.frames_sent(), 0);
    }

    #[test]
    fn field_frame_covers_every_board() {
        let start = Instant::now();
        let transport = Recording { online: true, ..Recording::default() };
        let cfg = AppConfig { channel: 3, ..AppConfig::default() };
        let mut app = App::new(cfg, coords(5), transport, start);
        let frame = app.step(start, || FLAT);
        assert_eq!(frame.len(), 128);
        assert_eq!(app.transport().frames, vec![(128, 3)]);
        assert_eq!(app.frames_sent(), 1);
    }

    #[test]
    fn seed_wave_lights_first_column_once_it_enters() {
        let start = Instant::now();
        let mut app = App::new(AppConfig::default(), coords(0), Recording::default(), start);
        let period = app.state().waves().iter().next().unwrap().update_period();
        let frame = app.step(start + period, || FLAT);
        // entered column 0, then drained once
        for row in 0..8 {
            assert_ne!(frame[row * 8], BLACK, "row {}", row);
            assert_ne!(frame[row * 8], WHITE, "row {}", row);
            assert_eq!(frame[row * 8 + 1], BLACK, "row {}", row);
        }
    }

    #[test]
    fn procedural_and_random_follow_the_layout() {
        let start = Instant::now();
        for mode in [RenderMode::Procedural, RenderMode::Random] {
            let cfg = AppConfig { mode, ..AppConfig::default() };
            let mut app = App::new(cfg, coords(7), Recording::default(), start);
            assert_eq!(app.step(start, || FLAT).len(), 7, "{:?}", mode);
        }
    }

    #[test]
    fn procedural_origin_is_white_at_start() {
        let start = Instant::now();
        let cfg = AppConfig { mode: RenderMode::Procedural, ..AppConfig::default() };
        let mut app = App::new(cfg, vec![[0.0, 0.0, 0.0]], Recording::default(), start);
        assert_eq!(app.render(start), vec![WHITE]);
    }

    #[test]
    fn run_stops_when_callback_says_so() {
        let cfg = AppConfig { fps: 1000, ..AppConfig::default() };
        let mut app = App::new(cfg, coords(0), Recording::default(), Instant::now());
        let mut sensor = spawn_sensor(
            WobbleSampler::new(FLAT, WobbleMode::default()),
            Duration::from_millis(1),
            FLAT,
        );
        let mut frames = 0;
        run(&mut app, &mut sensor, |_, frame| {
            assert_eq!(frame.len(), 128);
            frames += 1;
            frames < 5
        });
        assert_eq!(frames, 5);
        assert_eq!(app.transport().frames.len(), 5);
    }

    #[test]
    fn frame_period_from_fps() {
        let cfg = AppConfig { fps: 50, ..AppConfig::default() };
        assert_eq!(cfg.frame_period(), Duration::from_millis(20));
    }
}
