//! A single traveling wave.
//!
//! A wave is a line segment that starts just outside one edge of the grid,
//! spanning the full width or height, and steps one cell per update toward
//! the opposite edge.  It has two states: active, and deleted once both of
//! its endpoints have left the grid on the same side.

use std::fmt;
use std::time::{Duration, Instant};

// ════════════════════════════════════════════════════════════════════════════
// WaveType
// ════════════════════════════════════════════════════════════════════════════

/// Direction of travel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WaveType {
    LeftToRight,
    RightToLeft,
    TopToBottom,
    BottomToTop,
    /// Never produced by the classifier; travels like `LeftToRight`.
    Unknown,
}

impl WaveType {
    /// Short code used in logs.
    pub fn code(self) -> &'static str {
        match self {
            WaveType::LeftToRight => "LTR",
            WaveType::RightToLeft => "RTL",
            WaveType::TopToBottom => "TTB",
            WaveType::BottomToTop => "BTT",
            WaveType::Unknown     => "<unknown>",
        }
    }

    /// Starting segment and unit velocity on a `width × height` grid.
    pub fn geometry(self, width: usize, height: usize) -> (Segment, (f32, f32)) {
        let w = width  as f32;
        let h = height as f32;
        match self {
            WaveType::LeftToRight | WaveType::Unknown =>
                (Segment::new(-1.0, -1.0, -1.0, h), ( 1.0,  0.0)),
            WaveType::RightToLeft =>
                (Segment::new(w, -1.0, w, h),       (-1.0,  0.0)),
            WaveType::TopToBottom =>
                (Segment::new(-1.0, -1.0, w, -1.0), ( 0.0,  1.0)),
            WaveType::BottomToTop =>
                (Segment::new(-1.0, h, w, h),       ( 0.0, -1.0)),
        }
    }
}

impl fmt::Display for WaveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Segment
// ════════════════════════════════════════════════════════════════════════════

/// Line segment in grid coordinates.  Endpoints may be fractional and may
/// lie outside the grid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl Segment {
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Segment { x1, y1, x2, y2 }
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.x1 += dx;
        self.x2 += dx;
        self.y1 += dy;
        self.y2 += dy;
    }

    /// Both endpoints off the `width × height` grid on the same side of
    /// the same axis.
    pub fn is_off_grid(&self, width: usize, height: usize) -> bool {
        let w = width  as f32;
        let h = height as f32;
        (self.x1 >= w && self.x2 >= w)
            || (self.x1 < 0.0 && self.x2 < 0.0)
            || (self.y1 >= h && self.y2 >= h)
            || (self.y1 < 0.0 && self.y2 < 0.0)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// WaveTiming
// ════════════════════════════════════════════════════════════════════════════

/// Range of per-wave update periods.  Speed 1.0 gets `fastest`, speed 0.0
/// gets `slowest`, linear in between.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveTiming {
    pub fastest: Duration,
    pub slowest: Duration,
}

impl Default for WaveTiming {
    fn default() -> Self {
        WaveTiming {
            fastest: Duration::from_millis(100),
            slowest: Duration::from_secs(1),
        }
    }
}

impl WaveTiming {
    pub fn period_for(&self, speed: f32) -> Duration {
        let speed = if speed.is_finite() { speed.clamp(0.0, 1.0) } else { 0.0 };
        let slow = self.slowest.as_secs_f32();
        let fast = self.fastest.as_secs_f32();
        Duration::from_secs_f32((slow - speed * (slow - fast)).max(0.0))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Wave
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct Wave {
    name:          String,
    wave_type:     WaveType,
    segment:       Segment,
    velocity:      (f32, f32),
    speed:         f32,
    update_period: Duration,
    created_at:    Instant,
    last_update:   Instant,
    delete_flag:   bool,
    grid:          (usize, usize),
}

impl Wave {
    /// A fresh wave on a `width × height` grid.  Its clock starts at `now`,
    /// so the first step happens one `update_period` later.
    pub fn new(
        name:      String,
        wave_type: WaveType,
        speed:     f32,
        timing:    &WaveTiming,
        width:     usize,
        height:    usize,
        now:       Instant,
    ) -> Self {
        let (segment, velocity) = wave_type.geometry(width, height);
        let speed = if speed.is_finite() { speed.clamp(0.0, 1.0) } else { 0.0 };
        Wave {
            name,
            wave_type,
            segment,
            velocity,
            speed,
            update_period: timing.period_for(speed),
            created_at:    now,
            last_update:   now,
            delete_flag:   false,
            grid:          (width, height),
        }
    }

    /// Move one step and re-check the grid bounds.
    pub fn update(&mut self) {
        let (dx, dy) = self.velocity;
        self.segment.translate(dx, dy);
        if self.segment.is_off_grid(self.grid.0, self.grid.1) {
            self.delete_flag = true;
        }
    }

    /// Step if this wave's own period has elapsed since its last step.
    /// Returns true when it stepped.
    pub fn timer_update(&mut self, now: Instant) -> bool {
        if self.delete_flag { return false; }
        if now.saturating_duration_since(self.last_update) >= self.update_period {
            self.last_update = now;
            self.update();
            return true;
        }
        false
    }

    pub fn name(&self)          -> &str        { &self.name }
    pub fn wave_type(&self)     -> WaveType    { self.wave_type }
    pub fn segment(&self)       -> &Segment    { &self.segment }
    pub fn velocity(&self)      -> (f32, f32)  { self.velocity }
    pub fn speed(&self)         -> f32         { self.speed }
    pub fn update_period(&self) -> Duration    { self.update_period }
    pub fn created_at(&self)    -> Instant     { self.created_at }
    pub fn last_update(&self)   -> Instant     { self.last_update }
    pub fn is_deleted(&self)    -> bool        { self.delete_flag }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
