//! # slosh_field
//!
//! Tilt-driven wave simulation for a small LED grid.
//!
//! An accelerometer sample is turned into zero, one or two wave requests by
//! the [`TiltClassifier`].  Each [`Wave`] is a straight line segment that
//! sweeps across the grid at its own pace; while alive it stamps itself into
//! a persistent [`Field`] of "fullness" values, and the field drains a little
//! every tick so waves leave a fading trail behind them.
//!
//! ## Wave directions
//!
//! | Tilt | Angle sign | Wave |
//! |---|---|---|
//! | Roll | positive | `TTB` — top to bottom |
//! | Roll | negative | `BTT` — bottom to top |
//! | Pitch | positive | `RTL` — right to left |
//! | Pitch | negative | `LTR` — left to right |
//!
//! ## Per-tick order
//!
//! 1. if the spawn gate is open: classify the latest sample, spawn waves
//! 2. advance every wave whose own clock has run out
//! 3. rasterize every wave into the field, prune waves that left the grid
//! 4. drain the field
//!
//! [`SimulationState`] owns all of it and is driven from a single thread.

pub mod accel;
pub mod gesture;
pub mod wave;
pub mod field;
pub mod manager;
pub mod state;

pub use accel::{Acceleration, Orientation};
pub use gesture::{TiltClassifier, TiltThresholds, WaveSpawnRequest};
pub use wave::{Segment, Wave, WaveTiming, WaveType};
pub use field::Field;
pub use manager::{TickReport, WaveManager};
pub use state::{SimConfig, SimulationState, StepReport};
