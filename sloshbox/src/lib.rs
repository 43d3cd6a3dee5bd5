//! # sloshbox
//!
//! Tilt-sensor LED installation.  Tilting the box sends waves sweeping
//! across a 16×8 grid of LEDs; each wave leaves a fading violet trail.
//!
//! ## Pipeline
//!
//! | Stage | Where | Runs on |
//! |---|---|---|
//! | Accelerometer sample | [`sensor`], [`adxl345`] | sensor thread |
//! | Tilt → wave requests | `slosh_field::TiltClassifier` | main loop |
//! | Waves → field, drain | `slosh_field::SimulationState` | main loop |
//! | Field → board-ordered frame | `slosh_pixels` | main loop |
//! | Frame → OPC server | `opc_client` | main loop |
//!
//! The main loop never blocks on the sensor: it reads the newest sample
//! from a single-slot channel, or reuses the last one.  A dead OPC server
//! is logged and retried on every frame.
//!
//! ## Feature flags
//!
//! * (default): synthetic wobble sensor, headless.
//! * `rpi`: real ADXL345 on a Linux I2C bus via `linux-embedded-hal`.
//! * `preview`: a `minifb` window showing the grid.

pub mod sensor;
pub mod adxl345;
pub mod layout;
pub mod app;
pub mod cli;
#[cfg(feature = "preview")]
pub mod visualizer;
