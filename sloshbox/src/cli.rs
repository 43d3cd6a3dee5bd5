//! Command line.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::app::{AppConfig, RenderMode};

/// Where acceleration samples come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum SensorKind {
    /// Random walk around the previous sample.
    Wobble,
    /// Constant drift until every axis hits the sensor limit.
    Drift,
    /// ADXL345 on the I2C bus (needs the `rpi` feature).
    Adxl345,
}

#[derive(Parser, Debug)]
#[command(name = "sloshbox")]
#[command(about = "Tilt-driven wave field for an OPC LED grid", long_about = None)]
pub struct Cli {
    /// Layout file (JSON array of {"point": [x, y, z]} records)
    #[arg(short, long, value_name = "PATH")]
    pub layout: PathBuf,

    /// OPC server
    #[arg(short, long, value_name = "HOST:PORT", default_value = "localhost:7890")]
    pub server: String,

    /// Frames per second
    #[arg(short, long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..))]
    pub fps: u32,

    /// What to draw
    #[arg(short, long, value_enum, default_value_t = RenderMode::Field)]
    pub mode: RenderMode,

    /// Apply LED gamma (procedural mode on physical LEDs)
    #[arg(long, default_value_t = false)]
    pub live: bool,

    /// OPC channel (0 = broadcast)
    #[arg(short, long, default_value_t = 0)]
    pub channel: u8,

    /// Accelerometer source
    #[arg(long, value_enum, default_value_t = SensorKind::Wobble)]
    pub sensor: SensorKind,

    /// I2C device for --sensor adxl345
    #[arg(long, value_name = "DEV", default_value = "/dev/i2c-1")]
    pub i2c: String,

    /// Show the grid in a window (needs the `preview` feature)
    #[arg(long, default_value_t = false)]
    pub preview: bool,
}

impl Cli {
    pub fn app_config(&self) -> AppConfig {
        AppConfig {
            mode:    self.mode,
            fps:     self.fps,
            channel: self.channel,
            live:    self.live,
            preview: self.preview,
            ..AppConfig::default()
        }
    }
}
