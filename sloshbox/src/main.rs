//! sloshbox — installation entry point.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{info, warn};

use opc_client::OpcClient;
use slosh_field::Acceleration;
use sloshbox::app::{run, App};
use sloshbox::cli::{Cli, SensorKind};
use sloshbox::layout::load_layout;
use sloshbox::sensor::{spawn_sensor, AccelSource, LatestSample, WobbleMode, WobbleSampler};

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║              Sloshbox — tilt-driven LED wave field           ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let coordinates = load_layout(&cli.layout)
        .with_context(|| format!("loading layout {}", cli.layout.display()))?;
    info!("{} LEDs in {}", coordinates.len(), cli.layout.display());

    let config = cli.app_config();
    let mut sensor = spawn_sensor(
        open_sensor(&cli),
        config.sim.wave_spawn_period,
        Acceleration::default(),
    );

    info!("sending to {} at {} fps, mode {:?}", cli.server, config.fps, config.mode);
    let mut app = App::new(config, coordinates, OpcClient::new(cli.server.clone()), Instant::now());

    if app.config().preview {
        return run_preview(&mut app, &mut sensor);
    }
    run(&mut app, &mut sensor, |_, _| true);
    Ok(())
}

fn wobble(mode: WobbleMode) -> Box<dyn AccelSource> {
    Box::new(WobbleSampler::new(Acceleration::default(), mode))
}

fn open_sensor(cli: &Cli) -> Box<dyn AccelSource> {
    match cli.sensor {
        SensorKind::Wobble  => wobble(WobbleMode::Random { step: 0.5 }),
        SensorKind::Drift   => wobble(WobbleMode::Drift { speed: 0.1 }),
        SensorKind::Adxl345 => open_adxl345(&cli.i2c),
    }
}

#[cfg(feature = "rpi")]
fn open_adxl345(dev: &str) -> Box<dyn AccelSource> {
    use sloshbox::adxl345::open_linux;
    use sloshbox::sensor::FallbackSource;

    match open_linux(dev) {
        Ok(s) => {
            info!("ADXL345 on {}", dev);
            Box::new(FallbackSource::new(s))
        }
        Err(e) => {
            warn!("{}; using the wobble sensor", e);
            wobble(WobbleMode::default())
        }
    }
}

#[cfg(not(feature = "rpi"))]
fn open_adxl345(dev: &str) -> Box<dyn AccelSource> {
    warn!("built without the `rpi` feature; ignoring {} and using the wobble sensor", dev);
    wobble(WobbleMode::default())
}

#[cfg(feature = "preview")]
fn run_preview(app: &mut App<OpcClient>, sensor: &mut LatestSample) -> Result<()> {
    use sloshbox::visualizer::Visualizer;

    let cfg = app.config();
    let mut vis = Visualizer::new(cfg.sim.grid_width, cfg.sim.grid_height, cfg.boards.clone())
        .map_err(anyhow::Error::msg)
        .context("opening preview window")?;

    run(app, sensor, |app, _| vis.render(&app.color_grid()));
    info!("preview closed after {} frames sent", app.frames_sent());
    Ok(())
}

#[cfg(not(feature = "preview"))]
fn run_preview(app: &mut App<OpcClient>, sensor: &mut LatestSample) -> Result<()> {
    warn!("built without the `preview` feature; running headless");
    run(app, sensor, |_, _| true);
    Ok(())
}
