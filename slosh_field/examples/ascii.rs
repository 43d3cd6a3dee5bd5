//! Runs the simulation headless and prints the field as ASCII art.

use std::time::{Duration, Instant};

use slosh_field::{Acceleration, Field, SimConfig, SimulationState};

fn shade(v: f32) -> char {
    match v {
        v if v >= 1.0 => '#',
        v if v > 0.6  => '+',
        v if v > 0.2  => '.',
        _             => ' ',
    }
}

fn show(label: &str, field: &Field) {
    println!("   {}", label);
    println!("   +{}+", "-".repeat(field.width()));
    for row in field.rows() {
        let line: String = row.iter().map(|&v| shade(v)).collect();
        println!("   |{}|", line);
    }
    println!("   +{}+", "-".repeat(field.width()));
}

fn main() {
    println!("\n=== Slosh Field Demo ===\n");

    let start = Instant::now();
    let mut sim = SimulationState::new(SimConfig::default(), start);
    let tick = Duration::from_millis(100);

    // ── 1. Seed wave sweeping left to right ───────────────────────────────
    println!("1. Seed wave, box held flat");
    let flat = Acceleration::new(0.0, 0.0, 1.0);
    let mut now = start;
    for i in 1..=6 {
        now += tick;
        sim.step(now, || flat);
        if i % 3 == 0 {
            show(&format!("after {} ticks, {} wave(s)", i, sim.waves().len()), sim.field());
        }
    }
    println!();

    // ── 2. Hard roll: top-to-bottom wave ──────────────────────────────────
    println!("2. Box rolled hard onto its side");
    let rolled = Acceleration::new(-4.0, 0.0, 0.0);
    now += tick;
    let report = sim.step(now, || rolled);
    for req in &report.spawned {
        println!("   spawned {} at speed {:.2}", req.wave_type, req.speed);
    }
    for _ in 0..4 {
        now += tick;
        sim.step(now, || rolled);
    }
    show(&format!("{} wave(s) live", sim.waves().len()), sim.field());
    println!();

    // ── 3. Let it settle ──────────────────────────────────────────────────
    println!("3. Settling");
    let mut ticks = 0;
    while !(sim.waves().is_empty() && sim.field().is_dark()) && ticks < 200 {
        now += tick;
        sim.step(now, || flat);
        ticks += 1;
    }
    println!("   dark again after {} more ticks ({} waves spawned in total)", ticks, sim.waves().spawned());
    println!();
}
