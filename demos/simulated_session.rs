//! Simulated stage session.
//!
//! Runs a typical session against the in-process simulator: relative moves,
//! a legalized move, absolute moves, a non-blocking home and an encoder re-zero.
//!
//! ```bash
//! RUST_LOG=info cargo run --example simulated_session
//! ```

use stage_motion::{
    ControllerConfig, LogObserver, SimulatedController, StageController, StageModel, UnitExt,
};

/// Sleeps for real so the log output paces like a live session.
struct StdDelay;

impl embedded_hal::delay::DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(ns as u64));
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("=== Simulated Stage Session ===\n");

    // Only channel 2 has a stage attached, mounted reversed
    let config = ControllerConfig::from_stages(
        &[None, None, Some(StageModel::Zfm2030)],
        &[false, false, true],
    )?
    .with_poll_interval_ms(10)
    .with_move_timeout_ms(5_000);
    let channel = 2;

    let sim = SimulatedController::new(3).with_zero_latency(2);
    let mut stages = StageController::builder()
        .config(&config)
        .link(sim)
        .delay(StdDelay)
        .observer(LogObserver::new(config.verbose))
        .build()?;

    println!("Position: {:.2} um", stages.get_position_um(channel)?.value());

    println!("\nSome relative moves:");
    for _ in 0..3 {
        stages.move_um(channel, 10.0_f64.um(), true, true)?;
    }
    for _ in 0..3 {
        stages.move_um(channel, (-10.0_f64).um(), true, true)?;
    }

    println!("\nLegalized move:");
    let legal = stages.legalize_move_um(channel, 10.0_f64.um(), true)?;
    println!("  10 um requested, {:.4} um achievable", legal.value());
    stages.move_um(channel, legal, false, true)?;

    println!("\nSome absolute moves:");
    for target in [-73.0_f64, 12.0, 58.0] {
        let reached = stages.move_um(channel, target.um(), false, true)?;
        println!("  {:>6.1} um -> {:.4} um", target, reached.value());
    }

    println!("\nOut-of-range move is refused:");
    if let Err(e) = stages.move_um(channel, 20_000.0_f64.um(), false, true) {
        println!("  {}", e);
    }

    println!("\nHome with non-blocking call:");
    stages.move_um(channel, 0.0_f64.um(), false, false)?;
    println!("  doing something else while channel {} moves", channel);

    println!("\nRe-set zero:");
    stages.move_um(channel, 10.0_f64.um(), true, true)?;
    stages.zero_encoder(channel)?;
    stages.move_um(channel, 0.0_f64.um(), false, true)?;
    println!("  position after re-zero: {:.2} um", stages.get_position_um(channel)?.value());

    stages.close()?;
    println!("\n=== Session Complete ===");
    Ok(())
}
