//! Serial stage session.
//!
//! Connects to a real controller, reports every channel's position and optionally
//! performs one move.
//!
//! ```bash
//! cargo run --example serial_session -- --port /dev/ttyUSB0 --stages none,none,ZFM2030 \
//!     --reverse 2 --channel 2 --move-um 10
//! cargo run --example serial_session -- --config stages.toml --channel 0 --zero
//! ```

use std::path::PathBuf;

use clap::Parser;
use log::{info, warn};
use stage_motion::{load_config, ControllerConfig, StageController, StageModel, UnitExt};

/// Drive a multi-channel stage controller over a serial port
#[derive(Parser, Debug)]
#[command(name = "serial_session")]
#[command(about = "Read positions and move linear stages over a serial link")]
struct Args {
    /// TOML configuration file; overrides --port and --stages
    #[arg(long)]
    config: Option<PathBuf>,

    /// Serial port of the controller
    #[arg(long, default_value = "/dev/ttyUSB0")]
    port: String,

    /// Stage model per channel, comma separated ("none" for an empty channel)
    #[arg(long, value_delimiter = ',', default_value = "none,none,ZFM2030")]
    stages: Vec<String>,

    /// Channels mounted reversed
    #[arg(long, value_delimiter = ',')]
    reverse: Vec<u8>,

    /// Channel to act on
    #[arg(long, default_value = "2")]
    channel: u8,

    /// Move by (or to, with --absolute) this many micrometers
    #[arg(long, allow_negative_numbers = true)]
    move_um: Option<f64>,

    /// Treat --move-um as an absolute position
    #[arg(long)]
    absolute: bool,

    /// Re-zero the encoder of --channel before moving
    #[arg(long)]
    zero: bool,

    /// Give up waiting for a move after this many milliseconds
    #[arg(long)]
    timeout_ms: Option<u32>,

    /// Log every position poll
    #[arg(short, long)]
    verbose: bool,
}

/// Blocking sleep for the host.
struct StdDelay;

impl embedded_hal::delay::DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(ns as u64));
    }
}

fn config_from_args(args: &Args) -> Result<ControllerConfig, Box<dyn std::error::Error>> {
    if let Some(path) = &args.config {
        return Ok(load_config(path)?);
    }

    let stages = args
        .stages
        .iter()
        .map(|name| match name.as_str() {
            "none" | "None" | "" => Ok(None),
            other => StageModel::from_name(other).map(Some),
        })
        .collect::<Result<Vec<_>, _>>()?;
    let reverse: Vec<bool> = (0..stages.len() as u8)
        .map(|ch| args.reverse.contains(&ch))
        .collect();

    let mut config = ControllerConfig::from_stages(&stages, &reverse)?.with_port(&args.port)?;
    if let Some(ms) = args.timeout_ms {
        config = config.with_move_timeout_ms(ms);
    }
    config.verbose = args.verbose;
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = config_from_args(&args)?;
    info!(
        "Opening {} at {} baud",
        config.port.as_deref().unwrap_or("<none>"),
        config.baud_rate
    );

    let mut stages = StageController::open(&config, StdDelay)?;

    let ids: Vec<u8> = stages.channel_ids().collect();
    for id in ids {
        let model = stages.channel(id)?.model();
        info!(
            "Channel {} ({}): {:.2} um",
            id,
            model.name(),
            stages.get_position_um(id)?.value()
        );
    }

    if args.zero {
        stages.zero_encoder(args.channel)?;
    }

    if let Some(distance) = args.move_um {
        match stages.move_um(args.channel, distance.um(), !args.absolute, true) {
            Ok(reached) => info!("Channel {} at {:.4} um", args.channel, reached.value()),
            Err(e) => {
                warn!("Move failed: {}", e);
                if stages.abandon_move(args.channel)?.is_some() {
                    warn!("Pending move on channel {} abandoned", args.channel);
                }
            }
        }
    }

    stages.close()?;
    Ok(())
}
