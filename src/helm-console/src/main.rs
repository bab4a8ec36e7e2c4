// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Console shell for the autopilot head unit.
//!
//! Wires the core components (bus, control page, acquisition task) to a
//! simulated boat and a terminal display, then runs the cooperative tick
//! loop. Operator input arrives as stdin commands standing in for the
//! physical button and encoder.

mod config;
mod display;
mod input;
mod logging;
mod sim;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time;
use tracing::{info, warn};

use helm_core::bus::MessageBus;
use helm_core::pilot::control::{
    AutopilotControlPage, ButtonAction, ButtonEvent, EncoderEvent, TickEvent,
};
use helm_core::sensor::{AdcTask, AnalogConfig};
use helm_core::DynResult;

use config::ConsoleConfig;
use display::TermDisplay;
use input::Command;
use sim::{SimAdc, SimExecutor, SimVessel};

const PKG_DESCRIPTION: &str = concat!(env!("CARGO_PKG_NAME"), " - autopilot head-unit console");

#[derive(Debug, Parser)]
#[command(version = env!("CARGO_PKG_VERSION"), about = PKG_DESCRIPTION)]
struct Cli {
    /// Path to configuration file
    #[arg(long = "config", short = 'C', value_name = "FILE")]
    config: Option<PathBuf>,
    /// Print example configuration and exit
    #[arg(long = "print-config")]
    print_config: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> DynResult<()> {
    let cli = Cli::parse();

    if cli.print_config {
        println!("{}", ConsoleConfig::example_toml());
        return Ok(());
    }

    let (cfg, config_path) = if let Some(ref path) = cli.config {
        (ConsoleConfig::load_from_file(path)?, Some(path.clone()))
    } else {
        ConsoleConfig::load_from_default_paths()?
    };

    logging::init_logging(cfg.general.log_level.as_deref());
    if let Some(ref path) = config_path {
        info!("Loaded configuration from {}", path.display());
    }

    run(cfg).await
}

async fn run(cfg: ConsoleConfig) -> DynResult<()> {
    let bus = Arc::new(MessageBus::new());
    let display = Arc::new(TermDisplay::new());
    let page = Arc::new(AutopilotControlPage::new(bus.clone(), display.clone()));
    bus.subscribe(page.clone())?;

    let executor = Arc::new(SimExecutor::new(cfg.rudder.angular_travel_deg.to_radians()));
    bus.subscribe(executor.clone())?;

    let mut vessel = SimVessel::new(bus.clone(), &cfg.sim, executor.clone());
    let mut adc = AdcTask::new(
        SimAdc::new(&cfg.sim, cfg.sensor.full_scale_voltage),
        bus.clone(),
        AnalogConfig {
            full_scale_voltage: cfg.sensor.full_scale_voltage,
        },
        cfg.rudder.aux_sense(),
    );

    info!(
        "Starting helm-console (tick {} ms, sensor poll {} ms)",
        cfg.ui.tick_period_ms, cfg.sensor.poll_period_ms
    );
    info!("Commands: press, release, turn <deg>, status, quit");

    let sensor_period = Duration::from_millis(cfg.sensor.poll_period_ms);
    let mut tick = time::interval(Duration::from_millis(cfg.ui.tick_period_ms));
    let mut sensor = time::interval(sensor_period);
    let mut render = time::interval(Duration::from_millis(cfg.ui.render_period_ms));
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            _ = tick.tick() => {
                page.handle_tick(TickEvent { at: Instant::now() });
            }
            _ = sensor.tick() => {
                vessel.tick(sensor_period)?;
                adc.poll()?;
                executor.tick(&bus)?;
            }
            _ = render.tick() => {
                println!("{}", display.status_line());
            }
            line = lines.next_line() => {
                match line? {
                    None => break,
                    Some(line) => match input::parse_line(&line) {
                        Ok(None) => {}
                        Ok(Some(command)) => {
                            if !dispatch_command(command, &page, &display) {
                                break;
                            }
                        }
                        Err(hint) => warn!("{}", hint),
                    },
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                break;
            }
        }
    }
    Ok(())
}

/// Route one operator command into the page. Returns `false` to quit.
fn dispatch_command(command: Command, page: &AutopilotControlPage, display: &TermDisplay) -> bool {
    match command {
        Command::Press => {
            page.handle_button(ButtonEvent {
                action: ButtonAction::Pressed,
                at: Instant::now(),
            });
        }
        Command::Release => {
            let consumed = page.handle_button(ButtonEvent {
                action: ButtonAction::Released,
                at: Instant::now(),
            });
            if !consumed {
                // Short click: navigation belongs to the shell, and this
                // console has a single page.
                info!("short click: next page (single-page console)");
            }
        }
        Command::Turn(degrees) => {
            page.handle_encoder(EncoderEvent {
                rotation_deg: degrees,
            });
        }
        Command::Status => println!("{}", display.status_line()),
        Command::Quit => return false,
    }
    true
}
