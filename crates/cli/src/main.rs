// UartWave - Real-Time UART Signal Generator
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use anyhow::{Context, Result};
use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info, warn};

use uartwave_config::WaveConfig;
use uartwave_core::{realtime, MonotonicClock, Transmitter, UartPort};

const EXIT_OPEN_FAILURE: u8 = 1;
const EXIT_CONFIG_ERROR: u8 = 2;

/// Streams a sine wave over the board UART as CRLF-terminated ASCII lines.
///
/// Device, baud rate, waveform and cadence are compiled in; see
/// `uartwave_config::WaveConfig`.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {}

fn main() -> ExitCode {
    let _cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = WaveConfig::default();
    if let Err(e) = config.validate() {
        error!("Invalid configuration: {}", e);
        return ExitCode::from(EXIT_CONFIG_ERROR);
    }
    match config.to_json() {
        Ok(json) => info!("Configuration: {}", json),
        Err(e) => warn!("Could not serialize configuration: {}", e),
    }

    elevate_priority(&config);

    let port = match open_output(&config) {
        Ok(port) => port,
        Err(e) => {
            error!("{:#}", e);
            return ExitCode::from(EXIT_OPEN_FAILURE);
        }
    };

    info!("{}", config.summary());
    let mut transmitter = Transmitter::new(&config, port, MonotonicClock::new());
    transmitter.run()
}

/// Best effort: on failure the loop still runs at the default priority.
fn elevate_priority(config: &WaveConfig) {
    match realtime::enable_realtime(config.rt_priority) {
        Ok(()) => info!(
            "Real-time scheduling enabled (SCHED_FIFO, priority {})",
            config.rt_priority
        ),
        Err(e) => {
            warn!("Could not enable RT scheduling: {}", e);
            if let Ok(policy) = realtime::current_policy() {
                warn!("Continuing with {:?} scheduling", policy);
            }
        }
    }
}

fn open_output(config: &WaveConfig) -> Result<UartPort> {
    let port = uartwave_core::open_uart(config).context("Failed to open UART")?;
    info!("UART ready: {}", port.device().display());
    Ok(port)
}
