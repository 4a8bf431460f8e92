// UartWave - Real-Time UART Signal Generator
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use serialport::{DataBits, FlowControl, Parity, StopBits, TTYPort};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use uartwave_config::WaveConfig;

/// Upper bound for a single blocking write on the TTY.
const WRITE_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, thiserror::Error)]
pub enum SerialError {
    #[error("failed to open {}", .device.display())]
    Open {
        device: PathBuf,
        #[source]
        source: serialport::Error,
    },
}

/// Destination for formatted sample lines.
pub trait SampleSink {
    fn write_line(&mut self, line: &[u8]) -> io::Result<()>;

    /// Blocks until everything written so far has left the device.
    fn drain(&mut self) -> io::Result<()>;
}

/// A configured UART: raw mode, 8N1, receiver enabled, modem lines ignored.
pub struct UartPort {
    port: TTYPort,
    device: PathBuf,
}

impl std::fmt::Debug for UartPort {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UartPort")
            .field("device", &self.device)
            .finish_non_exhaustive()
    }
}

impl UartPort {
    pub fn device(&self) -> &Path {
        &self.device
    }
}

impl SampleSink for UartPort {
    fn write_line(&mut self, line: &[u8]) -> io::Result<()> {
        self.port.write_all(line)
    }

    fn drain(&mut self) -> io::Result<()> {
        // TTYPort::flush waits on tcdrain.
        self.port.flush()
    }
}

/// Opens and configures the device named in `config`.
///
/// `serialport` puts the line into raw mode and sets `CREAD | CLOCAL`, which
/// enables the receiver and ignores modem control lines.
pub fn open_uart(config: &WaveConfig) -> Result<UartPort, SerialError> {
    let device = config.device.clone();
    let port = serialport::new(device.to_string_lossy(), config.baud_rate)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .flow_control(FlowControl::None)
        .timeout(WRITE_TIMEOUT)
        .open_native()
        .map_err(|source| SerialError::Open {
            device: device.clone(),
            source,
        })?;

    debug!("Opened {} at {} baud", device.display(), config.baud_rate);
    Ok(UartPort { port, device })
}

/// Sink that keeps every line in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    lines: Vec<Vec<u8>>,
    drains: u64,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[Vec<u8>] {
        &self.lines
    }

    /// Lines decoded as UTF-8, lossy.
    pub fn lines_lossy(&self) -> Vec<String> {
        self.lines
            .iter()
            .map(|l| String::from_utf8_lossy(l).into_owned())
            .collect()
    }

    pub fn drains(&self) -> u64 {
        self.drains
    }
}

impl SampleSink for MemorySink {
    fn write_line(&mut self, line: &[u8]) -> io::Result<()> {
        self.lines.push(line.to_vec());
        Ok(())
    }

    fn drain(&mut self) -> io::Result<()> {
        self.drains += 1;
        Ok(())
    }
}
