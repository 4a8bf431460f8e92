// UartWave - Real-Time UART Signal Generator
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Serial device the generator writes to.
pub const DEFAULT_DEVICE: &str = "/dev/ttyAMA0";
pub const DEFAULT_BAUD_RATE: u32 = 115_200;
pub const DEFAULT_FREQUENCY_HZ: f64 = 0.33;
/// Half of the output range.
pub const DEFAULT_AMPLITUDE: f64 = 4.0;
/// Centre of the output range, so samples span 0..8.
pub const DEFAULT_OFFSET: f64 = 4.0;
pub const DEFAULT_STEP_MS: u64 = 50;
/// SCHED_FIFO priority requested at startup (1-99).
pub const DEFAULT_RT_PRIORITY: i32 = 70;

pub const RT_PRIORITY_MIN: i32 = 1;
pub const RT_PRIORITY_MAX: i32 = 99;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("device path is empty")]
    EmptyDevice,
    #[error("baud rate must be non-zero")]
    ZeroBaudRate,
    #[error("frequency must be finite and positive, got {0}")]
    InvalidFrequency(f64),
    #[error("amplitude must be finite and non-negative, got {0}")]
    InvalidAmplitude(f64),
    #[error("offset must be finite, got {0}")]
    InvalidOffset(f64),
    #[error("step must be non-zero")]
    ZeroStep,
    #[error("real-time priority {0} outside 1..=99")]
    InvalidPriority(i32),
}

/// Run parameters for one generator instance.
///
/// The values are fixed at build time; `Default` is the only constructor the
/// binary uses. Tests build variants with struct update syntax.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaveConfig {
    pub device: PathBuf,
    pub baud_rate: u32,
    pub frequency_hz: f64,
    pub amplitude: f64,
    pub offset: f64,
    #[serde(serialize_with = "serialize_millis", rename = "step_ms")]
    pub step: Duration,
    pub rt_priority: i32,
}

fn serialize_millis<S: serde::Serializer>(step: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(step.as_millis() as u64)
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            device: PathBuf::from(DEFAULT_DEVICE),
            baud_rate: DEFAULT_BAUD_RATE,
            frequency_hz: DEFAULT_FREQUENCY_HZ,
            amplitude: DEFAULT_AMPLITUDE,
            offset: DEFAULT_OFFSET,
            step: Duration::from_millis(DEFAULT_STEP_MS),
            rt_priority: DEFAULT_RT_PRIORITY,
        }
    }
}

impl WaveConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.device.as_os_str().is_empty() {
            return Err(ConfigError::EmptyDevice);
        }
        if self.baud_rate == 0 {
            return Err(ConfigError::ZeroBaudRate);
        }
        if !self.frequency_hz.is_finite() || self.frequency_hz <= 0.0 {
            return Err(ConfigError::InvalidFrequency(self.frequency_hz));
        }
        if !self.amplitude.is_finite() || self.amplitude < 0.0 {
            return Err(ConfigError::InvalidAmplitude(self.amplitude));
        }
        if !self.offset.is_finite() {
            return Err(ConfigError::InvalidOffset(self.offset));
        }
        if self.step.is_zero() {
            return Err(ConfigError::ZeroStep);
        }
        if !(RT_PRIORITY_MIN..=RT_PRIORITY_MAX).contains(&self.rt_priority) {
            return Err(ConfigError::InvalidPriority(self.rt_priority));
        }
        Ok(())
    }

    /// Lowest and highest value the generator can emit.
    pub fn range(&self) -> (f64, f64) {
        (self.offset - self.amplitude, self.offset + self.amplitude)
    }

    /// Startup banner, e.g. `Outputting sine wave: freq=0.33 Hz, range 0–8, step=50ms`.
    pub fn summary(&self) -> String {
        let (low, high) = self.range();
        format!(
            "Outputting sine wave: freq={} Hz, range {}–{}, step={}ms",
            self.frequency_hz,
            low,
            high,
            self.step.as_millis()
        )
    }

    /// Effective parameters as a single-line JSON object for the startup log.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
