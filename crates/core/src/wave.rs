// UartWave - Real-Time UART Signal Generator
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use std::f64::consts::TAU;
use std::time::Duration;
use uartwave_config::WaveConfig;

/// Time-driven sine source: `amplitude * sin(2π·f·t) + offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SineWave {
    frequency_hz: f64,
    amplitude: f64,
    offset: f64,
}

impl SineWave {
    pub fn new(frequency_hz: f64, amplitude: f64, offset: f64) -> Self {
        Self {
            frequency_hz,
            amplitude,
            offset,
        }
    }

    pub fn from_config(config: &WaveConfig) -> Self {
        Self::new(config.frequency_hz, config.amplitude, config.offset)
    }

    pub fn frequency_hz(&self) -> f64 {
        self.frequency_hz
    }

    /// Closed interval every sample falls into.
    pub fn bounds(&self) -> (f64, f64) {
        let half = self.amplitude.abs();
        (self.offset - half, self.offset + half)
    }

    /// Value of the wave `elapsed` after the time reference.
    pub fn sample(&self, elapsed: Duration) -> f64 {
        self.sample_secs(elapsed.as_secs_f64())
    }

    /// Value at tick `n` of a lattice with spacing `step`.
    pub fn sample_at_tick(&self, n: u64, step: Duration) -> f64 {
        self.sample_secs(n as f64 * step.as_secs_f64())
    }

    fn sample_secs(&self, t: f64) -> f64 {
        let y = self.amplitude * (TAU * self.frequency_hz * t).sin() + self.offset;
        // sin() can land a few ULPs outside [-1, 1] after scaling. max/min
        // rather than clamp: a NaN bound propagates instead of panicking.
        let (low, high) = self.bounds();
        y.max(low).min(high)
    }
}
