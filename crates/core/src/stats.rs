// UartWave - Real-Time UART Signal Generator
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use std::time::Duration;

/// Wake-up lateness over a window of ticks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimingStats {
    samples: u64,
    late: u64,
    min: Option<Duration>,
    max: Duration,
    total: Duration,
    late_threshold: Duration,
}

impl TimingStats {
    /// A tick counts as late once its lateness exceeds `late_threshold`.
    pub fn new(late_threshold: Duration) -> Self {
        Self {
            late_threshold,
            ..Self::default()
        }
    }

    pub fn record(&mut self, lateness: Duration) {
        self.samples += 1;
        self.total += lateness;
        self.max = self.max.max(lateness);
        self.min = Some(self.min.map_or(lateness, |m| m.min(lateness)));
        if lateness > self.late_threshold {
            self.late += 1;
        }
    }

    pub fn samples(&self) -> u64 {
        self.samples
    }

    pub fn late(&self) -> u64 {
        self.late
    }

    pub fn min(&self) -> Duration {
        self.min.unwrap_or_default()
    }

    pub fn max(&self) -> Duration {
        self.max
    }

    pub fn mean(&self) -> Duration {
        if self.samples == 0 {
            return Duration::ZERO;
        }
        let nanos = self.total.as_nanos() / u128::from(self.samples);
        Duration::from_nanos(nanos as u64)
    }

    /// Clears the window but keeps the threshold.
    pub fn reset(&mut self) {
        *self = Self::new(self.late_threshold);
    }
}
