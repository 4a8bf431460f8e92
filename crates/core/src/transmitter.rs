// UartWave - Real-Time UART Signal Generator
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::line::SampleLine;
use crate::schedule::{Clock, MonoTime, PeriodicSchedule};
use crate::serial::SampleSink;
use crate::stats::TimingStats;
use crate::wave::SineWave;
use std::time::Duration;
use tracing::{info, warn};
use uartwave_config::WaveConfig;

/// Ticks between timing summaries (10 s at the default 50 ms step).
pub const STATS_INTERVAL_TICKS: u64 = 200;

/// What happened during one loop iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub index: u64,
    pub elapsed: Duration,
    pub value: f64,
    pub lateness: Duration,
}

/// The periodic sample loop.
///
/// Each tick samples the wave at the time elapsed since construction, writes
/// one line to the sink, drains it, then sleeps until the next absolute
/// deadline.
#[derive(Debug)]
pub struct Transmitter<S: SampleSink, C: Clock> {
    sink: S,
    clock: C,
    wave: SineWave,
    start: MonoTime,
    schedule: PeriodicSchedule,
    line: SampleLine,
    stats: TimingStats,
    ticks: u64,
}

impl<S: SampleSink, C: Clock> Transmitter<S, C> {
    pub fn new(config: &WaveConfig, sink: S, clock: C) -> Self {
        let start = clock.now();
        Self {
            sink,
            wave: SineWave::from_config(config),
            start,
            schedule: PeriodicSchedule::starting_at(start, config.step),
            line: SampleLine::new(),
            stats: TimingStats::new(config.step / 10),
            ticks: 0,
            clock,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn schedule(&self) -> &PeriodicSchedule {
        &self.schedule
    }

    pub fn stats(&self) -> &TimingStats {
        &self.stats
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn start(&self) -> MonoTime {
        self.start
    }

    pub fn tick(&mut self) -> TickReport {
        let elapsed = self.clock.now().saturating_duration_since(self.start);
        let value = self.wave.sample(elapsed);
        self.line.set(value);

        // No retry: a failed write just loses this sample.
        if let Err(e) = self.sink.write_line(self.line.as_bytes()) {
            warn!("UART write failed: {}", e);
        }
        if let Err(e) = self.sink.drain() {
            warn!("UART drain failed: {}", e);
        }
        info!("Sent: {}", self.line);

        let lateness = self.schedule.wait(&mut self.clock);
        self.stats.record(lateness);

        let index = self.ticks;
        self.ticks += 1;
        if self.ticks % STATS_INTERVAL_TICKS == 0 {
            self.report_timing();
        }

        TickReport {
            index,
            elapsed,
            value,
            lateness,
        }
    }

    /// Runs exactly `ticks` iterations.
    pub fn run_for(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    /// Runs until the process is killed.
    pub fn run(&mut self) -> ! {
        loop {
            self.tick();
        }
    }

    fn report_timing(&mut self) {
        info!(
            "Timing over last {} ticks: lateness min={:?} mean={:?} max={:?}, late={}",
            self.stats.samples(),
            self.stats.min(),
            self.stats.mean(),
            self.stats.max(),
            self.stats.late()
        );
        if self.stats.late() > 0 {
            warn!(
                "{} of {} wake-ups missed the {:?} lateness budget",
                self.stats.late(),
                self.stats.samples(),
                self.schedule.step() / 10
            );
        }
        self.stats.reset();
    }
}
