// UartWave - Real-Time UART Signal Generator
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

pub mod line;
pub mod realtime;
pub mod schedule;
pub mod serial;
pub mod stats;
pub mod transmitter;
pub mod wave;

pub use line::{parse_line, LineError, SampleLine};
pub use realtime::{current_policy, enable_realtime, RtError, SchedPolicy};
pub use schedule::{Clock, MonoTime, MonotonicClock, PeriodicSchedule};
pub use serial::{open_uart, MemorySink, SampleSink, SerialError, UartPort};
pub use stats::TimingStats;
pub use transmitter::{TickReport, Transmitter, STATS_INTERVAL_TICKS};
pub use wave::SineWave;
