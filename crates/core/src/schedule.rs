// UartWave - Real-Time UART Signal Generator
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Monotonic time points and the absolute-deadline periodic scheduler.
//!
//! Deadlines live on a fixed lattice `origin + k * step`. Each deadline is
//! derived from the previous deadline, never from the wake-up time, so a late
//! wake-up on one tick does not shift any later tick.

use std::ops::{Add, Sub};
use std::time::Duration;
use tracing::warn;

const NANOS_PER_SEC: u32 = 1_000_000_000;

/// A point on the monotonic clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MonoTime {
    secs: i64,
    nanos: u32,
}

impl MonoTime {
    /// Builds a time point, carrying excess nanoseconds into seconds.
    pub const fn new(secs: i64, nanos: u32) -> Self {
        Self {
            secs: secs + (nanos / NANOS_PER_SEC) as i64,
            nanos: nanos % NANOS_PER_SEC,
        }
    }

    pub const fn secs(&self) -> i64 {
        self.secs
    }

    pub const fn subsec_nanos(&self) -> u32 {
        self.nanos
    }

    #[allow(clippy::unnecessary_cast)]
    pub fn from_timespec(ts: libc::timespec) -> Self {
        Self::new(ts.tv_sec as i64, ts.tv_nsec as u32)
    }

    #[allow(clippy::unnecessary_cast)]
    pub fn to_timespec(self) -> libc::timespec {
        // SAFETY: timespec is plain old data; all-zero is a valid value and
        // covers targets that carry padding fields.
        let mut ts: libc::timespec = unsafe { std::mem::zeroed() };
        ts.tv_sec = self.secs as libc::time_t;
        ts.tv_nsec = self.nanos as libc::c_long;
        ts
    }

    /// Time elapsed since `earlier`, or zero if `earlier` is in the future.
    pub fn saturating_duration_since(self, earlier: MonoTime) -> Duration {
        if self <= earlier {
            return Duration::ZERO;
        }
        let (secs, nanos) = if self.nanos >= earlier.nanos {
            (self.secs - earlier.secs, self.nanos - earlier.nanos)
        } else {
            (
                self.secs - earlier.secs - 1,
                self.nanos + NANOS_PER_SEC - earlier.nanos,
            )
        };
        Duration::new(secs as u64, nanos)
    }
}

impl Add<Duration> for MonoTime {
    type Output = MonoTime;

    fn add(self, rhs: Duration) -> MonoTime {
        let mut secs = self.secs + rhs.as_secs() as i64;
        let mut nanos = self.nanos + rhs.subsec_nanos();
        if nanos >= NANOS_PER_SEC {
            nanos -= NANOS_PER_SEC;
            secs += 1;
        }
        MonoTime { secs, nanos }
    }
}

impl Sub for MonoTime {
    type Output = Duration;

    fn sub(self, rhs: MonoTime) -> Duration {
        self.saturating_duration_since(rhs)
    }
}

/// Source of monotonic time with an absolute sleep.
pub trait Clock {
    fn now(&self) -> MonoTime;

    /// Blocks until the clock reads at least `deadline`. Returns immediately
    /// if the deadline has already passed.
    fn sleep_until(&mut self, deadline: MonoTime);
}

/// `CLOCK_MONOTONIC` with `clock_nanosleep(TIMER_ABSTIME)`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicClock;

impl MonotonicClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> MonoTime {
        // SAFETY: zeroed timespec is valid; it is only used as an out-pointer.
        let mut ts: libc::timespec = unsafe { std::mem::zeroed() };
        // SAFETY: CLOCK_MONOTONIC is always available on Linux and `ts` is a
        // valid, exclusively borrowed out-pointer.
        unsafe {
            libc::clock_gettime(libc::CLOCK_MONOTONIC, &mut ts);
        }
        MonoTime::from_timespec(ts)
    }

    fn sleep_until(&mut self, deadline: MonoTime) {
        let ts = deadline.to_timespec();
        loop {
            // SAFETY: `ts` outlives the call; the remainder pointer may be
            // null for absolute sleeps.
            let rc = unsafe {
                libc::clock_nanosleep(
                    libc::CLOCK_MONOTONIC,
                    libc::TIMER_ABSTIME,
                    &ts,
                    std::ptr::null_mut(),
                )
            };
            match rc {
                0 => return,
                // Signal delivery: the deadline is absolute, so just go again.
                libc::EINTR => continue,
                errno => {
                    warn!(
                        "clock_nanosleep failed: {}",
                        std::io::Error::from_raw_os_error(errno)
                    );
                    return;
                }
            }
        }
    }
}

/// Fixed-step periodic deadline generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodicSchedule {
    origin: MonoTime,
    next: MonoTime,
    step: Duration,
    completed: u64,
}

impl PeriodicSchedule {
    /// First deadline is one `step` after `origin`.
    pub fn starting_at(origin: MonoTime, step: Duration) -> Self {
        Self {
            origin,
            next: origin + step,
            step,
            completed: 0,
        }
    }

    pub fn origin(&self) -> MonoTime {
        self.origin
    }

    pub fn step(&self) -> Duration {
        self.step
    }

    pub fn next_deadline(&self) -> MonoTime {
        self.next
    }

    /// Number of deadlines already waited for.
    pub fn completed(&self) -> u64 {
        self.completed
    }

    /// The `n`-th deadline (zero-based): `origin + (n + 1) * step`.
    pub fn deadline_at(&self, n: u64) -> MonoTime {
        let nanos = self.step.as_nanos() * (u128::from(n) + 1);
        let secs = (nanos / u128::from(NANOS_PER_SEC)) as u64;
        let sub = (nanos % u128::from(NANOS_PER_SEC)) as u32;
        self.origin + Duration::new(secs, sub)
    }

    /// Sleeps until the pending deadline, then advances it by one step.
    ///
    /// Returns how late the wake-up was relative to the deadline.
    pub fn wait<C: Clock>(&mut self, clock: &mut C) -> Duration {
        let deadline = self.next;
        clock.sleep_until(deadline);
        let lateness = clock.now().saturating_duration_since(deadline);
        self.next = deadline + self.step;
        self.completed += 1;
        lateness
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Clock that jumps straight to the deadline plus a configurable delay.
    struct SteppingClock {
        now: MonoTime,
        oversleep: Duration,
    }

    impl Clock for SteppingClock {
        fn now(&self) -> MonoTime {
            self.now
        }

        fn sleep_until(&mut self, deadline: MonoTime) {
            if deadline > self.now {
                self.now = deadline + self.oversleep;
            }
        }
    }

    #[test]
    fn test_add_normalizes_nanoseconds() {
        let t = MonoTime::new(5, 990_000_000) + Duration::from_millis(50);
        assert_eq!(t, MonoTime::new(6, 40_000_000));
        assert_eq!(t.secs(), 6);
        assert_eq!(t.subsec_nanos(), 40_000_000);
        assert_eq!(MonoTime::new(1, 2_500_000_000), MonoTime::new(3, 500_000_000));
    }

    #[test]
    fn test_duration_since_borrows_across_seconds() {
        let a = MonoTime::new(10, 100);
        let b = MonoTime::new(9, 999_999_900);
        assert_eq!(a - b, Duration::from_nanos(200));
        assert_eq!(b - a, Duration::ZERO);
    }

    #[test]
    fn test_timespec_conversion() {
        let t = MonoTime::new(42, 123_456_789);
        let ts = t.to_timespec();
        assert_eq!(ts.tv_sec, 42);
        assert_eq!(ts.tv_nsec, 123_456_789);
        assert_eq!(MonoTime::from_timespec(ts), t);
    }

    #[test]
    fn test_oversleep_does_not_drift() {
        let origin = MonoTime::new(100, 0);
        let step = Duration::from_millis(50);
        let mut clock = SteppingClock {
            now: origin,
            oversleep: Duration::from_micros(700),
        };
        let mut schedule = PeriodicSchedule::starting_at(origin, step);
        assert_eq!(schedule.origin(), origin);
        assert_eq!(schedule.step(), step);

        for n in 0..10_000u64 {
            assert_eq!(schedule.next_deadline(), schedule.deadline_at(n));
            let lateness = schedule.wait(&mut clock);
            assert_eq!(lateness, Duration::from_micros(700));
        }

        // 10_000 * 50ms = 500s exactly, regardless of the per-tick oversleep.
        assert_eq!(schedule.next_deadline(), MonoTime::new(600, 50_000_000));
        assert_eq!(schedule.completed(), 10_000);
    }

    #[test]
    fn test_overrun_catches_up_on_lattice() {
        let origin = MonoTime::new(0, 0);
        let step = Duration::from_millis(50);
        let mut clock = SteppingClock {
            now: origin,
            oversleep: Duration::ZERO,
        };
        let mut schedule = PeriodicSchedule::starting_at(origin, step);

        // Simulate a stall of three periods before the first wait.
        clock.now = origin + Duration::from_millis(160);
        assert_eq!(schedule.wait(&mut clock), Duration::from_millis(110));
        assert_eq!(schedule.wait(&mut clock), Duration::from_millis(60));
        assert_eq!(schedule.wait(&mut clock), Duration::from_millis(10));
        // Back on time: the fourth deadline (200ms) is still in the future.
        assert_eq!(schedule.wait(&mut clock), Duration::ZERO);
        assert_eq!(clock.now, origin + Duration::from_millis(200));
    }

    #[test]
    fn test_monotonic_clock_moves_forward() {
        let mut clock = MonotonicClock::new();
        let start = clock.now();
        let deadline = start + Duration::from_millis(5);
        clock.sleep_until(deadline);
        assert!(clock.now() >= deadline);
    }
}
