// UartWave - Real-Time UART Signal Generator
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use std::io;

/// Flag the kernel may or into the policy returned by `sched_getscheduler`.
const SCHED_RESET_ON_FORK: i32 = 0x4000_0000;

#[derive(Debug, thiserror::Error)]
pub enum RtError {
    #[error("priority {priority} outside SCHED_FIFO range {min}..={max}")]
    PriorityOutOfRange { priority: i32, min: i32, max: i32 },
    #[error("scheduling query failed: {0}")]
    Query(#[source] io::Error),
    #[error("sched_setscheduler failed: {0}")]
    Os(#[source] io::Error),
}

/// Scheduling policy of the calling thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedPolicy {
    Other,
    Fifo,
    RoundRobin,
    Batch,
    Idle,
    Unknown(i32),
}

impl SchedPolicy {
    fn from_raw(raw: i32) -> Self {
        match raw {
            libc::SCHED_OTHER => Self::Other,
            libc::SCHED_FIFO => Self::Fifo,
            libc::SCHED_RR => Self::RoundRobin,
            libc::SCHED_BATCH => Self::Batch,
            libc::SCHED_IDLE => Self::Idle,
            other => Self::Unknown(other),
        }
    }
}

/// Valid `SCHED_FIFO` priorities as reported by the kernel.
pub fn fifo_priority_range() -> io::Result<(i32, i32)> {
    // SAFETY: pure queries with no pointer arguments.
    let (min, max) = unsafe {
        (
            libc::sched_get_priority_min(libc::SCHED_FIFO),
            libc::sched_get_priority_max(libc::SCHED_FIFO),
        )
    };
    if min < 0 || max < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok((min, max))
}

/// Switches the calling thread to `SCHED_FIFO` at `priority`.
///
/// Usually needs root or `CAP_SYS_NICE`. Callers treat failure as
/// non-fatal and keep running at the default priority.
pub fn enable_realtime(priority: i32) -> Result<(), RtError> {
    let (min, max) = fifo_priority_range().map_err(RtError::Query)?;
    if !(min..=max).contains(&priority) {
        return Err(RtError::PriorityOutOfRange { priority, min, max });
    }

    // SAFETY: sched_param is plain old data; zeroing covers the
    // platform-specific reserved fields.
    let mut param: libc::sched_param = unsafe { std::mem::zeroed() };
    param.sched_priority = priority;

    // SAFETY: pid 0 targets the calling thread; `param` outlives the call.
    let rc = unsafe { libc::sched_setscheduler(0, libc::SCHED_FIFO, &param) };
    if rc < 0 {
        return Err(RtError::Os(io::Error::last_os_error()));
    }
    Ok(())
}

pub fn current_policy() -> io::Result<SchedPolicy> {
    // SAFETY: pid 0 targets the calling thread.
    let raw = unsafe { libc::sched_getscheduler(0) };
    if raw < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(SchedPolicy::from_raw(raw & !SCHED_RESET_ON_FORK))
}
