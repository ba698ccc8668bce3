// src/timeout.rs

//! Conversion of caller timeouts, given in (possibly fractional) seconds,
//! into the two kernel representations: `epoll_wait` milliseconds and the
//! `timespec` taken by `kevent`.

use crate::error::{Error, Result};

const NANOS_PER_SEC: i64 = 1_000_000_000;

/// Integral seconds and nanoseconds, the portable shape of a `timespec`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutSpec {
    pub seconds: i64,
    pub nanoseconds: i64,
}

/// Converts a poll timeout in seconds to `epoll_wait` milliseconds.
///
/// Any negative value means "block indefinitely" and maps to `-1`.
/// Sub-millisecond fractions are truncated.
pub fn to_millis(timeout: f64) -> Result<libc::c_int> {
    if timeout.is_nan() {
        return Err(Error::invalid("timeout must be a number, got NaN"));
    }
    if timeout < 0.0 {
        return Ok(-1);
    }
    let millis = timeout * 1000.0;
    if millis > libc::c_int::MAX as f64 {
        return Err(Error::NumericOverflow("timeout is too large"));
    }
    Ok(millis as libc::c_int)
}

/// Converts a `kevent` timeout in seconds to a [`TimeoutSpec`].
///
/// `None` means "block indefinitely". Negative and NaN timeouts are
/// rejected; values beyond the range of `time_t` overflow.
pub fn to_timespec(timeout: Option<f64>) -> Result<Option<TimeoutSpec>> {
    let timeout = match timeout {
        None => return Ok(None),
        Some(t) => t,
    };
    if timeout.is_nan() {
        return Err(Error::invalid("timeout must be a number, got NaN"));
    }
    if timeout > libc::time_t::MAX as f64 {
        return Err(Error::NumericOverflow("timeout period too long"));
    }
    if timeout < 0.0 {
        return Err(Error::invalid(format!(
            "timeout must be positive or None, got {}",
            timeout
        )));
    }

    let whole = timeout.floor();
    let mut seconds = whole as i64;
    let mut nanoseconds = ((timeout - whole) * 1e9).round() as i64;
    // Rounding 0.9999999996 s up lands exactly on the next second.
    if nanoseconds >= NANOS_PER_SEC {
        seconds = seconds
            .checked_add(1)
            .ok_or(Error::NumericOverflow("timeout period too long"))?;
        nanoseconds -= NANOS_PER_SEC;
    }
    Ok(Some(TimeoutSpec {
        seconds,
        nanoseconds,
    }))
}
