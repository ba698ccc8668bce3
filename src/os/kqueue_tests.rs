// src/os/kqueue_tests.rs

#![cfg(test)]

use super::kqueue::Kqueue;
use crate::consts::*;
use crate::error::Error;
use crate::kevent::KEvent;
use anyhow::{Context, Result};
use std::io::Write;
use std::os::unix::io::{AsRawFd, RawFd};
use std::os::unix::net::UnixStream;
use std::time::{Duration, Instant};

#[test_log::test]
fn it_should_return_nothing_for_an_empty_zero_timeout_call() -> Result<()> {
    let kq = Kqueue::new().context("kqueue()")?;
    assert!(kq.control(&[], 0, Some(0.0))?.is_empty());
    Ok(())
}

#[test_log::test]
fn it_should_report_a_writable_socket() -> Result<()> {
    let kq = Kqueue::new()?;
    let (a, _b) = UnixStream::pair()?;
    let change = KEvent::new(&a)?
        .with_filter(KQ_FILTER_WRITE)
        .with_flags(KQ_EV_ADD);

    let events = kq.control(&[change], 1, Some(1.0))?;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].ident(), a.as_raw_fd() as usize);
    assert_eq!(events[0].filter(), KQ_FILTER_WRITE);
    Ok(())
}

#[test_log::test]
fn it_should_report_pending_bytes_in_data() -> Result<()> {
    let kq = Kqueue::new()?;
    let (a, mut b) = UnixStream::pair()?;
    kq.control(&[KEvent::new(&a)?], 0, Some(0.0))?;
    b.write_all(b"hello")?;

    let events = kq.control(&[], 4, Some(1.0))?;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].filter(), KQ_FILTER_READ);
    assert_eq!(events[0].data(), 5);
    Ok(())
}

#[test_log::test]
fn it_should_stop_reporting_after_delete() -> Result<()> {
    let kq = Kqueue::new()?;
    let (a, _b) = UnixStream::pair()?;
    let add = KEvent::new(&a)?.with_filter(KQ_FILTER_WRITE);
    kq.control(&[add], 0, Some(0.0))?;
    kq.control(&[add.with_flags(KQ_EV_DELETE)], 0, Some(0.0))?;

    assert!(kq.control(&[], 1, Some(0.0))?.is_empty());
    Ok(())
}

#[test_log::test]
fn it_should_fail_deleting_an_unknown_watch() -> Result<()> {
    let kq = Kqueue::new()?;
    let (a, _b) = UnixStream::pair()?;
    let delete = KEvent::new(&a)?.with_flags(KQ_EV_DELETE);
    let err = kq.control(&[delete], 0, Some(0.0)).unwrap_err();
    assert_eq!(err.raw_os_error(), Some(libc::ENOENT));
    Ok(())
}

#[test_log::test]
fn it_should_preserve_udata_through_the_kernel() -> Result<()> {
    let kq = Kqueue::new()?;
    let (a, _b) = UnixStream::pair()?;
    let change = KEvent::new(&a)?
        .with_filter(KQ_FILTER_WRITE)
        .with_udata(0x5eed);

    let events = kq.control(&[change], 1, Some(1.0))?;
    assert_eq!(events[0].udata(), 0x5eed);
    Ok(())
}

#[test_log::test]
fn it_should_fire_a_oneshot_timer_once() -> Result<()> {
    let kq = Kqueue::new()?;
    let timer = KEvent::from_raw_parts(
        42,
        KQ_FILTER_TIMER,
        KQ_EV_ADD | KQ_EV_ONESHOT,
        0,
        10, // milliseconds
        0,
    );

    let events = kq.control(&[timer], 1, Some(1.0))?;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].ident(), 42);
    assert_eq!(events[0].filter(), KQ_FILTER_TIMER);

    assert!(kq.control(&[], 1, Some(0.05))?.is_empty());
    Ok(())
}

#[test_log::test]
fn it_should_honor_fractional_timeouts() -> Result<()> {
    let kq = Kqueue::new()?;
    let start = Instant::now();
    assert!(kq.control(&[], 1, Some(0.05))?.is_empty());
    assert!(start.elapsed() >= Duration::from_millis(40));
    Ok(())
}

#[test_log::test]
fn it_should_reject_negative_max_events() -> Result<()> {
    let kq = Kqueue::new()?;
    assert!(matches!(
        kq.control(&[], -1, Some(0.0)),
        Err(Error::InvalidArgument(_))
    ));
    Ok(())
}

#[test_log::test]
fn it_should_reject_negative_timeouts() -> Result<()> {
    let kq = Kqueue::new()?;
    assert!(matches!(
        kq.control(&[], 0, Some(-0.001)),
        Err(Error::InvalidArgument(_))
    ));
    Ok(())
}

#[test_log::test]
fn it_should_reject_overflowing_timeouts() -> Result<()> {
    let kq = Kqueue::new()?;
    assert!(matches!(
        kq.control(&[], 0, Some(f64::MAX)),
        Err(Error::NumericOverflow(_))
    ));
    Ok(())
}

#[test_log::test]
fn it_should_close_twice_and_then_fail_control() -> Result<()> {
    let kq = Kqueue::new()?;
    kq.close()?;
    kq.close()?;
    assert!(kq.is_closed());
    assert_eq!(kq.as_raw_fd(), -1);
    assert!(kq.fileno().unwrap_err().is_closed_handle());
    assert!(kq
        .control(&[], 0, Some(0.0))
        .unwrap_err()
        .is_closed_handle());
    Ok(())
}

#[test_log::test]
fn it_should_adopt_an_existing_kqueue_descriptor() -> Result<()> {
    let raw: RawFd = unsafe { libc::kqueue() };
    assert!(raw >= 0);
    let kq = Kqueue::from_fd(raw);
    assert_eq!(kq.fileno()?, raw);
    assert!(kq.control(&[], 0, Some(0.0))?.is_empty());
    Ok(())
}
