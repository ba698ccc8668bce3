// src/os/kqueue.rs

//! This module provides an owned `kqueue` instance for macOS and the BSDs.
//! Unlike epoll, registration and waiting happen in one `kevent(2)` call,
//! so the whole API is [`Kqueue::control`].

use super::handle::DescriptorHandle;
use crate::error::{Error, Result};
use crate::kevent::KEvent;
use crate::timeout::to_timespec;
use log::trace;
use std::os::unix::io::{AsRawFd, RawFd};

const KIND: &str = "kqueue";

/// Allocates an empty vector able to hold exactly `len` records.
fn event_buffer(len: usize) -> Result<Vec<libc::kevent>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|e| Error::alloc(len, e))?;
    Ok(buf)
}

/// An owned kqueue instance.
///
/// For example, to watch a socket until it becomes writable:
///
/// ```no_run
/// # use kselect::{consts::*, KEvent, Kqueue};
/// # fn main() -> kselect::Result<()> {
/// # let sock = std::net::TcpStream::connect("127.0.0.1:80").unwrap();
/// let kq = Kqueue::new()?;
/// let change = KEvent::new(&sock)?
///     .with_filter(KQ_FILTER_WRITE)
///     .with_flags(KQ_EV_ADD);
/// kq.control(&[change], 0, Some(0.0))?;
/// let ready = kq.control(&[], 1, Some(1.0))?;
/// kq.control(&[change.with_flags(KQ_EV_DELETE)], 0, Some(0.0))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Kqueue {
    handle: DescriptorHandle,
}

impl Kqueue {
    pub fn new() -> Result<Self> {
        let kqueue_fd = unsafe { libc::kqueue() };
        let handle = DescriptorHandle::from_syscall(KIND, "kqueue", kqueue_fd)?;
        Ok(Self { handle })
    }

    /// Takes ownership of an existing kqueue descriptor.
    pub fn from_fd(fd: RawFd) -> Self {
        Self {
            handle: DescriptorHandle::adopt(KIND, fd),
        }
    }

    /// Closes the kqueue descriptor; repeated calls do nothing.
    pub fn close(&self) -> Result<()> {
        self.handle.close()
    }

    pub fn is_closed(&self) -> bool {
        self.handle.is_closed()
    }

    pub fn fileno(&self) -> Result<RawFd> {
        self.handle.fileno()
    }

    /// Applies `changelist` and waits for up to `max_events` results.
    ///
    /// `timeout` is in seconds and may be fractional; `None` blocks until
    /// an event arrives. Changes are submitted in slice order and results
    /// come back in kernel order. `control(&[], 0, Some(0.0))` returns
    /// immediately with nothing.
    pub fn control(
        &self,
        changelist: &[KEvent],
        max_events: i32,
        timeout: Option<f64>,
    ) -> Result<Vec<KEvent>> {
        let kqueue_fd = self.handle.fileno()?;
        if max_events < 0 {
            return Err(Error::invalid(format!(
                "length of eventlist must be 0 or positive, got {}",
                max_events
            )));
        }
        let nchanges = libc::c_int::try_from(changelist.len()).map_err(|_| {
            Error::invalid(format!(
                "changelist of {} events is too long",
                changelist.len()
            ))
        })?;

        let timeout = to_timespec(timeout)?.map(|spec| libc::timespec {
            tv_sec: spec.seconds as libc::time_t,
            tv_nsec: spec.nanoseconds as _,
        });
        let timeout_ptr = timeout
            .as_ref()
            .map_or(std::ptr::null(), |ts| ts as *const libc::timespec);

        let mut changes = event_buffer(changelist.len())?;
        changes.extend(changelist.iter().map(KEvent::encode));
        let mut events = event_buffer(max_events as usize)?;

        trace!(
            "kevent on kqueue_fd {}: {} changes, up to {} events, timeout {:?}",
            kqueue_fd,
            nchanges,
            max_events,
            timeout.map(|ts| (ts.tv_sec, ts.tv_nsec))
        );
        let nev = unsafe {
            libc::kevent(
                kqueue_fd,
                if nchanges == 0 {
                    std::ptr::null()
                } else {
                    changes.as_ptr()
                },
                nchanges,
                if max_events == 0 {
                    std::ptr::null_mut()
                } else {
                    events.as_mut_ptr()
                },
                max_events,
                timeout_ptr,
            )
        };
        if nev == -1 {
            return Err(Error::last_os_error("kevent"));
        }
        // SAFETY: the kernel filled in the first `nev` records.
        unsafe { events.set_len(nev as usize) };

        trace!("kevent on kqueue_fd {} returned {} events", kqueue_fd, nev);
        Ok(events.iter().map(KEvent::decode).collect())
    }
}

impl AsRawFd for Kqueue {
    /// Returns `-1` once closed.
    fn as_raw_fd(&self) -> RawFd {
        self.handle.raw()
    }
}
