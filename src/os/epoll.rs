// src/os/epoll.rs

//! This module provides an owned `epoll` instance using raw `libc`
//! FFI calls for registering descriptors and waiting for readiness.
//! It defines type-safe enums and bitflags for epoll operations and events.

use super::handle::DescriptorHandle;
use crate::config::CONFIG;
use crate::descriptor::AsDescriptor;
use crate::error::{Error, Result};
use crate::timeout::to_millis;
use bitflags::bitflags;
use log::trace;
use std::os::unix::io::{AsRawFd, RawFd};

const KIND: &str = "epoll";

/// Sentinel accepted by [`Epoll::new`] and [`Epoll::poll`] meaning
/// "use the configured default".
pub const DEFAULT: i32 = -1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum EpollCtlOp {
    Add = libc::EPOLL_CTL_ADD,
    Mod = libc::EPOLL_CTL_MOD,
    Del = libc::EPOLL_CTL_DEL,
}

impl EpollCtlOp {
    fn name(self) -> &'static str {
        match self {
            EpollCtlOp::Add => "epoll_ctl(EPOLL_CTL_ADD)",
            EpollCtlOp::Mod => "epoll_ctl(EPOLL_CTL_MOD)",
            EpollCtlOp::Del => "epoll_ctl(EPOLL_CTL_DEL)",
        }
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EpollFlags: u32 {
        const EPOLLIN = libc::EPOLLIN as u32;
        const EPOLLOUT = libc::EPOLLOUT as u32;
        const EPOLLPRI = libc::EPOLLPRI as u32;
        const EPOLLERR = libc::EPOLLERR as u32;
        const EPOLLHUP = libc::EPOLLHUP as u32;
        const EPOLLRDHUP = libc::EPOLLRDHUP as u32;
        const EPOLLET = libc::EPOLLET as u32;
        const EPOLLONESHOT = libc::EPOLLONESHOT as u32;
        const EPOLLRDNORM = libc::EPOLLRDNORM as u32;
        const EPOLLRDBAND = libc::EPOLLRDBAND as u32;
        const EPOLLWRNORM = libc::EPOLLWRNORM as u32;
        const EPOLLWRBAND = libc::EPOLLWRBAND as u32;
        const EPOLLMSG = libc::EPOLLMSG as u32;
    }
}

impl EpollFlags {
    /// Interest used by [`Epoll::register_default`].
    pub const DEFAULT_INTEREST: Self = Self::EPOLLIN
        .union(Self::EPOLLOUT)
        .union(Self::EPOLLPRI);
}

fn new_libc_epoll_event(flags: EpollFlags, fd: RawFd) -> libc::epoll_event {
    libc::epoll_event {
        events: flags.bits(),
        u64: fd as u64,
    }
}

/// An owned epoll instance.
///
/// The interest set lives in the kernel only; every call is forwarded
/// as-is and nothing is mirrored in user space.
#[derive(Debug)]
pub struct Epoll {
    handle: DescriptorHandle,
}

impl Epoll {
    /// Opens a new epoll instance.
    ///
    /// `sizehint` is handed to `epoll_create(2)`. It only tunes kernel data
    /// structures and never limits how many descriptors can be registered.
    /// The descriptor is close-on-exec. Pass [`DEFAULT`] for the
    /// configured default; any other value below 1 is rejected.
    pub fn new(sizehint: i32) -> Result<Self> {
        let sizehint = match sizehint {
            DEFAULT => CONFIG.epoll.default_sizehint,
            n if n < 1 => {
                return Err(Error::invalid(format!(
                    "sizehint must be greater than zero, got {}",
                    n
                )))
            }
            n => n,
        };
        let epoll_fd = unsafe { libc::epoll_create(sizehint) };
        let handle = DescriptorHandle::from_syscall(KIND, "epoll_create", epoll_fd)?;
        // epoll_create has no flags argument, so close-on-exec is set separately.
        if unsafe { libc::fcntl(epoll_fd, libc::F_SETFD, libc::FD_CLOEXEC) } == -1 {
            return Err(Error::last_os_error("fcntl(F_SETFD)"));
        }
        trace!("epoll fd {} opened with sizehint {}", epoll_fd, sizehint);
        Ok(Self { handle })
    }

    /// Takes ownership of an existing epoll descriptor.
    pub fn from_fd(fd: RawFd) -> Self {
        Self {
            handle: DescriptorHandle::adopt(KIND, fd),
        }
    }

    /// Closes the epoll descriptor; repeated calls do nothing.
    pub fn close(&self) -> Result<()> {
        self.handle.close()
    }

    pub fn is_closed(&self) -> bool {
        self.handle.is_closed()
    }

    pub fn fileno(&self) -> Result<RawFd> {
        self.handle.fileno()
    }

    /// Starts watching `source` for the events in `flags`.
    pub fn register<D: AsDescriptor>(&self, source: D, flags: EpollFlags) -> Result<()> {
        self.ctl(EpollCtlOp::Add, source, flags)
    }

    /// Registers with `EPOLLIN | EPOLLOUT | EPOLLPRI`.
    pub fn register_default<D: AsDescriptor>(&self, source: D) -> Result<()> {
        self.register(source, EpollFlags::DEFAULT_INTEREST)
    }

    /// Replaces the interest mask of an already registered descriptor.
    pub fn modify<D: AsDescriptor>(&self, source: D, flags: EpollFlags) -> Result<()> {
        self.ctl(EpollCtlOp::Mod, source, flags)
    }

    /// Stops watching `source`.
    ///
    /// A descriptor that was already closed (`EBADF`) or never registered
    /// (`ENOENT`) counts as removed.
    pub fn unregister<D: AsDescriptor>(&self, source: D) -> Result<()> {
        match self.ctl(EpollCtlOp::Del, source, EpollFlags::empty()) {
            Err(e) if matches!(e.raw_os_error(), Some(libc::EBADF) | Some(libc::ENOENT)) => {
                trace!("epoll unregister ignored: {}", e);
                Ok(())
            }
            other => other,
        }
    }

    fn ctl<D: AsDescriptor>(&self, op: EpollCtlOp, source: D, flags: EpollFlags) -> Result<()> {
        let epoll_fd = self.handle.fileno()?;
        let fd = source.as_descriptor()?;
        // Kernels before 2.6.9 require a non-null event even for EPOLL_CTL_DEL.
        let mut event = new_libc_epoll_event(flags, fd);
        if unsafe { libc::epoll_ctl(epoll_fd, op as libc::c_int, fd, &mut event) } == -1 {
            return Err(Error::last_os_error(op.name()));
        }
        trace!(
            "{} fd {} on epoll_fd {} with flags {:?}",
            op.name(),
            fd,
            epoll_fd,
            flags
        );
        Ok(())
    }

    /// Waits for readiness.
    ///
    /// `timeout` is in seconds; any negative value blocks indefinitely.
    /// At most `maxevents` pairs are returned, or the configured default
    /// when [`DEFAULT`] is passed. Pairs come back in kernel order.
    pub fn poll(&self, timeout: f64, maxevents: i32) -> Result<Vec<(RawFd, EpollFlags)>> {
        let epoll_fd = self.handle.fileno()?;
        let timeout_ms = to_millis(timeout)?;
        let maxevents = match maxevents {
            DEFAULT => CONFIG.epoll.default_max_events,
            n if n < 1 => {
                return Err(Error::invalid(format!(
                    "maxevents must be greater than 0, got {}",
                    n
                )))
            }
            n => n,
        };

        let capacity = maxevents as usize;
        let mut events: Vec<libc::epoll_event> = Vec::new();
        events
            .try_reserve_exact(capacity)
            .map_err(|e| Error::alloc(capacity, e))?;

        trace!(
            "Polling epoll_fd {} for up to {} events with timeout {}ms",
            epoll_fd,
            maxevents,
            timeout_ms
        );
        let num_events = unsafe {
            libc::epoll_wait(epoll_fd, events.as_mut_ptr(), maxevents, timeout_ms)
        };
        if num_events == -1 {
            return Err(Error::last_os_error("epoll_wait"));
        }
        // SAFETY: the kernel initialized the first `num_events` entries.
        unsafe { events.set_len(num_events as usize) };

        trace!("epoll_wait on fd {} returned {} events", epoll_fd, num_events);
        Ok(events
            .iter()
            .map(|ev| (ev.u64 as RawFd, EpollFlags::from_bits_retain(ev.events)))
            .collect())
    }
}

impl AsRawFd for Epoll {
    /// Returns `-1` once closed.
    fn as_raw_fd(&self) -> RawFd {
        self.handle.raw()
    }
}
