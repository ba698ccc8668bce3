// src/os/handle.rs

//! Ownership of a single kernel handle, shared by `Epoll` and `Kqueue`.

use crate::error::{Error, Result};
use log::{debug, warn};
use std::io;
use std::os::unix::io::RawFd;
use std::sync::atomic::{AtomicI32, Ordering};

/// Sentinel stored once the handle has been closed.
pub const CLOSED: RawFd = -1;

/// Owns one kernel descriptor until `close()` or drop.
///
/// The descriptor lives in an atomic so that `close` can take it exactly
/// once through a shared reference. Nothing else is synchronized: a wait in
/// flight on another thread keeps using the old value and may observe
/// `EBADF` from the kernel.
#[derive(Debug)]
pub struct DescriptorHandle {
    fd: AtomicI32,
    /// Multiplexer name used in errors and log lines.
    kind: &'static str,
}

impl DescriptorHandle {
    /// Wraps the result of a handle-allocating syscall.
    pub fn from_syscall(kind: &'static str, op: &'static str, rc: RawFd) -> Result<Self> {
        if rc < 0 {
            return Err(Error::last_os_error(op));
        }
        debug!("Created {} fd {}", kind, rc);
        Ok(Self::adopt(kind, rc))
    }

    /// Takes ownership of an existing descriptor without validating it.
    pub fn adopt(kind: &'static str, fd: RawFd) -> Self {
        Self {
            fd: AtomicI32::new(fd),
            kind,
        }
    }

    /// The raw descriptor, or `ClosedHandle`.
    pub fn fileno(&self) -> Result<RawFd> {
        match self.raw() {
            CLOSED => Err(Error::ClosedHandle(self.kind)),
            fd => Ok(fd),
        }
    }

    /// The raw descriptor including the closed sentinel.
    pub fn raw(&self) -> RawFd {
        self.fd.load(Ordering::Acquire)
    }

    pub fn is_closed(&self) -> bool {
        self.raw() == CLOSED
    }

    /// Closes the descriptor. Later calls are no-ops.
    ///
    /// The handle is marked closed before `close(2)` runs and stays closed
    /// even when the syscall reports an error.
    pub fn close(&self) -> Result<()> {
        let fd = self.fd.swap(CLOSED, Ordering::AcqRel);
        if fd == CLOSED {
            return Ok(());
        }
        if unsafe { libc::close(fd) } == -1 {
            return Err(Error::OsFailure {
                op: "close",
                source: io::Error::last_os_error(),
            });
        }
        debug!("Closed {} fd {}", self.kind, fd);
        Ok(())
    }

}

impl Drop for DescriptorHandle {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("Failed to close {} fd in drop: {}", self.kind, e);
        }
    }
}
