// src/descriptor.rs

//! The "descriptor-like" capability accepted by registration calls and by
//! [`KEvent::new`](crate::KEvent::new).

use crate::error::{Error, Result};
use std::os::unix::io::{AsRawFd, RawFd};

/// Anything that can produce a raw OS descriptor.
///
/// Implemented for plain `RawFd` values and for references to any
/// `AsRawFd` type (sockets, files, pipes, other multiplexers).
/// Resolution fails with `InvalidArgument` when the descriptor is negative.
pub trait AsDescriptor {
    fn as_descriptor(&self) -> Result<RawFd>;
}

fn check(fd: RawFd) -> Result<RawFd> {
    if fd < 0 {
        return Err(Error::invalid(format!(
            "file descriptor cannot be a negative integer ({})",
            fd
        )));
    }
    Ok(fd)
}

impl AsDescriptor for RawFd {
    fn as_descriptor(&self) -> Result<RawFd> {
        check(*self)
    }
}

impl<T: AsRawFd + ?Sized> AsDescriptor for &T {
    fn as_descriptor(&self) -> Result<RawFd> {
        check(self.as_raw_fd())
    }
}
