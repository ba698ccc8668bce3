//! Error types for the multiplexer wrappers.

use std::collections::TryReserveError;
use std::io;

/// Error returned by every fallible operation in this crate.
///
/// Nothing is retried internally. `OsFailure` keeps the originating
/// `io::Error` so callers can inspect the errno with [`Error::raw_os_error`].
#[derive(Debug)]
pub enum Error {
    /// Out-of-range or ill-formed caller input.
    InvalidArgument(String),
    /// The operation was attempted after `close()` on the same handle.
    ClosedHandle(&'static str),
    /// A timeout did not fit the kernel's representation.
    NumericOverflow(&'static str),
    /// The underlying syscall failed.
    OsFailure {
        /// Name of the syscall or operation that failed.
        op: &'static str,
        source: io::Error,
    },
    /// A change or result buffer of the given element count could not be allocated.
    OutOfMemory(usize),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    /// Captures `errno` for a failed syscall.
    pub(crate) fn last_os_error(op: &'static str) -> Self {
        Error::OsFailure {
            op,
            source: io::Error::last_os_error(),
        }
    }

    pub(crate) fn alloc(len: usize, _err: TryReserveError) -> Self {
        Error::OutOfMemory(len)
    }

    /// The OS error code carried by `OsFailure`, if any.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            Error::OsFailure { source, .. } => source.raw_os_error(),
            _ => None,
        }
    }

    pub fn is_closed_handle(&self) -> bool {
        matches!(self, Error::ClosedHandle(_))
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            Error::ClosedHandle(kind) => write!(f, "I/O operation on closed {} fd", kind),
            Error::NumericOverflow(msg) => write!(f, "numeric overflow: {}", msg),
            Error::OsFailure { op, source } => write!(f, "{} failed: {}", op, source),
            Error::OutOfMemory(len) => {
                write!(f, "out of memory allocating a buffer of {} events", len)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::OsFailure { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn os_failure_keeps_errno_and_source() {
        let err = Error::OsFailure {
            op: "epoll_ctl",
            source: io::Error::from_raw_os_error(libc::EBADF),
        };
        assert_eq!(err.raw_os_error(), Some(libc::EBADF));
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().starts_with("epoll_ctl failed"));
    }

    #[test]
    fn closed_handle_names_the_multiplexer() {
        let err = Error::ClosedHandle("epoll");
        assert!(err.is_closed_handle());
        assert_eq!(err.raw_os_error(), None);
        assert_eq!(err.to_string(), "I/O operation on closed epoll fd");
    }
}
