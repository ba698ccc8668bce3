// src/lib.rs

//! Owned wrappers over the kernel readiness multiplexers.
//!
//! On Linux and Android, [`Epoll`] keeps a kernel-resident interest set that
//! is edited with `register`/`modify`/`unregister` and queried with `poll`.
//! On macOS, iOS, FreeBSD and DragonFly, [`Kqueue`] submits a list of
//! [`KEvent`] changes and waits for results in a single `control` call.
//!
//! Both own exactly one kernel descriptor, close it idempotently, and
//! release it on drop. Neither spawns threads or keeps user-space state
//! about what is being watched; an event loop is expected to be built on
//! top.
//!
//! ```no_run
//! # #[cfg(target_os = "linux")]
//! # fn main() -> kselect::Result<()> {
//! use kselect::{Epoll, EpollFlags};
//! use std::os::unix::net::UnixStream;
//!
//! let (sock, _peer) = UnixStream::pair().unwrap();
//! let ep = Epoll::new(kselect::DEFAULT)?;
//! ep.register(&sock, EpollFlags::EPOLLOUT)?;
//! for (fd, events) in ep.poll(1.0, kselect::DEFAULT)? {
//!     println!("fd {} ready: {:?}", fd, events);
//! }
//! ep.close()?;
//! # Ok(())
//! # }
//! # #[cfg(not(target_os = "linux"))]
//! # fn main() {}
//! ```
//!
//! The legacy `select`/`poll` calls are re-exported from `nix` in
//! [`legacy`].

pub mod config;
pub mod consts;
pub mod descriptor;
pub mod error;
pub mod kevent;
pub mod legacy;
pub mod os;
pub mod timeout;

pub use descriptor::AsDescriptor;
pub use error::{Error, Result};
pub use kevent::KEvent;

#[cfg(any(target_os = "linux", target_os = "android"))]
pub use os::epoll::{Epoll, EpollCtlOp, EpollFlags, DEFAULT};

#[cfg(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "dragonfly"
))]
pub use os::kqueue::Kqueue;
