// src/legacy.rs

//! The single-call readiness primitives, re-exported unchanged from `nix`.
//!
//! `select(2)` works everywhere. `poll(2)` is re-exported wherever `nix`
//! provides it, together with its flag set; the matching integer values are
//! also listed in [`consts::table`](crate::consts::table).

pub use nix::sys::select::{select, FdSet};

pub use nix::poll::{poll, PollFd, PollFlags, PollTimeout};

/// Error type returned by [`select`] and [`poll`].
pub use nix::Error;
