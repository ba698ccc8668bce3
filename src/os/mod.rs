// src/os/mod.rs
//
// Owned multiplexer handles. Exactly one of epoll and kqueue exists on
// any given target.

pub(crate) mod handle;

#[cfg(any(target_os = "linux", target_os = "android"))]
pub mod epoll;


#[cfg(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "dragonfly"
))]
pub mod kqueue;

#[cfg(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "dragonfly"
))]
#[cfg(test)]
mod kqueue_tests;
