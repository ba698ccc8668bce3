// src/consts.rs

//! Named kernel constants.
//!
//! The kqueue filter, flag, and note values are exported as typed constants
//! on the platforms that have kqueue. Readiness masks for epoll live in
//! [`EpollFlags`](crate::EpollFlags). Every constant available on the
//! current platform, including the legacy `POLL*` set, is also listed in a
//! read-only name -> value table built once per process.

use nix::poll::PollFlags;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

#[cfg(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "dragonfly"
))]
pub use self::kqueue_consts::*;

#[cfg(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "dragonfly"
))]
mod kqueue_consts {
    // Filters.
    pub const KQ_FILTER_READ: i16 = libc::EVFILT_READ;
    pub const KQ_FILTER_WRITE: i16 = libc::EVFILT_WRITE;
    pub const KQ_FILTER_AIO: i16 = libc::EVFILT_AIO;
    pub const KQ_FILTER_VNODE: i16 = libc::EVFILT_VNODE;
    pub const KQ_FILTER_PROC: i16 = libc::EVFILT_PROC;
    pub const KQ_FILTER_SIGNAL: i16 = libc::EVFILT_SIGNAL;
    pub const KQ_FILTER_TIMER: i16 = libc::EVFILT_TIMER;

    // Control flags.
    pub const KQ_EV_ADD: u16 = libc::EV_ADD;
    pub const KQ_EV_DELETE: u16 = libc::EV_DELETE;
    pub const KQ_EV_ENABLE: u16 = libc::EV_ENABLE;
    pub const KQ_EV_DISABLE: u16 = libc::EV_DISABLE;
    pub const KQ_EV_ONESHOT: u16 = libc::EV_ONESHOT;
    pub const KQ_EV_CLEAR: u16 = libc::EV_CLEAR;
    pub const KQ_EV_SYSFLAGS: u16 = libc::EV_SYSFLAGS;
    pub const KQ_EV_FLAG1: u16 = libc::EV_FLAG1;
    pub const KQ_EV_EOF: u16 = libc::EV_EOF;
    pub const KQ_EV_ERROR: u16 = libc::EV_ERROR;

    // Read/write filter.
    pub const KQ_NOTE_LOWAT: u32 = libc::NOTE_LOWAT;

    // Vnode filter.
    pub const KQ_NOTE_DELETE: u32 = libc::NOTE_DELETE;
    pub const KQ_NOTE_WRITE: u32 = libc::NOTE_WRITE;
    pub const KQ_NOTE_EXTEND: u32 = libc::NOTE_EXTEND;
    pub const KQ_NOTE_ATTRIB: u32 = libc::NOTE_ATTRIB;
    pub const KQ_NOTE_LINK: u32 = libc::NOTE_LINK;
    pub const KQ_NOTE_RENAME: u32 = libc::NOTE_RENAME;
    pub const KQ_NOTE_REVOKE: u32 = libc::NOTE_REVOKE;

    // Process filter.
    pub const KQ_NOTE_EXIT: u32 = libc::NOTE_EXIT;
    pub const KQ_NOTE_FORK: u32 = libc::NOTE_FORK;
    pub const KQ_NOTE_EXEC: u32 = libc::NOTE_EXEC;
    pub const KQ_NOTE_PCTRLMASK: u32 = libc::NOTE_PCTRLMASK;
    pub const KQ_NOTE_PDATAMASK: u32 = libc::NOTE_PDATAMASK;

    #[cfg(any(target_os = "freebsd", target_os = "dragonfly"))]
    pub const KQ_NOTE_TRACK: u32 = libc::NOTE_TRACK;
    #[cfg(any(target_os = "freebsd", target_os = "dragonfly"))]
    pub const KQ_NOTE_CHILD: u32 = libc::NOTE_CHILD;
    #[cfg(any(target_os = "freebsd", target_os = "dragonfly"))]
    pub const KQ_NOTE_TRACKERR: u32 = libc::NOTE_TRACKERR;
}

static TABLE: Lazy<BTreeMap<&'static str, i64>> = Lazy::new(build_table);

fn build_table() -> BTreeMap<&'static str, i64> {
    let mut table = BTreeMap::new();

    for (name, flag) in [
        ("POLLIN", PollFlags::POLLIN),
        ("POLLPRI", PollFlags::POLLPRI),
        ("POLLOUT", PollFlags::POLLOUT),
        ("POLLERR", PollFlags::POLLERR),
        ("POLLHUP", PollFlags::POLLHUP),
        ("POLLNVAL", PollFlags::POLLNVAL),
        ("POLLRDNORM", PollFlags::POLLRDNORM),
        ("POLLRDBAND", PollFlags::POLLRDBAND),
        ("POLLWRNORM", PollFlags::POLLWRNORM),
        ("POLLWRBAND", PollFlags::POLLWRBAND),
    ] {
        table.insert(name, i64::from(flag.bits()));
    }

    #[cfg(any(target_os = "linux", target_os = "android"))]
    for (name, flag) in crate::EpollFlags::all().iter_names() {
        table.insert(name, i64::from(flag.bits()));
    }

    #[cfg(any(
        target_os = "macos",
        target_os = "ios",
        target_os = "freebsd",
        target_os = "dragonfly"
    ))]
    {
        for (name, value) in [
            ("KQ_FILTER_READ", KQ_FILTER_READ),
            ("KQ_FILTER_WRITE", KQ_FILTER_WRITE),
            ("KQ_FILTER_AIO", KQ_FILTER_AIO),
            ("KQ_FILTER_VNODE", KQ_FILTER_VNODE),
            ("KQ_FILTER_PROC", KQ_FILTER_PROC),
            ("KQ_FILTER_SIGNAL", KQ_FILTER_SIGNAL),
            ("KQ_FILTER_TIMER", KQ_FILTER_TIMER),
        ] {
            table.insert(name, i64::from(value));
        }
        for (name, value) in [
            ("KQ_EV_ADD", KQ_EV_ADD),
            ("KQ_EV_DELETE", KQ_EV_DELETE),
            ("KQ_EV_ENABLE", KQ_EV_ENABLE),
            ("KQ_EV_DISABLE", KQ_EV_DISABLE),
            ("KQ_EV_ONESHOT", KQ_EV_ONESHOT),
            ("KQ_EV_CLEAR", KQ_EV_CLEAR),
            ("KQ_EV_SYSFLAGS", KQ_EV_SYSFLAGS),
            ("KQ_EV_FLAG1", KQ_EV_FLAG1),
            ("KQ_EV_EOF", KQ_EV_EOF),
            ("KQ_EV_ERROR", KQ_EV_ERROR),
        ] {
            table.insert(name, i64::from(value));
        }
        for (name, value) in [
            ("KQ_NOTE_LOWAT", KQ_NOTE_LOWAT),
            ("KQ_NOTE_DELETE", KQ_NOTE_DELETE),
            ("KQ_NOTE_WRITE", KQ_NOTE_WRITE),
            ("KQ_NOTE_EXTEND", KQ_NOTE_EXTEND),
            ("KQ_NOTE_ATTRIB", KQ_NOTE_ATTRIB),
            ("KQ_NOTE_LINK", KQ_NOTE_LINK),
            ("KQ_NOTE_RENAME", KQ_NOTE_RENAME),
            ("KQ_NOTE_REVOKE", KQ_NOTE_REVOKE),
            ("KQ_NOTE_EXIT", KQ_NOTE_EXIT),
            ("KQ_NOTE_FORK", KQ_NOTE_FORK),
            ("KQ_NOTE_EXEC", KQ_NOTE_EXEC),
            ("KQ_NOTE_PCTRLMASK", KQ_NOTE_PCTRLMASK),
            ("KQ_NOTE_PDATAMASK", KQ_NOTE_PDATAMASK),
        ] {
            table.insert(name, i64::from(value));
        }
        #[cfg(any(target_os = "freebsd", target_os = "dragonfly"))]
        for (name, value) in [
            ("KQ_NOTE_TRACK", KQ_NOTE_TRACK),
            ("KQ_NOTE_CHILD", KQ_NOTE_CHILD),
            ("KQ_NOTE_TRACKERR", KQ_NOTE_TRACKERR),
        ] {
            table.insert(name, i64::from(value));
        }
    }

    log::debug!("Initialized constant table with {} entries", table.len());
    table
}

/// The full constant table for this platform.
pub fn table() -> &'static BTreeMap<&'static str, i64> {
    &TABLE
}

/// Looks up a single constant by its exported name.
pub fn lookup(name: &str) -> Option<i64> {
    TABLE.get(name).copied()
}
