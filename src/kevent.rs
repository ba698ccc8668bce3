// src/kevent.rs

//! The generalized kernel event record submitted to and returned by
//! [`Kqueue::control`](crate::Kqueue).
//!
//! `KEvent` mirrors `struct kevent` field for field. It is a plain value:
//! once a change is submitted the kernel may drop or coalesce it (oneshot,
//! clear) without telling anyone, so the record never holds a live reference
//! to kernel state. For the same reason `udata` is restricted to an integer
//! tag; callers that need to associate objects with events keep their own
//! table keyed by that tag (or by `ident`).
//!
//! The type itself is portable so it can be built, compared, and sorted on
//! every platform; the `libc::kevent` encoding only exists where kqueue does.

use crate::descriptor::AsDescriptor;
use crate::error::Result;
use std::fmt;

#[cfg(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "dragonfly"
))]
mod defaults {
    pub(super) const FILTER: i16 = libc::EVFILT_READ;
    pub(super) const FLAGS: u16 = libc::EV_ADD;
}

// EVFILT_READ and EV_ADD carry the same values on every kqueue kernel.
#[cfg(not(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "dragonfly"
)))]
mod defaults {
    pub(super) const FILTER: i16 = -1;
    pub(super) const FLAGS: u16 = 0x0001;
}

/// One change or result event.
///
/// Ordering is lexicographic over
/// `(ident, filter, flags, fflags, data, udata)`, which is also the field
/// declaration order the derives rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct KEvent {
    ident: usize,
    filter: i16,
    flags: u16,
    fflags: u32,
    data: isize,
    udata: isize,
}

impl KEvent {
    /// Builds a change for `source` with the default read filter and add
    /// flag; the remaining fields start at zero.
    pub fn new<D: AsDescriptor>(source: D) -> Result<Self> {
        let fd = source.as_descriptor()?;
        Ok(Self::from_raw_parts(
            fd as usize,
            defaults::FILTER,
            defaults::FLAGS,
            0,
            0,
            0,
        ))
    }

    /// Builds a record from explicit field values.
    ///
    /// Use this for filters whose `ident` is not a descriptor (signal
    /// numbers, timer ids, process ids).
    pub const fn from_raw_parts(
        ident: usize,
        filter: i16,
        flags: u16,
        fflags: u32,
        data: isize,
        udata: isize,
    ) -> Self {
        Self {
            ident,
            filter,
            flags,
            fflags,
            data,
            udata,
        }
    }

    pub fn with_filter(mut self, filter: i16) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_flags(mut self, flags: u16) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_fflags(mut self, fflags: u32) -> Self {
        self.fflags = fflags;
        self
    }

    pub fn with_data(mut self, data: isize) -> Self {
        self.data = data;
        self
    }

    pub fn with_udata(mut self, udata: isize) -> Self {
        self.udata = udata;
        self
    }

    pub fn ident(&self) -> usize {
        self.ident
    }

    pub fn filter(&self) -> i16 {
        self.filter
    }

    pub fn flags(&self) -> u16 {
        self.flags
    }

    pub fn fflags(&self) -> u32 {
        self.fflags
    }

    pub fn data(&self) -> isize {
        self.data
    }

    pub fn udata(&self) -> isize {
        self.udata
    }
}

#[cfg(any(
    target_os = "macos",
    target_os = "ios",
    target_os = "freebsd",
    target_os = "dragonfly"
))]
impl KEvent {
    /// Encodes into the kernel's native record.
    pub fn encode(&self) -> libc::kevent {
        // Zeroing covers the platform-specific tail (FreeBSD's `ext`).
        let mut raw: libc::kevent = unsafe { std::mem::zeroed() };
        raw.ident = self.ident as libc::uintptr_t;
        raw.filter = self.filter as _;
        raw.flags = self.flags as _;
        raw.fflags = self.fflags as _;
        raw.data = self.data as _;
        raw.udata = self.udata as _;
        raw
    }

    /// Decodes a record filled in by the kernel.
    pub fn decode(raw: &libc::kevent) -> Self {
        Self {
            ident: raw.ident as usize,
            filter: raw.filter as i16,
            flags: raw.flags as u16,
            fflags: raw.fflags as u32,
            data: raw.data as isize,
            udata: raw.udata as isize,
        }
    }
}

impl fmt::Display for KEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<kevent ident={} filter={} flags={:#x} fflags={:#x} data={:#x} udata={:#x}>",
            self.ident, self.filter, self.flags, self.fflags, self.data, self.udata
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::os::unix::io::{AsRawFd, RawFd};
    use std::os::unix::net::UnixStream;

    #[test]
    fn new_applies_read_and_add_defaults() {
        let fd: RawFd = 3;
        let ev = KEvent::new(fd).unwrap();
        assert_eq!(ev.ident(), 3);
        assert_eq!(ev.filter(), defaults::FILTER);
        assert_eq!(ev.flags(), defaults::FLAGS);
        assert_eq!((ev.fflags(), ev.data(), ev.udata()), (0, 0, 0));
    }

    #[test]
    fn new_resolves_sockets_through_as_raw_fd() {
        let (a, _b) = UnixStream::pair().unwrap();
        let ev = KEvent::new(&a).unwrap();
        assert_eq!(ev.ident(), a.as_raw_fd() as usize);
    }

    #[test]
    fn new_rejects_negative_descriptors() {
        let fd: RawFd = -5;
        assert!(matches!(KEvent::new(fd), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn identical_fields_compare_equal() {
        let a = KEvent::from_raw_parts(4, -2, 0x11, 7, 9, 42);
        let b = KEvent::from_raw_parts(4, -2, 0x11, 7, 9, 42);
        assert_eq!(a, b);
        assert_eq!(a.cmp(&b), std::cmp::Ordering::Equal);
    }

    #[test]
    fn ident_dominates_the_ordering() {
        let low = KEvent::from_raw_parts(4, -2, 0x11, 7, 9, 42);
        let high = KEvent::from_raw_parts(5, -2, 0x11, 7, 9, 42);
        assert_ne!(low, high);
        assert!(low < high);
        // A later field never outweighs an earlier one.
        let high_udata = low.with_udata(isize::MAX);
        assert!(high_udata < high);
    }

    #[test]
    fn later_fields_break_ties_in_declaration_order() {
        let base = KEvent::from_raw_parts(1, 0, 0, 0, 0, 0);
        let mut sorted = vec![
            base.with_udata(1),
            base.with_data(1),
            base.with_fflags(1),
            base.with_flags(1),
            base.with_filter(1),
            base,
        ];
        sorted.sort();
        assert_eq!(
            sorted,
            vec![
                base,
                base.with_udata(1),
                base.with_data(1),
                base.with_fflags(1),
                base.with_flags(1),
                base.with_filter(1),
            ]
        );
    }

    #[test]
    fn filters_compare_as_signed_values() {
        let read = KEvent::from_raw_parts(1, -1, 0, 0, 0, 0);
        let write = KEvent::from_raw_parts(1, -2, 0, 0, 0, 0);
        assert!(write < read);
    }

    #[test]
    fn display_matches_the_kevent_repr() {
        let ev = KEvent::from_raw_parts(3, -1, 0x11, 0, 16, 0);
        assert_eq!(
            ev.to_string(),
            "<kevent ident=3 filter=-1 flags=0x11 fflags=0x0 data=0x10 udata=0x0>"
        );
    }

    #[cfg(any(
        target_os = "macos",
        target_os = "ios",
        target_os = "freebsd",
        target_os = "dragonfly"
    ))]
    #[test]
    fn decode_inverts_encode() {
        let cases = [
            KEvent::from_raw_parts(0, libc::EVFILT_READ, libc::EV_ADD, 0, 0, 0),
            KEvent::from_raw_parts(
                usize::MAX,
                i16::MIN,
                u16::MAX,
                u32::MAX,
                isize::MIN,
                isize::MAX,
            ),
            KEvent::from_raw_parts(17, libc::EVFILT_TIMER, libc::EV_ONESHOT, 0, 250, -1),
        ];
        for ev in cases {
            assert_eq!(KEvent::decode(&ev.encode()), ev);
        }
    }
}
