//! A reserved range of virtual address space with a committed prefix.
//!
//! `Reservation` claims the full address range up front and grants read/write
//! access to a growing prefix of it. The base address never changes between
//! [`Reservation::new`] and release, which is what lets a linear memory grow
//! without invalidating addresses cached by generated code.
//!
//! # Safety
//!
//! While `Reservation` implements `Send` and `Sync`, growing it requires `&mut self`.
//! Users that hand out raw pointers into the committed prefix must synchronize
//! access to that memory themselves.

use crate::mmap;

/// An exclusively owned address-space reservation.
///
/// Invariants:
/// - `committed_len <= reserved_len`
/// - both lengths are multiples of `page_size`
/// - `ptr` is fixed for the lifetime of the value
pub struct Reservation {
    /// Base address of the reservation.
    ptr: *mut u8,
    /// Length of the reserved range in bytes.
    reserved_len: usize,
    /// Length of the prefix with read/write access.
    committed_len: usize,
    /// Page size used for rounding.
    page_size: usize,
    /// Cleared once the range has been handed back to the OS.
    live: bool,
}

impl Reservation {
    /// Returns the size of a regular memory page on the current system.
    pub fn page_size() -> std::io::Result<usize> {
        mmap::get_page_size()
    }

    /// Computes the reservation length for a maximum of `max_len` bytes.
    ///
    /// The maximum is rounded up to a page multiple, with a minimum of one page.
    /// If the result is not addressable (it overflows or exceeds `isize::MAX`),
    /// `usize::MAX` is returned so that the reservation call itself fails
    /// instead of succeeding with a truncated size.
    pub fn reservation_len(max_len: usize, page_size: usize) -> usize {
        debug_assert!(page_size.is_power_of_two());
        match max_len.max(1).checked_next_multiple_of(page_size) {
            Some(len) if len <= isize::MAX as usize => len,
            _ => usize::MAX,
        }
    }

    /// Reserves address space for up to `max_len` bytes.
    ///
    /// Nothing is committed: the reservation has no access rights and no
    /// physical backing until [`Reservation::commit_to`] is called.
    ///
    /// # Errors
    ///
    /// Returns an error if the page size cannot be determined, or if the OS
    /// cannot grant the requested address space.
    pub fn new(max_len: usize) -> std::io::Result<Reservation> {
        let page_size = Self::page_size()?;
        let reserved_len = Self::reservation_len(max_len, page_size);
        let ptr = mmap::reserve(reserved_len)?;
        assert!((ptr as usize).is_multiple_of(page_size));
        log::debug!("reserved {reserved_len} bytes of address space at {ptr:p}");
        Ok(Reservation {
            ptr: ptr as _,
            reserved_len,
            committed_len: 0,
            page_size,
            live: true,
        })
    }

    /// Returns the base address of the reservation.
    #[inline]
    pub fn ptr(&self) -> *mut u8 {
        self.ptr
    }

    #[inline]
    pub fn reserved_len(&self) -> usize {
        self.reserved_len
    }

    /// Returns the length of the prefix that currently has read/write access.
    #[inline]
    pub fn committed_len(&self) -> usize {
        self.committed_len
    }

    /// Returns the page size this reservation rounds to.
    #[inline]
    pub fn alignment(&self) -> usize {
        self.page_size
    }

    /// Ensures that at least `len` bytes from the base are committed.
    ///
    /// If `len` is already covered, the OS is not involved. Otherwise `len` is
    /// rounded up to the next page multiple and only the missing pages
    /// `[committed_len, new_committed)` are committed. Committed pages are never
    /// decommitted.
    ///
    /// Returns the committed length after the call.
    ///
    /// # Panics
    ///
    /// Panics if `len` exceeds the reserved length.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the commit is denied. The committed length is
    /// left unchanged in that case.
    pub fn commit_to(&mut self, len: usize) -> std::io::Result<usize> {
        assert!(self.live, "commit on a released reservation");
        assert!(
            len <= self.reserved_len,
            "commit of {len} bytes exceeds reservation of {} bytes",
            self.reserved_len
        );
        if len <= self.committed_len {
            return Ok(self.committed_len);
        }

        let new_committed = len.next_multiple_of(self.page_size);
        debug_assert!(new_committed <= self.reserved_len);
        let start = unsafe { self.ptr.add(self.committed_len) };
        unsafe { mmap::commit(start as _, new_committed - self.committed_len)? };
        log::debug!(
            "committed [{:#x}, {:#x}) of reservation at {:p}",
            self.committed_len,
            new_committed,
            self.ptr
        );
        self.committed_len = new_committed;
        Ok(new_committed)
    }

    /// Returns the committed prefix as a byte slice.
    #[inline]
    pub fn committed_bytes(&self) -> &[u8] {
        unsafe { std::slice::from_raw_parts(self.ptr, self.committed_len) }
    }

    /// Returns the committed prefix as a mutable byte slice.
    #[inline]
    pub fn committed_bytes_mut(&mut self) -> &mut [u8] {
        unsafe { std::slice::from_raw_parts_mut(self.ptr, self.committed_len) }
    }

    /// Releases the whole reservation back to the OS in a single call.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the release is refused. The address space is
    /// considered lost at that point and `Drop` will not retry.
    pub fn release(mut self) -> std::io::Result<()> {
        self.release_inner()
    }

    fn release_inner(&mut self) -> std::io::Result<()> {
        if !self.live {
            return Ok(());
        }
        self.live = false;
        unsafe { mmap::release(self.ptr as _, self.reserved_len) }?;
        log::debug!(
            "released {} bytes of address space at {:p}",
            self.reserved_len,
            self.ptr
        );
        Ok(())
    }
}

impl Drop for Reservation {
    fn drop(&mut self) {
        if let Err(e) = self.release_inner() {
            log::error!(
                "failed to release {} bytes of address space at {:p}: {e}",
                self.reserved_len,
                self.ptr
            );
        }
    }
}

// SAFETY: Reservation exclusively owns its address range and releases it on drop.
unsafe impl Send for Reservation {}

// SAFETY: shared references only expose reads of the committed prefix; growth
// requires `&mut self`.
unsafe impl Sync for Reservation {}

impl std::fmt::Debug for Reservation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reservation")
            .field("ptr", &self.ptr)
            .field("reserved_len", &self.reserved_len)
            .field("committed_len", &self.committed_len)
            .finish()
    }
}
