//! Reservation-backed linear memory whose base address never changes.
//!
//! `NonMovingMemory` reserves address space for its full maximum at creation and
//! commits pages into the reservation on demand. Three extents are tracked:
//!
//! ```text
//! 0 <= len <= committed_len <= reserved_len
//! ```
//!
//! `committed_len` and `reserved_len` are multiples of the page size. The view
//! handed to callers spans exactly `[0, len)`, and its backing never extends
//! past `committed_len`, so uncommitted pages are unreachable through safe code.

use linmem_common::{Result, error::Error, result::verify_request};
use linmem_common_traits::memory_owner::{MemoryAllocation, MemoryOwner};
use linmem_page_alloc::Reservation;

use crate::{linear_memory::LinearMemory, options::LinearMemoryOptions};

/// A growable linear memory with a stable base address.
pub struct NonMovingMemory {
    reservation: Reservation,
    /// Logical size set by the last `reallocate`.
    len: usize,
    /// Hard upper bound on `len`, fixed at creation.
    max_len: usize,
    /// Set when a commit fails; the committed extent can no longer be trusted
    /// to match what the caller expects.
    poisoned: bool,
}

impl NonMovingMemory {
    /// Reserves address space for a memory of at most `max_len` bytes.
    ///
    /// `capacity_hint` has no effect: reserving address space is cheap, so the
    /// full maximum is always reserved and nothing is committed until the
    /// first [`NonMovingMemory::reallocate`].
    ///
    /// # Errors
    ///
    /// Returns `ResourceExhaustion` if the OS cannot reserve the address space,
    /// including when `max_len` is beyond what the platform can address.
    pub fn create(_capacity_hint: usize, max_len: usize) -> Result<NonMovingMemory> {
        let reservation = Reservation::new(max_len).map_err(|e| {
            let page_size = Reservation::page_size().unwrap_or(1);
            Error::reserve_failed(Reservation::reservation_len(max_len, page_size), e)
        })?;
        Ok(NonMovingMemory {
            reservation,
            len: 0,
            max_len,
            poisoned: false,
        })
    }

    /// Creates a memory from [`LinearMemoryOptions`], substituting the
    /// unbounded maximum when none is given.
    pub fn with_options(options: &LinearMemoryOptions) -> Result<NonMovingMemory> {
        options.validate()?;
        Self::create(options.capacity_hint, options.effective_max_len())
    }

    /// Grows or narrows the logical size to `size` bytes.
    ///
    /// If `size` fits in the committed extent, the OS is not involved. Otherwise
    /// the committed extent is extended to `size` rounded up to a page multiple.
    /// Narrowing never decommits.
    ///
    /// The returned view always starts at [`NonMovingMemory::base_ptr`].
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` if `size > max_len`. Nothing changes.
    /// - `ResourceExhaustion` if the commit is denied. The memory is poisoned
    ///   and may only be freed.
    /// - `Poisoned` if an earlier commit was denied.
    pub fn reallocate(&mut self, size: usize) -> Result<&mut [u8]> {
        if self.poisoned {
            return Err(Error::poisoned());
        }
        verify_request(size, self.max_len)?;

        let committed_len = self.reservation.committed_len();
        if size > committed_len {
            if let Err(e) = self.reservation.commit_to(size) {
                self.poisoned = true;
                let wanted = size.next_multiple_of(self.page_size()) - committed_len;
                log::error!(
                    "failed to commit {wanted} bytes at {:p}: {e}",
                    self.base_ptr()
                );
                return Err(Error::commit_failed(wanted, e));
            }
        } else {
            log::trace!("reallocate to {size} bytes within {committed_len} committed");
        }

        self.len = size;
        Ok(self.as_bytes_mut())
    }

    /// Releases the whole reservation in one call.
    ///
    /// Consuming `self` rules out use after free and double free.
    ///
    /// # Errors
    ///
    /// Returns `ReleaseFailure` if the OS refuses. The address space is leaked.
    pub fn free(self) -> Result<()> {
        let reserved_len = self.reservation.reserved_len();
        self.reservation.release().map_err(|e| {
            log::error!("failed to release {reserved_len} bytes of linear memory: {e}");
            Error::release_failed(reserved_len, e)
        })
    }

    /// Returns the base address. Identical for the lifetime of the memory.
    #[inline]
    pub fn base_ptr(&self) -> *mut u8 {
        self.reservation.ptr()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of bytes with read/write backing.
    #[inline]
    pub fn committed_len(&self) -> usize {
        self.reservation.committed_len()
    }

    /// Returns the number of bytes of reserved address space.
    #[inline]
    pub fn reserved_len(&self) -> usize {
        self.reservation.reserved_len()
    }

    #[inline]
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    #[inline]
    pub fn page_size(&self) -> usize {
        self.reservation.alignment()
    }

    /// Returns `true` if a commit has failed.
    #[inline]
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.reservation.committed_bytes()[..self.len]
    }

    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        let len = self.len;
        &mut self.reservation.committed_bytes_mut()[..len]
    }

    /// Returns the view reinterpreted as a slice of `T`.
    ///
    /// # Panics
    ///
    /// Panics if the logical size is not a multiple of `size_of::<T>()`.
    #[inline]
    pub fn as_slice<T>(&self) -> &[T]
    where
        T: bytemuck::AnyBitPattern,
    {
        bytemuck::cast_slice(self.as_bytes())
    }

    /// Returns the view reinterpreted as a mutable slice of `T`.
    ///
    /// # Panics
    ///
    /// Panics if the logical size is not a multiple of `size_of::<T>()`.
    #[inline]
    pub fn as_mut_slice<T>(&mut self) -> &mut [T]
    where
        T: bytemuck::AnyBitPattern + bytemuck::NoUninit,
    {
        bytemuck::cast_slice_mut(self.as_bytes_mut())
    }
}

unsafe impl MemoryOwner for NonMovingMemory {
    fn memory(&self) -> MemoryAllocation {
        MemoryAllocation {
            ptr: self.base_ptr(),
            len: self.len,
            capacity: self.committed_len(),
            alignment: self.page_size(),
        }
    }

    fn is_address_stable(&self) -> bool {
        true
    }
}

impl LinearMemory for NonMovingMemory {
    fn reallocate(&mut self, size: usize) -> Result<&mut [u8]> {
        NonMovingMemory::reallocate(self, size)
    }

    fn as_bytes(&self) -> &[u8] {
        NonMovingMemory::as_bytes(self)
    }

    fn as_bytes_mut(&mut self) -> &mut [u8] {
        NonMovingMemory::as_bytes_mut(self)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn capacity(&self) -> usize {
        self.committed_len()
    }

    fn max_len(&self) -> usize {
        self.max_len
    }

    fn free(self: Box<Self>) -> Result<()> {
        NonMovingMemory::free(*self)
    }
}

impl std::ops::Deref for NonMovingMemory {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.as_bytes()
    }
}

impl std::ops::DerefMut for NonMovingMemory {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.as_bytes_mut()
    }
}

impl std::fmt::Debug for NonMovingMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NonMovingMemory")
            .field("ptr", &self.base_ptr())
            .field("len", &self.len)
            .field("committed_len", &self.committed_len())
            .field("reserved_len", &self.reserved_len())
            .field("max_len", &self.max_len)
            .finish()
    }
}
