//! The contract between a virtual machine and the memory backing its linear memory.

use linmem_common::Result;
use linmem_common_traits::memory_owner::MemoryOwner;

use crate::options::LinearMemoryOptions;

/// The backing store of a virtual machine's linear memory.
///
/// A linear memory has a fixed maximum set at creation and a logical size set by
/// the most recent [`LinearMemory::reallocate`]. Growth is monotonic in the
/// backing store: asking for a smaller size narrows the view, but never releases
/// memory.
///
/// Implementations report through [`MemoryOwner::is_address_stable`] whether
/// the base address survives growth. Code that caches the base address across a
/// grow must only be used with address-stable memories.
pub trait LinearMemory: MemoryOwner + Send + std::fmt::Debug {
    /// Sets the logical size to `size` bytes and returns a view of exactly
    /// that many bytes.
    ///
    /// Bytes that become visible for the first time read as zero. Bytes that
    /// were visible before a shrink keep their contents when grown back.
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` if `size` exceeds [`LinearMemory::max_len`]. This is a
    ///   contract violation on the caller's side; the check is a last line of
    ///   defense, not a validation layer.
    /// - `ResourceExhaustion` if the OS refuses to back the new size. The
    ///   instance is unusable afterwards.
    /// - `Poisoned` if a previous growth failed.
    fn reallocate(&mut self, size: usize) -> Result<&mut [u8]>;

    /// Returns the current view, `len()` bytes long.
    fn as_bytes(&self) -> &[u8];

    /// Returns the current view, `len()` bytes long.
    fn as_bytes_mut(&mut self) -> &mut [u8];

    /// Returns the logical size in bytes.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of bytes backing the view. Never less than `len()`.
    fn capacity(&self) -> usize;

    /// Returns the maximum logical size this memory accepts.
    fn max_len(&self) -> usize;

    /// Returns the memory to the system.
    ///
    /// # Errors
    ///
    /// Returns `ReleaseFailure` if the OS refuses to release the reservation.
    /// The address space is lost in that case and the caller should treat it as
    /// fatal for the process.
    fn free(self: Box<Self>) -> Result<()>;
}

/// Creates linear memories.
///
/// The virtual machine holds one allocator and calls it once per linear memory.
pub trait LinearMemoryAllocator: Send + Sync {
    /// Creates a linear memory with the given options.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if the options are inconsistent.
    /// - `ResourceExhaustion` if the address space cannot be reserved. The host
    ///   may retry with a smaller maximum.
    fn allocate_with(&self, options: &LinearMemoryOptions) -> Result<Box<dyn LinearMemory>>;

    /// Creates a linear memory with a capacity hint and an optional maximum.
    fn allocate(
        &self,
        capacity_hint: usize,
        max_len: Option<usize>,
    ) -> Result<Box<dyn LinearMemory>> {
        let options = LinearMemoryOptions {
            capacity_hint,
            max_len,
        };
        self.allocate_with(&options)
    }
}
