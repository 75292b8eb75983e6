//! `MemoryOwner`: A trait for types that own the backing memory of a linear memory.

/// A trait for types that own the backing memory of a linear memory.
///
/// # Safety
///
/// Implementors must guarantee that:
/// - Memory is exclusively owned by the `MemoryOwner` instance,
///   with no shared ownership or cloning of the underlying buffer.
/// - Every byte in `[ptr, ptr + capacity)` is readable and writable for as long
///   as the owner is alive and not grown again.
/// - The reported length and capacity are accurate, and `len <= capacity`.
/// - When [`MemoryOwner::is_address_stable`] returns `true`, `ptr` is identical
///   across every call for the lifetime of the owner.
pub unsafe trait MemoryOwner {
    /// Returns information about the owned memory block.
    fn memory(&self) -> MemoryAllocation;

    /// Returns `true` if the base address never changes across growth.
    fn is_address_stable(&self) -> bool;
}

/// Represents a block of allocated memory with its size information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryAllocation {
    /// Pointer to the start of the allocated memory.
    pub ptr: *const u8,
    /// Current logical length of the memory in bytes.
    pub len: usize,
    /// Number of bytes that are backed and accessible, starting at `ptr`.
    pub capacity: usize,
    /// Formal alignment of the memory buffer.
    pub alignment: usize,
}

// SAFETY: the descriptor is a plain value; dereferencing `ptr` is governed by the
// owner it was obtained from.
unsafe impl Send for MemoryAllocation {}
unsafe impl Sync for MemoryAllocation {}

impl MemoryAllocation {
    /// Returns the base address as an integer, as cached by generated code.
    #[inline]
    pub fn base_address(&self) -> usize {
        self.ptr as usize
    }

    #[inline]
    pub fn is_aligned(&self, alignment: usize) -> bool {
        (self.ptr as usize).is_multiple_of(alignment)
    }
}
