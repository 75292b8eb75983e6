//! Linear memory over a plain resizable byte buffer.
//!
//! Used where the target has no virtual memory primitives. Growth past the
//! buffer's length may reallocate and copy, so the base address can change:
//! only hosts that never cache addresses across a grow (e.g. pure interpreters)
//! may use it.

use linmem_common::{Result, result::verify_request};
use linmem_common_traits::memory_owner::{MemoryAllocation, MemoryOwner};

use crate::{linear_memory::LinearMemory, options::LinearMemoryOptions};

#[derive(Debug, Default)]
pub struct SliceMemory {
    /// Every byte ever made visible. Only grows.
    buf: Vec<u8>,
    len: usize,
    max_len: usize,
}

impl SliceMemory {
    /// Creates an empty memory, pre-sizing the buffer for `capacity_hint` bytes.
    ///
    /// The hint is advisory and is clamped to `max_len`. Use
    /// [`SliceMemory::with_options`] to reject a hint above the maximum with
    /// `InvalidArgument`.
    pub fn create(capacity_hint: usize, max_len: usize) -> SliceMemory {
        SliceMemory {
            buf: Vec::with_capacity(capacity_hint.min(max_len)),
            len: 0,
            max_len,
        }
    }

    pub fn with_options(options: &LinearMemoryOptions) -> Result<SliceMemory> {
        options.validate()?;
        Ok(Self::create(
            options.capacity_hint,
            options.effective_max_len(),
        ))
    }

    /// Sets the logical size to `size` bytes.
    ///
    /// Bytes beyond the previous high-water mark are zero-filled; narrowing
    /// keeps the tail so that growing back restores it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRequest` if `size > max_len`.
    pub fn reallocate(&mut self, size: usize) -> Result<&mut [u8]> {
        verify_request(size, self.max_len)?;
        if size > self.buf.len() {
            self.buf.resize(size, 0);
        }
        self.len = size;
        Ok(&mut self.buf[..size])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.buf[..self.len]
    }
}

unsafe impl MemoryOwner for SliceMemory {
    fn memory(&self) -> MemoryAllocation {
        MemoryAllocation {
            ptr: self.buf.as_ptr(),
            len: self.len,
            capacity: self.buf.len(),
            alignment: 1,
        }
    }

    fn is_address_stable(&self) -> bool {
        false
    }
}

impl LinearMemory for SliceMemory {
    fn reallocate(&mut self, size: usize) -> Result<&mut [u8]> {
        SliceMemory::reallocate(self, size)
    }

    fn as_bytes(&self) -> &[u8] {
        SliceMemory::as_bytes(self)
    }

    fn as_bytes_mut(&mut self) -> &mut [u8] {
        SliceMemory::as_bytes_mut(self)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn capacity(&self) -> usize {
        self.buf.len()
    }

    fn max_len(&self) -> usize {
        self.max_len
    }

    fn free(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::SliceMemory;

    #[test]
    fn test_capacity_hint_is_clamped() {
        let mem = SliceMemory::create(1 << 20, 16);
        assert!(mem.buf.capacity() >= 16);
        assert!(mem.buf.capacity() < 1 << 20);
        assert!(mem.is_empty());
    }

    #[test]
    fn test_shrink_keeps_tail() {
        let mut mem = SliceMemory::create(0, 32);
        mem.reallocate(8).unwrap().copy_from_slice(&[9; 8]);
        assert_eq!(mem.reallocate(2).unwrap().to_vec(), vec![9u8, 9]);
        assert_eq!(
            mem.reallocate(10).unwrap().to_vec(),
            vec![9u8, 9, 9, 9, 9, 9, 9, 9, 0, 0]
        );
    }
}
