//! A linear memory that can be grown from several threads.

use std::sync::Mutex;

use linmem_common::Result;
use linmem_common_traits::memory_owner::MemoryAllocation;

use crate::linear_memory::LinearMemory;

/// Serializes growth and access of a [`LinearMemory`] behind a mutex.
///
/// A grow and the reads that depend on its result happen under the same lock,
/// so a reader never observes a half-updated view. The [`MemoryAllocation`]
/// returned by [`SharedLinearMemory::grow`] is a snapshot: its pointer stays
/// valid only while the memory is alive, and only for address-stable memories
/// across later grows.
#[derive(Debug)]
pub struct SharedLinearMemory {
    inner: Mutex<Box<dyn LinearMemory>>,
}

impl SharedLinearMemory {
    pub fn new(memory: Box<dyn LinearMemory>) -> SharedLinearMemory {
        SharedLinearMemory {
            inner: Mutex::new(memory),
        }
    }

    /// Sets the logical size to `size` bytes and returns the resulting layout.
    pub fn grow(&self, size: usize) -> Result<MemoryAllocation> {
        let mut memory = self.inner.lock().unwrap();
        memory.reallocate(size)?;
        Ok(memory.memory())
    }

    /// Returns the current layout.
    pub fn memory(&self) -> MemoryAllocation {
        self.inner.lock().unwrap().memory()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn max_len(&self) -> usize {
        self.inner.lock().unwrap().max_len()
    }

    /// Runs `f` over the current view while holding the lock.
    pub fn with_bytes<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
        let memory = self.inner.lock().unwrap();
        f(memory.as_bytes())
    }

    /// Runs `f` over the current view while holding the lock.
    pub fn with_bytes_mut<R>(&self, f: impl FnOnce(&mut [u8]) -> R) -> R {
        let mut memory = self.inner.lock().unwrap();
        f(memory.as_bytes_mut())
    }

    pub fn into_inner(self) -> Box<dyn LinearMemory> {
        self.inner.into_inner().unwrap()
    }

    /// Releases the underlying memory.
    pub fn free(self) -> Result<()> {
        self.into_inner().free()
    }
}
