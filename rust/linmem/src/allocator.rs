//! Allocators that pick the linear memory backend.

use linmem_common::Result;
use linmem_page_alloc::{Reservation, SUPPORTS_RESERVATION};

use crate::{
    linear_memory::{LinearMemory, LinearMemoryAllocator},
    non_moving::NonMovingMemory,
    options::LinearMemoryOptions,
    slice_memory::SliceMemory,
};

/// Creates address-stable memories where the target supports reservation.
///
/// On targets without virtual memory primitives, or where the page size cannot
/// be determined, it hands out [`SliceMemory`] instead. Callers that depend on
/// address stability check [`crate::MemoryOwner::is_address_stable`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NonMovingAllocator;

impl NonMovingAllocator {
    pub fn new() -> NonMovingAllocator {
        NonMovingAllocator
    }
}

impl LinearMemoryAllocator for NonMovingAllocator {
    fn allocate_with(&self, options: &LinearMemoryOptions) -> Result<Box<dyn LinearMemory>> {
        options.validate()?;
        if !SUPPORTS_RESERVATION {
            return Ok(Box::new(SliceMemory::with_options(options)?));
        }
        if let Err(e) = Reservation::page_size() {
            log::warn!("page size unavailable ({e}), using a resizable buffer");
            return Ok(Box::new(SliceMemory::with_options(options)?));
        }
        Ok(Box::new(NonMovingMemory::with_options(options)?))
    }
}

/// Always creates [`SliceMemory`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SliceAllocator;

impl SliceAllocator {
    pub fn new() -> SliceAllocator {
        SliceAllocator
    }
}

impl LinearMemoryAllocator for SliceAllocator {
    fn allocate_with(&self, options: &LinearMemoryOptions) -> Result<Box<dyn LinearMemory>> {
        Ok(Box::new(SliceMemory::with_options(options)?))
    }
}
