//! # linmem: non-moving linear memory for virtual machines
//!
//! A virtual machine that compiles code against its linear memory caches the base
//! address of that memory inside the generated machine code. Growing the memory by
//! reallocate-and-copy would invalidate every cached address. This crate instead
//! reserves the full maximum of address space up front and commits physical pages
//! into that same reservation as the memory grows, so the base address is fixed for
//! the lifetime of the memory.
//!
//! ## Module Organization
//!
//! * [`linear_memory`] - The [`LinearMemory`] and [`LinearMemoryAllocator`] contracts
//! * [`non_moving`] - [`NonMovingMemory`], the reservation-backed implementation
//! * [`slice_memory`] - [`SliceMemory`], a resizable byte buffer for targets without
//!   virtual memory primitives; its base address may change on growth
//! * [`allocator`] - Allocators selecting between the two at build time
//! * [`shared`] - [`SharedLinearMemory`], a locked wrapper for hosts that grow memory
//!   from several threads
//! * [`options`] - Creation options
//!
//! ## Concurrency
//!
//! [`LinearMemory::reallocate`] takes `&mut self`, so a single owner can never race
//! a grow against a read of the previous view. Hosts that share one memory across
//! threads wrap it in [`SharedLinearMemory`], which serializes every
//! mutate-and-return sequence behind a mutex.

pub mod allocator;
pub mod linear_memory;
pub mod non_moving;
pub mod options;
pub mod shared;
pub mod slice_memory;

pub use allocator::{NonMovingAllocator, SliceAllocator};
pub use linear_memory::{LinearMemory, LinearMemoryAllocator};
pub use linmem_common::error::{Error, ErrorKind, MemoryOperation};
pub use linmem_common::Result;
pub use linmem_common_traits::memory_owner::{MemoryAllocation, MemoryOwner};
pub use non_moving::NonMovingMemory;
pub use options::{LinearMemoryOptions, UNBOUNDED_MAX_LEN};
pub use shared::SharedLinearMemory;
pub use slice_memory::SliceMemory;
