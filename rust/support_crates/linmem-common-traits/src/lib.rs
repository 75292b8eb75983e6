//! Traits and definitions shared by the linmem crates.
//!
//! # Modules
//!
//! - [`memory_owner`]: Describes the memory owned by a linear memory instance, in
//!   the form consumed by code generators that cache its base address.

pub mod memory_owner;
