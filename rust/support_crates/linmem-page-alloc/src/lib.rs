//! Virtual memory primitives for non-moving linear memories.
//!
//! The [`mmap`] module is selected at build time: `mmap_unix.rs` on Unix-like
//! systems, `mmap_win.rs` on Windows, and `mmap_fallback.rs` everywhere else.
//! The fallback reports every primitive as unsupported so that callers can
//! switch to a plain resizable buffer.

pub mod reservation;

#[cfg_attr(unix, path = "mmap_unix.rs")]
#[cfg_attr(windows, path = "mmap_win.rs")]
#[cfg_attr(not(any(unix, windows)), path = "mmap_fallback.rs")]
pub mod mmap;

pub use reservation::Reservation;

/// Whether this build has a native reserve/commit/release backend.
pub const SUPPORTS_RESERVATION: bool = mmap::SUPPORTS_RESERVATION;

#[cfg(all(test, any(unix, windows)))]
mod tests;
