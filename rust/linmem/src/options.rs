//! Creation options for linear memories.

use linmem_common::{Result, verify_arg};

/// Maximum used when the virtual machine does not impose one.
///
/// Large enough for a full 32-bit linear memory while still being a valid
/// reservation size on the target.
#[cfg(target_pointer_width = "64")]
pub const UNBOUNDED_MAX_LEN: usize = 1 << 32;

/// Maximum used when the virtual machine does not impose one.
#[cfg(not(target_pointer_width = "64"))]
pub const UNBOUNDED_MAX_LEN: usize = 1 << 30;

/// Parameters for creating a linear memory.
///
/// The backend (reservation-based or resizable buffer) is chosen at build time
/// and is not part of the options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinearMemoryOptions {
    /// Expected initial size in bytes. Only the resizable fallback uses this
    /// to pre-size its buffer.
    pub capacity_hint: usize,
    /// Upper bound on the logical size, in bytes. `None` means the virtual
    /// machine imposes no bound and [`UNBOUNDED_MAX_LEN`] is used.
    pub max_len: Option<usize>,
}

impl LinearMemoryOptions {
    pub fn new() -> LinearMemoryOptions {
        Default::default()
    }

    pub fn with_capacity_hint(mut self, capacity_hint: usize) -> Self {
        self.capacity_hint = capacity_hint;
        self
    }

    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }

    pub fn unbounded(mut self) -> Self {
        self.max_len = None;
        self
    }

    /// Returns the maximum that sizes the reservation.
    pub fn effective_max_len(&self) -> usize {
        self.max_len.unwrap_or(UNBOUNDED_MAX_LEN)
    }

    /// Checks that the capacity hint does not exceed the maximum.
    pub fn validate(&self) -> Result<()> {
        let max_len = self.effective_max_len();
        verify_arg!(capacity_hint, self.capacity_hint <= max_len);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linmem_common::error::ErrorKind;

    #[test]
    fn test_defaults() {
        let options = LinearMemoryOptions::new();
        assert_eq!(options.capacity_hint, 0);
        assert_eq!(options.max_len, None);
        assert_eq!(options.effective_max_len(), UNBOUNDED_MAX_LEN);
        options.validate().unwrap();
    }

    #[test]
    fn test_builder() {
        let options = LinearMemoryOptions::new()
            .with_capacity_hint(10)
            .with_max_len(20);
        assert_eq!(options.effective_max_len(), 20);
        options.validate().unwrap();
        assert_eq!(options.unbounded().effective_max_len(), UNBOUNDED_MAX_LEN);
    }

    #[test]
    fn test_hint_above_max_rejected() {
        let err = LinearMemoryOptions::new()
            .with_capacity_hint(30)
            .with_max_len(20)
            .validate()
            .unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::InvalidArgument { name, .. } if name == "capacity_hint"
        ));
    }
}
