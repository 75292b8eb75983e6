//! Targets without raw virtual memory syscalls. Every primitive reports
//! `Unsupported` so that allocation switches to a resizable byte buffer.

pub const SUPPORTS_RESERVATION: bool = false;

fn unsupported() -> std::io::Error {
    std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        "virtual memory reservation is not supported on this target",
    )
}

pub fn reserve(_len: usize) -> std::io::Result<*mut std::ffi::c_void> {
    Err(unsupported())
}

/// # Safety
///
/// Never touches memory; always fails.
pub unsafe fn commit(_ptr: *mut std::ffi::c_void, _len: usize) -> std::io::Result<()> {
    Err(unsupported())
}

/// # Safety
///
/// Never touches memory; always fails.
pub unsafe fn release(_ptr: *mut std::ffi::c_void, _len: usize) -> std::io::Result<()> {
    Err(unsupported())
}

pub fn get_page_size() -> std::io::Result<usize> {
    Err(unsupported())
}
