use std::sync::OnceLock;

pub const SUPPORTS_RESERVATION: bool = true;

/// Reserves `len` bytes of address space with no access rights.
///
/// A private, anonymous `PROT_NONE` mapping claims address space without
/// committing physical memory. `len` must be a multiple of the page size.
///
/// # Returns
///
/// The base address of the reservation, or the OS error if the address space
/// cannot be granted. A `len` above `isize::MAX` is rejected by the kernel.
///
/// # Safety
///
/// The returned pointer must be released with [`release`] using the same `len`.
pub fn reserve(len: usize) -> std::io::Result<*mut std::ffi::c_void> {
    let ptr = unsafe {
        libc::mmap(
            std::ptr::null_mut(),
            len,
            libc::PROT_NONE,
            libc::MAP_PRIVATE | libc::MAP_ANONYMOUS,
            -1,
            0,
        )
    };
    if ptr.is_null() || ptr == libc::MAP_FAILED {
        return Err(std::io::Error::last_os_error());
    }
    Ok(ptr)
}

/// Grants read/write access to `[ptr, ptr + len)` of an existing reservation.
///
/// Pages become backed on first touch and read as zero.
///
/// # Safety
///
/// - `ptr` must be page-aligned and lie inside a live reservation from [`reserve`]
/// - `len` must be a multiple of the page size, and the range must not extend
///   past the end of the reservation
pub unsafe fn commit(ptr: *mut std::ffi::c_void, len: usize) -> std::io::Result<()> {
    let res = unsafe { libc::mprotect(ptr, len, libc::PROT_READ | libc::PROT_WRITE) };
    if res < 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(())
}

/// Returns an entire reservation, committed or not, to the OS.
///
/// # Safety
///
/// - `ptr` and `len` must be exactly the values used with [`reserve`]
/// - The reservation must not have been released already
/// - No references into the reservation may outlive this call
pub unsafe fn release(ptr: *mut std::ffi::c_void, len: usize) -> std::io::Result<()> {
    let res = unsafe { libc::munmap(ptr, len) };
    if res < 0 {
        return Err(std::io::Error::last_os_error());
    }
    Ok(())
}

/// Gets the system's standard page size in bytes.
///
/// The value is resolved once via `sysconf(_SC_PAGESIZE)` and cached for the
/// lifetime of the process.
///
/// # Errors
///
/// Returns an `Unsupported` error if the system does not report a page size.
pub fn get_page_size() -> std::io::Result<usize> {
    static SIZE: OnceLock<Option<usize>> = OnceLock::new();
    let size = *SIZE.get_or_init(|| read_page_size().ok());
    size.ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "sysconf(_SC_PAGESIZE) is not available",
        )
    })
}

fn read_page_size() -> std::io::Result<usize> {
    let res = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if res <= 0 {
        return Err(std::io::Error::last_os_error());
    }
    let size = res as usize;
    if !size.is_power_of_two() {
        return Err(std::io::Error::other(format!(
            "page size {size} is not a power of two"
        )));
    }
    Ok(size)
}
