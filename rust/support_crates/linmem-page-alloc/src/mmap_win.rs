use std::sync::OnceLock;
use windows_sys::Win32::{
    Foundation::GetLastError,
    System::{
        Memory::{
            MEM_COMMIT, MEM_RELEASE, MEM_RESERVE, PAGE_NOACCESS, PAGE_READWRITE, VirtualAlloc,
            VirtualFree,
        },
        SystemInformation::{GetSystemInfo, SYSTEM_INFO},
    },
};

pub const SUPPORTS_RESERVATION: bool = true;

/// Reserves `len` bytes of address space via `VirtualAlloc(MEM_RESERVE)`.
///
/// The range is neither accessible nor backed by physical memory until
/// [`commit`] is called on parts of it. `len` must be a multiple of the page size.
///
/// # Returns
///
/// The base address of the reservation, or the OS error if the address space
/// cannot be granted.
///
/// # Safety
///
/// The returned pointer must be released with [`release`].
///
/// # References
///
/// <https://learn.microsoft.com/en-us/windows/win32/memory/reserving-and-committing-memory>
pub fn reserve(len: usize) -> std::io::Result<*mut std::ffi::c_void> {
    unsafe {
        let ptr = VirtualAlloc(std::ptr::null(), len, MEM_RESERVE, PAGE_NOACCESS);
        if ptr.is_null() {
            let error = GetLastError();
            return Err(std::io::Error::from_raw_os_error(error as i32));
        }
        Ok(ptr)
    }
}

/// Commits `[ptr, ptr + len)` of an existing reservation with read/write access.
///
/// Committed pages are zero-filled by the system.
///
/// # Safety
///
/// - `ptr` must be page-aligned and lie inside a live reservation from [`reserve`]
/// - `len` must be a multiple of the page size, and the range must not extend
///   past the end of the reservation
pub unsafe fn commit(ptr: *mut std::ffi::c_void, len: usize) -> std::io::Result<()> {
    unsafe {
        let res = VirtualAlloc(ptr as *const _, len, MEM_COMMIT, PAGE_READWRITE);
        if res.is_null() {
            let error = GetLastError();
            return Err(std::io::Error::from_raw_os_error(error as i32));
        }
    }
    Ok(())
}

/// Releases an entire reservation via `VirtualFree(MEM_RELEASE)`.
///
/// Windows releases the whole region by base address, so `len` is only checked.
///
/// # Safety
///
/// - `ptr` must be the base address returned by [`reserve`]
/// - The reservation must not have been released already
/// - No references into the reservation may outlive this call
pub unsafe fn release(ptr: *mut std::ffi::c_void, len: usize) -> std::io::Result<()> {
    debug_assert!(len.is_multiple_of(get_page_size().unwrap_or(1)));
    unsafe {
        let result = VirtualFree(ptr, 0, MEM_RELEASE);
        if result == 0 {
            let error = GetLastError();
            return Err(std::io::Error::from_raw_os_error(error as i32));
        }
    }
    Ok(())
}

/// Gets the system's standard page size in bytes.
///
/// The value is queried once via `GetSystemInfo` and cached for the lifetime
/// of the process.
pub fn get_page_size() -> std::io::Result<usize> {
    static PAGE_SIZE: OnceLock<usize> = OnceLock::new();

    let size = *PAGE_SIZE.get_or_init(|| unsafe {
        let mut system_info: SYSTEM_INFO = std::mem::zeroed();
        GetSystemInfo(&mut system_info);
        system_info.dwPageSize as usize
    });
    if size == 0 || !size.is_power_of_two() {
        return Err(std::io::Error::other(format!(
            "invalid system page size {size}"
        )));
    }
    Ok(size)
}
