use crate::{mmap, reservation::Reservation};

#[test]
fn test_page_size() {
    let page_size = mmap::get_page_size().unwrap();
    assert!(page_size > 0);
    assert!(page_size.is_power_of_two());
    assert_eq!(mmap::get_page_size().unwrap(), page_size);
}

#[test]
fn test_raw_reserve_commit_release() {
    let page_size = mmap::get_page_size().unwrap();
    let len = page_size * 4;
    let ptr = mmap::reserve(len).expect("reserve");
    assert!(!ptr.is_null());
    assert!((ptr as usize).is_multiple_of(page_size));

    unsafe {
        mmap::commit(ptr, page_size).expect("commit first page");
        let bytes = std::slice::from_raw_parts_mut(ptr as *mut u8, page_size);
        assert!(bytes.iter().all(|&b| b == 0));
        bytes[0] = 1;
        bytes[page_size - 1] = 2;

        let second = (ptr as *mut u8).add(page_size);
        mmap::commit(second as _, page_size * 2).expect("commit next two pages");
        let bytes = std::slice::from_raw_parts(ptr as *const u8, page_size * 3);
        assert_eq!(bytes[0], 1);
        assert_eq!(bytes[page_size - 1], 2);
        assert!(bytes[page_size..].iter().all(|&b| b == 0));

        mmap::release(ptr, len).expect("release");
    }
}

#[test]
fn test_raw_reserve_oversized_fails() {
    assert!(mmap::reserve(usize::MAX).is_err());
}

#[test]
fn test_reservation_len_rounding() {
    let page_size = 4096;
    assert_eq!(Reservation::reservation_len(0, page_size), 4096);
    assert_eq!(Reservation::reservation_len(1, page_size), 4096);
    assert_eq!(Reservation::reservation_len(20, page_size), 4096);
    assert_eq!(Reservation::reservation_len(4096, page_size), 4096);
    assert_eq!(Reservation::reservation_len(4097, page_size), 8192);
}

#[test]
fn test_reservation_len_unaddressable() {
    let page_size = 4096;
    assert_eq!(Reservation::reservation_len(usize::MAX, page_size), usize::MAX);
    assert_eq!(
        Reservation::reservation_len(isize::MAX as usize, page_size),
        usize::MAX
    );
    let largest = (isize::MAX as usize) & !(page_size - 1);
    assert_eq!(Reservation::reservation_len(largest, page_size), largest);
}

#[test]
fn test_reservation_starts_uncommitted() {
    let page_size = Reservation::page_size().unwrap();
    let res = Reservation::new(page_size * 3 + 1).expect("reserve");
    assert_eq!(res.reserved_len(), page_size * 4);
    assert_eq!(res.committed_len(), 0);
    assert_eq!(res.alignment(), page_size);
    assert!(res.committed_bytes().is_empty());
    assert!((res.ptr() as usize).is_multiple_of(page_size));
}

#[test]
fn test_reservation_commit_is_page_granular() {
    let page_size = Reservation::page_size().unwrap();
    let mut res = Reservation::new(page_size * 4).expect("reserve");
    let base = res.ptr();

    assert_eq!(res.commit_to(1).unwrap(), page_size);
    assert_eq!(res.committed_len(), page_size);

    assert_eq!(res.commit_to(page_size).unwrap(), page_size);
    assert_eq!(res.commit_to(page_size + 1).unwrap(), page_size * 2);

    // Smaller requests never decommit.
    assert_eq!(res.commit_to(10).unwrap(), page_size * 2);
    assert_eq!(res.committed_len(), page_size * 2);

    assert_eq!(res.commit_to(page_size * 4).unwrap(), page_size * 4);
    assert_eq!(res.ptr(), base);
}

#[test]
fn test_reservation_preserves_contents_across_commits() {
    let page_size = Reservation::page_size().unwrap();
    let mut res = Reservation::new(page_size * 8).expect("reserve");
    res.commit_to(100).unwrap();
    res.committed_bytes_mut()[..4].copy_from_slice(&[1, 2, 3, 4]);

    res.commit_to(page_size * 5).unwrap();
    let bytes = res.committed_bytes();
    assert_eq!(bytes.len(), page_size * 5);
    assert_eq!(&bytes[..4], &[1, 2, 3, 4]);
    assert!(bytes[page_size..].iter().all(|&b| b == 0));
}

#[test]
#[should_panic(expected = "exceeds reservation")]
fn test_reservation_commit_past_end_panics() {
    let page_size = Reservation::page_size().unwrap();
    let mut res = Reservation::new(page_size).expect("reserve");
    let _ = res.commit_to(page_size + 1);
}

#[test]
fn test_reservation_release_without_commit() {
    let res = Reservation::new(20).expect("reserve");
    res.release().expect("release");
}

#[test]
fn test_reservation_release_after_commit() {
    let page_size = Reservation::page_size().unwrap();
    let mut res = Reservation::new(page_size * 16).expect("reserve");
    res.commit_to(page_size * 3).unwrap();
    res.release().expect("release");
}

#[test]
fn test_reservation_oversized_fails() {
    assert!(Reservation::new(usize::MAX).is_err());
}

#[test]
fn test_reservation_debug() {
    let res = Reservation::new(1).expect("reserve");
    let debug_str = format!("{res:?}");
    assert!(debug_str.contains("Reservation"));
    assert!(debug_str.contains("reserved_len"));
    assert!(debug_str.contains("committed_len"));
}
