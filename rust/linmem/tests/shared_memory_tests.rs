use std::sync::Arc;

use linmem::{LinearMemoryAllocator, NonMovingAllocator, SharedLinearMemory, SliceAllocator};

#[cfg(any(unix, windows))]
#[test]
fn test_concurrent_growth_keeps_base() {
    let memory = NonMovingAllocator::new()
        .allocate(0, Some(1024 * 1024))
        .unwrap();
    let shared = Arc::new(SharedLinearMemory::new(memory));
    let base = shared.grow(1).unwrap().base_address();

    let handles = (0..8)
        .map(|t| {
            let shared = shared.clone();
            std::thread::spawn(move || {
                for i in 0..64 {
                    let size = (t * 64 + i + 1) * 2048;
                    let size = size.min(shared.max_len());
                    let layout = shared.grow(size).unwrap();
                    assert_eq!(layout.base_address(), base);
                    assert!(layout.capacity >= layout.len);
                    shared.with_bytes_mut(|bytes| {
                        if let Some(last) = bytes.last_mut() {
                            *last = t as u8;
                        }
                    });
                }
            })
        })
        .collect::<Vec<_>>();
    for handle in handles {
        handle.join().unwrap();
    }

    let layout = shared.grow(1024 * 1024).unwrap();
    assert_eq!(layout.base_address(), base);
    assert_eq!(shared.len(), 1024 * 1024);
    assert!(shared.grow(1024 * 1024 + 1).unwrap_err().is_invalid_request());

    let shared = Arc::into_inner(shared).unwrap();
    shared.free().unwrap();
}

#[test]
fn test_shared_view_matches_grow() {
    let shared = SharedLinearMemory::new(SliceAllocator::new().allocate(0, Some(64)).unwrap());
    assert!(shared.is_empty());

    let layout = shared.grow(16).unwrap();
    assert_eq!(layout.len, 16);
    assert_eq!(shared.memory().len, 16);
    shared.with_bytes_mut(|bytes| bytes.fill(5));
    assert_eq!(shared.with_bytes(|bytes| bytes.iter().map(|&b| b as u32).sum::<u32>()), 80);

    shared.grow(8).unwrap();
    assert_eq!(shared.with_bytes(|bytes| bytes.len()), 8);

    let memory = shared.into_inner();
    assert_eq!(memory.len(), 8);
    memory.free().unwrap();
}
