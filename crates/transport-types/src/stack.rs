// ─────────────────────────────────────────────────────────────────────
// SCPN Transport Core — Stack Allocator
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Bounded, lock-free stack allocator shared by all track slots in a step.
//!
//! Space is reserved with a compare-and-swap on a single counter, so a
//! request either receives a contiguous, exclusively owned range or fails
//! without reserving anything.

use std::cell::UnsafeCell;
use std::sync::atomic::{AtomicUsize, Ordering};

pub struct StackAllocator<T> {
    storage: Box<[UnsafeCell<T>]>,
    size: AtomicUsize,
}

// SAFETY: every successful `allocate` hands out a range that no other call
// can obtain until `clear`, which needs `&mut self`. Reads of the whole
// stack likewise need `&mut self`.
unsafe impl<T: Send> Sync for StackAllocator<T> {}

impl<T: Default + Copy> StackAllocator<T> {
    pub fn new(capacity: usize) -> Self {
        let storage = (0..capacity)
            .map(|_| UnsafeCell::new(T::default()))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        StackAllocator {
            storage,
            size: AtomicUsize::new(0),
        }
    }

    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Number of allocated elements.
    pub fn size(&self) -> usize {
        self.size.load(Ordering::Acquire)
    }

    /// Reserve `count` contiguous default-initialized elements.
    ///
    /// Returns `None` if the remaining capacity is insufficient.
    #[allow(clippy::mut_from_ref)]
    pub fn allocate(&self, count: usize) -> Option<&mut [T]> {
        if count == 0 {
            return Some(&mut []);
        }
        let capacity = self.capacity();
        let mut start = self.size.load(Ordering::Relaxed);
        loop {
            let end = start.checked_add(count)?;
            if end > capacity {
                return None;
            }
            match self
                .size
                .compare_exchange_weak(start, end, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => break,
                Err(actual) => start = actual,
            }
        }

        // SAFETY: [start, start + count) was reserved exclusively above and
        // lies within `storage`. `UnsafeCell<T>` has the layout of `T`.
        let items = unsafe {
            let first = UnsafeCell::raw_get(self.storage.as_ptr().add(start));
            std::slice::from_raw_parts_mut(first, count)
        };
        items.fill(T::default());
        Some(items)
    }

    /// View all allocated elements.
    pub fn allocated(&mut self) -> &[T] {
        let size = *self.size.get_mut();
        // SAFETY: `&mut self` excludes outstanding allocations.
        unsafe {
            let first = UnsafeCell::raw_get(self.storage.as_ptr());
            std::slice::from_raw_parts(first, size)
        }
    }

    /// Release all allocations.
    pub fn clear(&mut self) {
        *self.size.get_mut() = 0;
    }
}

impl<T> std::fmt::Debug for StackAllocator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StackAllocator")
            .field("capacity", &self.storage.len())
            .field("size", &self.size.load(Ordering::Relaxed))
            .finish()
    }
}
