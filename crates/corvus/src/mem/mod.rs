// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 corvus-fsw.dev

//! Memory allocator registry.
//!
//! Startup-time allocation goes through registered [`MemAllocator`]s keyed
//! by an allocator kind, so projects can route specific identities to
//! recoverable (warm-reset-surviving) memory regions. The malloc-backed
//! default serves unregistered kinds and never reports recoverable.
//!
//! Exhaustion is signaled by a `None` return with the out-size zeroed;
//! nothing here panics on a failed allocation.

use parking_lot::RwLock;
use std::alloc::{alloc, dealloc, Layout};
use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;
use std::sync::Arc;

/// Enumerated allocator kind. `SYSTEM` is always present; projects
/// register their own kinds above it.
pub type AllocatorKind = u32;

/// The default, malloc-backed kind.
pub const SYSTEM_ALLOCATOR: AllocatorKind = 0;

/// An allocator backend.
pub trait MemAllocator: Send + Sync {
    /// Allocate at least `*size` bytes at `alignment`.
    ///
    /// `identifier` keys recoverable memory: an allocator backed by a
    /// persistent region returns the same memory for the same identifier
    /// across warm resets and sets `*recoverable`. The granted size is
    /// written back through `size` and may exceed the request, never
    /// shrink it. On exhaustion: returns `None` and zeroes `*size`.
    fn allocate(
        &self,
        identifier: u32,
        size: &mut usize,
        alignment: usize,
        recoverable: &mut bool,
    ) -> Option<NonNull<u8>>;

    /// Return memory obtained from [`MemAllocator::allocate`].
    ///
    /// # Safety
    /// `ptr`, `size`, and `alignment` must describe a live allocation made
    /// by this allocator with the same `identifier`.
    unsafe fn deallocate(&self, identifier: u32, ptr: NonNull<u8>, size: usize, alignment: usize);
}

/// Heap-backed default allocator. Always reports `recoverable = false`.
#[derive(Debug, Default)]
pub struct MallocAllocator;

impl MemAllocator for MallocAllocator {
    fn allocate(
        &self,
        _identifier: u32,
        size: &mut usize,
        alignment: usize,
        recoverable: &mut bool,
    ) -> Option<NonNull<u8>> {
        *recoverable = false;
        let layout = match Layout::from_size_align(*size, alignment.max(1)) {
            Ok(l) if l.size() > 0 => l,
            _ => {
                *size = 0;
                return None;
            }
        };
        // Layout validated above; alloc returns null on exhaustion.
        let ptr = unsafe { alloc(layout) };
        match NonNull::new(ptr) {
            Some(p) => Some(p),
            None => {
                *size = 0;
                None
            }
        }
    }

    unsafe fn deallocate(&self, _identifier: u32, ptr: NonNull<u8>, size: usize, alignment: usize) {
        if let Ok(layout) = Layout::from_size_align(size, alignment.max(1)) {
            dealloc(ptr.as_ptr(), layout);
        }
    }
}

/// An owned allocation: dereferences to its byte slice and returns itself
/// to its allocator on drop.
pub struct MemBlock {
    ptr: NonNull<u8>,
    size: usize,
    alignment: usize,
    identifier: u32,
    recoverable: bool,
    owner: Arc<dyn MemAllocator>,
}

// The block exclusively owns its memory region.
unsafe impl Send for MemBlock {}
unsafe impl Sync for MemBlock {}

impl MemBlock {
    /// Granted size in bytes (may exceed what was requested).
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// True when the contents survive a warm reset under this identifier.
    pub fn recoverable(&self) -> bool {
        self.recoverable
    }

    /// The identity key this block was allocated under.
    pub fn identifier(&self) -> u32 {
        self.identifier
    }
}

impl Deref for MemBlock {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        // ptr/size describe a live allocation owned by self.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.size) }
    }
}

impl DerefMut for MemBlock {
    fn deref_mut(&mut self) -> &mut [u8] {
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.size) }
    }
}

impl Drop for MemBlock {
    fn drop(&mut self) {
        unsafe {
            self.owner
                .deallocate(self.identifier, self.ptr, self.size, self.alignment);
        }
    }
}

/// Kind-to-allocator table with a malloc default for unregistered kinds.
pub struct AllocatorRegistry {
    table: RwLock<HashMap<AllocatorKind, Arc<dyn MemAllocator>>>,
    fallback: Arc<dyn MemAllocator>,
}

impl AllocatorRegistry {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(HashMap::new()),
            fallback: Arc::new(MallocAllocator),
        }
    }

    /// Route `kind` to `allocator`. Registration happens at init, before
    /// any component allocates.
    pub fn register(&self, kind: AllocatorKind, allocator: Arc<dyn MemAllocator>) {
        self.table.write().insert(kind, allocator);
        log::debug!("[Mem] allocator kind {} registered", kind);
    }

    /// The allocator for `kind`; unregistered kinds get the default.
    pub fn get(&self, kind: AllocatorKind) -> Arc<dyn MemAllocator> {
        self.table
            .read()
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| Arc::clone(&self.fallback))
    }

    /// Allocate an owned block through the allocator for `kind`.
    ///
    /// Returns `None` on exhaustion (the requested size is reported back
    /// as zero by the allocator contract).
    pub fn allocate_block(
        &self,
        kind: AllocatorKind,
        identifier: u32,
        mut size: usize,
        alignment: usize,
    ) -> Option<MemBlock> {
        let owner = self.get(kind);
        let mut recoverable = false;
        let ptr = owner.allocate(identifier, &mut size, alignment, &mut recoverable)?;
        Some(MemBlock {
            ptr,
            size,
            alignment,
            identifier,
            recoverable,
            owner,
        })
    }
}

impl Default for AllocatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malloc_allocate_and_write() {
        let registry = AllocatorRegistry::new();
        let mut block = registry
            .allocate_block(SYSTEM_ALLOCATOR, 1, 64, 8)
            .expect("allocation should succeed");
        assert!(block.len() >= 64);
        assert!(!block.recoverable());
        assert_eq!(block.identifier(), 1);

        block[0] = 0xAA;
        block[63] = 0x55;
        assert_eq!(block[0], 0xAA);
        assert_eq!(block[63], 0x55);
    }

    #[test]
    fn test_zero_size_is_exhaustion() {
        let alloc = MallocAllocator;
        let mut size = 0usize;
        let mut recoverable = true;
        assert!(alloc.allocate(1, &mut size, 8, &mut recoverable).is_none());
        assert_eq!(size, 0);
        assert!(!recoverable);
    }

    #[test]
    fn test_bad_alignment_zeroes_out_size() {
        let alloc = MallocAllocator;
        let mut size = 32usize;
        let mut recoverable = false;
        // Alignment must be a power of two.
        assert!(alloc.allocate(1, &mut size, 3, &mut recoverable).is_none());
        assert_eq!(size, 0);
    }

    #[test]
    fn test_unregistered_kind_gets_default() {
        let registry = AllocatorRegistry::new();
        let block = registry
            .allocate_block(0xBEEF, 7, 16, 4)
            .expect("fallback allocation should succeed");
        assert!(!block.recoverable());
    }

    #[test]
    fn test_registered_kind_is_routed() {
        struct Recoverable;

        impl MemAllocator for Recoverable {
            fn allocate(
                &self,
                _identifier: u32,
                size: &mut usize,
                alignment: usize,
                recoverable: &mut bool,
            ) -> Option<NonNull<u8>> {
                *recoverable = true;
                // Grant more than requested, like a region allocator would.
                *size = (*size).next_multiple_of(32);
                let layout = Layout::from_size_align(*size, alignment.max(1)).ok()?;
                NonNull::new(unsafe { alloc(layout) })
            }

            unsafe fn deallocate(
                &self,
                _identifier: u32,
                ptr: NonNull<u8>,
                size: usize,
                alignment: usize,
            ) {
                if let Ok(layout) = Layout::from_size_align(size, alignment.max(1)) {
                    dealloc(ptr.as_ptr(), layout);
                }
            }
        }

        let registry = AllocatorRegistry::new();
        registry.register(5, Arc::new(Recoverable));
        let block = registry
            .allocate_block(5, 9, 40, 8)
            .expect("allocation should succeed");
        assert!(block.recoverable());
        assert_eq!(block.len(), 64); // granted more, never less
    }
}
