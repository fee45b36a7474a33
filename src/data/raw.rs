//! `RawData`: a growable byte buffer that never zeroes and never shrinks.
//!
//! # Memory Layout
//!
//! One heap block holds the storage followed by the guard zones:
//!
//! ```text
//! ptr                         ptr + capacity            ptr + capacity + guard
//! ├──── live (length) ────┬── stale ──┼──── guard zones ────┤
//! ```
//!
//! Storage bytes are never initialised by this type. Callers write before
//! they read; the only bytes this type writes itself are the guard zones.
//!
//! # Growth
//!
//! `set_length` within capacity only updates `length`. Past capacity it
//! allocates a new block, copies the live bytes forward, rewrites the guard
//! after the new capacity and frees the old block. A buffer reused every
//! frame therefore stops allocating once it has seen its largest frame.

#![allow(unsafe_code)]

use super::guard::GuardLayout;
use crate::config::DataConfig;
use crate::error::OverrunError;
use std::alloc::{self, Layout};
use std::mem::MaybeUninit;
use std::ops::Range;
use std::ptr::{self, NonNull};
use std::slice;
use tracing::{error, trace};

/// Minimum storage alignment, enough for any SIMD-friendly record.
pub const MIN_ALIGN: usize = 16;

/// A contiguous block of uninitialised bytes with a logical length,
/// a caller-defined element count and trailing guard zones.
pub struct RawData {
    /// Start of the heap block.
    ptr: NonNull<u8>,
    /// Bytes of storage, excluding the guard.
    capacity: usize,
    /// Bytes in use.
    length: usize,
    /// Caller-defined element count.
    count: usize,
    /// Storage alignment.
    align: usize,
    /// Guard zone layout.
    guard: GuardLayout,
    /// Cached total guard bytes.
    guard_len: usize,
    /// Configuration this buffer was created with.
    config: DataConfig,
    /// Diagnostic label used in overrun reports.
    label: &'static str,
}

// SAFETY: `RawData` exclusively owns its heap block and hands out pointers
// only through `&self`/`&mut self`, so moving it to another thread is sound.
unsafe impl Send for RawData {}

#[cold]
#[inline(never)]
fn capacity_overflow() -> ! {
    panic!("capacity overflow");
}

/// Layout of a block holding `capacity` storage bytes and `guard_len` guard bytes.
fn block_layout(capacity: usize, guard_len: usize, align: usize) -> Layout {
    let size = capacity
        .checked_add(guard_len)
        .unwrap_or_else(|| capacity_overflow())
        .max(1);
    Layout::from_size_align(size, align).unwrap_or_else(|_| capacity_overflow())
}

/// Allocate a block without initialising it. Terminates the process on exhaustion.
fn allocate_block(layout: Layout) -> NonNull<u8> {
    // SAFETY: `block_layout` never produces a zero-sized layout.
    let ptr = unsafe { alloc::alloc(layout) };
    NonNull::new(ptr).unwrap_or_else(|| alloc::handle_alloc_error(layout))
}

impl RawData {
    /// Allocate `capacity` uninitialised bytes with one guard zone and the
    /// default configuration.
    ///
    /// The new buffer has `length == capacity` and `count == 0`.
    ///
    /// # Panics
    /// Panics if the byte size overflows `isize::MAX`. Aborts on allocation failure.
    pub fn allocate(capacity: usize) -> Self {
        Self::with_layout(capacity, 1, MIN_ALIGN, "data", DataConfig::default())
    }

    /// Allocate `capacity` uninitialised bytes with one guard zone and `config`.
    pub fn with_config(capacity: usize, config: DataConfig) -> Self {
        Self::with_layout(capacity, 1, MIN_ALIGN, "data", config)
    }

    /// Allocate with an explicit zone count, alignment and label.
    ///
    /// `align` is raised to [`MIN_ALIGN`] and must be a power of two.
    pub(crate) fn with_layout(
        capacity: usize,
        zones: usize,
        align: usize,
        label: &'static str,
        config: DataConfig,
    ) -> Self {
        let align = align.max(MIN_ALIGN);
        let guard = GuardLayout::new(zones, &config);
        let guard_len = guard.len().unwrap_or_else(|| capacity_overflow());
        let layout = block_layout(capacity, guard_len, align);
        let ptr = allocate_block(layout);

        let mut data = Self {
            ptr,
            capacity,
            length: capacity,
            count: 0,
            align,
            guard,
            guard_len,
            config,
            label,
        };
        data.write_guard();
        trace!(label, capacity, guard_len, "allocated frame data");
        data
    }

    /// Pointer to the start of storage.
    ///
    /// Writing up to [`length`](Self::length) bytes through it is sound.
    /// Writing past that lands in stale storage or the guard zones, which is
    /// what the overrun checks exist to catch.
    #[inline]
    pub fn mutable_bytes(&mut self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    /// Read-only pointer aliasing [`mutable_bytes`](Self::mutable_bytes).
    #[inline]
    pub const fn bytes(&self) -> *const u8 {
        self.ptr.as_ptr()
    }

    /// Logical length in bytes.
    #[inline]
    pub const fn length(&self) -> usize {
        self.length
    }

    /// Check if the live region is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Bytes of storage currently allocated, excluding the guard.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Caller-defined element count.
    #[inline]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// Set the caller-defined element count. Nothing checks it against `length`.
    #[inline]
    pub fn set_count(&mut self, count: usize) {
        self.count = count;
    }

    /// Number of guard zones after the storage.
    #[inline]
    pub const fn guard_zones(&self) -> usize {
        self.guard.zones()
    }

    /// Diagnostic label used in overrun reports.
    #[inline]
    pub const fn label(&self) -> &'static str {
        self.label
    }

    /// Set the logical length.
    ///
    /// Within capacity this only updates `length`; bytes past it keep their
    /// stale content. Past capacity the storage is reallocated, the first
    /// `length` bytes are copied forward and the new bytes are left
    /// uninitialised. Capacity never decreases.
    pub fn set_length(&mut self, length: usize) {
        if length > self.capacity {
            let capacity = self.config.growth.next_capacity(self.capacity, length);
            self.reallocate(capacity);
        }
        self.length = length;
    }

    fn reallocate(&mut self, capacity: usize) {
        let old_layout = block_layout(self.capacity, self.guard_len, self.align);
        let new_layout = block_layout(capacity, self.guard_len, self.align);
        let new_ptr = allocate_block(new_layout);

        // SAFETY: both blocks are distinct live allocations at least
        // `self.length` bytes long. Copying raw bytes never reads them as values.
        unsafe {
            ptr::copy_nonoverlapping(self.ptr.as_ptr(), new_ptr.as_ptr(), self.length);
            alloc::dealloc(self.ptr.as_ptr(), old_layout);
        }

        trace!(
            label = self.label,
            old_capacity = self.capacity,
            new_capacity = capacity,
            copied = self.length,
            "grew frame data"
        );
        self.ptr = new_ptr;
        self.capacity = capacity;
        self.write_guard();
    }

    /// The live region as possibly-uninitialised bytes.
    #[inline]
    pub fn as_uninit_slice(&self) -> &[MaybeUninit<u8>] {
        // SAFETY: the block holds at least `length` bytes, and `MaybeUninit`
        // makes no claim about their contents.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr().cast(), self.length) }
    }

    /// The live region as possibly-uninitialised bytes, mutably.
    #[inline]
    pub fn as_uninit_slice_mut(&mut self) -> &mut [MaybeUninit<u8>] {
        // SAFETY: as above, and `&mut self` guarantees exclusivity.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr().cast(), self.length) }
    }

    /// The live region as initialised bytes.
    ///
    /// # Safety
    /// Every byte in `[0, length)` must have been written since allocation.
    #[inline]
    pub unsafe fn as_slice(&self) -> &[u8] {
        slice::from_raw_parts(self.ptr.as_ptr(), self.length)
    }

    /// Copy `src` into the live region at `offset`.
    ///
    /// # Panics
    /// Panics if `offset + src.len()` exceeds `length`.
    pub fn write_at(&mut self, offset: usize, src: &[u8]) {
        let end = offset
            .checked_add(src.len())
            .filter(|&end| end <= self.length)
            .unwrap_or_else(|| {
                panic!(
                    "write of {} bytes at {offset} exceeds length {}",
                    src.len(),
                    self.length
                )
            });
        // SAFETY: `[offset, end)` is inside the live region and `src` cannot
        // alias storage borrowed mutably here.
        unsafe {
            ptr::copy_nonoverlapping(src.as_ptr(), self.ptr.as_ptr().add(offset), end - offset);
        }
    }

    fn guard_bytes(&self) -> &[u8] {
        // SAFETY: the guard follows the storage inside the same block and was
        // fully written by `write_guard`.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr().add(self.capacity), self.guard_len) }
    }

    fn write_guard(&mut self) {
        // SAFETY: the guard region lies inside the block and is exclusively ours.
        let guard = unsafe {
            slice::from_raw_parts_mut(self.ptr.as_ptr().add(self.capacity), self.guard_len)
        };
        self.guard.fill(guard);
    }

    /// Inspect `zones`, reporting the first clobbered byte.
    pub(crate) fn try_check_zones(
        &self,
        zones: Range<usize>,
        info: Option<&str>,
    ) -> Result<(), OverrunError> {
        if !self.config.guards_enabled() {
            return Ok(());
        }
        match self.guard.inspect(self.guard_bytes(), zones) {
            None => Ok(()),
            Some(clobber) => Err(OverrunError::Clobbered {
                label: info.map_or_else(|| self.label.to_string(), |info| format!("{} ({info})", self.label)),
                zone: clobber.zone,
                offset: self.capacity + clobber.offset,
                capacity: self.capacity,
                found: clobber.found,
                expected: clobber.expected,
            }),
        }
    }

    /// Inspect `zones` and panic if any guard byte was modified.
    pub(crate) fn check_zones(&self, zones: Range<usize>, info: Option<&str>) {
        if let Err(err) = self.try_check_zones(zones, info) {
            error!(%err, "frame data overrun");
            panic!("{err}");
        }
    }

    /// Inspect every guard zone, returning the first clobbered byte as an error.
    pub fn try_check_for_overrun(&self) -> Result<(), OverrunError> {
        self.try_check_zones(0..self.guard.zones(), None)
    }

    /// Inspect every guard zone and panic if any was modified.
    ///
    /// Detects overruns after the fact; it does not prevent them.
    pub fn check_for_overrun(&self) {
        self.check_zones(0..self.guard.zones(), None);
    }

    /// Get memory usage in bytes (approximate).
    pub const fn memory_usage(&self) -> usize {
        self.capacity + self.guard_len + std::mem::size_of::<Self>()
    }
}

impl Drop for RawData {
    fn drop(&mut self) {
        let layout = block_layout(self.capacity, self.guard_len, self.align);
        // SAFETY: `ptr` was allocated with exactly this layout.
        unsafe { alloc::dealloc(self.ptr.as_ptr(), layout) };
    }
}

impl std::fmt::Debug for RawData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawData")
            .field("label", &self.label)
            .field("length", &self.length)
            .field("capacity", &self.capacity)
            .field("count", &self.count)
            .field("guard_zones", &self.guard.zones())
            .field("memory_bytes", &self.memory_usage())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Growth;
    use proptest::prelude::*;

    fn fill(data: &mut RawData, byte: u8) {
        for slot in data.as_uninit_slice_mut() {
            slot.write(byte);
        }
    }

    fn clobber(data: &mut RawData, offset: usize) {
        unsafe { data.mutable_bytes().add(offset).write(0) };
    }

    #[test]
    fn test_data_allocate() {
        let data = RawData::allocate(64);
        assert_eq!(data.length(), 64);
        assert!(data.capacity() >= 64);
        assert_eq!(data.count(), 0);
        assert_eq!(data.guard_zones(), 1);
        assert_eq!(data.bytes() as usize % MIN_ALIGN, 0);
    }

    #[test]
    fn test_data_zero_length() {
        let mut data = RawData::allocate(0);
        assert!(data.is_empty());
        data.check_for_overrun();
        data.set_length(8);
        assert_eq!(data.length(), 8);
        data.check_for_overrun();
    }

    #[test]
    fn test_data_count_independent_of_length() {
        let mut data = RawData::allocate(32);
        data.set_count(7);
        data.set_length(4);
        assert_eq!(data.count(), 7);
        assert_eq!(data.length(), 4);
    }

    #[test]
    fn test_data_bytes_alias_mutable_bytes() {
        let mut data = RawData::allocate(4);
        let write = data.mutable_bytes();
        unsafe { write.add(2).write(0x5A) };
        assert_eq!(data.bytes(), write.cast_const());
        assert_eq!(unsafe { *data.bytes().add(2) }, 0x5A);
    }

    #[test]
    fn test_data_shrink_keeps_storage() {
        let mut data = RawData::allocate(16);
        fill(&mut data, 0xAB);
        let before = data.bytes();

        data.set_length(4);
        assert_eq!(data.length(), 4);
        assert_eq!(data.capacity(), 16);
        assert_eq!(data.bytes(), before);

        data.set_length(16);
        assert_eq!(data.bytes(), before);
        assert_eq!(unsafe { data.as_slice() }, &[0xAB; 16]);
    }

    #[test]
    fn test_data_set_length_same_is_noop() {
        let mut data = RawData::allocate(10);
        let before = data.bytes();
        data.set_length(10);
        assert_eq!(data.bytes(), before);
        assert_eq!(data.capacity(), 10);
    }

    #[test]
    fn test_data_grow_preserves_live_bytes() {
        let mut data = RawData::allocate(8);
        data.write_at(0, b"ABCDEFGH");
        data.set_length(5);

        data.set_length(100);
        assert_eq!(data.length(), 100);
        assert!(data.capacity() >= 100);
        let live = data.as_uninit_slice();
        let copied: Vec<u8> = live[..5].iter().map(|b| unsafe { b.assume_init() }).collect();
        assert_eq!(copied, b"ABCDE");
        data.check_for_overrun();
    }

    #[test]
    fn test_data_doubling_growth() {
        let config = DataConfig::default().with_growth(Growth::Doubling);
        let mut data = RawData::with_config(10, config);
        data.set_length(11);
        assert_eq!(data.capacity(), 20);
        assert_eq!(data.length(), 11);
    }

    #[test]
    fn test_data_check_passes_for_writes_within_length() {
        let mut data = RawData::allocate(32);
        fill(&mut data, 0xFF);
        assert_eq!(data.try_check_for_overrun(), Ok(()));
        data.check_for_overrun();
    }

    #[test]
    fn test_data_check_detects_guard_write() {
        let mut data = RawData::allocate(32);
        fill(&mut data, 0);
        clobber(&mut data, 33);

        let err = data.try_check_for_overrun().unwrap_err();
        assert_eq!(err.zone(), 0);
        assert_eq!(err.offset(), 33);
        assert_eq!(err.label(), "data");
    }

    #[test]
    #[should_panic(expected = "overrun")]
    fn test_data_check_panics_on_guard_write() {
        let mut data = RawData::allocate(8);
        clobber(&mut data, 8);
        data.check_for_overrun();
    }

    #[test]
    fn test_data_write_past_length_within_capacity_is_not_guarded() {
        let mut data = RawData::allocate(16);
        data.set_length(4);
        clobber(&mut data, 10);
        assert_eq!(data.try_check_for_overrun(), Ok(()));
    }

    #[test]
    fn test_data_grow_rewrites_guard() {
        let mut data = RawData::allocate(8);
        clobber(&mut data, 8);
        assert!(data.try_check_for_overrun().is_err());

        data.set_length(64);
        assert_eq!(data.try_check_for_overrun(), Ok(()));
    }

    #[test]
    fn test_data_guards_disabled() {
        let mut data = RawData::with_config(8, DataConfig::default().with_zone_len(0));
        fill(&mut data, 1);
        data.check_for_overrun();
        assert_eq!(data.memory_usage(), 8 + std::mem::size_of::<RawData>());
    }

    #[test]
    fn test_data_custom_canary() {
        let config = DataConfig::default().with_canary([1, 2, 3, 4]).with_zone_len(8);
        let mut data = RawData::with_config(8, config);
        let guard = unsafe { slice::from_raw_parts(data.bytes().add(8), 8) };
        assert_eq!(guard, &[1, 2, 3, 4, 1, 2, 3, 4]);

        clobber(&mut data, 9);
        let err = data.try_check_for_overrun().unwrap_err();
        assert_eq!(
            err,
            OverrunError::Clobbered {
                label: "data".to_string(),
                zone: 0,
                offset: 9,
                capacity: 8,
                found: 0,
                expected: 2,
            }
        );
    }

    #[test]
    #[should_panic(expected = "exceeds length")]
    fn test_data_write_at_out_of_bounds() {
        let mut data = RawData::allocate(4);
        data.write_at(2, b"abc");
    }

    #[test]
    #[should_panic(expected = "capacity overflow")]
    fn test_data_capacity_overflow() {
        let _ = RawData::allocate(usize::MAX);
    }

    #[test]
    fn test_data_debug() {
        let data = RawData::allocate(4);
        let debug = format!("{data:?}");
        assert!(debug.contains("RawData"));
        assert!(debug.contains("capacity: 4"));
    }

    proptest! {
        #[test]
        fn prop_capacity_never_decreases(
            initial in 0usize..256,
            lengths in prop::collection::vec(0usize..1024, 1..32),
        ) {
            let mut data = RawData::allocate(initial);
            let mut capacity = data.capacity();
            for length in lengths {
                data.set_length(length);
                prop_assert!(data.capacity() >= capacity);
                prop_assert!(data.capacity() >= length);
                prop_assert_eq!(data.length(), length);
                capacity = data.capacity();
            }
            prop_assert_eq!(data.try_check_for_overrun(), Ok(()));
        }

        #[test]
        fn prop_shrink_keeps_address(initial in 1usize..512, shrink in 0usize..512) {
            let mut data = RawData::allocate(initial);
            let before = data.bytes();
            data.set_length(shrink.min(initial));
            prop_assert_eq!(data.bytes(), before);
            prop_assert_eq!(data.capacity(), initial);
        }

        #[test]
        fn prop_grow_preserves_content(content in prop::collection::vec(any::<u8>(), 0..128), extra in 1usize..256) {
            let mut data = RawData::allocate(content.len());
            data.write_at(0, &content);
            data.set_length(content.len() + extra);
            prop_assert!(data.capacity() >= content.len() + extra);
            let copied: Vec<u8> = data.as_uninit_slice()[..content.len()]
                .iter()
                .map(|b| unsafe { b.assume_init() })
                .collect();
            prop_assert_eq!(copied, content);
        }
    }
}
