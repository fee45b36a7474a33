//! `TypedData`: a [`RawData`] interpreted as an array of fixed-size records.

#![allow(unsafe_code)]

use crate::config::DataConfig;
use crate::data::RawData;
use crate::error::OverrunError;
use std::marker::PhantomData;
use std::mem::{self, MaybeUninit};
use std::slice;

/// A fixed-size record stored in a [`TypedData`].
///
/// The associated constants select the view's guard layout, so each record
/// kind gets its own view type without any runtime descriptor.
pub trait Record: Copy + Send + 'static {
    /// Label used in overrun reports.
    const LABEL: &'static str;
    /// Number of guard zones placed after the storage.
    const GUARD_ZONES: usize;
}

/// Typed view over one exclusively-owned [`RawData`].
///
/// Lengths are measured in records unless a method says bytes. The typed
/// base pointer is the same storage reinterpreted at `size_of::<R>()` stride.
pub struct TypedData<R: Record> {
    raw: RawData,
    _record: PhantomData<R>,
}

impl<R: Record> TypedData<R> {
    /// Allocate uninitialised storage for `records` records.
    ///
    /// The new view has `len_records() == records` and `count() == 0`.
    ///
    /// # Panics
    /// Panics if the byte size overflows. Aborts on allocation failure.
    pub fn data_of_length(records: usize) -> Self {
        Self::with_config(records, DataConfig::default())
    }

    /// Allocate storage for `records` records using `config`.
    pub fn with_config(records: usize, config: DataConfig) -> Self {
        const { assert!(mem::size_of::<R>() > 0, "zero-sized records are not supported") };
        Self {
            raw: RawData::with_layout(
                Self::byte_len(records),
                R::GUARD_ZONES,
                mem::align_of::<R>(),
                R::LABEL,
                config,
            ),
            _record: PhantomData,
        }
    }

    fn byte_len(records: usize) -> usize {
        records
            .checked_mul(mem::size_of::<R>())
            .unwrap_or_else(|| panic!("capacity overflow"))
    }

    /// The underlying byte buffer.
    #[inline]
    pub const fn raw(&self) -> &RawData {
        &self.raw
    }

    /// Pointer to the start of storage.
    #[inline]
    pub fn mutable_bytes(&mut self) -> *mut u8 {
        self.raw.mutable_bytes()
    }

    /// Read-only pointer to the start of storage.
    #[inline]
    pub const fn bytes(&self) -> *const u8 {
        self.raw.bytes()
    }

    /// Logical length in bytes.
    #[inline]
    pub const fn length(&self) -> usize {
        self.raw.length()
    }

    /// Set the logical length in bytes.
    #[inline]
    pub fn set_length(&mut self, length: usize) {
        self.raw.set_length(length);
    }

    /// Allocated capacity in bytes.
    #[inline]
    pub const fn capacity(&self) -> usize {
        self.raw.capacity()
    }

    /// Caller-defined element count.
    #[inline]
    pub const fn count(&self) -> usize {
        self.raw.count()
    }

    /// Set the caller-defined element count.
    #[inline]
    pub fn set_count(&mut self, count: usize) {
        self.raw.set_count(count);
    }

    /// Whole records in the live region.
    #[inline]
    pub const fn len_records(&self) -> usize {
        self.raw.length() / mem::size_of::<R>()
    }

    /// Whole records the current capacity can hold.
    #[inline]
    pub const fn capacity_records(&self) -> usize {
        self.raw.capacity() / mem::size_of::<R>()
    }

    /// Check if the live region holds no records.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len_records() == 0
    }

    /// Set the logical length in records, growing storage if needed.
    pub fn set_len_records(&mut self, records: usize) {
        self.raw.set_length(Self::byte_len(records));
    }

    /// Typed pointer to the first record.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut R {
        self.raw.mutable_bytes().cast()
    }

    /// Typed read-only pointer to the first record.
    #[inline]
    pub const fn as_ptr(&self) -> *const R {
        self.raw.bytes().cast()
    }

    /// The live records, possibly uninitialised.
    #[inline]
    pub fn records_mut(&mut self) -> &mut [MaybeUninit<R>] {
        let len = self.len_records();
        // SAFETY: storage is aligned for `R` and holds at least `len` records;
        // `MaybeUninit` makes no claim about their contents.
        unsafe { slice::from_raw_parts_mut(self.as_mut_ptr().cast(), len) }
    }

    /// The live records.
    ///
    /// # Safety
    /// Every record in `[0, len_records())` must have been written since
    /// allocation with a valid value of `R`.
    #[inline]
    pub unsafe fn records(&self) -> &[R] {
        slice::from_raw_parts(self.as_ptr(), self.len_records())
    }

    /// Write `record` at `index`.
    ///
    /// # Panics
    /// Panics if `index >= len_records()`.
    #[inline]
    pub fn write(&mut self, index: usize, record: R) {
        let len = self.len_records();
        assert!(index < len, "record index {index} out of bounds ({len} records)");
        self.records_mut()[index].write(record);
    }

    /// Inspect every guard zone and panic if any was modified.
    pub fn check_for_overrun(&self) {
        self.raw.check_for_overrun();
    }

    /// Inspect every guard zone, returning the first clobbered byte as an error.
    pub fn try_check_for_overrun(&self) -> Result<(), OverrunError> {
        self.raw.try_check_for_overrun()
    }

    /// Inspect a single zone and panic if it was modified.
    pub(crate) fn check_zone(&self, zone: usize) {
        self.raw.check_zones(zone..zone + 1, None);
    }

    /// Inspect a single zone.
    pub(crate) fn try_check_zone(&self, zone: usize) -> Result<(), OverrunError> {
        self.raw.try_check_zones(zone..zone + 1, None)
    }

    /// Inspect every zone, tagging any report with `info`.
    pub(crate) fn check_with_info(&self, info: &str) {
        self.raw.check_zones(0..self.raw.guard_zones(), Some(info));
    }

    /// Inspect every zone, tagging any report with `info`.
    pub(crate) fn try_check_with_info(&self, info: &str) -> Result<(), OverrunError> {
        self.raw.try_check_zones(0..self.raw.guard_zones(), Some(info))
    }
}

impl<R: Record> std::fmt::Debug for TypedData<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedData")
            .field("record", &R::LABEL)
            .field("records", &self.len_records())
            .field("capacity_records", &self.capacity_records())
            .field("count", &self.count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    #[repr(C, align(32))]
    struct Wide {
        words: [u64; 4],
    }

    impl Record for Wide {
        const LABEL: &'static str = "wide";
        const GUARD_ZONES: usize = 2;
    }

    #[test]
    fn test_typed_sizes_in_records() {
        let data = TypedData::<Wide>::data_of_length(5);
        assert_eq!(data.len_records(), 5);
        assert_eq!(data.length(), 5 * 32);
        assert_eq!(data.capacity_records(), 5);
        assert_eq!(data.count(), 0);
        assert_eq!(data.raw().guard_zones(), 2);
        assert_eq!(data.raw().label(), "wide");
    }

    #[test]
    fn test_typed_alignment() {
        let data = TypedData::<Wide>::data_of_length(3);
        assert_eq!(data.as_ptr() as usize % 32, 0);
    }

    #[test]
    fn test_typed_write_and_read() {
        let mut data = TypedData::<Wide>::data_of_length(3);
        for i in 0..3u64 {
            data.write(i as usize, Wide { words: [i; 4] });
        }
        let records = unsafe { data.records() };
        assert_eq!(records[2], Wide { words: [2; 4] });
        data.check_for_overrun();
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_typed_write_out_of_bounds() {
        let mut data = TypedData::<Wide>::data_of_length(2);
        data.write(2, Wide { words: [0; 4] });
    }

    #[test]
    fn test_typed_partial_record_length() {
        let mut data = TypedData::<Wide>::data_of_length(2);
        data.set_length(40);
        assert_eq!(data.len_records(), 1);
    }

    #[test]
    fn test_typed_grow_in_records() {
        let mut data = TypedData::<Wide>::data_of_length(2);
        data.write(0, Wide { words: [7; 4] });
        data.set_len_records(10);
        assert_eq!(data.len_records(), 10);
        assert!(data.capacity_records() >= 10);
        assert_eq!(unsafe { data.records_mut()[0].assume_init() }, Wide { words: [7; 4] });
    }

    #[test]
    fn test_typed_debug() {
        let data = TypedData::<Wide>::data_of_length(1);
        assert!(format!("{data:?}").contains("\"wide\""));
    }
}
