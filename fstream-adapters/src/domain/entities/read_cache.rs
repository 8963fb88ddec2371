//! Read-ahead cache entity.

use crate::domain::value_objects::BufferCapacity;
use std::collections::TryReserveError;

/// Bytes fetched from the channel ahead of the caller.
///
/// `cursor` is the index of the next unconsumed byte and `valid` the number of
/// bytes the last fill actually produced. A fill shorter than the capacity only
/// means end-of-file once the filled bytes have been consumed.
#[derive(Debug)]
pub struct ReadCache {
    data: Vec<u8>,
    cursor: usize,
    valid: usize,
}

impl ReadCache {
    /// Allocate an empty cache of the given capacity.
    pub fn new(capacity: BufferCapacity) -> Self {
        Self {
            data: vec![0u8; capacity.get()],
            cursor: 0,
            valid: 0,
        }
    }

    /// Allocate an empty cache, reporting allocation failure instead of aborting.
    ///
    /// # Errors
    ///
    /// Returns the allocator's error if the buffer cannot be reserved.
    pub fn with_capacity(capacity: BufferCapacity) -> Result<Self, TryReserveError> {
        let mut data = Vec::new();
        data.try_reserve_exact(capacity.get())?;
        data.resize(capacity.get(), 0);

        Ok(Self {
            data,
            cursor: 0,
            valid: 0,
        })
    }

    /// Capacity of the cache in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Index of the next unconsumed byte.
    #[inline]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of bytes filled by the last refill.
    #[inline]
    pub const fn valid(&self) -> usize {
        self.valid
    }

    /// Bytes filled but not yet handed to the caller.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.valid - self.cursor
    }

    /// Check if every filled byte has been consumed.
    #[inline]
    pub const fn is_exhausted(&self) -> bool {
        self.cursor == self.valid
    }

    /// Take the next unconsumed byte.
    pub fn next_byte(&mut self) -> Option<u8> {
        if self.is_exhausted() {
            return None;
        }
        let byte = self.data[self.cursor];
        self.cursor += 1;
        Some(byte)
    }

    /// Copy as many unconsumed bytes as fit into `dest`.
    ///
    /// Returns the number of bytes copied.
    pub fn take(&mut self, dest: &mut [u8]) -> usize {
        let n = dest.len().min(self.remaining());
        dest[..n].copy_from_slice(&self.data[self.cursor..self.cursor + n]);
        self.cursor += n;
        n
    }

    /// Refill the whole cache with a closure that reads into it.
    ///
    /// The closure receives the full buffer and returns how many bytes it
    /// produced. On error the cache is left empty.
    pub fn refill<F, E>(&mut self, fill: F) -> Result<usize, E>
    where
        F: FnOnce(&mut [u8]) -> Result<usize, E>,
    {
        self.clear();
        let n = fill(&mut self.data)?;
        debug_assert!(n <= self.data.len());
        self.valid = n.min(self.data.len());
        Ok(self.valid)
    }

    /// Drop the cache contents.
    ///
    /// Returns the number of unconsumed bytes that were discarded.
    pub fn clear(&mut self) -> usize {
        let discarded = self.remaining();
        self.cursor = 0;
        self.valid = 0;
        discarded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(capacity: usize) -> ReadCache {
        ReadCache::with_capacity(BufferCapacity::new(capacity).unwrap()).unwrap()
    }

    #[test]
    fn test_new_cache_is_exhausted() {
        let cache = cache(8);
        assert_eq!(cache.capacity(), 8);
        assert!(cache.is_exhausted());
        assert_eq!(cache.remaining(), 0);
    }

    #[test]
    fn test_refill_and_consume() {
        let mut cache = cache(4);
        let filled = cache
            .refill(|buf| -> Result<usize, ()> {
                buf[..3].copy_from_slice(b"abc");
                Ok(3)
            })
            .unwrap();
        assert_eq!(filled, 3);
        assert_eq!(cache.next_byte(), Some(b'a'));

        let mut out = [0u8; 8];
        assert_eq!(cache.take(&mut out), 2);
        assert_eq!(&out[..2], b"bc");
        assert!(cache.is_exhausted());
        assert_eq!(cache.next_byte(), None);
    }

    #[test]
    fn test_clear_reports_discarded_bytes() {
        let mut cache = cache(4);
        cache.refill(|_| -> Result<usize, ()> { Ok(4) }).unwrap();
        cache.next_byte();
        assert_eq!(cache.clear(), 3);
        assert_eq!(cache.clear(), 0);
    }

    #[test]
    fn test_failed_refill_leaves_cache_empty() {
        let mut cache = cache(4);
        cache.refill(|_| -> Result<usize, ()> { Ok(4) }).unwrap();
        assert!(cache.refill(|_| Err::<usize, ()>(())).is_err());
        assert!(cache.is_exhausted());
        assert_eq!(cache.valid(), 0);
    }
}
