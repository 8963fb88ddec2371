//! Write-back cache entity.

use crate::domain::value_objects::BufferCapacity;
use std::collections::TryReserveError;

/// Bytes accepted from the caller but not yet sent to the channel.
#[derive(Debug)]
pub struct WriteCache {
    data: Vec<u8>,
    pending: usize,
}

impl WriteCache {
    /// Allocate an empty cache of the given capacity.
    pub fn new(capacity: BufferCapacity) -> Self {
        Self {
            data: vec![0u8; capacity.get()],
            pending: 0,
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

        Ok(Self { data, pending: 0 })
    }

    /// Capacity of the cache in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Number of buffered bytes.
    #[inline]
    pub const fn pending(&self) -> usize {
        self.pending
    }

    /// Check if nothing is buffered.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.pending == 0
    }

    /// Check if the cache must be drained before accepting more bytes.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.pending == self.data.len()
    }

    /// Free space left in the cache.
    #[inline]
    pub fn space(&self) -> usize {
        self.data.len() - self.pending
    }

    /// Buffer a single byte.
    ///
    /// Returns `false` without buffering if the cache is full.
    pub fn push(&mut self, byte: u8) -> bool {
        if self.is_full() {
            return false;
        }
        self.data[self.pending] = byte;
        self.pending += 1;
        true
    }

    /// Buffer as many bytes of `src` as fit.
    ///
    /// Returns the number of bytes buffered.
    pub fn extend(&mut self, src: &[u8]) -> usize {
        let n = src.len().min(self.space());
        self.data[self.pending..self.pending + n].copy_from_slice(&src[..n]);
        self.pending += n;
        n
    }

    /// The buffered bytes, in the order they were written.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data[..self.pending]
    }

    /// Forget the buffered bytes.
    pub fn clear(&mut self) {
        self.pending = 0;
    }
}
