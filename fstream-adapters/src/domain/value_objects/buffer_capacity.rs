//! Type-safe cache capacity value object.

use core::fmt;
use core::num::NonZeroUsize;

/// A validated, non-zero cache capacity in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferCapacity(NonZeroUsize);

impl BufferCapacity {
    /// Create a capacity, or `None` if `bytes` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use fstream_adapters::BufferCapacity;
    ///
    /// assert_eq!(BufferCapacity::new(4096).unwrap().get(), 4096);
    /// assert!(BufferCapacity::new(0).is_none());
    /// ```
    #[inline]
    pub const fn new(bytes: usize) -> Option<Self> {
        match NonZeroUsize::new(bytes) {
            Some(n) => Some(Self(n)),
            None => None,
        }
    }

    /// Get the capacity in bytes.
    #[inline]
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl fmt::Display for BufferCapacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} bytes", self.0)
    }
}

impl From<BufferCapacity> for usize {
    fn from(capacity: BufferCapacity) -> Self {
        capacity.get()
    }
}
