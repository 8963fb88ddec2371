//! Stream configuration value object.

use super::BufferCapacity;

/// Default capacity of each stream cache (4 KiB).
pub const DEFAULT_BUFFER_SIZE: usize = 4 * 1024;

/// Configuration for a buffered stream.
///
/// Both the read-ahead and the write-back cache are sized from the same
/// capacity, fixed for the lifetime of the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamConfig {
    capacity: BufferCapacity,
}

impl StreamConfig {
    /// Create a configuration with the given cache capacity.
    ///
    /// # Errors
    ///
    /// Returns an error if `capacity` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use fstream_adapters::StreamConfig;
    ///
    /// let config = StreamConfig::new(8192).unwrap();
    /// assert_eq!(config.capacity().get(), 8192);
    /// assert!(StreamConfig::new(0).is_err());
    /// ```
    pub const fn new(capacity: usize) -> Result<Self, StreamConfigError> {
        match BufferCapacity::new(capacity) {
            Some(capacity) => Ok(Self { capacity }),
            None => Err(StreamConfigError::ZeroCapacity),
        }
    }

    /// Create a configuration from an already validated capacity.
    #[inline]
    pub const fn with_capacity(capacity: BufferCapacity) -> Self {
        Self { capacity }
    }

    /// Get the cache capacity.
    #[inline]
    pub const fn capacity(&self) -> BufferCapacity {
        self.capacity
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        match Self::new(DEFAULT_BUFFER_SIZE) {
            Ok(config) => config,
            Err(_) => unreachable!("default buffer size is non-zero"),
        }
    }
}

/// Errors that can occur when creating a StreamConfig.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamConfigError {
    /// Cache capacity is zero.
    ZeroCapacity,
}

impl core::fmt::Display for StreamConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ZeroCapacity => write!(f, "Buffer capacity cannot be zero"),
        }
    }
}

impl core::error::Error for StreamConfigError {}

/// Common cache size presets.
pub mod presets {
    /// 512 bytes (one disk sector).
    pub const BUFFER_512: usize = 512;

    /// 4KB, the default.
    pub const BUFFER_4K: usize = 4 * 1024;

    /// 16KB.
    pub const BUFFER_16K: usize = 16 * 1024;

    /// 64KB (good for large sequential copies).
    pub const BUFFER_64K: usize = 64 * 1024;

    /// 1MB.
    pub const BUFFER_1M: usize = 1024 * 1024;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        assert_eq!(StreamConfig::default().capacity().get(), DEFAULT_BUFFER_SIZE);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(StreamConfig::new(0), Err(StreamConfigError::ZeroCapacity));
        let msg = format!("{}", StreamConfigError::ZeroCapacity);
        assert!(msg.contains("zero"));
    }

    #[test]
    fn test_presets_are_valid() {
        for size in [
            presets::BUFFER_512,
            presets::BUFFER_4K,
            presets::BUFFER_16K,
            presets::BUFFER_64K,
            presets::BUFFER_1M,
        ] {
            assert_eq!(StreamConfig::new(size).unwrap().capacity().get(), size);
        }
    }
}
