//! Derived state of the two stream caches.

/// Which cache, if any, currently holds data.
///
/// Streams move between these states:
/// - Empty: nothing buffered, physical offset equals the logical position
/// - ReadAhead: unconsumed bytes were fetched beyond the logical position
/// - WriteBack: written bytes have not reached the channel yet
///
/// No state has both caches holding data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CacheState {
    /// Neither cache holds data.
    #[default]
    Empty,
    /// The read cache holds this many unconsumed bytes.
    ReadAhead(usize),
    /// The write cache holds this many pending bytes.
    WriteBack(usize),
}

impl CacheState {
    /// Check if no bytes are buffered in either direction.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        matches!(self, CacheState::Empty)
    }

    /// Check if there are writes waiting for a flush.
    #[inline]
    pub const fn is_dirty(&self) -> bool {
        matches!(self, CacheState::WriteBack(_))
    }

    /// Distance between the channel's physical offset and the logical position.
    ///
    /// Positive while reading ahead, negative while writes are buffered.
    #[inline]
    pub const fn physical_skew(&self) -> i64 {
        match self {
            CacheState::Empty => 0,
            CacheState::ReadAhead(n) => *n as i64,
            CacheState::WriteBack(n) => -(*n as i64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_state_checks() {
        assert!(CacheState::Empty.is_empty());
        assert!(!CacheState::Empty.is_dirty());
        assert!(CacheState::WriteBack(3).is_dirty());
        assert!(!CacheState::ReadAhead(3).is_dirty());
    }

    #[test]
    fn test_physical_skew() {
        assert_eq!(CacheState::Empty.physical_skew(), 0);
        assert_eq!(CacheState::ReadAhead(4).physical_skew(), 4);
        assert_eq!(CacheState::WriteBack(4).physical_skew(), -4);
    }

    #[test]
    fn test_cache_state_default() {
        assert_eq!(CacheState::default(), CacheState::Empty);
    }
}
