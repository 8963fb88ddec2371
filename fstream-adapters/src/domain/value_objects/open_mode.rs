//! File open modes.

use core::fmt;

/// How a channel opens its named resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpenMode {
    /// Read an existing resource.
    ReadOnly,
    /// Create the resource, truncating it if it exists. Write only.
    WriteNew,
    /// Write into an existing resource without truncating it. Reads are allowed.
    WriteExisting,
    /// Create the resource, truncating it if it exists. Reads and writes.
    ReadWrite,
    /// Create the resource if missing and start at its end. Reads and writes.
    Append,
}

impl OpenMode {
    /// Check if the mode allows reading.
    #[inline]
    pub const fn is_readable(&self) -> bool {
        !matches!(self, OpenMode::WriteNew)
    }

    /// Check if the mode allows writing.
    #[inline]
    pub const fn is_writable(&self) -> bool {
        !matches!(self, OpenMode::ReadOnly)
    }

    /// Check if opening fails when the resource does not exist.
    #[inline]
    pub const fn requires_existing(&self) -> bool {
        matches!(self, OpenMode::ReadOnly | OpenMode::WriteExisting)
    }

    /// Check if opening creates a missing resource.
    #[inline]
    pub const fn creates(&self) -> bool {
        !self.requires_existing()
    }

    /// Check if opening discards existing contents.
    #[inline]
    pub const fn truncates(&self) -> bool {
        matches!(self, OpenMode::WriteNew | OpenMode::ReadWrite)
    }

    /// Check if the stream starts positioned at end-of-file.
    #[inline]
    pub const fn starts_at_end(&self) -> bool {
        matches!(self, OpenMode::Append)
    }
}

impl fmt::Display for OpenMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OpenMode::ReadOnly => "read-only",
            OpenMode::WriteNew => "write-new",
            OpenMode::WriteExisting => "write-existing",
            OpenMode::ReadWrite => "read-write",
            OpenMode::Append => "append",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_capabilities() {
        assert!(OpenMode::ReadOnly.is_readable());
        assert!(!OpenMode::ReadOnly.is_writable());
        assert!(OpenMode::ReadOnly.requires_existing());

        assert!(!OpenMode::WriteNew.is_readable());
        assert!(OpenMode::WriteNew.truncates());
        assert!(OpenMode::WriteNew.creates());

        assert!(OpenMode::WriteExisting.is_readable());
        assert!(OpenMode::WriteExisting.is_writable());
        assert!(!OpenMode::WriteExisting.truncates());
        assert!(OpenMode::WriteExisting.requires_existing());

        assert!(OpenMode::ReadWrite.truncates());
        assert!(OpenMode::Append.starts_at_end());
        assert!(!OpenMode::Append.truncates());
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(format!("{}", OpenMode::WriteExisting), "write-existing");
    }
}
