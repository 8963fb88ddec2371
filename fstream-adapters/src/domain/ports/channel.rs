//! Channel port - Secondary (driven) port for raw, unbuffered byte I/O.
//!
//! This port defines what the buffered stream needs from the operating
//! system. Adapters implement this trait to connect the domain to real files
//! (or to memory, in tests).

use crate::domain::value_objects::{FileMeta, OpenMode, SeekReference};
use embedded_io::ErrorType;

/// Port for raw byte-channel operations on a named resource.
///
/// This is a **secondary (driven) port** in hexagonal architecture terms.
/// The `BufferedStream` depends on this abstraction; each platform provides
/// one implementation, selected at build time.
///
/// ```text
/// ┌─────────────────────┐
/// │   Domain Layer      │
/// │  (BufferedStream)   │
/// └──────────┬──────────┘
///            │ depends on
///            ▼
/// ┌─────────────────────┐
/// │    Channel Port     │  ◄── This trait
/// └──────────┬──────────┘
///            │ implemented by
///            ▼
/// ┌─────────────────────┐
/// │  Adapter Layer      │
/// │ (MemoryChannel,     │
/// │  FsChannel)         │
/// └─────────────────────┘
/// ```
///
/// A channel is dumb: every call is one blocking operation, there is no
/// caching, and the only position it tracks is the one the OS keeps.
///
/// The error type comes from [`ErrorType`], so every failure carries an
/// [`embedded_io::ErrorKind`] the stream uses to classify it (missing
/// resource, permission problem, anything else).
pub trait Channel: ErrorType {
    /// Open `name` in the given mode, closing any handle held before.
    ///
    /// # Errors
    ///
    /// Fails if the mode requires an existing resource that is absent, or if
    /// the OS refuses access.
    fn open(&mut self, name: &str, mode: OpenMode) -> Result<(), Self::Error>;

    /// Close the handle. Closing a closed channel is a no-op.
    fn close(&mut self) -> Result<(), Self::Error>;

    /// Check if a handle is currently held.
    fn is_open(&self) -> bool;

    /// Rename the resource `from` to `to`.
    fn rename(&mut self, from: &str, to: &str) -> Result<(), Self::Error>;

    /// Delete the resource `name`.
    fn delete(&mut self, name: &str) -> Result<(), Self::Error>;

    /// Check if the resource `name` exists.
    fn exists(&mut self, name: &str) -> Result<bool, Self::Error>;

    /// Query metadata of the resource `name`.
    fn metadata(&mut self, name: &str) -> Result<FileMeta, Self::Error>;

    /// Current size of the open resource, in bytes.
    fn size(&mut self) -> Result<u64, Self::Error>;

    /// Move the raw offset of the open resource.
    ///
    /// Returns the new offset from the start.
    fn seek(&mut self, offset: i64, reference: SeekReference) -> Result<u64, Self::Error>;

    /// Read into `buf` at the raw offset.
    ///
    /// Returns the number of bytes read, which is less than `buf.len()` only
    /// at end-of-file.
    fn read_raw(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error>;

    /// Write `buf` at the raw offset.
    ///
    /// Returns the number of bytes the resource accepted. Anything other than
    /// `buf.len()` is a short write.
    fn write_raw(&mut self, buf: &[u8]) -> Result<usize, Self::Error>;
}

impl<T: Channel + ?Sized> Channel for &mut T {
    fn open(&mut self, name: &str, mode: OpenMode) -> Result<(), Self::Error> {
        T::open(self, name, mode)
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        T::close(self)
    }

    fn is_open(&self) -> bool {
        T::is_open(self)
    }

    fn rename(&mut self, from: &str, to: &str) -> Result<(), Self::Error> {
        T::rename(self, from, to)
    }

    fn delete(&mut self, name: &str) -> Result<(), Self::Error> {
        T::delete(self, name)
    }

    fn exists(&mut self, name: &str) -> Result<bool, Self::Error> {
        T::exists(self, name)
    }

    fn metadata(&mut self, name: &str) -> Result<FileMeta, Self::Error> {
        T::metadata(self, name)
    }

    fn size(&mut self) -> Result<u64, Self::Error> {
        T::size(self)
    }

    fn seek(&mut self, offset: i64, reference: SeekReference) -> Result<u64, Self::Error> {
        T::seek(self, offset, reference)
    }

    fn read_raw(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        T::read_raw(self, buf)
    }

    fn write_raw(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        T::write_raw(self, buf)
    }
}
