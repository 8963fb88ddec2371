//! Operating-system channels for fstream.
//!
//! This crate provides the [`Channel`](fstream_adapters::Channel)
//! implementation for host files, with open options chosen per platform:
//!
//! - **Unix** (Linux, macOS): created files get mode `0o644`
//! - **Windows**: files are opened with full share mode, so other handles may
//!   read, write, rename or delete them while a stream is open
//!
//! [`OsChannel`] names the channel for the current target, [`FileStream`] is a
//! buffered stream over it, and [`oneshot`] offers the open-do-close
//! operations without type parameters.
//!
//! # Example
//!
//! ```no_run
//! use fstream_platform::{oneshot, open_file, OpenMode, StreamConfig};
//!
//! let mut stream = open_file("journal.log", OpenMode::Append, StreamConfig::default())?;
//! stream.write_block(b"started\n")?;
//! stream.close()?;
//!
//! assert!(oneshot::file_size("journal.log")? >= 8);
//! # Ok::<(), fstream_platform::FsError>(())
//! ```

#![warn(missing_docs)]

mod fs_channel;

#[cfg(unix)]
#[path = "unix.rs"]
mod platform;

#[cfg(windows)]
#[path = "windows.rs"]
mod platform;

#[cfg(not(any(unix, windows)))]
mod platform {
    pub(crate) fn configure(_options: &mut std::fs::OpenOptions) {}
}

pub use fs_channel::FsChannel;

pub use fstream_adapters::{
    BufferedStream, FileMeta, OpenMode, SeekReference, StreamConfig, StreamError,
};

/// The channel for the platform this crate was built for.
pub type OsChannel = FsChannel;

/// Errors of streams over [`OsChannel`].
pub type FsError = StreamError<std::io::Error>;

/// A buffered stream over a host file.
pub type FileStream = BufferedStream<OsChannel>;

/// Open `name` in `mode` as a buffered stream.
///
/// # Errors
///
/// Returns `ResourceNotFound` or `PermissionDenied` for the corresponding OS
/// failures, and `Channel` for any other.
pub fn open_file(name: &str, mode: OpenMode, config: StreamConfig) -> Result<FileStream, FsError> {
    let mut stream = BufferedStream::with_name(OsChannel::new(), name, config);
    stream.open(None, mode)?;
    Ok(stream)
}

/// One-shot file operations, each opening and closing its own stream.
pub mod oneshot {
    use super::{FileMeta, FsError, OpenMode, OsChannel};
    use fstream_adapters::oneshot as generic;
    use time::OffsetDateTime;

    /// Check if the file `name` exists.
    pub fn exists(name: &str) -> Result<bool, FsError> {
        generic::exists::<OsChannel>(name)
    }

    /// Delete the file `name`.
    pub fn delete(name: &str) -> Result<(), FsError> {
        generic::delete::<OsChannel>(name)
    }

    /// Rename the file `from` to `to`.
    pub fn rename(from: &str, to: &str) -> Result<(), FsError> {
        generic::rename::<OsChannel>(from, to)
    }

    /// Size of the file `name` in bytes.
    pub fn file_size(name: &str) -> Result<u64, FsError> {
        generic::file_size::<OsChannel>(name)
    }

    /// Metadata of the file `name`.
    pub fn info(name: &str) -> Result<FileMeta, FsError> {
        generic::info::<OsChannel>(name)
    }

    /// Last modification time of the file `name`.
    pub fn last_modified(name: &str) -> Result<Option<OffsetDateTime>, FsError> {
        generic::last_modified::<OsChannel>(name)
    }

    /// Read the whole file `name`.
    pub fn read_all_bytes(name: &str) -> Result<Vec<u8>, FsError> {
        generic::read_all_bytes::<OsChannel>(name)
    }

    /// Write `data` to the file `name`, replacing its contents.
    pub fn write_all_bytes(name: &str, data: &[u8]) -> Result<(), FsError> {
        generic::write_all_bytes::<OsChannel>(name, data, OpenMode::WriteNew)
    }

    /// Append `data` to the file `name`, creating it if needed.
    pub fn append_all_bytes(name: &str, data: &[u8]) -> Result<(), FsError> {
        generic::write_all_bytes::<OsChannel>(name, data, OpenMode::Append)
    }
}
