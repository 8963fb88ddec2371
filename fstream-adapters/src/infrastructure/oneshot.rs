//! One-shot operations on a named resource.
//!
//! Each function builds a stream over a fresh `C::default()` channel, opens
//! it if the operation needs an open handle, performs a single operation and
//! closes again. They are the free-function counterparts of the
//! `BufferedStream` methods of the same name.
//!
//! ```
//! use fstream_adapters::{oneshot, MemoryChannel, OpenMode};
//!
//! // A default MemoryChannel starts with an empty namespace of its own
//! assert!(!oneshot::exists::<MemoryChannel>("nothing.txt")?);
//! oneshot::write_all_bytes::<MemoryChannel>("nothing.txt", b"x", OpenMode::WriteNew)?;
//! # Ok::<(), fstream_adapters::StreamError<fstream_adapters::MemoryChannelError>>(())
//! ```

use crate::domain::{BufferedStream, Channel, FileMeta, OpenMode, StreamConfig, StreamError};
use time::OffsetDateTime;

type OneShotResult<T, C> = Result<T, StreamError<<C as embedded_io::ErrorType>::Error>>;

fn stream<C: Channel + Default>(name: &str) -> BufferedStream<C> {
    BufferedStream::with_name(C::default(), name, StreamConfig::default())
}

/// Run `op` on a stream opened on `name`, then close it.
///
/// The close always happens; an error from `op` takes precedence over one
/// from closing.
fn with_open<C, T, F>(name: &str, mode: OpenMode, op: F) -> OneShotResult<T, C>
where
    C: Channel + Default,
    F: FnOnce(&mut BufferedStream<C>) -> OneShotResult<T, C>,
{
    let mut stream = stream::<C>(name);
    stream.open(None, mode)?;
    let result = op(&mut stream);
    let closed = stream.close();
    let value = result?;
    closed?;
    Ok(value)
}

/// Check if `name` exists.
pub fn exists<C: Channel + Default>(name: &str) -> OneShotResult<bool, C> {
    stream::<C>(name).exists()
}

/// Delete `name`.
pub fn delete<C: Channel + Default>(name: &str) -> OneShotResult<(), C> {
    stream::<C>(name).delete()
}

/// Rename `from` to `to`.
pub fn rename<C: Channel + Default>(from: &str, to: &str) -> OneShotResult<(), C> {
    stream::<C>(from).rename(to)
}

/// Size of `name` in bytes.
pub fn file_size<C: Channel + Default>(name: &str) -> OneShotResult<u64, C> {
    with_open::<C, _, _>(name, OpenMode::ReadOnly, |s| s.file_size())
}

/// Metadata of `name`.
pub fn info<C: Channel + Default>(name: &str) -> OneShotResult<FileMeta, C> {
    stream::<C>(name).info()
}

/// Last modification time of `name`, if the channel reports one.
pub fn last_modified<C: Channel + Default>(name: &str) -> OneShotResult<Option<OffsetDateTime>, C> {
    stream::<C>(name).last_modified()
}

/// Read the whole of `name`.
pub fn read_all_bytes<C: Channel + Default>(name: &str) -> OneShotResult<Vec<u8>, C> {
    with_open::<C, _, _>(name, OpenMode::ReadOnly, |s| {
        let mut out = Vec::new();
        s.read_to_end(&mut out)?;
        Ok(out)
    })
}

/// Write `data` to `name` in the given mode.
///
/// Use [`OpenMode::WriteNew`] to replace the contents and
/// [`OpenMode::Append`] to extend them.
pub fn write_all_bytes<C: Channel + Default>(
    name: &str,
    data: &[u8],
    mode: OpenMode,
) -> OneShotResult<(), C> {
    with_open::<C, _, _>(name, mode, |s| s.write_block(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{MemoryChannel, MemoryChannelError};
    use crate::domain::value_objects::SeekReference;
    use std::sync::OnceLock;

    // Default channels in these tests attach to one process-wide namespace
    struct SharedChannel(MemoryChannel);

    impl Default for SharedChannel {
        fn default() -> Self {
            static SHARED: OnceLock<MemoryChannel> = OnceLock::new();
            Self(SHARED.get_or_init(MemoryChannel::new).clone())
        }
    }

    impl embedded_io::ErrorType for SharedChannel {
        type Error = MemoryChannelError;
    }

    impl Channel for SharedChannel {
        fn open(&mut self, name: &str, mode: OpenMode) -> Result<(), Self::Error> {
            self.0.open(name, mode)
        }
        fn close(&mut self) -> Result<(), Self::Error> {
            self.0.close()
        }
        fn is_open(&self) -> bool {
            self.0.is_open()
        }
        fn rename(&mut self, from: &str, to: &str) -> Result<(), Self::Error> {
            self.0.rename(from, to)
        }
        fn delete(&mut self, name: &str) -> Result<(), Self::Error> {
            self.0.delete(name)
        }
        fn exists(&mut self, name: &str) -> Result<bool, Self::Error> {
            self.0.exists(name)
        }
        fn metadata(&mut self, name: &str) -> Result<FileMeta, Self::Error> {
            self.0.metadata(name)
        }
        fn size(&mut self) -> Result<u64, Self::Error> {
            self.0.size()
        }
        fn seek(&mut self, offset: i64, reference: SeekReference) -> Result<u64, Self::Error> {
            self.0.seek(offset, reference)
        }
        fn read_raw(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            self.0.read_raw(buf)
        }
        fn write_raw(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            self.0.write_raw(buf)
        }
    }

    #[test]
    fn test_oneshot_lifecycle() {
        let name = "oneshot/lifecycle.dat";
        assert!(!exists::<SharedChannel>(name).unwrap());

        write_all_bytes::<SharedChannel>(name, b"hello", OpenMode::WriteNew).unwrap();
        write_all_bytes::<SharedChannel>(name, b" world", OpenMode::Append).unwrap();
        assert_eq!(read_all_bytes::<SharedChannel>(name).unwrap(), b"hello world");
        assert_eq!(file_size::<SharedChannel>(name).unwrap(), 11);

        let meta = info::<SharedChannel>(name).unwrap();
        assert_eq!(meta.extension.as_deref(), Some("dat"));
        assert!(last_modified::<SharedChannel>(name).unwrap().is_some());

        let moved = "oneshot/moved.dat";
        rename::<SharedChannel>(name, moved).unwrap();
        assert!(!exists::<SharedChannel>(name).unwrap());
        delete::<SharedChannel>(moved).unwrap();
        assert!(!exists::<SharedChannel>(moved).unwrap());
    }

    #[test]
    fn test_read_missing_resource() {
        let result = read_all_bytes::<SharedChannel>("oneshot/missing");
        assert!(matches!(result, Err(StreamError::ResourceNotFound { .. })));
    }

    #[test]
    fn test_write_existing_requires_resource() {
        let result =
            write_all_bytes::<SharedChannel>("oneshot/absent", b"x", OpenMode::WriteExisting);
        assert!(matches!(result, Err(StreamError::ResourceNotFound { .. })));
    }
}
