//! BufferedStream domain service - the dual-cache buffering engine.
//!
//! This module decides when the read cache is filled, drained and invalidated,
//! when the write cache is flushed, and how the logical position the caller
//! sees is reconciled with the physical offset of the channel.
//!
//! # Position bookkeeping
//!
//! The channel's physical offset is only ever ahead of the logical position
//! by the unconsumed read-ahead, or behind it by the pending writes. Before a
//! raw operation other than a sequential fill, that skew is removed: pending
//! writes are flushed, and unconsumed read-ahead is dropped with the channel
//! rewound by the same amount.

use crate::domain::{
    entities::{CacheState, ReadCache, WriteCache},
    error::StreamError,
    ports::Channel,
    value_objects::{FileMeta, OpenMode, SeekReference, StreamConfig},
};
use embedded_io::ErrorType;
use time::OffsetDateTime;

type StreamResult<T, C> = Result<T, StreamError<<C as ErrorType>::Error>>;

/// Buffered random-access stream over a [`Channel`].
///
/// `BufferedStream` owns one channel and two caches of equal capacity:
/// - a read-ahead cache filled a whole buffer at a time,
/// - a write-back cache flushed when full, on `flush`, `seek` and `close`.
///
/// Only one of the caches holds data at any time. Reading after writing
/// flushes first; writing after reading drops the unconsumed read-ahead and
/// rewinds the channel, so bytes always land at the caller's logical position.
///
/// The stream is single-owner and performs no synchronization. Wrap it in a
/// `Locker` to share it between threads.
///
/// # Examples
///
/// ```
/// use fstream_adapters::{BufferedStream, MemoryChannel, OpenMode, SeekReference, StreamConfig};
///
/// let channel = MemoryChannel::new().with_file("letters.txt", b"ABCDEF");
/// let mut stream = BufferedStream::with_name(channel, "letters.txt", StreamConfig::default());
///
/// stream.open(None, OpenMode::WriteExisting)?;
/// assert_eq!(stream.read_byte()?, Some(b'A'));
/// assert_eq!(stream.read_byte()?, Some(b'B'));
///
/// // Lands at logical position 2, not after the read-ahead
/// stream.write_byte(b'X')?;
/// stream.seek(0, SeekReference::Start)?;
///
/// let mut all = Vec::new();
/// stream.read_to_end(&mut all)?;
/// assert_eq!(all, b"ABXDEF");
/// # Ok::<(), fstream_adapters::StreamError<fstream_adapters::MemoryChannelError>>(())
/// ```
pub struct BufferedStream<C: Channel> {
    channel: C,
    name: Option<String>,
    config: StreamConfig,
    mode: Option<OpenMode>,
    read_cache: ReadCache,
    write_cache: WriteCache,
    position: u64,
}

impl<C: Channel> BufferedStream<C> {
    /// Create a closed, unnamed stream over `channel`.
    pub fn new(channel: C, config: StreamConfig) -> Self {
        Self {
            channel,
            name: None,
            config,
            mode: None,
            read_cache: ReadCache::new(config.capacity()),
            write_cache: WriteCache::new(config.capacity()),
            position: 0,
        }
    }

    /// Create a closed stream associated with the resource `name`.
    pub fn with_name(channel: C, name: &str, config: StreamConfig) -> Self {
        let mut stream = Self::new(channel, config);
        stream.name = Some(name.to_owned());
        stream
    }

    /// Create a closed, unnamed stream, reporting allocation failure of the
    /// caches instead of aborting.
    ///
    /// # Errors
    ///
    /// Returns `AllocationFailure` if either cache cannot be allocated.
    pub fn try_new(channel: C, config: StreamConfig) -> StreamResult<Self, C> {
        let capacity = config.capacity().get();
        let alloc_failed = |_| StreamError::AllocationFailure { capacity };

        Ok(Self {
            read_cache: ReadCache::with_capacity(config.capacity()).map_err(alloc_failed)?,
            write_cache: WriteCache::with_capacity(config.capacity()).map_err(alloc_failed)?,
            channel,
            name: None,
            config,
            mode: None,
            position: 0,
        })
    }

    /// Open the stream.
    ///
    /// A stream that is already open is closed first, flushing its pending
    /// writes. If `name` is given it replaces the associated resource name.
    /// The logical position starts at 0, or at end-of-file in
    /// [`OpenMode::Append`].
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No name is given and none is associated (`Unnamed`)
    /// - The mode requires an existing resource that is absent (`ResourceNotFound`)
    /// - The channel refuses access (`PermissionDenied`) or fails otherwise
    pub fn open(&mut self, name: Option<&str>, mode: OpenMode) -> StreamResult<(), C> {
        if self.is_open() {
            self.close()?;
        }
        if let Some(name) = name {
            self.name = Some(name.to_owned());
        }
        let name = self.name.as_deref().ok_or(StreamError::Unnamed)?;

        self.channel
            .open(name, mode)
            .map_err(|e| StreamError::from_channel(e, name))?;

        self.read_cache.clear();
        self.write_cache.clear();
        self.position = 0;

        if mode.starts_at_end() {
            match self.channel.seek(0, SeekReference::End) {
                Ok(end) => self.position = end,
                Err(e) => {
                    let _ = self.channel.close();
                    return Err(StreamError::Channel(e));
                }
            }
        }

        self.mode = Some(mode);
        debug!("opened {} ({}) at offset {}", name, mode, self.position);
        Ok(())
    }

    /// Flush pending writes and close the channel.
    ///
    /// Both caches are cleared even if the flush fails; the first error is
    /// returned. Closing a closed stream is a no-op.
    pub fn close(&mut self) -> StreamResult<(), C> {
        if !self.is_open() {
            return Ok(());
        }

        let flushed = self.flush_writes();
        self.read_cache.clear();
        self.write_cache.clear();
        self.mode = None;
        self.position = 0;

        let closed = self.channel.close().map_err(StreamError::Channel);
        debug!("closed {}", self.name.as_deref().unwrap_or("<unnamed>"));
        flushed.and(closed)
    }

    /// Read one byte.
    ///
    /// Returns `None` at end-of-file.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream is not open or not readable, or if
    /// flushing pending writes or refilling the cache fails.
    pub fn read_byte(&mut self) -> StreamResult<Option<u8>, C> {
        self.ensure_readable()?;
        self.flush_writes()?;

        if self.read_cache.is_exhausted() && self.fill()? == 0 {
            return Ok(None);
        }

        let byte = self.read_cache.next_byte();
        if byte.is_some() {
            self.position += 1;
        }
        Ok(byte)
    }

    /// Read up to `buf.len()` bytes.
    ///
    /// Cached bytes are served first. Once the cache is exhausted, remainders
    /// of at least one cache capacity are read straight into `buf`; smaller
    /// ones go through a refill. Returns fewer bytes than requested only at
    /// end-of-file.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream is not open or not readable, or if the
    /// channel fails.
    pub fn read_block(&mut self, buf: &mut [u8]) -> StreamResult<usize, C> {
        self.ensure_readable()?;
        if buf.is_empty() {
            return Ok(0);
        }
        self.flush_writes()?;

        let mut total = self.read_cache.take(buf);
        self.position += total as u64;

        while total < buf.len() {
            let rest = &mut buf[total..];

            if rest.len() >= self.read_cache.capacity() {
                let n = self.channel.read_raw(rest).map_err(StreamError::Channel)?;
                trace!("direct read of {} bytes at offset {}", n, self.position);
                total += n;
                self.position += n as u64;
                break;
            }

            let filled = self.fill()?;
            let n = self.read_cache.take(rest);
            total += n;
            self.position += n as u64;

            if filled < self.read_cache.capacity() {
                break;
            }
        }

        Ok(total)
    }

    /// Read everything from the logical position to end-of-file into `out`.
    ///
    /// Returns the number of bytes appended.
    pub fn read_to_end(&mut self, out: &mut Vec<u8>) -> StreamResult<usize, C> {
        let start = out.len();
        let chunk = self.read_cache.capacity();

        loop {
            let len = out.len();
            out.resize(len + chunk, 0);
            match self.read_block(&mut out[len..]) {
                Ok(n) => {
                    out.truncate(len + n);
                    if n < chunk {
                        break;
                    }
                }
                Err(e) => {
                    out.truncate(len);
                    return Err(e);
                }
            }
        }

        Ok(out.len() - start)
    }

    /// Write one byte.
    ///
    /// The byte is buffered; the cache is flushed as soon as it is full.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream is not open or not writable, if
    /// rewinding over unconsumed read-ahead fails, or if an automatic flush
    /// fails.
    pub fn write_byte(&mut self, byte: u8) -> StreamResult<(), C> {
        self.ensure_writable()?;
        self.discard_reads()?;

        self.write_cache.push(byte);
        self.position += 1;

        if self.write_cache.is_full() {
            self.flush_writes()?;
        }
        Ok(())
    }

    /// Write all of `data`.
    ///
    /// Bytes are appended to the write cache, which is flushed each time it
    /// fills up. When the cache is empty and at least one capacity of data
    /// remains, the remainder is written straight to the channel.
    ///
    /// # Errors
    ///
    /// Returns `ShortWrite` if the channel accepts fewer bytes than handed to
    /// it, or any error `write_byte` can return.
    pub fn write_block(&mut self, mut data: &[u8]) -> StreamResult<(), C> {
        self.ensure_writable()?;
        if data.is_empty() {
            return Ok(());
        }
        self.discard_reads()?;

        while !data.is_empty() {
            if self.write_cache.is_empty() && data.len() >= self.write_cache.capacity() {
                let written = self.channel.write_raw(data).map_err(StreamError::Channel)?;
                trace!("direct write of {} bytes at offset {}", written, self.position);
                self.position += written as u64;
                if written != data.len() {
                    warn!("short write: {} of {} bytes", written, data.len());
                    return Err(StreamError::ShortWrite {
                        expected: data.len(),
                        written,
                    });
                }
                break;
            }

            let n = self.write_cache.extend(data);
            self.position += n as u64;
            data = &data[n..];

            if self.write_cache.is_full() {
                self.flush_writes()?;
            }
        }
        Ok(())
    }

    /// Send pending writes to the channel and drop any read-ahead.
    ///
    /// Flushing twice in a row writes nothing the second time.
    ///
    /// # Errors
    ///
    /// Returns `ShortWrite` or a channel error if the raw write fails. The
    /// write cache is emptied either way.
    pub fn flush(&mut self) -> StreamResult<(), C> {
        self.ensure_open()?;
        self.flush_writes()?;
        self.discard_reads()
    }

    /// Move the logical position.
    ///
    /// `Current` is measured from the logical position, `End` from the size
    /// of the resource after pending writes are flushed. Returns the new
    /// position.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSeek` if the target lies before the start, or an error
    /// from flushing or from the channel.
    pub fn seek(&mut self, offset: i64, reference: SeekReference) -> StreamResult<u64, C> {
        self.ensure_open()?;
        self.flush_writes()?;

        let base: i128 = match reference {
            SeekReference::Start => 0,
            SeekReference::Current => i128::from(self.position),
            SeekReference::End => i128::from(self.channel.size().map_err(StreamError::Channel)?),
        };
        let target = base + i128::from(offset);
        let raw_target =
            i64::try_from(target).map_err(|_| StreamError::InvalidSeek { target })?;
        if raw_target < 0 {
            return Err(StreamError::InvalidSeek { target });
        }

        self.position = self
            .channel
            .seek(raw_target, SeekReference::Start)
            .map_err(StreamError::Channel)?;
        self.read_cache.clear();

        trace!("seek {:?} {} -> {}", reference, offset, self.position);
        Ok(self.position)
    }

    /// Size of the resource in bytes, counting writes still in the cache.
    ///
    /// # Errors
    ///
    /// Returns `NotOpen` on a closed stream, or a channel error.
    pub fn file_size(&mut self) -> StreamResult<u64, C> {
        self.ensure_open()?;
        let size = self.channel.size().map_err(StreamError::Channel)?;
        Ok(size.max(self.position))
    }

    /// Rename the associated resource. The stream must be closed.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyOpen`, `Unnamed`, or the channel's failure.
    pub fn rename(&mut self, new_name: &str) -> StreamResult<(), C> {
        if self.is_open() {
            return Err(StreamError::AlreadyOpen);
        }
        let old = self.name.as_deref().ok_or(StreamError::Unnamed)?;
        self.channel
            .rename(old, new_name)
            .map_err(|e| StreamError::from_channel(e, old))?;

        debug!("renamed {} -> {}", old, new_name);
        self.name = Some(new_name.to_owned());
        Ok(())
    }

    /// Delete the associated resource. The stream must be closed.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyOpen`, `Unnamed`, or the channel's failure.
    pub fn delete(&mut self) -> StreamResult<(), C> {
        if self.is_open() {
            return Err(StreamError::AlreadyOpen);
        }
        let name = self.name.as_deref().ok_or(StreamError::Unnamed)?;
        self.channel
            .delete(name)
            .map_err(|e| StreamError::from_channel(e, name))?;

        debug!("deleted {}", name);
        Ok(())
    }

    /// Check if the associated resource exists.
    pub fn exists(&mut self) -> StreamResult<bool, C> {
        let name = self.name.as_deref().ok_or(StreamError::Unnamed)?;
        self.channel.exists(name).map_err(StreamError::Channel)
    }

    /// Metadata of the associated resource.
    ///
    /// While the stream is open the reported size includes pending writes.
    pub fn info(&mut self) -> StreamResult<FileMeta, C> {
        let name = self.name.as_deref().ok_or(StreamError::Unnamed)?;
        let mut meta = self
            .channel
            .metadata(name)
            .map_err(|e| StreamError::from_channel(e, name))?;
        if self.is_open() {
            meta.size = meta.size.max(self.position);
        }
        Ok(meta)
    }

    /// Last modification time of the associated resource, if known.
    pub fn last_modified(&mut self) -> StreamResult<Option<OffsetDateTime>, C> {
        Ok(self.info()?.modified)
    }

    /// The logical position.
    #[inline]
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Check if the stream is open.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.mode.is_some()
    }

    /// The mode the stream is open in, if any.
    #[inline]
    pub fn mode(&self) -> Option<OpenMode> {
        self.mode
    }

    /// The associated resource name, if any.
    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Capacity of each cache in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.config.capacity().get()
    }

    /// The stream configuration.
    #[inline]
    pub const fn config(&self) -> &StreamConfig {
        &self.config
    }

    /// Which cache currently holds data.
    pub fn cache_state(&self) -> CacheState {
        debug_assert!(self.write_cache.is_empty() || self.read_cache.is_exhausted());

        if !self.write_cache.is_empty() {
            CacheState::WriteBack(self.write_cache.pending())
        } else if !self.read_cache.is_exhausted() {
            CacheState::ReadAhead(self.read_cache.remaining())
        } else {
            CacheState::Empty
        }
    }

    /// Get a reference to the underlying channel.
    pub fn channel(&self) -> &C {
        &self.channel
    }

    fn ensure_open(&self) -> StreamResult<OpenMode, C> {
        self.mode.ok_or(StreamError::NotOpen)
    }

    fn ensure_readable(&self) -> StreamResult<(), C> {
        let mode = self.ensure_open()?;
        if !mode.is_readable() {
            return Err(StreamError::ModeViolation {
                mode,
                operation: "read",
            });
        }
        Ok(())
    }

    fn ensure_writable(&self) -> StreamResult<(), C> {
        let mode = self.ensure_open()?;
        if !mode.is_writable() {
            return Err(StreamError::ModeViolation {
                mode,
                operation: "write",
            });
        }
        Ok(())
    }

    /// Refill the read cache from the physical offset, which equals the
    /// logical position because the cache is exhausted and no writes are
    /// pending.
    fn fill(&mut self) -> StreamResult<usize, C> {
        let channel = &mut self.channel;
        let n = self
            .read_cache
            .refill(|buf| channel.read_raw(buf))
            .map_err(StreamError::Channel)?;
        trace!("filled {} bytes at offset {}", n, self.position);
        Ok(n)
    }

    /// Write the pending bytes, if any, and empty the write cache.
    fn flush_writes(&mut self) -> StreamResult<(), C> {
        let expected = self.write_cache.pending();
        if expected == 0 {
            return Ok(());
        }

        let result = self.channel.write_raw(self.write_cache.as_slice());
        self.write_cache.clear();
        let written = result.map_err(StreamError::Channel)?;

        if written != expected {
            // The missing tail never reached the channel
            self.position = self.position.saturating_sub((expected - written.min(expected)) as u64);
            warn!("short write: {} of {} bytes", written, expected);
            return Err(StreamError::ShortWrite { expected, written });
        }

        trace!("flushed {} bytes, offset now {}", written, self.position);
        Ok(())
    }

    /// Rewind the channel over unconsumed read-ahead, then drop it.
    ///
    /// The cache is kept if the rewind fails, so the skew stays accounted for.
    fn discard_reads(&mut self) -> StreamResult<(), C> {
        let unconsumed = self.read_cache.remaining();
        if unconsumed > 0 {
            self.channel
                .seek(-(unconsumed as i64), SeekReference::Current)
                .map_err(StreamError::Channel)?;
            trace!("rewound {} bytes of read-ahead", unconsumed);
        }
        self.read_cache.clear();
        Ok(())
    }
}

impl<C: Channel> Drop for BufferedStream<C> {
    fn drop(&mut self) {
        if let Err(_e) = self.close() {
            #[cfg(feature = "dirty-stream-panic")]
            panic!("Dropping stream {:?} failed: {:?}", self.name, _e);

            #[cfg(not(feature = "dirty-stream-panic"))]
            warn!("closing {:?} on drop failed: {:?}", self.name, _e);
        }
    }
}

impl<C: Channel> core::fmt::Debug for BufferedStream<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BufferedStream")
            .field("name", &self.name)
            .field("mode", &self.mode)
            .field("position", &self.position)
            .field("capacity", &self.config.capacity())
            .field("cache_state", &self.cache_state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{MemoryChannel, MemoryChannelError};

    const CAPACITY: usize = 4;

    fn config() -> StreamConfig {
        StreamConfig::new(CAPACITY).unwrap()
    }

    fn stream_over(channel: &MemoryChannel, name: &str) -> BufferedStream<MemoryChannel> {
        BufferedStream::with_name(channel.clone(), name, config())
    }

    #[test]
    fn test_open_without_name_fails() {
        let mut stream = BufferedStream::new(MemoryChannel::new(), config());
        let result = stream.open(None, OpenMode::ReadWrite);
        assert!(matches!(result, Err(StreamError::Unnamed)));
        assert!(!stream.is_open());
    }

    #[test]
    fn test_open_missing_resource_read_only() {
        let channel = MemoryChannel::new();
        let mut stream = stream_over(&channel, "missing.bin");
        let result = stream.open(None, OpenMode::ReadOnly);
        assert!(matches!(result, Err(StreamError::ResourceNotFound { ref name }) if name == "missing.bin"));
    }

    #[test]
    fn test_open_denied_resource() {
        let channel = MemoryChannel::new().with_file("secret", b"x");
        channel.deny("secret");
        let mut stream = stream_over(&channel, "secret");
        assert!(matches!(
            stream.open(None, OpenMode::ReadOnly),
            Err(StreamError::PermissionDenied { .. })
        ));
    }

    #[test]
    fn test_operations_on_closed_stream() {
        let mut stream = stream_over(&MemoryChannel::new(), "a");
        assert!(matches!(stream.read_byte(), Err(StreamError::NotOpen)));
        assert!(matches!(stream.write_byte(1), Err(StreamError::NotOpen)));
        assert!(matches!(stream.flush(), Err(StreamError::NotOpen)));
        assert!(matches!(stream.seek(0, SeekReference::Start), Err(StreamError::NotOpen)));
        assert!(matches!(stream.file_size(), Err(StreamError::NotOpen)));
        assert!(stream.close().is_ok());
    }

    #[test]
    fn test_reopen_flushes_previous_writes() {
        let channel = MemoryChannel::new();
        let mut stream = stream_over(&channel, "first");
        stream.open(None, OpenMode::WriteNew).unwrap();
        stream.write_byte(7).unwrap();

        stream.open(Some("second"), OpenMode::WriteNew).unwrap();
        assert_eq!(channel.contents("first").unwrap(), vec![7]);
        assert_eq!(stream.name(), Some("second"));
        assert_eq!(stream.position(), 0);
    }

    #[test]
    fn test_append_starts_at_end() {
        let channel = MemoryChannel::new().with_file("log", b"abc");
        let mut stream = stream_over(&channel, "log");
        stream.open(None, OpenMode::Append).unwrap();
        assert_eq!(stream.position(), 3);
        stream.write_block(b"de").unwrap();
        stream.close().unwrap();
        assert_eq!(channel.contents("log").unwrap(), b"abcde");
    }

    #[test]
    fn test_read_byte_to_eof() {
        let channel = MemoryChannel::new().with_file("f", b"xyz");
        let mut stream = stream_over(&channel, "f");
        stream.open(None, OpenMode::ReadOnly).unwrap();

        assert_eq!(stream.read_byte().unwrap(), Some(b'x'));
        assert_eq!(stream.read_byte().unwrap(), Some(b'y'));
        assert_eq!(stream.read_byte().unwrap(), Some(b'z'));
        assert_eq!(stream.read_byte().unwrap(), None);
        assert_eq!(stream.read_byte().unwrap(), None);
        assert_eq!(stream.position(), 3);
    }

    #[test]
    fn test_read_byte_on_empty_resource() {
        let channel = MemoryChannel::new().with_file("empty", b"");
        let mut stream = stream_over(&channel, "empty");
        stream.open(None, OpenMode::ReadOnly).unwrap();
        assert_eq!(stream.read_byte().unwrap(), None);
    }

    #[test]
    fn test_read_bytes_use_one_raw_read_per_fill() {
        let channel = MemoryChannel::new().with_file("f", b"abcdefgh");
        let mut stream = stream_over(&channel, "f");
        stream.open(None, OpenMode::ReadOnly).unwrap();
        channel.reset_stats();

        for _ in 0..CAPACITY {
            stream.read_byte().unwrap();
        }
        assert_eq!(channel.stats().raw_reads, 1);
        assert_eq!(stream.cache_state(), CacheState::Empty);
    }

    #[test]
    fn test_read_block_more_than_remains() {
        let channel = MemoryChannel::new().with_file("f", b"0123456789");
        let mut stream = stream_over(&channel, "f");
        stream.open(None, OpenMode::ReadOnly).unwrap();

        assert_eq!(stream.read_byte().unwrap(), Some(b'0'));
        let mut buf = [0u8; 32];
        let n = stream.read_block(&mut buf).unwrap();
        assert_eq!(n, 9);
        assert_eq!(&buf[..n], b"123456789");
        assert_eq!(stream.position(), 10);
        assert_eq!(stream.read_block(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_read_block_bypasses_cache_for_large_remainder() {
        let data: Vec<u8> = (0..64).collect();
        let channel = MemoryChannel::new().with_file("f", &data);
        let mut stream = stream_over(&channel, "f");
        stream.open(None, OpenMode::ReadOnly).unwrap();
        channel.reset_stats();

        let mut buf = [0u8; 40];
        assert_eq!(stream.read_block(&mut buf).unwrap(), 40);
        assert_eq!(&buf[..], &data[..40]);
        assert_eq!(channel.stats().raw_reads, 1);
        assert_eq!(stream.cache_state(), CacheState::Empty);
    }

    #[test]
    fn test_write_after_read_lands_at_logical_position() {
        let channel = MemoryChannel::new().with_file("f", b"ABCDEF");
        let mut stream = stream_over(&channel, "f");
        stream.open(None, OpenMode::WriteExisting).unwrap();

        assert_eq!(stream.read_byte().unwrap(), Some(b'A'));
        assert_eq!(stream.read_byte().unwrap(), Some(b'B'));
        assert_eq!(stream.cache_state(), CacheState::ReadAhead(2));

        stream.write_byte(b'X').unwrap();
        assert_eq!(stream.cache_state(), CacheState::WriteBack(1));
        stream.flush().unwrap();
        stream.close().unwrap();

        assert_eq!(channel.contents("f").unwrap(), b"ABXDEF");
    }

    #[test]
    fn test_read_after_write_continues_at_logical_position() {
        let channel = MemoryChannel::new().with_file("f", b"ABCDEF");
        let mut stream = stream_over(&channel, "f");
        stream.open(None, OpenMode::WriteExisting).unwrap();

        stream.read_byte().unwrap();
        stream.write_byte(b'x').unwrap();
        assert_eq!(stream.read_byte().unwrap(), Some(b'C'));
        assert_eq!(stream.position(), 3);
        stream.close().unwrap();

        assert_eq!(channel.contents("f").unwrap(), b"AxCDEF");
    }

    #[test]
    fn test_write_cache_flushes_when_full() {
        let channel = MemoryChannel::new();
        let mut stream = stream_over(&channel, "f");
        stream.open(None, OpenMode::WriteNew).unwrap();
        channel.reset_stats();

        for b in 0..CAPACITY as u8 - 1 {
            stream.write_byte(b).unwrap();
        }
        assert_eq!(channel.stats().raw_writes, 0);
        stream.write_byte(0xFF).unwrap();
        assert_eq!(channel.stats().raw_writes, 1);
        assert_eq!(stream.cache_state(), CacheState::Empty);
        assert_eq!(channel.contents("f").unwrap(), vec![0, 1, 2, 0xFF]);
    }

    #[test]
    fn test_flush_is_idempotent() {
        let channel = MemoryChannel::new();
        let mut stream = stream_over(&channel, "f");
        stream.open(None, OpenMode::WriteNew).unwrap();
        stream.write_block(b"ab").unwrap();
        channel.reset_stats();

        stream.flush().unwrap();
        stream.flush().unwrap();
        assert_eq!(channel.stats().raw_writes, 1);
        assert_eq!(channel.contents("f").unwrap(), b"ab");
    }

    #[test]
    fn test_short_write_is_reported() {
        let channel = MemoryChannel::new();
        let mut stream = stream_over(&channel, "f");
        stream.open(None, OpenMode::WriteNew).unwrap();
        stream.write_block(b"abc").unwrap();

        channel.limit_next_write(1);
        let result = stream.flush();
        assert!(matches!(
            result,
            Err(StreamError::ShortWrite { expected: 3, written: 1 })
        ));
        assert_eq!(stream.position(), 1);
        assert_eq!(stream.cache_state(), CacheState::Empty);
    }

    #[test]
    fn test_failed_write_surfaces_channel_error() {
        let channel = MemoryChannel::new();
        let mut stream = stream_over(&channel, "f");
        stream.open(None, OpenMode::WriteNew).unwrap();
        stream.write_byte(1).unwrap();

        channel.fail_next_write();
        assert!(matches!(
            stream.flush(),
            Err(StreamError::Channel(MemoryChannelError::Injected))
        ));
    }

    #[test]
    fn test_seek_current_is_relative_to_logical_position() {
        let data: Vec<u8> = (0..32).collect();
        let channel = MemoryChannel::new().with_file("f", &data);
        let mut stream = stream_over(&channel, "f");
        stream.open(None, OpenMode::ReadOnly).unwrap();

        for _ in 0..10 {
            stream.read_byte().unwrap();
        }
        assert_eq!(stream.position(), 10);
        assert_eq!(stream.seek(-5, SeekReference::Current).unwrap(), 5);
        assert_eq!(stream.read_byte().unwrap(), Some(5));
    }

    #[test]
    fn test_seek_end_counts_pending_writes() {
        let channel = MemoryChannel::new();
        let mut stream = stream_over(&channel, "f");
        stream.open(None, OpenMode::ReadWrite).unwrap();
        stream.write_block(b"abc").unwrap();

        assert_eq!(stream.seek(-1, SeekReference::End).unwrap(), 2);
        assert_eq!(stream.read_byte().unwrap(), Some(b'c'));
    }

    #[test]
    fn test_seek_before_start_fails() {
        let channel = MemoryChannel::new().with_file("f", b"abc");
        let mut stream = stream_over(&channel, "f");
        stream.open(None, OpenMode::ReadOnly).unwrap();
        stream.read_byte().unwrap();

        let result = stream.seek(-2, SeekReference::Current);
        assert!(matches!(result, Err(StreamError::InvalidSeek { target: -1 })));
        assert_eq!(stream.position(), 1);
        assert_eq!(stream.read_byte().unwrap(), Some(b'b'));
    }

    #[test]
    fn test_failed_channel_seek_keeps_read_ahead() {
        let channel = MemoryChannel::new().with_file("f", b"ABCDEF");
        let mut stream = stream_over(&channel, "f");
        stream.open(None, OpenMode::ReadOnly).unwrap();
        assert_eq!(stream.read_byte().unwrap(), Some(b'A'));

        channel.fail_next_seek();
        let result = stream.seek(3, SeekReference::Start);
        assert!(matches!(result, Err(StreamError::Channel(MemoryChannelError::Injected))));
        assert_eq!(stream.position(), 1);
        assert_eq!(stream.cache_state(), CacheState::ReadAhead(3));
        assert_eq!(stream.read_byte().unwrap(), Some(b'B'));
    }

    #[test]
    fn test_failed_rewind_before_write_keeps_read_ahead() {
        let channel = MemoryChannel::new().with_file("f", b"ABCDEF");
        let mut stream = stream_over(&channel, "f");
        stream.open(None, OpenMode::WriteExisting).unwrap();
        assert_eq!(stream.read_byte().unwrap(), Some(b'A'));

        channel.fail_next_seek();
        let result = stream.write_byte(b'X');
        assert!(matches!(result, Err(StreamError::Channel(MemoryChannelError::Injected))));
        assert_eq!(stream.position(), 1);
        assert_eq!(stream.cache_state(), CacheState::ReadAhead(3));

        stream.write_byte(b'Y').unwrap();
        assert_eq!(stream.position(), 2);
        stream.close().unwrap();
        assert_eq!(channel.contents("f").unwrap(), b"AYCDEF");
    }

    #[test]
    fn test_file_size_includes_pending_writes() {
        let channel = MemoryChannel::new();
        let mut stream = stream_over(&channel, "f");
        stream.open(None, OpenMode::ReadWrite).unwrap();
        stream.write_block(b"ab").unwrap();

        assert_eq!(channel.contents("f").unwrap().len(), 0);
        assert_eq!(stream.file_size().unwrap(), 2);
    }

    #[test]
    fn test_mode_violations() {
        let channel = MemoryChannel::new().with_file("f", b"abc");
        let mut stream = stream_over(&channel, "f");

        stream.open(None, OpenMode::ReadOnly).unwrap();
        assert!(matches!(
            stream.write_byte(1),
            Err(StreamError::ModeViolation { operation: "write", .. })
        ));

        stream.open(None, OpenMode::WriteNew).unwrap();
        assert!(matches!(
            stream.read_byte(),
            Err(StreamError::ModeViolation { operation: "read", .. })
        ));
    }

    #[test]
    fn test_rename_and_delete_require_closed_stream() {
        let channel = MemoryChannel::new().with_file("old", b"data");
        let mut stream = stream_over(&channel, "old");

        stream.open(None, OpenMode::ReadOnly).unwrap();
        assert!(matches!(stream.rename("new"), Err(StreamError::AlreadyOpen)));
        assert!(matches!(stream.delete(), Err(StreamError::AlreadyOpen)));
        assert!(stream.exists().unwrap());
        stream.close().unwrap();

        stream.rename("new").unwrap();
        assert_eq!(stream.name(), Some("new"));
        assert!(!channel.exists_named("old"));
        assert_eq!(channel.contents("new").unwrap(), b"data");

        stream.delete().unwrap();
        assert!(!stream.exists().unwrap());
    }

    #[test]
    fn test_info_reports_pending_size() {
        let channel = MemoryChannel::new();
        let mut stream = stream_over(&channel, "notes/today.txt");
        stream.open(None, OpenMode::WriteNew).unwrap();
        stream.write_block(b"hi").unwrap();

        let meta = stream.info().unwrap();
        assert_eq!(meta.directory, "notes");
        assert_eq!(meta.extension.as_deref(), Some("txt"));
        assert_eq!(meta.size, 2);
        assert!(stream.last_modified().unwrap().is_some());
    }

    #[test]
    fn test_drop_flushes_pending_writes() {
        let channel = MemoryChannel::new();
        {
            let mut stream = stream_over(&channel, "f");
            stream.open(None, OpenMode::WriteNew).unwrap();
            stream.write_block(b"xy").unwrap();
        }
        assert_eq!(channel.contents("f").unwrap(), b"xy");
    }

    #[test]
    fn test_try_new_allocates_caches() {
        let stream = BufferedStream::try_new(MemoryChannel::new(), config()).unwrap();
        assert_eq!(stream.config().capacity().get(), CAPACITY);
        assert_eq!(stream.cache_state(), CacheState::Empty);
    }
}
