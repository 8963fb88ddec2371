//! In-memory channel over a shared namespace of named files.
//!
//! Clones of a `MemoryChannel` see the same files but hold their own handle,
//! so a test can keep one clone to inspect contents while a stream owns
//! another. The channel counts raw operations and can inject write faults.

use crate::domain::{
    ports::Channel,
    value_objects::{FileMeta, OpenMode, SeekReference},
};
use core::fmt;
use embedded_io::{ErrorKind, ErrorType};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use time::OffsetDateTime;

/// Errors reported by [`MemoryChannel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryChannelError {
    /// The named file does not exist.
    NotFound,
    /// The name was marked inaccessible with [`MemoryChannel::deny`].
    PermissionDenied,
    /// No file is open.
    NotOpen,
    /// The handle's mode does not allow the operation.
    BadMode,
    /// The seek target lies before the start of the file.
    InvalidSeek,
    /// A fault armed with [`MemoryChannel::fail_next_write`] or
    /// [`MemoryChannel::fail_next_seek`].
    Injected,
}

impl fmt::Display for MemoryChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "No such file"),
            Self::PermissionDenied => write!(f, "Permission denied"),
            Self::NotOpen => write!(f, "No file is open"),
            Self::BadMode => write!(f, "Operation not allowed by open mode"),
            Self::InvalidSeek => write!(f, "Seek before start of file"),
            Self::Injected => write!(f, "Injected failure"),
        }
    }
}

impl core::error::Error for MemoryChannelError {}

impl embedded_io::Error for MemoryChannelError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound => ErrorKind::NotFound,
            Self::PermissionDenied => ErrorKind::PermissionDenied,
            Self::NotOpen | Self::InvalidSeek => ErrorKind::InvalidInput,
            Self::BadMode => ErrorKind::Unsupported,
            Self::Injected => ErrorKind::Other,
        }
    }
}

/// Counters of raw channel operations, shared by all clones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelStats {
    /// Calls to `read_raw`.
    pub raw_reads: usize,
    /// Calls to `write_raw`.
    pub raw_writes: usize,
    /// Calls to `seek`.
    pub raw_seeks: usize,
}

#[derive(Debug)]
struct MemFile {
    data: Vec<u8>,
    created: OffsetDateTime,
    modified: OffsetDateTime,
}

impl MemFile {
    fn new(data: Vec<u8>) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            data,
            created: now,
            modified: now,
        }
    }
}

#[derive(Debug, Default)]
struct Namespace {
    files: HashMap<String, MemFile>,
    denied: HashSet<String>,
    stats: ChannelStats,
    fail_next_write: bool,
    fail_next_seek: bool,
    write_limit: Option<usize>,
}

#[derive(Debug)]
struct Handle {
    name: String,
    offset: u64,
    mode: OpenMode,
}

/// [`Channel`] backed by memory.
#[derive(Debug, Default)]
pub struct MemoryChannel {
    namespace: Arc<Mutex<Namespace>>,
    handle: Option<Handle>,
}

impl Clone for MemoryChannel {
    /// Share the namespace. The clone starts without an open handle.
    fn clone(&self) -> Self {
        Self {
            namespace: Arc::clone(&self.namespace),
            handle: None,
        }
    }
}

impl MemoryChannel {
    /// Create a channel over an empty namespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file to the namespace, builder style.
    #[must_use]
    pub fn with_file(self, name: &str, data: impl AsRef<[u8]>) -> Self {
        self.insert(name, data);
        self
    }

    /// Create or replace a file.
    pub fn insert(&self, name: &str, data: impl AsRef<[u8]>) {
        self.namespace()
            .files
            .insert(name.to_owned(), MemFile::new(data.as_ref().to_vec()));
    }

    /// Snapshot of a file's contents.
    pub fn contents(&self, name: &str) -> Option<Vec<u8>> {
        self.namespace().files.get(name).map(|f| f.data.clone())
    }

    /// Check if a file exists without going through the channel port.
    pub fn exists_named(&self, name: &str) -> bool {
        self.namespace().files.contains_key(name)
    }

    /// Raw operation counters.
    pub fn stats(&self) -> ChannelStats {
        self.namespace().stats
    }

    /// Reset the raw operation counters to zero.
    pub fn reset_stats(&self) {
        self.namespace().stats = ChannelStats::default();
    }

    /// Make the next `write_raw` fail with [`MemoryChannelError::Injected`].
    pub fn fail_next_write(&self) {
        self.namespace().fail_next_write = true;
    }

    /// Make the next `seek` fail with [`MemoryChannelError::Injected`],
    /// leaving the offset where it was.
    pub fn fail_next_seek(&self) {
        self.namespace().fail_next_seek = true;
    }

    /// Make the next `write_raw` accept at most `limit` bytes.
    pub fn limit_next_write(&self, limit: usize) {
        self.namespace().write_limit = Some(limit);
    }

    /// Refuse every access to `name` with a permission error.
    pub fn deny(&self, name: &str) {
        self.namespace().denied.insert(name.to_owned());
    }

    fn namespace(&self) -> MutexGuard<'_, Namespace> {
        self.namespace.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn handle(&self) -> Result<&Handle, MemoryChannelError> {
        self.handle.as_ref().ok_or(MemoryChannelError::NotOpen)
    }
}

impl Namespace {
    fn check_access(&self, name: &str) -> Result<(), MemoryChannelError> {
        if self.denied.contains(name) {
            return Err(MemoryChannelError::PermissionDenied);
        }
        Ok(())
    }

    fn file(&self, name: &str) -> Result<&MemFile, MemoryChannelError> {
        self.check_access(name)?;
        self.files.get(name).ok_or(MemoryChannelError::NotFound)
    }

    fn file_mut(&mut self, name: &str) -> Result<&mut MemFile, MemoryChannelError> {
        self.check_access(name)?;
        self.files.get_mut(name).ok_or(MemoryChannelError::NotFound)
    }
}

impl ErrorType for MemoryChannel {
    type Error = MemoryChannelError;
}

impl Channel for MemoryChannel {
    fn open(&mut self, name: &str, mode: OpenMode) -> Result<(), Self::Error> {
        self.handle = None;

        {
            let mut ns = self.namespace();
            ns.check_access(name)?;

            let existed = ns.files.contains_key(name);
            if !existed && !mode.creates() {
                return Err(MemoryChannelError::NotFound);
            }

            let file = ns
                .files
                .entry(name.to_owned())
                .or_insert_with(|| MemFile::new(Vec::new()));
            if existed && mode.truncates() {
                file.data.clear();
                file.modified = OffsetDateTime::now_utc();
            }
        }

        self.handle = Some(Handle {
            name: name.to_owned(),
            offset: 0,
            mode,
        });
        Ok(())
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        self.handle = None;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    fn rename(&mut self, from: &str, to: &str) -> Result<(), Self::Error> {
        let mut ns = self.namespace();
        ns.check_access(to)?;
        ns.file(from)?;

        if let Some(file) = ns.files.remove(from) {
            ns.files.insert(to.to_owned(), file);
        }
        Ok(())
    }

    fn delete(&mut self, name: &str) -> Result<(), Self::Error> {
        let mut ns = self.namespace();
        ns.file(name)?;
        ns.files.remove(name);
        Ok(())
    }

    fn exists(&mut self, name: &str) -> Result<bool, Self::Error> {
        Ok(self.exists_named(name))
    }

    fn metadata(&mut self, name: &str) -> Result<FileMeta, Self::Error> {
        let ns = self.namespace();
        let file = ns.file(name)?;

        Ok(FileMeta::from_name(name)
            .with_size(file.data.len() as u64)
            .with_times(Some(file.created), Some(file.modified)))
    }

    fn size(&mut self) -> Result<u64, Self::Error> {
        let handle = self.handle()?;
        let ns = self.namespace();
        Ok(ns.file(&handle.name)?.data.len() as u64)
    }

    fn seek(&mut self, offset: i64, reference: SeekReference) -> Result<u64, Self::Error> {
        let handle = self.handle.as_mut().ok_or(MemoryChannelError::NotOpen)?;
        let mut ns = self
            .namespace
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        ns.stats.raw_seeks += 1;
        if core::mem::take(&mut ns.fail_next_seek) {
            return Err(MemoryChannelError::Injected);
        }

        let base = match reference {
            SeekReference::Start => 0,
            SeekReference::Current => i128::from(handle.offset),
            SeekReference::End => ns.file(&handle.name)?.data.len() as i128,
        };
        let target = base + i128::from(offset);
        handle.offset = u64::try_from(target).map_err(|_| MemoryChannelError::InvalidSeek)?;
        Ok(handle.offset)
    }

    fn read_raw(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let handle = self.handle.as_mut().ok_or(MemoryChannelError::NotOpen)?;
        if !handle.mode.is_readable() {
            return Err(MemoryChannelError::BadMode);
        }
        let mut ns = self
            .namespace
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        ns.stats.raw_reads += 1;

        let data = &ns.file(&handle.name)?.data;
        let start = usize::try_from(handle.offset).map_or(data.len(), |o| o.min(data.len()));
        let n = buf.len().min(data.len() - start);
        buf[..n].copy_from_slice(&data[start..start + n]);

        handle.offset += n as u64;
        Ok(n)
    }

    fn write_raw(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        let handle = self.handle.as_mut().ok_or(MemoryChannelError::NotOpen)?;
        if !handle.mode.is_writable() {
            return Err(MemoryChannelError::BadMode);
        }
        let mut ns = self
            .namespace
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        ns.stats.raw_writes += 1;

        if core::mem::take(&mut ns.fail_next_write) {
            return Err(MemoryChannelError::Injected);
        }
        let n = ns.write_limit.take().map_or(buf.len(), |limit| limit.min(buf.len()));

        let file = ns.file_mut(&handle.name)?;
        let start = usize::try_from(handle.offset).map_err(|_| MemoryChannelError::InvalidSeek)?;
        if file.data.len() < start + n {
            // Gap past the old end reads back as zeroes
            file.data.resize(start + n, 0);
        }
        file.data[start..start + n].copy_from_slice(&buf[..n]);
        file.modified = OffsetDateTime::now_utc();

        handle.offset += n as u64;
        Ok(n)
    }
}
