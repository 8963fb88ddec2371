//! File-backed channel.
//!
//! Provides a [`Channel`] implementation over `std::fs::File`, driven through
//! `embedded_io` so the raw loops below read the same on every platform.

use crate::platform;
use embedded_io::{Read, Seek, SeekFrom, Write};
use embedded_io_adapters::std::FromStd;
use fstream_adapters::{Channel, FileMeta, OpenMode, SeekReference};
use std::fs::{self, File, OpenOptions};
use std::io;
use time::OffsetDateTime;

/// Channel over files of the host operating system.
///
/// Resource names are paths. The handle is the `File`; dropping or closing the
/// channel closes it.
///
/// # Example
///
/// ```no_run
/// use fstream_adapters::{BufferedStream, OpenMode, StreamConfig};
/// use fstream_platform::FsChannel;
///
/// let mut stream = BufferedStream::with_name(FsChannel::new(), "data.bin", StreamConfig::default());
/// stream.open(None, OpenMode::ReadOnly)?;
/// let first = stream.read_byte()?;
/// # Ok::<(), fstream_platform::FsError>(())
/// ```
#[derive(Default)]
pub struct FsChannel {
    file: Option<FromStd<File>>,
}

impl FsChannel {
    /// Create a channel with no open file.
    pub fn new() -> Self {
        Self::default()
    }

    fn file(&mut self) -> io::Result<&mut FromStd<File>> {
        self.file
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "no file is open"))
    }
}

impl core::fmt::Debug for FsChannel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FsChannel")
            .field("open", &self.file.is_some())
            .finish()
    }
}

/// Translate an open mode into `OpenOptions`.
fn open_options(mode: OpenMode) -> OpenOptions {
    let mut options = OpenOptions::new();
    options
        .read(mode.is_readable())
        .write(mode.is_writable())
        .create(mode.creates())
        .truncate(mode.truncates());
    platform::configure(&mut options);
    options
}

fn to_datetime(time: io::Result<std::time::SystemTime>) -> Option<OffsetDateTime> {
    time.ok().map(OffsetDateTime::from)
}

impl embedded_io::ErrorType for FsChannel {
    type Error = io::Error;
}

impl Channel for FsChannel {
    fn open(&mut self, name: &str, mode: OpenMode) -> Result<(), Self::Error> {
        self.close()?;
        let file = open_options(mode).open(name)?;

        #[cfg(feature = "logging")]
        log::debug!("opened file {} ({})", name, mode);

        self.file = Some(FromStd::new(file));
        Ok(())
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.file.is_some()
    }

    fn rename(&mut self, from: &str, to: &str) -> Result<(), Self::Error> {
        fs::rename(from, to)
    }

    fn delete(&mut self, name: &str) -> Result<(), Self::Error> {
        fs::remove_file(name)
    }

    fn exists(&mut self, name: &str) -> Result<bool, Self::Error> {
        std::path::Path::new(name).try_exists()
    }

    fn metadata(&mut self, name: &str) -> Result<FileMeta, Self::Error> {
        let meta = fs::metadata(name)?;
        Ok(FileMeta::from_name(name)
            .with_size(meta.len())
            .with_times(to_datetime(meta.created()), to_datetime(meta.modified())))
    }

    fn size(&mut self) -> Result<u64, Self::Error> {
        Ok(self.file()?.inner().metadata()?.len())
    }

    fn seek(&mut self, offset: i64, reference: SeekReference) -> Result<u64, Self::Error> {
        let pos = match reference {
            SeekReference::Start => SeekFrom::Start(u64::try_from(offset).map_err(|_| {
                io::Error::new(io::ErrorKind::InvalidInput, "seek before start of file")
            })?),
            SeekReference::Current => SeekFrom::Current(offset),
            SeekReference::End => SeekFrom::End(offset),
        };
        self.file()?.seek(pos)
    }

    fn read_raw(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let file = self.file()?;
        let mut filled = 0;
        while filled < buf.len() {
            match file.read(&mut buf[filled..]) {
                Ok(0) => break, // EOF
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }

    fn write_raw(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        let file = self.file()?;
        let mut written = 0;
        while written < buf.len() {
            match file.write(&buf[written..]) {
                Ok(0) => break, // Can't write more
                Ok(n) => written += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) if e.kind() == io::ErrorKind::WriteZero => break,
                Err(e) => return Err(e),
            }
        }
        Ok(written)
    }
}
