//! Implementations of embedded_io traits for `BufferedStream`.

use crate::domain::{BufferedStream, Channel, SeekReference, StreamError};
use embedded_io::{ErrorType, Read, Seek, SeekFrom, Write};

impl<C: Channel> ErrorType for BufferedStream<C>
where
    C::Error: core::fmt::Display,
{
    type Error = StreamError<C::Error>;
}

impl<C: Channel> Read for BufferedStream<C>
where
    C::Error: core::fmt::Display,
{
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.read_block(buf)
    }
}

impl<C: Channel> Write for BufferedStream<C>
where
    C::Error: core::fmt::Display,
{
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.write_block(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        BufferedStream::flush(self)
    }
}

impl<C: Channel> Seek for BufferedStream<C>
where
    C::Error: core::fmt::Display,
{
    fn seek(&mut self, pos: SeekFrom) -> Result<u64, Self::Error> {
        let (offset, reference) = SeekReference::from_seek_from(pos).ok_or_else(|| {
            let target = match pos {
                SeekFrom::Start(n) => i128::from(n),
                SeekFrom::Current(n) | SeekFrom::End(n) => i128::from(n),
            };
            StreamError::InvalidSeek { target }
        })?;
        BufferedStream::seek(self, offset, reference)
    }
}
