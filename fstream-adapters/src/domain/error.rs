//! Domain-level errors.
//!
//! Stream state misuse and buffering failures are modelled directly; every
//! other channel failure is carried through unchanged in `Channel`.

use crate::domain::value_objects::OpenMode;
use core::fmt;
use embedded_io::ErrorKind;

/// Errors that can occur while operating a buffered stream.
///
/// End-of-file is never an error: reads report it with `None` or a short
/// count.
#[derive(Debug)]
#[non_exhaustive]
pub enum StreamError<E> {
    /// The named resource does not exist and the open mode requires it.
    ResourceNotFound {
        /// The resource name that was looked up.
        name: String,
    },

    /// The channel refused access to the named resource.
    PermissionDenied {
        /// The resource name that was accessed.
        name: String,
    },

    /// The operation needs a closed stream (rename, delete).
    AlreadyOpen,

    /// The operation needs an open stream.
    NotOpen,

    /// The stream has no resource name to open, rename or delete.
    Unnamed,

    /// The stream was opened in a mode that forbids the operation.
    ModeViolation {
        /// The mode the stream was opened in.
        mode: OpenMode,
        /// The refused operation.
        operation: &'static str,
    },

    /// The channel accepted fewer bytes than were handed to it.
    ShortWrite {
        /// Bytes handed to the channel.
        expected: usize,
        /// Bytes the channel reported as written.
        written: usize,
    },

    /// The seek target lies before the start of the resource or past `i64::MAX`.
    InvalidSeek {
        /// The computed target offset.
        target: i128,
    },

    /// A cache buffer of the configured capacity could not be allocated.
    AllocationFailure {
        /// The requested capacity in bytes.
        capacity: usize,
    },

    /// Any other failure reported by the underlying channel.
    Channel(E),
}

impl<E: embedded_io::Error> StreamError<E> {
    /// Classify a channel failure that concerns the resource `name`.
    pub(crate) fn from_channel(err: E, name: &str) -> Self {
        match err.kind() {
            ErrorKind::NotFound => Self::ResourceNotFound {
                name: name.to_owned(),
            },
            ErrorKind::PermissionDenied => Self::PermissionDenied {
                name: name.to_owned(),
            },
            _ => Self::Channel(err),
        }
    }
}

impl<E: fmt::Display> fmt::Display for StreamError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResourceNotFound { name } => write!(f, "Resource not found: {}", name),
            Self::PermissionDenied { name } => write!(f, "Permission denied: {}", name),
            Self::AlreadyOpen => write!(f, "Stream is open; close it first"),
            Self::NotOpen => write!(f, "Stream is not open"),
            Self::Unnamed => write!(f, "Stream has no resource name"),
            Self::ModeViolation { mode, operation } => {
                write!(f, "Cannot {} a stream opened in {} mode", operation, mode)
            }
            Self::ShortWrite { expected, written } => write!(
                f,
                "Short write: {} of {} bytes reached the channel",
                written, expected
            ),
            Self::InvalidSeek { target } => {
                write!(f, "Invalid seek to offset {}", target)
            }
            Self::AllocationFailure { capacity } => {
                write!(f, "Cannot allocate {} byte stream cache", capacity)
            }
            Self::Channel(e) => write!(f, "Channel error: {}", e),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> core::error::Error for StreamError<E> {}

// Lets streams be used wherever embedded_io traits are expected
impl<E: embedded_io::Error + fmt::Display> embedded_io::Error for StreamError<E> {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::ResourceNotFound { .. } => ErrorKind::NotFound,
            Self::PermissionDenied { .. } => ErrorKind::PermissionDenied,
            Self::AlreadyOpen | Self::NotOpen | Self::Unnamed => ErrorKind::InvalidInput,
            Self::ModeViolation { .. } => ErrorKind::Unsupported,
            Self::ShortWrite { .. } => ErrorKind::WriteZero,
            Self::InvalidSeek { .. } => ErrorKind::InvalidInput,
            Self::AllocationFailure { .. } => ErrorKind::OutOfMemory,
            Self::Channel(e) => e.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_short_write_display() {
        let error: StreamError<io::Error> = StreamError::ShortWrite {
            expected: 10,
            written: 4,
        };

        let msg = format!("{}", error);
        assert!(msg.contains("4 of 10"));
    }

    #[test]
    fn test_mode_violation_display() {
        let error: StreamError<io::Error> = StreamError::ModeViolation {
            mode: OpenMode::ReadOnly,
            operation: "write",
        };
        let msg = format!("{}", error);
        assert!(msg.contains("write"));
        assert!(msg.contains("read-only"));
    }

    #[test]
    fn test_channel_errors_are_classified() {
        let missing = io::Error::new(io::ErrorKind::NotFound, "gone");
        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "nope");
        let other = io::Error::other("disk on fire");

        assert!(matches!(
            StreamError::from_channel(missing, "a.txt"),
            StreamError::ResourceNotFound { ref name } if name == "a.txt"
        ));
        assert!(matches!(
            StreamError::from_channel(denied, "a.txt"),
            StreamError::PermissionDenied { .. }
        ));
        assert!(matches!(
            StreamError::from_channel(other, "a.txt"),
            StreamError::Channel(_)
        ));
    }

    #[test]
    fn test_error_kinds() {
        use embedded_io::Error as _;

        let error: StreamError<io::Error> = StreamError::InvalidSeek { target: -1 };
        assert_eq!(error.kind(), ErrorKind::InvalidInput);

        let error: StreamError<io::Error> = StreamError::ShortWrite {
            expected: 2,
            written: 1,
        };
        assert_eq!(error.kind(), ErrorKind::WriteZero);
    }
}
