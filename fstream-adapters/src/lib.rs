//! Buffered random-access byte streams with hexagonal architecture.
//!
//! This crate layers a read-ahead cache and a write-back cache over any byte
//! channel, so callers can read and write a byte at a time without paying a
//! system call per byte, while seek, size and position behave exactly as if
//! nothing were buffered.
//!
//! # Architecture
//!
//! The crate is organized into three layers:
//!
//! ## Domain Layer (`domain`)
//! Pure buffering logic with no infrastructure dependencies:
//! - **Entities**: `ReadCache`, `WriteCache`, `CacheState`
//! - **Value Objects**: `BufferCapacity`, `StreamConfig`, `OpenMode`,
//!   `SeekReference`, `FileMeta`
//! - **Services**: `BufferedStream`, the dual-cache engine
//! - **Ports**: `Channel` interface
//!
//! ## Adapter Layer (`adapters`)
//! Concrete channel implementations:
//! - **`MemoryChannel`**: in-memory namespace of named files with fault injection
//!
//! Operating-system channels live in the `fstream-platform` crate.
//!
//! ## Infrastructure Layer (`infrastructure`)
//! High-level utilities built on the domain:
//! - `embedded_io` `Read`/`Write`/`Seek` for `BufferedStream`
//! - One-shot free functions (`exists`, `rename`, `read_all_bytes`, ...)
//! - `Locker` / `ScopedLock` for sharing a stream between threads
//!
//! # Quick Start
//!
//! ```
//! use fstream_adapters::{BufferedStream, MemoryChannel, OpenMode, SeekReference, StreamConfig};
//!
//! let mut stream = BufferedStream::new(MemoryChannel::new(), StreamConfig::default());
//! stream.open(Some("greeting.txt"), OpenMode::ReadWrite).unwrap();
//! stream.write_block(b"hello").unwrap();
//! stream.seek(0, SeekReference::Start).unwrap();
//! assert_eq!(stream.read_byte().unwrap(), Some(b'h'));
//! stream.close().unwrap();
//! ```
//!
//! # Features
//!
//! - `log`: Enable logging through the `log` facade (default)
//! - `runtime-generic`: `Locker` backed by async-lock (default)
//! - `runtime-tokio`: `Locker` backed by tokio synchronization primitives
//! - `dirty-stream-panic`: panic when a dropped stream cannot flush its writes

#![warn(missing_docs)]

#[macro_use]
mod macros;

// Core layers
pub mod domain;
pub mod adapters;
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::{
    presets,
    BufferCapacity, BufferedStream, CacheState, Channel, FileMeta, OpenMode, ReadCache,
    SeekReference, StreamConfig, StreamConfigError, StreamError, WriteCache,
    DEFAULT_BUFFER_SIZE,
};

pub use adapters::{MemoryChannel, MemoryChannelError};

pub use infrastructure::oneshot;

#[cfg(any(feature = "runtime-generic", feature = "runtime-tokio"))]
pub use infrastructure::sync::{LockMethod, Locker, ScopedLock};

// Re-export embedded_io for convenience
pub use embedded_io;
