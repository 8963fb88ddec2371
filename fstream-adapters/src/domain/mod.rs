//! Domain layer - buffering logic with zero infrastructure dependencies.
//!
//! This is the core of the hexagonal architecture. The domain layer contains:
//! - **Entities**: the two caches and their derived state
//! - **Value Objects**: validated configuration, open modes, seek references,
//!   metadata records
//! - **Domain Services**: `BufferedStream`
//! - **Ports**: `Channel`, the interface to the outside world
//! - **Domain Errors**: `StreamError`
//!
//! # Hexagonal Architecture
//!
//! ```text
//!     ┌──────────────────────────────────┐
//!     │      Domain Layer (Core)         │
//!     │                                  │
//!     │  ┌────────────────────────────┐  │
//!     │  │  Entities & Value Objects  │  │
//!     │  │  - ReadCache, WriteCache   │  │
//!     │  │  - StreamConfig, OpenMode  │  │
//!     │  └────────────────────────────┘  │
//!     │              ▲                   │
//!     │              │                   │
//!     │  ┌────────────────────────────┐  │
//!     │  │    Domain Services         │  │
//!     │  │    - BufferedStream        │  │
//!     │  └────────────────────────────┘  │
//!     │              │                   │
//!     │              ▼                   │
//!     │  ┌────────────────────────────┐  │
//!     │  │    Ports (Interfaces)      │  │
//!     │  │    - Channel               │  │
//!     │  └────────────────────────────┘  │
//!     └──────────────────────────────────┘
//!                    ▲
//!                    │ implemented by
//!                    │
//!     ┌──────────────────────────────────┐
//!     │      Adapter Layer               │
//!     │  - MemoryChannel                 │
//!     │  - FsChannel (fstream-platform)  │
//!     └──────────────────────────────────┘
//! ```

pub mod entities;
pub mod value_objects;
pub mod ports;
pub mod error;

mod buffered_stream;

// Re-export commonly used types
pub use entities::{CacheState, ReadCache, WriteCache};
pub use value_objects::{
    presets, BufferCapacity, FileMeta, OpenMode, SeekReference, StreamConfig, StreamConfigError,
    DEFAULT_BUFFER_SIZE,
};
pub use ports::Channel;
pub use error::StreamError;
pub use buffered_stream::BufferedStream;
