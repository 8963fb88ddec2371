//! Value objects for the domain layer.
//!
//! Value objects are immutable, validated data types that represent
//! concepts in the domain model. They provide type safety and encapsulate
//! validation logic.

mod buffer_capacity;
mod stream_config;
mod open_mode;
mod seek_reference;
mod file_meta;

pub use buffer_capacity::BufferCapacity;
pub use stream_config::{presets, StreamConfig, StreamConfigError, DEFAULT_BUFFER_SIZE};
pub use open_mode::OpenMode;
pub use seek_reference::SeekReference;
pub use file_meta::FileMeta;
