//! Adapter layer - Concrete implementations of the domain's ports.
//!
//! ```text
//!     ┌──────────────────────────────────┐
//!     │      Domain Layer                │
//!     │  - BufferedStream (service)      │
//!     │  - Channel (port)                │
//!     └────────────┬─────────────────────┘
//!                  │
//!                  │ implements
//!                  ▼
//!     ┌──────────────────────────────────┐
//!     │      Adapter Layer               │  ◄── This module
//!     │  - MemoryChannel                 │
//!     └──────────────────────────────────┘
//! ```
//!
//! # Available Adapters
//!
//! - **`MemoryChannel`**: Named files held in memory, with operation counters
//!   and write fault injection for tests
//!
//! The operating-system channel lives in `fstream-platform`.

mod memory_channel;

pub use memory_channel::{ChannelStats, MemoryChannel, MemoryChannelError};
