//! Infrastructure layer - Utilities built on the domain.

pub mod oneshot;
pub mod streaming;

#[cfg(any(feature = "runtime-generic", feature = "runtime-tokio"))]
pub mod sync;
