//! Lock capability for sharing a stream between threads.
//!
//! `BufferedStream` performs no synchronization of its own. Callers that share
//! one stream wrap it in a [`Locker`], a reader-writer lock with optional
//! acquisition timeout, and hold a guard (or a [`ScopedLock`]) for the span of
//! each logical operation. Even reads need the exclusive lock, since they move
//! the cursor; the shared lock is for observers such as `position()`.
//!
//! # Backends
//!
//! - `runtime-generic` (default): `async_lock::RwLock`, blocking acquisition
//! - `runtime-tokio`: `tokio::sync::RwLock`. Blocking acquisition panics when
//!   called from inside a tokio runtime, as tokio's `blocking_*` methods do.
//!
//! If both features are enabled, tokio wins.

mod locker;
mod scoped_lock;

pub use locker::{Locker, ReadGuard, WriteGuard};
pub use scoped_lock::{LockMethod, ScopedLock};

#[cfg(not(feature = "runtime-tokio"))]
mod backend {
    pub use async_lock::{RwLock, RwLockReadGuard, RwLockWriteGuard};

    pub fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
        lock.read_blocking()
    }

    pub fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
        lock.write_blocking()
    }

    pub fn try_read<T>(lock: &RwLock<T>) -> Option<RwLockReadGuard<'_, T>> {
        lock.try_read()
    }

    pub fn try_write<T>(lock: &RwLock<T>) -> Option<RwLockWriteGuard<'_, T>> {
        lock.try_write()
    }
}

#[cfg(feature = "runtime-tokio")]
mod backend {
    pub use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

    pub fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
        lock.blocking_read()
    }

    pub fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
        lock.blocking_write()
    }

    pub fn try_read<T>(lock: &RwLock<T>) -> Option<RwLockReadGuard<'_, T>> {
        lock.try_read().ok()
    }

    pub fn try_write<T>(lock: &RwLock<T>) -> Option<RwLockWriteGuard<'_, T>> {
        lock.try_write().ok()
    }
}
