use super::backend::{self, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

/// Guard for shared access to a [`Locker`]'s value.
pub type ReadGuard<'a, T> = RwLockReadGuard<'a, T>;

/// Guard for exclusive access to a [`Locker`]'s value.
pub type WriteGuard<'a, T> = RwLockWriteGuard<'a, T>;

const POLL_INTERVAL: Duration = Duration::from_millis(1);

/// A value behind a reader-writer lock with optional acquisition timeout.
///
/// Every acquisition returns an `Option`: blocking calls return `None` only
/// when a timeout is configured and expires, `try_*` calls return `None` when
/// the lock is held elsewhere. Unlocking is dropping the guard.
///
/// # Examples
///
/// ```
/// use fstream_adapters::{BufferedStream, Locker, MemoryChannel, OpenMode, StreamConfig};
/// use std::sync::Arc;
///
/// let stream = BufferedStream::new(MemoryChannel::new(), StreamConfig::default());
/// let shared = Arc::new(Locker::new(stream));
///
/// if let Some(mut stream) = shared.lock() {
///     stream.open(Some("shared.log"), OpenMode::Append).unwrap();
///     stream.write_block(b"entry\n").unwrap();
/// }
/// assert_eq!(shared.lock_shared().unwrap().position(), 6);
/// ```
#[derive(Debug)]
pub struct Locker<T> {
    inner: RwLock<T>,
    timeout: Option<Duration>,
}

impl<T> Locker<T> {
    /// Wrap `value`. Blocking acquisitions wait indefinitely.
    pub fn new(value: T) -> Self {
        Self {
            inner: RwLock::new(value),
            timeout: None,
        }
    }

    /// Give up blocking acquisitions after `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// The configured acquisition timeout.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Acquire exclusive access, waiting up to the configured timeout.
    pub fn lock(&self) -> Option<WriteGuard<'_, T>> {
        match self.timeout {
            None => Some(backend::write(&self.inner)),
            Some(timeout) => poll_until(timeout, || backend::try_write(&self.inner)),
        }
    }

    /// Acquire shared access, waiting up to the configured timeout.
    pub fn lock_shared(&self) -> Option<ReadGuard<'_, T>> {
        match self.timeout {
            None => Some(backend::read(&self.inner)),
            Some(timeout) => poll_until(timeout, || backend::try_read(&self.inner)),
        }
    }

    /// Acquire exclusive access if it is free right now.
    pub fn try_lock(&self) -> Option<WriteGuard<'_, T>> {
        backend::try_write(&self.inner)
    }

    /// Acquire shared access if no writer holds the lock right now.
    pub fn try_lock_shared(&self) -> Option<ReadGuard<'_, T>> {
        backend::try_read(&self.inner)
    }

    /// Access the value through a unique borrow, without locking.
    pub fn get_mut(&mut self) -> &mut T {
        self.inner.get_mut()
    }

    /// Unwrap the value.
    pub fn into_inner(self) -> T {
        self.inner.into_inner()
    }
}

impl<T: Default> Default for Locker<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

fn poll_until<G>(timeout: Duration, mut attempt: impl FnMut() -> Option<G>) -> Option<G> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(guard) = attempt() {
            return Some(guard);
        }
        let now = Instant::now();
        if now >= deadline {
            trace!("lock acquisition timed out after {:?}", timeout);
            return None;
        }
        std::thread::sleep(POLL_INTERVAL.min(deadline - now));
    }
}
