use super::locker::{Locker, ReadGuard, WriteGuard};

/// How a [`ScopedLock`] acquires its [`Locker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMethod {
    /// Blocking exclusive acquisition.
    Exclusive,
    /// Non-blocking exclusive acquisition.
    TryExclusive,
    /// Blocking shared acquisition.
    Shared,
    /// Non-blocking shared acquisition.
    TryShared,
}

impl LockMethod {
    /// Check if the method asks for exclusive access.
    pub const fn is_exclusive(self) -> bool {
        matches!(self, Self::Exclusive | Self::TryExclusive)
    }
}

enum Held<'a, T> {
    Exclusive(WriteGuard<'a, T>),
    Shared(ReadGuard<'a, T>),
    Nothing,
}

/// A lock acquired on construction and released when the scope ends.
///
/// Acquisition may fail (a `Try*` method on a busy lock, or an expired
/// timeout); [`was_locked`](Self::was_locked) tells which. Only a successful
/// acquisition is released, on drop or by an explicit [`release`](Self::release).
///
/// ```
/// use fstream_adapters::{LockMethod, Locker, ScopedLock};
///
/// let counter = Locker::new(0);
/// {
///     let mut scope = ScopedLock::new(&counter, LockMethod::Exclusive);
///     assert!(scope.was_locked());
///     *scope.get_mut().unwrap() += 1;
///
///     let busy = ScopedLock::new(&counter, LockMethod::TryShared);
///     assert!(!busy.was_locked());
/// }
/// assert_eq!(*counter.lock_shared().unwrap(), 1);
/// ```
pub struct ScopedLock<'a, T> {
    held: Held<'a, T>,
}

impl<'a, T> ScopedLock<'a, T> {
    /// Acquire `locker` with the given method.
    pub fn new(locker: &'a Locker<T>, method: LockMethod) -> Self {
        let held = match method {
            LockMethod::Exclusive => locker.lock().map(Held::Exclusive),
            LockMethod::TryExclusive => locker.try_lock().map(Held::Exclusive),
            LockMethod::Shared => locker.lock_shared().map(Held::Shared),
            LockMethod::TryShared => locker.try_lock_shared().map(Held::Shared),
        };

        Self {
            held: held.unwrap_or(Held::Nothing),
        }
    }

    /// Check if the acquisition succeeded and the lock is still held.
    pub fn was_locked(&self) -> bool {
        !matches!(self.held, Held::Nothing)
    }

    /// The protected value, if the lock is held.
    pub fn get(&self) -> Option<&T> {
        match &self.held {
            Held::Exclusive(guard) => Some(&**guard),
            Held::Shared(guard) => Some(&**guard),
            Held::Nothing => None,
        }
    }

    /// The protected value, if the lock is held exclusively.
    pub fn get_mut(&mut self) -> Option<&mut T> {
        match &mut self.held {
            Held::Exclusive(guard) => Some(&mut **guard),
            _ => None,
        }
    }

    /// Release the lock before the end of the scope. Idempotent.
    pub fn release(&mut self) {
        self.held = Held::Nothing;
    }
}

impl<T> core::fmt::Debug for ScopedLock<'_, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let state = match self.held {
            Held::Exclusive(_) => "exclusive",
            Held::Shared(_) => "shared",
            Held::Nothing => "unlocked",
        };
        f.debug_struct("ScopedLock").field("held", &state).finish()
    }
}
