//! A mirror of [`std::sync`]'s locking types without lock poisoning.
//!
//! The [`std::sync::Mutex`] type "poisons" itself when a thread panics while
//! holding the lock, turning every later `lock()` into an error that is
//! typically just unwrapped into another panic. This crate already converts
//! panics in scheduled computations into [`Failure`][crate::Outcome::Failure]
//! results at the task boundary, so the poisoning mechanism is redundant
//! here. Worse, it could make a future's completion slot unreadable to the
//! very observers that are supposed to receive the failure.
//!
//! Hence this module provides a [`Mutex`] that never poisons.

use std::{
    fmt,
    ops::{Deref, DerefMut},
    sync,
};

#[derive(Default)]
pub struct Mutex<T: ?Sized> {
    inner: sync::Mutex<T>,
}

impl<T> Mutex<T> {
    pub const fn new(t: T) -> Mutex<T> {
        Self {
            inner: sync::Mutex::new(t),
        }
    }
}

impl<T: ?Sized> Mutex<T> {
    pub fn lock(&self) -> MutexGuard<'_, T> {
        let guard = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poison) => poison.into_inner(),
        };

        MutexGuard { inner: guard }
    }

    pub fn into_inner(self) -> T
    where
        T: Sized,
    {
        match self.inner.into_inner() {
            Ok(inner) => inner,
            Err(poison) => poison.into_inner(),
        }
    }

    pub fn get_mut(&mut self) -> &mut T {
        match self.inner.get_mut() {
            Ok(t) => t,
            Err(poison) => poison.into_inner(),
        }
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for Mutex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Mutex");
        match self.inner.try_lock() {
            Ok(val) => s.field("data", &&*val),
            Err(sync::TryLockError::Poisoned(poison)) => s.field("data", &&*poison.into_inner()),
            Err(sync::TryLockError::WouldBlock) => s.field("data", &"<locked>"),
        }
        .finish_non_exhaustive()
    }
}

impl<T> From<T> for Mutex<T> {
    fn from(value: T) -> Self {
        Self {
            inner: value.into(),
        }
    }
}

#[derive(Debug)]
pub struct MutexGuard<'a, T: ?Sized + 'a> {
    inner: sync::MutexGuard<'a, T>,
}

impl<'a, T: ?Sized + 'a> Deref for MutexGuard<'a, T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<'a, T: ?Sized + 'a> DerefMut for MutexGuard<'a, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl<'a, T: ?Sized + fmt::Display + 'a> fmt::Display for MutexGuard<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use std::panic::{catch_unwind, AssertUnwindSafe};

    use super::*;

    #[test]
    fn lock_survives_panic_while_held() {
        let mutex = Mutex::new(0);
        let result = catch_unwind(AssertUnwindSafe(|| {
            let _guard = mutex.lock();
            panic!("poisoning attempt");
        }));
        result.unwrap_err();

        *mutex.lock() = 1;
        assert_eq!(*mutex.lock(), 1);
    }
}
