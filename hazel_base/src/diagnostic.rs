//! A module for handling diagnostics reported by the compiler phases.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    PoisonError, RwLock, RwLockReadGuard,
};

/// Represents a trait responsible for handling diagnostics.
pub trait Handler<T> {
    /// Receives an error and handles it.
    fn receive(&self, error: T);
}

/// Is a struct that implements [`Handler`] trait by storing all errors in a vector.
#[derive(Debug)]
pub struct Storage<T: Send + Sync> {
    errors: RwLock<Vec<T>>,
}

impl<T: Send + Sync> Storage<T> {
    /// Creates a new empty [`Storage`]
    #[must_use]
    pub fn new() -> Self {
        Self {
            errors: RwLock::new(Vec::new()),
        }
    }

    /// Consumes the [`Storage`] and returns the underlying vector of errors.
    pub fn into_vec(self) -> Vec<T> {
        self.errors
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns a reference to the underlying vector of errors.
    pub fn as_vec(&self) -> RwLockReadGuard<Vec<T>> {
        self.errors.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the number of errors received so far.
    pub fn len(&self) -> usize { self.as_vec().len() }

    /// Checks whether no error has been received.
    pub fn is_empty(&self) -> bool { self.as_vec().is_empty() }
}

impl<T: Send + Sync> Default for Storage<T> {
    fn default() -> Self { Self::new() }
}

impl<T: Send + Sync, U> Handler<U> for Storage<T>
where
    U: Into<T>,
{
    fn receive(&self, error: U) {
        self.errors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(error.into());
    }
}

/// Is a struct that implements [`Handler`] trait by doing nothing with the errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Dummy;

impl<T> Handler<T> for Dummy {
    fn receive(&self, _error: T) {}
}

/// Is a struct that implements [`Handler`] trait by counting the number of diagnostics received.
#[derive(Debug, Default)]
pub struct Counter {
    counter: AtomicUsize,
}

impl Counter {
    /// Returns the number of diagnostics received.
    #[must_use]
    pub fn count(&self) -> usize { self.counter.load(Ordering::Relaxed) }
}

impl<T> Handler<T> for Counter {
    fn receive(&self, _error: T) { self.counter.fetch_add(1, Ordering::Relaxed); }
}
