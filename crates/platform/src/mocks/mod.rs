//! Mock implementations for testing
//!
//! This module provides mock implementations of the platform traits
//! for use in unit and integration tests. Every mock is `Clone`; clones
//! share state, so a test keeps one clone for inspection and hands the
//! other to the code under test.

#![cfg(any(test, feature = "std"))]

mod storage;
mod transport;

pub use storage::{MockFile, MockStorage, StorageFault};
pub use transport::{MockTransport, TransportCall, TransportFault};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Error returned by every mock in this module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockError {
    /// A fault injected by the test
    Injected,
    /// Path not present in [`MockStorage`]
    NotFound,
    /// Transport used while closed or with the direction disabled
    NotEnabled,
}

/// Lock a mock's shared state. A poisoned lock only means another test
/// thread panicked; the recorded data is still usable.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
