//! Stream error type, generic over the storage error.

use crate::wav::FormatError;

/// Buffer allocation failed or its size overflowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ResourceExhausted;

/// Error from container and stream operations.
#[derive(Debug)]
pub enum StreamError<E: core::fmt::Debug> {
    /// I/O error from the underlying `File`.
    Io(E),
    /// Container format error.
    Format(FormatError),
    /// `File::write` accepted zero bytes.
    WriteZero,
    /// Buffer allocation failed.
    ResourceExhaustion,
}

impl<E: core::fmt::Debug> From<FormatError> for StreamError<E> {
    fn from(e: FormatError) -> Self {
        Self::Format(e)
    }
}

impl<E: core::fmt::Debug> From<ResourceExhausted> for StreamError<E> {
    fn from(_: ResourceExhausted) -> Self {
        Self::ResourceExhaustion
    }
}
