//! Transmit-path health after a failed sample-rate switch.
//!
//! # Background
//!
//! A rate switch disables TX, reprograms the port clock, re-inits the codec
//! and re-enables TX. If any step fails the port is left with TX disabled and
//! the codec possibly clocked for a different rate than the transport. Writes
//! issued in that state either fail outright or play at the wrong pitch.
//!
//! **Recovery procedure:**
//! 1. Mark the path [`TransportHealth::NeedsRecovery`] when the switch fails.
//! 2. Refuse transmit operations (`play_tone`, `play_file`) while marked.
//! 3. Re-run the full switch sequence on the next `set_sample_rate`, even if
//!    the requested rate equals the recorded one.
//! 4. On success, return to [`TransportHealth::Healthy`].
//!
//! # Usage Pattern
//!
//! ```rust,ignore
//! match reconfigure(rate).await {
//!     Ok(()) => health.on_recovered(),
//!     Err(step) => health.on_reconfigure_failed(),
//! }
//!
//! if health.needs_recovery() {
//!     return Err(AudioError::InvalidState);
//! }
//! ```

/// Transmit-path recovery state machine.
///
/// The `failures` counter saturates at [`u8::MAX`] so repeated failed
/// switches never wrap back to a small count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportHealth {
    /// Transport and codec agree on the active rate; TX is enabled.
    #[default]
    Healthy,
    /// A switch failed part-way; TX must not be used until a switch succeeds.
    NeedsRecovery {
        /// Failed switches since the last success. Saturates at 255.
        failures: u8,
    },
}

impl TransportHealth {
    /// Create a new state machine in the [`Healthy`][Self::Healthy] state.
    pub fn new() -> Self {
        Self::Healthy
    }

    /// Returns `true` if transmit operations must be refused.
    pub fn needs_recovery(&self) -> bool {
        matches!(self, Self::NeedsRecovery { .. })
    }

    /// Record a failed rate switch.
    pub fn on_reconfigure_failed(&mut self) {
        *self = Self::NeedsRecovery {
            failures: self.failures().saturating_add(1),
        };
    }

    /// Record a successful rate switch. No-op from `Healthy`.
    pub fn on_recovered(&mut self) {
        *self = Self::Healthy;
    }

    /// Failed switches since the last success, or 0 if healthy.
    pub fn failures(&self) -> u8 {
        match self {
            Self::NeedsRecovery { failures } => *failures,
            Self::Healthy => 0,
        }
    }
}
