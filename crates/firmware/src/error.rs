//! Subsystem error type.
//!
//! Lower layers keep their own typed errors ([`pcm_stream::StreamError`],
//! [`crate::Es8311Error`], the transport's and storage's associated error
//! types); the subsystem maps them onto [`AudioError`] at its boundary.

use core::fmt;

use pcm_stream::{FormatError, ResourceExhausted, StreamError};

/// Initialization stage that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitStep {
    /// Opening the duplex transport
    TransportOpen,
    /// Enabling a transport direction
    TransportEnable,
    /// Reading the codec chip id
    CodecProbe,
    /// Codec clock and serial port setup
    CodecInit,
    /// Initial volume
    Volume,
    /// Microphone path setup
    Microphone,
    /// Explicit unmute
    Unmute,
}

impl InitStep {
    /// Short label for logging.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TransportOpen => "transport open",
            Self::TransportEnable => "transport enable",
            Self::CodecProbe => "codec probe",
            Self::CodecInit => "codec init",
            Self::Volume => "volume",
            Self::Microphone => "microphone",
            Self::Unmute => "unmute",
        }
    }
}

impl fmt::Display for InitStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sample-rate switch stage that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReconfigStep {
    /// Stopping the transmit path
    DisableTx,
    /// Applying the new transport clock
    TransportClock,
    /// Full codec re-init at the new rate
    CodecInit,
    /// Re-applying the volume lost by the codec re-init
    RestoreVolume,
    /// Re-applying the mute state lost by the codec re-init
    RestoreMute,
    /// Re-applying the microphone path and gain lost by the codec re-init
    RestoreMicrophone,
    /// Restarting the transmit path
    EnableTx,
}

impl ReconfigStep {
    /// Short label for logging.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DisableTx => "disable tx",
            Self::TransportClock => "transport clock",
            Self::CodecInit => "codec init",
            Self::RestoreVolume => "restore volume",
            Self::RestoreMute => "restore mute",
            Self::RestoreMicrophone => "restore microphone",
            Self::EnableTx => "enable tx",
        }
    }
}

impl fmt::Display for ReconfigStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by [`crate::AudioSubsystem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror_no_std::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AudioError {
    /// Transport or codec bring-up failed; everything acquired was released.
    #[error("initialization failed at {step}")]
    InitializationFailure {
        /// Stage that failed
        step: InitStep,
    },
    /// Not initialized, or the transmit path is awaiting recovery.
    #[error("audio subsystem not ready")]
    InvalidState,
    /// The file is not a usable RIFF/WAVE container.
    #[error("invalid container: {0}")]
    InvalidFormat(FormatError),
    /// File open, read, write or seek failed.
    #[error("file I/O failed")]
    IoFailure,
    /// A stream buffer could not be allocated.
    #[error("out of memory")]
    ResourceExhaustion,
    /// Sample rate outside the supported range.
    #[error("unsupported sample rate {0} Hz")]
    UnsupportedRate(u32),
    /// A sample-rate switch failed; transmit is left disabled.
    #[error("switch to {rate} Hz failed at {step}")]
    ReconfigurationFailure {
        /// Requested rate
        rate: u32,
        /// Stage that failed
        step: ReconfigStep,
    },
    /// Argument outside its documented range.
    #[error("invalid argument")]
    InvalidArgument,
    /// A codec command failed after initialization.
    #[error("codec command failed")]
    DeviceFailure,
}

impl<E: fmt::Debug> From<StreamError<E>> for AudioError {
    fn from(e: StreamError<E>) -> Self {
        match e {
            StreamError::Io(_) | StreamError::WriteZero => Self::IoFailure,
            StreamError::Format(f) => Self::InvalidFormat(f),
            StreamError::ResourceExhaustion => Self::ResourceExhaustion,
        }
    }
}

impl From<ResourceExhausted> for AudioError {
    fn from(_: ResourceExhausted) -> Self {
        Self::ResourceExhaustion
    }
}

impl From<FormatError> for AudioError {
    fn from(e: FormatError) -> Self {
        Self::InvalidFormat(e)
    }
}
